use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};

use crate::Database;
use crate::models::{AccountRow, PresenceRow};

impl Database {
    pub fn get_account_by_username(&self, username: &str) -> Result<Option<AccountRow>> {
        self.with_conn(|conn| query_account(conn, "username", username))
    }

    pub fn get_account_by_email(&self, email: &str) -> Result<Option<AccountRow>> {
        self.with_conn(|conn| query_account(conn, "email", email))
    }

    /// Returns false when no verified account has that username.
    pub fn update_presence(&self, username: &str, status: &str, game: &str) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "UPDATE accounts SET status = ?1, game = ?2 WHERE username = ?3 AND verified = 1",
                (status, game, username),
            )?;
            Ok(changed > 0)
        })
    }

    /// Presence of every friend of `username`, sorted by username.
    pub fn list_friend_presence(&self, username: &str) -> Result<Vec<PresenceRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT a.username, a.status, a.game
                 FROM friendships f
                 JOIN accounts a
                   ON a.username = CASE WHEN f.user_low = ?1 THEN f.user_high ELSE f.user_low END
                 WHERE f.user_low = ?1 OR f.user_high = ?1
                 ORDER BY a.username",
            )?;

            let rows = stmt
                .query_map([username], |row| {
                    Ok(PresenceRow {
                        username: row.get(0)?,
                        status: row.get(1)?,
                        game: row.get(2)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }
}

/// `column` is always a literal from this crate, never caller input.
pub(crate) fn query_account(
    conn: &Connection,
    column: &str,
    value: &str,
) -> Result<Option<AccountRow>> {
    let sql = format!(
        "SELECT {} FROM accounts WHERE {} = ?1",
        AccountRow::COLUMNS,
        column
    );
    let row = conn
        .query_row(&sql, [value], AccountRow::from_row)
        .optional()?;
    Ok(row)
}
