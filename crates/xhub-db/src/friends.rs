use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};

use crate::Database;
use crate::models::FriendRequestRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    Created,
    /// The same ordered pair already has a pending request.
    AlreadyPending,
    AlreadyFriends,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveOutcome {
    Accepted,
    Declined,
    /// No pending request for the pair, e.g. it was resolved by an earlier call.
    Missing,
}

/// Friendship edges are stored with the lexicographically smaller name first.
fn edge<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b { (a, b) } else { (b, a) }
}

impl Database {
    pub fn insert_friend_request(&self, from: &str, to: &str) -> Result<RequestOutcome> {
        self.with_tx(|tx| {
            if friendship_exists(tx, from, to)? {
                return Ok(RequestOutcome::AlreadyFriends);
            }
            let inserted = tx.execute(
                "INSERT INTO friend_requests (from_user, to_user, status) VALUES (?1, ?2, 'pending')
                 ON CONFLICT(from_user, to_user) DO NOTHING",
                (from, to),
            )?;
            Ok(if inserted == 1 {
                RequestOutcome::Created
            } else {
                RequestOutcome::AlreadyPending
            })
        })
    }

    /// Pending requests addressed to `to`, oldest first.
    pub fn list_incoming_requests(&self, to: &str) -> Result<Vec<FriendRequestRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT from_user, to_user, status, created_at
                 FROM friend_requests
                 WHERE to_user = ?1 AND status = 'pending'
                 ORDER BY created_at, rowid",
            )?;

            let rows = stmt
                .query_map([to], |row| {
                    Ok(FriendRequestRow {
                        from_user: row.get(0)?,
                        to_user: row.get(1)?,
                        status: row.get(2)?,
                        created_at: row.get(3)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    /// Remove the pending request `from -> to` and, when accepted, add the edge.
    /// Both happen in one transaction, so a retried accept finds no request
    /// and cannot add a second edge.
    pub fn resolve_friend_request(&self, from: &str, to: &str, accept: bool) -> Result<ResolveOutcome> {
        self.with_tx(|tx| {
            let removed = tx.execute(
                "DELETE FROM friend_requests WHERE from_user = ?1 AND to_user = ?2 AND status = 'pending'",
                (from, to),
            )?;
            if removed == 0 {
                return Ok(ResolveOutcome::Missing);
            }
            if !accept {
                return Ok(ResolveOutcome::Declined);
            }

            let (low, high) = edge(from, to);
            tx.execute(
                "INSERT OR IGNORE INTO friendships (user_low, user_high) VALUES (?1, ?2)",
                (low, high),
            )?;
            Ok(ResolveOutcome::Accepted)
        })
    }

    pub fn are_friends(&self, a: &str, b: &str) -> Result<bool> {
        self.with_conn(|conn| friendship_exists(conn, a, b))
    }

    /// Usernames of all friends of `username`, sorted.
    pub fn list_friends(&self, username: &str) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT CASE WHEN user_low = ?1 THEN user_high ELSE user_low END AS friend
                 FROM friendships
                 WHERE user_low = ?1 OR user_high = ?1
                 ORDER BY friend",
            )?;

            let rows = stmt
                .query_map([username], |row| row.get::<_, String>(0))?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    /// Delete the edge in whichever order it is named. Returns false if absent.
    pub fn delete_friendship(&self, a: &str, b: &str) -> Result<bool> {
        let (low, high) = edge(a, b);
        self.with_conn_mut(|conn| {
            let removed = conn.execute(
                "DELETE FROM friendships WHERE user_low = ?1 AND user_high = ?2",
                (low, high),
            )?;
            Ok(removed > 0)
        })
    }
}

fn friendship_exists(conn: &Connection, a: &str, b: &str) -> Result<bool> {
    let (low, high) = edge(a, b);
    let found = conn
        .query_row(
            "SELECT 1 FROM friendships WHERE user_low = ?1 AND user_high = ?2",
            (low, high),
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}
