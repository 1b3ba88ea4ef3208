//! Database row types, mapped directly from SQLite rows.
//! Kept separate from the xhub-types models so the db layer stays independent.

use rusqlite::Row;

#[derive(Debug, Clone)]
pub struct AccountRow {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub verified: bool,
    pub status: String,
    pub game: String,
    pub created_at: String,
}

impl AccountRow {
    pub(crate) const COLUMNS: &'static str =
        "id, username, email, password, verified, status, game, created_at";

    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            username: row.get(1)?,
            email: row.get(2)?,
            password: row.get(3)?,
            verified: row.get(4)?,
            status: row.get(5)?,
            game: row.get(6)?,
            created_at: row.get(7)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct PendingVerificationRow {
    pub email: String,
    pub code: String,
    pub issued_at: String,
}

#[derive(Debug, Clone)]
pub struct DeliveryTaskRow {
    pub id: String,
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub status: String,
    pub created_at: String,
}

impl DeliveryTaskRow {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            recipient: row.get(1)?,
            subject: row.get(2)?,
            body: row.get(3)?,
            status: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct SessionRow {
    pub token: String,
    pub username: String,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct FriendRequestRow {
    pub from_user: String,
    pub to_user: String,
    pub status: String,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct MessageRow {
    pub id: i64,
    pub sender: String,
    pub recipient: String,
    pub content: String,
    pub created_at: String,
}

impl MessageRow {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            sender: row.get(1)?,
            recipient: row.get(2)?,
            content: row.get(3)?,
            created_at: row.get(4)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct PresenceRow {
    pub username: String,
    pub status: String,
    pub game: String,
}
