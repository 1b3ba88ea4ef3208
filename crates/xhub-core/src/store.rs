//! Store capability interface.
//!
//! The core only needs lookups by unique key, filtering by status, filtering
//! by id above a cursor for either party of a message, and a handful of
//! atomic multi-record writes. Anything offering these can back a [`Hub`].
//!
//! [`Hub`]: crate::Hub

use anyhow::Result;
use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use xhub_db::Database;
use xhub_db::models::{AccountRow, DeliveryTaskRow, FriendRequestRow, MessageRow};
use xhub_types::models::{
    Account, DeliveryStatus, DeliveryTask, FriendRequest, Message, PendingVerification, Presence,
    RequestStatus, Session,
};

pub use xhub_db::friends::{RequestOutcome, ResolveOutcome};
pub use xhub_db::verification::{ConfirmOutcome, NewRegistration, RegistrationOutcome};

/// An account together with its password hash, for credential checks only.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub account: Account,
    pub password_hash: String,
}

pub trait Store: Send + Sync {
    // -- Accounts and sessions (by unique key) --

    fn account_by_username(&self, username: &str) -> Result<Option<Credentials>>;
    fn insert_session(&self, token: &str, username: &str) -> Result<()>;
    fn session_by_token(&self, token: &str) -> Result<Option<Session>>;

    // -- Verification queue --

    /// Atomically reserve the account, store the code and enqueue one delivery task.
    fn request_registration(&self, reg: &NewRegistration) -> Result<RegistrationOutcome>;
    /// Atomically verify the account and delete the pending record on an exact match.
    fn confirm_registration(&self, email: &str, code: &str) -> Result<ConfirmOutcome>;
    fn pending_verification(&self, email: &str) -> Result<Option<PendingVerification>>;
    fn deliveries_by_status(&self, status: DeliveryStatus) -> Result<Vec<DeliveryTask>>;
    fn acknowledge_deliveries(&self, recipient: &str) -> Result<usize>;

    // -- Relationships --

    fn insert_friend_request(&self, from: &str, to: &str) -> Result<RequestOutcome>;
    fn incoming_requests(&self, to: &str) -> Result<Vec<FriendRequest>>;
    fn resolve_friend_request(&self, from: &str, to: &str, accept: bool) -> Result<ResolveOutcome>;
    fn are_friends(&self, a: &str, b: &str) -> Result<bool>;
    fn friends_of(&self, username: &str) -> Result<Vec<String>>;
    fn delete_friendship(&self, a: &str, b: &str) -> Result<bool>;

    // -- Messages (by either party, by id above cursor) --

    fn append_message(&self, sender: &str, recipient: &str, content: &str) -> Result<i64>;
    fn messages_after(&self, username: &str, after: i64) -> Result<Vec<Message>>;
    fn conversation(&self, a: &str, b: &str) -> Result<Vec<Message>>;

    // -- Presence --

    fn update_presence(&self, username: &str, status: &str, game: &str) -> Result<bool>;
    fn friend_presence(&self, username: &str) -> Result<Vec<Presence>>;
}

impl Store for Database {
    fn account_by_username(&self, username: &str) -> Result<Option<Credentials>> {
        Ok(self.get_account_by_username(username)?.map(credentials))
    }

    fn insert_session(&self, token: &str, username: &str) -> Result<()> {
        self.create_session(token, username)
    }

    fn session_by_token(&self, token: &str) -> Result<Option<Session>> {
        Ok(self.get_session(token)?.map(|row| Session {
            created_at: parse_timestamp(&row.created_at, "session"),
            token: row.token,
            username: row.username,
        }))
    }

    fn request_registration(&self, reg: &NewRegistration) -> Result<RegistrationOutcome> {
        Database::request_registration(self, reg)
    }

    fn confirm_registration(&self, email: &str, code: &str) -> Result<ConfirmOutcome> {
        Database::confirm_registration(self, email, code)
    }

    fn pending_verification(&self, email: &str) -> Result<Option<PendingVerification>> {
        Ok(self.get_pending_verification(email)?.map(|row| PendingVerification {
            issued_at: parse_timestamp(&row.issued_at, "pending verification"),
            email: row.email,
            code: row.code,
        }))
    }

    fn deliveries_by_status(&self, status: DeliveryStatus) -> Result<Vec<DeliveryTask>> {
        Ok(self
            .list_delivery_tasks(status.as_str())?
            .into_iter()
            .map(delivery_task)
            .collect())
    }

    fn acknowledge_deliveries(&self, recipient: &str) -> Result<usize> {
        Database::acknowledge_deliveries(self, recipient)
    }

    fn insert_friend_request(&self, from: &str, to: &str) -> Result<RequestOutcome> {
        Database::insert_friend_request(self, from, to)
    }

    fn incoming_requests(&self, to: &str) -> Result<Vec<FriendRequest>> {
        Ok(self
            .list_incoming_requests(to)?
            .into_iter()
            .map(friend_request)
            .collect())
    }

    fn resolve_friend_request(&self, from: &str, to: &str, accept: bool) -> Result<ResolveOutcome> {
        Database::resolve_friend_request(self, from, to, accept)
    }

    fn are_friends(&self, a: &str, b: &str) -> Result<bool> {
        Database::are_friends(self, a, b)
    }

    fn friends_of(&self, username: &str) -> Result<Vec<String>> {
        self.list_friends(username)
    }

    fn delete_friendship(&self, a: &str, b: &str) -> Result<bool> {
        Database::delete_friendship(self, a, b)
    }

    fn append_message(&self, sender: &str, recipient: &str, content: &str) -> Result<i64> {
        self.insert_message(sender, recipient, content)
    }

    fn messages_after(&self, username: &str, after: i64) -> Result<Vec<Message>> {
        Ok(self
            .messages_since(username, after)?
            .into_iter()
            .map(message)
            .collect())
    }

    fn conversation(&self, a: &str, b: &str) -> Result<Vec<Message>> {
        Ok(Database::conversation(self, a, b)?
            .into_iter()
            .map(message)
            .collect())
    }

    fn update_presence(&self, username: &str, status: &str, game: &str) -> Result<bool> {
        Database::update_presence(self, username, status, game)
    }

    fn friend_presence(&self, username: &str) -> Result<Vec<Presence>> {
        Ok(self
            .list_friend_presence(username)?
            .into_iter()
            .map(|row| Presence {
                username: row.username,
                status: row.status,
                game: row.game,
            })
            .collect())
    }
}

// -- Row conversion --

fn credentials(row: AccountRow) -> Credentials {
    let id = row.id.parse().unwrap_or_else(|e| {
        warn!("Corrupt account id '{}': {}", row.id, e);
        Uuid::default()
    });
    Credentials {
        account: Account {
            id,
            created_at: parse_timestamp(&row.created_at, "account"),
            username: row.username,
            email: row.email,
            verified: row.verified,
            status: row.status,
            game: row.game,
        },
        password_hash: row.password,
    }
}

fn delivery_task(row: DeliveryTaskRow) -> DeliveryTask {
    let id = row.id.parse().unwrap_or_else(|e| {
        warn!("Corrupt delivery task id '{}': {}", row.id, e);
        Uuid::default()
    });
    let status = DeliveryStatus::parse(&row.status).unwrap_or_else(|| {
        warn!("Corrupt status '{}' on delivery task '{}'", row.status, row.id);
        DeliveryStatus::Pending
    });
    DeliveryTask {
        id,
        status,
        created_at: parse_timestamp(&row.created_at, "delivery task"),
        recipient: row.recipient,
        subject: row.subject,
        body: row.body,
    }
}

fn friend_request(row: FriendRequestRow) -> FriendRequest {
    let status = RequestStatus::parse(&row.status).unwrap_or_else(|| {
        warn!(
            "Corrupt status '{}' on friend request {} -> {}",
            row.status, row.from_user, row.to_user
        );
        RequestStatus::Pending
    });
    FriendRequest {
        status,
        created_at: parse_timestamp(&row.created_at, "friend request"),
        from_user: row.from_user,
        to_user: row.to_user,
    }
}

fn message(row: MessageRow) -> Message {
    Message {
        id: row.id,
        created_at: parse_timestamp(&row.created_at, "message"),
        sender: row.sender,
        recipient: row.recipient,
        content: row.content,
    }
}

/// SQLite `datetime('now')` has no timezone; read it as naive UTC.
fn parse_timestamp(raw: &str, what: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc()))
        .unwrap_or_else(|e| {
            warn!("Corrupt created_at '{}' on {}: {}", raw, what, e);
            DateTime::default()
        })
}
