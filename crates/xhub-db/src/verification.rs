use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};

use crate::Database;
use crate::accounts::query_account;
use crate::models::PendingVerificationRow;

/// Everything written by one registration request.
#[derive(Debug, Clone)]
pub struct NewRegistration {
    pub account_id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub code: String,
    pub task_id: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// New unverified account, pending code and delivery task written.
    Created,
    /// Same username and email re-requested before confirmation. The old code
    /// is overwritten and `stale_tasks` undelivered tasks were replaced.
    Superseded { stale_tasks: usize },
    UsernameTaken,
    EmailTaken,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    Confirmed { username: String },
    /// No pending record for the email, or the code does not match. Nothing written.
    Rejected,
}

impl Database {
    /// Reserve the username and email, store the code and enqueue its delivery,
    /// all in one immediate transaction.
    pub fn request_registration(&self, reg: &NewRegistration) -> Result<RegistrationOutcome> {
        self.with_tx(|tx| {
            if let Some(holder) = query_account(tx, "username", &reg.username)? {
                if holder.verified || holder.email != reg.email {
                    return Ok(RegistrationOutcome::UsernameTaken);
                }
            }

            let existing = query_account(tx, "email", &reg.email)?;
            let outcome = match existing {
                Some(holder) if holder.verified || holder.username != reg.username => {
                    return Ok(RegistrationOutcome::EmailTaken);
                }
                Some(holder) => {
                    tx.execute(
                        "UPDATE accounts SET password = ?1 WHERE id = ?2",
                        (&reg.password_hash, &holder.id),
                    )?;
                    let stale_tasks = tx.execute(
                        "DELETE FROM delivery_tasks WHERE recipient = ?1 AND status = 'pending'",
                        [&reg.email],
                    )?;
                    RegistrationOutcome::Superseded { stale_tasks }
                }
                None => {
                    tx.execute(
                        "INSERT INTO accounts (id, username, email, password) VALUES (?1, ?2, ?3, ?4)",
                        (&reg.account_id, &reg.username, &reg.email, &reg.password_hash),
                    )?;
                    RegistrationOutcome::Created
                }
            };

            tx.execute(
                "INSERT INTO pending_verifications (email, code) VALUES (?1, ?2)
                 ON CONFLICT(email) DO UPDATE SET code = excluded.code, issued_at = datetime('now')",
                (&reg.email, &reg.code),
            )?;

            tx.execute(
                "INSERT INTO delivery_tasks (id, recipient, subject, body) VALUES (?1, ?2, ?3, ?4)",
                (&reg.task_id, &reg.email, &reg.subject, &reg.body),
            )?;

            Ok(outcome)
        })
    }

    /// Verify the account and drop the pending record if `code` matches exactly.
    pub fn confirm_registration(&self, email: &str, code: &str) -> Result<ConfirmOutcome> {
        self.with_tx(|tx| {
            let Some(pending) = query_pending(tx, email)? else {
                return Ok(ConfirmOutcome::Rejected);
            };
            if pending.code != code {
                return Ok(ConfirmOutcome::Rejected);
            }

            let username: String = tx.query_row(
                "UPDATE accounts SET verified = 1 WHERE email = ?1 RETURNING username",
                [email],
                |row| row.get(0),
            )?;
            tx.execute("DELETE FROM pending_verifications WHERE email = ?1", [email])?;

            Ok(ConfirmOutcome::Confirmed { username })
        })
    }

    pub fn get_pending_verification(&self, email: &str) -> Result<Option<PendingVerificationRow>> {
        self.with_conn(|conn| query_pending(conn, email))
    }
}

fn query_pending(conn: &Connection, email: &str) -> Result<Option<PendingVerificationRow>> {
    let row = conn
        .query_row(
            "SELECT email, code, issued_at FROM pending_verifications WHERE email = ?1",
            [email],
            |row| {
                Ok(PendingVerificationRow {
                    email: row.get(0)?,
                    code: row.get(1)?,
                    issued_at: row.get(2)?,
                })
            },
        )
        .optional()?;
    Ok(row)
}
