use anyhow::Result;

use crate::Database;
use crate::models::MessageRow;

impl Database {
    /// Append a message and return its id. Ids come from the AUTOINCREMENT
    /// sequence on the single writer, so they are never reused and commit in
    /// the order they are handed out.
    pub fn insert_message(&self, sender: &str, recipient: &str, content: &str) -> Result<i64> {
        self.with_conn_mut(|conn| {
            let id = conn.query_row(
                "INSERT INTO messages (sender, recipient, content) VALUES (?1, ?2, ?3) RETURNING id",
                (sender, recipient, content),
                |row| row.get(0),
            )?;
            Ok(id)
        })
    }

    /// Messages sent or received by `username` with id greater than `after`, ascending.
    pub fn messages_since(&self, username: &str, after: i64) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, sender, recipient, content, created_at
                 FROM messages
                 WHERE (sender = ?1 OR recipient = ?1) AND id > ?2
                 ORDER BY id ASC",
            )?;

            let rows = stmt
                .query_map(rusqlite::params![username, after], MessageRow::from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    /// Full transcript between two users, ascending by id.
    pub fn conversation(&self, a: &str, b: &str) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, sender, recipient, content, created_at
                 FROM messages
                 WHERE (sender = ?1 AND recipient = ?2) OR (sender = ?2 AND recipient = ?1)
                 ORDER BY id ASC",
            )?;

            let rows = stmt
                .query_map((a, b), MessageRow::from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::Database;
    use crate::accounts::test_support::verified_account;

    #[test]
    fn ids_increase_and_cursor_filters() {
        let db = Database::open_in_memory().unwrap();
        verified_account(&db, "alice");
        verified_account(&db, "bob");
        verified_account(&db, "carol");

        let first = db.insert_message("alice", "bob", "one").unwrap();
        let second = db.insert_message("bob", "alice", "two").unwrap();
        let third = db.insert_message("carol", "alice", "three").unwrap();
        assert!(first < second && second < third);

        let all: Vec<i64> = db.messages_since("bob", 0).unwrap().iter().map(|m| m.id).collect();
        assert_eq!(all, vec![first, second]);

        let newer: Vec<i64> = db
            .messages_since("alice", first)
            .unwrap()
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(newer, vec![second, third]);
        assert!(db.messages_since("alice", third).unwrap().is_empty());
    }

    #[test]
    fn conversation_is_pair_scoped() {
        let db = Database::open_in_memory().unwrap();
        verified_account(&db, "alice");
        verified_account(&db, "bob");
        verified_account(&db, "carol");

        db.insert_message("alice", "bob", "hi bob").unwrap();
        db.insert_message("carol", "alice", "hi alice").unwrap();
        db.insert_message("bob", "alice", "hi back").unwrap();

        let transcript = db.conversation("bob", "alice").unwrap();
        let contents: Vec<&str> = transcript.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["hi bob", "hi back"]);
    }
}
