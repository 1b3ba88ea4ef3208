use anyhow::Result;

use crate::Database;
use crate::models::DeliveryTaskRow;

impl Database {
    /// Tasks with the given status, oldest first.
    pub fn list_delivery_tasks(&self, status: &str) -> Result<Vec<DeliveryTaskRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, recipient, subject, body, status, created_at
                 FROM delivery_tasks
                 WHERE status = ?1
                 ORDER BY created_at, rowid",
            )?;

            let rows = stmt
                .query_map([status], DeliveryTaskRow::from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    /// Mark every pending task for `recipient` delivered. Returns how many changed;
    /// zero is a normal outcome for a repeated acknowledgement.
    pub fn acknowledge_deliveries(&self, recipient: &str) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "UPDATE delivery_tasks
                 SET status = 'delivered', delivered_at = datetime('now')
                 WHERE recipient = ?1 AND status = 'pending'",
                [recipient],
            )?;
            Ok(changed)
        })
    }
}
