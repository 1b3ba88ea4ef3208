use tracing::debug;

use xhub_types::models::Message;

use crate::error::Result;
use crate::hub::Hub;

impl Hub {
    /// Append a direct message from the token's owner and return its id.
    pub fn send(&self, sender_token: &str, recipient: &str, content: &str) -> Result<i64> {
        let sender = self.authenticate(sender_token)?;
        self.require_account(recipient)?;

        let id = self.store.append_message(&sender, recipient, content)?;
        debug!(id, %sender, recipient, "Message stored");
        Ok(id)
    }

    /// Every message the caller sent or received with id greater than
    /// `last_id`, ascending. Passing the last id seen as the next cursor
    /// yields each message exactly once.
    pub fn poll_since(&self, token: &str, last_id: i64) -> Result<Vec<Message>> {
        let user = self.authenticate(token)?;
        Ok(self.store.messages_after(&user, last_id)?)
    }

    /// Full transcript between the caller and `other_user`, ascending by id.
    pub fn history(&self, token: &str, other_user: &str) -> Result<Vec<Message>> {
        let user = self.authenticate(token)?;
        Ok(self.store.conversation(&user, other_user)?)
    }
}
