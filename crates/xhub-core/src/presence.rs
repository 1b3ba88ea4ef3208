use tracing::debug;

use xhub_types::models::Presence;

use crate::error::{HubError, Result};
use crate::hub::Hub;

impl Hub {
    pub fn update_presence(&self, token: &str, status: &str, game: &str) -> Result<()> {
        let user = self.authenticate(token)?;
        if !self.store.update_presence(&user, status, game)? {
            return Err(HubError::NotFound(format!("User '{user}'")));
        }
        debug!(%user, status, game, "Presence updated");
        Ok(())
    }

    /// Presence of the caller's friends, sorted by username.
    pub fn list_presence(&self, token: &str) -> Result<Vec<Presence>> {
        let user = self.authenticate(token)?;
        Ok(self.store.friend_presence(&user)?)
    }
}

#[cfg(test)]
mod tests {
    use crate::HubError;
    use crate::hub::test_support::{hub, user};
    use xhub_types::models::Decision;

    #[test]
    fn friends_see_presence_updates() {
        let hub = hub();
        let alice = user(&hub, "alice");
        let bob = user(&hub, "bob");
        user(&hub, "carol");

        hub.send_request("alice", "bob").unwrap();
        hub.respond("alice", "bob", Decision::Accepted).unwrap();
        hub.update_presence(&bob, "In game", "Chess").unwrap();

        let list = hub.list_presence(&alice).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].username, "bob");
        assert_eq!(list[0].status, "In game");
        assert_eq!(list[0].game, "Chess");
    }

    #[test]
    fn presence_requires_session() {
        let hub = hub();
        assert!(matches!(
            hub.update_presence("forged", "Online", "None"),
            Err(HubError::Unauthorized)
        ));
        assert!(matches!(hub.list_presence("forged"), Err(HubError::Unauthorized)));
    }
}
