use tracing::{debug, info};

use xhub_types::models::{Decision, FriendRequest};
use xhub_types::validate;

use crate::error::Result;
use crate::hub::Hub;
use crate::store::{RequestOutcome, ResolveOutcome};

impl Hub {
    /// Ask `to` for friendship. Repeating a pending request, or asking an
    /// existing friend, succeeds without writing anything. A request in the
    /// opposite direction is left alone; both stay pending until answered.
    pub fn send_request(&self, from: &str, to: &str) -> Result<()> {
        validate::distinct(from, to)?;
        self.require_account(to)?;

        match self.store.insert_friend_request(from, to)? {
            RequestOutcome::Created => info!(from, to, "Friend request sent"),
            RequestOutcome::AlreadyPending => debug!(from, to, "Friend request already pending"),
            RequestOutcome::AlreadyFriends => debug!(from, to, "Friend request between friends ignored"),
        }
        Ok(())
    }

    /// Pending requests addressed to `user`.
    pub fn list_incoming(&self, user: &str) -> Result<Vec<FriendRequest>> {
        Ok(self.store.incoming_requests(user)?)
    }

    /// Answer the request `from -> to`. A request that no longer exists is a
    /// no-op, so client retries never add a second friendship.
    pub fn respond(&self, from: &str, to: &str, decision: Decision) -> Result<()> {
        let accept = decision == Decision::Accepted;
        match self.store.resolve_friend_request(from, to, accept)? {
            ResolveOutcome::Accepted => info!(from, to, "Friend request accepted"),
            ResolveOutcome::Declined => info!(from, to, "Friend request declined"),
            ResolveOutcome::Missing => debug!(from, to, "Friend request already resolved"),
        }
        Ok(())
    }

    pub fn list_friends(&self, user: &str) -> Result<Vec<String>> {
        Ok(self.store.friends_of(user)?)
    }

    pub fn are_friends(&self, a: &str, b: &str) -> Result<bool> {
        Ok(self.store.are_friends(a, b)?)
    }

    /// Remove the friendship between `a` and `b`, named in either order. No-op if absent.
    pub fn remove_friendship(&self, a: &str, b: &str) -> Result<()> {
        if self.store.delete_friendship(a, b)? {
            info!(a, b, "Friendship removed");
        }
        Ok(())
    }
}
