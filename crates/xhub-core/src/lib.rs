//! The xhub core: accounts and sessions, the verification delivery queue,
//! friend relationships and cursor-ordered direct messages.
//!
//! Every operation is synchronous and goes through a [`store::Store`];
//! transports wrap calls in `spawn_blocking`.

pub mod error;
pub mod friends;
pub mod hub;
pub mod messages;
pub mod presence;
pub mod sessions;
pub mod store;
pub mod verification;

pub use error::{HubError, Result};
pub use hub::{Hub, HubConfig};
