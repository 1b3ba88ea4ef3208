pub mod auth;
pub mod delivery;
pub mod error;
pub mod friends;
pub mod messages;
pub mod middleware;
pub mod presence;
pub mod routes;
