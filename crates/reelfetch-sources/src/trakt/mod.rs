pub mod api;
pub mod auth;
pub mod client;

pub use auth::{TraktAuthorizer};
pub use client::TraktClient;
