//! Typed REST client for a Jellyfin media server.
//!
//! [`api::JellyfinApi`] wraps the endpoints the dashboard reads (users,
//! libraries, items, seasons, episodes, sessions, plugins, the Playback
//! Reporting custom-query endpoint) using [`reqwest`]. Wire types live in
//! [`models`]; pagination parameters in [`paging`].

pub mod api;
pub mod error;
pub mod models;
pub mod paging;

pub use api::{JellyfinApi, JellyfinSettings};
pub use error::JellyfinApiError;
