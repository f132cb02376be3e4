//! Domain types and pure helpers shared by every Jellystat crate.

pub mod error;
pub mod server_url;
pub mod stats;
pub mod types;
