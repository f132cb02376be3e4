pub mod auth;
pub mod catalog;
pub mod proxy;
pub mod stats;
pub mod sync;
