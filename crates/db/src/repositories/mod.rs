//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod activity_repo;
pub mod app_user_repo;
pub mod item_repo;
pub mod jellyfin_user_repo;
pub mod library_repo;
pub mod show_repo;
pub mod stats_repo;
pub mod watchdog_repo;

pub use activity_repo::ActivityRepo;
pub use app_user_repo::AppUserRepo;
pub use item_repo::ItemRepo;
pub use jellyfin_user_repo::JellyfinUserRepo;
pub use library_repo::LibraryRepo;
pub use show_repo::{EpisodeRepo, SeasonRepo};
pub use stats_repo::StatsRepo;
pub use watchdog_repo::WatchdogRepo;
