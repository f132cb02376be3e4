use std::str::FromStr;
use std::time::Duration;

use jellystat_jellyfin::JellyfinSettings;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long to wait for background tasks after the server stops (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Jellyfin connection; `None` until `JF_HOST` and `JF_API_KEY` are set.
    pub jellyfin: Option<JellyfinSettings>,
    /// Background task schedule.
    pub tasks: TaskConfig,
}

/// Intervals and thresholds for the background tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskConfig {
    /// Minutes between scheduled library syncs (default: `60`).
    pub sync_interval_mins: u64,
    /// Seconds between session polls (default: `10`).
    pub watchdog_interval_secs: u64,
    /// Plays shorter than this are not recorded (default: `1`).
    pub min_playback_secs: i64,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            sync_interval_mins: 60,
            watchdog_interval_secs: 10,
            min_playback_secs: 1,
        }
    }
}

impl TaskConfig {
    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval_mins.max(1) * 60)
    }

    pub fn watchdog_interval(&self) -> Duration {
        Duration::from_secs(self.watchdog_interval_secs.max(1))
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                 |
    /// |--------------------------|-------------------------|
    /// | `HOST`                   | `0.0.0.0`               |
    /// | `PORT`                   | `3000`                  |
    /// | `CORS_ORIGINS`           | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS`  | `30`                    |
    /// | `JF_HOST`                | unset                   |
    /// | `JF_API_KEY`             | unset                   |
    /// | `JF_PREFERRED_ADMIN`     | unset                   |
    /// | `SYNC_INTERVAL_MINS`     | `60`                    |
    /// | `WATCHDOG_INTERVAL_SECS` | `10`                    |
    /// | `MIN_PLAYBACK_SECS`      | `1`                     |
    ///
    /// # Panics
    ///
    /// Panics if a numeric variable does not parse or `JWT_SECRET` is missing.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = parse_env("PORT", 3000);

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let defaults = TaskConfig::default();
        let tasks = TaskConfig {
            sync_interval_mins: parse_env("SYNC_INTERVAL_MINS", defaults.sync_interval_mins),
            watchdog_interval_secs: parse_env(
                "WATCHDOG_INTERVAL_SECS",
                defaults.watchdog_interval_secs,
            ),
            min_playback_secs: parse_env("MIN_PLAYBACK_SECS", defaults.min_playback_secs),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs: parse_env("REQUEST_TIMEOUT_SECS", 30),
            shutdown_timeout_secs: parse_env("SHUTDOWN_TIMEOUT_SECS", 30),
            jwt: JwtConfig::from_env(),
            jellyfin: jellyfin_from_env(),
            tasks,
        }
    }
}

/// Read `JF_HOST` / `JF_API_KEY` / `JF_PREFERRED_ADMIN`.
///
/// Both host and key must be non-empty for the connection to count as
/// configured.
fn jellyfin_from_env() -> Option<JellyfinSettings> {
    let host = std::env::var("JF_HOST").ok().filter(|h| !h.trim().is_empty())?;
    let api_key = std::env::var("JF_API_KEY").ok().filter(|k| !k.is_empty())?;
    let preferred_admin = std::env::var("JF_PREFERRED_ADMIN").ok();
    Some(JellyfinSettings::new(&host, api_key).with_preferred_admin(preferred_admin))
}

fn parse_env<T>(name: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|e| panic!("{name} must be a valid number: {e}")),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_intervals_never_zero() {
        let tasks = TaskConfig {
            sync_interval_mins: 0,
            watchdog_interval_secs: 0,
            min_playback_secs: 1,
        };
        assert_eq!(tasks.sync_interval(), Duration::from_secs(60));
        assert_eq!(tasks.watchdog_interval(), Duration::from_secs(1));
    }

    #[test]
    fn default_schedule() {
        let tasks = TaskConfig::default();
        assert_eq!(tasks.sync_interval(), Duration::from_secs(3600));
        assert_eq!(tasks.watchdog_interval(), Duration::from_secs(10));
        assert_eq!(tasks.min_playback_secs, 1);
    }
}
