//! Errors from the Jellyfin REST API layer and their log-friendly messages.

/// Log target used for every Jellyfin client message.
pub const LOG_TARGET: &str = "jellyfin_api";

/// Message reported when the server cannot be reached at all.
pub const UNREACHABLE_MESSAGE: &str =
    "Unable to connect. Please check the URL and your network connection.";

/// Errors from the Jellyfin REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum JellyfinApiError {
    /// No host / API key has been configured yet.
    #[error("Jellyfin connection is not configured")]
    NotConfigured,

    /// The HTTP request itself failed (network, DNS, TLS, decoding, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Jellyfin returned a non-2xx status code.
    #[error("{}", classify(.status, .path))]
    Status {
        /// HTTP status code.
        status: u16,
        /// Request path, for 404/503 diagnostics.
        path: String,
    },

    /// The server answered 2xx with a body of the wrong shape.
    #[error("Unreadable {what} payload: {source}")]
    Decode {
        what: &'static str,
        source: serde_json::Error,
    },

    /// A user id was needed but the server has no administrator account.
    #[error("No administrator user found on the Jellyfin server")]
    NoAdminUser,
}

impl JellyfinApiError {
    /// HTTP status to surface to callers, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Human-readable message for dashboards and settings validation.
    pub fn user_message(&self) -> String {
        match self {
            Self::Request(e) if e.is_connect() => UNREACHABLE_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }

    /// Emit a structured log line describing this failure.
    ///
    /// A missing configuration is expected during first-run setup and is
    /// logged at debug level; everything else is a warning.
    pub fn log(&self, operation: &str) {
        match self {
            Self::NotConfigured => {
                tracing::debug!(target: LOG_TARGET, operation, "Skipped: Jellyfin not configured");
            }
            Self::Status { status, path } => {
                tracing::warn!(
                    target: LOG_TARGET,
                    operation,
                    status,
                    path = %path,
                    "{}", self
                );
            }
            Self::Request(e) => {
                tracing::warn!(
                    target: LOG_TARGET,
                    operation,
                    url = e.url().map(|u| u.as_str()).unwrap_or("<unknown>"),
                    error = %e,
                    "Jellyfin request failed"
                );
            }
            Self::Decode { .. } | Self::NoAdminUser => {
                tracing::warn!(target: LOG_TARGET, operation, "{}", self);
            }
        }
    }
}

fn classify(status: &u16, path: &str) -> String {
    status_message(*status, path)
}

/// Classify a non-success HTTP status into a short message.
pub fn status_message(status: u16, path: &str) -> String {
    match status {
        400 => "400 Bad Request".to_string(),
        401 => "401 Unauthorized".to_string(),
        403 => "403 Access Forbidden".to_string(),
        404 => format!("404 URL Not Found : {path}"),
        503 => format!("503 Service Unavailable : {path}"),
        other => format!("Unexpected status code: {other}"),
    }
}
