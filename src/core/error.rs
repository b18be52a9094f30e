use thiserror::Error;

/// Failures surfaced to the caller of a profile extraction.
///
/// Only session rejection and unrecoverable root-page navigation reach this
/// type. Field and section misses are absorbed where they happen and show up
/// as empty values in the record.
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("session rejected: auth-wall at {url}")]
    AuthWall { url: String },

    #[error("navigation to {url} failed after {attempts} attempt(s): {reason}")]
    Navigation {
        url: String,
        attempts: usize,
        reason: String,
    },

    #[error("not a profile url: '{0}'")]
    InvalidProfileUrl(String),

    #[error("cookie store {path}: {reason}")]
    CookieStore { path: String, reason: String },

    #[error("selector table {path}: {reason}")]
    SelectorTable { path: String, reason: String },

    #[error("browser: {0}")]
    Browser(String),
}

impl ScoutError {
    /// `true` when the error means the cookie set is no longer accepted and
    /// further profiles in the same run will fail the same way.
    pub fn is_session_fatal(&self) -> bool {
        matches!(self, ScoutError::AuthWall { .. })
    }
}
