/// Error taxonomy for router setup.
///
/// Matching failure is never an error: an unmatched URL resolves to an empty
/// route and a diagnostic on the warning channel. Only malformed
/// configuration input fails, and it fails fast at registration time.
use thiserror::Error;

/// Errors raised while registering routes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouterError {
    /// The route pattern could not be compiled.
    ///
    /// Raised when a pattern carries an unbalanced optional group or an
    /// empty parameter name. Never raised at match time.
    #[error("malformed route pattern `{pattern}`: {reason}")]
    MalformedPattern {
        /// The offending pattern string, verbatim.
        pattern: String,
        /// Human-readable description of what could not be parsed.
        reason: String,
    },
}

impl RouterError {
    pub(crate) fn malformed(pattern: &str, reason: impl Into<String>) -> Self {
        RouterError::MalformedPattern {
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }
}
