//! Theme resolution errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Failures while resolving a theme sheet. Widgets degrade to the bundled variables.
pub enum ThemeError {
    /// No built-in theme with that name and mode.
    #[error("unknown theme `{theme}` ({mode})")]
    UnknownTheme {
        /// Requested theme family.
        theme: String,
        /// Requested mode token.
        mode: &'static str,
    },
    /// An external stylesheet could not be loaded.
    #[error("theme fetch for {path} failed: {reason}")]
    Fetch {
        /// Requested stylesheet path.
        path: String,
        /// Transport or status message.
        reason: String,
    },
}
