//! Errors of the programmatic widget API.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Errors surfaced by the programmatic widget API.
pub enum WidgetError {
    /// No widget is registered for the tag.
    #[error("unknown widget tag `{0}`")]
    UnknownTag(String),
    /// The widget does not implement the named method.
    #[error("`{tag}` has no method `{method}`")]
    UnknownMethod {
        /// Widget tag.
        tag: &'static str,
        /// Requested method.
        method: String,
    },
    /// Arguments could not be decoded for the method.
    #[error("invalid arguments for `{tag}.{method}`: {reason}")]
    InvalidArguments {
        /// Widget tag.
        tag: &'static str,
        /// Requested method.
        method: String,
        /// Decoder message.
        reason: String,
    },
    /// The instance is detached and cannot process the call.
    #[error("`{0}` is not attached")]
    Detached(&'static str),
}
