//! Failures of the browser bridge.

use thiserror::Error;
use widget_contract::WidgetError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Browser bridge failures. Upgrades that hit one leave the element as plain markup.
pub enum HostError {
    /// `window` or `document` is unavailable (not running in a browser).
    #[error("browser document is unavailable")]
    NoDocument,
    /// The element already has a closed shadow root or cannot host one.
    #[error("`{tag}` cannot attach a shadow root: {reason}")]
    ShadowRoot {
        /// Element tag.
        tag: String,
        /// Browser message.
        reason: String,
    },
    /// A DOM call threw.
    #[error("DOM call `{call}` failed: {reason}")]
    Dom {
        /// API that failed.
        call: &'static str,
        /// Browser message.
        reason: String,
    },
    /// No widget is registered for the element's tag.
    #[error("no widget registered for `{0}`")]
    Unregistered(String),
    /// The element has no widget bound to it yet.
    #[error("`{0}` has not been upgraded")]
    NotUpgraded(String),
    /// The widget layer rejected the operation.
    #[error(transparent)]
    Widget(#[from] WidgetError),
}

impl HostError {
    pub(crate) fn dom(call: &'static str, err: impl std::fmt::Debug) -> Self {
        Self::Dom {
            call,
            reason: format!("{err:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn widget_errors_pass_through_unchanged() {
        let err = HostError::from(WidgetError::UnknownTag("y-carousel".to_string()));
        assert_eq!(err.to_string(), "unknown widget tag `y-carousel`");
        assert_eq!(
            HostError::dom("appendChild", "HierarchyRequestError").to_string(),
            "DOM call `appendChild` failed: \"HierarchyRequestError\""
        );
    }
}
