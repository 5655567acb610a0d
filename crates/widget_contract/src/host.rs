//! Host services consumed by widgets: ambient listeners, timers, frames, geometry and
//! navigation.
//!
//! Every registration returns a [`Subscription`]. Dropping the handle (or calling
//! [`Subscription::cancel`]) releases the registration exactly once, so widgets pair
//! attach/detach and show/hide by owning handles instead of remembering to remove
//! listeners.

use std::{fmt, rc::Rc};

use crate::tree::{DomEvent, EventKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Host-assigned identity of an element known to the host (widget hosts and anchors).
pub struct ElementKey(pub u64);

#[derive(Debug, Clone, Copy, Default, PartialEq)]
/// Viewport-space rectangle.
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Rect {
    /// Rectangle from position and size.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// Visible viewport size.
pub struct Viewport {
    /// Width in CSS pixels.
    pub width: f64,
    /// Height in CSS pixels.
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1024.0,
            height: 768.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Where an ambient listener is registered.
pub enum ListenTarget {
    /// `document`.
    Document,
    /// `window`.
    Window,
    /// A known element (anchor or widget host).
    Element(ElementKey),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Non-owning reference from an overlay to its triggering element.
pub struct AnchorRef {
    /// Host identity of the anchor element.
    pub key: ElementKey,
    /// `id` used to resolve the anchor, when resolved by id.
    pub id: Option<String>,
}

impl AnchorRef {
    /// Explicit handle, not tied to an id lookup.
    pub fn from_key(key: ElementKey) -> Self {
        Self { key, id: None }
    }
}

/// Registration handle. Releases its registration once, on drop or [`Self::cancel`].
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Handle that runs `release` when dropped.
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Handle for a registration that needs no teardown.
    pub fn inert() -> Self {
        Self { release: None }
    }

    /// Releases the registration now.
    pub fn cancel(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

/// Receiver for ambient events.
pub type EventSink = Rc<dyn Fn(&DomEvent)>;

/// One-shot timer or frame callback.
pub type Callback = Box<dyn FnOnce()>;

/// Services a widget needs from its surroundings.
pub trait WidgetHost {
    /// Registers `sink` for `kind` on `target`; `capture` selects the capture phase.
    fn listen(
        &self,
        target: ListenTarget,
        kind: EventKind,
        capture: bool,
        sink: EventSink,
    ) -> Subscription;

    /// Runs `callback` after `delay_ms` unless the handle is released first.
    fn set_timeout(&self, delay_ms: u32, callback: Callback) -> Subscription;

    /// Runs `callback` before the next paint unless the handle is released first.
    fn request_frame(&self, callback: Callback) -> Subscription;

    /// Current viewport size.
    fn viewport(&self) -> Viewport;

    /// Bounding rectangle of a known element.
    fn element_rect(&self, key: ElementKey) -> Option<Rect>;

    /// Finds the element with `id` in the same root as `scope`.
    fn resolve_anchor(&self, scope: ElementKey, id: &str) -> Option<AnchorRef>;

    /// Computed transition duration of the element matching `selector` inside the
    /// rendering root of `key`.
    fn transition_duration_ms(&self, key: ElementKey, selector: &str) -> u32;

    /// Navigates to `href`, pushing a history entry when `push_history`.
    fn navigate(&self, href: &str, push_history: bool);

    /// Requests submission of the form enclosing `key`.
    fn request_form_submit(&self, key: ElementKey);

    /// Current location path (`location.pathname`).
    fn location_path(&self) -> String;

    /// Nearest ancestor of `key` (excluding itself) whose tag is `tag`, across shadow
    /// boundaries.
    fn closest(&self, key: ElementKey, tag: &str) -> Option<ElementKey>;

    /// Attribute value on a known element.
    fn element_attribute(&self, key: ElementKey, name: &str) -> Option<String>;
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn subscription_releases_exactly_once() {
        let released = Rc::new(Cell::new(0));
        let counter = Rc::clone(&released);
        let subscription = Subscription::new(move || counter.set(counter.get() + 1));
        subscription.cancel();
        assert_eq!(released.get(), 1);

        let counter = Rc::clone(&released);
        {
            let _subscription = Subscription::new(move || counter.set(counter.get() + 1));
        }
        assert_eq!(released.get(), 2);
    }

    #[test]
    fn rect_edges() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(rect.right(), 40.0);
        assert_eq!(rect.bottom(), 60.0);
    }
}
