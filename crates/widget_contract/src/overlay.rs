//! Anchored overlay placement and dismissal rules.

use crate::{
    host::{AnchorRef, ElementKey, Rect, Viewport},
    tree::DomEvent,
};

/// Minimum distance kept between an overlay and the viewport edges.
pub const VIEWPORT_MARGIN: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Preferred side of the anchor.
pub enum Direction {
    /// Below the anchor, left edges aligned; flips above.
    #[default]
    Down,
    /// Right of the anchor, top edges aligned; flips to the left.
    Right,
}

impl Direction {
    /// Attribute token.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Down => "down",
            Self::Right => "right",
        }
    }

    /// Parses a `direction` attribute; unknown values fall back to down.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("right") => Self::Right,
            _ => Self::Down,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// Top-left corner of a fixed-position overlay.
pub struct Placement {
    /// `left` in CSS pixels.
    pub left: f64,
    /// `top` in CSS pixels.
    pub top: f64,
}

/// Places an overlay of `width`×`height` next to `anchor`.
///
/// The preferred side is tried first; when the overlay would cross the viewport edge
/// it flips to the opposite side, and the result is clamped so the overlay keeps
/// [`VIEWPORT_MARGIN`] from every edge.
pub fn place(
    anchor: Rect,
    width: f64,
    height: f64,
    viewport: Viewport,
    direction: Direction,
) -> Placement {
    let (mut left, mut top) = match direction {
        Direction::Down => (anchor.x, anchor.bottom()),
        Direction::Right => (anchor.right(), anchor.y),
    };

    match direction {
        Direction::Down => {
            if top + height > viewport.height {
                top = anchor.y - height;
            }
            if left + width > viewport.width {
                left = viewport.width - width - VIEWPORT_MARGIN;
            }
        }
        Direction::Right => {
            if left + width > viewport.width {
                left = anchor.x - width;
            }
            if top + height > viewport.height {
                top = viewport.height - height - VIEWPORT_MARGIN;
            }
        }
    }

    Placement {
        left: clamp_axis(left, width, viewport.width),
        top: clamp_axis(top, height, viewport.height),
    }
}

fn clamp_axis(position: f64, extent: f64, available: f64) -> f64 {
    let max = available - extent - VIEWPORT_MARGIN;
    position.min(max).max(VIEWPORT_MARGIN)
}

/// Returns whether a document-level event happened outside both the overlay host
/// and its anchor.
pub fn is_outside(event: &DomEvent, overlay: ElementKey, anchor: Option<&AnchorRef>) -> bool {
    if event.passes_through(overlay) {
        return false;
    }
    !anchor.is_some_and(|anchor| event.passes_through(anchor.key))
}

/// Returns whether the event is an `Escape` key press.
pub fn is_escape(event: &DomEvent) -> bool {
    event.key.as_deref() == Some("Escape")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const VIEWPORT: Viewport = Viewport {
        width: 800.0,
        height: 600.0,
    };

    #[test]
    fn prefers_below_the_anchor() {
        let anchor = Rect::new(100.0, 50.0, 80.0, 30.0);
        assert_eq!(
            place(anchor, 150.0, 200.0, VIEWPORT, Direction::Down),
            Placement {
                left: 100.0,
                top: 80.0
            }
        );
    }

    #[test]
    fn flips_above_when_space_runs_out() {
        let anchor = Rect::new(100.0, 500.0, 80.0, 30.0);
        assert_eq!(
            place(anchor, 150.0, 200.0, VIEWPORT, Direction::Down),
            Placement {
                left: 100.0,
                top: 300.0
            }
        );
    }

    #[test]
    fn clamps_to_viewport_margin() {
        let anchor = Rect::new(750.0, 0.0, 40.0, 5.0);
        let placement = place(anchor, 150.0, 700.0, VIEWPORT, Direction::Down);
        assert_eq!(placement.left, 800.0 - 150.0 - VIEWPORT_MARGIN);
        assert_eq!(placement.top, VIEWPORT_MARGIN);
    }

    #[test]
    fn right_direction_flips_to_the_left() {
        let anchor = Rect::new(700.0, 100.0, 50.0, 30.0);
        assert_eq!(
            place(anchor, 150.0, 100.0, VIEWPORT, Direction::Right),
            Placement {
                left: 550.0,
                top: 100.0
            }
        );
    }

    #[test]
    fn outside_checks_overlay_and_anchor() {
        let overlay = ElementKey(1);
        let anchor = AnchorRef::from_key(ElementKey(2));
        let inside = DomEvent::default().with_path(vec![ElementKey(1)]);
        let on_anchor = DomEvent::default().with_path(vec![ElementKey(2)]);
        let elsewhere = DomEvent::default().with_path(vec![ElementKey(9)]);
        assert!(!is_outside(&inside, overlay, Some(&anchor)));
        assert!(!is_outside(&on_anchor, overlay, Some(&anchor)));
        assert!(is_outside(&elsewhere, overlay, Some(&anchor)));
        assert!(is_outside(&on_anchor, overlay, None));
    }
}
