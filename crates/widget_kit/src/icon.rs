//! Built-in icon set rendered as structured SVG nodes.

use widget_contract::{el, Element};

/// Namespace of every icon subtree.
pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Semantic icon identifiers used by widgets and item lists.
pub enum IconName {
    /// Submenu / disclosure arrow pointing right.
    ChevronRight,
    /// Expanded disclosure arrow.
    ChevronDown,
    /// Collapse a sidebar towards the start edge.
    CollapseLeft,
    /// Expand a collapsed sidebar.
    ExpandRight,
    /// Checked state mark.
    Checkmark,
    /// Mixed state bar.
    Indeterminate,
    /// Dismiss/remove cross.
    Close,
    /// Resize grip for left/right edges.
    GripHorizontal,
    /// Resize grip for top/bottom edges.
    GripVertical,
}

impl IconName {
    /// Every built-in icon.
    pub const ALL: [Self; 9] = [
        Self::ChevronRight,
        Self::ChevronDown,
        Self::CollapseLeft,
        Self::ExpandRight,
        Self::Checkmark,
        Self::Indeterminate,
        Self::Close,
        Self::GripHorizontal,
        Self::GripVertical,
    ];

    /// Stable token used in item lists and `data-icon` hooks.
    pub const fn token(self) -> &'static str {
        match self {
            Self::ChevronRight => "chevron-right",
            Self::ChevronDown => "chevron-down",
            Self::CollapseLeft => "collapse-left",
            Self::ExpandRight => "expand-right",
            Self::Checkmark => "checkmark",
            Self::Indeterminate => "indeterminate",
            Self::Close => "close",
            Self::GripHorizontal => "grip-horizontal",
            Self::GripVertical => "grip-vertical",
        }
    }

    /// Looks an icon up by token.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|icon| icon.token() == raw.trim())
    }

    /// SVG element for the icon.
    pub fn render<Msg>(self) -> Element<Msg> {
        match self {
            Self::ChevronRight => stroked(12, &[polyline("9 18 15 12 9 6")]),
            Self::ChevronDown => stroked(12, &[polyline("6 9 12 15 18 9")]),
            Self::CollapseLeft => stroked(
                16,
                &[polyline("11 17 6 12 11 7"), polyline("18 17 13 12 18 7")],
            ),
            Self::ExpandRight => stroked(
                16,
                &[polyline("13 17 18 12 13 7"), polyline("6 17 11 12 6 7")],
            ),
            Self::Checkmark => svg("0 0 24 24").child(
                el("polyline")
                    .attr("points", "5 13 10 17 19 6")
                    .attr("fill", "none")
                    .attr("stroke", "currentColor")
                    .attr("stroke-width", "2"),
            ),
            Self::Indeterminate => svg("0 0 24 24").child(
                el("rect")
                    .attr("x", "4")
                    .attr("y", "11")
                    .attr("width", "16")
                    .attr("height", "2")
                    .attr("rx", "1")
                    .attr("ry", "1")
                    .attr("fill", "currentColor"),
            ),
            Self::Close => svg("0 0 20 20")
                .attr("width", "14")
                .attr("height", "14")
                .attr("stroke", "currentColor")
                .attr("stroke-width", "2")
                .attr("fill", "none")
                .attr("stroke-linecap", "round")
                .child(line(6, 6, 14, 14))
                .child(line(14, 6, 6, 14)),
            Self::GripHorizontal => grip(true),
            Self::GripVertical => grip(false),
        }
        .attr("data-icon", self.token())
        .attr("aria-hidden", "true")
        .attr("focusable", "false")
    }
}

fn svg<Msg>(view_box: &str) -> Element<Msg> {
    el("svg").attr("xmlns", SVG_NS).attr("viewBox", view_box)
}

fn stroked<Msg>(size: u16, shapes: &[Element<Msg>]) -> Element<Msg> {
    svg("0 0 24 24")
        .attr("width", size.to_string())
        .attr("height", size.to_string())
        .attr("fill", "none")
        .attr("stroke", "currentColor")
        .attr("stroke-width", "2")
        .attr("stroke-linecap", "round")
        .attr("stroke-linejoin", "round")
        .children(shapes.iter().cloned())
}

fn polyline<Msg>(points: &str) -> Element<Msg> {
    el("polyline").attr("points", points)
}

fn line<Msg>(x1: u8, y1: u8, x2: u8, y2: u8) -> Element<Msg> {
    el("line")
        .attr("x1", x1.to_string())
        .attr("y1", y1.to_string())
        .attr("x2", x2.to_string())
        .attr("y2", y2.to_string())
}

fn grip<Msg>(horizontal: bool) -> Element<Msg> {
    let (width, height) = if horizontal { (4, 20) } else { (20, 4) };
    let dots = [4, 10, 16].map(|offset| {
        let (cx, cy) = if horizontal { (2, offset) } else { (offset, 2) };
        el("circle")
            .attr("cx", cx.to_string())
            .attr("cy", cy.to_string())
            .attr("r", "1.5")
    });
    svg(&format!("0 0 {width} {height}"))
        .attr("width", width.to_string())
        .attr("height", height.to_string())
        .attr("fill", "currentColor")
        .children(dots)
}

/// Dual-triangle sort indicator; `top` and `bottom` are the triangle fills.
pub fn sort_arrows<Msg>(top: &str, bottom: &str) -> Element<Msg> {
    svg("0 0 12 16")
        .class("sort-icon")
        .attr("width", "12")
        .attr("height", "16")
        .attr("aria-hidden", "true")
        .child(el("path").attr("d", "M6 1 L11 7 L1 7 Z").attr("fill", top))
        .child(el("path").attr("d", "M6 15 L11 9 L1 9 Z").attr("fill", bottom))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use widget_contract::View;

    use super::*;

    #[test]
    fn tokens_round_trip() {
        for icon in IconName::ALL {
            assert_eq!(IconName::parse(icon.token()), Some(icon));
        }
        assert_eq!(IconName::parse("rocket"), None);
    }

    #[test]
    fn grip_orientation_controls_dot_layout() {
        let view: View<()> = View::default().child(IconName::GripVertical.render());
        let dots = view.query_all("circle");
        assert_eq!(dots.len(), 3);
        assert_eq!(dots[1].attribute("cx"), Some("10"));
        assert_eq!(dots[1].attribute("cy"), Some("2"));
    }
}
