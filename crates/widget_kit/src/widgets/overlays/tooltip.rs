use serde_json::Value;
use widget_contract::{
    el, overlay::is_escape, slot,
    style::{contrast_text_color, literal_fallback, var},
    ColorRole, Context, EventKind, ListenTarget, Patch, RenderContext, SemanticColor,
    Subscription, Update, View, Widget, WidgetColor,
};

const DEFAULT_DELAY_MS: u32 = 200;
const BASE_BACKGROUND: &str = "#555";

const CSS: &str = r#"
:host {
  display: inline-block;
  position: relative;
  font-family: var(--font-family-body, sans-serif);
}
.trigger { display: inline-block; }
.tooltip {
  position: absolute;
  z-index: 9999;
  white-space: nowrap;
  pointer-events: none;
  opacity: 0;
  transition: opacity 0.15s ease, transform 0.15s ease;
  padding: var(--component-tooltip-padding, var(--spacing-x-small, 4px)) var(--component-tooltip-padding-h, var(--spacing-medium, 8px));
  border-radius: var(--component-tooltip-border-radius, var(--radii-small, 4px));
  font-size: var(--font-size-small, 0.8em);
  line-height: 1.4;
}
.tooltip.visible { opacity: 1; }
.tooltip::after { content: ""; position: absolute; border: 5px solid transparent; }
.tooltip.top { bottom: 100%; left: 50%; transform: translateX(-50%) scale(0.95); margin-bottom: 6px; }
.tooltip.top.visible { transform: translateX(-50%) scale(1); }
.tooltip.top::after { top: 100%; left: 50%; transform: translateX(-50%); border-top-color: var(--tooltip-background); }
.tooltip.bottom { top: 100%; left: 50%; transform: translateX(-50%) scale(0.95); margin-top: 6px; }
.tooltip.bottom.visible { transform: translateX(-50%) scale(1); }
.tooltip.bottom::after { bottom: 100%; left: 50%; transform: translateX(-50%); border-bottom-color: var(--tooltip-background); }
.tooltip.left { right: 100%; top: 50%; transform: translateY(-50%) scale(0.95); margin-right: 6px; }
.tooltip.left.visible { transform: translateY(-50%) scale(1); }
.tooltip.left::after { left: 100%; top: 50%; transform: translateY(-50%); border-left-color: var(--tooltip-background); }
.tooltip.right { left: 100%; top: 50%; transform: translateY(-50%) scale(0.95); margin-left: 6px; }
.tooltip.right.visible { transform: translateY(-50%) scale(1); }
.tooltip.right::after { right: 100%; top: 50%; transform: translateY(-50%); border-right-color: var(--tooltip-background); }
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Side of the trigger the bubble appears on.
pub enum TooltipPosition {
    /// Above the trigger.
    #[default]
    Top,
    /// Below the trigger.
    Bottom,
    /// Left of the trigger.
    Left,
    /// Right of the trigger.
    Right,
}

impl TooltipPosition {
    /// Parses a `position` attribute; unknown values fall back to top.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("bottom") => Self::Bottom,
            Some("left") => Self::Left,
            Some("right") => Self::Right,
            _ => Self::Top,
        }
    }

    /// Class token.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Background value and the contrasting text color for a tooltip `color`.
///
/// The neutral tooltip is darker than the base content color so it reads as an
/// overlay on light surfaces.
pub fn tooltip_colors(color: &WidgetColor) -> (String, &'static str) {
    match color {
        WidgetColor::Semantic(SemanticColor::Base) => (
            var("--base-content--", BASE_BACKGROUND),
            contrast_text_color(BASE_BACKGROUND),
        ),
        WidgetColor::Semantic(semantic) => {
            let literal = literal_fallback(ColorRole::Content, *semantic);
            (color.resolve(ColorRole::Content), contrast_text_color(literal))
        }
        WidgetColor::Literal(literal) => (literal.clone(), contrast_text_color(literal)),
    }
}

#[derive(Debug, Clone)]
/// Tooltip messages.
pub enum TooltipMsg {
    /// Pointer entered or focus moved in: start the delay.
    Show,
    /// Delay elapsed.
    Reveal,
    /// Pointer left, focus moved out, Escape or `hide()`.
    Hide,
}

#[derive(Debug, Default)]
/// `y-tooltip`: delayed hover/focus bubble around slotted trigger content.
pub struct Tooltip {
    visible: bool,
    delay: Option<Subscription>,
    escape: Option<Subscription>,
}

impl Tooltip {
    fn delay_ms(cx: &Context<'_, Self>) -> u32 {
        cx.attrs()
            .number("delay")
            .filter(|delay| *delay >= 0.0)
            .map_or(DEFAULT_DELAY_MS, |delay| delay as u32)
    }
}

impl Widget for Tooltip {
    type Msg = TooltipMsg;

    const TAG: &'static str = "y-tooltip";
    const OBSERVED: &'static [&'static str] = &["text", "position", "delay", "color"];

    fn create() -> Self {
        Self::default()
    }

    fn attached(&mut self, cx: &mut Context<'_, Self>) {
        let own = ListenTarget::Element(cx.key());
        for (kind, msg) in [
            (EventKind::MouseEnter, TooltipMsg::Show),
            (EventKind::FocusIn, TooltipMsg::Show),
            (EventKind::MouseLeave, TooltipMsg::Hide),
            (EventKind::FocusOut, TooltipMsg::Hide),
        ] {
            let sub = cx.listen(own, kind, false, move |_| Some(msg.clone()));
            cx.retain(sub);
        }
    }

    fn attribute_changed(
        &mut self,
        _cx: &mut Context<'_, Self>,
        name: &str,
        _old: Option<&str>,
        _new: Option<&str>,
    ) -> Update {
        match name {
            "delay" => Update::None,
            _ => Update::Render,
        }
    }

    fn update(&mut self, cx: &mut Context<'_, Self>, msg: TooltipMsg) -> Update {
        match msg {
            TooltipMsg::Show => {
                self.delay = Some(cx.timeout(Self::delay_ms(cx), TooltipMsg::Reveal));
                if self.escape.is_none() {
                    self.escape = Some(cx.listen(
                        ListenTarget::Document,
                        EventKind::KeyDown,
                        false,
                        |event| is_escape(event).then_some(TooltipMsg::Hide),
                    ));
                }
                Update::None
            }
            TooltipMsg::Reveal => {
                self.delay = None;
                self.visible = true;
                Update::Patch(vec![Patch::class(".tooltip", "visible", true)])
            }
            TooltipMsg::Hide => {
                self.delay = None;
                self.escape = None;
                if !self.visible {
                    return Update::None;
                }
                self.visible = false;
                Update::Patch(vec![Patch::class(".tooltip", "visible", false)])
            }
        }
    }

    fn render(&self, cx: &RenderContext<'_>) -> View<TooltipMsg> {
        let position = TooltipPosition::parse(cx.attrs.get("position"));
        let color = WidgetColor::parse(cx.attrs.get("color"), SemanticColor::Base);
        let (background, foreground) = tooltip_colors(&color);
        View::new(CSS)
            .child(slot(None).class("trigger"))
            .child(
                el("div")
                    .class("tooltip")
                    .class(position.token())
                    .class_if(self.visible, "visible")
                    .attr("part", "tooltip")
                    .attr("role", "tooltip")
                    .style("--tooltip-background", background.clone())
                    .style("background", background)
                    .style("color", foreground)
                    .text(cx.attrs.get("text").unwrap_or_default()),
            )
    }

    fn detached(&mut self, _cx: &mut Context<'_, Self>) {
        self.delay = None;
        self.escape = None;
        self.visible = false;
    }

    fn method(name: &str, _args: &Value) -> Option<Result<TooltipMsg, String>> {
        match name {
            "show" => Some(Ok(TooltipMsg::Show)),
            "hide" => Some(Ok(TooltipMsg::Hide)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use widget_contract::{
        headless::{mount, HeadlessHost, Mounted},
        DomEvent,
    };

    use super::*;

    fn bubble_visible(tooltip: &Mounted<Tooltip>) -> bool {
        tooltip.with_view(|view| {
            view.query(".tooltip")
                .is_some_and(|tip| tip.has_class("visible"))
        })
    }

    fn enter(host: &HeadlessHost, tooltip: &Mounted<Tooltip>, kind: EventKind) {
        host.dispatch_at(tooltip.key(), kind, DomEvent::default());
    }

    #[test]
    fn shows_after_the_delay() {
        let host = HeadlessHost::new();
        let tooltip = mount::<Tooltip>(&host, &[("text", "Save changes")]);
        enter(&host, &tooltip, EventKind::MouseEnter);
        host.advance(199);
        assert!(!bubble_visible(&tooltip));
        host.advance(1);
        assert!(bubble_visible(&tooltip));
        assert_eq!(
            tooltip.with_view(|view| view.query("[role=\"tooltip\"]").map(|tip| tip.text_content())),
            Some("Save changes".to_string())
        );
    }

    #[test]
    fn leaving_before_the_delay_cancels_the_timer() {
        let host = HeadlessHost::new();
        let tooltip = mount::<Tooltip>(&host, &[("delay", "500")]);
        enter(&host, &tooltip, EventKind::FocusIn);
        host.advance(100);
        enter(&host, &tooltip, EventKind::FocusOut);
        assert_eq!(host.pending_timers(), 0);
        host.advance(1000);
        assert!(!bubble_visible(&tooltip));
    }

    #[test]
    fn escape_hides_and_releases_the_keyboard_listener() {
        let host = HeadlessHost::new();
        let tooltip = mount::<Tooltip>(&host, &[("delay", "0")]);
        enter(&host, &tooltip, EventKind::MouseEnter);
        host.advance(0);
        assert!(bubble_visible(&tooltip));
        host.press_key("Escape");
        assert!(!bubble_visible(&tooltip));
        assert_eq!(
            host.listener_count(ListenTarget::Document, EventKind::KeyDown),
            0
        );
    }

    #[test]
    fn position_and_contrast_follow_attributes() {
        let host = HeadlessHost::new();
        let tooltip = mount::<Tooltip>(&host, &[("position", "sideways"), ("color", "warning")]);
        tooltip.with_view(|view| {
            let tip = view.query(".tooltip").expect("tooltip");
            assert!(tip.has_class("top"));
            assert_eq!(tip.style_value("color"), Some("#000"));
        });
        tooltip.set_attribute("position", "left");
        tooltip.remove_attribute("color");
        tooltip.with_view(|view| {
            let tip = view.query(".tooltip").expect("tooltip");
            assert!(tip.has_class("left"));
            assert_eq!(tip.style_value("color"), Some("#fff"));
        });
    }

    #[test]
    fn detach_clears_listeners_and_pending_delay() {
        let host = HeadlessHost::new();
        let tooltip = mount::<Tooltip>(&host, &[]);
        assert_eq!(host.total_listeners(), 4);
        enter(&host, &tooltip, EventKind::MouseEnter);
        tooltip.detach();
        assert_eq!(host.total_listeners(), 0);
        assert_eq!(host.pending_timers(), 0);
    }
}
