use serde_json::Value;
use widget_contract::{
    el, format_number, overlay::is_escape, slot, AnchorRef, Context, EventKind, ListenTarget,
    Patch, RenderContext, Subscription, Update, View, Widget,
};

use crate::{
    anchoring::{anchor_argument, AnchorBinding},
    icon::IconName,
};

const CSS: &str = r#"
:host { position: fixed; inset: 0; display: none; z-index: 1000; }
:host([visible]) { display: block; }
.overlay {
  position: absolute;
  inset: 0;
  background: rgba(0, 0, 0, 0);
  transition: background var(--drawer-transition-duration, 0.3s) ease;
}
.overlay.open { background: rgba(0, 0, 0, 0.4); }
.drawer-panel {
  position: absolute;
  background: var(--component-drawer-background, var(--base-background-component, #ffffff));
  color: var(--component-drawer-color, var(--base-content--, #1d1d1d));
  box-shadow: 0 2px 10px rgba(0, 0, 0, 0.3);
  overflow: hidden;
  outline: none;
  display: flex;
  flex-direction: column;
  border: none;
  border-radius: var(--component-drawer-border-radius, 0);
  transition: transform var(--drawer-transition-duration, 0.3s) ease;
}
.drawer-panel[data-position="left"], .drawer-panel[data-position="right"] {
  top: 0;
  bottom: 0;
  width: var(--drawer-width, 300px);
  flex-direction: row;
}
.drawer-panel[data-position="left"] {
  left: 0;
  transform: translateX(-100%);
  border-right: var(--component-drawer-border-width, 2px) solid var(--component-drawer-border-color, #cccccc);
}
.drawer-panel[data-position="right"] {
  right: 0;
  transform: translateX(100%);
  border-left: var(--component-drawer-border-width, 2px) solid var(--component-drawer-border-color, #cccccc);
}
.drawer-panel[data-position="top"], .drawer-panel[data-position="bottom"] {
  left: 0;
  right: 0;
  height: var(--drawer-height, 300px);
}
.drawer-panel[data-position="top"] {
  top: 0;
  transform: translateY(-100%);
  border-bottom: var(--component-drawer-border-width, 2px) solid var(--component-drawer-border-color, #cccccc);
}
.drawer-panel[data-position="bottom"] {
  bottom: 0;
  transform: translateY(100%);
  border-top: var(--component-drawer-border-width, 2px) solid var(--component-drawer-border-color, #cccccc);
}
.drawer-panel.open { transform: translate(0, 0); }
.drawer-header { padding: var(--component-drawer-padding, 1rem); font-weight: bold; }
.drawer-body { padding: var(--component-drawer-padding, 1rem); flex: 1; overflow: auto; }
.drawer-footer { padding: var(--component-drawer-padding, 1rem); }
.drawer-content { display: flex; flex-direction: column; flex: 1; min-width: 0; min-height: 0; overflow: hidden; }
::slotted(*) { margin: 0; }
.resize-handle {
  flex-shrink: 0;
  align-items: center;
  justify-content: center;
  color: var(--component-drawer-color, #999999);
  opacity: 0.6;
  touch-action: none;
  user-select: none;
  transition: opacity 0.15s, background 0.15s;
}
.resize-handle:hover, .resize-handle:active {
  opacity: 1;
  background: var(--component-drawer-hover-background, rgba(128, 128, 128, 0.15));
}
.drawer-panel[data-position="left"] > .resize-handle,
.drawer-panel[data-position="right"] > .resize-handle {
  width: var(--component-drawer-handle-width, 6px);
  padding: var(--component-drawer-handle-padding, 4px);
  cursor: ew-resize;
}
.drawer-panel[data-position="top"] > .resize-handle,
.drawer-panel[data-position="bottom"] > .resize-handle {
  height: var(--component-drawer-handle-width, 6px);
  padding: var(--component-drawer-handle-padding, 4px);
  cursor: ns-resize;
}
.drawer-panel[data-position="left"] > .resize-handle,
.drawer-panel[data-position="top"] > .resize-handle { order: 99; }
.drawer-panel[data-position="right"] > .resize-handle,
.drawer-panel[data-position="bottom"] > .resize-handle { order: -1; }
"#;

/// Smallest width or height a resize drag can produce.
pub const MIN_DRAWER_SIZE: f64 = 100.0;
const DEFAULT_DRAWER_SIZE: f64 = 300.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Edge the drawer slides in from.
pub enum DrawerPosition {
    /// Left edge.
    #[default]
    Left,
    /// Right edge.
    Right,
    /// Top edge.
    Top,
    /// Bottom edge.
    Bottom,
}

impl DrawerPosition {
    /// Parses a `position` attribute; unknown values fall back to left.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("right") => Self::Right,
            Some("top") => Self::Top,
            Some("bottom") => Self::Bottom,
            _ => Self::Left,
        }
    }

    /// Attribute token.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }

    /// Left and right drawers resize their width.
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// Size after the pointer moved `delta` pixels along the resize axis, clamped to
    /// [`MIN_DRAWER_SIZE`].
    pub fn resized(self, start: f64, delta: f64) -> f64 {
        let size = match self {
            Self::Left | Self::Top => start + delta,
            Self::Right | Self::Bottom => start - delta,
        };
        size.max(MIN_DRAWER_SIZE)
    }

    fn dimension(self) -> &'static str {
        if self.is_horizontal() {
            "width"
        } else {
            "height"
        }
    }
}

#[derive(Debug, Clone)]
/// Drawer messages.
pub enum DrawerMsg {
    /// Anchor click or `toggle()`.
    Toggle,
    /// `show()`.
    Show,
    /// Escape, scrim click or `hide()`.
    Hide,
    /// Frame after becoming visible: start the slide-in.
    Opened,
    /// Exit transition finished.
    HideFinished,
    /// Explicit anchor handle.
    SetAnchor(AnchorRef),
    /// Pointer pressed on the resize handle.
    ResizeStart {
        /// Pointer x.
        x: f64,
        /// Pointer y.
        y: f64,
    },
    /// Pointer moved during a resize.
    ResizeMove {
        /// Pointer x.
        x: f64,
        /// Pointer y.
        y: f64,
    },
    /// Pointer released.
    ResizeEnd,
}

#[derive(Debug, Default)]
struct ResizeGesture {
    start_pointer: f64,
    start_size: f64,
    _listeners: Vec<Subscription>,
}

#[derive(Debug, Default)]
/// `y-drawer`: edge-anchored sliding panel with optional resize handle.
pub struct Drawer {
    anchor: AnchorBinding,
    escape: Option<Subscription>,
    frame: Option<Subscription>,
    hide_timer: Option<Subscription>,
    resize: Option<ResizeGesture>,
    size: Option<f64>,
}

impl Drawer {
    fn open_patches(open: bool) -> Vec<Patch> {
        vec![
            Patch::class(".overlay", "open", open),
            Patch::class(".drawer-panel", "open", open),
        ]
    }

    fn show(&mut self, cx: &mut Context<'_, Self>) {
        self.hide_timer = None;
        cx.set_host_style("display", "block");
        self.frame = Some(cx.next_frame(DrawerMsg::Opened));
        self.escape = Some(cx.listen(
            ListenTarget::Document,
            EventKind::KeyDown,
            false,
            |event| is_escape(event).then_some(DrawerMsg::Hide),
        ));
    }

    fn hide(&mut self, cx: &mut Context<'_, Self>) -> Update {
        self.frame = None;
        self.escape = None;
        self.resize = None;
        let duration = cx.host().transition_duration_ms(cx.key(), ".drawer-panel");
        if duration > 0 {
            self.hide_timer = Some(cx.timeout(duration, DrawerMsg::HideFinished));
        } else {
            cx.set_host_style("display", "none");
        }
        Update::Patch(Self::open_patches(false))
    }
}

impl Widget for Drawer {
    type Msg = DrawerMsg;

    const TAG: &'static str = "y-drawer";
    const OBSERVED: &'static [&'static str] = &["visible", "anchor", "position", "resizable"];
    const DEFAULTS: &'static [(&'static str, &'static str)] = &[("position", "left")];

    fn create() -> Self {
        Self::default()
    }

    fn attached(&mut self, cx: &mut Context<'_, Self>) {
        self.anchor.resolve(cx, Some(DrawerMsg::Toggle));
        if cx.has("visible") {
            self.show(cx);
        } else {
            cx.set_host_style("display", "none");
        }
    }

    fn attribute_changed(
        &mut self,
        cx: &mut Context<'_, Self>,
        name: &str,
        _old: Option<&str>,
        _new: Option<&str>,
    ) -> Update {
        match name {
            "visible" if cx.has("visible") => {
                self.show(cx);
                Update::None
            }
            "visible" => self.hide(cx),
            "anchor" => {
                self.anchor.clear_explicit();
                self.anchor.resolve(cx, Some(DrawerMsg::Toggle));
                Update::None
            }
            "position" => {
                self.size = None;
                self.resize = None;
                Update::Render
            }
            _ => Update::Patch(vec![Patch::style(
                ".resize-handle",
                "display",
                if cx.has("resizable") { "flex" } else { "none" },
            )]),
        }
    }

    fn update(&mut self, cx: &mut Context<'_, Self>, msg: DrawerMsg) -> Update {
        let position = DrawerPosition::parse(cx.attribute("position"));
        match msg {
            DrawerMsg::Toggle => {
                let visible = cx.has("visible");
                cx.set_flag("visible", !visible);
            }
            DrawerMsg::Show => cx.set_flag("visible", true),
            DrawerMsg::Hide => cx.set_flag("visible", false),
            DrawerMsg::Opened => {
                self.frame = None;
                if cx.has("visible") {
                    cx.focus(".drawer-panel");
                    return Update::Patch(Self::open_patches(true));
                }
            }
            DrawerMsg::HideFinished => {
                self.hide_timer = None;
                if !cx.has("visible") {
                    cx.set_host_style("display", "none");
                }
            }
            DrawerMsg::SetAnchor(anchor) => {
                self.anchor.set_explicit(cx, anchor, Some(DrawerMsg::Toggle));
            }
            DrawerMsg::ResizeStart { x, y } => {
                if !cx.has("resizable") {
                    return Update::None;
                }
                let listeners = vec![
                    cx.listen(ListenTarget::Document, EventKind::PointerMove, false, |event| {
                        Some(DrawerMsg::ResizeMove {
                            x: event.client_x,
                            y: event.client_y,
                        })
                    }),
                    cx.listen(ListenTarget::Document, EventKind::PointerUp, false, |_| {
                        Some(DrawerMsg::ResizeEnd)
                    }),
                ];
                self.resize = Some(ResizeGesture {
                    start_pointer: if position.is_horizontal() { x } else { y },
                    start_size: self.size.unwrap_or(DEFAULT_DRAWER_SIZE),
                    _listeners: listeners,
                });
                return Update::Patch(vec![Patch::style(".drawer-panel", "transition", "none")]);
            }
            DrawerMsg::ResizeMove { x, y } => {
                let Some(gesture) = &self.resize else {
                    return Update::None;
                };
                let pointer = if position.is_horizontal() { x } else { y };
                let size = position.resized(gesture.start_size, pointer - gesture.start_pointer);
                self.size = Some(size);
                return Update::Patch(vec![Patch::style(
                    ".drawer-panel",
                    position.dimension(),
                    format!("{}px", format_number(size)),
                )]);
            }
            DrawerMsg::ResizeEnd => {
                if self.resize.take().is_some() {
                    return Update::Patch(vec![Patch::style(".drawer-panel", "transition", "")]);
                }
            }
        }
        Update::None
    }

    fn render(&self, cx: &RenderContext<'_>) -> View<DrawerMsg> {
        let position = DrawerPosition::parse(cx.attrs.get("position"));
        let open = cx.attrs.has("visible") && self.frame.is_none();
        let grip = if position.is_horizontal() {
            IconName::GripHorizontal
        } else {
            IconName::GripVertical
        };
        let section = |class: &str, name: &str| el("div").class(class).child(slot(Some(name)));

        View::new(CSS)
            .child(
                el("div")
                    .class("overlay")
                    .attr("part", "overlay")
                    .class_if(open, "open")
                    .on(EventKind::Click, DrawerMsg::Hide),
            )
            .child(
                el("div")
                    .class("drawer-panel")
                    .attr("part", "panel")
                    .class_if(open, "open")
                    .attr("role", "dialog")
                    .attr("aria-modal", "true")
                    .attr("tabindex", "-1")
                    .attr("data-position", position.token())
                    .attr_opt(
                        "style",
                        self.size
                            .map(|size| format!("{}: {}px", position.dimension(), format_number(size))),
                    )
                    .child(
                        el("div")
                            .class("resize-handle")
                            .attr("part", "resize-handle")
                            .style(
                                "display",
                                if cx.attrs.has("resizable") { "flex" } else { "none" },
                            )
                            .child(grip.render())
                            .on_with(EventKind::PointerDown, |event| {
                                Some(DrawerMsg::ResizeStart {
                                    x: event.client_x,
                                    y: event.client_y,
                                })
                            }),
                    )
                    .child(
                        el("div")
                            .class("drawer-content")
                            .child(section("drawer-header", "header"))
                            .child(section("drawer-body", "body"))
                            .child(section("drawer-footer", "footer")),
                    ),
            )
    }

    fn detached(&mut self, _cx: &mut Context<'_, Self>) {
        self.anchor.release();
        self.escape = None;
        self.frame = None;
        self.hide_timer = None;
        self.resize = None;
    }

    fn method(name: &str, args: &Value) -> Option<Result<DrawerMsg, String>> {
        match name {
            "show" => Some(Ok(DrawerMsg::Show)),
            "hide" => Some(Ok(DrawerMsg::Hide)),
            "toggle" => Some(Ok(DrawerMsg::Toggle)),
            "setAnchor" => Some(anchor_argument(args).map(DrawerMsg::SetAnchor)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use widget_contract::{
        headless::{mount, HeadlessHost, Mounted},
        DomEvent, Rect,
    };

    use super::*;

    fn panel_is_open(drawer: &Mounted<Drawer>) -> bool {
        drawer.with_view(|view| {
            view.query(".drawer-panel")
                .is_some_and(|panel| panel.has_class("open"))
        })
    }

    #[test]
    fn slides_in_after_one_frame() {
        let host = HeadlessHost::new();
        let trigger = host.add_element(Some("menu-toggle"), Rect::default());
        let drawer = mount::<Drawer>(&host, &[("anchor", "menu-toggle")]);
        assert_eq!(drawer.host_style("display").as_deref(), Some("none"));

        host.click(trigger);
        assert_eq!(drawer.host_style("display").as_deref(), Some("block"));
        assert!(!panel_is_open(&drawer));
        host.flush_frames();
        assert!(panel_is_open(&drawer));
        assert_eq!(drawer.log().focused, [".drawer-panel"]);
    }

    #[test]
    fn hide_waits_for_the_transition() {
        let host = HeadlessHost::new();
        let drawer = mount::<Drawer>(&host, &[("visible", "")]);
        host.flush_frames();
        host.set_transition_ms(drawer.key(), 300);

        drawer.click(".overlay");
        assert!(!drawer.has_attribute("visible"));
        assert!(!panel_is_open(&drawer));
        assert_eq!(drawer.host_style("display").as_deref(), Some("block"));
        host.advance(299);
        assert_eq!(drawer.host_style("display").as_deref(), Some("block"));
        host.advance(1);
        assert_eq!(drawer.host_style("display").as_deref(), Some("none"));
    }

    #[test]
    fn reopening_cancels_a_pending_hide() {
        let host = HeadlessHost::new();
        let drawer = mount::<Drawer>(&host, &[("visible", "")]);
        host.set_transition_ms(drawer.key(), 300);
        drawer.invoke("hide", &json!(null)).expect("hide");
        drawer.invoke("show", &json!(null)).expect("show");
        host.advance(500);
        assert_eq!(drawer.host_style("display").as_deref(), Some("block"));
        assert_eq!(host.pending_timers(), 0);
    }

    #[test]
    fn zero_transition_hides_immediately_and_escape_closes() {
        let host = HeadlessHost::new();
        let drawer = mount::<Drawer>(&host, &[("visible", "")]);
        host.press_key("Escape");
        assert!(!drawer.has_attribute("visible"));
        assert_eq!(drawer.host_style("display").as_deref(), Some("none"));
        assert_eq!(host.total_listeners(), 0);
    }

    #[test]
    fn resize_drag_clamps_to_minimum() {
        let host = HeadlessHost::new();
        let drawer = mount::<Drawer>(&host, &[("visible", ""), ("resizable", "")]);
        host.flush_frames();
        drawer.fire(
            ".resize-handle",
            EventKind::PointerDown,
            DomEvent::pointer(300.0, 10.0),
        );
        host.pointer_move(360.0, 10.0);
        let width = || {
            drawer.with_view(|view| {
                view.query(".drawer-panel")
                    .and_then(|panel| panel.style_value("width"))
                    .map(str::to_string)
            })
        };
        assert_eq!(width().as_deref(), Some("360px"));
        host.pointer_move(0.0, 10.0);
        assert_eq!(width().as_deref(), Some("100px"));
        host.pointer_up(0.0, 10.0);
        assert_eq!(
            host.listener_count(ListenTarget::Document, EventKind::PointerMove),
            0
        );
    }

    #[test]
    fn resize_direction_follows_position() {
        assert_eq!(DrawerPosition::Right.resized(300.0, 50.0), 250.0);
        assert_eq!(DrawerPosition::Top.resized(300.0, 50.0), 350.0);
        assert_eq!(DrawerPosition::Bottom.resized(150.0, 80.0), MIN_DRAWER_SIZE);
        assert!(!DrawerPosition::parse(Some("bottom")).is_horizontal());
    }

    #[test]
    fn handle_hidden_unless_resizable() {
        let host = HeadlessHost::new();
        let drawer = mount::<Drawer>(&host, &[("position", "top")]);
        drawer.with_view(|view| {
            let handle = view.query(".resize-handle").expect("handle");
            assert_eq!(handle.style_value("display"), Some("none"));
            let panel = view.query("[role=\"dialog\"]").expect("panel");
            assert_eq!(panel.attribute("data-position"), Some("top"));
        });
        drawer.fire(".resize-handle", EventKind::PointerDown, DomEvent::pointer(0.0, 0.0));
        assert_eq!(host.total_listeners(), 0);
    }
}
