use serde::Deserialize;
use serde_json::{json, Value};
use widget_contract::{
    el, events,
    style::{contrast_text_color, literal_fallback, var},
    ColorRole, Context, Element, EventKind, Patch, RenderContext, SemanticColor, Subscription,
    Update, View, Widget, WidgetEvent,
};

const DEFAULT_DURATION_MS: u32 = 4000;
const DEFAULT_MAX: usize = 5;
/// Removal delay used when the host reports no exit transition.
const EXIT_FALLBACK_MS: u32 = 350;

const CSS: &str = r#"
:host { font-family: var(--font-family-body, sans-serif); }
.toast-container {
  position: fixed;
  z-index: 10000;
  display: flex;
  flex-direction: column;
  gap: var(--spacing-small, 6px);
  pointer-events: none;
  max-width: 420px;
  min-width: 280px;
}
.toast {
  pointer-events: auto;
  display: flex;
  align-items: center;
  gap: var(--spacing-medium, 8px);
  padding: var(--component-toast-padding, var(--spacing-medium, 8px));
  border-radius: var(--component-toast-border-radius, var(--radii-small, 4px));
  font-size: var(--font-size-paragraph, 1em);
  line-height: 1.4;
  opacity: 0;
  transform: translateY(8px);
  transition: opacity 0.25s ease, transform 0.25s ease;
  box-shadow: var(--base-shadow, 0 2px 6px rgba(0, 0, 0, 0.15));
}
.toast.visible { opacity: 1; transform: translateY(0); }
.toast.exit { opacity: 0; transform: translateY(-8px); }
.toast-icon { flex-shrink: 0; font-size: 1.1em; }
.toast-message { flex: 1; }
.toast-close {
  flex-shrink: 0;
  align-self: flex-start;
  background: none;
  border: none;
  color: inherit;
  font-size: 1.2em;
  cursor: pointer;
  padding: 0 0 0 var(--spacing-small, 6px);
  opacity: 0.7;
  line-height: 1;
}
.toast-close:hover { opacity: 1; }
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Viewport corner or edge hosting the toast stack.
pub enum ToastPosition {
    /// Top right corner.
    TopRight,
    /// Top left corner.
    TopLeft,
    /// Top edge, centered.
    TopCenter,
    /// Bottom right corner.
    #[default]
    BottomRight,
    /// Bottom left corner.
    BottomLeft,
    /// Bottom edge, centered.
    BottomCenter,
}

impl ToastPosition {
    /// Parses a `position` attribute; unknown values fall back to bottom-right.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("top-right") => Self::TopRight,
            Some("top-left") => Self::TopLeft,
            Some("top-center") => Self::TopCenter,
            Some("bottom-left") => Self::BottomLeft,
            Some("bottom-center") => Self::BottomCenter,
            _ => Self::BottomRight,
        }
    }

    /// Attribute token.
    pub const fn token(self) -> &'static str {
        match self {
            Self::TopRight => "top-right",
            Self::TopLeft => "top-left",
            Self::TopCenter => "top-center",
            Self::BottomRight => "bottom-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomCenter => "bottom-center",
        }
    }

    fn declarations(self) -> Vec<(&'static str, &'static str)> {
        const OFFSET: &str = "var(--component-toast-offset, var(--spacing-x-large, 16px))";
        let vertical = match self {
            Self::TopRight | Self::TopLeft | Self::TopCenter => "top",
            _ => "bottom",
        };
        let mut declarations = vec![(vertical, OFFSET)];
        match self {
            Self::TopRight | Self::BottomRight => {
                declarations.extend([("right", OFFSET), ("align-items", "flex-end")]);
            }
            Self::TopLeft | Self::BottomLeft => {
                declarations.extend([("left", OFFSET), ("align-items", "flex-start")]);
            }
            Self::TopCenter | Self::BottomCenter => declarations.extend([
                ("left", "50%"),
                ("transform", "translateX(-50%)"),
                ("align-items", "center"),
            ]),
        }
        declarations
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
/// Arguments of `show(...)`.
pub struct ToastOptions {
    /// Text content.
    pub message: String,
    /// Semantic color name.
    pub color: String,
    /// Auto-dismiss delay override; 0 keeps the toast until dismissed.
    pub duration: Option<u32>,
    /// Renders a close button.
    pub dismissible: bool,
    /// Icon class list, e.g. `fas fa-check`.
    pub icon: Option<String>,
}

impl Default for ToastOptions {
    fn default() -> Self {
        Self {
            message: String::new(),
            color: SemanticColor::Base.token().to_string(),
            duration: None,
            dismissible: true,
            icon: None,
        }
    }
}

/// Background for a toast color. The neutral toast inverts the page, so its fallback
/// is white.
fn toast_background(color: &str) -> (String, &'static str) {
    let semantic = SemanticColor::parse(color).unwrap_or(SemanticColor::Base);
    let literal = match semantic {
        SemanticColor::Base => "#fff",
        other => literal_fallback(ColorRole::Content, other),
    };
    (
        var(&format!("--{}-content--", semantic.token()), literal),
        contrast_text_color(literal),
    )
}

#[derive(Debug)]
struct ToastEntry {
    id: u64,
    options: ToastOptions,
    visible: bool,
    exiting: bool,
    frame: Option<Subscription>,
    timer: Option<Subscription>,
}

impl ToastEntry {
    fn selector(&self) -> String {
        format!(".toast[data-toast-id=\"{}\"]", self.id)
    }
}

#[derive(Debug, Clone)]
/// Toast messages.
pub enum ToastMsg {
    /// `show({...})`.
    Show(ToastOptions),
    /// `clear()`.
    Clear,
    /// Enter frame for a toast.
    Entered(u64),
    /// Auto-dismiss or close button.
    Dismiss(u64),
    /// Exit transition finished.
    Removed(u64),
}

#[derive(Debug, Default)]
/// `y-toast`: stacked transient notifications.
pub struct Toast {
    next_id: u64,
    entries: Vec<ToastEntry>,
}

impl Toast {
    fn duration(cx: &Context<'_, Self>) -> u32 {
        cx.attrs()
            .number("duration")
            .filter(|duration| *duration >= 0.0)
            .map_or(DEFAULT_DURATION_MS, |duration| duration as u32)
    }

    fn max(cx: &Context<'_, Self>) -> usize {
        cx.attrs()
            .number("max")
            .filter(|max| *max >= 1.0)
            .map_or(DEFAULT_MAX, |max| max as usize)
    }

    /// Toasts currently on screen, exiting ones excluded.
    pub fn active_count(&self) -> usize {
        self.entries.iter().filter(|entry| !entry.exiting).count()
    }

    fn show(&mut self, cx: &mut Context<'_, Self>, options: ToastOptions) -> Update {
        let max = Self::max(cx);
        while self.active_count() >= max {
            let Some(oldest) = self.entries.iter().find(|entry| !entry.exiting) else {
                break;
            };
            let id = oldest.id;
            self.dismiss(cx, id);
        }

        self.next_id += 1;
        let id = self.next_id;
        let duration = options.duration.unwrap_or_else(|| Self::duration(cx));
        let frame = Some(cx.next_frame(ToastMsg::Entered(id)));
        let timer = (duration > 0).then(|| cx.timeout(duration, ToastMsg::Dismiss(id)));
        cx.emit(WidgetEvent::new(
            events::TOAST_SHOW,
            json!({ "message": options.message, "color": options.color }),
        ));
        self.entries.push(ToastEntry {
            id,
            options,
            visible: false,
            exiting: false,
            frame,
            timer,
        });
        Update::Render
    }

    fn dismiss(&mut self, cx: &mut Context<'_, Self>, id: u64) -> Vec<Patch> {
        let Some(entry) = self
            .entries
            .iter_mut()
            .find(|entry| entry.id == id && !entry.exiting)
        else {
            return Vec::new();
        };
        entry.exiting = true;
        entry.visible = false;
        entry.frame = None;
        let exit = match cx.host().transition_duration_ms(cx.key(), ".toast") {
            0 => EXIT_FALLBACK_MS,
            duration => duration,
        };
        entry.timer = Some(cx.timeout(exit, ToastMsg::Removed(id)));
        let selector = entry.selector();
        vec![
            Patch::class(&selector, "visible", false),
            Patch::class(&selector, "exit", true),
        ]
    }

    fn render_entry(entry: &ToastEntry) -> Element<ToastMsg> {
        let options = &entry.options;
        let (background, foreground) = toast_background(&options.color);
        let semantic = SemanticColor::parse(&options.color);
        let icon = options
            .icon
            .as_deref()
            .filter(|icon| !icon.trim().is_empty())
            .map(|icon| el("i").class("toast-icon").class(icon.trim()));
        let close = options.dismissible.then(|| {
            el("button")
                .class("toast-close")
                .attr("type", "button")
                .attr("aria-label", "Dismiss")
                .text("\u{d7}")
                .on(EventKind::Click, ToastMsg::Dismiss(entry.id))
        });
        el("div")
            .class("toast")
            .class_if(
                semantic.is_some(),
                format!("color-{}", semantic.map(SemanticColor::token).unwrap_or_default()),
            )
            .class_if(entry.visible, "visible")
            .class_if(entry.exiting, "exit")
            .attr("data-toast-id", entry.id.to_string())
            .attr("role", "alert")
            .attr("aria-live", "assertive")
            .style("background-color", background)
            .style("color", foreground)
            .child_opt(icon)
            .child(el("span").class("toast-message").text(options.message.clone()))
            .child_opt(close)
    }
}

impl Widget for Toast {
    type Msg = ToastMsg;

    const TAG: &'static str = "y-toast";
    const OBSERVED: &'static [&'static str] = &["position", "duration", "max"];

    fn create() -> Self {
        Self::default()
    }

    fn attribute_changed(
        &mut self,
        _cx: &mut Context<'_, Self>,
        name: &str,
        _old: Option<&str>,
        _new: Option<&str>,
    ) -> Update {
        match name {
            "position" => Update::Render,
            _ => Update::None,
        }
    }

    fn update(&mut self, cx: &mut Context<'_, Self>, msg: ToastMsg) -> Update {
        match msg {
            ToastMsg::Show(options) => self.show(cx, options),
            ToastMsg::Clear => {
                let ids: Vec<u64> = self.entries.iter().map(|entry| entry.id).collect();
                let patches = ids
                    .into_iter()
                    .flat_map(|id| self.dismiss(cx, id))
                    .collect();
                Update::Patch(patches)
            }
            ToastMsg::Entered(id) => {
                match self
                    .entries
                    .iter_mut()
                    .find(|entry| entry.id == id && !entry.exiting)
                {
                    Some(entry) => {
                        entry.frame = None;
                        entry.visible = true;
                        Update::Patch(vec![Patch::class(&entry.selector(), "visible", true)])
                    }
                    None => Update::None,
                }
            }
            ToastMsg::Dismiss(id) => Update::Patch(self.dismiss(cx, id)),
            ToastMsg::Removed(id) => {
                let Some(index) = self.entries.iter().position(|entry| entry.id == id) else {
                    return Update::None;
                };
                let entry = self.entries.remove(index);
                cx.emit(WidgetEvent::new(
                    events::TOAST_DISMISS,
                    json!({ "message": entry.options.message, "color": entry.options.color }),
                ));
                Update::Render
            }
        }
    }

    fn render(&self, cx: &RenderContext<'_>) -> View<ToastMsg> {
        let position = ToastPosition::parse(cx.attrs.get("position"));
        let container = position.declarations().into_iter().fold(
            el("div")
                .class("toast-container")
                .attr("part", "container")
                .attr("data-position", position.token()),
            |container, (property, value)| container.style(property, value),
        );
        View::new(CSS).child(container.children(self.entries.iter().map(Self::render_entry)))
    }

    fn detached(&mut self, _cx: &mut Context<'_, Self>) {
        self.entries.clear();
    }

    fn method(name: &str, args: &Value) -> Option<Result<ToastMsg, String>> {
        match name {
            "show" => Some(match args {
                Value::String(message) => Ok(ToastMsg::Show(ToastOptions {
                    message: message.clone(),
                    ..ToastOptions::default()
                })),
                Value::Null => Ok(ToastMsg::Show(ToastOptions::default())),
                other => serde_json::from_value(other.clone())
                    .map(ToastMsg::Show)
                    .map_err(|err| format!("invalid toast options: {err}")),
            }),
            "clear" => Some(Ok(ToastMsg::Clear)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use widget_contract::headless::{mount, HeadlessHost, Mounted};

    use super::*;

    fn toasts(toast: &Mounted<Toast>) -> Vec<(String, bool)> {
        toast.with_view(|view| {
            let messages = view.query_all(".toast-message");
            view.query_all(".toast")
                .into_iter()
                .zip(messages)
                .map(|(entry, message)| (message.text_content(), entry.has_class("exit")))
                .collect()
        })
    }

    #[test]
    fn show_renders_an_alert_that_enters_after_a_frame() {
        let host = HeadlessHost::new();
        let toast = mount::<Toast>(&host, &[]);
        toast
            .invoke("show", &json!({ "message": "Saved", "color": "success" }))
            .expect("show");
        toast.with_view(|view| {
            let entry = view.query(".toast").expect("toast");
            assert!(entry.has_class("color-success"));
            assert!(!entry.has_class("visible"));
            assert_eq!(entry.attribute("role"), Some("alert"));
            assert_eq!(entry.attribute("aria-live"), Some("assertive"));
            assert!(view.query(".toast-close").is_some());
            assert!(view.query(".toast-icon").is_none());
        });
        host.flush_frames();
        assert!(toast.with_view(|view| view
            .query(".toast")
            .is_some_and(|entry| entry.has_class("visible"))));
        assert_eq!(
            toast.events_named(events::TOAST_SHOW)[0].detail,
            json!({ "message": "Saved", "color": "success" })
        );
    }

    #[test]
    fn literal_colors_add_no_color_class() {
        let host = HeadlessHost::new();
        let toast = mount::<Toast>(&host, &[]);
        toast
            .invoke("show", &json!({ "message": "Custom", "color": "rgb(1, 2, 3)" }))
            .expect("show");
        toast.with_view(|view| {
            let entry = view.query(".toast").expect("toast");
            assert_eq!(entry.classes(), ["toast"]);
        });
    }

    #[test]
    fn auto_dismiss_plays_the_exit_then_removes() {
        let host = HeadlessHost::new();
        let toast = mount::<Toast>(&host, &[("duration", "100")]);
        toast.invoke("show", &json!("Auto")).expect("show");
        host.advance(100);
        assert_eq!(toasts(&toast), [("Auto".to_string(), true)]);
        host.advance(EXIT_FALLBACK_MS.into());
        assert!(toasts(&toast).is_empty());
        assert_eq!(
            toast.events_named(events::TOAST_DISMISS)[0].detail,
            json!({ "message": "Auto", "color": "base" })
        );
    }

    #[test]
    fn zero_duration_is_sticky_until_closed() {
        let host = HeadlessHost::new();
        let toast = mount::<Toast>(&host, &[]);
        toast
            .invoke("show", &json!({ "message": "Sticky", "duration": 0 }))
            .expect("show");
        host.advance(60_000);
        assert_eq!(toasts(&toast).len(), 1);
        toast.click(".toast-close");
        host.advance(400);
        assert!(toasts(&toast).is_empty());
    }

    #[test]
    fn max_removes_the_oldest() {
        let host = HeadlessHost::new();
        let toast = mount::<Toast>(&host, &[("duration", "0"), ("max", "2")]);
        for message in ["One", "Two", "Three"] {
            toast.invoke("show", &json!(message)).expect("show");
        }
        host.advance(400);
        let remaining: Vec<String> = toasts(&toast).into_iter().map(|(text, _)| text).collect();
        assert_eq!(remaining, ["Two", "Three"]);
    }

    #[test]
    fn clear_removes_everything() {
        let host = HeadlessHost::new();
        let toast = mount::<Toast>(&host, &[("duration", "0")]);
        toast.invoke("show", &json!("A")).expect("show");
        toast.invoke("show", &json!({ "message": "B", "dismissible": false, "icon": "fas fa-check" }))
            .expect("show");
        toast.with_view(|view| {
            let icon = view.query(".toast-icon").expect("icon");
            assert!(icon.has_class("fas") && icon.has_class("fa-check"));
            assert_eq!(view.query_all(".toast-close").len(), 1);
        });
        toast.invoke("clear", &json!(null)).expect("clear");
        host.advance(400);
        assert!(toasts(&toast).is_empty());
        assert_eq!(toast.events_named(events::TOAST_DISMISS).len(), 2);
    }

    #[test]
    fn position_places_the_container() {
        let host = HeadlessHost::new();
        let toast = mount::<Toast>(&host, &[("position", "top-center")]);
        toast.with_view(|view| {
            let container = view.query(".toast-container").expect("container");
            assert_eq!(container.style_value("left"), Some("50%"));
            assert_eq!(container.style_value("align-items"), Some("center"));
        });
        toast.set_attribute("position", "nowhere");
        toast.with_view(|view| {
            let container = view.query(".toast-container").expect("container");
            assert_eq!(container.attribute("data-position"), Some("bottom-right"));
        });
    }

    #[test]
    fn detach_drops_pending_timers() {
        let host = HeadlessHost::new();
        let toast = mount::<Toast>(&host, &[]);
        toast.invoke("show", &json!("Bye")).expect("show");
        toast.detach();
        assert_eq!(host.pending_timers(), 0);
        assert_eq!(host.pending_frames(), 0);
    }
}
