use serde_json::Value;
use widget_contract::{
    el, overlay::is_escape, slot, AnchorRef, Context, EventKind, ListenTarget, RenderContext,
    Subscription, Update, View, Widget,
};

use crate::{
    anchoring::{anchor_argument, AnchorBinding},
    icon::IconName,
};

const CSS: &str = r#"
:host {
  position: fixed;
  inset: 0;
  display: none;
  align-items: center;
  justify-content: center;
  z-index: 1000;
}
:host([visible]) { display: flex; }
.scrim { position: absolute; inset: 0; background: rgba(0, 0, 0, 0.5); }
.dialog {
  position: relative;
  background: var(--base-background-component, #ffffff);
  color: var(--base-content--, #1d1d1d);
  border: var(--component-dialog-border-width, 1px) solid var(--base-background-border, #d7dbde);
  border-radius: var(--component-dialog-border-radius-outer, 4px);
  max-width: 90%;
  max-height: 90%;
  display: flex;
  flex-direction: column;
  box-shadow: var(--component-dialog-shadow, 0 2px 10px rgba(0, 0, 0, 0.3));
  outline: none;
}
.header {
  display: flex;
  align-items: center;
  gap: var(--spacing-small, 8px);
  padding: var(--component-dialog-padding, var(--spacing-medium, 16px));
  font-weight: bold;
  border-bottom: var(--component-dialog-inner-border-width, 1px) solid var(--base-background-border, #d7dbde);
}
.header-content { flex: 1; }
.close {
  display: inline-flex;
  background: none;
  border: none;
  padding: 2px;
  cursor: pointer;
  color: inherit;
}
.body { padding: var(--component-dialog-padding, var(--spacing-medium, 16px)); overflow: auto; flex: 1; }
.footer {
  padding: var(--component-dialog-padding, var(--spacing-medium, 16px));
  border-top: var(--component-dialog-inner-border-width, 1px) solid var(--base-background-border, #d7dbde);
  text-align: right;
}
::slotted(*) { margin: 0; }
"#;

#[derive(Debug, Clone)]
/// Dialog messages.
pub enum DialogMsg {
    /// Anchor click or `toggle()`.
    Toggle,
    /// `show()`.
    Show,
    /// Escape, scrim click, close button or `hide()`.
    Hide,
    /// Explicit anchor handle.
    SetAnchor(AnchorRef),
}

#[derive(Debug, Default)]
/// `y-dialog`: modal surface with header/body/footer slots over a scrim.
pub struct Dialog {
    anchor: AnchorBinding,
    escape: Option<Subscription>,
}

impl Dialog {
    fn sync_visibility(&mut self, cx: &mut Context<'_, Self>) {
        if cx.has("visible") {
            self.escape = Some(cx.listen(
                ListenTarget::Document,
                EventKind::KeyDown,
                false,
                |event| is_escape(event).then_some(DialogMsg::Hide),
            ));
            cx.focus(".dialog");
        } else {
            self.escape = None;
        }
    }
}

impl Widget for Dialog {
    type Msg = DialogMsg;

    const TAG: &'static str = "y-dialog";
    const OBSERVED: &'static [&'static str] = &["visible", "anchor", "closable"];

    fn create() -> Self {
        Self::default()
    }

    fn attached(&mut self, cx: &mut Context<'_, Self>) {
        self.anchor.resolve(cx, Some(DialogMsg::Toggle));
        self.sync_visibility(cx);
    }

    fn attribute_changed(
        &mut self,
        cx: &mut Context<'_, Self>,
        name: &str,
        _old: Option<&str>,
        _new: Option<&str>,
    ) -> Update {
        match name {
            "visible" => self.sync_visibility(cx),
            "anchor" => {
                self.anchor.clear_explicit();
                self.anchor.resolve(cx, Some(DialogMsg::Toggle));
            }
            _ => return Update::Render,
        }
        Update::None
    }

    fn update(&mut self, cx: &mut Context<'_, Self>, msg: DialogMsg) -> Update {
        match msg {
            DialogMsg::Toggle => {
                let visible = cx.has("visible");
                cx.set_flag("visible", !visible);
            }
            DialogMsg::Show => cx.set_flag("visible", true),
            DialogMsg::Hide => cx.set_flag("visible", false),
            DialogMsg::SetAnchor(anchor) => {
                self.anchor.set_explicit(cx, anchor, Some(DialogMsg::Toggle));
            }
        }
        Update::None
    }

    fn render(&self, cx: &RenderContext<'_>) -> View<DialogMsg> {
        let close = cx.attrs.has("closable").then(|| {
            el("button")
                .class("close")
                .attr("part", "close")
                .attr("type", "button")
                .attr("aria-label", "Close")
                .child(IconName::Close.render())
                .on(EventKind::Click, DialogMsg::Hide)
        });
        View::new(CSS)
            .child(
                el("div")
                    .class("scrim")
                    .attr("part", "scrim")
                    .on(EventKind::Click, DialogMsg::Hide),
            )
            .child(
                el("div")
                    .class("dialog")
                    .attr("part", "dialog")
                    .attr("role", "dialog")
                    .attr("aria-modal", "true")
                    .attr("tabindex", "-1")
                    .child(
                        el("div")
                            .class("header")
                            .child(el("div").class("header-content").child(slot(Some("header"))))
                            .child_opt(close),
                    )
                    .child(el("div").class("body").child(slot(Some("body"))))
                    .child(el("div").class("footer").child(slot(Some("footer")))),
            )
    }

    fn detached(&mut self, _cx: &mut Context<'_, Self>) {
        self.anchor.release();
        self.escape = None;
    }

    fn method(name: &str, args: &Value) -> Option<Result<DialogMsg, String>> {
        match name {
            "show" => Some(Ok(DialogMsg::Show)),
            "hide" => Some(Ok(DialogMsg::Hide)),
            "toggle" => Some(Ok(DialogMsg::Toggle)),
            "setAnchor" => Some(anchor_argument(args).map(DialogMsg::SetAnchor)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use widget_contract::{
        headless::{mount, HeadlessHost},
        Rect,
    };

    use super::*;

    #[test]
    fn anchor_opens_and_escape_closes() {
        let host = HeadlessHost::new();
        let trigger = host.add_element(Some("open-dialog"), Rect::new(0.0, 0.0, 80.0, 30.0));
        let dialog = mount::<Dialog>(&host, &[("anchor", "open-dialog")]);

        host.click(trigger);
        assert!(dialog.has_attribute("visible"));
        assert_eq!(dialog.log().focused, [".dialog"]);

        host.press_key("Escape");
        assert!(!dialog.has_attribute("visible"));
        assert_eq!(
            host.listener_count(ListenTarget::Document, EventKind::KeyDown),
            0
        );
    }

    #[test]
    fn scrim_and_close_button_dismiss() {
        let host = HeadlessHost::new();
        let dialog = mount::<Dialog>(&host, &[("visible", ""), ("closable", "")]);
        dialog.click(".dialog .body");
        assert!(dialog.has_attribute("visible"));
        dialog.click(".scrim");
        assert!(!dialog.has_attribute("visible"));

        dialog.invoke("show", &json!(null)).expect("show");
        dialog.click("button.close");
        assert!(!dialog.has_attribute("visible"));
    }

    #[test]
    fn close_button_only_when_closable() {
        let host = HeadlessHost::new();
        let dialog = mount::<Dialog>(&host, &[]);
        assert!(dialog.with_view(|view| view.query("button.close").is_none()));
        dialog.set_flag("closable", true);
        dialog.with_view(|view| {
            let close = view.query("button.close").expect("close button");
            assert_eq!(close.attribute("aria-label"), Some("Close"));
            let surface = view.query("[role=\"dialog\"]").expect("dialog");
            assert_eq!(surface.attribute("aria-modal"), Some("true"));
        });
    }

    #[test]
    fn detach_releases_anchor_and_keyboard_listeners() {
        let host = HeadlessHost::new();
        host.add_element(Some("open-dialog"), Rect::default());
        let dialog = mount::<Dialog>(&host, &[("anchor", "open-dialog"), ("visible", "")]);
        assert_eq!(host.total_listeners(), 2);
        dialog.detach();
        assert_eq!(host.total_listeners(), 0);
    }
}
