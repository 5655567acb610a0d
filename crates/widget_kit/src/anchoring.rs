//! Anchor binding and dismissal subscriptions shared by overlay widgets.

use serde_json::Value;
use widget_contract::{
    overlay::{is_escape, is_outside},
    AnchorRef, Context, ElementKey, EventKind, ListenTarget, Subscription, Widget,
};

/// Anchor of an overlay plus the click listener registered on it.
///
/// An explicit handle wins over the `anchor` id until it is cleared.
#[derive(Debug, Default)]
pub(crate) struct AnchorBinding {
    anchor: Option<AnchorRef>,
    explicit: bool,
    click: Option<Subscription>,
}

impl AnchorBinding {
    /// Current anchor, if resolved.
    pub(crate) fn get(&self) -> Option<&AnchorRef> {
        self.anchor.as_ref()
    }

    /// Re-resolves the `anchor` attribute unless an explicit handle is set, then
    /// listens for clicks on the anchor when `on_click` is given.
    pub(crate) fn resolve<W: Widget>(&mut self, cx: &Context<'_, W>, on_click: Option<W::Msg>) {
        self.click = None;
        if self.explicit {
            self.listen(cx, on_click);
            return;
        }
        self.anchor = cx
            .attribute("anchor")
            .filter(|id| !id.is_empty())
            .and_then(|id| cx.resolve_anchor(id));
        self.listen(cx, on_click);
    }

    /// Binds an explicit handle, overriding id lookup.
    pub(crate) fn set_explicit<W: Widget>(
        &mut self,
        cx: &Context<'_, W>,
        anchor: AnchorRef,
        on_click: Option<W::Msg>,
    ) {
        self.click = None;
        self.explicit = true;
        self.anchor = Some(anchor);
        self.listen(cx, on_click);
    }

    /// Returns anchor lookup to the `anchor` id. Call before `resolve` when the
    /// attribute is written.
    pub(crate) fn clear_explicit(&mut self) {
        self.explicit = false;
    }

    /// Drops the anchor listener.
    pub(crate) fn release(&mut self) {
        self.click = None;
    }

    fn listen<W: Widget>(&mut self, cx: &Context<'_, W>, on_click: Option<W::Msg>) {
        let (Some(key), Some(msg)) = (self.anchor.as_ref().map(|anchor| anchor.key), on_click)
        else {
            return;
        };
        self.click = Some(cx.listen(
            ListenTarget::Element(key),
            EventKind::Click,
            false,
            move |_| Some(msg.clone()),
        ));
    }
}

/// Document and window listeners held while an overlay is open: outside click and
/// Escape send `close`; scroll and resize send `reposition` when given.
pub(crate) fn dismissal<W: Widget>(
    cx: &Context<'_, W>,
    anchor: Option<AnchorRef>,
    close: W::Msg,
    reposition: Option<W::Msg>,
) -> Vec<Subscription> {
    let key = cx.key();
    let on_outside = close.clone();
    let mut subscriptions = vec![
        cx.listen(ListenTarget::Document, EventKind::Click, false, move |event| {
            is_outside(event, key, anchor.as_ref()).then(|| on_outside.clone())
        }),
        cx.listen(ListenTarget::Document, EventKind::KeyDown, false, move |event| {
            is_escape(event).then(|| close.clone())
        }),
    ];
    if let Some(msg) = reposition {
        let on_resize = msg.clone();
        subscriptions.push(cx.listen(ListenTarget::Window, EventKind::Scroll, true, move |_| {
            Some(msg.clone())
        }));
        subscriptions.push(cx.listen(ListenTarget::Window, EventKind::Resize, false, move |_| {
            Some(on_resize.clone())
        }));
    }
    subscriptions
}

/// Reads an explicit anchor handle from `setAnchor` arguments: either a bare element
/// key or `{"key": n}`.
pub(crate) fn anchor_argument(args: &Value) -> Result<AnchorRef, String> {
    args.as_u64()
        .or_else(|| args.get("key").and_then(Value::as_u64))
        .map(|key| AnchorRef::from_key(ElementKey(key)))
        .ok_or_else(|| format!("expected an element key, got {args}"))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn anchor_argument_accepts_key_forms() {
        assert_eq!(
            anchor_argument(&json!(7)),
            Ok(AnchorRef::from_key(ElementKey(7)))
        );
        assert_eq!(
            anchor_argument(&json!({ "key": 3 })),
            Ok(AnchorRef::from_key(ElementKey(3)))
        );
        assert!(anchor_argument(&json!("menu-button")).is_err());
    }
}
