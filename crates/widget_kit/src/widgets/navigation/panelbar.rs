use widget_contract::{slot, Context, RenderContext, Update, View, Widget};

const CSS: &str = ":host { display: block; }";

#[derive(Debug, Default)]
/// `y-panelbar`: container for `y-panel` entries. With `exclusive`, expanding a panel
/// collapses its expanded siblings; the panels read the flag themselves.
pub struct PanelBar;

impl Widget for PanelBar {
    type Msg = ();

    const TAG: &'static str = "y-panelbar";
    const OBSERVED: &'static [&'static str] = &["exclusive"];

    fn create() -> Self {
        Self
    }

    fn attribute_changed(
        &mut self,
        _cx: &mut Context<'_, Self>,
        _name: &str,
        _old: Option<&str>,
        _new: Option<&str>,
    ) -> Update {
        Update::None
    }

    fn update(&mut self, _cx: &mut Context<'_, Self>, _msg: ()) -> Update {
        Update::None
    }

    fn render(&self, _cx: &RenderContext<'_>) -> View<()> {
        View::new(CSS).child(slot(None))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use widget_contract::headless::{mount, HeadlessHost};

    use super::*;

    #[test]
    fn renders_a_single_default_slot() {
        let host = HeadlessHost::new();
        let bar = mount::<PanelBar>(&host, &[("exclusive", "")]);
        bar.with_view(|view| {
            assert_eq!(view.query_all("slot").len(), 1);
        });
        bar.set_flag("exclusive", false);
        assert_eq!(bar.log().mounts, 1);
    }
}
