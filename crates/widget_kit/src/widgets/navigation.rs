//! Navigation widgets: bars, menus, collapsible panels and tabs.

mod appbar;
mod menu;
mod panel;
mod panelbar;
mod tabs;

pub use appbar::{Appbar, AppbarItem, AppbarMsg, Orientation};
pub use menu::{Menu, MenuItem, MenuMsg};
pub use panel::{Panel, PanelMsg};
pub use panelbar::PanelBar;
pub use tabs::{resolve_active, TabOption, Tabs, TabsMsg};
