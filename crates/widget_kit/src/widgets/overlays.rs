//! Overlays: surfaces that float above the page and dismiss themselves.

mod dialog;
mod drawer;
mod toast;
mod tooltip;

pub use dialog::{Dialog, DialogMsg};
pub use drawer::{Drawer, DrawerMsg, DrawerPosition, MIN_DRAWER_SIZE};
pub use toast::{Toast, ToastMsg, ToastOptions, ToastPosition};
pub use tooltip::{tooltip_colors, Tooltip, TooltipMsg, TooltipPosition};
