//! Concrete widgets, grouped by role.

pub mod controls;
pub mod data_display;
pub mod forms;
pub mod navigation;
pub mod overlays;
