//! Value-bearing form controls. Each contributes one form entry under its `name`.

mod checkbox;
mod input;
mod radio;
mod select;
mod slider;
mod switch;

pub use checkbox::{Checkbox, CheckboxMsg};
pub use input::{Input, InputMsg};
pub use radio::{Radio, RadioMsg, RadioOption};
pub use select::{selected_values, Select, SelectMsg, SelectOption};
pub use slider::{snap_value, Slider, SliderMsg, SliderRange};
pub use switch::{Switch, SwitchMsg};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Where a control places its label.
pub enum LabelPosition {
    /// Above the control.
    Top,
    /// Below the control.
    Bottom,
    /// Before the control.
    Left,
    /// After the control.
    Right,
}

impl LabelPosition {
    /// Attribute token.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Parses a `label-position` attribute, falling back to `default`.
    pub fn parse(raw: Option<&str>, default: Self) -> Self {
        match raw.map(str::trim) {
            Some("top") => Self::Top,
            Some("bottom") => Self::Bottom,
            Some("left") => Self::Left,
            Some("right") => Self::Right,
            _ => default,
        }
    }

    /// `flex-direction` for a wrapper whose children are the control, then its label.
    pub const fn flex_direction(self) -> &'static str {
        match self {
            Self::Top => "column-reverse",
            Self::Bottom => "column",
            Self::Left => "row-reverse",
            Self::Right => "row",
        }
    }
}
