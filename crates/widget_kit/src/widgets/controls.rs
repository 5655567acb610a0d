//! Push buttons and compact labels.

mod button;
mod tag;

pub use button::{Button, ButtonMsg, StyleType};
pub use tag::{Tag, TagMsg, TagShape};
