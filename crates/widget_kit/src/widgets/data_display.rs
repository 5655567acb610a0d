//! Read-only presentation widgets.

mod avatar;
mod badge;
mod card;
mod progress;
mod table;

pub use avatar::{initials, Avatar};
pub use badge::Badge;
pub use card::Card;
pub use progress::{LabelFormat, Progress, ProgressMsg, ProgressRange};
pub use table::{
    cell_text, compare_cells, sorted_rows, Column, SortDirection, SortState, Table, TableMsg,
};
