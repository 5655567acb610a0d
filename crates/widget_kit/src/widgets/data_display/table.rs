//! `y-table`: JSON-driven data table with a three-state column sort.
//!
//! Columns and rows are parsed from the `columns` and `data` attributes on every
//! render. The sort state is the only derived state and survives attribute changes.

use std::cmp::Ordering;

use serde::Deserialize;
use serde_json::{json, Map, Value};
use widget_contract::{
    el, events,
    style::{Rule, StyleSheet},
    Context, EventKind, RenderContext, Size, Update, View, Widget, WidgetEvent,
};

use crate::icon::sort_arrows;

const BASE_CSS: &str = r#"
:host { display: block; font-family: var(--font-family-body, sans-serif); color: var(--base-content--, #000); }
.table-wrapper { overflow-x: auto; }
table { width: 100%; border-collapse: collapse; table-layout: auto; }
thead th {
  position: relative;
  text-align: left;
  font-weight: 500;
  font-size: var(--font-size-paragraph, 1em);
  white-space: nowrap;
  background: transparent;
  border-bottom: var(--component-table-border-width-header, 2px) solid var(--base-background-border, #ccc);
  user-select: none;
}
thead th.sortable { cursor: pointer; }
thead th.sortable:hover { background: var(--base-background-hover, #f5f5f5); }
.th-content { display: inline-flex; align-items: center; gap: 6px; }
.sort-icon { flex-shrink: 0; vertical-align: middle; }
tbody td {
  font-size: var(--font-size-paragraph, 1em);
  border-bottom: var(--component-table-border-width, 2px) solid var(--base-background-border, #ccc);
}
tbody tr:last-child td { border-bottom: none; }
tbody td.row-header { font-weight: 500; }
tbody tr:hover { background: var(--base-background-active, #eee); }
"#;

const STRIPED_CSS: &str = "tbody tr:nth-child(even) { background: var(--base-background-hover, #f9f9f9); }";

const ARROW_ACTIVE: &str = "var(--base-content--, #333)";
const ARROW_IDLE: &str = "var(--base-content-lightest, #bbb)";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
/// One column definition from the `columns` attribute.
pub struct Column {
    /// Row key shown in this column.
    pub field: String,
    /// Header text; the field name when absent.
    #[serde(default)]
    pub header: Option<String>,
    /// Clickable sort header; on unless explicitly `false`.
    #[serde(default = "sortable_default")]
    pub sortable: bool,
    /// Emphasized like the first column.
    #[serde(default)]
    pub row_header: bool,
}

fn sortable_default() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Sort direction of the active column.
pub enum SortDirection {
    /// Original row order.
    #[default]
    None,
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

impl SortDirection {
    /// Event/detail token.
    pub const fn token(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    const fn aria(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Asc => "ascending",
            Self::Desc => "descending",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Active sort column and direction.
pub struct SortState {
    /// Sorted field; `None` when unsorted.
    pub field: Option<String>,
    /// Direction.
    pub direction: SortDirection,
}

impl SortState {
    /// Advances the state for a header activation: the same column cycles
    /// asc, desc, none; another column starts at asc.
    pub fn activate(&mut self, field: &str) {
        if self.field.as_deref() == Some(field) {
            self.direction = match self.direction {
                SortDirection::Asc => SortDirection::Desc,
                SortDirection::Desc => SortDirection::None,
                SortDirection::None => SortDirection::Asc,
            };
            if self.direction == SortDirection::None {
                self.field = None;
            }
        } else {
            self.field = Some(field.to_string());
            self.direction = SortDirection::Asc;
        }
    }

    fn direction_of(&self, field: &str) -> SortDirection {
        if self.field.as_deref() == Some(field) {
            self.direction
        } else {
            SortDirection::None
        }
    }
}

/// Compares two cell values: missing and null values sort last, numbers compare
/// numerically, everything else as text.
pub fn compare_cells(a: Option<&Value>, b: Option<&Value>, direction: SortDirection) -> Ordering {
    let a = a.filter(|value| !value.is_null());
    let b = b.filter(|value| !value.is_null());
    let ordering = match (a, b) {
        (None, None) => return Ordering::Equal,
        (None, Some(_)) => return Ordering::Greater,
        (Some(_), None) => return Ordering::Less,
        (Some(Value::Number(a)), Some(Value::Number(b))) => {
            let (a, b) = (a.as_f64().unwrap_or(0.0), b.as_f64().unwrap_or(0.0));
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        (Some(a), Some(b)) => compare_text(&cell_text(Some(a)), &cell_text(Some(b))),
    };
    match direction {
        SortDirection::Desc => ordering.reverse(),
        _ => ordering,
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Display text of a cell.
pub fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

/// Rows in display order; `rows` itself is never reordered.
pub fn sorted_rows<'a>(rows: &'a [Map<String, Value>], sort: &SortState) -> Vec<&'a Map<String, Value>> {
    let mut ordered: Vec<&Map<String, Value>> = rows.iter().collect();
    if let (Some(field), SortDirection::Asc | SortDirection::Desc) = (&sort.field, sort.direction) {
        ordered.sort_by(|a, b| compare_cells(a.get(field), b.get(field), sort.direction));
    }
    ordered
}

#[derive(Debug, Clone)]
/// Table messages.
pub enum TableMsg {
    /// A sortable header was activated.
    HeaderActivated(String),
}

#[derive(Debug, Default)]
/// Table widget state.
pub struct Table {
    sort: SortState,
}

impl Table {
    /// Current sort state.
    pub fn sort(&self) -> &SortState {
        &self.sort
    }
}

impl Widget for Table {
    type Msg = TableMsg;

    const TAG: &'static str = "y-table";
    const OBSERVED: &'static [&'static str] = &["columns", "data", "striped", "size"];

    fn create() -> Self {
        Self::default()
    }

    fn update(&mut self, cx: &mut Context<'_, Self>, msg: TableMsg) -> Update {
        match msg {
            TableMsg::HeaderActivated(field) => {
                self.sort.activate(&field);
                cx.emit(WidgetEvent::new(
                    events::SORT,
                    json!({
                        "field": self.sort.field,
                        "direction": self.sort.direction.token(),
                    }),
                ));
                Update::Render
            }
        }
    }

    fn render(&self, cx: &RenderContext<'_>) -> View<TableMsg> {
        let attrs = cx.attrs;
        let columns: Vec<Column> = attrs.json_list("columns");
        let rows: Vec<Map<String, Value>> = attrs.json_list("data");
        let size = Size::parse(attrs.get("size"));
        let padding = format!("var(--component-table-padding-{}, 8px)", size.token());

        let mut sheet = StyleSheet::new(BASE_CSS)
            .rule(Rule::new("thead th").decl("padding", padding.clone()))
            .rule(Rule::new("tbody td").decl("padding", padding));
        if attrs.has("striped") {
            sheet = sheet.raw(STRIPED_CSS);
        }

        let header_row = el("tr").children(columns.iter().map(|column| {
            let label = column.header.clone().unwrap_or_else(|| column.field.clone());
            let content = el("span").class("th-content").text(label);
            let th = el("th").attr("scope", "col").attr("data-field", column.field.clone());
            if !column.sortable {
                return th.child(content);
            }
            let direction = self.sort.direction_of(&column.field);
            let top = if direction == SortDirection::Asc { ARROW_ACTIVE } else { ARROW_IDLE };
            let bottom = if direction == SortDirection::Desc { ARROW_ACTIVE } else { ARROW_IDLE };
            let field = column.field.clone();
            th.class("sortable")
                .attr("tabindex", "0")
                .attr("aria-sort", direction.aria())
                .on(EventKind::Click, TableMsg::HeaderActivated(column.field.clone()))
                .on_with(EventKind::KeyDown, move |event| {
                    event
                        .is_activation_key()
                        .then(|| TableMsg::HeaderActivated(field.clone()))
                })
                .child(content.child(el("span").child(sort_arrows(top, bottom))))
        }));

        let body = el("tbody").children(sorted_rows(&rows, &self.sort).into_iter().map(|row| {
            el("tr").children(columns.iter().enumerate().map(|(index, column)| {
                el("td")
                    .class_if(column.row_header || index == 0, "row-header")
                    .text(cell_text(row.get(&column.field)))
            }))
        }));

        View::new(sheet).child(
            el("div").class("table-wrapper").child(
                el("table")
                    .attr("role", "grid")
                    .child(el("thead").child(header_row))
                    .child(body),
            ),
        )
    }
}
