//! Table-ready outline of a grid.
//!
//! `GridOutline` lists the rows currently visible in a [`Grid`] with their
//! nesting, in a shape that can be printed directly or serialized to JSON.
//! It is a pure presentation layer: grouping and folding happen in the grid.

use serde::{Deserialize, Serialize};

use crate::grid::Grid;

/// Marker for an expanded aggregate row.
pub const EXPANDED_MARKER: &str = "▾";
/// Marker for a collapsed aggregate row.
pub const COLLAPSED_MARKER: &str = "▸";

/// A single visible row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineRow {
    /// Position in the grid (stable across folding)
    pub index: usize,
    /// Aggregation level (0 = detail row)
    pub level: u32,
    /// Number of enclosing aggregate rows
    pub depth: usize,
    /// Whether this is an aggregate row
    pub aggregate: bool,
    /// Whether the row's children are shown
    pub expanded: bool,
    /// First non-empty cell
    pub label: String,
    /// Remaining cell text
    pub values: Vec<String>,
}

impl OutlineRow {
    /// Label indented by depth, with a fold marker on aggregate rows.
    pub fn indented_label(&self) -> String {
        let marker = match (self.aggregate, self.expanded) {
            (true, true) => EXPANDED_MARKER,
            (true, false) => COLLAPSED_MARKER,
            (false, _) => " ",
        };
        format!("{}{} {}", "  ".repeat(self.depth), marker, self.label)
    }
}

/// Visible rows of a grid plus a summary line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridOutline {
    /// Optional title (e.g. the table id)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Column headers
    pub headers: Vec<String>,
    /// Visible rows in document order
    pub rows: Vec<OutlineRow>,
    /// Summary row label, e.g. "12 rows (4 hidden)"
    pub footer: String,
}

impl GridOutline {
    /// Create an outline of the currently visible rows.
    pub fn from_grid(grid: &Grid) -> Self {
        let rows: Vec<OutlineRow> = grid
            .visible_rows()
            .into_iter()
            .filter_map(|index| grid.row(index).map(|row| (index, row)))
            .map(|(index, row)| {
                let label = row.label().to_string();
                let values = row
                    .cells
                    .iter()
                    .skip_while(|c| c.is_empty())
                    .skip(1)
                    .cloned()
                    .collect();
                OutlineRow {
                    index,
                    level: row.level,
                    depth: row.depth,
                    aggregate: row.is_aggregate(),
                    expanded: row.expanded,
                    label,
                    values,
                }
            })
            .collect();

        let footer = build_footer_label(grid.len(), grid.len() - rows.len());

        GridOutline {
            title: None,
            headers: vec![
                "Row".to_string(),
                "Level".to_string(),
                "Label".to_string(),
                "Values".to_string(),
            ],
            rows,
            footer,
        }
    }

    /// Builder: set the title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

fn build_footer_label(total: usize, hidden: usize) -> String {
    let noun = if total == 1 { "row" } else { "rows" };
    format!("{} {} ({} hidden)", total, noun, hidden)
}
