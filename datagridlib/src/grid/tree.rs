//! Aggregate row grouping and expand/collapse.
//!
//! Rendered grids are flat: each row only knows its aggregation level. Group
//! rows carry level N for the outermost grouping column down to 1 for the
//! innermost, and detail rows carry level 0. [`Grid::build`] recovers the
//! implicit tree in one pass, keeping a stack of the aggregate rows still
//! open at the current position:
//!
//! - an aggregate row first closes every open row whose level is `>=` its own,
//!   then opens itself
//! - every row becomes a descendant of all rows still open above it, and a
//!   direct child of those exactly one level above it
//!
//! Rows are stored in an arena and refer to each other by index.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::data::markup::TableMarkup;

use super::style::{GridStyle, RowStyle};

/// One row of a grid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// Aggregation level (0 = detail row)
    pub level: u32,
    /// Number of aggregate rows enclosing this one
    pub depth: usize,
    /// Immediate children, in document order
    pub direct_children: Vec<usize>,
    /// Every row nested beneath this one, in document order
    pub all_descendants: Vec<usize>,
    /// Whether the row's children are shown
    pub expanded: bool,
    /// Whether the row itself is hidden
    pub hidden: bool,
    /// Indentation and shade, set for aggregate rows
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<RowStyle>,
    /// Cell text
    pub cells: Vec<String>,
}

impl Row {
    /// Create a row at `level` with no cells.
    pub fn new(level: u32) -> Self {
        Self {
            level,
            expanded: true,
            ..Self::default()
        }
    }

    /// Create a row at `level` with the given cell text.
    pub fn with_cells(level: u32, cells: Vec<String>) -> Self {
        Self {
            cells,
            ..Self::new(level)
        }
    }

    /// Whether this is an aggregate (summary) row.
    pub fn is_aggregate(&self) -> bool {
        self.level > 0
    }

    /// Whether clicking this row toggles anything.
    pub fn is_toggleable(&self) -> bool {
        self.is_aggregate() && !self.all_descendants.is_empty()
    }

    /// Display label: the first non-empty cell.
    pub fn label(&self) -> &str {
        self.cells
            .iter()
            .map(String::as_str)
            .find(|c| !c.is_empty())
            .unwrap_or("")
    }
}

/// Rows of one rendered table with their recovered grouping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    rows: Vec<Row>,
}

impl Grid {
    /// Recover the grouping of `rows`.
    ///
    /// Derived fields on the input rows are reset first, so rebuilding from
    /// the same rows always gives the same grid.
    pub fn build(rows: Vec<Row>, style: &GridStyle) -> Self {
        let mut rows = rows;
        for row in &mut rows {
            row.depth = 0;
            row.direct_children.clear();
            row.all_descendants.clear();
            row.expanded = true;
            row.hidden = false;
            row.style = None;
        }

        let group_count = style
            .group_count
            .unwrap_or_else(|| rows.iter().map(|r| r.level).max().unwrap_or(0) as usize);

        let mut open: Vec<usize> = Vec::new();
        let mut current_level = u32::MAX;

        for index in 0..rows.len() {
            let level = rows[index].level;
            rows[index].depth = open.len();

            if level != 0 {
                while !open.is_empty() && level >= current_level {
                    open.pop();
                    current_level = open.last().map_or(u32::MAX, |&top| rows[top].level);
                }
                rows[index].depth = open.len();
                open.push(index);
                current_level = level;
                rows[index].style = Some(style.row_style(open.len(), group_count));
            }

            for &ancestor in &open {
                if ancestor == index {
                    continue;
                }
                rows[ancestor].all_descendants.push(index);
                if rows[ancestor].level - 1 == level {
                    rows[ancestor].direct_children.push(index);
                }
            }
        }

        debug!(rows = rows.len(), group_count, "built grid");
        Grid { rows }
    }

    /// Build from bare levels, with no cell content.
    pub fn from_levels(levels: &[u32], style: &GridStyle) -> Self {
        Self::build(levels.iter().map(|&l| Row::new(l)).collect(), style)
    }

    /// Build from scanned table markup. An absent table gives an empty grid.
    pub fn from_table(table: Option<&TableMarkup>, style: &GridStyle) -> Self {
        let Some(table) = table else {
            return Self::default();
        };
        let rows = table
            .body_rows
            .iter()
            .map(|r| Row::with_cells(r.level(), r.cells.clone()))
            .collect();
        Self::build(rows, style)
    }

    /// All rows in document order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Row at `index`.
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the grid has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of aggregate rows enclosing the row at `index`.
    pub fn depth(&self, index: usize) -> Option<usize> {
        self.rows.get(index).map(|row| row.depth)
    }

    /// Indices of rows not currently hidden.
    pub fn visible_rows(&self) -> Vec<usize> {
        (0..self.rows.len())
            .filter(|&i| !self.rows[i].hidden)
            .collect()
    }

    /// Indices of aggregate rows.
    pub fn aggregate_rows(&self) -> Vec<usize> {
        (0..self.rows.len())
            .filter(|&i| self.rows[i].is_aggregate())
            .collect()
    }

    /// Indices of rows with no enclosing aggregate row.
    pub fn roots(&self) -> Vec<usize> {
        (0..self.rows.len())
            .filter(|&i| self.rows[i].depth == 0)
            .collect()
    }

    /// Click handler for a row: toggles aggregate rows, ignores the rest.
    pub fn click(&mut self, index: usize) -> bool {
        self.toggle(index)
    }

    /// Collapse an expanded aggregate row or expand a collapsed one.
    ///
    /// Collapsing hides every descendant. Expanding shows the descendants
    /// again except those beneath a nested row that is itself collapsed, so
    /// nested collapse state survives and toggling twice is a no-op.
    ///
    /// Expanding a row that is itself hidden only marks it expanded; its
    /// descendants stay hidden until every ancestor is expanded again.
    ///
    /// Returns `false` (and changes nothing) for detail rows, aggregate rows
    /// without descendants, and out-of-range indices.
    pub fn toggle(&mut self, index: usize) -> bool {
        match self.rows.get(index) {
            Some(row) if row.is_toggleable() => {}
            _ => return false,
        }

        let descendants = std::mem::take(&mut self.rows[index].all_descendants);
        if self.rows[index].expanded {
            for &i in &descendants {
                self.rows[i].hidden = true;
            }
            self.rows[index].expanded = false;
        } else if self.rows[index].hidden {
            // Beneath a collapsed ancestor: its expand reveals these rows
            self.rows[index].expanded = true;
        } else {
            let mut covered = vec![false; self.rows.len()];
            for &i in &descendants {
                if !self.rows[i].expanded {
                    for &j in &self.rows[i].all_descendants {
                        covered[j] = true;
                    }
                }
            }
            for &i in &descendants {
                if !covered[i] {
                    self.rows[i].hidden = false;
                }
            }
            self.rows[index].expanded = true;
        }
        self.rows[index].all_descendants = descendants;

        debug!(
            row = index,
            expanded = self.rows[index].expanded,
            "toggled aggregate row"
        );
        true
    }

    /// Collapse an aggregate row if it is expanded; never expands.
    ///
    /// Returns `true` when the row was collapsed.
    pub fn collapse(&mut self, index: usize) -> bool {
        match self.rows.get(index) {
            Some(row) if row.expanded => self.toggle(index),
            _ => false,
        }
    }

    /// Collapse every aggregate row, leaving only top-level rows visible.
    pub fn collapse_all(&mut self) {
        for row in &mut self.rows {
            if row.is_toggleable() {
                row.expanded = false;
            }
            row.hidden = row.depth > 0;
        }
    }

    /// Expand every aggregate row, showing all rows.
    pub fn expand_all(&mut self) {
        for row in &mut self.rows {
            row.expanded = true;
            row.hidden = false;
        }
    }
}
