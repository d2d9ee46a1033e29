//! Multi-column sort order driven by header clicks.
//!
//! A plain click on a column header replaces the whole sort order with that
//! column alone, cycling its direction ascending → descending → unsorted.
//! A modified click (shift/ctrl) edits only the clicked column: it appends
//! the column when absent and flips its direction when present, leaving the
//! rest of the order untouched.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DataGridError;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    /// Ascending (A-Z, smallest first)
    #[default]
    #[serde(rename = "asc")]
    Ascending,
    /// Descending (Z-A, largest first)
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    /// The opposite direction.
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            _ => Err(format!("Unknown sort direction: {}", s)),
        }
    }
}

/// How a header was clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClickModifier {
    /// No modifier key held
    #[default]
    Plain,
    /// Shift or ctrl held: extend the existing multi-column order
    Extend,
}

/// One column of the sort order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    /// Column name
    pub column: String,
    /// Sort direction
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortKey {
    /// Ascending key on `column`.
    pub fn ascending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Ascending,
        }
    }

    /// Descending key on `column`.
    pub fn descending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Descending,
        }
    }

    /// Parse the renderer's `sort` flag format: `column` or `column|desc`.
    pub fn parse_flag_value(value: &str) -> crate::Result<Self> {
        let (column, direction) = match value.rsplit_once('|') {
            Some((column, suffix)) => {
                let direction = suffix.parse::<SortDirection>().map_err(|message| {
                    DataGridError::InvalidSort {
                        value: value.to_string(),
                        message,
                    }
                })?;
                (column, direction)
            }
            None => (value, SortDirection::Ascending),
        };
        if column.is_empty() {
            return Err(DataGridError::InvalidSort {
                value: value.to_string(),
                message: "missing column name".to_string(),
            });
        }
        Ok(Self {
            column: column.to_string(),
            direction,
        })
    }

    /// Format for the renderer's `sort` flag.
    pub fn to_flag_value(&self) -> String {
        match self.direction {
            SortDirection::Ascending => self.column.clone(),
            SortDirection::Descending => format!("{}|desc", self.column),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_flag_value())
    }
}

/// Ordered list of sort keys, most significant first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortOrder(Vec<SortKey>);

impl SortOrder {
    /// Create an empty (unsorted) order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: append a key.
    pub fn then(mut self, key: SortKey) -> Self {
        self.0.retain(|k| k.column != key.column);
        self.0.push(key);
        self
    }

    /// Keys in significance order.
    pub fn keys(&self) -> &[SortKey] {
        &self.0
    }

    /// Whether no column is sorted.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of sorted columns.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Current direction of `column`, if it is sorted.
    pub fn direction_of(&self, column: &str) -> Option<SortDirection> {
        self.0
            .iter()
            .find(|k| k.column == column)
            .map(|k| k.direction)
    }

    /// Apply a header click on `column`.
    ///
    /// Returns the column's direction after the click, `None` when it is no
    /// longer sorted.
    pub fn click(&mut self, column: &str, modifier: ClickModifier) -> Option<SortDirection> {
        match modifier {
            ClickModifier::Plain => {
                let next = match self.direction_of(column) {
                    None => Some(SortDirection::Ascending),
                    Some(SortDirection::Ascending) => Some(SortDirection::Descending),
                    Some(SortDirection::Descending) => None,
                };
                self.0.clear();
                if let Some(direction) = next {
                    self.0.push(SortKey {
                        column: column.to_string(),
                        direction,
                    });
                }
                next
            }
            ClickModifier::Extend => match self.0.iter_mut().find(|k| k.column == column) {
                Some(key) => {
                    key.direction = key.direction.flipped();
                    Some(key.direction)
                }
                None => {
                    self.0.push(SortKey::ascending(column));
                    Some(SortDirection::Ascending)
                }
            },
        }
    }

    /// Values for the renderer's `sort` flag, in order.
    pub fn to_flag_values(&self) -> Vec<String> {
        self.0.iter().map(SortKey::to_flag_value).collect()
    }

    /// Parse a list of `sort` flag values.
    pub fn from_flag_values<S: AsRef<str>>(values: &[S]) -> crate::Result<Self> {
        let mut order = SortOrder::new();
        for value in values {
            order = order.then(SortKey::parse_flag_value(value.as_ref())?);
        }
        Ok(order)
    }
}

impl FromIterator<SortKey> for SortOrder {
    fn from_iter<I: IntoIterator<Item = SortKey>>(iter: I) -> Self {
        iter.into_iter().fold(SortOrder::new(), SortOrder::then)
    }
}
