//! Per-table display configuration.
//!
//! The same configuration is embedded in the page next to each rendered
//! table, serialized into reload requests, and mapped back onto renderer
//! flags when the table is re-rendered.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::command::flags::{
    Flags, OPT_AGGREGATE, OPT_AGGREGATION, OPT_RENDERER, OPT_SORT, OPT_SUPPRESSDETAIL,
};

use super::sort::SortOrder;

/// Display configuration for one table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableConfig {
    /// Selected display columns (empty = all)
    pub columns: Vec<String>,
    /// Sort order, most significant first
    pub sort: SortOrder,
    /// Grouping columns, outermost first
    pub groupby: Vec<String>,
    /// Aggregation method per column
    pub aggregation: BTreeMap<String, String>,
    /// Render aggregate rows only
    pub suppress_detail: bool,
    /// Renderer module override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renderer: Option<String>,
}

impl TableConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to compact JSON, as carried by reload requests.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Builder: set grouping columns.
    pub fn groupby<S: AsRef<str>>(mut self, columns: &[S]) -> Self {
        self.groupby = columns.iter().map(|c| c.as_ref().to_string()).collect();
        self
    }

    /// Builder: set the sort order.
    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    /// Builder: set display columns.
    pub fn columns<S: AsRef<str>>(mut self, columns: &[S]) -> Self {
        self.columns = columns.iter().map(|c| c.as_ref().to_string()).collect();
        self
    }

    /// Number of grouping columns, i.e. the deepest aggregate level.
    pub fn group_count(&self) -> usize {
        self.groupby.len()
    }

    /// Map onto renderer flags.
    ///
    /// Display column selection has no renderer flag and is left out.
    pub fn to_flags(&self) -> Flags {
        let mut flags = Flags::new();
        if let Some(ref renderer) = self.renderer {
            flags.set(OPT_RENDERER, renderer.as_str());
        }
        flags.set(OPT_AGGREGATE, self.groupby.clone());
        flags.set(
            OPT_AGGREGATION,
            self.aggregation
                .iter()
                .map(|(column, method)| format!("{}|{}", column, method))
                .collect::<Vec<_>>(),
        );
        flags.set(OPT_SORT, self.sort.to_flag_values());
        flags.set(OPT_SUPPRESSDETAIL, self.suppress_detail);
        flags
    }
}
