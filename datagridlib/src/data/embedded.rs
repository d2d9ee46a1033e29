//! Configuration embedded in the page alongside rendered tables.
//!
//! Pages carry one JSON block keyed by table id:
//!
//! ```html
//! <script type="application/json" class="datagrid-config">
//!   {"sales": {"config": {"groupby": ["region"]}, "meta": {"title": "Sales"}}}
//! </script>
//! ```

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::DataGridError;
use crate::query::config::TableConfig;
use crate::Result;

use super::markup::{attribute, parse_attributes};

/// Class token of the script element holding embedded configuration.
pub const CONFIG_SCRIPT_CLASS: &str = "datagrid-config";

static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b([^>]*)>(.*?)</script\s*>").unwrap());

/// Configuration and metadata for one embedded table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddedTable {
    /// Display configuration
    pub config: TableConfig,
    /// Free-form metadata supplied by the page
    pub meta: serde_json::Value,
}

/// Read embedded table configuration from `markup`.
///
/// Several configuration blocks are merged, later blocks winning per table.
/// No block at all yields an empty map.
pub fn parse_embedded_config(markup: &str) -> Result<BTreeMap<String, EmbeddedTable>> {
    let mut tables = BTreeMap::new();

    for caps in SCRIPT_RE.captures_iter(markup) {
        let attrs = parse_attributes(&caps[1]);
        let is_config = attribute(&attrs, "class")
            .is_some_and(|class| class.split_whitespace().any(|c| c == CONFIG_SCRIPT_CLASS));
        if !is_config {
            continue;
        }

        let block: BTreeMap<String, EmbeddedTable> = serde_json::from_str(caps[2].trim())
            .map_err(|e| DataGridError::Config(e.to_string()))?;
        debug!(tables = block.len(), "read embedded configuration block");
        tables.extend(block);
    }

    Ok(tables)
}
