//! Rendered table markup scanning.
//!
//! The renderer emits each grid as a `<table class='datagrid'>` whose body
//! rows carry their aggregation level in the class name (`l-0` for detail
//! rows, `l-1`, `l-2`, ... for aggregate rows). This module reads that
//! markup back into plain data without building a DOM.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Class token identifying rendered grids.
pub const TABLE_CLASS: &str = "datagrid";

/// Character offset of the level digits within a row class name.
pub const LEVEL_OFFSET: usize = 2;

static TABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<table\b([^>]*)>(.*?)</table\s*>").unwrap());
static TBODY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<tbody\b[^>]*>(.*?)</tbody\s*>").unwrap());
static ROW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<tr\b([^>]*)>(.*?)</tr\s*>").unwrap());
static CELL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<t[dh]\b[^>]*>(.*?)</t[dh]\s*>").unwrap());
static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .unwrap()
});
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());

/// One body row as found in the markup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowMarkup {
    /// Raw `class` attribute, if present
    pub class: Option<String>,
    /// Cell text with tags stripped and entities decoded
    pub cells: Vec<String>,
    /// The complete `<tr>` element
    pub raw: String,
}

impl RowMarkup {
    /// Aggregation level encoded in the class name (0 = detail row).
    pub fn level(&self) -> u32 {
        parse_level(self.class.as_deref())
    }
}

/// A rendered grid table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMarkup {
    /// Table `id` attribute
    pub id: Option<String>,
    /// Column count from the `cols` attribute
    pub columns: Option<usize>,
    /// Rows of the first `<tbody>`, in document order
    pub body_rows: Vec<RowMarkup>,
}

impl TableMarkup {
    /// Aggregation levels of the body rows, in order.
    pub fn levels(&self) -> Vec<u32> {
        self.body_rows.iter().map(RowMarkup::level).collect()
    }
}

/// Read the aggregation level from a row class name.
///
/// The level is the run of digits starting at [`LEVEL_OFFSET`]; anything
/// unreadable counts as a detail row.
pub fn parse_level(class: Option<&str>) -> u32 {
    let Some(class) = class else {
        return 0;
    };
    let digits: String = class
        .chars()
        .skip(LEVEL_OFFSET)
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

/// Find every grid table in `markup`, in document order.
pub fn find_tables(markup: &str) -> Vec<TableMarkup> {
    let tables: Vec<TableMarkup> = TABLE_RE
        .captures_iter(markup)
        .filter_map(|caps| {
            let attrs = parse_attributes(&caps[1]);
            let is_grid = attribute(&attrs, "class")
                .is_some_and(|class| class.split_whitespace().any(|c| c == TABLE_CLASS));
            is_grid.then(|| TableMarkup {
                id: attribute(&attrs, "id").map(str::to_string),
                columns: attribute(&attrs, "cols").and_then(|c| c.trim().parse().ok()),
                body_rows: parse_body_rows(&caps[2]),
            })
        })
        .collect();
    debug!(tables = tables.len(), "scanned markup for grid tables");
    tables
}

/// Find the grid table with the given id.
pub fn find_table(markup: &str, id: &str) -> Option<TableMarkup> {
    find_tables(markup)
        .into_iter()
        .find(|t| t.id.as_deref() == Some(id))
}

/// Collect `name=value` attribute pairs from the inside of a start tag.
pub(crate) fn parse_attributes(tag_body: &str) -> Vec<(String, String)> {
    ATTR_RE
        .captures_iter(tag_body)
        .map(|caps| {
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| decode_entities(m.as_str()))
                .unwrap_or_default();
            (caps[1].to_ascii_lowercase(), value)
        })
        .collect()
}

pub(crate) fn attribute<'a>(attrs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

fn parse_body_rows(table_inner: &str) -> Vec<RowMarkup> {
    let Some(body) = TBODY_RE.captures(table_inner) else {
        return Vec::new();
    };
    ROW_RE
        .captures_iter(&body[1])
        .map(|caps| {
            let attrs = parse_attributes(&caps[1]);
            RowMarkup {
                class: attribute(&attrs, "class").map(str::to_string),
                cells: CELL_RE
                    .captures_iter(&caps[2])
                    .map(|cell| cell_text(&cell[1]))
                    .collect(),
                raw: caps[0].to_string(),
            }
        })
        .collect()
}

fn cell_text(inner: &str) -> String {
    let stripped = TAG_RE.replace_all(inner, " ");
    let text = decode_entities(&stripped);
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}
