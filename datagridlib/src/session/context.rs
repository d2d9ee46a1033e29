//! Caller-owned state for every grid on a page.
//!
//! A [`GridContext`] holds each table's configuration, metadata, grid and
//! reload flag, plus the hooks to run when a table is initialized. Create
//! one per page or session and pass it to the calls that need it.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::data::embedded::parse_embedded_config;
use crate::data::markup::{find_table, find_tables, TableMarkup};
use crate::grid::{Grid, GridStyle};
use crate::query::config::TableConfig;
use crate::query::sort::{ClickModifier, SortDirection};
use crate::Result;

use super::reload::{is_expired, ReloadOutcome, ReloadRequest, ReloadTransport};

/// One initialized table.
#[derive(Debug, Clone, PartialEq)]
pub struct GridTable {
    /// Table identifier
    pub id: String,
    /// Display configuration
    pub config: TableConfig,
    /// Metadata embedded with the table
    pub meta: Value,
    /// Grouped rows
    pub grid: Grid,
    busy: bool,
    stale: bool,
}

impl GridTable {
    /// Whether a reload is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Whether the sort order changed while a reload was in flight, so the
    /// current grid does not reflect it yet.
    pub fn needs_reload(&self) -> bool {
        self.stale
    }
}

/// Callback run for each table as it is initialized.
pub trait TableInitHook {
    /// Called once per table, after its grid is built.
    fn on_table_init(&mut self, table: &GridTable);
}

impl<F> TableInitHook for F
where
    F: FnMut(&GridTable),
{
    fn on_table_init(&mut self, table: &GridTable) {
        self(table)
    }
}

/// State for all grids on a page.
#[derive(Default)]
pub struct GridContext {
    style: GridStyle,
    tables: BTreeMap<String, GridTable>,
    hooks: Vec<Box<dyn TableInitHook>>,
}

impl fmt::Debug for GridContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridContext")
            .field("style", &self.style)
            .field("tables", &self.tables)
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

impl GridContext {
    /// Create an empty context with default styling.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set styling used when building grids.
    pub fn style(mut self, style: GridStyle) -> Self {
        self.style = style;
        self
    }

    /// Register a hook. Hooks run in registration order.
    pub fn add_hook(&mut self, hook: impl TableInitHook + 'static) -> &mut Self {
        self.hooks.push(Box::new(hook));
        self
    }

    /// Initialize every grid table found in `markup`.
    ///
    /// Embedded configuration is read first; tables without an entry get a
    /// default configuration. Tables without an `id` cannot be addressed
    /// and are skipped. Returns the initialized ids in document order.
    pub fn init(&mut self, markup: &str) -> Result<Vec<String>> {
        let mut embedded = parse_embedded_config(markup)?;
        let mut ids = Vec::new();

        for table in find_tables(markup) {
            let Some(id) = table.id.clone() else {
                warn!("skipping grid table without an id");
                continue;
            };
            let entry = embedded.remove(&id).unwrap_or_default();
            let grid = self.build_grid(Some(&table), &entry.config);
            let table = GridTable {
                id: id.clone(),
                config: entry.config,
                meta: entry.meta,
                grid,
                busy: false,
                stale: false,
            };

            for hook in &mut self.hooks {
                hook.on_table_init(&table);
            }
            debug!(table = %id, rows = table.grid.len(), "initialized table");
            self.tables.insert(id.clone(), table);
            ids.push(id);
        }

        info!(tables = ids.len(), "initialized grids");
        Ok(ids)
    }

    /// Look up a table.
    pub fn table(&self, id: &str) -> Option<&GridTable> {
        self.tables.get(id)
    }

    /// Ids of all tables, sorted.
    pub fn table_ids(&self) -> Vec<&str> {
        self.tables.keys().map(String::as_str).collect()
    }

    /// Mutable access to a table's configuration and grid.
    pub fn table_mut(&mut self, id: &str) -> Option<&mut GridTable> {
        self.tables.get_mut(id)
    }

    /// Row click on a table: toggles the row when it is an aggregate row.
    pub fn click_row(&mut self, id: &str, row: usize) -> bool {
        self.tables
            .get_mut(id)
            .is_some_and(|table| table.grid.click(row))
    }

    /// Header click: update the sort order, then reload the table.
    ///
    /// The sort order changes even when the reload is dropped because one is
    /// already in flight.
    pub fn click_header(
        &mut self,
        id: &str,
        column: &str,
        modifier: ClickModifier,
        transport: &mut dyn ReloadTransport,
    ) -> Result<ReloadOutcome> {
        let Some(table) = self.tables.get_mut(id) else {
            return Ok(ReloadOutcome::UnknownTable);
        };
        let direction: Option<SortDirection> = table.config.sort.click(column, modifier);
        if table.busy {
            table.stale = true;
        }
        debug!(table = %id, column, ?direction, "sort order changed");
        self.reload(id, transport)
    }

    /// Start a reload, marking the table busy.
    ///
    /// Returns `None` when the table is unknown or already reloading.
    pub fn begin_reload(&mut self, id: &str) -> Result<Option<ReloadRequest>> {
        let Some(table) = self.tables.get_mut(id) else {
            return Ok(None);
        };
        if table.busy {
            debug!(table = %id, "reload already in flight, dropping request");
            return Ok(None);
        }
        let config_json = table.config.to_json()?;
        table.busy = true;
        table.stale = false;
        Ok(Some(ReloadRequest {
            table_id: id.to_string(),
            config_json,
        }))
    }

    /// Complete a reload started with [`GridContext::begin_reload`].
    ///
    /// The busy flag is cleared whatever the response. A transport error is
    /// returned as is; it is never retried. A response for a table with no
    /// reload in flight is ignored.
    ///
    /// A sort order changed by a header click during the reload is kept over
    /// the configuration carried by the response, and the table reports
    /// [`GridTable::needs_reload`] until the next reload starts.
    pub fn finish_reload(&mut self, id: &str, response: Result<String>) -> Result<ReloadOutcome> {
        let Some(table) = self.tables.get_mut(id) else {
            return Ok(ReloadOutcome::UnknownTable);
        };
        if !table.busy {
            warn!(table = %id, "reload response without a pending request, ignoring");
            return Ok(ReloadOutcome::NotInFlight);
        }
        table.busy = false;

        let body = response?;
        if is_expired(&body) {
            warn!(table = %id, "session expired; a full page reload is required");
            return Ok(ReloadOutcome::Expired);
        }

        if let Some(entry) = parse_embedded_config(&body)?.remove(id) {
            let local_sort = table.stale.then(|| table.config.sort.clone());
            table.config = entry.config;
            if let Some(sort) = local_sort {
                table.config.sort = sort;
            }
            table.meta = entry.meta;
        }
        let replacement = find_table(&body, id);
        let config = table.config.clone();
        let grid = self.build_grid(replacement.as_ref(), &config);
        let rows = grid.len();
        if let Some(table) = self.tables.get_mut(id) {
            table.grid = grid;
        }

        info!(table = %id, rows, "table reloaded");
        Ok(ReloadOutcome::Replaced { rows })
    }

    /// Reload a table through `transport`.
    ///
    /// While a reload is in flight further requests for the same table are
    /// dropped without contacting the transport.
    pub fn reload(
        &mut self,
        id: &str,
        transport: &mut dyn ReloadTransport,
    ) -> Result<ReloadOutcome> {
        let Some(request) = self.begin_reload(id)? else {
            return Ok(if self.tables.contains_key(id) {
                ReloadOutcome::Busy
            } else {
                ReloadOutcome::UnknownTable
            });
        };
        let response = transport.fetch(&request);
        self.finish_reload(id, response)
    }

    fn build_grid(&self, table: Option<&TableMarkup>, config: &TableConfig) -> Grid {
        let style = match config.group_count() {
            0 => self.style,
            count => self.style.group_count(count),
        };
        Grid::from_table(table, &style)
    }
}
