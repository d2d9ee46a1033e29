//! Page session: initialized tables, init hooks and reloads.
//!
//! - **GridContext**: Explicit per-page state replacing global registries
//! - **TableInitHook**: Typed callback run for each initialized table
//! - **Reload**: One in-flight reload per table through a caller-supplied transport
//!
//! ## Example
//!
//! ```rust,ignore
//! use datagridlib::session::{GridContext, ReloadOutcome};
//!
//! let mut ctx = GridContext::new();
//! ctx.add_hook(|table: &GridTable| println!("ready: {}", table.id));
//! ctx.init(&page_html)?;
//!
//! match ctx.reload("sales", &mut http_transport)? {
//!     ReloadOutcome::Expired => ask_for_page_reload(),
//!     _ => {}
//! }
//! ```

pub mod context;
pub mod reload;

pub use context::{GridContext, GridTable, TableInitHook};
pub use reload::{is_expired, ReloadOutcome, ReloadRequest, ReloadTransport, EXPIRED_SENTINEL};
