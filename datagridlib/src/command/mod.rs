//! Renderer command assembly and invocation.
//!
//! This module handles the first stage of the pipeline - turning a caller's
//! configuration into a renderer run. It provides:
//!
//! - **Flags**: Insertion-ordered option mapping serialized to shell arguments
//! - **RenderCommand**: Executable + flags + data file, run as a subprocess
//!
//! ## Example
//!
//! ```rust,ignore
//! use datagridlib::command::RenderCommand;
//!
//! let html = RenderCommand::from_file("bank-data.csv", true)
//!     .aggregate(&["region", "mortgage"])
//!     .sort_by(&["income|desc"])
//!     .render()?;
//! ```

pub mod flags;
pub mod renderer;

pub use flags::{escape_value, FlagValue, Flags};
pub use renderer::{RenderCommand, DEFAULT_EXECUTABLE, DEFAULT_RENDERER, EXECUTABLE_ENV};
