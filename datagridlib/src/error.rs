//! Error types for datagridlib

use thiserror::Error;

/// Errors that can occur while rendering grids or handling their markup
#[derive(Error, Debug)]
pub enum DataGridError {
    /// The renderer process could not be started
    #[error("failed to run renderer command '{command}': {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    /// The renderer exited unsuccessfully; its captured output is attached
    #[error("renderer command '{command}' failed ({status}): {output}")]
    RenderFailed {
        command: String,
        status: String,
        output: String,
    },

    /// Embedded or supplied table configuration could not be decoded
    #[error("invalid table configuration: {0}")]
    Config(String),

    /// A sort flag value could not be parsed
    #[error("invalid sort specification '{value}': {message}")]
    InvalidSort { value: String, message: String },

    /// The reload transport failed to fetch replacement markup
    #[error("reload of table '{table}' failed: {message}")]
    Transport { table: String, message: String },

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
