//! Renderer invocation.
//!
//! A [`RenderCommand`] gathers the executable, the data file and the
//! [`Flags`] to pass, assembles them into a shell command line and runs it,
//! capturing standard output as the rendered payload.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info, warn};

use crate::error::DataGridError;
use crate::Result;

use super::flags::{
    FlagValue, Flags, OPT_AGGREGATE, OPT_AGGREGATION, OPT_AUTOCOLUMN, OPT_CALCULATE,
    OPT_DESCRIPTION, OPT_FORMATTER, OPT_RENDERER, OPT_SORT, OPT_SUPPRESSDETAIL,
};

/// Executable invoked when none is configured.
pub const DEFAULT_EXECUTABLE: &str = "rendergrid";

/// Renderer module selected by default.
pub const DEFAULT_RENDERER: &str = "datagrid.html";

/// Environment variable overriding the renderer executable path.
pub const EXECUTABLE_ENV: &str = "DATAGRID_EXECUTABLE";

/// A fully configured renderer invocation.
#[derive(Debug, Clone)]
pub struct RenderCommand {
    /// Executable name or path
    pub executable: String,
    /// Data file fed to the renderer
    pub data_file: Option<PathBuf>,
    /// Flags passed on the command line
    pub flags: Flags,
    /// Merge stderr into the captured output (`2>&1`)
    pub redirect_stderr: bool,
}

impl Default for RenderCommand {
    fn default() -> Self {
        let executable =
            std::env::var(EXECUTABLE_ENV).unwrap_or_else(|_| DEFAULT_EXECUTABLE.to_string());
        Self {
            executable,
            data_file: None,
            flags: Flags::new().with(OPT_RENDERER, DEFAULT_RENDERER),
            redirect_stderr: true,
        }
    }
}

impl RenderCommand {
    /// Create a command with the default renderer flag set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a command that renders the given data file directly.
    pub fn from_file(data_file: impl AsRef<Path>, includes_header: bool) -> Self {
        Self::new()
            .data_file(data_file)
            .flag(OPT_AUTOCOLUMN, includes_header)
    }

    /// Set the executable to invoke.
    pub fn executable(mut self, executable: impl Into<String>) -> Self {
        self.executable = executable.into();
        self
    }

    /// Set the data file.
    pub fn data_file(mut self, path: impl AsRef<Path>) -> Self {
        self.data_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set whether stderr is merged into the captured output.
    pub fn redirect_stderr(mut self, redirect: bool) -> Self {
        self.redirect_stderr = redirect;
        self
    }

    /// Set a raw flag.
    pub fn flag(mut self, name: impl Into<String>, value: impl Into<FlagValue>) -> Self {
        self.flags.set(name, value);
        self
    }

    /// Merge another flag set, later values winning.
    pub fn flags(mut self, flags: &Flags) -> Self {
        for (name, value) in flags.iter() {
            self.flags.set(name, value.clone());
        }
        self
    }

    /// Select the renderer module.
    pub fn renderer(self, renderer: impl Into<String>) -> Self {
        self.flag(OPT_RENDERER, renderer.into())
    }

    /// Set the columns to aggregate (group) on, outermost first.
    pub fn aggregate<S: AsRef<str>>(self, columns: &[S]) -> Self {
        self.flag(OPT_AGGREGATE, to_list(columns))
    }

    /// Use `method` to aggregate each of `columns`.
    pub fn aggregation_method<S: AsRef<str>>(mut self, columns: &[S], method: &str) -> Self {
        for column in columns {
            self.flags
                .push(OPT_AGGREGATION, format!("{}|{}", column.as_ref(), method));
        }
        self
    }

    /// Set sort columns; append `|desc` to a column for descending order.
    pub fn sort_by<S: AsRef<str>>(self, columns: &[S]) -> Self {
        self.flag(OPT_SORT, to_list(columns))
    }

    /// Render aggregate rows only.
    pub fn suppress_detail(self) -> Self {
        self.flag(OPT_SUPPRESSDETAIL, true)
    }

    /// Add a calculated column, e.g. `("TwiceAge", "{Age}*2")`.
    pub fn calculated_column(mut self, name: &str, expression: &str) -> Self {
        self.flags
            .push(OPT_CALCULATE, format!("{}|{}", name, expression));
        self
    }

    /// Attach a description to a column header.
    pub fn column_description(mut self, column: &str, description: &str) -> Self {
        self.flags
            .push(OPT_DESCRIPTION, format!("{}|{}", column, description));
        self
    }

    /// Chain formatters over a column, e.g. `("rate", &["%.1f", "percent"])`.
    pub fn formatter<S: AsRef<str>>(mut self, column: &str, formats: &[S]) -> Self {
        let mut entry = column.to_string();
        for format in formats {
            entry.push('|');
            entry.push_str(format.as_ref());
        }
        self.flags.push(OPT_FORMATTER, entry);
        self
    }

    /// Assemble the shell command line.
    ///
    /// Form: `<executable> <flags> <dataFile>[ 2>&1]`, skipping empty parts.
    pub fn command_line(&self) -> String {
        let mut parts = vec![self.executable.clone()];
        let args = self.flags.to_arg_string();
        if !args.is_empty() {
            parts.push(args);
        }
        if let Some(ref path) = self.data_file {
            parts.push(path.to_string_lossy().to_string());
        }
        if self.redirect_stderr {
            parts.push("2>&1".to_string());
        }
        parts.join(" ")
    }

    /// Run the renderer and return its captured output.
    ///
    /// A non-zero exit status is reported as [`DataGridError::RenderFailed`]
    /// carrying the command line and whatever the renderer printed.
    pub fn render(&self) -> Result<String> {
        let command = self.command_line();
        info!(command = %command, "invoking renderer");

        let output = Command::new("sh")
            .arg("-c")
            .arg(&command)
            .output()
            .map_err(|source| DataGridError::Spawn {
                command: command.clone(),
                source,
            })?;

        let mut captured = String::from_utf8_lossy(&output.stdout).to_string();
        if !output.status.success() {
            if !self.redirect_stderr {
                captured.push_str(&String::from_utf8_lossy(&output.stderr));
            }
            let status = match output.status.code() {
                Some(code) => format!("exit status {}", code),
                None => "terminated by signal".to_string(),
            };
            warn!(command = %command, status = %status, "renderer failed");
            return Err(DataGridError::RenderFailed {
                command,
                status,
                output: captured,
            });
        }

        debug!(bytes = captured.len(), "renderer output captured");
        Ok(captured)
    }
}

fn to_list<S: AsRef<str>>(values: &[S]) -> FlagValue {
    FlagValue::List(values.iter().map(|v| v.as_ref().to_string()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn bare(executable: &str) -> RenderCommand {
        RenderCommand::new()
            .executable(executable)
            .redirect_stderr(false)
    }

    #[test]
    fn test_default_renderer_flag() {
        let cmd = bare("rendergrid");
        assert_eq!(
            cmd.command_line(),
            "rendergrid --renderer='datagrid.html'"
        );
    }

    #[test]
    fn test_from_file_command_line() {
        let cmd = RenderCommand::from_file("data/bank.csv", true)
            .executable("../../rendergrid")
            .aggregate(&["region", "mortgage"])
            .aggregation_method(&["age", "children"], "avg")
            .sort_by(&["income"])
            .suppress_detail();

        assert_eq!(
            cmd.command_line(),
            "../../rendergrid --renderer='datagrid.html' --autocolumn \
             --aggregate='region' --aggregate='mortgage' \
             --aggregation='age|avg' --aggregation='children|avg' \
             --sort='income' --suppressdetail data/bank.csv 2>&1"
        );
    }

    #[test]
    fn test_header_flag_false_is_omitted() {
        let cmd = RenderCommand::from_file("x.csv", false)
            .executable("rg")
            .redirect_stderr(false);
        assert_eq!(cmd.command_line(), "rg --renderer='datagrid.html' x.csv");
    }

    #[test]
    fn test_calculated_and_description_flags() {
        let cmd = bare("rg")
            .calculated_column("TwiceAge", "{Age}*2")
            .column_description("Age", "How many years since birth")
            .formatter("rate", &["%.1f", "percent"]);

        assert_eq!(
            cmd.command_line(),
            "rg --renderer='datagrid.html' --calculate='TwiceAge|{Age}*2' \
             --description='Age|How many years since birth' --formatter='rate|%.1f|percent'"
        );
    }

    #[test]
    fn test_render_captures_stdout() {
        let dir = tempdir().unwrap();
        let data = dir.path().join("data.csv");
        fs::write(&data, "a,b\n1,2\n").unwrap();

        let output = RenderCommand::from_file(&data, true)
            .executable("echo")
            .render()
            .unwrap();

        assert!(output.starts_with("--renderer=datagrid.html --autocolumn"));
        assert!(output.trim_end().ends_with("data.csv"));
    }

    #[test]
    fn test_render_failure_carries_output() {
        let err = bare("echo broken; false").render().unwrap_err();
        match err {
            DataGridError::RenderFailed {
                command,
                status,
                output,
            } => {
                assert!(command.starts_with("echo broken; false"));
                assert_eq!(status, "exit status 1");
                assert_eq!(output.trim(), "broken");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_render_failure_merges_stderr() {
        let err = RenderCommand::new()
            .executable("sh -c 'echo oops >&2; exit 3'")
            .render()
            .unwrap_err();
        match err {
            DataGridError::RenderFailed { status, output, .. } => {
                assert_eq!(status, "exit status 3");
                assert!(output.contains("oops"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
