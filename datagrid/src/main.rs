//! # datagrid
//!
//! A CLI for driving the `rendergrid` renderer and inspecting the grids it produces.
//!
//! ## Overview
//!
//! datagrid is built on top of datagridlib. It assembles renderer command lines
//! from flags, runs the renderer, and reads rendered HTML grids back to show
//! how their aggregate rows nest and fold.
//!
//! ## Usage
//!
//! ```bash
//! # Render a data file with grouping and sorting
//! datagrid render people.csv --autocolumn --aggregate lastname --sort age|desc
//!
//! # Show the command line without running it
//! datagrid render people.csv --aggregate lastname --dry-run
//!
//! # Pass any other renderer flag
//! datagrid render people.csv --flag calculate='TwiceAge|{Age}*2'
//!
//! # Outline a rendered grid, collapsing the first aggregate row
//! datagrid outline page.html --table people --collapse 0
//!
//! # Everything collapsed, as JSON
//! datagrid outline page.html --collapse-all --output json
//! ```

mod logging;
mod render;

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::{Arg, ArgAction, ArgMatches, Command};
use datagridlib::command::flags::OPT_AUTOCOLUMN;
use datagridlib::{FlagValue, Flags, GridContext, GridOutline, RenderCommand};
use tracing::debug;

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("datagrid")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Render tabular data into grouped grids and inspect their outline")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("render")
                .about("Run the renderer on a data file")
                .arg(
                    Arg::new("data-file")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .help("Data file passed to the renderer"),
                )
                .arg(
                    Arg::new("executable")
                        .short('x')
                        .long("executable")
                        .help("Renderer executable (defaults to $DATAGRID_EXECUTABLE or rendergrid)"),
                )
                .arg(
                    Arg::new("renderer")
                        .short('r')
                        .long("renderer")
                        .help("Renderer module to use"),
                )
                .arg(
                    Arg::new("autocolumn")
                        .long("autocolumn")
                        .action(ArgAction::SetTrue)
                        .help("Treat the first line of the data file as column names"),
                )
                .arg(
                    Arg::new("aggregate")
                        .short('a')
                        .long("aggregate")
                        .action(ArgAction::Append)
                        .help("Group on a column, outermost first (can be specified multiple times)"),
                )
                .arg(
                    Arg::new("sort")
                        .short('s')
                        .long("sort")
                        .action(ArgAction::Append)
                        .help("Sort on a column, append |desc for descending (can be specified multiple times)"),
                )
                .arg(
                    Arg::new("suppressdetail")
                        .long("suppressdetail")
                        .action(ArgAction::SetTrue)
                        .help("Render aggregate rows only"),
                )
                .arg(
                    Arg::new("flag")
                        .long("flag")
                        .action(ArgAction::Append)
                        .value_name("NAME=VALUE")
                        .help("Extra renderer flag; a bare name is a switch (can be specified multiple times)"),
                )
                .arg(
                    Arg::new("dry-run")
                        .short('n')
                        .long("dry-run")
                        .action(ArgAction::SetTrue)
                        .help("Print the command line instead of running it"),
                ),
        )
        .subcommand(
            Command::new("outline")
                .about("Show the visible rows of rendered grid tables")
                .arg(
                    Arg::new("html-file")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .help("HTML file containing rendered grids"),
                )
                .arg(
                    Arg::new("table")
                        .short('t')
                        .long("table")
                        .help("Only outline the table with this id"),
                )
                .arg(
                    Arg::new("collapse")
                        .short('c')
                        .long("collapse")
                        .action(ArgAction::Append)
                        .value_parser(clap::value_parser!(usize))
                        .help("Collapse the aggregate row at this index if expanded (can be specified multiple times)"),
                )
                .arg(
                    Arg::new("collapse-all")
                        .long("collapse-all")
                        .action(ArgAction::SetTrue)
                        .help("Collapse every aggregate row"),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_parser(["text", "json"])
                        .default_value("text")
                        .help("Output format"),
                ),
        )
}

/// Split a `--flag` argument into a name and value.
///
/// `name=value` sets a value; a bare `name` is a switch. Repeating a name
/// accumulates a list.
fn parse_extra_flags<'a>(raw: impl Iterator<Item = &'a String>) -> anyhow::Result<Flags> {
    let mut flags = Flags::new();
    for entry in raw {
        match entry.split_once('=') {
            Some((name, _)) if name.trim().is_empty() => {
                bail!("invalid --flag '{}': missing name", entry)
            }
            Some((name, value)) => match flags.get(name.trim()) {
                Some(FlagValue::Switch(_)) | None => {
                    flags.set(name.trim(), value);
                }
                Some(_) => {
                    flags.push(name.trim(), value);
                }
            },
            None if entry.trim().is_empty() => bail!("invalid --flag: empty name"),
            None => {
                flags.set(entry.trim(), true);
            }
        }
    }
    Ok(flags)
}

fn strings(matches: &ArgMatches, id: &str) -> Vec<String> {
    matches
        .get_many::<String>(id)
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

fn render_handler(matches: &ArgMatches) -> anyhow::Result<String> {
    let data_file = matches
        .get_one::<PathBuf>("data-file")
        .context("missing data file")?;

    let mut command = RenderCommand::new().data_file(data_file);
    if let Some(executable) = matches.get_one::<String>("executable") {
        command = command.executable(executable);
    }
    if let Some(renderer) = matches.get_one::<String>("renderer") {
        command = command.renderer(renderer);
    }
    if matches.get_flag("autocolumn") {
        command = command.flag(OPT_AUTOCOLUMN, true);
    }
    let aggregate = strings(matches, "aggregate");
    if !aggregate.is_empty() {
        command = command.aggregate(&aggregate);
    }
    let sort = strings(matches, "sort");
    if !sort.is_empty() {
        command = command.sort_by(&sort);
    }
    if matches.get_flag("suppressdetail") {
        command = command.suppress_detail();
    }
    if let Some(extra) = matches.get_many::<String>("flag") {
        command = command.flags(&parse_extra_flags(extra)?);
    }

    if matches.get_flag("dry-run") {
        return Ok(format!("{}\n", command.command_line()));
    }

    let output = command.render()?;
    Ok(output)
}

fn outline_handler(matches: &ArgMatches) -> anyhow::Result<String> {
    let path = matches
        .get_one::<PathBuf>("html-file")
        .context("missing HTML file")?;
    let markup = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let mut ctx = GridContext::new();
    let initialized = ctx.init(&markup)?;
    let ids = match matches.get_one::<String>("table") {
        Some(id) if initialized.contains(id) => vec![id.clone()],
        Some(id) => bail!("no grid table with id '{}' in {}", id, path.display()),
        None if initialized.is_empty() => bail!("no grid tables found in {}", path.display()),
        None => initialized,
    };

    let collapse: Vec<usize> = matches
        .get_many::<usize>("collapse")
        .map(|values| values.copied().collect())
        .unwrap_or_default();

    let mut outlines = Vec::new();
    for id in &ids {
        if matches.get_flag("collapse-all") {
            if let Some(table) = ctx.table_mut(id) {
                table.grid.collapse_all();
            }
        }
        if let Some(table) = ctx.table_mut(id) {
            for &row in &collapse {
                let collapsed = table.grid.collapse(row);
                debug!(table = %id, row, collapsed, "applied row collapse");
            }
        }
        if let Some(table) = ctx.table(id) {
            outlines.push(GridOutline::from_grid(&table.grid).title(id.as_str()));
        }
    }

    match matches.get_one::<String>("output").map(String::as_str) {
        Some("json") => Ok(format!("{}\n", serde_json::to_string_pretty(&outlines)?)),
        _ => Ok(outlines
            .iter()
            .map(render::render_outline)
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

fn main() -> ExitCode {
    if let Err(e) = logging::init_logging() {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    let matches = build_command().get_matches();
    let result = match matches.subcommand() {
        Some(("render", sub)) => render_handler(sub),
        Some(("outline", sub)) => outline_handler(sub),
        _ => Err(anyhow::anyhow!("unknown command")),
    };

    match result {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_command_is_valid() {
        build_command().debug_assert();
    }

    #[test]
    fn test_parse_extra_flags() {
        let raw = vec![
            "verbose".to_string(),
            "calculate=Twice|{Age}*2".to_string(),
            "calculate=Half|{Age}/2".to_string(),
            "title=People".to_string(),
        ];
        let flags = parse_extra_flags(raw.iter()).unwrap();

        assert_eq!(flags.get("verbose"), Some(&FlagValue::Switch(true)));
        assert_eq!(
            flags.get("calculate"),
            Some(&FlagValue::List(vec![
                "Twice|{Age}*2".to_string(),
                "Half|{Age}/2".to_string()
            ]))
        );
        assert_eq!(flags.get("title"), Some(&FlagValue::Value("People".to_string())));
    }

    #[test]
    fn test_parse_extra_flags_rejects_missing_name() {
        let raw = vec!["=value".to_string()];
        assert!(parse_extra_flags(raw.iter()).is_err());
    }

    #[test]
    fn test_render_handler_dry_run() {
        let matches = build_command().get_matches_from([
            "datagrid",
            "render",
            "people.csv",
            "--executable",
            "rendergrid",
            "--autocolumn",
            "--aggregate",
            "lastname",
            "--sort",
            "age|desc",
            "--dry-run",
        ]);
        let (_, sub) = matches.subcommand().unwrap();
        let line = render_handler(sub).unwrap();

        assert_eq!(
            line,
            "rendergrid --renderer='datagrid.html' --autocolumn --aggregate='lastname' \
             --sort='age|desc' people.csv 2>&1\n"
        );
    }
}
