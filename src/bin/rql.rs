//! Command-line interface for rql
//!
//! Usage:
//!   rql parse `<query>` [--format `<format>`] [--parser grammar|reference]  - Parse and print a query
//!   rql tree `<query>`                                                    - Print the grammar parse tree
//!   rql check `<query>`                                                   - Report `ok` or the syntax error
//!   rql highlight `<query>`                                               - Print highlight spans
//!   rql formats                                                         - List output formats
//!
//! A query argument of `-` is read from stdin. Settings come from the embedded defaults,
//! an optional `--config` file and the command line, in increasing precedence.

use clap::{Arg, ArgMatches, Command};
use rql::rql::config::{ConfigError, LogLevel, Loader, RqlConfig};
use rql::rql::engine::{ParseError, SyntaxError};
use rql::rql::formats::{FormatError, FormatRegistry};
use rql::rql::highlight::Highlighter;
use rql::rql::logging::init_logging;
use rql::rql::parsing::{Parser, QueryError};
use std::io::{self, Read};
use std::process::ExitCode;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("error reading query: {0}")]
    Io(#[from] io::Error),
    #[error("{0}")]
    Query(#[from] QueryError),
    #[error("{0}")]
    Parse(#[from] ParseError),
    #[error("{0}")]
    Format(#[from] FormatError),
}

fn query_arg() -> Arg {
    Arg::new("query")
        .help("Query text, or '-' to read it from stdin")
        .required(true)
        .index(1)
}

fn cli() -> Command {
    Command::new("rql")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Parse, check and inspect RQL queries")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("TOML file layered over the default configuration"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .value_parser(clap::value_parser!(LogLevel))
                .help("off, error, warn, info, debug or trace"),
        )
        .arg(
            Arg::new("parser")
                .long("parser")
                .short('p')
                .global(true)
                .value_parser(clap::value_parser!(Parser))
                .help("Parser implementation: grammar or reference"),
        )
        .arg(
            Arg::new("max-depth")
                .long("max-depth")
                .global(true)
                .value_parser(clap::value_parser!(u32).range(1..))
                .help("Deepest filter nesting accepted"),
        )
        .subcommand(
            Command::new("parse")
                .about("Parse a query and print it in the chosen format")
                .arg(query_arg())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format (see `rql formats`), defaults to output.format"),
                ),
        )
        .subcommand(
            Command::new("tree")
                .about("Print the labelled parse tree of the grammar parser")
                .arg(query_arg()),
        )
        .subcommand(
            Command::new("check")
                .about("Check a query, exit status 1 when it does not parse")
                .arg(query_arg()),
        )
        .subcommand(
            Command::new("highlight")
                .about("Print one `style<TAB>text` line per highlighted span")
                .arg(query_arg()),
        )
        .subcommand(Command::new("formats").about("List available output formats"))
}

fn main() -> ExitCode {
    let matches = cli().get_matches();

    let config = match load_config(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    init_logging(config.logging.level);
    debug!(?config, "configuration loaded");

    let result = match matches.subcommand() {
        Some(("parse", sub)) => handle_parse_command(&config, sub),
        Some(("tree", sub)) => handle_tree_command(&config, sub),
        Some(("check", sub)) => handle_check_command(&config, sub),
        Some(("highlight", sub)) => handle_highlight_command(sub),
        Some(("formats", _)) => {
            handle_formats_command();
            Ok(ExitCode::SUCCESS)
        }
        _ => unreachable!(),
    };

    result.unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        ExitCode::FAILURE
    })
}

/// A global option, given before or after the subcommand
fn global<'m, T: Clone + Send + Sync + 'static>(matches: &'m ArgMatches, id: &str) -> Option<&'m T> {
    matches
        .subcommand()
        .and_then(|(_, sub)| sub.get_one::<T>(id))
        .or_else(|| matches.get_one::<T>(id))
}

fn load_config(matches: &ArgMatches) -> Result<RqlConfig, ConfigError> {
    let mut loader = Loader::new();
    if let Some(path) = global::<String>(matches, "config") {
        loader = loader.with_file(path);
    }
    if let Some(level) = global::<LogLevel>(matches, "log-level") {
        loader = loader.set_override("logging.level", level.as_str())?;
    }
    if let Some(parser) = global::<Parser>(matches, "parser") {
        loader = loader.set_override("parser.engine", parser.as_str())?;
    }
    if let Some(depth) = global::<u32>(matches, "max-depth") {
        loader = loader.set_override("parser.max_depth", i64::from(*depth))?;
    }
    loader.build()
}

/// The query argument, read from stdin when it is `-`
fn read_query(matches: &ArgMatches) -> Result<String, CliError> {
    let arg = matches
        .get_one::<String>("query")
        .map(String::as_str)
        .unwrap_or("-");
    if arg != "-" {
        return Ok(arg.to_string());
    }
    let mut source = String::new();
    io::stdin().read_to_string(&mut source)?;
    Ok(source.trim_end_matches(['\n', '\r']).to_string())
}

fn handle_parse_command(config: &RqlConfig, matches: &ArgMatches) -> Result<ExitCode, CliError> {
    let source = read_query(matches)?;
    let format = matches
        .get_one::<String>("format")
        .unwrap_or(&config.output.format);
    let registry = FormatRegistry::with_defaults();
    if !registry.has(format) {
        return Err(FormatError::FormatNotFound(format.clone()).into());
    }

    let query = config.query_parser().parse(&source)?;
    let output = registry.serialize(&query, format)?;
    if output.ends_with('\n') {
        print!("{}", output);
    } else {
        println!("{}", output);
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_tree_command(config: &RqlConfig, matches: &ArgMatches) -> Result<ExitCode, CliError> {
    let source = read_query(matches)?;
    let parser = config.query_parser();
    let tree = parser.grammar().parse(&source)?;
    print!("{}", tree);
    Ok(ExitCode::SUCCESS)
}

fn handle_check_command(config: &RqlConfig, matches: &ArgMatches) -> Result<ExitCode, CliError> {
    let source = read_query(matches)?;
    match config.query_parser().parse(&source) {
        Ok(_) => {
            println!("ok");
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            println!("{}", err);
            if let Some(syntax) = err.syntax() {
                let (line, caret) = pointer(&source, syntax);
                println!("  {}", line);
                println!("  {}", caret);
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

fn handle_highlight_command(matches: &ArgMatches) -> Result<ExitCode, CliError> {
    let source = read_query(matches)?;
    for span in Highlighter::new().highlight(&source) {
        println!("{}\t{}", span.style, span.text(&source));
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_formats_command() {
    let registry = FormatRegistry::with_defaults();
    println!("Available formats:\n");
    for name in registry.list_formats() {
        if let Some(formatter) = registry.get(&name) {
            println!("  {:<10}{}", name, formatter.description());
        }
    }
}

/// The offending source line and a caret under the error position
fn pointer<'s>(source: &'s str, err: &SyntaxError) -> (&'s str, String) {
    let line = source.split('\n').nth(err.line - 1).unwrap_or("");
    let line = line.strip_suffix('\r').unwrap_or(line);
    (line, format!("{}^", " ".repeat(err.column)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rql::rql::parsing::parse;

    fn syntax(source: &str) -> SyntaxError {
        parse(source).unwrap_err().syntax().cloned().unwrap()
    }

    #[test]
    fn test_pointer_first_line() {
        let source = "Foo(bar{x==1";
        let (line, caret) = pointer(source, &syntax(source));
        assert_eq!(line, source);
        assert_eq!(caret, format!("{}^", " ".repeat(12)));
    }

    #[test]
    fn test_pointer_later_line() {
        let source = "Foo,\nBar(x,)";
        let (line, caret) = pointer(source, &syntax(source));
        assert_eq!(line, "Bar(x,)");
        assert_eq!(caret, "      ^");
    }

    #[test]
    fn test_cli_definition() {
        cli().debug_assert();
    }

    #[test]
    fn test_global_overrides() {
        let matches = cli()
            .try_get_matches_from(["rql", "check", "--parser", "reference", "--max-depth", "3", "A"])
            .unwrap();
        let config = load_config(&matches).unwrap();
        assert_eq!(config.parser.engine, Parser::Reference);
        assert_eq!(config.parser.max_depth, 3);
    }
}
