//! Argument parsing and command dispatch.

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use clap::{Args, Parser, Subcommand, ValueEnum};
use quire_telemetry::SharedWriter;
use uuid::Uuid;

use crate::commands::cache::{handle_cache_clear, handle_cache_show};
use crate::commands::parse::handle_parse;
use crate::error::CliResult;

/// Parse process arguments, execute the command against stdout, and return
/// the process exit code.
#[must_use]
pub fn run() -> i32 {
    run_with(std::env::args_os(), io::stdout())
}

/// Parse `args`, execute the command writing console output to `output`, and
/// return the process exit code.
pub fn run_with<I, T, W>(args: I, output: W) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    W: Write + Send + 'static,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return err.exit_code();
        }
    };

    let sink: Box<dyn Write + Send> = Box::new(output);
    let output: SharedWriter = Arc::new(Mutex::new(sink));
    let run_id = Uuid::new_v4();
    let command_name = command_label(&cli.command);

    match dispatch(cli, &output) {
        Ok(()) => {
            tracing::debug!(%run_id, command = command_name, "command finished");
            0
        }
        Err(err) => {
            let exit_code = err.exit_code();
            tracing::debug!(%run_id, command = command_name, exit_code, "command failed");
            eprintln!("error: {}", err.display_message());
            exit_code
        }
    }
}

fn dispatch(cli: Cli, output: &SharedWriter) -> CliResult<()> {
    let logging = cli.logging;
    match cli.command {
        Command::Parse(args) => handle_parse(args, &logging, output),
        Command::Cache(CacheCommand::Show(args)) => handle_cache_show(&args, &logging, output),
        Command::Cache(CacheCommand::Clear(args)) => handle_cache_clear(&args, &logging, output),
    }
}

#[derive(Parser)]
#[command(
    name = "quire",
    version,
    about = "Incremental documentation builder with a persistent analysis cache"
)]
struct Cli {
    #[command(flatten)]
    logging: LoggingArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Clone, Default)]
pub(crate) struct LoggingArgs {
    #[arg(
        long,
        global = true,
        env = "QUIRE_LOG",
        help = "Diagnostic log level used when RUST_LOG is unset"
    )]
    pub(crate) log_level: Option<String>,
    #[arg(
        long,
        global = true,
        env = "QUIRE_LOG_FORMAT",
        help = "Diagnostic log format (pretty or json)"
    )]
    pub(crate) log_format: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Analyse changed sources and report recorded errors.
    Parse(ParseArgs),
    /// Inspect or remove the analysis cache.
    #[command(subcommand)]
    Cache(CacheCommand),
}

#[derive(Subcommand)]
enum CacheCommand {
    /// List cached file records.
    Show(CacheShowArgs),
    /// Delete the cache file.
    Clear(CacheClearArgs),
}

#[derive(Args, Default)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct ParseArgs {
    #[arg(help = "Source root to scan (defaults to the current directory)")]
    pub(crate) root: Option<PathBuf>,
    #[arg(long, help = "Config file to read instead of quire.json in the root")]
    pub(crate) config: Option<PathBuf>,
    #[arg(long, env = "QUIRE_CACHE", help = "Cache file location")]
    pub(crate) cache: Option<PathBuf>,
    #[arg(
        long = "extension",
        value_delimiter = ',',
        help = "File extension to analyse; may be repeated"
    )]
    pub(crate) extensions: Vec<String>,
    #[arg(long, help = "Ignore the cache and analyse every file")]
    pub(crate) force: bool,
    #[arg(long, help = "Continue past files that fail to analyse")]
    pub(crate) keep_going: bool,
    #[arg(long, short = 'v', help = "Show log lines of every severity")]
    pub(crate) debug: bool,
    #[arg(long, help = "Scan hidden files and directories")]
    pub(crate) include_hidden: bool,
    #[arg(long, help = "Write Prometheus metrics to this file after the run")]
    pub(crate) metrics: Option<PathBuf>,
}

#[derive(Args, Default)]
pub(crate) struct CacheShowArgs {
    #[arg(help = "Source root whose cache to use (defaults to the current directory)")]
    pub(crate) root: Option<PathBuf>,
    #[arg(long, env = "QUIRE_CACHE", help = "Cache file location")]
    pub(crate) cache: Option<PathBuf>,
    #[arg(
        long,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format"
    )]
    pub(crate) output: OutputFormat,
}

#[derive(Args, Default)]
pub(crate) struct CacheClearArgs {
    #[arg(help = "Source root whose cache to use (defaults to the current directory)")]
    pub(crate) root: Option<PathBuf>,
    #[arg(long, env = "QUIRE_CACHE", help = "Cache file location")]
    pub(crate) cache: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Parse(_) => "parse",
        Command::Cache(CacheCommand::Show(_)) => "cache_show",
        Command::Cache(CacheCommand::Clear(_)) => "cache_clear",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_flags_are_collected() {
        let cli = Cli::try_parse_from([
            "quire",
            "parse",
            "docs",
            "--extension",
            "php,inc",
            "--extension",
            "rs",
            "--keep-going",
            "-v",
            "--cache",
            "/tmp/cache.json",
        ])
        .expect("valid arguments");

        let Command::Parse(args) = cli.command else {
            panic!("expected parse command");
        };
        assert_eq!(args.root, Some(PathBuf::from("docs")));
        assert_eq!(args.extensions, vec!["php", "inc", "rs"]);
        assert!(args.keep_going);
        assert!(args.debug);
        assert!(!args.force);
        assert_eq!(args.cache, Some(PathBuf::from("/tmp/cache.json")));
    }

    #[test]
    fn cache_show_accepts_json_output() {
        let cli = Cli::try_parse_from(["quire", "cache", "show", "--output", "json"])
            .expect("valid arguments");
        assert!(matches!(
            cli.command,
            Command::Cache(CacheCommand::Show(CacheShowArgs {
                output: OutputFormat::Json,
                ..
            }))
        ));
        assert_eq!(command_label(&cli.command), "cache_show");
    }

    #[test]
    fn cache_commands_take_an_optional_root() {
        let cli =
            Cli::try_parse_from(["quire", "cache", "clear", "docs"]).expect("valid arguments");
        let Command::Cache(CacheCommand::Clear(args)) = cli.command else {
            panic!("expected cache clear command");
        };
        assert_eq!(args.root, Some(PathBuf::from("docs")));
        assert_eq!(args.cache, None);
    }

    #[test]
    fn unknown_output_format_is_rejected() {
        assert!(Cli::try_parse_from(["quire", "cache", "show", "--output", "xml"]).is_err());
    }
}
