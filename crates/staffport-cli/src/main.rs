//! Staffport employee export CLI.

use clap::{ColorChoice, Parser};
use staffport_cli::logging::{LogConfig, LogFormat, init_logging};
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;
mod types;

use crate::cli::{Cli, Command, DocumentsCommand, LogFormatArg, LogLevelArg};
use crate::commands::{
    run_document_count, run_document_download, run_fields, run_history, run_overview, run_zip,
};
use crate::summary::{
    print_counts, print_download, print_fields, print_history, print_overview, print_zip,
};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match cli.command {
        Command::Fields(args) => report(run_fields(&args), |result| {
            print_fields(result);
            false
        }),
        Command::History(args) => report(run_history(&args), |result| {
            print_history(result);
            false
        }),
        Command::Documents { command } => match command {
            DocumentsCommand::Count(args) => report(run_document_count(&args), |result| {
                print_counts(result);
                false
            }),
            DocumentsCommand::Download(args) => {
                report(run_document_download(&args), |result| {
                    print_download(result);
                    result.run.has_failures()
                })
            }
        },
        Command::Overview(args) => report(run_overview(&args), |result| {
            print_overview(result);
            false
        }),
        Command::ZipFolders(args) => report(run_zip(&args), |result| {
            print_zip(result);
            result.summary.failed > 0
        }),
    };
    std::process::exit(exit_code);
}

/// Prints a successful result and maps the outcome to an exit code.
fn report<T>(outcome: anyhow::Result<T>, print: impl FnOnce(&T) -> bool) -> i32 {
    match outcome {
        Ok(result) => {
            if print(&result) { 1 } else { 0 }
        }
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.log_data = cli.log_data;
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
