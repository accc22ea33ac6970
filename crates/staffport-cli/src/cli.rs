//! CLI argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use staffport_cli::selection::{parse_delimiter, parse_field_id, parse_since_date};
use staffport_export::DEFAULT_PREFIX;
use staffport_model::{FieldId, FieldKind};

#[derive(Parser)]
#[command(
    name = "staffport",
    version,
    about = "Export employee field history, documents and field overviews from the HR platform",
    long_about = "Export employee records from the HR platform REST API.\n\n\
                  Writes per-field history CSVs, document trees or archives, and a\n\
                  field overview workbook. Credentials are read from flags or from\n\
                  STAFFPORT_DOMAIN, STAFFPORT_CLIENT_ID and STAFFPORT_CLIENT_SECRET."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow employee names and identifiers in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the fields declared by employee records.
    Fields(FieldsArgs),

    /// Export field timeline history as CSV files in a zip archive.
    History(HistoryArgs),

    /// Count or download document and photo fields.
    Documents {
        #[command(subcommand)]
        command: DocumentsCommand,
    },

    /// Build the field overview workbook (employee fields, lists, organizations).
    Overview(OverviewArgs),

    /// Zip employee folders or photos from a local directory.
    ZipFolders(ZipArgs),
}

#[derive(Subcommand)]
pub enum DocumentsCommand {
    /// Count documents per kind without downloading.
    Count(DocumentCountArgs),

    /// Download documents into a folder tree or a zip archive.
    Download(DocumentDownloadArgs),
}

/// Connection settings shared by every API command.
#[derive(Args, Clone)]
pub struct ConnectionArgs {
    /// Tenant domain, e.g. `acme` or `acme.sb`.
    #[arg(long, env = "STAFFPORT_DOMAIN")]
    pub domain: String,

    #[arg(long = "client-id", env = "STAFFPORT_CLIENT_ID")]
    pub client_id: String,

    #[arg(long = "client-secret", env = "STAFFPORT_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: String,

    /// Override the API base URL derived from the domain.
    #[arg(long = "base-url", env = "STAFFPORT_BASE_URL", value_name = "URL")]
    pub base_url: Option<String>,

    /// Include inactive employees.
    #[arg(long = "include-inactive")]
    pub include_inactive: bool,
}

#[derive(Args)]
pub struct FieldsArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Only list fields of these kinds.
    #[arg(long = "kind", value_enum, value_delimiter = ',')]
    pub kinds: Vec<FieldKindArg>,
}

#[derive(Args)]
pub struct HistoryArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Field id whose value identifies each employee (username when omitted).
    #[arg(long, value_name = "FIELD_ID", value_parser = parse_field_id)]
    pub identifier: Option<FieldId>,

    /// Field ids to export, comma separated or repeated.
    #[arg(
        long = "field",
        value_name = "FIELD_ID",
        required = true,
        value_delimiter = ',',
        value_parser = parse_field_id
    )]
    pub fields: Vec<FieldId>,

    /// Leave out entries that are still in effect.
    #[arg(long = "exclude-current")]
    pub exclude_current: bool,

    /// Only history since this date (YYYY-MM-DD).
    #[arg(long, value_name = "DATE", value_parser = parse_since_date)]
    pub since: Option<NaiveDate>,

    /// CSV column delimiter, also used to join multi-valued entries.
    #[arg(long, default_value = ";", value_parser = parse_delimiter)]
    pub delimiter: char,

    /// Prefix for the generated file names.
    #[arg(long, default_value = DEFAULT_PREFIX)]
    pub prefix: String,

    /// Add the raw employee JSON as a backup file.
    #[arg(long = "json-backup")]
    pub json_backup: bool,

    /// Directory for the archive.
    #[arg(long = "output-dir", value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,
}

#[derive(Args)]
pub struct DocumentCountArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Document field ids to count (all document fields when omitted).
    #[arg(long = "field", value_name = "FIELD_ID", value_delimiter = ',', value_parser = parse_field_id)]
    pub fields: Vec<FieldId>,
}

#[derive(Args)]
pub struct DocumentDownloadArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Field id whose value names each employee folder (username when omitted).
    #[arg(long, value_name = "FIELD_ID", value_parser = parse_field_id)]
    pub identifier: Option<FieldId>,

    /// Document field ids to download (all document fields when omitted).
    #[arg(long = "field", value_name = "FIELD_ID", value_delimiter = ',', value_parser = parse_field_id)]
    pub fields: Vec<FieldId>,

    /// Destination folder.
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Write a single `documents.zip` instead of a folder tree.
    #[arg(long)]
    pub archive: bool,
}

#[derive(Args)]
pub struct OverviewArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Directory for the workbook.
    #[arg(long = "output-dir", value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,
}

#[derive(Args)]
pub struct ZipArgs {
    /// Folder containing employee subfolders or photos.
    #[arg(long, value_name = "DIR")]
    pub root: PathBuf,

    /// Folder for the generated archives.
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: PathBuf,

    #[arg(long, value_enum, default_value = "folders")]
    pub mode: ZipModeArg,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ZipModeArg {
    /// One archive per all-digit subfolder.
    Folders,
    /// One archive per image file.
    Photos,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FieldKindArg {
    Text,
    Single,
    Multiple,
    Photo,
    Other,
}

impl From<FieldKindArg> for FieldKind {
    fn from(kind: FieldKindArg) -> Self {
        match kind {
            FieldKindArg::Text => Self::Text,
            FieldKindArg::Single => Self::Single,
            FieldKindArg::Multiple => Self::Multiple,
            FieldKindArg::Photo => Self::Photo,
            FieldKindArg::Other => Self::Other,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
