use std::fs;
use std::io::{self, IsTerminal};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, info_span, warn};

use staffport_api::{ApiClient, ApiSession, EmployeeQuery, degrade};
use staffport_cli::logging::redact_value;
use staffport_cli::selection::{document_fields, unknown_fields};
use staffport_export::{
    DOCUMENT_KINDS, RetrievalObserver, RetrievalTask, TimelineOptions, count_documents, discover,
    execute, extract_timelines, plan_retrieval,
};
use staffport_model::{Credentials, EmployeeRecord, FieldId, FieldKind, RunContext};
use staffport_output::{
    ArchiveSink, DirectorySink, FieldOverview, OverviewEntry, archive_name, build_overview, bundle,
    json_backup, overview_file_name, timeline_artifacts, zip_photos, zip_subfolders,
};

use crate::cli::{
    ConnectionArgs, DocumentCountArgs, DocumentDownloadArgs, FieldsArgs, HistoryArgs,
    OverviewArgs, ZipArgs, ZipModeArg,
};
use crate::types::{
    CountResult, DownloadResult, FieldsResult, HistoryResult, OverviewResult, TableSummary,
    ZipResult,
};

const DOCUMENT_ARCHIVE: &str = "documents.zip";

fn run_context(connection: &ConnectionArgs) -> RunContext {
    let credentials = Credentials::new(
        connection.domain.as_str(),
        connection.client_id.as_str(),
        connection.client_secret.as_str(),
    );
    RunContext::new(credentials).with_include_inactive(connection.include_inactive)
}

fn connect(context: &RunContext, base_url: Option<&str>) -> Result<ApiSession> {
    let client = match base_url {
        Some(url) => ApiClient::new(url),
        None => ApiClient::for_credentials(&context.credentials),
    }
    .context("configure API client")?;
    debug!(base_url = client.base_url(), "authenticating");
    let session = client
        .authenticate(&context.credentials)
        .map_err(|error| anyhow!("{}: {error}", error.user_message()))?;
    info!(domain = %context.credentials.domain, "authenticated");
    Ok(session)
}

/// Loads employee records; a failing listing degrades to an empty set.
fn load_employees(
    session: &ApiSession,
    context: &RunContext,
    since: Option<NaiveDate>,
    warnings: &mut Vec<String>,
) -> Result<Vec<EmployeeRecord>> {
    let query = EmployeeQuery {
        include_inactive: context.include_inactive,
        timeline_since: since,
    };
    let sourced = degrade("employees", session.list_employees(query)).context("load employees")?;
    warnings.extend(sourced.warning);
    Ok(sourced.items)
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create output directory {}", parent.display()))?;
    }
    fs::write(path, bytes).with_context(|| format!("write {}", path.display()))
}

pub fn run_fields(args: &FieldsArgs) -> Result<FieldsResult> {
    let span = info_span!("fields");
    let _guard = span.enter();
    let context = run_context(&args.connection);
    let session = connect(&context, args.connection.base_url.as_deref())?;
    let mut warnings = Vec::new();
    let records = load_employees(&session, &context, None, &mut warnings)?;

    let kinds: Vec<FieldKind> = args.kinds.iter().copied().map(FieldKind::from).collect();
    let filter = (!kinds.is_empty()).then_some(kinds.as_slice());
    let catalog = discover(&records, filter);
    Ok(FieldsResult {
        records: records.len(),
        fields: catalog.presentation_order().into_iter().cloned().collect(),
        identifier_candidates: catalog
            .identifier_candidates()
            .into_iter()
            .map(|descriptor| descriptor.id.clone())
            .collect(),
        warnings,
    })
}

pub fn run_history(args: &HistoryArgs) -> Result<HistoryResult> {
    let span = info_span!("history", fields = args.fields.len());
    let _guard = span.enter();
    let start = Instant::now();
    let context = run_context(&args.connection)
        .with_identifier(args.identifier.clone())
        .with_selected_fields(args.fields.clone());
    let options = TimelineOptions {
        exclude_current: args.exclude_current,
        delimiter: args.delimiter,
        since_date: args.since,
        prefix: args.prefix.clone(),
    };
    options.validate()?;

    let session = connect(&context, args.connection.base_url.as_deref())?;
    let mut warnings = Vec::new();
    let records = load_employees(&session, &context, args.since, &mut warnings)?;
    let catalog = discover(&records, None);
    for id in unknown_fields(&catalog, &context.selected_fields) {
        warn!(field = %id, "selected field not present on any employee");
        warnings.push(format!("field {id} not found on any employee"));
    }

    let tables = extract_timelines(
        &records,
        &catalog,
        context.identifier.as_ref(),
        &context.selected_fields,
        &options,
    )?;
    let mut artifacts = timeline_artifacts(&tables, &options).context("encode history CSV")?;
    let mut extra_files = Vec::new();
    if args.json_backup {
        let backup = json_backup(&records, &options.prefix).context("encode JSON backup")?;
        extra_files.push(backup.name().to_string());
        artifacts.push(backup);
    }
    let bytes = bundle(&artifacts).context("bundle history archive")?;
    let archive = args.output_dir.join(archive_name(&options.prefix));
    write_file(&archive, &bytes)?;
    info!(
        archive = %archive.display(),
        files = artifacts.len(),
        duration_ms = start.elapsed().as_millis(),
        "history export written"
    );

    let summaries = tables
        .iter()
        .map(|table| TableSummary {
            file_name: table.file_name.clone(),
            field_label: catalog.label(&table.field_id),
            rows: table.rows.len(),
        })
        .collect();
    Ok(HistoryResult {
        archive,
        records: records.len(),
        tables: summaries,
        extra_files,
        warnings,
    })
}

pub fn run_document_count(args: &DocumentCountArgs) -> Result<CountResult> {
    let span = info_span!("documents_count");
    let _guard = span.enter();
    let context = run_context(&args.connection);
    let session = connect(&context, args.connection.base_url.as_deref())?;
    let mut warnings = Vec::new();
    let records = load_employees(&session, &context, None, &mut warnings)?;
    let catalog = discover(&records, Some(DOCUMENT_KINDS.as_slice()));
    let fields = document_fields(&catalog, &args.fields)?;
    let counts = count_documents(&records, &fields);
    info!(total = counts.total(), "documents counted");
    Ok(CountResult {
        records: records.len(),
        fields: fields.iter().map(|id| catalog.label(id)).collect(),
        counts,
        warnings,
    })
}

/// Progress bar fed by the retriever.
struct ProgressObserver {
    bar: ProgressBar,
}

impl ProgressObserver {
    fn new(total: usize) -> Self {
        let bar = if io::stderr().is_terminal() {
            ProgressBar::new(total as u64)
        } else {
            ProgressBar::hidden()
        };
        let style = ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        Self { bar }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl RetrievalObserver for ProgressObserver {
    fn on_task_finished(&mut self, task: &RetrievalTask, succeeded: bool) {
        debug!(
            subject = redact_value(&task.subject),
            field = %task.field_id,
            succeeded,
            "document processed"
        );
        self.bar.set_message(task.folder.clone());
        self.bar.inc(1);
    }
}

pub fn run_document_download(args: &DocumentDownloadArgs) -> Result<DownloadResult> {
    let span = info_span!("documents_download", archive = args.archive);
    let _guard = span.enter();
    let start = Instant::now();
    let context = run_context(&args.connection).with_identifier(args.identifier.clone());
    let session = connect(&context, args.connection.base_url.as_deref())?;
    let mut warnings = Vec::new();
    let records = load_employees(&session, &context, None, &mut warnings)?;
    let catalog = discover(&records, None);
    let context = context.with_selected_fields(document_fields(&catalog, &args.fields)?);

    let plan = plan_retrieval(
        &records,
        &catalog,
        context.identifier.as_ref(),
        &context.selected_fields,
    );
    let mut fetcher = |link: &str| session.fetch_binary(link);
    let mut observer = ProgressObserver::new(plan.tasks.len());

    let (run, destination) = if args.archive {
        let mut sink = ArchiveSink::new();
        let run = execute(&plan, &mut fetcher, &mut sink, &mut observer);
        observer.finish();
        let bytes = bundle(sink.artifacts()).context("bundle documents")?;
        let destination = args.output_dir.join(DOCUMENT_ARCHIVE);
        write_file(&destination, &bytes)?;
        (run, destination)
    } else {
        fs::create_dir_all(&args.output_dir)
            .with_context(|| format!("create output directory {}", args.output_dir.display()))?;
        let mut sink = DirectorySink::new(&args.output_dir);
        let run = execute(&plan, &mut fetcher, &mut sink, &mut observer);
        observer.finish();
        (run, sink.root().to_path_buf())
    };
    info!(
        expected = run.items_expected,
        succeeded = run.items_succeeded,
        failed = run.failed(),
        skipped = run.skipped.len(),
        duration_ms = start.elapsed().as_millis(),
        "document download finished"
    );
    Ok(DownloadResult {
        destination,
        records: records.len(),
        run,
        warnings,
    })
}

fn overview_entries<'a>(items: impl IntoIterator<Item = (&'a str, &'a str)>) -> Vec<OverviewEntry> {
    items
        .into_iter()
        .filter_map(|(id, name)| match FieldId::new(id) {
            Ok(id) => Some(OverviewEntry::new(id, name)),
            Err(error) => {
                warn!(%error, "skipping entry without id");
                None
            }
        })
        .collect()
}

pub fn run_overview(args: &OverviewArgs) -> Result<OverviewResult> {
    let span = info_span!("overview");
    let _guard = span.enter();
    let context = run_context(&args.connection).with_include_inactive(true);
    let session = connect(&context, args.connection.base_url.as_deref())?;
    let mut warnings = Vec::new();

    let records = load_employees(&session, &context, None, &mut warnings)?;
    let catalog = discover(&records, None);
    let lists = degrade("lists", session.list_scales()).context("load lists")?;
    let organizations =
        degrade("organizations", session.list_org_fields()).context("load organizations")?;
    warnings.extend(lists.warning);
    warnings.extend(organizations.warning);

    let overview = FieldOverview {
        employee_fields: catalog.iter().map(OverviewEntry::from).collect(),
        lists: overview_entries(
            lists
                .items
                .iter()
                .map(|scale| (scale.id.as_str(), scale.name.as_str())),
        ),
        organizations: overview_entries(
            organizations
                .items
                .iter()
                .map(|field| (field.id.as_str(), field.name.as_str())),
        ),
    };
    let bytes = build_overview(&overview).context("build field overview")?;
    let workbook = args
        .output_dir
        .join(overview_file_name(&context.credentials.domain));
    write_file(&workbook, &bytes)?;
    info!(workbook = %workbook.display(), "field overview written");

    Ok(OverviewResult {
        workbook,
        employee_fields: overview.employee_fields.len(),
        lists: overview.lists.len(),
        organizations: overview.organizations.len(),
        warnings,
    })
}

pub fn run_zip(args: &ZipArgs) -> Result<ZipResult> {
    let span = info_span!("zip_folders", root = %args.root.display());
    let _guard = span.enter();
    let (mode, summary) = match args.mode {
        ZipModeArg::Folders => ("folders", zip_subfolders(&args.root, &args.output_dir)?),
        ZipModeArg::Photos => ("photos", zip_photos(&args.root, &args.output_dir)?),
    };
    Ok(ZipResult {
        mode,
        output_dir: args.output_dir.clone(),
        summary,
    })
}
