use crate::infra::{parse_filter, parse_sort, resolve_jobs};
use clap::{ArgGroup, Args};
use intern_match::config::AppConfig;
use intern_match::error::AppError;
use intern_match::matching::roster;
use intern_match::matching::wire::{allotment_records, ranking_records};
use intern_match::matching::{
    AllotmentViewModel, FilterValue, HttpRankingService, JobContext, JobRequest, PresetJob,
    RankingService, RankingViewModel, ResultViewModel, ScoreField, ViewQuery, ViewRecord,
};
use intern_match::telemetry;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["preset", "job"])))]
pub(crate) struct RankArgs {
    /// Key of a preset job known to the ranking service
    #[arg(long)]
    pub(crate) preset: Option<String>,
    /// Path to a JSON job description
    #[arg(long)]
    pub(crate) job: Option<PathBuf>,
    /// Only show this category ("ALL" for every category)
    #[arg(long, value_parser = parse_filter, default_value = FilterValue::SENTINEL)]
    pub(crate) category: FilterValue,
    /// Only show this gender ("ALL" for every gender)
    #[arg(long, value_parser = parse_filter, default_value = FilterValue::SENTINEL)]
    pub(crate) gender: FilterValue,
    /// Score column to sort by, highest first
    #[arg(long, value_parser = parse_sort)]
    pub(crate) sort: Option<ScoreField>,
    /// Candidate to check in the shortlist (repeatable)
    #[arg(long)]
    pub(crate) select: Vec<String>,
    /// Commit the selection once it is within the job's offers
    #[arg(long)]
    pub(crate) commit: bool,
}

#[derive(Args, Debug)]
pub(crate) struct AllotArgs {
    /// Preset job to include in the batch (repeatable)
    #[arg(long = "job-key", required = true)]
    pub(crate) job_keys: Vec<String>,
    /// Only show this allotment status ("ALL" for every status)
    #[arg(long, value_parser = parse_filter, default_value = FilterValue::SENTINEL)]
    pub(crate) status: FilterValue,
    /// Only show this category ("ALL" for every category)
    #[arg(long, value_parser = parse_filter, default_value = FilterValue::SENTINEL)]
    pub(crate) category: FilterValue,
    /// Only show this gender ("ALL" for every gender)
    #[arg(long, value_parser = parse_filter, default_value = FilterValue::SENTINEL)]
    pub(crate) gender: FilterValue,
    /// Score column to sort by; keeps the service order when omitted
    #[arg(long, value_parser = parse_sort)]
    pub(crate) sort: Option<ScoreField>,
}

fn connect() -> Result<HttpRankingService, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    Ok(HttpRankingService::new(config.ranking_service)?)
}

pub(crate) async fn run_presets() -> Result<(), AppError> {
    let service = connect()?;
    let presets = service.presets().await?;

    if presets.is_empty() {
        println!("No preset jobs available.");
        return Ok(());
    }

    println!("Preset jobs");
    for job in &presets {
        println!(
            "- {}: {} ({} offers, {}, {})",
            job.key,
            job.to_request().label(),
            job.offers,
            job.city,
            job.state
        );
    }
    Ok(())
}

pub(crate) async fn run_upload(csv: PathBuf) -> Result<(), AppError> {
    let (upload, summary) = roster::load_upload(&csv)?;
    println!(
        "Checked {}: {} rows, {} columns",
        upload.filename,
        summary.rows,
        summary.columns.len()
    );

    let service = connect()?;
    let receipt = service.upload_candidates(upload).await?;
    println!(
        "Ranking service at {} loaded {} candidates.",
        service.config().base_url,
        receipt.rows_loaded
    );
    Ok(())
}

pub(crate) async fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let service = connect()?;
    let job = match &args.job {
        Some(path) => read_job(path)?,
        None => {
            let key = args.preset.clone().unwrap_or_default();
            let presets = service.presets().await?;
            resolve_jobs(&presets, std::slice::from_ref(&key))?
                .into_iter()
                .next()
                .map(|preset| preset.to_request())
                .ok_or(AppError::UnknownJob(key))?
        }
    };
    job.validate()?;

    let records = ranking_records(service.rank_custom(&job).await?)?;
    let mut model = RankingViewModel::new();
    model.ingest(records, &job)?;
    model.apply_view(ViewQuery {
        category: args.category,
        gender: args.gender,
        status: FilterValue::All,
        sort: args.sort,
    })?;

    for name in &args.select {
        model.record_selection(name, true)?;
    }

    print!("{}", ranking_table(&model));
    println!("{}", model.validate_selection().feedback());

    if args.commit {
        let committed = model.commit_selection()?;
        println!("\nCommitted shortlist for {}", job.label());
        for candidate in committed {
            println!("- {} ({:.1}%)", candidate.name, candidate.overall_match);
        }
    }
    Ok(())
}

pub(crate) async fn run_allot(args: AllotArgs) -> Result<(), AppError> {
    let service = connect()?;
    let presets = service.presets().await?;
    let jobs: Vec<PresetJob> = resolve_jobs(&presets, &args.job_keys)?;

    let records = allotment_records(service.generate_allotment(&args.job_keys).await?)?;
    let mut model = AllotmentViewModel::new();
    model.ingest(records, JobContext::batch(&jobs))?;
    model.apply_view(ViewQuery {
        category: args.category,
        gender: args.gender,
        status: args.status,
        sort: args.sort,
    })?;

    print!("{}", allotment_table(&model));
    Ok(())
}

fn read_job(path: &Path) -> Result<JobRequest, AppError> {
    let raw = std::fs::read_to_string(path)?;
    serde_json::from_str(&raw)
        .map_err(|err| AppError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, err)))
}

/// Marks shortlisted rows with `*` and checked rows with `[x]`.
fn row_marker<R: ViewRecord>(model: &ResultViewModel<R>, index: usize, record: &R) -> String {
    let shortlisted = if index < model.shortlist().len() { '*' } else { ' ' };
    let checked = if record.is_selected() { "[x]" } else { "[ ]" };
    format!("{shortlisted}{checked}")
}

fn sort_line<R: ViewRecord>(model: &ResultViewModel<R>) -> Option<String> {
    let sort = model.query()?.sort.or_else(R::default_sort)?;
    Some(format!("Sorted by {}", sort.label()))
}

fn empty_message<R: ViewRecord>(model: &ResultViewModel<R>) -> Option<&'static str> {
    if !model.view().is_empty() {
        None
    } else if model.master().is_empty() {
        Some("No candidates returned.")
    } else {
        Some("No candidates match the current filters.")
    }
}

pub(crate) fn ranking_table(model: &RankingViewModel) -> String {
    let mut out = String::new();
    if let Some(job) = model.job() {
        let _ = writeln!(out, "Ranking for {} ({} offers)", job.label, job.offers);
    }
    if let Some(line) = sort_line(model) {
        let _ = writeln!(out, "{line}");
    }
    if let Some(message) = empty_message(model) {
        let _ = writeln!(out, "{message}");
        return out;
    }

    let _ = writeln!(
        out,
        "{:<5}{:>4}  {:<28}{:>8}{:>8}{:>8}{:>8}{:>8}  {:<8}{:<8}",
        "", "Rank", "Name", "Overall", "Skills", "Edu", "Loc", "Int", "Gender", "Category"
    );
    for (index, record) in model.view().iter().enumerate() {
        let _ = writeln!(
            out,
            "{:<5}{:>4}  {:<28}{:>8.1}{:>8.1}{:>8.1}{:>8.1}{:>8.1}  {:<8}{:<8}",
            row_marker(model, index, record),
            record.rank,
            record.name,
            record.overall_match,
            record.skills,
            record.education,
            record.location,
            record.interest,
            record.gender,
            record.category
        );
    }
    out
}

pub(crate) fn allotment_table(model: &AllotmentViewModel) -> String {
    let mut out = String::new();
    if let Some(job) = model.job() {
        let _ = writeln!(out, "Allotment for {} ({} offers)", job.label, job.offers);
    }
    if let Some(line) = sort_line(model) {
        let _ = writeln!(out, "{line}");
    }
    if let Some(message) = empty_message(model) {
        let _ = writeln!(out, "{message}");
        return out;
    }

    let _ = writeln!(
        out,
        "{:>4}  {:<28}{:<12}{:<32}{:>8}  {:<8}{:<8}",
        "Rank", "Name", "Status", "Allotted Job", "Overall", "Gender", "Category"
    );
    for record in model.view() {
        let _ = writeln!(
            out,
            "{:>4}  {:<28}{:<12}{:<32}{:>8.1}  {:<8}{:<8}",
            record.rank,
            record.name,
            record.status.label(),
            record.allotted_job_label(),
            record.overall_match,
            record.gender,
            record.category
        );
    }
    out
}
