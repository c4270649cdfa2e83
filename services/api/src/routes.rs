use crate::infra::{lock, resolve_jobs, AppState, MatchState, ResultKind};
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use intern_match::error::AppError;
use intern_match::matching::roster;
use intern_match::matching::wire::{allotment_records, ranking_records};
use intern_match::matching::{
    AllotmentRecord, AllotmentRequest, CandidateScore, CommittedCandidate, FilterField,
    FormData, JobContext, JobRequest, PresetJob, ResultViewModel, SelectionSummary, ViewQuery,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use tracing::info;

/// Rows of the current view, flagged when they fall within the job's offers.
#[derive(Debug, Serialize)]
pub(crate) struct ViewRow<R> {
    #[serde(flatten)]
    pub(crate) record: R,
    pub(crate) shortlisted: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct ViewSnapshot<R> {
    pub(crate) kind: &'static str,
    pub(crate) job: Option<JobContext>,
    pub(crate) offers: u32,
    pub(crate) query: Option<ViewQuery>,
    pub(crate) rows: Vec<ViewRow<R>>,
    pub(crate) selection: SelectionFeedback,
    pub(crate) filter_options: BTreeMap<&'static str, Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) message: Option<&'static str>,
}

impl<R: ResultKind> ViewSnapshot<R> {
    pub(crate) fn capture(model: &ResultViewModel<R>) -> Self {
        let shortlisted = model.shortlist().len();
        let rows = model
            .view()
            .iter()
            .enumerate()
            .map(|(index, record)| ViewRow {
                record: record.clone(),
                shortlisted: index < shortlisted,
            })
            .collect::<Vec<_>>();

        let filter_options = FilterField::ALL
            .iter()
            .map(|field| (field.label(), model.distinct_values(*field)))
            .filter(|(_, values)| !values.is_empty())
            .collect();

        let message = match (model.is_loaded(), rows.is_empty()) {
            (false, _) => Some("no results loaded"),
            (true, true) if model.master().is_empty() => Some("no candidates"),
            (true, true) => Some("no candidates match"),
            (true, false) => None,
        };

        Self {
            kind: R::KIND,
            job: model.job().cloned(),
            offers: model.job().map(|job| job.offers).unwrap_or_default(),
            query: model.query().cloned(),
            rows,
            selection: SelectionFeedback::from(model.validate_selection()),
            filter_options,
            message,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SelectionFeedback {
    #[serde(flatten)]
    pub(crate) summary: SelectionSummary,
    pub(crate) feedback: String,
}

impl From<SelectionSummary> for SelectionFeedback {
    fn from(summary: SelectionSummary) -> Self {
        Self {
            feedback: summary.feedback(),
            summary,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SelectionChange {
    pub(crate) name: String,
    pub(crate) checked: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct CommitResponse {
    pub(crate) job: Option<JobContext>,
    pub(crate) candidates: Vec<CommittedCandidate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UploadParams {
    pub(crate) filename: String,
}

pub(crate) fn match_routes(state: MatchState) -> Router {
    Router::new()
        .route("/api/v1/presets", get(presets_endpoint))
        .route("/api/v1/form-data", get(form_data_endpoint))
        .route("/api/v1/candidates/upload", post(upload_endpoint))
        .route(
            "/api/v1/ranking",
            post(rank_endpoint).get(snapshot_endpoint::<CandidateScore>),
        )
        .route(
            "/api/v1/allotment",
            post(allotment_endpoint).get(snapshot_endpoint::<AllotmentRecord>),
        )
        .merge(result_routes::<CandidateScore>())
        .merge(result_routes::<AllotmentRecord>())
        .with_state(state)
}

fn result_routes<R: ResultKind>() -> Router<MatchState> {
    let base = format!("/api/v1/{}", R::KIND);
    Router::new()
        .route(&format!("{base}/view"), post(view_endpoint::<R>))
        .route(
            &format!("{base}/selection"),
            post(selection_endpoint::<R>).get(selection_status_endpoint::<R>),
        )
        .route(&format!("{base}/commit"), post(commit_endpoint::<R>))
}

pub(crate) fn with_operational_routes(router: Router) -> Router {
    router
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn presets_endpoint(
    State(state): State<MatchState>,
) -> Result<Json<Vec<PresetJob>>, AppError> {
    Ok(Json(state.service.presets().await?))
}

pub(crate) async fn form_data_endpoint(
    State(state): State<MatchState>,
) -> Result<Json<FormData>, AppError> {
    Ok(Json(state.service.form_data().await?))
}

pub(crate) async fn upload_endpoint(
    State(state): State<MatchState>,
    Query(params): Query<UploadParams>,
    body: Bytes,
) -> Result<Json<serde_json::Value>, AppError> {
    let (upload, summary) = roster::prepare_upload(&params.filename, body.to_vec())?;
    let receipt = state.service.upload_candidates(upload).await?;
    info!(
        filename = %params.filename,
        rows = receipt.rows_loaded,
        "candidate roster uploaded"
    );

    Ok(Json(json!({
        "rows_loaded": receipt.rows_loaded,
        "rows_checked": summary.rows,
        "filename": params.filename,
    })))
}

pub(crate) async fn rank_endpoint(
    State(state): State<MatchState>,
    Json(job): Json<JobRequest>,
) -> Result<Json<ViewSnapshot<CandidateScore>>, AppError> {
    job.validate()?;

    let ticket = lock(&state.ranking).issue_ticket();
    let rows = state.service.rank_custom(&job).await?;
    let records = ranking_records(rows)?;

    let mut model = lock(&state.ranking);
    model.ingest_for(ticket, records, &job)?;
    info!(job = %job.label(), candidates = model.master().len(), "ranking loaded");
    Ok(Json(ViewSnapshot::capture(&model)))
}

pub(crate) async fn allotment_endpoint(
    State(state): State<MatchState>,
    Json(request): Json<AllotmentRequest>,
) -> Result<Json<ViewSnapshot<AllotmentRecord>>, AppError> {
    let ticket = lock(&state.allotment).issue_ticket();

    let presets = state.service.presets().await?;
    let jobs = resolve_jobs(&presets, &request.job_keys)?;
    let rows = state.service.generate_allotment(&request.job_keys).await?;
    let records = allotment_records(rows)?;

    let mut model = lock(&state.allotment);
    model.ingest_for(ticket, records, JobContext::batch(&jobs))?;
    info!(
        jobs = jobs.len(),
        candidates = model.master().len(),
        "allotment loaded"
    );
    Ok(Json(ViewSnapshot::capture(&model)))
}

pub(crate) async fn snapshot_endpoint<R: ResultKind>(
    State(state): State<MatchState>,
) -> Json<ViewSnapshot<R>> {
    let model = lock(R::slot(&state));
    Json(ViewSnapshot::capture(&model))
}

pub(crate) async fn view_endpoint<R: ResultKind>(
    State(state): State<MatchState>,
    Json(query): Json<ViewQuery>,
) -> Result<Json<ViewSnapshot<R>>, AppError> {
    let mut model = lock(R::slot(&state));
    model.apply_view(query)?;
    Ok(Json(ViewSnapshot::capture(&model)))
}

pub(crate) async fn selection_endpoint<R: ResultKind>(
    State(state): State<MatchState>,
    Json(change): Json<SelectionChange>,
) -> Result<Json<SelectionFeedback>, AppError> {
    let mut model = lock(R::slot(&state));
    let summary = model.record_selection(&change.name, change.checked)?;
    Ok(Json(summary.into()))
}

pub(crate) async fn selection_status_endpoint<R: ResultKind>(
    State(state): State<MatchState>,
) -> Json<SelectionFeedback> {
    let model = lock(R::slot(&state));
    Json(model.validate_selection().into())
}

pub(crate) async fn commit_endpoint<R: ResultKind>(
    State(state): State<MatchState>,
) -> Result<Json<CommitResponse>, AppError> {
    let model = lock(R::slot(&state));
    let candidates = model.commit_selection()?;
    info!(kind = R::KIND, committed = candidates.len(), "selection committed");
    Ok(Json(CommitResponse {
        job: model.job().cloned(),
        candidates,
    }))
}
