use intern_match::error::AppError;
use intern_match::matching::{
    AllotmentRecord, AllotmentViewModel, CandidateScore, FilterValue, PresetJob, RankingService,
    RankingViewModel, ResultViewModel, ScoreField, ViewRecord,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// One view model per result kind, shared by the renderer's requests.
#[derive(Clone)]
pub(crate) struct MatchState {
    pub(crate) service: Arc<dyn RankingService>,
    pub(crate) ranking: Arc<Mutex<RankingViewModel>>,
    pub(crate) allotment: Arc<Mutex<AllotmentViewModel>>,
}

impl MatchState {
    pub(crate) fn new(service: Arc<dyn RankingService>) -> Self {
        Self {
            service,
            ranking: Arc::new(Mutex::new(RankingViewModel::new())),
            allotment: Arc::new(Mutex::new(AllotmentViewModel::new())),
        }
    }
}

/// Record kinds exposed over HTTP, each bound to its session slot.
pub(crate) trait ResultKind: ViewRecord + Serialize + Send + Sync + 'static {
    const KIND: &'static str;

    fn slot(state: &MatchState) -> &Mutex<ResultViewModel<Self>>;
}

impl ResultKind for CandidateScore {
    const KIND: &'static str = "ranking";

    fn slot(state: &MatchState) -> &Mutex<ResultViewModel<Self>> {
        &state.ranking
    }
}

impl ResultKind for AllotmentRecord {
    const KIND: &'static str = "allotment";

    fn slot(state: &MatchState) -> &Mutex<ResultViewModel<Self>> {
        &state.allotment
    }
}

/// Recovers a poisoned lock; view model updates are all-or-nothing.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn parse_filter(raw: &str) -> Result<FilterValue, String> {
    Ok(FilterValue::parse(raw))
}

pub(crate) fn parse_sort(raw: &str) -> Result<ScoreField, String> {
    raw.parse::<ScoreField>().map_err(|err| err.to_string())
}

/// Looks up each key among the presets, keeping the order of `keys`.
pub(crate) fn resolve_jobs(
    presets: &[PresetJob],
    keys: &[String],
) -> Result<Vec<PresetJob>, AppError> {
    keys.iter()
        .map(|key| {
            presets
                .iter()
                .find(|job| &job.key == key)
                .cloned()
                .ok_or_else(|| AppError::UnknownJob(key.clone()))
        })
        .collect()
}
