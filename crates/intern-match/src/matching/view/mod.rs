//! Client-side view over a ranking or allotment result.
//!
//! The master list is what the service returned; the view is a filtered,
//! sorted copy with ranks reassigned. Selection lives on the view and is keyed
//! by candidate name. Duplicate names within one list are not supported: they
//! share a selection flag.

mod query;
mod selection;

#[cfg(test)]
mod tests;

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};

use serde::Serialize;
use tracing::{debug, warn};

use super::domain::{AllotmentRecord, CandidateScore, JobRequest, PresetJob};
use super::wire::{FieldProblem, RecordError};

pub use query::{FilterField, FilterValue, ScoreField, UnknownScoreField, ViewQuery};
pub use selection::{CommittedCandidate, SelectionStatus, SelectionSummary};

/// Record kinds the view model can hold.
pub trait ViewRecord: Clone {
    fn name(&self) -> &str;
    fn categorical(&self, field: FilterField) -> Option<&str>;
    fn score(&self, field: ScoreField) -> f64;
    fn set_rank(&mut self, rank: u32);
    fn is_selected(&self) -> bool;
    fn set_selected(&mut self, selected: bool);

    /// Order applied when the query names no sort key. `None` keeps the
    /// service order.
    fn default_sort() -> Option<ScoreField>;

    fn validate(&self) -> Result<(), FieldProblem> {
        if self.name().trim().is_empty() {
            return Err(FieldProblem::Blank("name"));
        }
        for (field, label) in SCORE_FIELDS {
            let value = self.score(field);
            if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                return Err(FieldProblem::OutOfRange { field: label, value });
            }
        }
        Ok(())
    }
}

const SCORE_FIELDS: [(ScoreField, &str); 5] = [
    (ScoreField::OverallMatch, "overall_match"),
    (ScoreField::Skills, "skills"),
    (ScoreField::Education, "education"),
    (ScoreField::Location, "location"),
    (ScoreField::Interest, "interest"),
];

impl ViewRecord for CandidateScore {
    fn name(&self) -> &str {
        &self.name
    }

    fn categorical(&self, field: FilterField) -> Option<&str> {
        match field {
            FilterField::Category => Some(&self.category),
            FilterField::Gender => Some(&self.gender),
            FilterField::Status => None,
        }
    }

    fn score(&self, field: ScoreField) -> f64 {
        match field {
            ScoreField::OverallMatch => self.overall_match,
            ScoreField::Skills => self.skills,
            ScoreField::Education => self.education,
            ScoreField::Location => self.location,
            ScoreField::Interest => self.interest,
        }
    }

    fn set_rank(&mut self, rank: u32) {
        self.rank = rank;
    }

    fn is_selected(&self) -> bool {
        self.selected
    }

    fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    fn default_sort() -> Option<ScoreField> {
        Some(ScoreField::OverallMatch)
    }
}

impl ViewRecord for AllotmentRecord {
    fn name(&self) -> &str {
        &self.name
    }

    fn categorical(&self, field: FilterField) -> Option<&str> {
        match field {
            FilterField::Category => Some(&self.category),
            FilterField::Gender => Some(&self.gender),
            FilterField::Status => Some(self.status.label()),
        }
    }

    fn score(&self, field: ScoreField) -> f64 {
        match field {
            ScoreField::OverallMatch => self.overall_match,
            ScoreField::Skills => self.skills,
            ScoreField::Education => self.education,
            ScoreField::Location => self.location,
            ScoreField::Interest => self.interest,
        }
    }

    fn set_rank(&mut self, rank: u32) {
        self.rank = rank;
    }

    fn is_selected(&self) -> bool {
        self.selected
    }

    fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    // The service already orders allotments: Allotted first, then by score.
    fn default_sort() -> Option<ScoreField> {
        None
    }
}

/// What the view model needs to know about the job(s) behind a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobContext {
    pub label: String,
    pub offers: u32,
}

impl JobContext {
    /// Capacity of a batch allotment is the sum of its jobs' offers.
    pub fn batch(jobs: &[PresetJob]) -> Self {
        let label = jobs
            .iter()
            .map(|job| job.post.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let offers = jobs
            .iter()
            .fold(0u32, |total, job| total.saturating_add(job.offers));
        Self { label, offers }
    }
}

impl From<&JobRequest> for JobContext {
    fn from(job: &JobRequest) -> Self {
        Self {
            label: job.label(),
            offers: job.offers,
        }
    }
}

impl From<&PresetJob> for JobContext {
    fn from(job: &PresetJob) -> Self {
        Self {
            label: format!("{} at {}", job.post, job.company),
            offers: job.offers,
        }
    }
}

/// Token handed out before a service call; only the newest may ingest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn sequence(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ViewError {
    #[error("no result list has been loaded")]
    NotLoaded,
    #[error(transparent)]
    Malformed(#[from] RecordError),
    #[error("candidate '{name}' is not in the current view")]
    UnknownCandidate { name: String },
    #[error("response for request {ticket} arrived after request {latest} was issued")]
    StaleResponse { ticket: u64, latest: u64 },
    #[error("select at least one candidate")]
    EmptySelection,
    #[error("only {offers} candidates may be selected, {selected} are selected")]
    OverLimit { selected: usize, offers: u32 },
}

#[derive(Debug, Clone)]
struct LoadedList<R> {
    master: Vec<R>,
    job: JobContext,
    query: ViewQuery,
    view: Vec<R>,
}

/// Owned per session; the single writer is the caller driving user events.
#[derive(Debug, Clone)]
pub struct ResultViewModel<R> {
    loaded: Option<LoadedList<R>>,
    latest_ticket: u64,
}

impl<R> Default for ResultViewModel<R> {
    fn default() -> Self {
        Self {
            loaded: None,
            latest_ticket: 0,
        }
    }
}

pub type RankingViewModel = ResultViewModel<CandidateScore>;
pub type AllotmentViewModel = ResultViewModel<AllotmentRecord>;

impl<R: ViewRecord> ResultViewModel<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    /// Reserves a ticket for an outgoing request, superseding older ones.
    pub fn issue_ticket(&mut self) -> RequestTicket {
        self.latest_ticket += 1;
        RequestTicket(self.latest_ticket)
    }

    /// Ingests a response only if no newer request was issued since `ticket`.
    pub fn ingest_for(
        &mut self,
        ticket: RequestTicket,
        records: Vec<R>,
        job: impl Into<JobContext>,
    ) -> Result<&[R], ViewError> {
        if ticket.0 != self.latest_ticket {
            warn!(
                ticket = ticket.0,
                latest = self.latest_ticket,
                "dropping stale service response"
            );
            return Err(ViewError::StaleResponse {
                ticket: ticket.0,
                latest: self.latest_ticket,
            });
        }
        check_records(&records)?;
        Ok(self.load(records, job.into()))
    }

    /// Replaces the master list and job wholesale and resets the view to an
    /// unfiltered copy. Outstanding tickets become stale.
    ///
    /// A malformed record rejects the whole list and leaves the previous state
    /// untouched, outstanding tickets included. Names selected before stay
    /// selected if they are still present, so a reduced capacity shows up on
    /// the next validation.
    pub fn ingest(
        &mut self,
        records: Vec<R>,
        job: impl Into<JobContext>,
    ) -> Result<&[R], ViewError> {
        check_records(&records)?;
        self.latest_ticket += 1;
        Ok(self.load(records, job.into()))
    }

    fn load(&mut self, records: Vec<R>, job: JobContext) -> &[R] {
        let mut carried = self.selected_names();
        carried.extend(
            records
                .iter()
                .filter(|record| record.is_selected())
                .map(|record| record.name().to_string()),
        );

        let mut master = records;
        for record in &mut master {
            record.set_selected(false);
            record.set_rank(0);
        }

        debug!(
            records = master.len(),
            offers = job.offers,
            job = %job.label,
            "ingested result list"
        );

        let query = ViewQuery::default();
        let view = derive_view(&master, &query, &carried);
        let loaded = self.loaded.insert(LoadedList {
            master,
            job,
            query,
            view,
        });
        &loaded.view
    }

    /// Recomputes the view from the master list. Rows that drop out of the
    /// view lose their selection.
    pub fn apply_view(&mut self, query: ViewQuery) -> Result<&[R], ViewError> {
        let carried = self.selected_names();
        let loaded = self.loaded.as_mut().ok_or(ViewError::NotLoaded)?;

        loaded.view = derive_view(&loaded.master, &query, &carried);
        loaded.query = query;

        debug!(
            visible = loaded.view.len(),
            total = loaded.master.len(),
            "applied view query"
        );
        Ok(&loaded.view)
    }

    pub fn view(&self) -> &[R] {
        self.loaded
            .as_ref()
            .map(|loaded| loaded.view.as_slice())
            .unwrap_or_default()
    }

    pub fn master(&self) -> &[R] {
        self.loaded
            .as_ref()
            .map(|loaded| loaded.master.as_slice())
            .unwrap_or_default()
    }

    pub fn job(&self) -> Option<&JobContext> {
        self.loaded.as_ref().map(|loaded| &loaded.job)
    }

    pub fn query(&self) -> Option<&ViewQuery> {
        self.loaded.as_ref().map(|loaded| &loaded.query)
    }

    /// Rows within capacity: the first `offers` rows of the view.
    pub fn shortlist(&self) -> &[R] {
        match &self.loaded {
            Some(loaded) => {
                let take = (loaded.job.offers as usize).min(loaded.view.len());
                &loaded.view[..take]
            }
            None => &[],
        }
    }

    /// Sorted distinct non-empty values of `field` across the master list.
    pub fn distinct_values(&self, field: FilterField) -> Vec<String> {
        self.master()
            .iter()
            .filter_map(|record| record.categorical(field))
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Checks or unchecks every view row named `name`.
    pub fn record_selection(
        &mut self,
        name: &str,
        checked: bool,
    ) -> Result<SelectionSummary, ViewError> {
        let loaded = self.loaded.as_mut().ok_or(ViewError::NotLoaded)?;

        let mut found = false;
        for record in loaded.view.iter_mut().filter(|record| record.name() == name) {
            record.set_selected(checked);
            found = true;
        }
        if !found {
            return Err(ViewError::UnknownCandidate {
                name: name.to_string(),
            });
        }

        let summary = self.validate_selection();
        debug!(candidate = name, checked, selected = summary.selected, "selection changed");
        Ok(summary)
    }

    pub fn selected_count(&self) -> usize {
        self.view().iter().filter(|record| record.is_selected()).count()
    }

    /// Counts checked rows in the current view against the job's offers.
    pub fn validate_selection(&self) -> SelectionSummary {
        let offers = self.job().map(|job| job.offers).unwrap_or_default();
        SelectionSummary::new(self.selected_count(), offers)
    }

    /// Selected rows in view order. Declines unless the selection is valid.
    pub fn commit_selection(&self) -> Result<Vec<CommittedCandidate>, ViewError> {
        if !self.is_loaded() {
            return Err(ViewError::NotLoaded);
        }

        let summary = self.validate_selection();
        match summary.status {
            SelectionStatus::Empty => Err(ViewError::EmptySelection),
            SelectionStatus::OverLimit => Err(ViewError::OverLimit {
                selected: summary.selected,
                offers: summary.offers,
            }),
            SelectionStatus::Valid => Ok(self
                .view()
                .iter()
                .filter(|record| record.is_selected())
                .map(|record| CommittedCandidate {
                    name: record.name().to_string(),
                    overall_match: record.score(ScoreField::OverallMatch),
                })
                .collect()),
        }
    }

    fn selected_names(&self) -> HashSet<String> {
        self.view()
            .iter()
            .filter(|record| record.is_selected())
            .map(|record| record.name().to_string())
            .collect()
    }
}

fn check_records<R: ViewRecord>(records: &[R]) -> Result<(), RecordError> {
    for (index, record) in records.iter().enumerate() {
        record
            .validate()
            .map_err(|problem| RecordError::new(index, problem))?;
    }
    Ok(())
}

/// Copy, filter, stable-sort descending, then rank from 1.
fn derive_view<R: ViewRecord>(
    master: &[R],
    query: &ViewQuery,
    selected: &HashSet<String>,
) -> Vec<R> {
    let mut view: Vec<R> = master
        .iter()
        .filter(|record| {
            FilterField::ALL
                .iter()
                .all(|field| query.filter(*field).admits(record.categorical(*field)))
        })
        .cloned()
        .collect();

    if let Some(key) = query.sort.or_else(R::default_sort) {
        view.sort_by(|a, b| descending(a.score(key), b.score(key)));
    }

    for (index, record) in view.iter_mut().enumerate() {
        record.set_rank(u32::try_from(index + 1).unwrap_or(u32::MAX));
        record.set_selected(selected.contains(record.name()));
    }

    view
}

fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}
