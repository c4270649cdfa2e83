//! Matching results: domain types, the service client, and the view model a
//! renderer draws from.

pub mod client;
pub mod domain;
pub mod roster;
pub mod view;
pub mod wire;

pub use client::{ClientError, HttpRankingService, RankingService};
pub use domain::{
    AllotmentRecord, AllotmentRequest, AllotmentStatus, CandidateScore, CandidateUpload,
    Criterion, FormData, JobRequest, JobRequestError, PresetJob, UploadReceipt,
};
pub use roster::{RosterError, RosterSummary};
pub use view::{
    AllotmentViewModel, CommittedCandidate, FilterField, FilterValue, JobContext,
    RankingViewModel, RequestTicket, ResultViewModel, ScoreField, SelectionStatus,
    SelectionSummary, ViewError, ViewQuery, ViewRecord,
};
pub use wire::{AllotmentRow, FieldProblem, RankingRow, RecordError};
