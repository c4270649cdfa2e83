//! Row shapes returned by the ranking service and their conversion into
//! validated records.
//!
//! The service emits display-oriented column names (`"Overall Match %"`); the
//! snake_case aliases let hand-written fixtures and newer service builds use
//! plain field names. Numeric columns are optional here so a missing score
//! surfaces as a [`RecordError`] naming the row instead of a generic decode
//! failure.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::domain::{AllotmentRecord, AllotmentStatus, CandidateScore};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RankingRow {
    #[serde(rename = "Name", alias = "name", default)]
    pub name: Option<String>,
    #[serde(rename = "Rank", alias = "rank", default)]
    pub rank: Option<u32>,
    #[serde(rename = "Select", alias = "select", default)]
    pub select: bool,
    #[serde(rename = "Overall Match %", alias = "overall_match", default)]
    pub overall_match: Option<f64>,
    #[serde(rename = "Skills %", alias = "skills", default)]
    pub skills: Option<f64>,
    #[serde(rename = "Education %", alias = "education", default)]
    pub education: Option<f64>,
    #[serde(rename = "Location %", alias = "location", default)]
    pub location: Option<f64>,
    #[serde(rename = "Interest %", alias = "interest", default)]
    pub interest: Option<f64>,
    #[serde(rename = "Gender", alias = "gender", default, deserialize_with = "null_as_empty")]
    pub gender: String,
    #[serde(rename = "Category", alias = "category", default, deserialize_with = "null_as_empty")]
    pub category: String,
    #[serde(rename = "Diversity", alias = "diversity", default, deserialize_with = "null_as_empty")]
    pub diversity: String,
    #[serde(
        rename = "Past Participant",
        alias = "past_participant",
        default,
        deserialize_with = "yes_no"
    )]
    pub past_participant: bool,
    #[serde(
        rename = "Candidate Skills",
        alias = "candidate_skills",
        default,
        deserialize_with = "null_as_empty"
    )]
    pub candidate_skills: String,
    #[serde(
        rename = "Education",
        alias = "education_detail",
        default,
        deserialize_with = "null_as_empty"
    )]
    pub education_detail: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AllotmentRow {
    #[serde(rename = "Name", alias = "name", default)]
    pub name: Option<String>,
    #[serde(rename = "Status", alias = "status", default)]
    pub status: Option<AllotmentStatus>,
    #[serde(rename = "Allotted Job", alias = "allotted_job", default)]
    pub allotted_job: Option<String>,
    #[serde(rename = "Match %", alias = "overall_match", default)]
    pub overall_match: Option<f64>,
    #[serde(rename = "Skills %", alias = "skills", default)]
    pub skills: Option<f64>,
    #[serde(rename = "Education %", alias = "education", default)]
    pub education: Option<f64>,
    #[serde(rename = "Location %", alias = "location", default)]
    pub location: Option<f64>,
    #[serde(rename = "Interest %", alias = "interest", default)]
    pub interest: Option<f64>,
    #[serde(rename = "Gender", alias = "gender", default, deserialize_with = "null_as_empty")]
    pub gender: String,
    #[serde(rename = "Category", alias = "category", default, deserialize_with = "null_as_empty")]
    pub category: String,
    #[serde(rename = "Diversity", alias = "diversity", default, deserialize_with = "null_as_empty")]
    pub diversity: String,
    #[serde(rename = "Select", alias = "select", default)]
    pub select: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RankingEnvelope {
    pub(crate) ranking: Vec<RankingRow>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AllotmentEnvelope {
    pub(crate) allotment_list: Vec<AllotmentRow>,
}

/// Error body the service returns alongside a non-success status.
#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct ErrorBody {
    pub(crate) detail: String,
}

/// What is wrong with a single field of a row.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldProblem {
    Missing(&'static str),
    Blank(&'static str),
    OutOfRange { field: &'static str, value: f64 },
}

impl fmt::Display for FieldProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldProblem::Missing(field) => write!(f, "missing field '{field}'"),
            FieldProblem::Blank(field) => write!(f, "field '{field}' is blank"),
            FieldProblem::OutOfRange { field, value } => {
                write!(f, "field '{field}' must be within 0-100, got {value}")
            }
        }
    }
}

/// A malformed row; fails the whole list it belongs to.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("record {index} is malformed: {problem}")]
pub struct RecordError {
    pub index: usize,
    pub problem: FieldProblem,
}

impl RecordError {
    pub fn new(index: usize, problem: FieldProblem) -> Self {
        Self { index, problem }
    }
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T, FieldProblem> {
    value.ok_or(FieldProblem::Missing(field))
}

fn required_name(value: Option<String>) -> Result<String, FieldProblem> {
    let name = required(value, "name")?;
    if name.trim().is_empty() {
        return Err(FieldProblem::Blank("name"));
    }
    Ok(name)
}

impl RankingRow {
    fn into_record(self) -> Result<CandidateScore, FieldProblem> {
        Ok(CandidateScore {
            rank: self.rank.unwrap_or_default(),
            name: required_name(self.name)?,
            overall_match: required(self.overall_match, "overall_match")?,
            skills: required(self.skills, "skills")?,
            education: required(self.education, "education")?,
            location: required(self.location, "location")?,
            interest: required(self.interest, "interest")?,
            gender: self.gender,
            category: self.category,
            selected: self.select,
            diversity: self.diversity,
            past_participant: self.past_participant,
            candidate_skills: self.candidate_skills,
            education_detail: self.education_detail,
        })
    }
}

impl AllotmentRow {
    fn into_record(self) -> Result<AllotmentRecord, FieldProblem> {
        let allotted_job = self
            .allotted_job
            .filter(|job| !job.trim().is_empty() && job.trim() != "N/A");

        Ok(AllotmentRecord {
            rank: 0,
            name: required_name(self.name)?,
            status: required(self.status, "status")?,
            allotted_job,
            overall_match: required(self.overall_match, "overall_match")?,
            skills: required(self.skills, "skills")?,
            education: required(self.education, "education")?,
            location: required(self.location, "location")?,
            interest: required(self.interest, "interest")?,
            gender: self.gender,
            category: self.category,
            selected: self.select,
            diversity: self.diversity,
        })
    }
}

/// Converts a ranking payload, failing on the first malformed row.
pub fn ranking_records(rows: Vec<RankingRow>) -> Result<Vec<CandidateScore>, RecordError> {
    rows.into_iter()
        .enumerate()
        .map(|(index, row)| row.into_record().map_err(|problem| RecordError::new(index, problem)))
        .collect()
}

/// Converts an allotment payload, failing on the first malformed row.
pub fn allotment_records(rows: Vec<AllotmentRow>) -> Result<Vec<AllotmentRecord>, RecordError> {
    rows.into_iter()
        .enumerate()
        .map(|(index, row)| row.into_record().map_err(|problem| RecordError::new(index, problem)))
        .collect()
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.map(|value| value.trim().to_string()).unwrap_or_default())
}

fn yes_no<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(value)) => value,
        Some(Flag::Text(text)) => text.trim().eq_ignore_ascii_case("yes"),
        None => false,
    })
}
