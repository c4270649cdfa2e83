use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Scoring dimensions a job can prioritise, most important first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Criterion {
    Skills,
    Education,
    Location,
    Interest,
}

impl Criterion {
    pub const fn label(self) -> &'static str {
        match self {
            Criterion::Skills => "skills",
            Criterion::Education => "education",
            Criterion::Location => "location",
            Criterion::Interest => "interest",
        }
    }
}

/// Job description submitted to the ranking service. Only `offers` matters
/// once results come back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRequest {
    pub post: String,
    pub company: String,
    pub city: String,
    pub state: String,
    pub offers: u32,
    #[serde(default)]
    pub degree: Vec<String>,
    #[serde(default)]
    pub branch: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub priority: Vec<Criterion>,
}

impl JobRequest {
    pub const MAX_PRIORITIES: usize = 4;

    pub fn validate(&self) -> Result<(), JobRequestError> {
        if self.post.trim().is_empty() {
            return Err(JobRequestError::MissingField("post"));
        }
        if self.company.trim().is_empty() {
            return Err(JobRequestError::MissingField("company"));
        }
        if self.offers == 0 {
            return Err(JobRequestError::NoOffers);
        }
        if self.priority.len() > Self::MAX_PRIORITIES {
            return Err(JobRequestError::TooManyPriorities(self.priority.len()));
        }

        let mut seen = HashSet::new();
        for criterion in &self.priority {
            if !seen.insert(*criterion) {
                return Err(JobRequestError::DuplicatePriority(*criterion));
            }
        }

        Ok(())
    }

    pub fn label(&self) -> String {
        format!("{} at {}", self.post, self.company)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobRequestError {
    #[error("job field '{0}' must not be blank")]
    MissingField(&'static str),
    #[error("a job must offer at least one position")]
    NoOffers,
    #[error("at most 4 priorities may be given, got {0}")]
    TooManyPriorities(usize),
    #[error("priority '{}' is listed more than once", .0.label())]
    DuplicatePriority(Criterion),
}

/// Preset job as listed by the ranking service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetJob {
    pub key: String,
    pub post: String,
    pub company: String,
    pub city: String,
    pub state: String,
    pub offers: u32,
    #[serde(default)]
    pub degree: Vec<String>,
    #[serde(default)]
    pub branch: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub priority: Vec<Criterion>,
}

impl PresetJob {
    pub fn to_request(&self) -> JobRequest {
        JobRequest {
            post: self.post.clone(),
            company: self.company.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            offers: self.offers,
            degree: self.degree.clone(),
            branch: self.branch.clone(),
            skills: self.skills.clone(),
            priority: self.priority.clone(),
        }
    }
}

/// Dropdown vocabularies for the custom job form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormData {
    #[serde(default)]
    pub indian_states: Vec<String>,
    #[serde(default)]
    pub bachelors_degrees: Vec<String>,
    #[serde(default)]
    pub all_branches: Vec<String>,
    #[serde(default)]
    pub all_skills_list: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub rows_loaded: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllotmentRequest {
    pub job_keys: Vec<String>,
}

/// Candidate CSV handed to the service.
#[derive(Debug, Clone)]
pub struct CandidateUpload {
    pub filename: String,
    pub contents: Vec<u8>,
}

/// One ranking result for a single job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateScore {
    pub rank: u32,
    pub name: String,
    pub overall_match: f64,
    pub skills: f64,
    pub education: f64,
    pub location: f64,
    pub interest: f64,
    pub gender: String,
    pub category: String,
    pub selected: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub diversity: String,
    pub past_participant: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub candidate_skills: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub education_detail: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllotmentStatus {
    Allotted,
    Waitlisted,
}

impl AllotmentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            AllotmentStatus::Allotted => "Allotted",
            AllotmentStatus::Waitlisted => "Waitlisted",
        }
    }
}

/// Candidate row from a batch allotment across several jobs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllotmentRecord {
    pub rank: u32,
    pub name: String,
    pub status: AllotmentStatus,
    /// `None` for waitlisted candidates; rendered as "N/A".
    pub allotted_job: Option<String>,
    pub overall_match: f64,
    pub skills: f64,
    pub education: f64,
    pub location: f64,
    pub interest: f64,
    pub gender: String,
    pub category: String,
    pub selected: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub diversity: String,
}

impl AllotmentRecord {
    pub fn allotted_job_label(&self) -> &str {
        self.allotted_job.as_deref().unwrap_or("N/A")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> JobRequest {
        JobRequest {
            post: "AI/ML Intern".to_string(),
            company: "IntelliTech".to_string(),
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            offers: 3,
            degree: vec!["B.TECH".to_string()],
            branch: vec!["CS".to_string(), "IT".to_string()],
            skills: vec!["AIML".to_string(), "PYTHON".to_string()],
            priority: vec![Criterion::Skills, Criterion::Education],
        }
    }

    #[test]
    fn valid_request_passes() {
        assert_eq!(request().validate(), Ok(()));
    }

    #[test]
    fn zero_offers_rejected() {
        let mut job = request();
        job.offers = 0;
        assert_eq!(job.validate(), Err(JobRequestError::NoOffers));
    }

    #[test]
    fn duplicate_priority_rejected() {
        let mut job = request();
        job.priority = vec![Criterion::Skills, Criterion::Location, Criterion::Skills];
        assert_eq!(
            job.validate(),
            Err(JobRequestError::DuplicatePriority(Criterion::Skills))
        );
    }

    #[test]
    fn priority_uses_lowercase_labels_on_the_wire() {
        let json = serde_json::to_value(request()).expect("serializes");
        assert_eq!(json["priority"], serde_json::json!(["skills", "education"]));
    }

    #[test]
    fn preset_without_priority_deserializes() {
        let preset: PresetJob = serde_json::from_value(serde_json::json!({
            "key": "job5",
            "post": "Cybersecurity Intern",
            "company": "SecureNet Solutions",
            "city": "Hyderabad",
            "state": "Telangana",
            "offers": 2,
            "degree": ["B.TECH"],
            "branch": ["CS"],
            "skills": ["CYBERSECURITY"]
        }))
        .expect("preset parses");
        let job = preset.to_request();
        assert!(job.priority.is_empty());
        assert_eq!(job.offers, 2);
    }
}
