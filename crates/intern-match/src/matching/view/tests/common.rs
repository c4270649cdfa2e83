use crate::matching::domain::{
    AllotmentRecord, AllotmentStatus, CandidateScore, Criterion, JobRequest,
};

pub(super) fn candidate(name: &str, overall: f64) -> CandidateScore {
    CandidateScore {
        rank: 0,
        name: name.to_string(),
        overall_match: overall,
        skills: 50.0,
        education: 50.0,
        location: 50.0,
        interest: 50.0,
        gender: "MALE".to_string(),
        category: "GENERAL".to_string(),
        selected: false,
        diversity: String::new(),
        past_participant: false,
        candidate_skills: String::new(),
        education_detail: String::new(),
    }
}

pub(super) fn candidate_with(
    name: &str,
    overall: f64,
    skills: f64,
    gender: &str,
    category: &str,
) -> CandidateScore {
    CandidateScore {
        skills,
        gender: gender.to_string(),
        category: category.to_string(),
        ..candidate(name, overall)
    }
}

/// A(90), B(70), C(80) in service order.
pub(super) fn abc() -> Vec<CandidateScore> {
    vec![candidate("A", 90.0), candidate("B", 70.0), candidate("C", 80.0)]
}

pub(super) fn mixed_roster() -> Vec<CandidateScore> {
    vec![
        candidate_with("Priya Sharma", 88.0, 92.0, "FEMALE", "GENERAL"),
        candidate_with("Rohan Verma", 71.5, 60.0, "MALE", "PWD"),
        candidate_with("Aisha Khan", 64.0, 95.0, "FEMALE", "GENERAL"),
        candidate_with("Suresh Gupta", 71.5, 40.0, "MALE", "SC"),
        candidate_with("Meera Nair", 55.0, 60.0, "FEMALE", "ST"),
    ]
}

pub(super) fn job(offers: u32) -> JobRequest {
    JobRequest {
        post: "Data Science Intern".to_string(),
        company: "DataCorp Analytics".to_string(),
        city: "Chennai".to_string(),
        state: "Tamil Nadu".to_string(),
        offers,
        degree: vec!["B.TECH".to_string()],
        branch: vec!["CS".to_string()],
        skills: vec!["PYTHON".to_string(), "SQL".to_string()],
        priority: vec![Criterion::Skills, Criterion::Education],
    }
}

pub(super) fn allotment(
    name: &str,
    status: AllotmentStatus,
    overall: f64,
    gender: &str,
) -> AllotmentRecord {
    let allotted_job = match status {
        AllotmentStatus::Allotted => Some("AI/ML Intern".to_string()),
        AllotmentStatus::Waitlisted => None,
    };
    AllotmentRecord {
        rank: 0,
        name: name.to_string(),
        status,
        allotted_job,
        overall_match: overall,
        skills: overall,
        education: overall,
        location: overall,
        interest: overall,
        gender: gender.to_string(),
        category: "GENERAL".to_string(),
        selected: false,
        diversity: String::new(),
    }
}

/// Service order: allotted by score, then waitlisted.
pub(super) fn allotment_list() -> Vec<AllotmentRecord> {
    vec![
        allotment("Priya Sharma", AllotmentStatus::Allotted, 81.0, "FEMALE"),
        allotment("Rohan Verma", AllotmentStatus::Allotted, 62.0, "MALE"),
        allotment("Aisha Khan", AllotmentStatus::Waitlisted, 0.0, "FEMALE"),
        allotment("Suresh Gupta", AllotmentStatus::Waitlisted, 0.0, "MALE"),
    ]
}

pub(super) fn names<R: crate::matching::view::ViewRecord>(view: &[R]) -> Vec<String> {
    view.iter().map(|record| record.name().to_string()).collect()
}
