//! Local checks on a candidate CSV before it is sent to the ranking service.

use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use super::domain::CandidateUpload;

pub const REQUIRED_COLUMNS: [&str; 5] = ["name", "education", "skills", "city", "state"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterSummary {
    pub rows: u64,
    pub columns: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("'{0}' is not a CSV file")]
    NotCsv(String),
    #[error("CSV is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("failed to read candidate file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid candidate CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Counts data rows and checks the header for the required columns.
/// Header names are compared lower-cased and trimmed.
pub fn preflight<R: Read>(reader: R) -> Result<RosterSummary, RosterError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let columns: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|header| header.trim().to_ascii_lowercase())
        .collect();

    let present: BTreeSet<&str> = columns.iter().map(String::as_str).collect();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !present.contains(*column))
        .map(|column| column.to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    if !missing.is_empty() {
        return Err(RosterError::MissingColumns(missing));
    }

    let mut rows = 0;
    for record in csv_reader.records() {
        record?;
        rows += 1;
    }

    Ok(RosterSummary { rows, columns })
}

/// Validates the file name and contents and packages them for upload.
pub fn prepare_upload(
    filename: &str,
    contents: Vec<u8>,
) -> Result<(CandidateUpload, RosterSummary), RosterError> {
    if !filename.ends_with(".csv") {
        return Err(RosterError::NotCsv(filename.to_string()));
    }

    let summary = preflight(contents.as_slice())?;
    let upload = CandidateUpload {
        filename: filename.to_string(),
        contents,
    };
    Ok((upload, summary))
}

pub fn load_upload<P: AsRef<Path>>(
    path: P,
) -> Result<(CandidateUpload, RosterSummary), RosterError> {
    let path = path.as_ref();
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let contents = std::fs::read(path)?;
    prepare_upload(&filename, contents)
}
