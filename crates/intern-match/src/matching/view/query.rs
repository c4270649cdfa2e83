use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Categorical columns a view can be filtered on. Never used for scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    Category,
    Gender,
    Status,
}

impl FilterField {
    pub const ALL: [FilterField; 3] = [Self::Category, Self::Gender, Self::Status];

    pub const fn label(self) -> &'static str {
        match self {
            FilterField::Category => "category",
            FilterField::Gender => "gender",
            FilterField::Status => "status",
        }
    }
}

/// Either the `"ALL"` sentinel or a concrete value compared exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum FilterValue {
    #[default]
    All,
    Only(String),
}

impl FilterValue {
    pub const SENTINEL: &'static str = "ALL";

    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == Self::SENTINEL {
            FilterValue::All
        } else {
            FilterValue::Only(trimmed.to_string())
        }
    }

    /// A concrete filter rejects records that lack the field altogether.
    pub fn admits(&self, value: Option<&str>) -> bool {
        match self {
            FilterValue::All => true,
            FilterValue::Only(expected) => value == Some(expected.as_str()),
        }
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

/// `null` on the wire means no filtering.
impl From<Option<String>> for FilterValue {
    fn from(value: Option<String>) -> Self {
        value.as_deref().map(Self::parse).unwrap_or_default()
    }
}

impl From<FilterValue> for String {
    fn from(value: FilterValue) -> Self {
        match value {
            FilterValue::All => FilterValue::SENTINEL.to_string(),
            FilterValue::Only(value) => value,
        }
    }
}

/// Numeric columns a view can be sorted on, always descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum ScoreField {
    OverallMatch,
    Skills,
    Education,
    Location,
    Interest,
}

impl ScoreField {
    pub const fn label(self) -> &'static str {
        match self {
            ScoreField::OverallMatch => "Overall Match %",
            ScoreField::Skills => "Skills %",
            ScoreField::Education => "Education %",
            ScoreField::Location => "Location %",
            ScoreField::Interest => "Interest %",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownScoreField(pub String);

impl fmt::Display for UnknownScoreField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown sort key '{}': expected overall, skills, education, location or interest",
            self.0
        )
    }
}

impl std::error::Error for UnknownScoreField {}

impl FromStr for ScoreField {
    type Err = UnknownScoreField;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw
            .trim()
            .trim_end_matches('%')
            .trim()
            .to_ascii_lowercase()
            .replace([' ', '-'], "_");

        match normalized.as_str() {
            "overall" | "overall_match" | "match" => Ok(Self::OverallMatch),
            "skills" => Ok(Self::Skills),
            "education" => Ok(Self::Education),
            "location" => Ok(Self::Location),
            "interest" => Ok(Self::Interest),
            _ => Err(UnknownScoreField(raw.to_string())),
        }
    }
}

impl TryFrom<String> for ScoreField {
    type Error = UnknownScoreField;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

/// Filters and sort key chosen by the user for the current view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewQuery {
    #[serde(default)]
    pub category: FilterValue,
    #[serde(default)]
    pub gender: FilterValue,
    #[serde(default)]
    pub status: FilterValue,
    /// `None` falls back to the record kind's default order.
    #[serde(default)]
    pub sort: Option<ScoreField>,
}

impl ViewQuery {
    pub fn filter(&self, field: FilterField) -> &FilterValue {
        match field {
            FilterField::Category => &self.category,
            FilterField::Gender => &self.gender,
            FilterField::Status => &self.status,
        }
    }

    pub fn with_filter(mut self, field: FilterField, value: FilterValue) -> Self {
        match field {
            FilterField::Category => self.category = value,
            FilterField::Gender => self.gender = value,
            FilterField::Status => self.status = value,
        }
        self
    }

    pub fn sorted_by(mut self, sort: ScoreField) -> Self {
        self.sort = Some(sort);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_sentinel_is_case_sensitive() {
        assert_eq!(FilterValue::parse("ALL"), FilterValue::All);
        assert_eq!(FilterValue::parse(""), FilterValue::All);
        assert_eq!(
            FilterValue::parse("all"),
            FilterValue::Only("all".to_string())
        );
    }

    #[test]
    fn concrete_filter_rejects_absent_field() {
        let only = FilterValue::Only("Allotted".to_string());
        assert!(!only.admits(None));
        assert!(only.admits(Some("Allotted")));
        assert!(!only.admits(Some("allotted")));
        assert!(FilterValue::All.admits(None));
    }

    #[test]
    fn score_field_accepts_column_names() {
        assert_eq!(
            "Overall Match %".parse::<ScoreField>(),
            Ok(ScoreField::OverallMatch)
        );
        assert_eq!("skills".parse::<ScoreField>(), Ok(ScoreField::Skills));
        assert_eq!("Interest %".parse::<ScoreField>(), Ok(ScoreField::Interest));
        assert!("gpa".parse::<ScoreField>().is_err());
    }

    #[test]
    fn query_deserializes_with_defaults() {
        let query: ViewQuery = serde_json::from_value(serde_json::json!({
            "category": "SC",
            "sort": "skills"
        }))
        .expect("query parses");
        assert_eq!(query.category, FilterValue::Only("SC".to_string()));
        assert_eq!(query.gender, FilterValue::All);
        assert_eq!(query.sort, Some(ScoreField::Skills));
    }

    #[test]
    fn query_accepts_the_same_sort_names_as_the_console() {
        for (raw, expected) in [
            ("overall", ScoreField::OverallMatch),
            ("overall_match", ScoreField::OverallMatch),
            ("Overall Match %", ScoreField::OverallMatch),
            ("Skills %", ScoreField::Skills),
        ] {
            let query: ViewQuery =
                serde_json::from_value(serde_json::json!({ "sort": raw })).expect("query parses");
            assert_eq!(query.sort, Some(expected), "sort name {raw}");
        }

        let err = serde_json::from_value::<ViewQuery>(serde_json::json!({ "sort": "gpa" }))
            .expect_err("unknown sort rejected");
        assert!(err.to_string().contains("unknown sort key 'gpa'"));
    }

    #[test]
    fn null_filter_means_all() {
        let query: ViewQuery = serde_json::from_value(serde_json::json!({
            "category": null,
            "gender": "FEMALE"
        }))
        .expect("query parses");
        assert_eq!(query.category, FilterValue::All);
        assert_eq!(query.gender, FilterValue::Only("FEMALE".to_string()));
    }

    #[test]
    fn sort_serializes_as_snake_case() {
        let query = ViewQuery::default().sorted_by(ScoreField::OverallMatch);
        let value = serde_json::to_value(&query).expect("query serializes");
        assert_eq!(value["sort"], "overall_match");
        assert_eq!(value["category"], "ALL");
    }
}
