use serde::Serialize;

/// Outcome of comparing the selected count against the job's capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStatus {
    Empty,
    Valid,
    OverLimit,
}

impl SelectionStatus {
    pub fn evaluate(selected: usize, offers: u32) -> Self {
        if selected == 0 {
            SelectionStatus::Empty
        } else if selected > offers as usize {
            SelectionStatus::OverLimit
        } else {
            SelectionStatus::Valid
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectionSummary {
    pub selected: usize,
    pub offers: u32,
    pub status: SelectionStatus,
}

impl SelectionSummary {
    pub fn new(selected: usize, offers: u32) -> Self {
        Self {
            selected,
            offers,
            status: SelectionStatus::evaluate(selected, offers),
        }
    }

    /// Inline feedback shown next to the selection counter.
    pub fn feedback(&self) -> String {
        match self.status {
            SelectionStatus::Empty => "No candidates selected yet".to_string(),
            SelectionStatus::OverLimit => format!("Too many selected! Limit: {}", self.offers),
            SelectionStatus::Valid => format!("{} candidates selected", self.selected),
        }
    }
}

/// Confirmation line for a committed selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommittedCandidate {
    pub name: String,
    pub overall_match: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_boundaries() {
        assert_eq!(SelectionStatus::evaluate(0, 2), SelectionStatus::Empty);
        assert_eq!(SelectionStatus::evaluate(1, 2), SelectionStatus::Valid);
        assert_eq!(SelectionStatus::evaluate(2, 2), SelectionStatus::Valid);
        assert_eq!(SelectionStatus::evaluate(3, 2), SelectionStatus::OverLimit);
    }

    #[test]
    fn feedback_mentions_limit_when_over() {
        let summary = SelectionSummary::new(4, 3);
        assert_eq!(summary.feedback(), "Too many selected! Limit: 3");
    }
}
