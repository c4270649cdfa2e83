use super::common::*;
use crate::matching::view::{
    CommittedCandidate, FilterField, FilterValue, RankingViewModel, SelectionStatus, ViewError,
    ViewQuery,
};

fn loaded(offers: u32) -> RankingViewModel {
    let mut model = RankingViewModel::new();
    model.ingest(abc(), &job(offers)).expect("ingest succeeds");
    model
}

#[test]
fn nothing_selected_is_empty() {
    let model = loaded(2);
    let summary = model.validate_selection();
    assert_eq!(summary.status, SelectionStatus::Empty);
    assert_eq!(summary.selected, 0);
    assert_eq!(summary.offers, 2);
}

#[test]
fn selecting_up_to_offers_is_valid() {
    let mut model = loaded(2);
    model.record_selection("A", true).expect("A in view");
    let summary = model.record_selection("B", true).expect("B in view");

    assert_eq!(summary.status, SelectionStatus::Valid);
    assert_eq!(summary.selected, 2);
}

#[test]
fn three_of_two_is_over_limit_and_commit_declines() {
    let mut model = loaded(2);
    for name in ["A", "B", "C"] {
        model.record_selection(name, true).expect("candidate in view");
    }

    assert_eq!(model.validate_selection().status, SelectionStatus::OverLimit);
    assert_eq!(
        model.commit_selection(),
        Err(ViewError::OverLimit {
            selected: 3,
            offers: 2
        })
    );
}

#[test]
fn commit_without_selection_declines() {
    let model = loaded(2);
    assert_eq!(model.commit_selection(), Err(ViewError::EmptySelection));
}

#[test]
fn commit_lists_selected_in_view_order() {
    let mut model = loaded(2);
    model.record_selection("B", true).expect("B in view");
    model.record_selection("A", true).expect("A in view");

    let committed = model.commit_selection().expect("selection valid");
    assert_eq!(
        committed,
        vec![
            CommittedCandidate {
                name: "A".to_string(),
                overall_match: 90.0
            },
            CommittedCandidate {
                name: "B".to_string(),
                overall_match: 70.0
            },
        ]
    );
    assert_eq!(model.commit_selection(), Ok(committed));
}

#[test]
fn unchecking_reduces_the_count() {
    let mut model = loaded(2);
    for name in ["A", "B", "C"] {
        model.record_selection(name, true).expect("candidate in view");
    }
    let summary = model.record_selection("C", false).expect("C in view");
    assert_eq!(summary.status, SelectionStatus::Valid);
}

#[test]
fn unknown_candidate_is_reported() {
    let mut model = loaded(2);
    assert_eq!(
        model.record_selection("Z", true),
        Err(ViewError::UnknownCandidate {
            name: "Z".to_string()
        })
    );
}

#[test]
fn selection_outside_the_view_is_rejected() {
    let mut model = RankingViewModel::new();
    model.ingest(mixed_roster(), &job(3)).expect("ingest succeeds");
    model
        .apply_view(
            ViewQuery::default()
                .with_filter(FilterField::Gender, FilterValue::Only("FEMALE".to_string())),
        )
        .expect("view applies");

    assert!(matches!(
        model.record_selection("Rohan Verma", true),
        Err(ViewError::UnknownCandidate { .. })
    ));
}

#[test]
fn filtering_drops_hidden_selections() {
    let mut model = RankingViewModel::new();
    model.ingest(mixed_roster(), &job(3)).expect("ingest succeeds");
    model.record_selection("Priya Sharma", true).expect("in view");
    model.record_selection("Rohan Verma", true).expect("in view");

    model
        .apply_view(
            ViewQuery::default()
                .with_filter(FilterField::Gender, FilterValue::Only("FEMALE".to_string())),
        )
        .expect("view applies");
    assert_eq!(model.selected_count(), 1);

    model.apply_view(ViewQuery::default()).expect("view applies");
    assert_eq!(model.selected_count(), 1);
    assert!(model.view().iter().any(|c| c.name == "Priya Sharma" && c.selected));
}

#[test]
fn reingest_with_fewer_offers_invalidates_selection() {
    let mut model = loaded(2);
    model.record_selection("A", true).expect("A in view");
    model.record_selection("C", true).expect("C in view");
    assert_eq!(model.validate_selection().status, SelectionStatus::Valid);

    model.ingest(abc(), &job(1)).expect("second ingest succeeds");

    let summary = model.validate_selection();
    assert_eq!(summary.selected, 2);
    assert_eq!(summary.status, SelectionStatus::OverLimit);
}

#[test]
fn service_preselected_rows_start_selected() {
    let mut records = abc();
    records[1].selected = true;

    let mut model = RankingViewModel::new();
    model.ingest(records, &job(2)).expect("ingest succeeds");

    assert_eq!(model.selected_count(), 1);
    assert!(model.master().iter().all(|c| !c.selected));
}

#[test]
fn validation_before_ingest_is_empty_and_commit_not_loaded() {
    let model = RankingViewModel::new();
    assert_eq!(model.validate_selection().status, SelectionStatus::Empty);
    assert_eq!(model.commit_selection(), Err(ViewError::NotLoaded));
}
