use std::collections::BTreeMap;

use tripweaver_api::models::trip::ItineraryDay;
use tripweaver_api::services::itinerary_ops::{
    append_activity, apply_drop, delete_activity, move_across_days, reorder_within_day,
    DragPayload, ItineraryError,
};

fn day(n: u32, activities: &[&str]) -> ItineraryDay {
    ItineraryDay {
        day: n,
        activities: activities.iter().map(|s| s.to_string()).collect(),
    }
}

fn sample_itinerary() -> Vec<ItineraryDay> {
    vec![
        day(1, &["Alfama walk", "Castle of São Jorge", "Fado dinner"]),
        day(2, &["Belém Tower", "Pastéis de Belém"]),
        day(3, &["Day trip to Sintra"]),
    ]
}

/// Multiset of all activity strings across all days.
fn activity_counts(days: &[ItineraryDay]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for d in days {
        for a in &d.activities {
            *counts.entry(a.clone()).or_insert(0) += 1;
        }
    }
    counts
}

#[test]
fn append_adds_to_end_of_existing_day() {
    let mut days = sample_itinerary();
    append_activity(&mut days, 2, "Tram 28 ride");
    assert_eq!(days[1].activities.last().unwrap(), "Tram 28 ride");
    assert_eq!(days[1].activities.len(), 3);
}

#[test]
fn append_creates_missing_day_in_order() {
    let mut days = vec![day(1, &["a"]), day(3, &["c"])];
    append_activity(&mut days, 2, "b");
    let numbers: Vec<u32> = days.iter().map(|d| d.day).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert_eq!(days[1].activities, vec!["b"]);
}

#[test]
fn reorder_swaps_two_entries() {
    let mut days = sample_itinerary();
    reorder_within_day(&mut days, 1, 0, 2).unwrap();
    assert_eq!(days[0].activities[0], "Fado dinner");
    assert_eq!(days[0].activities[2], "Alfama walk");
    assert_eq!(days[0].activities[1], "Castle of São Jorge");
}

#[test]
fn reorder_same_index_is_a_noop() {
    let mut days = sample_itinerary();
    let before = days.clone();
    reorder_within_day(&mut days, 1, 1, 1).unwrap();
    assert_eq!(activity_counts(&days), activity_counts(&before));
    assert_eq!(days[0].activities, before[0].activities);
}

#[test]
fn reorder_rejects_out_of_range_index() {
    let mut days = sample_itinerary();
    let err = reorder_within_day(&mut days, 2, 0, 5).unwrap_err();
    assert_eq!(
        err,
        ItineraryError::IndexOutOfRange {
            day: 2,
            index: 5,
            len: 2
        }
    );
}

#[test]
fn move_transfers_ownership_atomically() {
    let mut days = sample_itinerary();
    move_across_days(&mut days, 1, 3, 1, 0).unwrap();

    // Present exactly once, at the target position.
    assert_eq!(days[2].activities[0], "Castle of São Jorge");
    let counts = activity_counts(&days);
    assert_eq!(counts["Castle of São Jorge"], 1);

    // Source shrank by one, target grew by one.
    assert_eq!(days[0].activities.len(), 2);
    assert_eq!(days[2].activities.len(), 2);
}

#[test]
fn move_clamps_target_index_to_length() {
    let mut days = sample_itinerary();
    move_across_days(&mut days, 3, 2, 0, 99).unwrap();
    assert_eq!(days[1].activities.last().unwrap(), "Day trip to Sintra");
}

#[test]
fn move_keeps_emptied_source_day() {
    let mut days = sample_itinerary();
    move_across_days(&mut days, 3, 1, 0, 0).unwrap();
    assert!(days.iter().any(|d| d.day == 3 && d.activities.is_empty()));
}

#[test]
fn move_rejects_missing_source_day() {
    let mut days = sample_itinerary();
    let err = move_across_days(&mut days, 9, 1, 0, 0).unwrap_err();
    assert_eq!(err, ItineraryError::DayNotFound(9));
}

#[test]
fn delete_removes_entry() {
    let mut days = sample_itinerary();
    delete_activity(&mut days, 1, 1).unwrap();
    assert_eq!(days[0].activities, vec!["Alfama walk", "Fado dinner"]);
}

#[test]
fn delete_collapses_emptied_day() {
    let mut days = sample_itinerary();
    delete_activity(&mut days, 3, 0).unwrap();
    assert!(days.iter().all(|d| d.day != 3));
    assert_eq!(days.len(), 2);
}

#[test]
fn operation_sequence_preserves_multiset() {
    let mut days = sample_itinerary();
    let before = activity_counts(&days);

    reorder_within_day(&mut days, 1, 0, 1).unwrap();
    move_across_days(&mut days, 2, 1, 0, 2).unwrap();
    move_across_days(&mut days, 1, 3, 3, 0).unwrap();
    reorder_within_day(&mut days, 3, 0, 1).unwrap();

    // Pure rearrangement: nothing duplicated, nothing lost.
    assert_eq!(activity_counts(&days), before);

    append_activity(&mut days, 3, "LX Factory");
    delete_activity(&mut days, 1, 0).unwrap();

    let mut expected = before;
    *expected.entry("LX Factory".to_string()).or_insert(0) += 1;
    let total_after: usize = activity_counts(&days).values().sum();
    let total_expected: usize = expected.values().sum::<usize>() - 1;
    assert_eq!(total_after, total_expected);
    assert!(activity_counts(&days).values().all(|&c| c == 1));
}

#[test]
fn drop_on_source_position_is_noop() {
    let mut days = sample_itinerary();
    let before = days.clone();
    let payload = DragPayload {
        source_day: 2,
        source_index: 1,
    };
    apply_drop(&mut days, payload, 2, 1).unwrap();
    assert_eq!(days[1].activities, before[1].activities);
}

#[test]
fn drop_dispatches_same_day_to_reorder() {
    let mut days = sample_itinerary();
    let payload = DragPayload {
        source_day: 1,
        source_index: 0,
    };
    apply_drop(&mut days, payload, 1, 2).unwrap();
    assert_eq!(days[0].activities[2], "Alfama walk");
    assert_eq!(days[0].activities[0], "Fado dinner");
}

#[test]
fn drop_dispatches_cross_day_to_move() {
    let mut days = sample_itinerary();
    let payload = DragPayload {
        source_day: 1,
        source_index: 2,
    };
    apply_drop(&mut days, payload, 3, 1).unwrap();
    assert_eq!(days[2].activities, vec!["Day trip to Sintra", "Fado dinner"]);
    assert_eq!(days[0].activities.len(), 2);
}
