//! Mutation operations on the per-day activity lists of an itinerary.
//!
//! Every operation preserves the same invariant: each activity string
//! belongs to exactly one day and position, and the multiset of activities
//! across all days changes only by the intended single addition or removal.
//! Ordering within unaffected days is never touched.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

use crate::models::trip::ItineraryDay;

#[derive(Debug, PartialEq)]
pub enum ItineraryError {
    DayNotFound(u32),
    IndexOutOfRange { day: u32, index: usize, len: usize },
}

impl fmt::Display for ItineraryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItineraryError::DayNotFound(day) => write!(f, "day {} not found", day),
            ItineraryError::IndexOutOfRange { day, index, len } => write!(
                f,
                "activity index {} out of range for day {} (len {})",
                index, day, len
            ),
        }
    }
}

impl Error for ItineraryError {}

/// Drag payload attached on drag start and read back on drop. Typed rather
/// than an ad hoc serialized string so the drop handler can validate it.
#[derive(Debug, Deserialize, Serialize, Clone, Copy)]
pub struct DragPayload {
    #[serde(rename = "sourceDay")]
    pub source_day: u32,
    #[serde(rename = "sourceIndex")]
    pub source_index: usize,
}

fn day_position(days: &[ItineraryDay], day: u32) -> Option<usize> {
    days.iter().position(|d| d.day == day)
}

/// Adds an activity to the end of the addressed day's list, creating the
/// day record (in day-number order) when it does not exist yet.
pub fn append_activity(days: &mut Vec<ItineraryDay>, day: u32, activity: impl Into<String>) {
    let activity = activity.into();
    match day_position(days, day) {
        Some(pos) => days[pos].activities.push(activity),
        None => {
            let insert_at = days.iter().take_while(|d| d.day < day).count();
            days.insert(
                insert_at,
                ItineraryDay {
                    day,
                    activities: vec![activity],
                },
            );
        }
    }
}

/// Swaps the entries at `source_index` and `target_index` within one day.
/// Equal indices are a no-op.
pub fn reorder_within_day(
    days: &mut [ItineraryDay],
    day: u32,
    source_index: usize,
    target_index: usize,
) -> Result<(), ItineraryError> {
    let pos = day_position(days, day).ok_or(ItineraryError::DayNotFound(day))?;
    let activities = &mut days[pos].activities;
    for index in [source_index, target_index] {
        if index >= activities.len() {
            return Err(ItineraryError::IndexOutOfRange {
                day,
                index,
                len: activities.len(),
            });
        }
    }
    if source_index != target_index {
        activities.swap(source_index, target_index);
    }
    Ok(())
}

/// Removes the entry at `source_index` from the source day and inserts it
/// at `target_index` in the target day; ownership transfers atomically. The
/// target index is clamped to the target list length, and a missing target
/// day is created the same way Append creates one. An emptied source day is
/// kept in place; only Delete collapses empty days.
pub fn move_across_days(
    days: &mut Vec<ItineraryDay>,
    source_day: u32,
    target_day: u32,
    source_index: usize,
    target_index: usize,
) -> Result<(), ItineraryError> {
    let source_pos =
        day_position(days, source_day).ok_or(ItineraryError::DayNotFound(source_day))?;
    let source_len = days[source_pos].activities.len();
    if source_index >= source_len {
        return Err(ItineraryError::IndexOutOfRange {
            day: source_day,
            index: source_index,
            len: source_len,
        });
    }

    let activity = days[source_pos].activities.remove(source_index);

    match day_position(days, target_day) {
        Some(target_pos) => {
            let activities = &mut days[target_pos].activities;
            let insert_at = target_index.min(activities.len());
            activities.insert(insert_at, activity);
        }
        None => {
            let insert_at = days.iter().take_while(|d| d.day < target_day).count();
            days.insert(
                insert_at,
                ItineraryDay {
                    day: target_day,
                    activities: vec![activity],
                },
            );
        }
    }
    Ok(())
}

/// Removes the entry at `index`; a day whose list becomes empty is removed
/// from the itinerary entirely rather than left as a placeholder.
pub fn delete_activity(
    days: &mut Vec<ItineraryDay>,
    day: u32,
    index: usize,
) -> Result<(), ItineraryError> {
    let pos = day_position(days, day).ok_or(ItineraryError::DayNotFound(day))?;
    let len = days[pos].activities.len();
    if index >= len {
        return Err(ItineraryError::IndexOutOfRange { day, index, len });
    }
    days[pos].activities.remove(index);
    if days[pos].activities.is_empty() {
        days.remove(pos);
    }
    Ok(())
}

/// Drop handler: same-day drops reorder, cross-day drops move. Dropping
/// onto the source position is a no-op.
pub fn apply_drop(
    days: &mut Vec<ItineraryDay>,
    payload: DragPayload,
    target_day: u32,
    target_index: usize,
) -> Result<(), ItineraryError> {
    if payload.source_day == target_day {
        if payload.source_index == target_index {
            return Ok(());
        }
        reorder_within_day(days, target_day, payload.source_index, target_index)
    } else {
        move_across_days(
            days,
            payload.source_day,
            target_day,
            payload.source_index,
            target_index,
        )
    }
}
