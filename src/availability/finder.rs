//! Ranking of candidate meeting slots against members' busy time
use chrono::{DateTime, Duration, Utc};

use super::models::{AvailabilityQuery, BusyInterval, CandidateSlot, MAX_SLOTS, SLOT_STEP_MINUTES};

/// Half-open overlap test. Intervals that only touch at an endpoint
/// do not overlap.
pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && a_end > b_start
}

fn is_free(busy: &[BusyInterval], start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    !busy.iter().any(|b| overlaps(start, end, b.start, b.end))
}

/// Candidate slots in the query window, in start order, before
/// ranking. Slots are produced lazily so long windows don't allocate
/// every candidate up front.
pub fn candidate_slots<'a>(
    query: &'a AvailabilityQuery,
    busy_by_member: &'a [Vec<BusyInterval>],
) -> impl Iterator<Item = CandidateSlot> + 'a {
    let duration = query.duration();
    let step = Duration::minutes(SLOT_STEP_MINUTES);
    let total_connected = busy_by_member.len();

    std::iter::successors(Some(query.time_min), move |start| Some(*start + step))
        .take_while(move |start| *start + duration <= query.time_max)
        .filter(move |start| {
            query
                .window
                .as_ref()
                .is_none_or(|window| window.contains(*start, duration))
        })
        .map(move |start| {
            let end = start + duration;
            let free_count = busy_by_member
                .iter()
                .filter(|busy| is_free(busy, start, end))
                .count();
            CandidateSlot {
                start,
                end,
                free_count,
                total_connected,
            }
        })
}

/// Every candidate slot in the query window, in start order.
pub fn enumerate_slots(
    query: &AvailabilityQuery,
    busy_by_member: &[Vec<BusyInterval>],
) -> Vec<CandidateSlot> {
    candidate_slots(query, busy_by_member).collect()
}

/// Rank candidate slots by how many members are free, most first.
/// `busy_by_member` has one entry per connected member. Ties keep the
/// earlier slot first and at most 20 slots are returned.
pub fn find_slots(
    query: &AvailabilityQuery,
    busy_by_member: &[Vec<BusyInterval>],
) -> Vec<CandidateSlot> {
    let mut top: Vec<CandidateSlot> = Vec::with_capacity(MAX_SLOTS + 1);
    for slot in candidate_slots(query, busy_by_member) {
        if top.len() == MAX_SLOTS
            && top
                .last()
                .is_some_and(|last| last.free_count >= slot.free_count)
        {
            continue;
        }
        // Insert after every slot with an equal or higher count so
        // ties stay in time order
        let idx = top.partition_point(|s| s.free_count >= slot.free_count);
        top.insert(idx, slot);
        top.truncate(MAX_SLOTS);
    }
    top
}
