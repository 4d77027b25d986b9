//! Total ordering of entries.
//!
//! Entries compare by, in order: position global order, entry day, position
//! same-day order, entry date, source order, title. Comparing the entry day
//! before the same-day order is equivalent to using the same-day order only
//! for entries on one day. Kind, record id and segment flags break the
//! remaining ties so that only true duplicates compare equal.
//!
//! Positions sharing a same-day rank interleave by entry date alone.

use std::cmp::Ordering;

use crate::entry::{Entry, EntryKind};

impl Entry {
    fn segment_rank(&self) -> (bool, bool) {
        match &self.kind {
            EntryKind::Event(e) => (!e.is_start_segment, !e.is_end_segment),
            _ => (false, false),
        }
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.position
            .global_order()
            .cmp(&other.position.global_order())
            .then_with(|| self.entry_day.cmp(&other.entry_day))
            .then_with(|| {
                self.position
                    .same_day_order()
                    .cmp(&other.position.same_day_order())
            })
            .then_with(|| self.entry_date.cmp(&other.entry_date))
            .then_with(|| self.source_order().cmp(&other.source_order()))
            .then_with(|| self.title().cmp(other.title()))
            .then_with(|| self.kind.rank().cmp(&other.kind.rank()))
            .then_with(|| self.record_id().cmp(&other.record_id()))
            .then_with(|| self.segment_rank().cmp(&other.segment_rank()))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

/// Sort entries in place into agenda order.
pub fn sort_entries(entries: &mut [Entry]) {
    entries.sort();
}
