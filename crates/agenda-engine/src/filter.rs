//! The filter pipeline run between splitting and sorting.
//!
//! Stages run in a fixed order: keyword filters, hidden-position removal,
//! the event-range cutoff, duplicate suppression and closest-instance
//! selection. Each stage is a plain function over an entry vector so callers
//! can run them individually.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc};

use crate::clock::{Clock, TimeRange};
use crate::entry::Entry;
use crate::keywords::KeywordsFilter;
use crate::position::EntryPosition;
use crate::settings::Settings;
use crate::sorter::sort_entries;

/// Run every enabled stage over `entries`.
pub fn apply(entries: Vec<Entry>, clock: &Clock, settings: &Settings) -> Vec<Entry> {
    let before = entries.len();
    let mut entries = entries;
    if settings.keyword_filters_active() {
        entries = keyword_filter(entries, settings);
    }
    entries = drop_hidden(entries);
    entries = range_cutoff(entries, &clock.time_range(settings));
    if settings.hide_duplicates {
        entries = dedupe(entries, clock, settings);
    }
    if settings.closest_recurring_only {
        entries = closest_instances(entries, clock);
    }
    tracing::debug!(before, after = entries.len(), "filtered entries");
    entries
}

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

/// Keep record entries matching the show list and not matching the hide list.
///
/// The hide list wins when both match. Structural entries pass untouched.
pub fn keyword_filter(entries: Vec<Entry>, settings: &Settings) -> Vec<Entry> {
    let show = KeywordsFilter::parse(&settings.show_keywords, true);
    let hide = KeywordsFilter::parse(&settings.hide_keywords, false);
    if show.is_empty() && hide.is_empty() {
        return entries;
    }
    entries
        .into_iter()
        .filter(|entry| {
            if !entry.is_record() {
                return true;
            }
            let texts = || {
                std::iter::once(entry.title())
                    .chain(settings.keywords_match_description.then(|| entry.description()))
            };
            show.matches(texts()) && !hide.matches(texts())
        })
        .collect()
}

pub fn drop_hidden(entries: Vec<Entry>) -> Vec<Entry> {
    entries
        .into_iter()
        .filter(|entry| entry.position != EntryPosition::Hidden)
        .collect()
}

/// Drop events that ended before the range start or start after its end.
///
/// Tasks are never cut: overdue and far-future tasks keep their
/// start-of-today and end-of-list slots.
pub fn range_cutoff(entries: Vec<Entry>, range: &TimeRange) -> Vec<Entry> {
    entries
        .into_iter()
        .filter(|entry| match entry.event() {
            Some(event) => event.end >= range.start && event.start <= range.end,
            None => true,
        })
        .collect()
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct DuplicateKey {
    position: EntryPosition,
    entry_date: DateTime<Utc>,
    end_day: Option<NaiveDate>,
    title: String,
    location: Option<String>,
    description: Option<String>,
}

impl DuplicateKey {
    fn of(entry: &Entry, clock: &Clock, settings: &Settings) -> Self {
        Self {
            position: entry.position,
            entry_date: entry.entry_date,
            end_day: entry.end_date().map(|end| clock.calendar_day(end)),
            title: entry.title().to_string(),
            location: settings
                .show_location
                .then(|| entry.location().to_string()),
            description: settings
                .show_description
                .then(|| entry.description().to_string()),
        }
    }
}

/// Drop record entries that duplicate one sorting before them, so the copy
/// from the lowest source order survives. The result is in agenda order.
pub fn dedupe(entries: Vec<Entry>, clock: &Clock, settings: &Settings) -> Vec<Entry> {
    let mut entries = entries;
    sort_entries(&mut entries);
    let mut seen = HashSet::new();
    let before = entries.len();
    let kept: Vec<Entry> = entries
        .into_iter()
        .filter(|entry| !entry.is_record() || seen.insert(DuplicateKey::of(entry, clock, settings)))
        .collect();
    tracing::trace!(dropped = before - kept.len(), "duplicates removed");
    kept
}

/// Keep, per recurring series, only the instance closest to today.
///
/// Distance is counted in days from today; at equal distance today-or-later
/// beats earlier, then the earlier entry date and the smaller record id win.
/// All segments of the winning instance are kept.
pub fn closest_instances(entries: Vec<Entry>, clock: &Clock) -> Vec<Entry> {
    let today = clock.today();
    let mut best: HashMap<String, (i64, bool, DateTime<Utc>, String)> = HashMap::new();
    for entry in &entries {
        let Some(event) = entry.event().filter(|e| e.recurring) else {
            continue;
        };
        let delta = clock.days_from_today(entry.entry_day);
        let candidate = (delta.abs(), entry.entry_day < today, entry.entry_date, event.id.clone());
        best.entry(event.series_key().to_string())
            .and_modify(|current| {
                if candidate < *current {
                    *current = candidate.clone();
                }
            })
            .or_insert_with(|| candidate.clone());
    }
    entries
        .into_iter()
        .filter(|entry| match entry.event().filter(|e| e.recurring) {
            Some(event) => best
                .get(event.series_key())
                .is_some_and(|winner| winner.3 == event.id),
            None => true,
        })
        .collect()
}
