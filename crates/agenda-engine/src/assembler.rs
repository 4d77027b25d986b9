//! List assembly -- structural entries and the terminal footer.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::entry::{Entry, FooterKind};
use crate::position::EntryPosition;
use crate::settings::Settings;
use crate::sorter::sort_entries;
use crate::splitter::VisibleWindow;

/// Provider-side state that overrides the plain footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProviderStatus {
    #[default]
    Ready,
    NoPermissions,
    NotLoaded,
}

/// Sort record entries and add headers, the current-time marker and exactly
/// one footer. The result is never empty.
///
/// Structural entries already present in `entries` are discarded and rebuilt.
pub fn assemble(
    entries: Vec<Entry>,
    clock: &Clock,
    settings: &Settings,
    status: ProviderStatus,
) -> Vec<Entry> {
    let mut entries: Vec<Entry> = entries.into_iter().filter(Entry::is_record).collect();
    sort_entries(&mut entries);

    let mut structural = Vec::new();
    let today = clock.today();
    if settings.show_current_time
        && entries
            .iter()
            .any(|e| e.position.is_day_bound() && e.entry_day == today)
    {
        structural.push(Entry::current_time(clock));
    }
    if settings.show_day_headers {
        structural.extend(
            header_days(&entries, clock, settings)
                .into_iter()
                .map(|day| Entry::day_header(day, clock)),
        );
    }
    if settings.past_under_one_header
        && entries
            .iter()
            .any(|e| e.position == EntryPosition::PastAndDue)
    {
        structural.push(Entry::past_and_due_header(clock));
    }
    if let Some(first) = entries
        .iter()
        .find(|e| e.position == EntryPosition::EndOfList)
    {
        structural.push(Entry::end_of_list_header(first.entry_date, clock));
    }
    tracing::trace!(count = structural.len(), "structural entries");

    entries.extend(structural);
    sort_entries(&mut entries);

    let footer = match status {
        ProviderStatus::NoPermissions => FooterKind::NoPermissions,
        ProviderStatus::NotLoaded => FooterKind::NotLoaded,
        ProviderStatus::Ready if entries.is_empty() => FooterKind::Empty,
        ProviderStatus::Ready => FooterKind::Last,
    };
    let footer_date = entries.last().map_or_else(|| clock.now(), |e| e.entry_date);
    entries.push(Entry::footer(footer, footer_date, clock));
    entries
}

/// Days that get a header: every day holding a day-bound entry, plus every
/// day of the visible window when empty days are shown.
fn header_days(entries: &[Entry], clock: &Clock, settings: &Settings) -> BTreeSet<NaiveDate> {
    let mut days: BTreeSet<NaiveDate> = entries
        .iter()
        .filter(|e| e.position.is_day_bound())
        .map(|e| e.entry_day)
        .collect();
    if settings.show_days_without_events {
        let window = VisibleWindow::from_range(&clock.time_range(settings), clock);
        days.extend(window.days());
    }
    days
}
