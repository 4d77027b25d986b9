//! Multi-day splitting -- one entry per visible day an event touches.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::classifier::classify_event_segment;
use crate::clock::{Clock, TimeRange};
use crate::entry::Entry;
use crate::record::CalendarEvent;
use crate::settings::Settings;

/// Inclusive range of days the refresh shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleWindow {
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
}

impl VisibleWindow {
    pub fn new(first_day: NaiveDate, last_day: NaiveDate) -> Self {
        Self {
            first_day,
            last_day,
        }
    }

    pub fn from_range(range: &TimeRange, clock: &Clock) -> Self {
        Self::new(clock.day_of(range.start), clock.day_of(range.end))
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.first_day <= day && day <= self.last_day
    }

    /// Every day in the window, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let last_day = self.last_day;
        self.first_day
            .iter_days()
            .take_while(move |day| *day <= last_day)
    }
}

/// Expand `event` into its per-day entries.
///
/// A single-day event yields one entry dated at its start. A multi-day event
/// yields one segment per day in the intersection of its span with `window`,
/// starting at today for an ongoing event. At least one segment is always
/// produced, so an event past the window end still reaches the classifier.
pub fn split_event(
    event: &CalendarEvent,
    window: &VisibleWindow,
    clock: &Clock,
    settings: &Settings,
) -> Vec<Entry> {
    let start_day = event.first_day(clock);
    let end_day = event.last_day(clock);
    if start_day == end_day {
        let position = classify_event_segment(event, event.start, clock, settings);
        return vec![Entry::event_segment(event, position, event.start, true, true, clock)];
    }

    let today = clock.today();
    let first = if event.is_ongoing(clock.now()) && start_day < today {
        today
    } else {
        start_day.max(window.first_day)
    };
    let last = end_day.min(window.last_day).max(first);

    let segment = |day: NaiveDate| {
        let date = segment_date(event, day, start_day, end_day, clock);
        let position = classify_event_segment(event, date, clock, settings);
        Entry::event_segment(event, position, date, day == start_day, day == end_day, clock)
    };

    if !settings.fill_all_day_events && first >= today {
        return vec![segment(first)];
    }
    let segments: Vec<Entry> = first
        .iter_days()
        .take_while(|day| *day <= last)
        .map(segment)
        .collect();
    if settings.fill_all_day_events || segments.len() < 2 {
        return segments;
    }
    closest_segment(segments, event.all_day, clock)
        .into_iter()
        .collect()
}

/// The start segment is dated at the event start and a timed end segment at
/// the event end, kept inside its own day. Other segments open their day.
fn segment_date(
    event: &CalendarEvent,
    day: NaiveDate,
    start_day: NaiveDate,
    end_day: NaiveDate,
    clock: &Clock,
) -> DateTime<Utc> {
    if day == start_day {
        event.start
    } else if event.all_day {
        clock.midnight(day)
    } else if day == end_day {
        let last_instant = clock.start_of_day(day + Duration::days(1)) - Duration::milliseconds(1);
        event.end.min(last_instant)
    } else {
        clock.start_of_day(day)
    }
}

/// The segment whose day is nearest to now; the earliest wins a tie.
fn closest_segment(segments: Vec<Entry>, all_day: bool, clock: &Clock) -> Option<Entry> {
    let now = clock.now();
    let distance = |day: NaiveDate| -> Duration {
        let (start, next) = if all_day {
            (clock.midnight(day), clock.midnight(day + Duration::days(1)))
        } else {
            (clock.start_of_day(day), clock.start_of_day(day + Duration::days(1)))
        };
        if now < start {
            start - now
        } else if now >= next {
            now - next
        } else {
            Duration::zero()
        }
    };
    segments
        .into_iter()
        .fold(None, |best: Option<Entry>, entry| match best {
            Some(b) if distance(b.entry_day) <= distance(entry.entry_day) => Some(b),
            _ => Some(entry),
        })
}
