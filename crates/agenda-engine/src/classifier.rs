//! Position classification -- maps a record to its [`EntryPosition`].
//!
//! Classification only reads the record, the clock and the settings. Structural
//! entries (headers, current time, footer) never pass through here; the list
//! assembler places them directly.

use chrono::{DateTime, Utc};

use crate::clock::Clock;
use crate::position::EntryPosition;
use crate::record::{CalendarEvent, Record, TaskRecord};
use crate::settings::{Settings, TaskScheduling};

/// Classify a whole record. Events are classified by their start.
pub fn classify(record: &Record, clock: &Clock, settings: &Settings) -> EntryPosition {
    match record {
        Record::Event(event) => classify_event_segment(event, event.start, clock, settings),
        Record::Task(task) => classify_task(task, clock, settings),
    }
}

/// Classify one per-day segment of an event dated `segment_date`.
pub fn classify_event_segment(
    event: &CalendarEvent,
    segment_date: DateTime<Utc>,
    clock: &Clock,
    settings: &Settings,
) -> EntryPosition {
    position_for_dates(
        event.all_day,
        Some(segment_date),
        Some(event.end),
        clock,
        settings,
    )
}

/// Classify a task, applying the single-date pre-emption rules first.
pub fn classify_task(task: &TaskRecord, clock: &Clock, settings: &Settings) -> EntryPosition {
    if !task.has_dates() {
        return settings.tasks_without_dates.position();
    }
    let range_end = clock.end_of_time_range(settings.event_range_days);
    let (main, other) = task_dates(task, settings.task_scheduling);
    if main.is_some_and(|d| d > range_end) {
        return EntryPosition::EndOfList;
    }
    let is_past = |t: DateTime<Utc>| clock.is_before_today_for(t, task.all_day);
    match settings.task_scheduling {
        TaskScheduling::ByDue => {
            if let (None, Some(start)) = (task.due, task.start) {
                if is_past(start) {
                    return EntryPosition::StartOfToday;
                }
                if start > range_end {
                    return EntryPosition::EndOfList;
                }
            }
        }
        TaskScheduling::ByStart => {
            let start_missing_or_past = task.start.is_none_or(is_past);
            if start_missing_or_past && task.due.is_some_and(|d| !is_past(d)) {
                return EntryPosition::StartOfToday;
            }
        }
    }
    // An overdue task known by a single date surfaces today unless past items
    // are collected under their own header.
    let single = main.xor(other);
    if !settings.past_under_one_header && single.is_some_and(is_past) {
        return EntryPosition::StartOfToday;
    }
    position_for_dates(task.all_day, main, other, clock, settings)
}

/// The date a task entry is displayed and ordered by.
///
/// Start-scheduled tasks whose start has already passed move to their due
/// date, if any.
pub fn task_entry_date(
    task: &TaskRecord,
    clock: &Clock,
    settings: &Settings,
) -> Option<DateTime<Utc>> {
    match settings.task_scheduling {
        TaskScheduling::ByDue => task.due.or(task.start),
        TaskScheduling::ByStart => match task.start {
            Some(start) if clock.is_before_today_for(start, task.all_day) => task.due,
            Some(start) => Some(start),
            None => task.due,
        },
    }
}

fn task_dates(
    task: &TaskRecord,
    scheduling: TaskScheduling,
) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    match scheduling {
        TaskScheduling::ByDue => (task.due, task.start),
        TaskScheduling::ByStart => (task.start, task.due),
    }
}

/// The shared decision policy for any dated item.
fn position_for_dates(
    all_day: bool,
    main: Option<DateTime<Utc>>,
    other: Option<DateTime<Utc>>,
    clock: &Clock,
    settings: &Settings,
) -> EntryPosition {
    let Some(reference) = main.or(other) else {
        return settings.tasks_without_dates.position();
    };
    if settings.past_under_one_header && clock.entry_day(reference, all_day) < clock.today() {
        return EntryPosition::PastAndDue;
    }
    if reference > clock.end_of_time_range(settings.event_range_days) {
        return EntryPosition::EndOfList;
    }
    if all_day {
        settings.all_day_placement.position()
    } else {
        EntryPosition::EntryDate
    }
}
