//! Normalized event and task records.
//!
//! Records are built by the provider layer (or by [`crate::raw`] from loosely
//! typed rows) and are immutable for the rest of a refresh.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;

/// The calendar or task list a record came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct EventSource {
    pub id: String,
    /// Position the user gave this source; lower sorts first.
    pub order: u32,
}

impl EventSource {
    pub fn new(id: impl Into<String>, order: u32) -> Self {
        Self {
            id: id.into(),
            order,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventStatus {
    #[default]
    Confirmed,
    Tentative,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskStatus {
    #[default]
    NeedsAction,
    InProcess,
    Completed,
    Cancelled,
}

/// A calendar event (or one instance of a recurring event).
///
/// `end` is always strictly after `start`; all-day events start and end at
/// local midnight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    /// Identity shared by all instances of one recurring series.
    pub series_id: Option<String>,
    pub title: String,
    pub source: EventSource,
    pub color: u32,
    pub location: String,
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub all_day: bool,
    pub recurring: bool,
    pub alarm: bool,
    pub status: EventStatus,
}

impl CalendarEvent {
    /// A timed event in the default source.
    pub fn timed(
        id: impl Into<String>,
        title: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            series_id: None,
            title: title.into(),
            source: EventSource::default(),
            color: 0,
            location: String::new(),
            description: String::new(),
            start,
            end: if end > start {
                end
            } else {
                start + Duration::seconds(1)
            },
            all_day: false,
            recurring: false,
            alarm: false,
            status: EventStatus::Confirmed,
        }
    }

    /// An all-day event covering `first..=last` calendar days in the clock's zone.
    pub fn all_day(
        id: impl Into<String>,
        title: impl Into<String>,
        first: NaiveDate,
        last: NaiveDate,
        clock: &Clock,
    ) -> Self {
        let start = clock.midnight(first);
        let end = clock.midnight(last.max(first) + Duration::days(1));
        Self {
            all_day: true,
            ..Self::timed(id, title, start, end)
        }
    }

    pub fn with_source(mut self, source: EventSource) -> Self {
        self.source = source;
        self
    }

    pub fn with_series(mut self, series_id: impl Into<String>) -> Self {
        self.series_id = Some(series_id.into());
        self.recurring = true;
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_status(mut self, status: EventStatus) -> Self {
        self.status = status;
        self
    }

    /// Key grouping instances of one recurring series.
    pub fn series_key(&self) -> &str {
        self.series_id.as_deref().unwrap_or(&self.id)
    }

    /// Day the event starts on.
    pub fn first_day(&self, clock: &Clock) -> NaiveDate {
        clock.entry_day(self.start, self.all_day)
    }

    /// Last day the event touches. The end instant itself is exclusive.
    pub fn last_day(&self, clock: &Clock) -> NaiveDate {
        if self.all_day {
            let day = clock.calendar_day(self.end) - Duration::days(1);
            day.max(self.first_day(clock))
        } else {
            clock
                .day_of(self.end - Duration::seconds(1))
                .max(self.first_day(clock))
        }
    }

    /// `start <= now < end`.
    pub fn is_ongoing(&self, now: DateTime<Utc>) -> bool {
        self.start <= now && now < self.end
    }

    pub fn is_multi_day(&self, clock: &Clock) -> bool {
        self.first_day(clock) != self.last_day(clock)
    }
}

/// A task with optional start and due dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: String,
    pub title: String,
    pub source: EventSource,
    pub color: u32,
    pub location: String,
    pub description: String,
    pub start: Option<DateTime<Utc>>,
    pub due: Option<DateTime<Utc>>,
    pub all_day: bool,
    pub status: TaskStatus,
}

impl TaskRecord {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            source: EventSource::default(),
            color: 0,
            location: String::new(),
            description: String::new(),
            start: None,
            due: None,
            all_day: false,
            status: TaskStatus::NeedsAction,
        }
    }

    pub fn with_start(mut self, start: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self
    }

    pub fn with_due(mut self, due: DateTime<Utc>) -> Self {
        self.due = Some(due);
        self
    }

    pub fn with_source(mut self, source: EventSource) -> Self {
        self.source = source;
        self
    }

    pub fn all_day(mut self) -> Self {
        self.all_day = true;
        self
    }

    pub fn has_dates(&self) -> bool {
        self.start.is_some() || self.due.is_some()
    }
}

/// One provider record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Record {
    Event(CalendarEvent),
    Task(TaskRecord),
}

impl Record {
    pub fn id(&self) -> &str {
        match self {
            Record::Event(event) => &event.id,
            Record::Task(task) => &task.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Record::Event(event) => &event.title,
            Record::Task(task) => &task.title,
        }
    }

    pub fn source(&self) -> &EventSource {
        match self {
            Record::Event(event) => &event.source,
            Record::Task(task) => &task.source,
        }
    }
}

impl From<CalendarEvent> for Record {
    fn from(event: CalendarEvent) -> Self {
        Record::Event(event)
    }
}

impl From<TaskRecord> for Record {
    fn from(task: TaskRecord) -> Self {
        Record::Task(task)
    }
}
