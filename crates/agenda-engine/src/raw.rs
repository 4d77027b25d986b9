//! Normalization of loosely typed provider rows into [`Record`]s.
//!
//! Timestamps arrive as strings in one of three shapes:
//!
//! - RFC 3339 with an offset (`2026-10-18T10:00:00+02:00`)
//! - naive local time (`2026-10-18T10:00:00`), read in the clock's zone
//! - a plain date (`2026-10-18`), read as local midnight
//!
//! Anything else is treated as absent. All-day timestamps keep only their
//! written calendar date.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::error::{AgendaError, Result};
use crate::record::{CalendarEvent, EventSource, EventStatus, Record, TaskRecord, TaskStatus};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RawKind {
    #[default]
    Event,
    Task,
}

/// One provider row as it arrives over JSON.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawRecord {
    pub kind: RawKind,
    pub id: String,
    pub series_id: Option<String>,
    pub title: String,
    pub start: Option<String>,
    /// Event end; for tasks, a fallback for `due`.
    pub end: Option<String>,
    pub due: Option<String>,
    pub all_day: bool,
    pub recurring: bool,
    pub alarm: bool,
    pub status: Option<String>,
    pub color: u32,
    pub location: String,
    pub description: String,
    pub source_id: String,
    pub source_order: u32,
}

/// Parse a provider timestamp; `None` for anything unparseable.
pub fn parse_timestamp(value: &str, all_day: bool, clock: &Clock) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(if all_day {
            clock.midnight(dt.date_naive())
        } else {
            dt.with_timezone(&Utc)
        });
    }
    if let Some(naive) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
    {
        return Some(if all_day {
            clock.midnight(naive.date())
        } else {
            clock.local_to_utc(naive)
        });
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|date| clock.midnight(date))
}

impl RawRecord {
    fn timestamp(&self, value: Option<&String>, clock: &Clock) -> Option<DateTime<Utc>> {
        let value = value?;
        let parsed = parse_timestamp(value, self.all_day, clock);
        if parsed.is_none() {
            tracing::debug!(id = %self.id, value = %value, "unparseable timestamp treated as absent");
        }
        parsed
    }

    fn source(&self) -> EventSource {
        EventSource::new(self.source_id.clone(), self.source_order)
    }

    /// Convert into a normalized record.
    ///
    /// # Errors
    /// Returns `AgendaError::InvalidRecord` for an event without a usable start.
    pub fn into_record(&self, clock: &Clock) -> Result<Record> {
        match self.kind {
            RawKind::Event => self.to_event(clock).map(Record::Event),
            RawKind::Task => Ok(Record::Task(self.to_task(clock))),
        }
    }

    fn to_event(&self, clock: &Clock) -> Result<CalendarEvent> {
        let start = self
            .timestamp(self.start.as_ref(), clock)
            .ok_or_else(|| AgendaError::InvalidRecord {
                id: self.id.clone(),
                reason: "event has no usable start".to_string(),
            })?;
        let end = self
            .timestamp(self.end.as_ref(), clock)
            .filter(|end| *end > start)
            .unwrap_or_else(|| {
                if self.all_day {
                    clock.midnight(clock.calendar_day(start) + Duration::days(1))
                } else {
                    start + Duration::seconds(1)
                }
            });
        let status = match self.status.as_deref().map(str::to_ascii_lowercase).as_deref() {
            Some("tentative") => EventStatus::Tentative,
            Some("cancelled" | "canceled") => EventStatus::Cancelled,
            _ => EventStatus::Confirmed,
        };
        Ok(CalendarEvent {
            id: self.id.clone(),
            series_id: self.series_id.clone(),
            title: self.title.clone(),
            source: self.source(),
            color: self.color,
            location: self.location.clone(),
            description: self.description.clone(),
            start,
            end,
            all_day: self.all_day,
            recurring: self.recurring || self.series_id.is_some(),
            alarm: self.alarm,
            status,
        })
    }

    fn to_task(&self, clock: &Clock) -> TaskRecord {
        let status = match self.status.as_deref().map(str::to_ascii_lowercase).as_deref() {
            Some("completed") => TaskStatus::Completed,
            Some("inprocess" | "in_process" | "in-process") => TaskStatus::InProcess,
            Some("cancelled" | "canceled") => TaskStatus::Cancelled,
            _ => TaskStatus::NeedsAction,
        };
        TaskRecord {
            id: self.id.clone(),
            title: self.title.clone(),
            source: self.source(),
            color: self.color,
            location: self.location.clone(),
            description: self.description.clone(),
            start: self.timestamp(self.start.as_ref(), clock),
            due: self
                .timestamp(self.due.as_ref(), clock)
                .or_else(|| self.timestamp(self.end.as_ref(), clock)),
            all_day: self.all_day,
            status,
        }
    }
}

/// Convert every row, logging and skipping the ones that cannot be used.
pub fn normalize(rows: &[RawRecord], clock: &Clock) -> Vec<Record> {
    rows.iter()
        .filter_map(|row| match row.into_record(clock) {
            Ok(record) => Some(record),
            Err(err) => {
                tracing::warn!(id = %row.id, error = %err, "skipping invalid record");
                None
            }
        })
        .collect()
}
