//! Display-ready agenda entries.
//!
//! An [`Entry`] is one row of the output list. Record-backed entries wrap the
//! event or task they came from; structural entries (day headers, the
//! current-time marker, the footer) carry no record. Every entry resolves its
//! entry date and entry day once, at construction, through the [`Clock`].

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::{datetime_max, datetime_min, Clock};
use crate::error::{AgendaError, Result};
use crate::position::{EntryPosition, Sentinel};
use crate::record::{CalendarEvent, TaskRecord};

/// Coarse "when" of an entry relative to now, for the renderer's colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimeSection {
    Past,
    Ongoing,
    Today,
    Future,
}

/// One end of a segment's displayed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Boundary {
    At(DateTime<Utc>),
    /// The event continues past this day; drawn as an arrow.
    Continues,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TimeDisplay {
    Hidden,
    Span { start: Boundary, end: Boundary },
}

impl TimeDisplay {
    fn for_segment(event: &CalendarEvent, is_start: bool, is_end: bool) -> Self {
        if event.all_day || (!is_start && !is_end) {
            return TimeDisplay::Hidden;
        }
        TimeDisplay::Span {
            start: if is_start {
                Boundary::At(event.start)
            } else {
                Boundary::Continues
            },
            end: if is_end {
                Boundary::At(event.end)
            } else {
                Boundary::Continues
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventEntry {
    pub event: CalendarEvent,
    pub is_start_segment: bool,
    pub is_end_segment: bool,
    pub is_multi_day: bool,
    pub time_display: TimeDisplay,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskEntry {
    pub task: TaskRecord,
}

/// Terminal entry variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FooterKind {
    /// Nothing to show.
    Empty,
    /// Plain end-of-list marker after at least one entry.
    Last,
    NoPermissions,
    NotLoaded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EntryKind {
    Event(EventEntry),
    Task(TaskEntry),
    /// Header for a day, the past-and-due block or the end-of-list block,
    /// distinguished by the entry position.
    DayHeader,
    CurrentTime,
    Footer { footer: FooterKind },
}

impl EntryKind {
    /// Tie-break rank between kinds that agree on every other sort key.
    pub(crate) fn rank(&self) -> u8 {
        match self {
            EntryKind::DayHeader => 0,
            EntryKind::CurrentTime => 1,
            EntryKind::Event(_) => 2,
            EntryKind::Task(_) => 3,
            EntryKind::Footer { .. } => 4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub position: EntryPosition,
    pub entry_date: DateTime<Utc>,
    pub entry_day: NaiveDate,
    pub time_section: TimeSection,
    #[serde(flatten)]
    pub kind: EntryKind,
}

pub fn sentinel_date(sentinel: Sentinel) -> DateTime<Utc> {
    match sentinel {
        Sentinel::Min => datetime_min(),
        Sentinel::Max => datetime_max(),
    }
}

/// Resolve the stored entry date for `position`.
///
/// Positions that require a date snap it to their day boundary; positions
/// that do not fall back to their sentinel.
///
/// # Errors
/// Returns `AgendaError::MissingEntryDate` when a required date is absent.
pub fn resolve_entry_date(
    position: EntryPosition,
    date: Option<DateTime<Utc>>,
    all_day: bool,
    clock: &Clock,
) -> Result<DateTime<Utc>> {
    let required = || date.ok_or(AgendaError::MissingEntryDate { position });
    let start_of = |t: DateTime<Utc>, offset: i64| {
        let day = clock.entry_day(t, all_day) + Duration::days(offset);
        if all_day {
            clock.midnight(day)
        } else {
            clock.start_of_day(day)
        }
    };
    match position {
        EntryPosition::EntryDate => required(),
        EntryPosition::DayHeader | EntryPosition::StartOfDay => Ok(start_of(required()?, 0)),
        EntryPosition::EndOfDay => Ok(start_of(required()?, 1) - Duration::milliseconds(1)),
        _ => Ok(date.unwrap_or_else(|| sentinel_date(position.sentinel()))),
    }
}

fn entry_date_or_sentinel(
    position: EntryPosition,
    date: Option<DateTime<Utc>>,
    all_day: bool,
    clock: &Clock,
) -> DateTime<Utc> {
    match resolve_entry_date(position, date, all_day, clock) {
        Ok(resolved) => resolved,
        Err(err) => {
            tracing::error!(%position, error = %err, "entry date contract violated");
            if cfg!(debug_assertions) {
                panic!("{err}");
            }
            sentinel_date(position.sentinel())
        }
    }
}

fn time_section(
    position: EntryPosition,
    entry_day: NaiveDate,
    ongoing: bool,
    end: Option<DateTime<Utc>>,
    clock: &Clock,
) -> TimeSection {
    match position {
        EntryPosition::PastAndDueHeader => return TimeSection::Past,
        EntryPosition::StartOfToday => return TimeSection::Today,
        EntryPosition::EndOfToday
        | EntryPosition::EndOfListHeader
        | EntryPosition::EndOfList
        | EntryPosition::ListFooter => return TimeSection::Future,
        _ => {}
    }
    let today = clock.today();
    let ends_today = end.is_some_and(|e| clock.is_today(e));
    if entry_day == today {
        if position == EntryPosition::DayHeader {
            TimeSection::Today
        } else if ongoing {
            TimeSection::Ongoing
        } else if ends_today && end.is_some_and(|e| e < clock.now()) {
            TimeSection::Past
        } else {
            TimeSection::Today
        }
    } else if entry_day < today {
        TimeSection::Past
    } else if ends_today {
        TimeSection::Today
    } else {
        TimeSection::Future
    }
}

impl Entry {
    fn build(
        position: EntryPosition,
        date: Option<DateTime<Utc>>,
        all_day: bool,
        ongoing: bool,
        end: Option<DateTime<Utc>>,
        kind: EntryKind,
        clock: &Clock,
    ) -> Self {
        let entry_date = entry_date_or_sentinel(position, date, all_day, clock);
        let entry_day = match position {
            EntryPosition::StartOfToday | EntryPosition::EndOfToday => clock.today(),
            _ => clock.entry_day(date.unwrap_or(entry_date), all_day),
        };
        Self {
            position,
            entry_date,
            entry_day,
            time_section: time_section(position, entry_day, ongoing, end, clock),
            kind,
        }
    }

    /// One (possibly the only) per-day segment of an event.
    pub fn event_segment(
        event: &CalendarEvent,
        position: EntryPosition,
        date: DateTime<Utc>,
        is_start_segment: bool,
        is_end_segment: bool,
        clock: &Clock,
    ) -> Self {
        let kind = EntryKind::Event(EventEntry {
            is_start_segment,
            is_end_segment,
            is_multi_day: !(is_start_segment && is_end_segment),
            time_display: TimeDisplay::for_segment(event, is_start_segment, is_end_segment),
            event: event.clone(),
        });
        Self::build(
            position,
            Some(date),
            event.all_day,
            event.is_ongoing(clock.now()),
            Some(event.end),
            kind,
            clock,
        )
    }

    pub fn task(
        task: &TaskRecord,
        position: EntryPosition,
        date: Option<DateTime<Utc>>,
        clock: &Clock,
    ) -> Self {
        Self::build(
            position,
            date,
            task.all_day,
            false,
            task.due,
            EntryKind::Task(TaskEntry { task: task.clone() }),
            clock,
        )
    }

    pub fn day_header(day: NaiveDate, clock: &Clock) -> Self {
        Self::build(
            EntryPosition::DayHeader,
            Some(clock.start_of_day(day)),
            false,
            false,
            None,
            EntryKind::DayHeader,
            clock,
        )
    }

    pub fn past_and_due_header(clock: &Clock) -> Self {
        Self::build(
            EntryPosition::PastAndDueHeader,
            None,
            false,
            false,
            None,
            EntryKind::DayHeader,
            clock,
        )
    }

    pub fn end_of_list_header(date: DateTime<Utc>, clock: &Clock) -> Self {
        Self::build(
            EntryPosition::EndOfListHeader,
            Some(date),
            false,
            false,
            None,
            EntryKind::DayHeader,
            clock,
        )
    }

    pub fn current_time(clock: &Clock) -> Self {
        let now = clock.now();
        Self::build(
            EntryPosition::EntryDate,
            Some(now),
            false,
            true,
            Some(now + Duration::seconds(1)),
            EntryKind::CurrentTime,
            clock,
        )
    }

    pub fn footer(footer: FooterKind, date: DateTime<Utc>, clock: &Clock) -> Self {
        Self::build(
            EntryPosition::ListFooter,
            Some(date),
            false,
            false,
            None,
            EntryKind::Footer { footer },
            clock,
        )
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn event(&self) -> Option<&CalendarEvent> {
        match &self.kind {
            EntryKind::Event(e) => Some(&e.event),
            _ => None,
        }
    }

    pub fn event_entry(&self) -> Option<&EventEntry> {
        match &self.kind {
            EntryKind::Event(e) => Some(e),
            _ => None,
        }
    }

    pub fn task_record(&self) -> Option<&TaskRecord> {
        match &self.kind {
            EntryKind::Task(t) => Some(&t.task),
            _ => None,
        }
    }

    pub fn footer_kind(&self) -> Option<FooterKind> {
        match self.kind {
            EntryKind::Footer { footer } => Some(footer),
            _ => None,
        }
    }

    pub fn is_footer(&self) -> bool {
        self.footer_kind().is_some()
    }

    /// Whether this entry came from a provider record.
    pub fn is_record(&self) -> bool {
        matches!(self.kind, EntryKind::Event(_) | EntryKind::Task(_))
    }

    pub fn record_id(&self) -> Option<&str> {
        match &self.kind {
            EntryKind::Event(e) => Some(&e.event.id),
            EntryKind::Task(t) => Some(&t.task.id),
            _ => None,
        }
    }

    pub fn title(&self) -> &str {
        match &self.kind {
            EntryKind::Event(e) => &e.event.title,
            EntryKind::Task(t) => &t.task.title,
            _ => "",
        }
    }

    pub fn location(&self) -> &str {
        match &self.kind {
            EntryKind::Event(e) => &e.event.location,
            EntryKind::Task(t) => &t.task.location,
            _ => "",
        }
    }

    pub fn description(&self) -> &str {
        match &self.kind {
            EntryKind::Event(e) => &e.event.description,
            EntryKind::Task(t) => &t.task.description,
            _ => "",
        }
    }

    /// Source precedence; structural entries have none and sort first.
    pub fn source_order(&self) -> Option<u32> {
        match &self.kind {
            EntryKind::Event(e) => Some(e.event.source.order),
            EntryKind::Task(t) => Some(t.task.source.order),
            _ => None,
        }
    }

    /// End of the underlying item: event end, task due.
    pub fn end_date(&self) -> Option<DateTime<Utc>> {
        match &self.kind {
            EntryKind::Event(e) => Some(e.event.end),
            EntryKind::Task(t) => t.task.due,
            _ => None,
        }
    }
}
