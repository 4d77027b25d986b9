//! Per-instance settings consumed by one refresh.
//!
//! Settings are an explicit value handed to every pipeline call; nothing in the
//! engine reads process-wide state. Keys serialize in camelCase so a settings
//! file reads the same as the provider-facing configuration contract.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{AgendaError, Result};
use crate::position::EntryPosition;

/// Largest accepted magnitude for `day_start_hour`; anything beyond falls back to 0.
pub const MAX_DAY_START_HOUR: i32 = 12;

/// How long ago an event may have ended and still be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EndedCutoff {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "2h")]
    TwoHours,
    #[serde(rename = "4h")]
    FourHours,
    #[serde(rename = "today")]
    Today,
    #[serde(rename = "yesterday")]
    Yesterday,
    #[serde(rename = "1w")]
    OneWeek,
    #[serde(rename = "2w")]
    TwoWeeks,
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "2mo")]
    TwoMonths,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
}

/// A cutoff expressed either relative to "now" or to the start of today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutoffRule {
    HoursBeforeNow(i64),
    DaysBeforeToday(u64),
    MonthsBeforeToday(u32),
}

impl EndedCutoff {
    pub const fn rule(self) -> CutoffRule {
        match self {
            EndedCutoff::None => CutoffRule::HoursBeforeNow(0),
            EndedCutoff::OneHour => CutoffRule::HoursBeforeNow(1),
            EndedCutoff::TwoHours => CutoffRule::HoursBeforeNow(2),
            EndedCutoff::FourHours => CutoffRule::HoursBeforeNow(4),
            EndedCutoff::Today => CutoffRule::DaysBeforeToday(0),
            EndedCutoff::Yesterday => CutoffRule::DaysBeforeToday(1),
            EndedCutoff::OneWeek => CutoffRule::DaysBeforeToday(7),
            EndedCutoff::TwoWeeks => CutoffRule::DaysBeforeToday(14),
            EndedCutoff::OneMonth => CutoffRule::MonthsBeforeToday(1),
            EndedCutoff::TwoMonths => CutoffRule::MonthsBeforeToday(2),
            EndedCutoff::ThreeMonths => CutoffRule::MonthsBeforeToday(3),
            EndedCutoff::SixMonths => CutoffRule::MonthsBeforeToday(6),
            EndedCutoff::OneYear => CutoffRule::MonthsBeforeToday(12),
        }
    }
}

/// Where all-day items sit within their day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AllDayPlacement {
    #[default]
    Top,
    Bottom,
}

impl AllDayPlacement {
    pub const fn position(self) -> EntryPosition {
        match self {
            AllDayPlacement::Top => EntryPosition::StartOfDay,
            AllDayPlacement::Bottom => EntryPosition::EndOfDay,
        }
    }
}

/// Which task date drives placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskScheduling {
    #[default]
    ByDue,
    ByStart,
}

/// Where tasks with neither a start nor a due date go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TasksWithoutDates {
    Hide,
    #[default]
    EndOfList,
    EndOfToday,
}

impl TasksWithoutDates {
    pub const fn position(self) -> EntryPosition {
        match self {
            TasksWithoutDates::Hide => EntryPosition::Hidden,
            TasksWithoutDates::EndOfList => EntryPosition::EndOfList,
            TasksWithoutDates::EndOfToday => EntryPosition::EndOfToday,
        }
    }
}

/// When keyword filters apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterMode {
    Off,
    #[default]
    Normal,
    /// Only while the clock is frozen, to replay captured data.
    DebugOnly,
}

/// Source of "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClockMode {
    /// Wall-clock time.
    #[default]
    Live,
    /// A fixed instant.
    FrozenAt(DateTime<Utc>),
    /// A snapshot instant that advances with elapsed wall-clock time.
    TickingFrom(DateTime<Utc>),
}

impl ClockMode {
    pub const fn is_snapshot(self) -> bool {
        !matches!(self, ClockMode::Live)
    }
}

/// Settings for one agenda instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Days ahead to show. 0 is today only; negative `-N` is today plus N days.
    pub event_range_days: i32,
    pub ended_cutoff: EndedCutoff,
    pub all_day_placement: AllDayPlacement,
    pub task_scheduling: TaskScheduling,
    pub tasks_without_dates: TasksWithoutDates,
    pub hide_keywords: String,
    pub show_keywords: String,
    /// Match keywords against descriptions as well as titles.
    pub keywords_match_description: bool,
    pub closest_recurring_only: bool,
    pub hide_duplicates: bool,
    pub past_under_one_header: bool,
    pub day_start_hour: i32,
    pub filter_mode: FilterMode,
    pub clock_mode: ClockMode,
    /// IANA zone id; UTC when absent.
    pub time_zone: Option<String>,
    pub show_day_headers: bool,
    pub show_days_without_events: bool,
    pub show_current_time: bool,
    pub fill_all_day_events: bool,
    pub show_location: bool,
    pub show_description: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            event_range_days: 30,
            ended_cutoff: EndedCutoff::default(),
            all_day_placement: AllDayPlacement::default(),
            task_scheduling: TaskScheduling::default(),
            tasks_without_dates: TasksWithoutDates::default(),
            hide_keywords: String::new(),
            show_keywords: String::new(),
            keywords_match_description: false,
            closest_recurring_only: false,
            hide_duplicates: false,
            past_under_one_header: false,
            day_start_hour: 0,
            filter_mode: FilterMode::default(),
            clock_mode: ClockMode::default(),
            time_zone: None,
            show_day_headers: true,
            show_days_without_events: false,
            show_current_time: false,
            fill_all_day_events: true,
            show_location: false,
            show_description: false,
        }
    }
}

impl Settings {
    /// Parse settings from a JSON object; missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| AgendaError::InvalidSettings(e.to_string()))
    }

    /// Settings with a frozen clock, the usual starting point for previews and tests.
    pub fn frozen_at(now: DateTime<Utc>) -> Self {
        Self {
            clock_mode: ClockMode::FrozenAt(now),
            ..Self::default()
        }
    }

    /// The configured zone, UTC when none is set.
    pub fn zone(&self) -> Result<Tz> {
        match self.time_zone.as_deref() {
            None | Some("") => Ok(Tz::UTC),
            Some(id) => id
                .parse()
                .map_err(|_| AgendaError::InvalidTimezone(id.to_string())),
        }
    }

    /// `day_start_hour`, or 0 when it is out of range.
    pub fn effective_day_start_hour(&self) -> i32 {
        if self.day_start_hour.abs() > MAX_DAY_START_HOUR {
            0
        } else {
            self.day_start_hour
        }
    }

    /// Whether keyword filters run for this refresh.
    pub fn keyword_filters_active(&self) -> bool {
        match self.filter_mode {
            FilterMode::Off => false,
            FilterMode::Normal => true,
            FilterMode::DebugOnly => self.clock_mode.is_snapshot(),
        }
    }
}
