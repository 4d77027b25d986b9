//! The refresh clock -- "now", "today" and day boundaries.
//!
//! Every day comparison in the engine goes through [`Clock`] so the configured
//! start-of-day hour is honoured uniformly. With a start hour `H`, the day `d`
//! begins at local `d 00:00 + H hours`: a positive `H` keeps early-morning
//! instants on the previous day, a negative `H` opens the next day `|H|` hours
//! before midnight.
//!
//! All-day dates are calendar dates and are bucketed with
//! [`Clock::calendar_day`], never shifted by the start hour.

use chrono::{
    DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
};
use chrono_tz::Tz;

use crate::error::Result;
use crate::settings::{ClockMode, CutoffRule, EndedCutoff, Settings};

/// Earlier than any real date: 1970-01-01T00:00:00Z.
pub fn datetime_min() -> DateTime<Utc> {
    DateTime::<Utc>::default()
}

/// Later than any real date: 5000-01-01T00:00:00Z.
pub fn datetime_max() -> DateTime<Utc> {
    DateTime::from_timestamp(95_617_584_000, 0).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Whether `t` is a real date rather than one of the sentinels.
pub fn is_date_defined(t: DateTime<Utc>) -> bool {
    t > datetime_min() && t < datetime_max()
}

/// Closed interval `[start, end]` of instants a refresh covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.start <= t && t <= self.end
    }
}

#[derive(Debug, Clone)]
pub struct Clock {
    zone: Tz,
    start_hour: i32,
    mode: ClockMode,
    created_at: DateTime<Utc>,
}

impl Clock {
    /// Build the clock for one refresh.
    ///
    /// # Errors
    /// Returns `AgendaError::InvalidTimezone` if `settings.time_zone` is not an IANA id.
    pub fn new(settings: &Settings) -> Result<Self> {
        Ok(Self {
            zone: settings.zone()?,
            start_hour: settings.effective_day_start_hour(),
            mode: settings.clock_mode,
            created_at: Utc::now(),
        })
    }

    /// A clock frozen at `now` in `zone`.
    pub fn frozen(now: DateTime<Utc>, zone: Tz, start_hour: i32) -> Self {
        Self {
            zone,
            start_hour,
            mode: ClockMode::FrozenAt(now),
            created_at: now,
        }
    }

    pub fn zone(&self) -> Tz {
        self.zone
    }

    pub fn start_hour(&self) -> i32 {
        self.start_hour
    }

    pub fn mode(&self) -> ClockMode {
        self.mode
    }

    pub fn is_snapshot(&self) -> bool {
        self.mode.is_snapshot()
    }

    /// The current instant according to the clock mode.
    pub fn now(&self) -> DateTime<Utc> {
        match self.mode {
            ClockMode::Live => Utc::now(),
            ClockMode::FrozenAt(at) => at,
            ClockMode::TickingFrom(at) => {
                let elapsed = Utc::now() - self.created_at;
                at + elapsed.max(Duration::zero())
            }
        }
    }

    /// "Now" expressed in another zone.
    pub fn now_in(&self, zone: Tz) -> DateTime<Tz> {
        self.now().with_timezone(&zone)
    }

    pub fn today(&self) -> NaiveDate {
        self.day_of(self.now())
    }

    // -----------------------------------------------------------------------
    // Day bucketing
    // -----------------------------------------------------------------------

    /// The day `t` belongs to, honouring the start-of-day hour.
    pub fn day_of(&self, t: DateTime<Utc>) -> NaiveDate {
        if !is_date_defined(t) {
            return t.date_naive();
        }
        let local = t.with_timezone(&self.zone).naive_local();
        (local - Duration::hours(i64::from(self.start_hour))).date()
    }

    /// The local calendar date of `t`, ignoring the start-of-day hour.
    pub fn calendar_day(&self, t: DateTime<Utc>) -> NaiveDate {
        if !is_date_defined(t) {
            return t.date_naive();
        }
        t.with_timezone(&self.zone).date_naive()
    }

    /// Bucket an entry date: all-day dates by calendar, timed ones by [`Clock::day_of`].
    pub fn entry_day(&self, t: DateTime<Utc>, all_day: bool) -> NaiveDate {
        if all_day {
            self.calendar_day(t)
        } else {
            self.day_of(t)
        }
    }

    /// First instant of `day`: local midnight plus the start hour.
    pub fn start_of_day(&self, day: NaiveDate) -> DateTime<Utc> {
        self.local_to_utc(day.and_time(NaiveTime::MIN) + Duration::hours(i64::from(self.start_hour)))
    }

    /// Local midnight of `day`, the start of an all-day date.
    pub fn midnight(&self, day: NaiveDate) -> DateTime<Utc> {
        self.local_to_utc(day.and_time(NaiveTime::MIN))
    }

    /// First instant of the day after the one `t` belongs to.
    pub fn start_of_next_day(&self, t: DateTime<Utc>) -> DateTime<Utc> {
        self.start_of_day(self.day_of(t) + Duration::days(1))
    }

    pub fn start_of_today(&self) -> DateTime<Utc> {
        self.start_of_day(self.today())
    }

    pub fn is_before_today(&self, t: DateTime<Utc>) -> bool {
        is_date_defined(t) && self.day_of(t) < self.today()
    }

    /// [`Clock::is_before_today`] bucketed the way [`Clock::entry_day`] does,
    /// so all-day dates compare by calendar day.
    pub fn is_before_today_for(&self, t: DateTime<Utc>, all_day: bool) -> bool {
        is_date_defined(t) && self.entry_day(t, all_day) < self.today()
    }

    pub fn is_today(&self, t: DateTime<Utc>) -> bool {
        is_date_defined(t) && self.day_of(t) == self.today()
    }

    pub fn is_after_today(&self, t: DateTime<Utc>) -> bool {
        is_date_defined(t) && self.day_of(t) > self.today()
    }

    /// Signed number of days from today to `day`.
    pub fn days_from_today(&self, day: NaiveDate) -> i64 {
        (day - self.today()).num_days()
    }

    // -----------------------------------------------------------------------
    // Time range
    // -----------------------------------------------------------------------

    /// Earliest end an event may have and still be listed.
    pub fn start_of_time_range(&self, cutoff: EndedCutoff) -> DateTime<Utc> {
        let today = self.today();
        match cutoff.rule() {
            CutoffRule::HoursBeforeNow(hours) => self.now() - Duration::hours(hours),
            CutoffRule::DaysBeforeToday(days) => {
                let day = today
                    .checked_sub_days(chrono::Days::new(days))
                    .unwrap_or(NaiveDate::MIN);
                self.start_of_day(day)
            }
            CutoffRule::MonthsBeforeToday(months) => {
                let day = today
                    .checked_sub_months(chrono::Months::new(months))
                    .unwrap_or(NaiveDate::MIN);
                self.start_of_day(day)
            }
        }
    }

    /// Last instant covered by a range of `event_range_days`.
    ///
    /// A positive count reaches that many days past now; 0 ends with today and
    /// `-N` ends with the N-th day after today.
    pub fn end_of_time_range(&self, event_range_days: i32) -> DateTime<Utc> {
        let days = i64::from(event_range_days);
        let end = if days > 0 {
            Duration::try_days(days).and_then(|span| self.now().checked_add_signed(span))
        } else {
            Duration::try_days(1 - days)
                .and_then(|span| self.today().checked_add_signed(span))
                .filter(|day| *day <= datetime_max().date_naive())
                .map(|day| self.start_of_day(day))
        };
        end.map_or_else(datetime_max, |end| end.min(datetime_max())) - Duration::milliseconds(1)
    }

    pub fn time_range(&self, settings: &Settings) -> TimeRange {
        TimeRange {
            start: self.start_of_time_range(settings.ended_cutoff),
            end: self.end_of_time_range(settings.event_range_days),
        }
    }

    /// Map a local wall time to an instant: earliest of an ambiguous pair, the
    /// first valid hour after a DST gap.
    pub fn local_to_utc(&self, naive: NaiveDateTime) -> DateTime<Utc> {
        let mut candidate = naive;
        for _ in 0..3 {
            match self.zone.from_local_datetime(&candidate) {
                LocalResult::Single(t) => return t.with_timezone(&Utc),
                LocalResult::Ambiguous(earliest, _) => return earliest.with_timezone(&Utc),
                LocalResult::None => candidate += Duration::hours(1),
            }
        }
        Utc.from_utc_datetime(&naive)
    }
}
