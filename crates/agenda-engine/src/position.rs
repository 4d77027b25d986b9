//! Entry positions -- the symbolic bucket controlling where an entry lands.
//!
//! Each position carries two ranks used by the sorter: a *global order* that
//! groups the whole list (past-and-due block, dated days, end-of-list block,
//! footer) and a *same-day order* that interleaves entries falling on one day.
//! Several positions share a same-day rank on purpose; those interleave by
//! entry date alone.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which sentinel stands in for a missing entry date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentinel {
    /// Earlier than anything.
    Min,
    /// Later than anything.
    Max,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryPosition {
    PastAndDueHeader,
    PastAndDue,
    DayHeader,
    StartOfToday,
    StartOfDay,
    EntryDate,
    EndOfDay,
    EndOfToday,
    EndOfListHeader,
    EndOfList,
    ListFooter,
    Hidden,
}

impl EntryPosition {
    /// Every position, in declaration order.
    pub const ALL: [EntryPosition; 12] = [
        EntryPosition::PastAndDueHeader,
        EntryPosition::PastAndDue,
        EntryPosition::DayHeader,
        EntryPosition::StartOfToday,
        EntryPosition::StartOfDay,
        EntryPosition::EntryDate,
        EntryPosition::EndOfDay,
        EntryPosition::EndOfToday,
        EntryPosition::EndOfListHeader,
        EntryPosition::EndOfList,
        EntryPosition::ListFooter,
        EntryPosition::Hidden,
    ];

    /// Primary sort rank across the whole list.
    pub const fn global_order(self) -> u8 {
        match self {
            EntryPosition::PastAndDueHeader => 1,
            EntryPosition::PastAndDue => 2,
            EntryPosition::DayHeader
            | EntryPosition::StartOfToday
            | EntryPosition::StartOfDay
            | EntryPosition::EntryDate
            | EntryPosition::EndOfDay
            | EntryPosition::EndOfToday => 3,
            EntryPosition::EndOfListHeader | EntryPosition::EndOfList => 5,
            EntryPosition::ListFooter => 6,
            EntryPosition::Hidden => 9,
        }
    }

    /// Sort rank among entries that fall on the same entry day.
    pub const fn same_day_order(self) -> u8 {
        match self {
            EntryPosition::PastAndDueHeader => 1,
            EntryPosition::PastAndDue => 2,
            EntryPosition::DayHeader => 1,
            EntryPosition::StartOfToday => 2,
            EntryPosition::StartOfDay => 3,
            EntryPosition::EntryDate => 4,
            EntryPosition::EndOfDay => 5,
            EntryPosition::EndOfToday => 6,
            EntryPosition::EndOfListHeader | EntryPosition::EndOfList => 1,
            EntryPosition::ListFooter => 1,
            EntryPosition::Hidden => 9,
        }
    }

    /// Whether an entry at this position must carry a real date.
    pub const fn entry_date_is_required(self) -> bool {
        matches!(
            self,
            EntryPosition::DayHeader
                | EntryPosition::StartOfDay
                | EntryPosition::EntryDate
                | EntryPosition::EndOfDay
        )
    }

    /// The sentinel used when no date is available (or, for required
    /// positions, substituted after a contract violation).
    pub const fn sentinel(self) -> Sentinel {
        match self {
            EntryPosition::PastAndDueHeader
            | EntryPosition::PastAndDue
            | EntryPosition::DayHeader
            | EntryPosition::StartOfToday
            | EntryPosition::StartOfDay
            | EntryPosition::EntryDate
            | EntryPosition::Hidden => Sentinel::Min,
            EntryPosition::EndOfDay
            | EntryPosition::EndOfToday
            | EntryPosition::EndOfListHeader
            | EntryPosition::EndOfList
            | EntryPosition::ListFooter => Sentinel::Max,
        }
    }

    /// Positions that group entries under per-day headers.
    pub const fn is_day_bound(self) -> bool {
        self.global_order() == 3
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            EntryPosition::PastAndDueHeader => "past-and-due-header",
            EntryPosition::PastAndDue => "past-and-due",
            EntryPosition::DayHeader => "day-header",
            EntryPosition::StartOfToday => "start-of-today",
            EntryPosition::StartOfDay => "start-of-day",
            EntryPosition::EntryDate => "entry-date",
            EntryPosition::EndOfDay => "end-of-day",
            EntryPosition::EndOfToday => "end-of-today",
            EntryPosition::EndOfListHeader => "end-of-list-header",
            EntryPosition::EndOfList => "end-of-list",
            EntryPosition::ListFooter => "list-footer",
            EntryPosition::Hidden => "hidden",
        }
    }
}

impl fmt::Display for EntryPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
