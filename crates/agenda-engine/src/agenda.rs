//! One refresh, end to end.
//!
//! `records -> classify/split -> filter -> sort -> assemble`. The pipeline is
//! pure: no I/O, no state kept between calls. Separate instances may refresh
//! concurrently since nothing here is shared.

use serde::{Deserialize, Serialize};

use crate::assembler::{assemble, ProviderStatus};
use crate::classifier::{classify_task, task_entry_date};
use crate::clock::Clock;
use crate::entry::Entry;
use crate::error::Result;
use crate::filter;
use crate::raw::{normalize, RawRecord};
use crate::record::Record;
use crate::settings::Settings;
use crate::splitter::{split_event, VisibleWindow};

/// Everything the provider layer hands over for one refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaInput {
    pub records: Vec<Record>,
    #[serde(default)]
    pub provider_status: ProviderStatus,
}

impl AgendaInput {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records,
            provider_status: ProviderStatus::Ready,
        }
    }
}

/// Build the ordered agenda for `input`.
///
/// # Errors
/// Returns `AgendaError::InvalidTimezone` if the settings name an unknown zone.
pub fn build_agenda(settings: &Settings, input: &AgendaInput) -> Result<Vec<Entry>> {
    let clock = Clock::new(settings)?;
    Ok(build_with_clock(&clock, settings, input))
}

/// Normalize raw provider rows and build the agenda from them.
///
/// Rows that cannot become records are logged and skipped.
///
/// # Errors
/// Returns `AgendaError::InvalidTimezone` if the settings name an unknown zone.
pub fn build_agenda_from_raw(
    settings: &Settings,
    rows: &[RawRecord],
    provider_status: ProviderStatus,
) -> Result<Vec<Entry>> {
    let clock = Clock::new(settings)?;
    let input = AgendaInput {
        records: normalize(rows, &clock),
        provider_status,
    };
    Ok(build_with_clock(&clock, settings, &input))
}

/// Build the agenda against an existing clock.
pub fn build_with_clock(clock: &Clock, settings: &Settings, input: &AgendaInput) -> Vec<Entry> {
    let window = VisibleWindow::from_range(&clock.time_range(settings), clock);
    let entries: Vec<Entry> = input
        .records
        .iter()
        .flat_map(|record| entries_for_record(record, &window, clock, settings))
        .collect();
    tracing::debug!(
        records = input.records.len(),
        entries = entries.len(),
        today = %clock.today(),
        "classified records"
    );
    let entries = filter::apply(entries, clock, settings);
    assemble(entries, clock, settings, input.provider_status)
}

/// The entries one record contributes before filtering.
pub fn entries_for_record(
    record: &Record,
    window: &VisibleWindow,
    clock: &Clock,
    settings: &Settings,
) -> Vec<Entry> {
    match record {
        Record::Event(event) => split_event(event, window, clock, settings),
        Record::Task(task) => {
            let position = classify_task(task, clock, settings);
            let date = task_entry_date(task, clock, settings);
            vec![Entry::task(task, position, date, clock)]
        }
    }
}
