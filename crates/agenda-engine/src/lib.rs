//! # agenda-engine
//!
//! Builds a day-grouped, display-ready agenda from raw calendar events and
//! tasks.
//!
//! Records arrive from providers in any order and with partial dates. The
//! engine classifies each into an entry position, splits multi-day events
//! into per-day segments, filters, totally orders the result and adds
//! structural entries, so a renderer can walk the list top to bottom.
//!
//! ## Modules
//!
//! - [`clock`] -- "now", "today" and start-hour-aware day boundaries
//! - [`settings`] -- per-instance configuration
//! - [`record`] -- normalized events and tasks
//! - [`raw`] -- provider rows with string timestamps into records
//! - [`position`] -- the entry-position table
//! - [`entry`] -- output entries and their date resolution
//! - [`classifier`] -- record to position
//! - [`splitter`] -- multi-day events to per-day segments
//! - [`keywords`] -- show/hide keyword lists
//! - [`filter`] -- keyword, range, duplicate and closest-instance stages
//! - [`sorter`] -- the total order over entries
//! - [`assembler`] -- headers, current-time marker and footer
//! - [`agenda`] -- the refresh pipeline
//! - [`error`] -- error types

pub mod agenda;
pub mod assembler;
pub mod classifier;
pub mod clock;
pub mod entry;
pub mod error;
pub mod filter;
pub mod keywords;
pub mod position;
pub mod raw;
pub mod record;
pub mod settings;
pub mod sorter;
pub mod splitter;

pub use agenda::{build_agenda, build_agenda_from_raw, build_with_clock, AgendaInput};
pub use assembler::{assemble, ProviderStatus};
pub use classifier::{classify, classify_event_segment, classify_task};
pub use clock::{Clock, TimeRange};
pub use entry::{Entry, EntryKind, FooterKind, TimeSection};
pub use error::AgendaError;
pub use position::EntryPosition;
pub use raw::RawRecord;
pub use record::{CalendarEvent, EventSource, Record, TaskRecord};
pub use settings::Settings;
pub use sorter::sort_entries;
pub use splitter::{split_event, VisibleWindow};
