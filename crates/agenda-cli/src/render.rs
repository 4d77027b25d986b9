//! Plain-text rendering of an agenda for the `list` subcommand.

use agenda_engine::entry::{Boundary, TimeDisplay};
use agenda_engine::record::TaskStatus;
use agenda_engine::{Entry, EntryKind, EntryPosition, FooterKind};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Render one line per entry, times shown in `zone`.
pub fn render(entries: &[Entry], zone: Tz) -> String {
    let mut out = String::new();
    for entry in entries {
        out.push_str(&render_entry(entry, zone));
        out.push('\n');
    }
    out
}

fn render_entry(entry: &Entry, zone: Tz) -> String {
    match &entry.kind {
        EntryKind::DayHeader => match entry.position {
            EntryPosition::PastAndDueHeader => "== Past and due ==".to_string(),
            EntryPosition::EndOfListHeader => "== Later ==".to_string(),
            _ => format!("== {} ==", entry.entry_day.format("%a %-d %b %Y")),
        },
        EntryKind::CurrentTime => format!("  --- {} now ---", clock_time(entry.entry_date, zone)),
        EntryKind::Event(event) => {
            let time = match event.time_display {
                TimeDisplay::Hidden => "all day".to_string(),
                TimeDisplay::Span { start, end } => {
                    format!("{}-{}", boundary(start, zone), boundary(end, zone))
                }
            };
            let mut line = format!("  {time:<11} {}", event.event.title);
            if !event.event.location.is_empty() {
                line.push_str(&format!(" @ {}", event.event.location));
            }
            line
        }
        EntryKind::Task(task) => {
            let mark = match task.task.status {
                TaskStatus::Completed => 'x',
                _ => ' ',
            };
            let mut line = format!("  {:<11} {}", format!("[{mark}]"), task.task.title);
            if let Some(due) = task.task.due {
                line.push_str(&format!(" (due {})", due.with_timezone(&zone).format("%Y-%m-%d")));
            }
            line
        }
        EntryKind::Footer { footer } => match footer {
            FooterKind::Empty => "(no events)".to_string(),
            FooterKind::Last => "(end)".to_string(),
            FooterKind::NoPermissions => "(no calendar permission)".to_string(),
            FooterKind::NotLoaded => "(calendars not loaded)".to_string(),
        },
    }
}

fn boundary(b: Boundary, zone: Tz) -> String {
    match b {
        Boundary::At(t) => clock_time(t, zone),
        Boundary::Continues => "..".to_string(),
    }
}

fn clock_time(t: DateTime<Utc>, zone: Tz) -> String {
    t.with_timezone(&zone).format("%H:%M").to_string()
}
