//! Tests for the filter pipeline stages.

use agenda_engine::filter::{self, closest_instances, dedupe, keyword_filter};
use agenda_engine::record::EventSource;
use agenda_engine::settings::{ClockMode, EndedCutoff, FilterMode};
use agenda_engine::{CalendarEvent, Clock, Entry, EntryPosition, Settings, TaskRecord};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

// ── Helpers ─────────────────────────────────────────────────────────────────

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap()
}

fn clock() -> Clock {
    Clock::frozen(now(), Tz::UTC, 0)
}

fn settings() -> Settings {
    Settings::frozen_at(now())
}

fn at(offset: i64, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 18, hour, 0, 0).unwrap() + Duration::days(offset)
}

fn day(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap() + Duration::days(offset)
}

fn entry(event: &CalendarEvent) -> Entry {
    Entry::event_segment(event, EntryPosition::EntryDate, event.start, true, true, &clock())
}

fn titled(id: &str, title: &str) -> Entry {
    entry(&CalendarEvent::timed(id, title, at(0, 12), at(0, 13)))
}

/// One instance of `series` on day `offset`, at noon.
fn instance(series: &str, offset: i64) -> Entry {
    let id = format!("{series}@{offset}");
    entry(&CalendarEvent::timed(id, series, at(offset, 12), at(offset, 13)).with_series(series))
}

fn titles(entries: &[Entry]) -> Vec<&str> {
    entries.iter().map(Entry::title).collect()
}

fn kept_days(entries: &[Entry]) -> Vec<NaiveDate> {
    entries.iter().map(|e| e.entry_day).collect()
}

// ── Keyword filters ─────────────────────────────────────────────────────────

#[test]
fn hide_keywords_remove_matching_titles() {
    let s = Settings {
        hide_keywords: "gym".to_string(),
        ..settings()
    };
    let kept = keyword_filter(vec![titled("1", "Gym session"), titled("2", "Lunch")], &s);
    assert_eq!(titles(&kept), vec!["Lunch"]);
}

#[test]
fn show_keywords_restrict_to_matches() {
    let s = Settings {
        show_keywords: "lunch, \"team sync\"".to_string(),
        ..settings()
    };
    let kept = keyword_filter(
        vec![
            titled("1", "Gym session"),
            titled("2", "Lunch"),
            titled("3", "Weekly team sync"),
            titled("4", "Sync with team"),
        ],
        &s,
    );
    assert_eq!(titles(&kept), vec!["Lunch", "Weekly team sync"]);
}

#[test]
fn hide_wins_over_show() {
    let s = Settings {
        show_keywords: "lunch".to_string(),
        hide_keywords: "client".to_string(),
        ..settings()
    };
    let kept = keyword_filter(vec![titled("1", "Client lunch"), titled("2", "Lunch")], &s);
    assert_eq!(titles(&kept), vec!["Lunch"]);
}

#[test]
fn description_is_searched_only_when_enabled() {
    let event = CalendarEvent::timed("1", "Meeting", at(0, 12), at(0, 13))
        .with_description("Private: doctor");
    let mut s = Settings {
        hide_keywords: "private".to_string(),
        ..settings()
    };
    assert_eq!(keyword_filter(vec![entry(&event)], &s).len(), 1);

    s.keywords_match_description = true;
    assert!(keyword_filter(vec![entry(&event)], &s).is_empty());
}

#[test]
fn filter_mode_controls_keyword_stage() {
    let entries = || vec![titled("1", "Gym session"), titled("2", "Lunch")];
    let base = Settings {
        hide_keywords: "gym".to_string(),
        ..settings()
    };

    let off = Settings {
        filter_mode: FilterMode::Off,
        ..base.clone()
    };
    assert_eq!(filter::apply(entries(), &clock(), &off).len(), 2);

    let debug_live = Settings {
        filter_mode: FilterMode::DebugOnly,
        clock_mode: ClockMode::Live,
        ..base.clone()
    };
    assert_eq!(filter::apply(entries(), &clock(), &debug_live).len(), 2);

    let debug_frozen = Settings {
        filter_mode: FilterMode::DebugOnly,
        ..base.clone()
    };
    assert_eq!(filter::apply(entries(), &clock(), &debug_frozen).len(), 1);

    assert_eq!(filter::apply(entries(), &clock(), &base).len(), 1);
}

// ── Hidden and range cutoff ─────────────────────────────────────────────────

#[test]
fn hidden_entries_are_dropped() {
    let clock = clock();
    let hidden = Entry::task(&TaskRecord::new("t", "Someday"), EntryPosition::Hidden, None, &clock);
    let kept = filter::apply(vec![hidden, titled("1", "Lunch")], &clock, &settings());
    assert_eq!(titles(&kept), vec!["Lunch"]);
}

#[test]
fn ended_cutoff_widens_the_range() {
    let breakfast = CalendarEvent::timed("b", "Breakfast", at(0, 7), at(0, 8));
    let last_week = CalendarEvent::timed("w", "Review", at(-5, 10), at(-5, 11));
    let entries = || vec![entry(&breakfast), entry(&last_week)];

    let none = settings();
    assert!(filter::apply(entries(), &clock(), &none).is_empty());

    let two_hours = Settings {
        ended_cutoff: EndedCutoff::TwoHours,
        ..settings()
    };
    assert_eq!(titles(&filter::apply(entries(), &clock(), &two_hours)), vec!["Breakfast"]);

    let week = Settings {
        ended_cutoff: EndedCutoff::OneWeek,
        ..settings()
    };
    assert_eq!(filter::apply(entries(), &clock(), &week).len(), 2);
}

#[test]
fn tasks_are_not_cut_by_range() {
    let clock = clock();
    let task = TaskRecord::new("t", "Old chore").with_due(at(-20, 9));
    let entry = Entry::task(&task, EntryPosition::EntryDate, task.due, &clock);
    assert_eq!(filter::apply(vec![entry], &clock, &settings()).len(), 1);
}

// ── Duplicate suppression ───────────────────────────────────────────────────

#[test]
fn duplicates_keep_first_occurrence() {
    let s = Settings {
        hide_duplicates: true,
        ..settings()
    };
    let first = CalendarEvent::timed("1", "Lunch", at(0, 12), at(0, 13)).with_location("Cafe");
    let second = CalendarEvent::timed("2", "Lunch", at(0, 12), at(0, 13)).with_location("Diner");

    let kept = dedupe(vec![entry(&first), entry(&second)], &clock(), &s);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].record_id(), Some("1"));
}

#[test]
fn duplicates_keep_lowest_source_order_regardless_of_input_order() {
    let s = Settings {
        hide_duplicates: true,
        ..settings()
    };
    let work = CalendarEvent::timed("w", "Lunch", at(0, 12), at(0, 13))
        .with_source(EventSource::new("work", 2));
    let home = CalendarEvent::timed("h", "Lunch", at(0, 12), at(0, 13))
        .with_source(EventSource::new("home", 1));

    let kept = dedupe(vec![entry(&work), entry(&home)], &clock(), &s);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].record_id(), Some("h"));

    let kept = dedupe(vec![entry(&home), entry(&work)], &clock(), &s);
    assert_eq!(kept[0].record_id(), Some("h"));
}

#[test]
fn shown_location_distinguishes_duplicates() {
    let s = Settings {
        hide_duplicates: true,
        show_location: true,
        ..settings()
    };
    let first = CalendarEvent::timed("1", "Lunch", at(0, 12), at(0, 13)).with_location("Cafe");
    let second = CalendarEvent::timed("2", "Lunch", at(0, 12), at(0, 13)).with_location("Diner");

    assert_eq!(dedupe(vec![entry(&first), entry(&second)], &clock(), &s).len(), 2);
}

#[test]
fn end_dates_compare_by_calendar_day() {
    let s = Settings {
        hide_duplicates: true,
        ..settings()
    };
    let short = CalendarEvent::timed("1", "Lunch", at(0, 12), at(0, 13));
    let long = CalendarEvent::timed("2", "Lunch", at(0, 12), at(0, 15));
    let next_day = CalendarEvent::timed("3", "Lunch", at(0, 12), at(1, 1));

    let kept = dedupe(vec![entry(&short), entry(&long), entry(&next_day)], &clock(), &s);
    let ids: Vec<_> = kept.iter().filter_map(Entry::record_id).collect();
    assert_eq!(ids, vec!["1", "3"]);
}

// ── Closest recurring instance ──────────────────────────────────────────────

#[test]
fn closest_instance_prefers_today() {
    let entries = [-5, -1, 0, 3].map(|d| instance("standup", d)).to_vec();
    assert_eq!(kept_days(&closest_instances(entries, &clock())), vec![day(0)]);
}

#[test]
fn closest_instance_among_past() {
    let entries = [-5, -2].map(|d| instance("standup", d)).to_vec();
    assert_eq!(kept_days(&closest_instances(entries, &clock())), vec![day(-2)]);
}

#[test]
fn closest_instance_among_future() {
    let entries = [2, 7].map(|d| instance("standup", d)).to_vec();
    assert_eq!(kept_days(&closest_instances(entries, &clock())), vec![day(2)]);
}

#[test]
fn equidistant_instances_prefer_future() {
    let entries = [-1, 1].map(|d| instance("standup", d)).to_vec();
    assert_eq!(kept_days(&closest_instances(entries, &clock())), vec![day(1)]);
}

#[test]
fn series_are_reduced_independently() {
    let mut entries = [-3, 4].map(|d| instance("gym", d)).to_vec();
    entries.extend([1, 2].map(|d| instance("standup", d)));
    entries.push(titled("solo", "One-off"));

    let kept = closest_instances(entries, &clock());
    let mut ids: Vec<_> = kept.iter().filter_map(Entry::record_id).collect();
    ids.sort();
    assert_eq!(ids, vec!["gym@-3", "solo", "standup@1"]);
}

#[test]
fn closest_instance_keeps_all_its_segments() {
    let clock = clock();
    let span = CalendarEvent::timed("span@0", "Camp", at(0, 12), at(2, 12)).with_series("camp");
    let later = CalendarEvent::timed("span@7", "Camp", at(7, 12), at(9, 12)).with_series("camp");
    let window = agenda_engine::VisibleWindow::new(day(0), day(30));
    let mut entries = agenda_engine::split_event(&span, &window, &clock, &settings());
    entries.extend(agenda_engine::split_event(&later, &window, &clock, &settings()));

    let kept = closest_instances(entries, &clock);
    assert_eq!(kept.len(), 3);
    assert!(kept.iter().all(|e| e.record_id() == Some("span@0")));
}
