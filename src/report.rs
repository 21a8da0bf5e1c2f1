use std::fmt::Write;

use chrono::{Datelike, NaiveDate};

use crate::availability::AvailableDate;
use crate::models::{CalendarEvent, DayTimelineEntry};

fn format_minutes(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

fn event_line(event: &CalendarEvent) -> String {
    match &event.time_label {
        Some(time) => format!("[{}] {} ({})", event.kind.label(), event.title, time),
        None => format!("[{}] {}", event.kind.label(), event.title),
    }
}

/// Markdown agenda grouped by month. Expects events in materialized order.
pub fn render_agenda(events: &[CalendarEvent], heading: &str) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# {heading}");

    if events.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "No events scheduled for this window.");
        return output;
    }

    let mut current_month: Option<(i32, u32)> = None;
    for event in events {
        let month = (event.date.year(), event.date.month());
        if current_month != Some(month) {
            let _ = writeln!(output);
            let _ = writeln!(output, "## {}", event.date.format("%B %Y"));
            current_month = Some(month);
        }
        let _ = writeln!(
            output,
            "- {} {}: {}",
            event.date,
            event.date.format("%a"),
            event_line(event)
        );
    }

    output
}

pub fn render_day(date: NaiveDate, entries: &[DayTimelineEntry]) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# {} ({})", date, date.format("%A"));
    let _ = writeln!(output);

    if entries.is_empty() {
        let _ = writeln!(output, "Nothing scheduled for this day.");
        return output;
    }

    for entry in entries {
        let _ = writeln!(
            output,
            "- {}-{} {}",
            format_minutes(entry.start_minutes),
            format_minutes(entry.end_minutes),
            event_line(&entry.event)
        );
    }

    output
}

pub fn render_available(dates: &[AvailableDate<'_>]) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Available Dates");
    let _ = writeln!(output);

    if dates.is_empty() {
        let _ = writeln!(output, "No free class slots left in this semester.");
        return output;
    }

    for offer in dates {
        let _ = writeln!(
            output,
            "- {} {}: {} - {} (aula {})",
            offer.date,
            offer.date.format("%a"),
            offer.schedule.start_time,
            offer.schedule.end_time,
            offer.schedule.id
        );
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::build_day_timeline;
    use crate::models::EventKind;

    fn event(date: NaiveDate, kind: EventKind, time: Option<(&str, &str)>) -> CalendarEvent {
        CalendarEvent {
            title: "Math - 9A".to_string(),
            date,
            time_label: time.map(|(s, e)| format!("{s} - {e}")),
            kind,
            start_time: time.map(|(s, _)| s.to_string()),
            end_time: time.map(|(_, e)| e.to_string()),
        }
    }

    #[test]
    fn agenda_groups_by_month() {
        let events = vec![
            event(NaiveDate::from_ymd_opt(2025, 2, 24).unwrap(), EventKind::Class, Some(("08:00", "09:00"))),
            event(NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(), EventKind::Exam, None),
        ];
        let agenda = render_agenda(&events, "Calendar 2025");

        assert!(agenda.starts_with("# Calendar 2025\n"));
        assert!(agenda.contains("## February 2025\n- 2025-02-24 Mon: [class] Math - 9A (08:00 - 09:00)"));
        assert!(agenda.contains("## March 2025\n- 2025-03-03 Mon: [exam] Math - 9A\n"));
    }

    #[test]
    fn empty_views() {
        assert!(render_agenda(&[], "Calendar").contains("No events scheduled"));
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        assert!(render_day(date, &[]).contains("Nothing scheduled"));
        assert!(render_available(&[]).contains("No free class slots"));
    }

    #[test]
    fn available_dates_name_the_schedule() {
        let schedule = crate::models::WeeklySchedule {
            id: "a7".to_string(),
            day_of_week: 1,
            start_time: "08:00".to_string(),
            end_time: "09:00".to_string(),
            semester: Some("1".to_string()),
            status: crate::models::ScheduleStatus::Active,
            class_group: crate::models::Ref::new("t1"),
            subject: crate::models::Ref::new("m1"),
            teacher: None,
        };
        let offers = [AvailableDate {
            date: NaiveDate::from_ymd_opt(2025, 3, 17).unwrap(),
            schedule: &schedule,
        }];
        assert!(render_available(&offers).contains("- 2025-03-17 Mon: 08:00 - 09:00 (aula a7)"));
    }

    #[test]
    fn day_shows_minute_offsets() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let entries = build_day_timeline(&[event(date, EventKind::Class, Some(("08:00", "09:30")))]);
        let day = render_day(date, &entries);
        assert!(day.starts_with("# 2025-03-10 (Monday)"));
        assert!(day.contains("- 08:00-09:30 [class] Math - 9A"));
    }
}
