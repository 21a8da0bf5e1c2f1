use chrono::{Datelike, NaiveDate};

use crate::models::{Activity, CalendarEvent, DayTimelineEntry, EventKind, WeeklySchedule};
use crate::recurrence::dates_for_weekday;
use crate::semester::is_date_in_semester;

/// Narrows schedules and activities to what one class group or one teacher
/// should see.
#[derive(Debug, Clone, Default)]
pub struct ScheduleFilter {
    pub class_group: Option<String>,
    pub teacher: Option<String>,
}

impl ScheduleFilter {
    pub fn apply(
        &self,
        schedules: &[WeeklySchedule],
        activities: &[Activity],
    ) -> (Vec<WeeklySchedule>, Vec<Activity>) {
        let schedules: Vec<WeeklySchedule> = schedules
            .iter()
            .filter(|s| self.class_group.as_ref().map_or(true, |id| &s.class_group.id == id))
            .filter(|s| match &self.teacher {
                Some(id) => s.teacher.as_ref().is_some_and(|t| &t.id == id),
                None => true,
            })
            .cloned()
            .collect();

        // Activities have no teacher; keep the ones whose class group and
        // subject pair is taught by a surviving schedule.
        let activities = activities
            .iter()
            .filter(|a| self.class_group.as_ref().map_or(true, |id| &a.class_group.id == id))
            .filter(|a| {
                self.teacher.is_none()
                    || schedules
                        .iter()
                        .any(|s| s.class_group.id == a.class_group.id && s.subject.id == a.subject.id)
            })
            .cloned()
            .collect();

        (schedules, activities)
    }
}

/// Expands active weekly schedules over `display_year` and merges them with
/// the one-off activities, ordered by date then start time.
pub fn materialize_events(
    schedules: &[WeeklySchedule],
    activities: &[Activity],
    display_year: i32,
) -> Vec<CalendarEvent> {
    let (Some(year_start), Some(year_end)) = (
        NaiveDate::from_ymd_opt(display_year, 1, 1),
        NaiveDate::from_ymd_opt(display_year, 12, 31),
    ) else {
        return Vec::new();
    };

    let mut events = Vec::new();

    for schedule in schedules.iter().filter(|s| s.is_active()) {
        let title = format!("{} - {}", schedule.subject.label(), schedule.class_group.label());
        let time_label = format!("{} - {}", schedule.start_time, schedule.end_time);

        for date in dates_for_weekday(schedule.day_of_week, year_start, year_end) {
            if let Some(semester) = &schedule.semester {
                if !is_date_in_semester(date, semester) {
                    continue;
                }
            }
            events.push(CalendarEvent {
                title: title.clone(),
                date,
                time_label: Some(time_label.clone()),
                kind: EventKind::Class,
                start_time: Some(schedule.start_time.clone()),
                end_time: Some(schedule.end_time.clone()),
            });
        }
    }

    let class_count = events.len();

    for activity in activities {
        let time_label = match (&activity.start_time, &activity.end_time) {
            (Some(start), Some(end)) => Some(format!("{start} - {end}")),
            _ => None,
        };
        events.push(CalendarEvent {
            title: activity.name.clone(),
            date: activity.date,
            time_label,
            kind: activity.kind.into(),
            start_time: activity.start_time.clone(),
            end_time: activity.end_time.clone(),
        });
    }

    sort_events(&mut events);
    tracing::debug!(
        display_year,
        classes = class_count,
        activities = events.len() - class_count,
        "materialized calendar events"
    );
    events
}

/// Stable: events sharing a date and start time keep their relative order.
pub fn sort_events(events: &mut [CalendarEvent]) {
    events.sort_by_key(|event| (event.date, event.start_minutes()));
}

/// Events of one display year, optionally narrowed to one month. Activities
/// keep their own dates, so other years must be dropped here.
pub fn events_in(events: &[CalendarEvent], year: i32, month: Option<u32>) -> Vec<CalendarEvent> {
    events
        .iter()
        .filter(|e| e.date.year() == year)
        .filter(|e| month.map_or(true, |m| e.date.month() == m))
        .cloned()
        .collect()
}

pub fn events_on(events: &[CalendarEvent], date: NaiveDate) -> Vec<CalendarEvent> {
    events.iter().filter(|e| e.date == date).cloned().collect()
}

pub fn build_day_timeline(events: &[CalendarEvent]) -> Vec<DayTimelineEntry> {
    events
        .iter()
        .map(|event| DayTimelineEntry {
            start_minutes: event.start_minutes().unwrap_or(0),
            end_minutes: event.end_minutes().unwrap_or(0),
            event: event.clone(),
        })
        .collect()
}
