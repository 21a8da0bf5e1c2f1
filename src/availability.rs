use chrono::NaiveDate;

use crate::models::{minutes_since_midnight, Activity, WeeklySchedule};
use crate::recurrence::dates_for_weekday;
use crate::semester::resolve_semester_window;

/// Class group, subject and semester an activity is being created for.
#[derive(Debug, Clone)]
pub struct SlotScope {
    pub class_group_id: String,
    pub subject_id: String,
    pub semester: String,
}

impl SlotScope {
    fn covers_schedule(&self, schedule: &WeeklySchedule) -> bool {
        schedule.class_group.id == self.class_group_id
            && schedule.subject.id == self.subject_id
            && schedule.semester.as_deref() == Some(self.semester.trim())
    }

    fn covers_activity(&self, activity: &Activity) -> bool {
        activity.class_group.id == self.class_group_id
            && activity.subject.id == self.subject_id
            && activity.semester.as_deref() == Some(self.semester.trim())
    }
}

#[derive(Debug, Clone)]
pub struct AvailableDate<'a> {
    pub date: NaiveDate,
    pub schedule: &'a WeeklySchedule,
}

/// Recurring class slots in the scope's semester, from `today` onwards, that
/// no existing activity of the same scope already occupies.
pub fn available_dates<'a>(
    scope: &SlotScope,
    schedules: &'a [WeeklySchedule],
    activities: &[Activity],
    today: NaiveDate,
    year: i32,
) -> Vec<AvailableDate<'a>> {
    let Some(window) = resolve_semester_window(&scope.semester, year) else {
        return Vec::new();
    };
    let range_start = window.start.max(today);

    let taken: Vec<(NaiveDate, &str, &str)> = activities
        .iter()
        .filter(|a| scope.covers_activity(a))
        .filter_map(|a| match (&a.start_time, &a.end_time) {
            (Some(start), Some(end)) => Some((a.date, start.trim(), end.trim())),
            _ => None,
        })
        .collect();

    let mut offers: Vec<AvailableDate<'a>> = schedules
        .iter()
        .filter(|s| s.is_active() && scope.covers_schedule(s))
        .flat_map(|schedule| {
            dates_for_weekday(schedule.day_of_week, range_start, window.end)
                .into_iter()
                .map(move |date| AvailableDate { date, schedule })
        })
        .filter(|offer| {
            !taken.contains(&(
                offer.date,
                offer.schedule.start_time.trim(),
                offer.schedule.end_time.trim(),
            ))
        })
        .collect();

    offers.sort_by_key(|offer| (offer.date, minutes_since_midnight(&offer.schedule.start_time)));
    offers
}
