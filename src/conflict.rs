use crate::models::{minutes_since_midnight, WeeklySchedule};

/// A schedule about to be created.
#[derive(Debug, Clone)]
pub struct ScheduleCandidate {
    pub class_group_id: String,
    pub subject_id: String,
    pub day_of_week: u32,
    pub semester: String,
    pub start_time: String,
    pub end_time: String,
}

/// Half-open interval overlap: ranges that only touch do not overlap.
pub fn ranges_overlap(start_a: u32, end_a: u32, start_b: u32, end_b: u32) -> bool {
    start_a < end_b && end_a > start_b
}

/// True as soon as one active schedule for the same class group, subject,
/// weekday and semester overlaps the candidate's time range.
pub fn has_conflict(candidate: &ScheduleCandidate, existing: &[WeeklySchedule]) -> bool {
    let (Some(start), Some(end)) = (
        minutes_since_midnight(&candidate.start_time),
        minutes_since_midnight(&candidate.end_time),
    ) else {
        return false;
    };

    existing
        .iter()
        .filter(|s| s.is_active())
        .filter(|s| s.class_group.id == candidate.class_group_id)
        .filter(|s| s.subject.id == candidate.subject_id)
        .filter(|s| s.day_of_week == candidate.day_of_week)
        .filter(|s| s.semester.as_deref() == Some(candidate.semester.trim()))
        .any(|s| {
            match (
                minutes_since_midnight(&s.start_time),
                minutes_since_midnight(&s.end_time),
            ) {
                (Some(ex_start), Some(ex_end)) => ranges_overlap(start, end, ex_start, ex_end),
                _ => false,
            }
        })
}
