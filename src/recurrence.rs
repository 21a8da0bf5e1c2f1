use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Converts the portal's 1 = Monday .. 7 = Sunday numbering.
pub fn weekday_from_index(day: u32) -> Option<Weekday> {
    match day {
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        7 => Some(Weekday::Sun),
        _ => None,
    }
}

pub fn weekday_index(weekday: Weekday) -> u32 {
    weekday.number_from_monday()
}

/// Every date in `[range_start, range_end]` that falls on `weekday`
/// (1 = Monday .. 7 = Sunday), in ascending order.
pub fn dates_for_weekday(weekday: u32, range_start: NaiveDate, range_end: NaiveDate) -> Vec<NaiveDate> {
    let Some(target) = weekday_from_index(weekday) else {
        tracing::debug!(weekday, "ignoring weekday outside 1..=7");
        return Vec::new();
    };

    let offset = (weekday_index(target) + 7 - weekday_index(range_start.weekday())) % 7;
    let mut current = range_start + Duration::days(i64::from(offset));
    let mut dates = Vec::new();

    while current <= range_end {
        dates.push(current);
        current += Duration::days(7);
    }

    dates
}
