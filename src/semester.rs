use chrono::{Datelike, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SemesterWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// "1" is February through June, "2" is August through November. Any other
/// tag has no window.
pub fn resolve_semester_window(semester: &str, year: i32) -> Option<SemesterWindow> {
    let (start, end) = match semester.trim() {
        "1" => (
            NaiveDate::from_ymd_opt(year, 2, 1)?,
            NaiveDate::from_ymd_opt(year, 6, 30)?,
        ),
        "2" => (
            NaiveDate::from_ymd_opt(year, 8, 1)?,
            NaiveDate::from_ymd_opt(year, 11, 30)?,
        ),
        _ => return None,
    };
    Some(SemesterWindow { start, end })
}

/// Month-only check: day of month and year are ignored.
pub fn is_date_in_semester(date: NaiveDate, semester: &str) -> bool {
    match resolve_semester_window(semester, date.year()) {
        Some(window) => (window.start.month()..=window.end.month()).contains(&date.month()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn windows_follow_the_school_calendar() {
        let first = resolve_semester_window("1", 2025).unwrap();
        assert_eq!(first.start, day(2025, 2, 1));
        assert_eq!(first.end, day(2025, 6, 30));

        let second = resolve_semester_window("2", 2025).unwrap();
        assert_eq!(second.start, day(2025, 8, 1));
        assert_eq!(second.end, day(2025, 11, 30));

        assert_eq!(resolve_semester_window("3", 2025), None);
        assert_eq!(resolve_semester_window("", 2025), None);
    }

    #[test]
    fn month_boundaries() {
        assert!(!is_date_in_semester(day(2025, 1, 31), "1"));
        assert!(is_date_in_semester(day(2025, 2, 1), "1"));
        assert!(is_date_in_semester(day(2025, 6, 30), "1"));
        assert!(!is_date_in_semester(day(2025, 7, 1), "1"));
        assert!(!is_date_in_semester(day(2025, 7, 31), "2"));
        assert!(is_date_in_semester(day(2025, 11, 30), "2"));
        assert!(!is_date_in_semester(day(2025, 12, 1), "2"));
        assert!(!is_date_in_semester(day(2025, 3, 3), "x"));
    }

    proptest! {
        #[test]
        fn depends_only_on_month(
            year_a in 1990i32..2100,
            year_b in 1990i32..2100,
            month in 1u32..=12,
            day_a in 1u32..=28,
            day_b in 1u32..=28,
            semester in prop_oneof![Just("1"), Just("2"), Just("9")],
        ) {
            let a = is_date_in_semester(day(year_a, month, day_a), semester);
            let b = is_date_in_semester(day(year_b, month, day_b), semester);
            prop_assert_eq!(a, b);
        }
    }
}
