//! Week and month periods in the local calendar.
//!
//! Weeks start on Monday. A period's bounds are inclusive: the first day at
//! 00:00:00.000 and the last day at 23:59:59.999.

use chrono::{
    DateTime, Datelike, Duration, LocalResult, Month, Months, NaiveDate, NaiveDateTime, NaiveTime,
    TimeZone,
};

/// Inclusive range of local date-times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Period {
    /// The period covering `first` through `last`, whole days included.
    pub fn from_days(first: NaiveDate, last: NaiveDate) -> Self {
        Self {
            start: first.and_time(start_of_day()),
            end: last.and_time(end_of_day()),
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn last_day(&self) -> NaiveDate {
        self.end.date()
    }

    /// Whether the calendar day `date` lies inside the period.
    pub fn contains_day(&self, date: NaiveDate) -> bool {
        self.first_day() <= date && date <= self.last_day()
    }

    /// Anchor both bounds in `tz`.
    pub fn localized<Tz: TimeZone>(&self, tz: &Tz) -> (DateTime<Tz>, DateTime<Tz>) {
        (localize(tz, self.start), localize(tz, self.end))
    }
}

/// The Monday-to-Sunday week containing `reference`.
pub fn current_week(reference: NaiveDateTime) -> Period {
    let date = reference.date();
    let monday = date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
    let sunday = monday + Duration::days(6);
    Period::from_days(monday, sunday)
}

/// First to last calendar day of `month` in `year`.
///
/// Returns `None` only when the year is outside chrono's representable range.
pub fn month_period(year: i32, month: Month) -> Option<Period> {
    let first = NaiveDate::from_ymd_opt(year, month.number_from_month(), 1)?;
    let last = first.checked_add_months(Months::new(1))?.pred_opt()?;
    Some(Period::from_days(first, last))
}

/// January 1st to December 31st of `year`.
pub fn year_period(year: i32) -> Option<Period> {
    let first = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let last = NaiveDate::from_ymd_opt(year, 12, 31)?;
    Some(Period::from_days(first, last))
}

/// Year and month of `reference`.
pub fn current_month(reference: NaiveDate) -> (i32, Month) {
    let month = Month::try_from(reference.month() as u8).unwrap_or(Month::January);
    (reference.year(), month)
}

fn start_of_day() -> NaiveTime {
    NaiveTime::default()
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or_default()
}

// A wall time skipped by a DST gap maps to the first instant after the gap.
fn localize<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(date_time) => date_time,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => tz
            .from_local_datetime(&(local + Duration::hours(1)))
            .earliest()
            .unwrap_or_else(|| tz.from_utc_datetime(&local)),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, FixedOffset, Month, NaiveDate, Timelike, Weekday};

    use super::*;

    fn at(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(hour, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_current_week_spans_monday_to_sunday() {
        let mut date = NaiveDate::from_ymd_opt(2025, 12, 20).unwrap();
        for _ in 0..30 {
            let reference = date.and_hms_opt(17, 45, 0).unwrap();
            let week = current_week(reference);
            assert_eq!(week.start.weekday(), Weekday::Mon);
            assert_eq!(week.end.weekday(), Weekday::Sun);
            assert_eq!(week.last_day() - week.first_day(), Duration::days(6));
            assert!(week.start <= reference && reference <= week.end);
            date = date.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_current_week_bounds() {
        // Friday 2026-10-16
        let week = current_week(at(2026, 10, 16, 9));
        assert_eq!(week.first_day(), NaiveDate::from_ymd_opt(2026, 10, 12).unwrap());
        assert_eq!(week.last_day(), NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
        assert_eq!(week.start.time(), NaiveTime::from_hms_opt(0, 0, 0).unwrap());
        assert_eq!(
            (week.end.hour(), week.end.minute(), week.end.second()),
            (23, 59, 59)
        );

        // A Monday and a Sunday are their own week boundaries.
        let monday = current_week(at(2026, 10, 12, 0));
        assert_eq!(monday.first_day(), NaiveDate::from_ymd_opt(2026, 10, 12).unwrap());
        let sunday = current_week(at(2026, 10, 18, 23));
        assert_eq!(sunday.first_day(), NaiveDate::from_ymd_opt(2026, 10, 12).unwrap());
    }

    #[test]
    fn test_current_week_across_year_end() {
        let week = current_week(at(2026, 1, 1, 12));
        assert_eq!(week.first_day(), NaiveDate::from_ymd_opt(2025, 12, 29).unwrap());
        assert_eq!(week.last_day(), NaiveDate::from_ymd_opt(2026, 1, 4).unwrap());
    }

    #[test]
    fn test_month_period_last_days() {
        let cases = [
            (2026, Month::January, 31),
            (2026, Month::February, 28),
            (2028, Month::February, 29),
            (2100, Month::February, 28),
            (2000, Month::February, 29),
            (2026, Month::April, 30),
            (2026, Month::December, 31),
        ];
        for (year, month, last_day) in cases {
            let period = month_period(year, month).unwrap();
            assert_eq!(period.first_day().day(), 1);
            assert_eq!(period.first_day().month(), month.number_from_month());
            assert_eq!(period.last_day().day(), last_day);
            assert_eq!(period.last_day().month(), month.number_from_month());
            assert_eq!(period.last_day().year(), year);
        }
    }

    #[test]
    fn test_year_period() {
        let period = year_period(2026).unwrap();
        assert_eq!(period.first_day(), NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        assert_eq!(period.last_day(), NaiveDate::from_ymd_opt(2026, 12, 31).unwrap());
    }

    #[test]
    fn test_contains_day() {
        let period = month_period(2026, Month::January).unwrap();
        assert!(period.contains_day(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()));
        assert!(period.contains_day(NaiveDate::from_ymd_opt(2026, 1, 31).unwrap()));
        assert!(!period.contains_day(NaiveDate::from_ymd_opt(2026, 2, 1).unwrap()));
        assert!(!period.contains_day(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()));
    }

    #[test]
    fn test_current_month() {
        let (year, month) = current_month(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());
        assert_eq!(year, 2026);
        assert_eq!(month, Month::October);
    }

    #[test]
    fn test_localized_keeps_local_wall_time() {
        let paris_summer = FixedOffset::east_opt(2 * 3600).unwrap();
        let week = current_week(at(2026, 10, 16, 9));
        let (start, end) = week.localized(&paris_summer);
        assert_eq!(start.to_rfc3339(), "2026-10-12T00:00:00+02:00");
        assert_eq!(end.date_naive(), NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
    }

    #[test]
    fn test_localize_skips_midnight_dst_gap() {
        // Chile moves from -04 to -03 at midnight on 2026-09-06.
        let santiago = chrono_tz::America::Santiago;
        let midnight = NaiveDate::from_ymd_opt(2026, 9, 6)
            .unwrap()
            .and_time(start_of_day());
        let start = localize(&santiago, midnight);
        assert_eq!(start.to_rfc3339(), "2026-09-06T01:00:00-03:00");
        assert_eq!(start.naive_utc().to_string(), "2026-09-06 04:00:00");
    }
}
