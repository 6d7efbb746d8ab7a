use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, TimeZone, Utc};

/// Reporting window for sales metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalesPeriod {
    Week,
    Month,
    Quarter,
    Year,
    /// Unrecognized value; the window collapses to "now".
    Unrecognized,
}

impl SalesPeriod {
    /// Parse the `period` query value. A missing value means `Month`.
    pub fn from_query(value: Option<&str>) -> Self {
        match value.map(str::to_lowercase).as_deref() {
            None => Self::Month,
            Some("week") => Self::Week,
            Some("month") => Self::Month,
            Some("quarter") => Self::Quarter,
            Some("year") => Self::Year,
            Some(_) => Self::Unrecognized,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
            Self::Unrecognized => "unknown",
        }
    }

    /// First instant of the window ending at `now`.
    ///
    /// Calendar months are clamped to the last day of shorter months.
    pub fn window_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let back = |months: u32| now.checked_sub_months(Months::new(months)).unwrap_or(now);
        match self {
            Self::Week => now - Duration::days(7),
            Self::Month => back(1),
            Self::Quarter => back(3),
            Self::Year => back(12),
            Self::Unrecognized => now,
        }
    }
}

/// Day 1 of the month containing `now`, at 00:00 UTC.
pub fn start_of_month(now: DateTime<Utc>) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(now.year(), now.month(), 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| Utc.from_utc_datetime(&dt))
        .unwrap_or(now)
}

/// Calendar-day key (`YYYY-MM-DD`, UTC) used for per-day grouping.
pub fn day_key(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn missing_period_defaults_to_month() {
        assert_eq!(SalesPeriod::from_query(None), SalesPeriod::Month);
        assert_eq!(SalesPeriod::from_query(Some("Quarter")), SalesPeriod::Quarter);
        assert_eq!(SalesPeriod::from_query(Some("decade")), SalesPeriod::Unrecognized);
    }

    #[test]
    fn window_start_per_period() {
        let now = at(2024, 5, 15, 12);
        assert_eq!(SalesPeriod::Week.window_start(now), at(2024, 5, 8, 12));
        assert_eq!(SalesPeriod::Month.window_start(now), at(2024, 4, 15, 12));
        assert_eq!(SalesPeriod::Quarter.window_start(now), at(2024, 2, 15, 12));
        assert_eq!(SalesPeriod::Year.window_start(now), at(2023, 5, 15, 12));
        assert_eq!(SalesPeriod::Unrecognized.window_start(now), now);
    }

    #[test]
    fn month_back_clamps_to_shorter_month() {
        let now = at(2024, 3, 31, 8);
        assert_eq!(SalesPeriod::Month.window_start(now), at(2024, 2, 29, 8));
    }

    #[test]
    fn start_of_month_is_midnight_on_day_one() {
        assert_eq!(start_of_month(at(2024, 7, 19, 23)), at(2024, 7, 1, 0));
    }

    #[test]
    fn day_key_formats_utc_date() {
        assert_eq!(day_key(at(2024, 1, 2, 3)), "2024-01-02");
    }
}
