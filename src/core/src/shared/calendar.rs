use chrono::{Duration, NaiveDate};

/// Length of one simulated season in days.
pub const SEASON_DAYS: u16 = 365;

/// Calendar gap between two consecutive rounds of a league.
pub const ROUND_SPACING_DAYS: u16 = 5;

/// Maps (season, day-of-season) pairs onto calendar dates. Season 1, day 1 is
/// pinned to a fixed epoch; the fixture generator and the day-by-day
/// progression must always agree on this mapping, so both go through here.
pub struct SeasonCalendar;

impl SeasonCalendar {
    pub fn epoch() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    /// Calendar date of `day` (1-based) in `season` (1-based).
    pub fn date_for(season: u16, day: u16) -> NaiveDate {
        let total_days = (day as i64 - 1) + (season as i64 - 1) * SEASON_DAYS as i64;
        Self::epoch() + Duration::days(total_days)
    }

    /// Day-of-season on which round `index` (0-based) is played.
    pub fn round_day(index: usize) -> u16 {
        index as u16 * ROUND_SPACING_DAYS + 1
    }

    pub fn round_date(season: u16, index: usize) -> NaiveDate {
        Self::date_for(season, Self::round_day(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn season_one_day_one_is_the_epoch() {
        assert_eq!(SeasonCalendar::date_for(1, 1), SeasonCalendar::epoch());
    }

    #[test]
    fn seasons_are_365_days_apart() {
        let a = SeasonCalendar::date_for(1, 40);
        let b = SeasonCalendar::date_for(2, 40);
        assert_eq!(b - a, Duration::days(365));
    }

    #[test]
    fn rounds_are_five_days_apart() {
        assert_eq!(SeasonCalendar::round_day(0), 1);
        assert_eq!(SeasonCalendar::round_day(1), 6);
        assert_eq!(SeasonCalendar::round_day(33), 166);

        let d0 = SeasonCalendar::round_date(1, 0);
        let d1 = SeasonCalendar::round_date(1, 1);
        assert_eq!(d1 - d0, Duration::days(5));
    }
}
