/// Days of the season on which a transfer window opens: mid-season and the
/// final day, right before the rollover.
pub const MARKET_OPENING_DAYS: [u16; 2] = [60, 365];

/// How long an opened window stays open.
pub const MARKET_WINDOW_DAYS: u8 = 40;

#[derive(Debug, Clone)]
pub struct MarketCalendar {
    pub opening_days: Vec<u16>,
    pub window_days: u8,
}

impl Default for MarketCalendar {
    fn default() -> Self {
        MarketCalendar {
            opening_days: MARKET_OPENING_DAYS.to_vec(),
            window_days: MARKET_WINDOW_DAYS,
        }
    }
}

impl MarketCalendar {
    pub fn opens_on(&self, day: u16) -> bool {
        self.opening_days.contains(&day)
    }

    pub fn window_name(day: u16) -> &'static str {
        if day <= 182 { "winter" } else { "summer" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opens_only_on_configured_days() {
        let calendar = MarketCalendar::default();
        assert!(calendar.opens_on(60));
        assert!(calendar.opens_on(365));
        assert!(!calendar.opens_on(59));
        assert!(!calendar.opens_on(100));
    }

    #[test]
    fn window_names_follow_the_calendar_half() {
        assert_eq!(MarketCalendar::window_name(60), "winter");
        assert_eq!(MarketCalendar::window_name(365), "summer");
    }
}
