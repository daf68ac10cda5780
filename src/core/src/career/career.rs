use crate::shared::SeasonCalendar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per-user career progress. `day` counts 1..=365 inside the season; the
/// market counter at zero means the transfer window is closed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CareerState {
    pub user_id: u64,
    pub team_id: u32,
    pub league_id: u32,
    pub day: u16,
    pub season: u16,
    pub market_days_remaining: u8,
    pub budget: i64,
}

impl CareerState {
    pub fn new(user_id: u64, team_id: u32, league_id: u32, budget: i64) -> Self {
        CareerState {
            user_id,
            team_id,
            league_id,
            day: 1,
            season: 1,
            market_days_remaining: 0,
            budget,
        }
    }

    pub fn current_date(&self) -> NaiveDate {
        SeasonCalendar::date_for(self.season, self.day)
    }

    pub fn is_market_open(&self) -> bool {
        self.market_days_remaining > 0
    }
}
