use crate::club::Zone;
use crate::r#match::Score;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One match-day of a league season. Unique per (league, season, number).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    pub id: u32,
    pub league_id: u32,
    pub season: u16,
    pub number: u8,
    pub date: NaiveDate,
}

/// One scheduled pairing inside a round. The result stays empty until the
/// match is resolved; a team appears at most once per round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fixture {
    pub id: u32,
    pub round_id: u32,
    pub home_id: u32,
    pub away_id: u32,
    pub zone: Option<Zone>,
    pub result: Option<Score>,
}

impl Fixture {
    pub fn is_played(&self) -> bool {
        self.result.is_some()
    }

    pub fn involves(&self, team_id: u32) -> bool {
        self.home_id == team_id || self.away_id == team_id
    }
}
