use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeagueFormat {
    /// One shared table, straight double round-robin.
    SingleTable,

    /// Two zones drawn fresh every season, a fixed 34-round regular phase,
    /// then a promotion final plus the Reducido knockout bracket.
    SplitZones,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct League {
    pub id: u32,
    pub name: String,
    pub country: String,
    pub team_count: u8,
    pub format: LeagueFormat,
}

impl League {
    pub fn new(id: u32, name: String, country: String, team_count: u8, format: LeagueFormat) -> Self {
        League {
            id,
            name,
            country,
            team_count,
            format,
        }
    }

    pub fn is_split_zones(&self) -> bool {
        self.format == LeagueFormat::SplitZones
    }
}
