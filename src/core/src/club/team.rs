use serde::{Deserialize, Serialize};
use std::fmt;

/// One half of a split-zone league. Membership is redrawn at random every
/// time the fixture is regenerated, never fixed across seasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    A,
    B,
}

impl Zone {
    pub const BOTH: [Zone; 2] = [Zone::A, Zone::B];
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::A => write!(f, "Zona A"),
            Zone::B => write!(f, "Zona B"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: u32,
    pub name: String,
    pub league_id: u32,

    /// Overall strength rating, the single input to match-outcome probability.
    pub rating: u8,

    /// Current zone for split-zone leagues, `None` everywhere else.
    pub zone: Option<Zone>,
}

impl Team {
    pub fn new(id: u32, name: String, league_id: u32, rating: u8) -> Self {
        Team {
            id,
            name,
            league_id,
            rating,
            zone: None,
        }
    }
}
