use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerPosition {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
}

impl PlayerPosition {
    pub fn short(&self) -> &'static str {
        match self {
            PlayerPosition::Goalkeeper => "GK",
            PlayerPosition::Defender => "DF",
            PlayerPosition::Midfielder => "MF",
            PlayerPosition::Forward => "FW",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: u32,
    pub name: String,
    pub position: PlayerPosition,
    pub rating: u8,
    pub age: u8,

    /// `None` marks a free agent.
    pub team_id: Option<u32>,
}
