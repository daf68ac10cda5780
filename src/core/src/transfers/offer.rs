use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OfferStatus {
    Pending,
    Accepted,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OfferKind {
    /// An AI club bidding for one of the user's players.
    AiBuysFromUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferOffer {
    pub id: u32,
    pub player_id: u32,
    pub bidder_team_id: u32,
    pub owner_team_id: u32,
    pub amount: i64,
    pub kind: OfferKind,
    pub status: OfferStatus,
}
