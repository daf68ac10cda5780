pub mod career;
pub mod club;
pub mod error;
pub mod league;
pub mod r#match;
pub mod repository;
pub mod season;
pub mod transfers;

pub mod shared;

// Re-export career items
pub use career::{CareerState, PendingAction, SessionStore};

// Re-export club items
pub use club::{Player, PlayerPosition, Team, Zone};

pub use error::{CoreError, CoreResult};

// Re-export league items
pub use league::{
    Fixture, FixturePlan, League, LeagueFormat, Pairing, Round, StandingsRow,
    double_round_robin, format_table, generate_fixture, plan_fixture, sort_table, table_ordering,
    SPLIT_ZONE_ROUNDS,
};

// Re-export match items
pub use r#match::{KnockoutOutcome, MatchSimulator, RatingSimulator, Score, resolve_knockout};

// Re-export repository items
pub use repository::{
    ChampionRecord, PromotionKind, PromotionRecord, Repository, TitleType, with_transaction,
};

// Re-export season items
pub use season::{
    OwnFixtureResult, SeasonEngine, prepare_season, record_fixture_result, resolve_playoffs,
    run_season_rollover, REGULAR_PHASE_END_DAY,
};

// Re-export transfer items
pub use transfers::{
    MarketCalendar, OfferKind, OfferStatus, SigningAttempt, TransferOffer, generate_ai_offer,
    market_value, respond_to_offer, simulate_ai_transfers, try_sign_for_user,
    MARKET_OPENING_DAYS, MARKET_WINDOW_DAYS,
};

pub use shared::{SeasonCalendar, format_money, ROUND_SPACING_DAYS, SEASON_DAYS};
