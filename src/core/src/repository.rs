use crate::career::CareerState;
use crate::club::{Player, Team, Zone};
use crate::error::CoreResult;
use crate::league::{Fixture, League, Round, StandingsRow};
use crate::r#match::Score;
use crate::transfers::{OfferStatus, TransferOffer};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Honour kinds recorded per (league, season). The split-zone league hands
/// out several distinct titles in one season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TitleType {
    LeagueChampion,
    DirectPromotion,
    PlayoffPromotion,
}

impl TitleType {
    pub fn describe(&self) -> &'static str {
        match self {
            TitleType::LeagueChampion => "League Champion",
            TitleType::DirectPromotion => "Zone Final Winner - Direct Promotion",
            TitleType::PlayoffPromotion => "Reducido Winner - Promotion",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChampionRecord {
    pub league_id: u32,
    pub season: u16,
    pub team_id: u32,
    pub title: TitleType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PromotionKind {
    Direct,
    Playoff,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromotionRecord {
    pub team_id: u32,
    pub from_league_id: u32,
    pub to_league: String,
    pub season: u16,
    pub kind: PromotionKind,
}

/// The storage seam the engine runs against. One implementation lives in the
/// `database` crate; tests substitute their own.
///
/// Mutations between `begin` and `commit` form one logical transaction:
/// `rollback` restores every deletion and insertion made since `begin`.
/// Callers hold `&mut` access, which serializes writers per operation.
pub trait Repository {
    // ----- reads -----
    fn league(&self, league_id: u32) -> CoreResult<League>;
    fn leagues(&self) -> CoreResult<Vec<League>>;
    fn team(&self, team_id: u32) -> CoreResult<Team>;
    fn teams_in_league(&self, league_id: u32) -> CoreResult<Vec<Team>>;
    fn player(&self, player_id: u32) -> CoreResult<Player>;
    fn players_in_team(&self, team_id: u32) -> CoreResult<Vec<Player>>;
    /// Best players of a league by rating, strongest first.
    fn top_players(&self, league_id: u32, limit: usize) -> CoreResult<Vec<Player>>;
    fn career(&self, user_id: u64) -> CoreResult<CareerState>;
    /// Rows in table order (points, goal difference, goals for, name).
    fn standings(
        &self,
        league_id: u32,
        season: u16,
        zone: Option<Zone>,
    ) -> CoreResult<Vec<StandingsRow>>;
    fn standings_row(
        &self,
        league_id: u32,
        team_id: u32,
        season: u16,
    ) -> CoreResult<Option<StandingsRow>>;
    fn rounds(&self, league_id: u32, season: u16) -> CoreResult<Vec<Round>>;
    fn fixture(&self, fixture_id: u32) -> CoreResult<Fixture>;
    fn fixtures_in_round(&self, round_id: u32) -> CoreResult<Vec<Fixture>>;
    /// Unplayed fixtures of one league scheduled for `date`.
    fn unplayed_fixtures_on(
        &self,
        league_id: u32,
        season: u16,
        date: NaiveDate,
    ) -> CoreResult<Vec<Fixture>>;
    fn champion(&self, league_id: u32, season: u16) -> CoreResult<Option<ChampionRecord>>;
    fn honours(&self, league_id: u32) -> CoreResult<Vec<ChampionRecord>>;
    fn offer(&self, offer_id: u32) -> CoreResult<TransferOffer>;
    fn pending_offers_for_team(&self, team_id: u32) -> CoreResult<Vec<TransferOffer>>;

    // ----- writes -----
    fn create_career(&mut self, career: CareerState) -> CoreResult<()>;
    fn set_career_progress(
        &mut self,
        user_id: u64,
        day: u16,
        season: u16,
        market_days: u8,
    ) -> CoreResult<()>;
    fn set_career_budget(&mut self, user_id: u64, budget: i64) -> CoreResult<()>;
    fn set_team_zone(&mut self, team_id: u32, zone: Option<Zone>) -> CoreResult<()>;
    fn delete_rounds(&mut self, league_id: u32, season: u16) -> CoreResult<()>;
    fn create_round(
        &mut self,
        league_id: u32,
        season: u16,
        number: u8,
        date: NaiveDate,
    ) -> CoreResult<u32>;
    fn create_fixture(
        &mut self,
        round_id: u32,
        home_id: u32,
        away_id: u32,
        zone: Option<Zone>,
    ) -> CoreResult<u32>;
    fn set_fixture_result(&mut self, fixture_id: u32, score: Score) -> CoreResult<()>;
    fn upsert_standings_row(&mut self, row: &StandingsRow) -> CoreResult<()>;
    /// Writes an all-zero row with a cleared zone for every team of the
    /// league. Idempotent.
    fn reset_standings(&mut self, league_id: u32, season: u16) -> CoreResult<()>;
    fn record_champion(
        &mut self,
        league_id: u32,
        season: u16,
        team_id: u32,
        title: TitleType,
    ) -> CoreResult<()>;
    fn record_promotion(&mut self, record: PromotionRecord) -> CoreResult<()>;
    fn transfer_player(&mut self, player_id: u32, to_team: u32) -> CoreResult<()>;
    fn save_offer(&mut self, offer: TransferOffer) -> CoreResult<u32>;
    fn set_offer_status(&mut self, offer_id: u32, status: OfferStatus) -> CoreResult<()>;

    // ----- transaction scope -----
    fn begin(&mut self) -> CoreResult<()>;
    fn commit(&mut self) -> CoreResult<()>;
    fn rollback(&mut self) -> CoreResult<()>;
}

/// Runs `f` inside a savepoint: committed on success, fully rolled back on
/// error, so a failed operation never leaves partial state behind.
pub fn with_transaction<T>(
    repo: &mut dyn Repository,
    f: impl FnOnce(&mut dyn Repository) -> CoreResult<T>,
) -> CoreResult<T> {
    repo.begin()?;
    match f(repo) {
        Ok(value) => {
            repo.commit()?;
            Ok(value)
        }
        Err(err) => {
            repo.rollback()?;
            Err(err)
        }
    }
}
