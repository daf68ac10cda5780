use chrono::NaiveDate;
use core::{
    CareerState, ChampionRecord, CoreError, CoreResult, Fixture, League, OfferStatus, Player,
    PromotionRecord, Repository, Round, Score, StandingsRow, Team, TitleType, TransferOffer, Zone,
    sort_table,
};
use log::debug;
use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
struct StoreState {
    leagues: Vec<League>,
    teams: Vec<Team>,
    players: Vec<Player>,
    rounds: Vec<Round>,
    fixtures: Vec<Fixture>,
    standings: Vec<StandingsRow>,
    careers: Vec<CareerState>,
    champions: Vec<ChampionRecord>,
    promotions: Vec<PromotionRecord>,
    offers: Vec<TransferOffer>,
    next_round_id: u32,
    next_fixture_id: u32,
    next_offer_id: u32,
}

/// In-memory backing store. Savepoints are whole-state snapshots: `begin`
/// pushes one, `rollback` restores it, which gives every logical operation
/// the all-or-nothing behaviour the engine expects.
pub struct CareerStore {
    state: StoreState,
    savepoints: Vec<StoreState>,
}

impl CareerStore {
    pub fn new(leagues: Vec<League>, teams: Vec<Team>, players: Vec<Player>) -> Self {
        CareerStore {
            state: StoreState {
                leagues,
                teams,
                players,
                next_round_id: 1,
                next_fixture_id: 1,
                next_offer_id: 1,
                ..Default::default()
            },
            savepoints: Vec::new(),
        }
    }

    fn team_name(&self, team_id: u32) -> String {
        self.state
            .teams
            .iter()
            .find(|t| t.id == team_id)
            .map(|t| t.name.clone())
            .unwrap_or_default()
    }

    fn named(&self, mut row: StandingsRow) -> StandingsRow {
        row.team_name = self.team_name(row.team_id);
        row
    }
}

impl Repository for CareerStore {
    // ----- reads -----

    fn league(&self, league_id: u32) -> CoreResult<League> {
        self.state
            .leagues
            .iter()
            .find(|l| l.id == league_id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("league", league_id))
    }

    fn leagues(&self) -> CoreResult<Vec<League>> {
        Ok(self.state.leagues.clone())
    }

    fn team(&self, team_id: u32) -> CoreResult<Team> {
        self.state
            .teams
            .iter()
            .find(|t| t.id == team_id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("team", team_id))
    }

    fn teams_in_league(&self, league_id: u32) -> CoreResult<Vec<Team>> {
        Ok(self
            .state
            .teams
            .iter()
            .filter(|t| t.league_id == league_id)
            .cloned()
            .collect())
    }

    fn player(&self, player_id: u32) -> CoreResult<Player> {
        self.state
            .players
            .iter()
            .find(|p| p.id == player_id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("player", player_id))
    }

    fn players_in_team(&self, team_id: u32) -> CoreResult<Vec<Player>> {
        Ok(self
            .state
            .players
            .iter()
            .filter(|p| p.team_id == Some(team_id))
            .cloned()
            .collect())
    }

    fn top_players(&self, league_id: u32, limit: usize) -> CoreResult<Vec<Player>> {
        let league_teams: HashSet<u32> = self
            .state
            .teams
            .iter()
            .filter(|t| t.league_id == league_id)
            .map(|t| t.id)
            .collect();

        let mut players: Vec<Player> = self
            .state
            .players
            .iter()
            .filter(|p| p.team_id.is_some_and(|id| league_teams.contains(&id)))
            .cloned()
            .collect();
        players.sort_by(|a, b| b.rating.cmp(&a.rating).then(a.name.cmp(&b.name)));
        players.truncate(limit);
        Ok(players)
    }

    fn career(&self, user_id: u64) -> CoreResult<CareerState> {
        self.state
            .careers
            .iter()
            .find(|c| c.user_id == user_id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("career", user_id))
    }

    fn standings(
        &self,
        league_id: u32,
        season: u16,
        zone: Option<Zone>,
    ) -> CoreResult<Vec<StandingsRow>> {
        let mut rows: Vec<StandingsRow> = self
            .state
            .standings
            .iter()
            .filter(|r| {
                r.league_id == league_id
                    && r.season == season
                    && (zone.is_none() || r.zone == zone)
            })
            .cloned()
            .map(|r| self.named(r))
            .collect();
        sort_table(&mut rows);
        Ok(rows)
    }

    fn standings_row(
        &self,
        league_id: u32,
        team_id: u32,
        season: u16,
    ) -> CoreResult<Option<StandingsRow>> {
        Ok(self
            .state
            .standings
            .iter()
            .find(|r| r.league_id == league_id && r.team_id == team_id && r.season == season)
            .cloned()
            .map(|r| self.named(r)))
    }

    fn rounds(&self, league_id: u32, season: u16) -> CoreResult<Vec<Round>> {
        let mut rounds: Vec<Round> = self
            .state
            .rounds
            .iter()
            .filter(|r| r.league_id == league_id && r.season == season)
            .cloned()
            .collect();
        rounds.sort_by_key(|r| r.number);
        Ok(rounds)
    }

    fn fixture(&self, fixture_id: u32) -> CoreResult<Fixture> {
        self.state
            .fixtures
            .iter()
            .find(|f| f.id == fixture_id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("fixture", fixture_id))
    }

    fn fixtures_in_round(&self, round_id: u32) -> CoreResult<Vec<Fixture>> {
        Ok(self
            .state
            .fixtures
            .iter()
            .filter(|f| f.round_id == round_id)
            .cloned()
            .collect())
    }

    fn unplayed_fixtures_on(
        &self,
        league_id: u32,
        season: u16,
        date: NaiveDate,
    ) -> CoreResult<Vec<Fixture>> {
        let round_ids: HashSet<u32> = self
            .state
            .rounds
            .iter()
            .filter(|r| r.league_id == league_id && r.season == season && r.date == date)
            .map(|r| r.id)
            .collect();

        Ok(self
            .state
            .fixtures
            .iter()
            .filter(|f| round_ids.contains(&f.round_id) && !f.is_played())
            .cloned()
            .collect())
    }

    fn champion(&self, league_id: u32, season: u16) -> CoreResult<Option<ChampionRecord>> {
        Ok(self
            .state
            .champions
            .iter()
            .find(|c| c.league_id == league_id && c.season == season)
            .cloned())
    }

    fn honours(&self, league_id: u32) -> CoreResult<Vec<ChampionRecord>> {
        Ok(self
            .state
            .champions
            .iter()
            .filter(|c| c.league_id == league_id)
            .cloned()
            .collect())
    }

    fn offer(&self, offer_id: u32) -> CoreResult<TransferOffer> {
        self.state
            .offers
            .iter()
            .find(|o| o.id == offer_id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("offer", offer_id))
    }

    fn pending_offers_for_team(&self, team_id: u32) -> CoreResult<Vec<TransferOffer>> {
        Ok(self
            .state
            .offers
            .iter()
            .filter(|o| o.owner_team_id == team_id && o.status == OfferStatus::Pending)
            .cloned()
            .collect())
    }

    // ----- writes -----

    fn create_career(&mut self, career: CareerState) -> CoreResult<()> {
        if self.state.careers.iter().any(|c| c.user_id == career.user_id) {
            return Err(CoreError::Persistence(format!(
                "career already exists for user {}",
                career.user_id
            )));
        }
        self.state.careers.push(career);
        Ok(())
    }

    fn set_career_progress(
        &mut self,
        user_id: u64,
        day: u16,
        season: u16,
        market_days: u8,
    ) -> CoreResult<()> {
        let career = self
            .state
            .careers
            .iter_mut()
            .find(|c| c.user_id == user_id)
            .ok_or_else(|| CoreError::not_found("career", user_id))?;
        career.day = day;
        career.season = season;
        career.market_days_remaining = market_days;
        Ok(())
    }

    fn set_career_budget(&mut self, user_id: u64, budget: i64) -> CoreResult<()> {
        let career = self
            .state
            .careers
            .iter_mut()
            .find(|c| c.user_id == user_id)
            .ok_or_else(|| CoreError::not_found("career", user_id))?;
        career.budget = budget;
        Ok(())
    }

    fn set_team_zone(&mut self, team_id: u32, zone: Option<Zone>) -> CoreResult<()> {
        let team = self
            .state
            .teams
            .iter_mut()
            .find(|t| t.id == team_id)
            .ok_or_else(|| CoreError::not_found("team", team_id))?;
        team.zone = zone;
        Ok(())
    }

    fn delete_rounds(&mut self, league_id: u32, season: u16) -> CoreResult<()> {
        let doomed: HashSet<u32> = self
            .state
            .rounds
            .iter()
            .filter(|r| r.league_id == league_id && r.season == season)
            .map(|r| r.id)
            .collect();

        self.state.fixtures.retain(|f| !doomed.contains(&f.round_id));
        self.state
            .rounds
            .retain(|r| !(r.league_id == league_id && r.season == season));

        debug!(
            "deleted {} round(s) for league {league_id} season {season}",
            doomed.len()
        );
        Ok(())
    }

    fn create_round(
        &mut self,
        league_id: u32,
        season: u16,
        number: u8,
        date: NaiveDate,
    ) -> CoreResult<u32> {
        if !self.state.leagues.iter().any(|l| l.id == league_id) {
            return Err(CoreError::not_found("league", league_id));
        }
        // unique per (league, season, number)
        if self
            .state
            .rounds
            .iter()
            .any(|r| r.league_id == league_id && r.season == season && r.number == number)
        {
            return Err(CoreError::Persistence(format!(
                "round {number} already exists for league {league_id} season {season}"
            )));
        }

        let id = self.state.next_round_id;
        self.state.next_round_id += 1;
        self.state.rounds.push(Round {
            id,
            league_id,
            season,
            number,
            date,
        });
        Ok(id)
    }

    fn create_fixture(
        &mut self,
        round_id: u32,
        home_id: u32,
        away_id: u32,
        zone: Option<Zone>,
    ) -> CoreResult<u32> {
        if !self.state.rounds.iter().any(|r| r.id == round_id) {
            return Err(CoreError::not_found("round", round_id));
        }

        let id = self.state.next_fixture_id;
        self.state.next_fixture_id += 1;
        self.state.fixtures.push(Fixture {
            id,
            round_id,
            home_id,
            away_id,
            zone,
            result: None,
        });
        Ok(id)
    }

    fn set_fixture_result(&mut self, fixture_id: u32, score: Score) -> CoreResult<()> {
        let fixture = self
            .state
            .fixtures
            .iter_mut()
            .find(|f| f.id == fixture_id)
            .ok_or_else(|| CoreError::not_found("fixture", fixture_id))?;
        fixture.result = Some(score);
        Ok(())
    }

    fn upsert_standings_row(&mut self, row: &StandingsRow) -> CoreResult<()> {
        let name = self.team_name(row.team_id);

        match self.state.standings.iter_mut().find(|r| {
            r.league_id == row.league_id && r.team_id == row.team_id && r.season == row.season
        }) {
            Some(existing) => {
                *existing = row.clone();
                existing.team_name = name;
            }
            None => {
                let mut fresh = row.clone();
                fresh.team_name = name;
                self.state.standings.push(fresh);
            }
        }
        Ok(())
    }

    fn reset_standings(&mut self, league_id: u32, season: u16) -> CoreResult<()> {
        let team_ids: Vec<u32> = self
            .state
            .teams
            .iter()
            .filter(|t| t.league_id == league_id)
            .map(|t| t.id)
            .collect();
        if team_ids.is_empty() {
            return Err(CoreError::InsufficientData(format!(
                "league {league_id} has no teams to reset"
            )));
        }

        for team_id in team_ids {
            let zero = StandingsRow::zero(league_id, team_id, season);
            self.upsert_standings_row(&zero)?;
        }
        Ok(())
    }

    fn record_champion(
        &mut self,
        league_id: u32,
        season: u16,
        team_id: u32,
        title: TitleType,
    ) -> CoreResult<()> {
        self.state
            .champions
            .retain(|c| !(c.league_id == league_id && c.season == season && c.title == title));
        self.state.champions.push(ChampionRecord {
            league_id,
            season,
            team_id,
            title,
        });
        Ok(())
    }

    fn record_promotion(&mut self, record: PromotionRecord) -> CoreResult<()> {
        self.state.promotions.push(record);
        Ok(())
    }

    fn transfer_player(&mut self, player_id: u32, to_team: u32) -> CoreResult<()> {
        if !self.state.teams.iter().any(|t| t.id == to_team) {
            return Err(CoreError::not_found("team", to_team));
        }
        let player = self
            .state
            .players
            .iter_mut()
            .find(|p| p.id == player_id)
            .ok_or_else(|| CoreError::not_found("player", player_id))?;
        player.team_id = Some(to_team);
        Ok(())
    }

    fn save_offer(&mut self, mut offer: TransferOffer) -> CoreResult<u32> {
        let id = self.state.next_offer_id;
        self.state.next_offer_id += 1;
        offer.id = id;
        self.state.offers.push(offer);
        Ok(id)
    }

    fn set_offer_status(&mut self, offer_id: u32, status: OfferStatus) -> CoreResult<()> {
        let offer = self
            .state
            .offers
            .iter_mut()
            .find(|o| o.id == offer_id)
            .ok_or_else(|| CoreError::not_found("offer", offer_id))?;
        offer.status = status;
        Ok(())
    }

    // ----- transaction scope -----

    fn begin(&mut self) -> CoreResult<()> {
        self.savepoints.push(self.state.clone());
        Ok(())
    }

    fn commit(&mut self) -> CoreResult<()> {
        self.savepoints
            .pop()
            .map(|_| ())
            .ok_or_else(|| CoreError::Persistence(String::from("commit without an open savepoint")))
    }

    fn rollback(&mut self) -> CoreResult<()> {
        let snapshot = self.savepoints.pop().ok_or_else(|| {
            CoreError::Persistence(String::from("rollback without an open savepoint"))
        })?;
        self.state = snapshot;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::{LeagueFormat, generate_fixture, with_transaction};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn seeded_store(team_count: u8) -> CareerStore {
        let league = League::new(
            1,
            String::from("Liga Test"),
            String::from("Argentina"),
            team_count,
            LeagueFormat::SingleTable,
        );
        let teams = (1..=team_count as u32)
            .map(|i| Team::new(i, format!("Club {i}"), 1, 64))
            .collect();
        CareerStore::new(vec![league], teams, Vec::new())
    }

    #[test]
    fn generated_fixture_persists_rounds_with_dates() {
        let mut store = seeded_store(4);
        let mut rng = StdRng::seed_from_u64(2);

        generate_fixture(&mut store, 1, 1, &mut rng).unwrap();

        let rounds = store.rounds(1, 1).unwrap();
        assert_eq!(rounds.len(), 6);
        assert_eq!(rounds[0].date, core::SeasonCalendar::round_date(1, 0));
        assert_eq!(rounds[5].date, core::SeasonCalendar::round_date(1, 5));

        for round in &rounds {
            assert_eq!(store.fixtures_in_round(round.id).unwrap().len(), 2);
        }
    }

    #[test]
    fn regeneration_replaces_the_old_schedule_wholesale() {
        let mut store = seeded_store(4);
        let mut rng = StdRng::seed_from_u64(3);

        generate_fixture(&mut store, 1, 1, &mut rng).unwrap();
        let old_ids: Vec<u32> = store.rounds(1, 1).unwrap().iter().map(|r| r.id).collect();

        generate_fixture(&mut store, 1, 1, &mut rng).unwrap();
        let rounds = store.rounds(1, 1).unwrap();
        assert_eq!(rounds.len(), 6);
        assert!(rounds.iter().all(|r| !old_ids.contains(&r.id)));
    }

    #[test]
    fn rollback_restores_deletions_and_insertions() {
        let mut store = seeded_store(4);
        let mut rng = StdRng::seed_from_u64(4);
        generate_fixture(&mut store, 1, 1, &mut rng).unwrap();

        let before: Vec<u32> = store.rounds(1, 1).unwrap().iter().map(|r| r.id).collect();

        // a regeneration that blows up halfway must leave no trace
        let result: CoreResult<()> = with_transaction(&mut store, |repo| {
            repo.delete_rounds(1, 1)?;
            repo.create_round(1, 1, 1, core::SeasonCalendar::round_date(1, 0))?;
            // duplicate round number -> persistence failure
            repo.create_round(1, 1, 1, core::SeasonCalendar::round_date(1, 0))?;
            Ok(())
        });
        assert!(result.is_err());

        let after: Vec<u32> = store.rounds(1, 1).unwrap().iter().map(|r| r.id).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn reset_standings_is_idempotent() {
        let mut store = seeded_store(3);

        let mut row = StandingsRow::zero(1, 2, 1);
        row.played = 4;
        row.won = 3;
        row.points = 9;
        row.zone = Some(Zone::A);
        store.upsert_standings_row(&row).unwrap();

        store.reset_standings(1, 1).unwrap();
        let first = store.standings(1, 1, None).unwrap();

        store.reset_standings(1, 1).unwrap();
        let second = store.standings(1, 1, None).unwrap();

        assert_eq!(first.len(), 3);
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.team_id, b.team_id);
            assert_eq!((a.played, a.points, a.zone), (0, 0, None));
            assert_eq!((b.played, b.points, b.zone), (0, 0, None));
        }
    }

    #[test]
    fn unplayed_filter_skips_finished_fixtures() {
        let mut store = seeded_store(4);
        let mut rng = StdRng::seed_from_u64(5);
        generate_fixture(&mut store, 1, 1, &mut rng).unwrap();

        let first_round = store.rounds(1, 1).unwrap()[0].clone();
        let fixtures = store
            .unplayed_fixtures_on(1, 1, first_round.date)
            .unwrap();
        assert_eq!(fixtures.len(), 2);

        store
            .set_fixture_result(fixtures[0].id, Score::new(2, 0))
            .unwrap();
        let remaining = store
            .unplayed_fixtures_on(1, 1, first_round.date)
            .unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, fixtures[1].id);
    }

    #[test]
    fn standings_come_back_named_and_sorted() {
        let mut store = seeded_store(3);

        for (team_id, points) in [(1u32, 4u8), (2, 9), (3, 7)] {
            let mut row = StandingsRow::zero(1, team_id, 1);
            row.points = points;
            store.upsert_standings_row(&row).unwrap();
        }

        let rows = store.standings(1, 1, None).unwrap();
        let names: Vec<&str> = rows.iter().map(|r| r.team_name.as_str()).collect();
        assert_eq!(names, vec!["Club 2", "Club 3", "Club 1"]);
    }
}
