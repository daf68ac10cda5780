use crate::career::CareerState;
use crate::error::{CoreError, CoreResult};
use crate::league::{Fixture, apply_result, StandingsRow};
use crate::r#match::{MatchSimulator, Score};
use crate::repository::{Repository, with_transaction};
use crate::season::playoff::resolve_playoffs;
use crate::season::rollover::run_season_rollover;
use crate::shared::{SEASON_DAYS, SeasonCalendar};
use crate::transfers::{MarketCalendar, generate_ai_offer, simulate_ai_transfers};
use chrono::NaiveDate;
use log::{debug, info, warn};
use rand::prelude::*;

/// Day of the season on which the split-zone league's regular phase is
/// declared over and the promotion bracket runs.
pub const REGULAR_PHASE_END_DAY: u16 = 200;

/// How the user's own fixture gets settled before the day advances.
#[derive(Debug, Clone, Copy)]
pub enum OwnFixtureResult {
    /// Let the simulator decide.
    Simulated,
    /// The user typed in the final score; validated before use.
    Manual { home_goals: i32, away_goals: i32 },
}

/// Persists one result and folds it into both standings rows as a single
/// transaction, so a half-applied standings batch can never be observed.
pub fn record_fixture_result(
    repo: &mut dyn Repository,
    league_id: u32,
    season: u16,
    fixture: &Fixture,
    score: Score,
) -> CoreResult<()> {
    if fixture.is_played() {
        return Err(CoreError::InvalidInput(format!(
            "fixture {} has already been played",
            fixture.id
        )));
    }

    with_transaction(repo, |repo| {
        repo.set_fixture_result(fixture.id, score)?;

        let mut home = repo
            .standings_row(league_id, fixture.home_id, season)?
            .unwrap_or_else(|| StandingsRow::zero(league_id, fixture.home_id, season));
        let mut away = repo
            .standings_row(league_id, fixture.away_id, season)?
            .unwrap_or_else(|| StandingsRow::zero(league_id, fixture.away_id, season));

        apply_result(&mut home, &mut away, &score, fixture.zone);

        repo.upsert_standings_row(&home)?;
        repo.upsert_standings_row(&away)
    })
}

/// Drives a career one simulated day at a time. Holds the repository and the
/// match simulator for the whole conversation turn; every public method is a
/// complete request/response operation.
pub struct SeasonEngine<'a> {
    repo: &'a mut dyn Repository,
    simulator: &'a dyn MatchSimulator,
    market: MarketCalendar,
}

impl<'a> SeasonEngine<'a> {
    pub fn new(repo: &'a mut dyn Repository, simulator: &'a dyn MatchSimulator) -> Self {
        SeasonEngine {
            repo,
            simulator,
            market: MarketCalendar::default(),
        }
    }

    pub fn with_market(
        repo: &'a mut dyn Repository,
        simulator: &'a dyn MatchSimulator,
        market: MarketCalendar,
    ) -> Self {
        SeasonEngine {
            repo,
            simulator,
            market,
        }
    }

    /// The user's own unplayed fixture scheduled for today, if any. Callers
    /// settle it through `resolve_own_fixture` before advancing the day.
    pub fn own_fixture_today(&self, user_id: u64) -> CoreResult<Option<Fixture>> {
        let career = self.repo.career(user_id)?;
        let date = career.current_date();

        let fixtures =
            self.repo
                .unplayed_fixtures_on(career.league_id, career.season, date)?;
        Ok(fixtures.into_iter().find(|f| f.involves(career.team_id)))
    }

    /// Settles the user's fixture, the externally triggered path that runs
    /// before `advance_day` on match days.
    pub fn resolve_own_fixture<R: Rng>(
        &mut self,
        user_id: u64,
        fixture_id: u32,
        result: OwnFixtureResult,
        rng: &mut R,
    ) -> CoreResult<String> {
        let career = self.repo.career(user_id)?;
        let fixture = self.repo.fixture(fixture_id)?;

        if fixture.is_played() {
            return Err(CoreError::InvalidInput(format!(
                "fixture {fixture_id} has already been played"
            )));
        }
        if !fixture.involves(career.team_id) {
            return Err(CoreError::InvalidInput(format!(
                "fixture {fixture_id} does not involve your team"
            )));
        }

        let home = self.repo.team(fixture.home_id)?;
        let away = self.repo.team(fixture.away_id)?;

        let score = match result {
            OwnFixtureResult::Simulated => self.simulator.simulate(home.rating, away.rating, rng),
            OwnFixtureResult::Manual {
                home_goals,
                away_goals,
            } => {
                if !(0..=99).contains(&home_goals) || !(0..=99).contains(&away_goals) {
                    return Err(CoreError::InvalidInput(String::from(
                        "goals must be between 0 and 99",
                    )));
                }
                Score::new(home_goals as u8, away_goals as u8)
            }
        };

        record_fixture_result(
            &mut *self.repo,
            career.league_id,
            career.season,
            &fixture,
            score,
        )?;

        Ok(format!(
            "🏟️ Your match: **{} {} {}**",
            home.name, score, away.name
        ))
    }

    /// Advances the career by exactly one simulated day and returns the
    /// narrative of everything that happened. Not idempotent: once the day
    /// increment is committed, calling again advances a new day.
    pub fn advance_day<R: Rng>(&mut self, user_id: u64, rng: &mut R) -> CoreResult<Vec<String>> {
        let career = self.repo.career(user_id)?;
        let league = self.repo.league(career.league_id)?;
        let date = SeasonCalendar::date_for(career.season, career.day);

        debug!(
            "advance_day: user {} day {} season {} ({})",
            user_id, career.day, career.season, date
        );

        let mut messages = vec![format!(
            "**Day {} of Season {} ({})**",
            career.day, career.season, date
        )];

        // ===== AI MATCHES OF THE DAY =====
        // Resolved before market and rollover steps, so same-day standings
        // checks always see today's results.
        self.play_ai_fixtures(&career, date, &mut messages, rng)?;

        // ===== TRANSFER MARKET =====
        let market_days = self.tick_market(&career, &mut messages, rng)?;

        // ===== REGULAR-PHASE BOUNDARY =====
        if league.is_split_zones() && career.day == REGULAR_PHASE_END_DAY {
            messages.push(format!(
                "\n⚽ The regular phase of the {} is over! ⚽",
                league.name
            ));
            messages.push(String::from(
                "Computing the final zone tables and setting up the promotion final and the Reducido...",
            ));

            match resolve_playoffs(&mut *self.repo, self.simulator, &league, career.season, rng) {
                Ok(mut lines) => messages.append(&mut lines),
                Err(err) => {
                    warn!("⚠️ playoff resolution failed for {}: {err}", league.name);
                    messages.push(format!("Warning: the promotion playoffs failed: {err}"));
                }
            }
        }

        // ===== DAY / SEASON ROLLOVER =====
        let mut next_day = career.day + 1;
        let mut season = career.season;

        if next_day > SEASON_DAYS {
            next_day = 1;
            season += 1;
            info!(
                "🔄 season rollover for user {}: {} -> {}",
                user_id, career.season, season
            );
            let mut lines =
                run_season_rollover(&mut *self.repo, self.simulator, &career, season, rng)?;
            messages.append(&mut lines);
        }

        self.repo
            .set_career_progress(user_id, next_day, season, market_days)?;

        if messages.len() == 1 {
            messages.push(String::from("The day passed without further news."));
        }

        Ok(messages)
    }

    // ========== DAY STEPS ==========

    fn play_ai_fixtures<R: Rng>(
        &mut self,
        career: &CareerState,
        date: NaiveDate,
        messages: &mut Vec<String>,
        rng: &mut R,
    ) -> CoreResult<()> {
        let fixtures =
            self.repo
                .unplayed_fixtures_on(career.league_id, career.season, date)?;
        let ai_fixtures: Vec<Fixture> = fixtures
            .into_iter()
            .filter(|f| !f.involves(career.team_id))
            .collect();

        if ai_fixtures.is_empty() {
            return Ok(());
        }

        messages.push(String::from("\n**Around the league:**"));
        for fixture in ai_fixtures {
            // one bad fixture never takes the rest of the day down
            match self.play_fixture(career.league_id, career.season, &fixture, rng) {
                Ok(line) => messages.push(line),
                Err(err) => {
                    warn!("⚠️ could not resolve fixture {}: {err}", fixture.id);
                }
            }
        }

        Ok(())
    }

    fn play_fixture<R: Rng>(
        &mut self,
        league_id: u32,
        season: u16,
        fixture: &Fixture,
        rng: &mut R,
    ) -> CoreResult<String> {
        let home = self.repo.team(fixture.home_id)?;
        let away = self.repo.team(fixture.away_id)?;

        let score = self.simulator.simulate(home.rating, away.rating, rng);
        record_fixture_result(&mut *self.repo, league_id, season, fixture, score)?;

        Ok(format!("- {} {} {}", home.name, score, away.name))
    }

    fn tick_market<R: Rng>(
        &mut self,
        career: &CareerState,
        messages: &mut Vec<String>,
        rng: &mut R,
    ) -> CoreResult<u8> {
        let mut remaining = career.market_days_remaining;

        if remaining > 0 {
            remaining -= 1;
            messages.push(format!(
                "🔁 Transfer market open. Days remaining: {remaining}."
            ));

            if rng.random_bool(0.2) {
                if let Some((_, line)) = generate_ai_offer(&mut *self.repo, career.user_id, rng)? {
                    messages.push(line);
                }
            }

            if rng.random_bool(0.5) {
                let news = simulate_ai_transfers(
                    &mut *self.repo,
                    career.league_id,
                    Some(career.team_id),
                    rng,
                )?;
                if !news.is_empty() {
                    messages.push(String::from("\n**Transfer news in your league:**"));
                    messages.extend(news);
                }

                let mut others: Vec<_> = self
                    .repo
                    .leagues()?
                    .into_iter()
                    .filter(|l| l.id != career.league_id)
                    .collect();
                if !others.is_empty() && rng.random_bool(0.7) {
                    others.shuffle(rng);
                    for league in others.iter().take(2) {
                        let news = simulate_ai_transfers(&mut *self.repo, league.id, None, rng)?;
                        if !news.is_empty() {
                            messages.push(format!("\n**Transfer news in {}:**", league.name));
                            messages.extend(news);
                        }
                    }
                }
            }
        } else if self.market.opens_on(career.day) {
            remaining = self.market.window_days;
            messages.push(format!(
                "🟢 The {} transfer window is open! You have **{} days** to do business.",
                MarketCalendar::window_name(career.day),
                remaining
            ));
        }

        Ok(remaining)
    }
}
