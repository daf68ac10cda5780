use crate::career::CareerState;
use crate::club::Zone;
use crate::error::{CoreError, CoreResult};
use crate::league::{League, format_table, generate_fixture};
use crate::r#match::MatchSimulator;
use crate::repository::{Repository, TitleType};
use crate::season::progression::record_fixture_result;
use log::{info, warn};
use rand::Rng;

/// Resets tables and regenerates fixtures for `season` in every league.
/// Called once at career start and at every rollover; one league failing is
/// logged and skipped so the rest still get their schedules.
pub fn prepare_season<R: Rng>(
    repo: &mut dyn Repository,
    season: u16,
    rng: &mut R,
) -> CoreResult<()> {
    for league in repo.leagues()? {
        let outcome = repo
            .reset_standings(league.id, season)
            .and_then(|_| generate_fixture(repo, league.id, season, rng));

        if let Err(err) = outcome {
            warn!(
                "⚠️ could not prepare season {} for {}: {err}",
                season, league.name
            );
        }
    }
    Ok(())
}

/// Closes the finished season for every league in the system and opens the
/// next one: AI leagues play out their remaining fixtures, champions are
/// recorded, summaries are emitted, then tables reset and fresh fixtures are
/// drawn everywhere.
pub fn run_season_rollover<R: Rng>(
    repo: &mut dyn Repository,
    simulator: &dyn MatchSimulator,
    career: &CareerState,
    new_season: u16,
    rng: &mut R,
) -> CoreResult<Vec<String>> {
    let finished = new_season - 1;
    let mut messages = vec![format!("\n--- END OF SEASON {finished}! ---")];

    let leagues = repo.leagues()?;

    // the user's league leads the report, the rest follow
    let ordered = leagues
        .iter()
        .filter(|l| l.id == career.league_id)
        .chain(leagues.iter().filter(|l| l.id != career.league_id));

    for league in ordered {
        if league.id != career.league_id {
            // AI leagues only play day-by-day in the user's league; the rest
            // of the world catches up here in one sweep
            if let Err(err) = simulate_remaining_season(repo, simulator, league.id, finished, rng) {
                warn!(
                    "⚠️ could not finish season {} of {}: {err}",
                    finished, league.name
                );
                messages.push(format!(
                    "Warning: season {finished} of {} could not be fully simulated.",
                    league.name
                ));
            }
        }

        let highlight = (league.id == career.league_id).then_some(career.team_id);
        match summarize_league_season(repo, league, finished, highlight) {
            Ok(mut lines) => messages.append(&mut lines),
            Err(err) => {
                // one league's summary failing never blocks the others
                warn!(
                    "⚠️ season summary failed for {} season {}: {err}",
                    league.name, finished
                );
            }
        }
    }

    messages.push(format!("\n--- SEASON {new_season} KICKS OFF! ---"));
    messages.push(String::from(
        "Resetting tables and drawing new fixtures in every league...",
    ));
    prepare_season(repo, new_season, rng)?;

    Ok(messages)
}

/// Plays every still-unplayed fixture of one league's season in one sweep.
fn simulate_remaining_season<R: Rng>(
    repo: &mut dyn Repository,
    simulator: &dyn MatchSimulator,
    league_id: u32,
    season: u16,
    rng: &mut R,
) -> CoreResult<()> {
    let rounds = repo.rounds(league_id, season)?;
    if rounds.is_empty() {
        return Err(CoreError::InsufficientData(format!(
            "no rounds scheduled for league {league_id} season {season}"
        )));
    }

    for round in rounds {
        for fixture in repo.fixtures_in_round(round.id)? {
            if fixture.is_played() {
                continue;
            }

            let home = repo.team(fixture.home_id)?;
            let away = repo.team(fixture.away_id)?;
            let score = simulator.simulate(home.rating, away.rating, rng);

            if let Err(err) = record_fixture_result(repo, league_id, season, &fixture, score) {
                warn!("⚠️ skipping fixture {}: {err}", fixture.id);
            }
        }
    }

    info!("✅ season {season} fully simulated for league {league_id}");
    Ok(())
}

/// Champion, final table(s) and top players of one finished league season.
fn summarize_league_season(
    repo: &mut dyn Repository,
    league: &League,
    season: u16,
    highlight: Option<u32>,
) -> CoreResult<Vec<String>> {
    let mut messages = vec![format!("\n**{} - SEASON {} REVIEW:**", league.name, season)];

    // the split-zone league records its title at the promotion final; only
    // leagues without an honour yet crown the table leader here
    if let Some(existing) = repo.champion(league.id, season)? {
        let team = repo.team(existing.team_id)?;
        messages.push(format!(
            "🏆 Champions: **{}** ({})",
            team.name,
            existing.title.describe()
        ));
    } else {
        let table = repo.standings(league.id, season, None)?;
        let Some(top) = table.first() else {
            messages.push(String::from("No table data available."));
            return Ok(messages);
        };

        repo.record_champion(league.id, season, top.team_id, TitleType::LeagueChampion)?;
        messages.push(format!("🎉🏆 Champions: **{}**! 🏆🎉", top.team_name));
    }

    if league.is_split_zones() {
        for zone in Zone::BOTH {
            let rows = repo.standings(league.id, season, Some(zone))?;
            if rows.is_empty() {
                continue;
            }
            messages.push(format!("\n**Final table, {} ({zone}):**", league.name));
            messages.push(format_table(&rows, highlight));
        }
    } else {
        let rows = repo.standings(league.id, season, None)?;
        if !rows.is_empty() {
            messages.push(format!("\n**Final table, {}:**", league.name));
            messages.push(format_table(&rows, highlight));
        }
    }

    let top = repo.top_players(league.id, 5)?;
    if !top.is_empty() {
        messages.push(format!("\n**Top 5 players in {}:**", league.name));
        for (i, player) in top.iter().enumerate() {
            let club = match player.team_id {
                Some(id) => repo.team(id)?.name,
                None => String::from("free agent"),
            };
            messages.push(format!(
                "{}. {} ({club}) - rating {}",
                i + 1,
                player.name,
                player.rating
            ));
        }
    }

    Ok(messages)
}
