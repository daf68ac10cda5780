use crate::club::Zone;
use crate::error::CoreResult;
use crate::league::{League, StandingsRow, table_ordering};
use crate::r#match::{MatchSimulator, resolve_knockout};
use crate::repository::{PromotionKind, PromotionRecord, Repository, TitleType, with_transaction};
use log::{info, warn};
use rand::Rng;

/// Places 2 through 8 of a zone feed the Reducido's first round.
const CONTENDERS_PER_ZONE: usize = 7;

/// Runs the end-of-regular-phase bracket of the split-zone league: the zone
/// winners' final for the first promotion, then the Reducido knockout for the
/// second. A stage that cannot field its required participant count is
/// skipped with a warning; the stages that can run still do.
pub fn resolve_playoffs<R: Rng>(
    repo: &mut dyn Repository,
    simulator: &dyn MatchSimulator,
    league: &League,
    season: u16,
    rng: &mut R,
) -> CoreResult<Vec<String>> {
    let mut messages = Vec::new();

    let zone_a = repo.standings(league.id, season, Some(Zone::A))?;
    let zone_b = repo.standings(league.id, season, Some(Zone::B))?;

    let (Some(first_a), Some(first_b)) = (zone_a.first(), zone_b.first()) else {
        warn!(
            "⚠️ {}: a zone table is empty, skipping the promotion final",
            league.name
        );
        messages.push(String::from(
            "Warning: the promotion final could not be staged, a zone table is empty.",
        ));
        return Ok(messages);
    };

    // ----- Final for the first promotion -----

    messages.push(String::from("\n🏆 **FINAL FOR THE FIRST PROMOTION!** 🏆"));
    messages.push(format!(
        "The zone winners meet: **{}** (1st, Zona A) vs **{}** (1st, Zona B)",
        first_a.team_name, first_b.team_name
    ));

    let home = repo.team(first_a.team_id)?;
    let away = repo.team(first_b.team_id)?;
    let outcome = resolve_knockout(simulator, home.rating, away.rating, rng);

    let (winner, loser_row) = if outcome.home_won {
        (&home, first_b.clone())
    } else {
        (&away, first_a.clone())
    };

    messages.push(format!(
        "**{} {} {}**",
        home.name, outcome.score, away.name
    ));
    messages.push(format!(
        "🥳 Congratulations! **{}** takes the **first promotion** to Primera División.",
        winner.name
    ));

    let winner_id = winner.id;
    let league_id = league.id;
    with_transaction(repo, |repo| {
        repo.record_champion(league_id, season, winner_id, TitleType::DirectPromotion)?;
        repo.record_promotion(PromotionRecord {
            team_id: winner_id,
            from_league_id: league_id,
            to_league: String::from("Primera División"),
            season,
            kind: PromotionKind::Direct,
        })
    })?;
    info!(
        "🏆 {} season {}: {} promoted directly",
        league.name, season, winner.name
    );

    // ----- Reducido for the second promotion -----

    messages.push(String::from(
        "\n--- THE REDUCIDO FOR THE SECOND PROMOTION BEGINS! ---",
    ));

    let contenders_a: Vec<StandingsRow> = zone_a.iter().skip(1).take(CONTENDERS_PER_ZONE).cloned().collect();
    let contenders_b: Vec<StandingsRow> = zone_b.iter().skip(1).take(CONTENDERS_PER_ZONE).cloned().collect();

    let mut first_round_winners: Vec<StandingsRow> = Vec::new();
    if contenders_a.len() == CONTENDERS_PER_ZONE && contenders_b.len() == CONTENDERS_PER_ZONE {
        messages.push(String::from("\n--- Reducido, Primera Ronda ---"));

        // fixed cross-zone seeding, never zone against itself at this stage
        let pairings = [
            (&contenders_a[0], &contenders_b[6]), // A2 vs B8
            (&contenders_b[0], &contenders_a[6]), // B2 vs A8
            (&contenders_a[1], &contenders_b[5]), // A3 vs B7
            (&contenders_b[1], &contenders_a[5]), // B3 vs A7
            (&contenders_a[2], &contenders_b[4]), // A4 vs B6
            (&contenders_b[2], &contenders_a[4]), // B4 vs A6
            (&contenders_a[3], &contenders_b[3]), // A5 vs B5
        ];

        for (i, (home_row, away_row)) in pairings.iter().enumerate() {
            let (line, winner_row) =
                play_tie(repo, simulator, home_row, away_row, "Quarterfinals", rng)?;
            messages.push(format!("Tie {}: {}", i + 1, line));
            first_round_winners.push(winner_row);
        }
    } else {
        warn!(
            "⚠️ {}: Primera Ronda needs 7 contenders per zone, found A:{} B:{}",
            league.name,
            contenders_a.len(),
            contenders_b.len()
        );
        messages.push(format!(
            "Warning: not enough teams for the Primera Ronda (need places 2-8 of each zone, found A:{} B:{}).",
            contenders_a.len(),
            contenders_b.len()
        ));
    }

    // Quarterfinals: the 7 winners plus the loser of the direct final.
    let mut quarter_participants = first_round_winners;
    quarter_participants.push(loser_row);
    quarter_participants.sort_by(table_ordering);

    let mut semi_participants = if quarter_participants.len() == 8 {
        messages.push(String::from("\n--- Reducido, Quarterfinals ---"));
        play_seeded_stage(
            repo,
            simulator,
            &quarter_participants,
            "Semifinals",
            &mut messages,
            rng,
        )?
    } else {
        warn!(
            "⚠️ {}: quarterfinals need exactly 8 participants, found {}",
            league.name,
            quarter_participants.len()
        );
        messages.push(format!(
            "Warning: the quarterfinals need exactly 8 teams ({} found), stage skipped.",
            quarter_participants.len()
        ));
        Vec::new()
    };

    // Semifinals: the 4 quarterfinal winners.
    semi_participants.sort_by(table_ordering);

    let finalists = if semi_participants.len() == 4 {
        messages.push(String::from("\n--- Reducido, Semifinals ---"));
        play_seeded_stage(
            repo,
            simulator,
            &semi_participants,
            "the Reducido final",
            &mut messages,
            rng,
        )?
    } else {
        warn!(
            "⚠️ {}: semifinals need exactly 4 participants, found {}",
            league.name,
            semi_participants.len()
        );
        messages.push(format!(
            "Warning: the semifinals need exactly 4 teams ({} found), stage skipped.",
            semi_participants.len()
        ));
        Vec::new()
    };

    // Final: the 2 semifinal winners.
    if finalists.len() == 2 {
        messages.push(String::from("\n--- GRAND FINAL OF THE REDUCIDO! ---"));
        messages.push(format!(
            "**{}** vs **{}**",
            finalists[0].team_name, finalists[1].team_name
        ));

        let (line, winner_row) = play_tie(
            repo,
            simulator,
            &finalists[0],
            &finalists[1],
            "Primera División",
            rng,
        )?;
        messages.push(line);
        messages.push(format!(
            "🥳 Unbelievable! **{}** wins the Reducido and takes the **second promotion** to Primera División.",
            winner_row.team_name
        ));

        let winner_id = winner_row.team_id;
        with_transaction(repo, |repo| {
            repo.record_champion(league_id, season, winner_id, TitleType::PlayoffPromotion)?;
            repo.record_promotion(PromotionRecord {
                team_id: winner_id,
                from_league_id: league_id,
                to_league: String::from("Primera División"),
                season,
                kind: PromotionKind::Playoff,
            })
        })?;
        info!(
            "🏆 {} season {}: {} promoted through the Reducido",
            league.name, season, winner_row.team_name
        );
    } else if !finalists.is_empty() {
        warn!(
            "⚠️ {}: Reducido final needs 2 finalists, found {}",
            league.name,
            finalists.len()
        );
        messages.push(format!(
            "Warning: the Reducido final needs 2 finalists, found {}.",
            finalists.len()
        ));
    }

    Ok(messages)
}

/// One stage of rank-seeded ties: 1st vs last, 2nd vs second-last, and so on.
/// `participants` must already be ranked. Returns the winners.
fn play_seeded_stage<R: Rng>(
    repo: &mut dyn Repository,
    simulator: &dyn MatchSimulator,
    participants: &[StandingsRow],
    advances_to: &str,
    messages: &mut Vec<String>,
    rng: &mut R,
) -> CoreResult<Vec<StandingsRow>> {
    let mut winners = Vec::with_capacity(participants.len() / 2);

    for i in 0..participants.len() / 2 {
        let home_row = &participants[i];
        let away_row = &participants[participants.len() - 1 - i];

        let (line, winner_row) = play_tie(repo, simulator, home_row, away_row, advances_to, rng)?;
        messages.push(format!("Tie {}: {}", i + 1, line));
        winners.push(winner_row);
    }

    Ok(winners)
}

/// Plays a single knockout tie and narrates it.
fn play_tie<R: Rng>(
    repo: &mut dyn Repository,
    simulator: &dyn MatchSimulator,
    home_row: &StandingsRow,
    away_row: &StandingsRow,
    advances_to: &str,
    rng: &mut R,
) -> CoreResult<(String, StandingsRow)> {
    let home = repo.team(home_row.team_id)?;
    let away = repo.team(away_row.team_id)?;

    let outcome = resolve_knockout(simulator, home.rating, away.rating, rng);
    let winner_row = if outcome.home_won {
        home_row.clone()
    } else {
        away_row.clone()
    };

    let line = format!(
        "{} {} {} → **{}** advance to {}",
        home.name, outcome.score, away.name, winner_row.team_name, advances_to
    );
    Ok((line, winner_row))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::sort_table;

    fn ranked_row(team_id: u32, name: &str, points: u8, gd: i32, gf: i32) -> StandingsRow {
        let mut row = StandingsRow::zero(1, team_id, 1);
        row.team_name = name.to_string();
        row.points = points;
        row.goal_difference = gd;
        row.goals_for = gf;
        row
    }

    #[test]
    fn eight_participants_pair_first_against_last() {
        let mut rows: Vec<StandingsRow> = (1..=8)
            .map(|i| ranked_row(i, &format!("Seed {i}"), 60 - i as u8, 20 - i as i32, 40))
            .collect();

        // scramble, then rank the way the resolver does
        rows.swap(0, 5);
        rows.swap(2, 7);
        sort_table(&mut rows);

        let n = rows.len();
        let pairs: Vec<(u32, u32)> = (0..n / 2)
            .map(|i| (rows[i].team_id, rows[n - 1 - i].team_id))
            .collect();

        assert_eq!(pairs, vec![(1, 8), (2, 7), (3, 6), (4, 5)]);
    }

    #[test]
    fn ranking_breaks_point_ties_on_difference_then_goals() {
        let mut rows = vec![
            ranked_row(1, "Gimnasia", 50, 10, 30),
            ranked_row(2, "Ferro", 50, 12, 25),
            ranked_row(3, "Almirante", 50, 10, 33),
        ];
        sort_table(&mut rows);

        let ids: Vec<u32> = rows.iter().map(|r| r.team_id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }
}
