use crate::club::{Team, Zone};
use crate::error::{CoreError, CoreResult};
use crate::league::{League, LeagueFormat};
use crate::repository::{Repository, with_transaction};
use crate::shared::SeasonCalendar;
use itertools::{EitherOrBoth, Itertools};
use log::{info, warn};
use rand::prelude::*;

/// Global round count of the split-zone regular phase: 18 teams per zone,
/// 17-round single round-robin, two legs. Smaller zones fall short of this
/// target; the deficit is accepted and logged, never padded.
pub const SPLIT_ZONE_ROUNDS: usize = 34;

/// One scheduled pairing before persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pairing {
    pub home_id: u32,
    pub away_id: u32,
    pub zone: Option<Zone>,
}

/// A fully planned season schedule plus the zone draw that produced it.
#[derive(Debug, Clone)]
pub struct FixturePlan {
    pub rounds: Vec<Vec<Pairing>>,
    pub zone_assignment: Vec<(u32, Option<Zone>)>,
}

/// Classic rotation round-robin, both legs. An odd team count gets a bye
/// slot, so each of those rounds leaves exactly one team idle. Position 0
/// stays fixed while every other slot rotates one step per round; the vuelta
/// replays each ida round with home and away swapped.
pub fn double_round_robin(team_ids: &[u32], zone: Option<Zone>) -> Vec<Vec<Pairing>> {
    if team_ids.len() < 2 {
        return Vec::new();
    }

    let mut slots: Vec<Option<u32>> = team_ids.iter().copied().map(Some).collect();
    if slots.len() % 2 != 0 {
        slots.push(None);
    }

    let n = slots.len();
    let mut ida: Vec<Vec<Pairing>> = Vec::with_capacity(n - 1);

    for _ in 0..n - 1 {
        let mut round = Vec::with_capacity(n / 2);
        for j in 0..n / 2 {
            if let (Some(home_id), Some(away_id)) = (slots[j], slots[n - 1 - j]) {
                round.push(Pairing {
                    home_id,
                    away_id,
                    zone,
                });
            }
        }
        ida.push(round);

        let last = slots.pop().expect("rotation slots are never empty");
        slots.insert(1, last);
    }

    let vuelta: Vec<Vec<Pairing>> = ida
        .iter()
        .map(|round| {
            round
                .iter()
                .map(|p| Pairing {
                    home_id: p.away_id,
                    away_id: p.home_id,
                    zone: p.zone,
                })
                .collect()
        })
        .collect();

    let mut rounds = ida;
    rounds.extend(vuelta);
    rounds
}

/// Rounds with the same index across two zones become one global round.
fn merge_zone_rounds(a: Vec<Vec<Pairing>>, b: Vec<Vec<Pairing>>) -> Vec<Vec<Pairing>> {
    a.into_iter()
        .zip_longest(b)
        .map(|pair| match pair {
            EitherOrBoth::Both(mut left, mut right) => {
                left.append(&mut right);
                left
            }
            EitherOrBoth::Left(left) => left,
            EitherOrBoth::Right(right) => right,
        })
        .collect()
}

/// Plans a complete season schedule for a league. The team order (and with it
/// the zone draw and pairing sequence) is reshuffled on every call, so
/// regeneration always yields a fresh concrete schedule; the round structure
/// itself is fully determined by the team count.
pub fn plan_fixture<R: Rng>(league: &League, teams: &[Team], rng: &mut R) -> CoreResult<FixturePlan> {
    if teams.len() < 2 {
        return Err(CoreError::InsufficientData(format!(
            "league '{}' has {} team(s), at least 2 are needed to schedule",
            league.name,
            teams.len()
        )));
    }

    let mut ids: Vec<u32> = teams.iter().map(|t| t.id).collect();
    ids.shuffle(rng);

    match league.format {
        LeagueFormat::SingleTable => Ok(FixturePlan {
            rounds: double_round_robin(&ids, None),
            zone_assignment: ids.iter().map(|&id| (id, None)).collect(),
        }),
        LeagueFormat::SplitZones => {
            let (zone_a, zone_b) = ids.split_at(ids.len() / 2);

            let mut rounds = merge_zone_rounds(
                double_round_robin(zone_a, Some(Zone::A)),
                double_round_robin(zone_b, Some(Zone::B)),
            );

            if rounds.len() > SPLIT_ZONE_ROUNDS {
                rounds.truncate(SPLIT_ZONE_ROUNDS);
            } else if rounds.len() < SPLIT_ZONE_ROUNDS {
                warn!(
                    "⚠️ {}: zone sizes {}/{} produce only {} global rounds (target {})",
                    league.name,
                    zone_a.len(),
                    zone_b.len(),
                    rounds.len(),
                    SPLIT_ZONE_ROUNDS
                );
            }

            let zone_assignment = zone_a
                .iter()
                .map(|&id| (id, Some(Zone::A)))
                .chain(zone_b.iter().map(|&id| (id, Some(Zone::B))))
                .collect();

            Ok(FixturePlan {
                rounds,
                zone_assignment,
            })
        }
    }
}

/// Regenerates the complete schedule of one league for one season: deletes
/// whatever rounds already exist, persists the new zone draw and the new
/// rounds with their calendar dates. One logical transaction: on any failure
/// the store is left exactly as it was.
pub fn generate_fixture<R: Rng>(
    repo: &mut dyn Repository,
    league_id: u32,
    season: u16,
    rng: &mut R,
) -> CoreResult<()> {
    let league = repo.league(league_id)?;
    let teams = repo.teams_in_league(league_id)?;
    let plan = plan_fixture(&league, &teams, rng)?;

    with_transaction(repo, |repo| {
        repo.delete_rounds(league_id, season)?;

        for (team_id, zone) in &plan.zone_assignment {
            repo.set_team_zone(*team_id, *zone)?;
        }

        for (index, pairings) in plan.rounds.iter().enumerate() {
            let round_id = repo.create_round(
                league_id,
                season,
                (index + 1) as u8,
                SeasonCalendar::round_date(season, index),
            )?;
            for pairing in pairings {
                repo.create_fixture(round_id, pairing.home_id, pairing.away_id, pairing.zone)?;
            }
        }

        Ok(())
    })?;

    info!(
        "📅 fixture generated: {} season {} ({} rounds)",
        league.name,
        season,
        plan.rounds.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::{HashMap, HashSet};

    fn teams(league_id: u32, count: u32) -> Vec<Team> {
        (1..=count)
            .map(|i| Team::new(i, format!("Team {i}"), league_id, 65))
            .collect()
    }

    fn single_table(team_count: u8) -> League {
        League::new(
            1,
            String::from("Liga Test"),
            String::from("Argentina"),
            team_count,
            LeagueFormat::SingleTable,
        )
    }

    fn split_zones(team_count: u8) -> League {
        League::new(
            2,
            String::from("Primera Nacional"),
            String::from("Argentina"),
            team_count,
            LeagueFormat::SplitZones,
        )
    }

    #[test]
    fn even_count_produces_a_complete_double_round_robin() {
        let ids: Vec<u32> = (1..=8).collect();
        let rounds = double_round_robin(&ids, None);

        assert_eq!(rounds.len(), 2 * (8 - 1));

        // each team plays exactly once per round
        for round in &rounds {
            let mut seen = HashSet::new();
            for p in round {
                assert!(seen.insert(p.home_id));
                assert!(seen.insert(p.away_id));
            }
            assert_eq!(seen.len(), 8);
        }

        // every ordered pair appears exactly once across the season
        let mut pairs = HashSet::new();
        for p in rounds.iter().flatten() {
            assert!(pairs.insert((p.home_id, p.away_id)), "duplicate pairing");
        }
        assert_eq!(pairs.len(), 8 * 7);
    }

    #[test]
    fn odd_count_gives_each_team_one_bye_in_the_first_n_rounds() {
        let ids: Vec<u32> = (1..=7).collect();
        let rounds = double_round_robin(&ids, None);

        assert_eq!(rounds.len(), 2 * 7);

        let mut byes: HashMap<u32, u32> = HashMap::new();
        for round in rounds.iter().take(7) {
            // one dropped pairing per round
            assert_eq!(round.len(), 3);

            let playing: HashSet<u32> =
                round.iter().flat_map(|p| [p.home_id, p.away_id]).collect();
            let idle: Vec<u32> = ids.iter().copied().filter(|id| !playing.contains(id)).collect();
            assert_eq!(idle.len(), 1);
            *byes.entry(idle[0]).or_default() += 1;
        }

        for id in &ids {
            assert_eq!(byes.get(id), Some(&1), "team {id} bye count");
        }
    }

    #[test]
    fn four_teams_give_six_rounds_and_a_mirrored_vuelta() {
        let rounds = double_round_robin(&[1, 2, 3, 4], None);

        assert_eq!(rounds.len(), 6);
        assert_eq!(
            rounds[0],
            vec![
                Pairing { home_id: 1, away_id: 4, zone: None },
                Pairing { home_id: 2, away_id: 3, zone: None },
            ]
        );

        // round 4 is round 1 with home/away reversed
        assert_eq!(
            rounds[3],
            vec![
                Pairing { home_id: 4, away_id: 1, zone: None },
                Pairing { home_id: 3, away_id: 2, zone: None },
            ]
        );
    }

    #[test]
    fn split_zone_rounds_merge_without_cross_zone_pairings() {
        let league = split_zones(36);
        let mut rng = StdRng::seed_from_u64(42);
        let plan = plan_fixture(&league, &teams(2, 36), &mut rng).unwrap();

        assert_eq!(plan.rounds.len(), SPLIT_ZONE_ROUNDS);

        let zone_of: HashMap<u32, Option<Zone>> = plan.zone_assignment.iter().copied().collect();
        let in_zone_a = plan
            .zone_assignment
            .iter()
            .filter(|(_, z)| *z == Some(Zone::A))
            .count();
        assert_eq!(in_zone_a, 18);

        for round in &plan.rounds {
            // 9 matches per zone per round
            assert_eq!(round.len(), 18);
            for p in round {
                assert_eq!(zone_of[&p.home_id], zone_of[&p.away_id]);
                assert_eq!(Some(p.zone), zone_of.get(&p.home_id).copied());
            }
        }
    }

    #[test]
    fn small_split_league_accepts_the_round_deficit() {
        let league = split_zones(8);
        let mut rng = StdRng::seed_from_u64(1);
        let plan = plan_fixture(&league, &teams(2, 8), &mut rng).unwrap();

        // 4 teams per zone -> 6 rounds, well short of 34
        assert_eq!(plan.rounds.len(), 6);
    }

    #[test]
    fn zone_draw_changes_between_calls() {
        let league = split_zones(36);
        let squad = teams(2, 36);
        let mut rng = StdRng::seed_from_u64(5);

        let first = plan_fixture(&league, &squad, &mut rng).unwrap();
        let second = plan_fixture(&league, &squad, &mut rng).unwrap();
        assert_ne!(first.zone_assignment, second.zone_assignment);
    }

    #[test]
    fn too_few_teams_is_an_error() {
        let league = single_table(1);
        let mut rng = StdRng::seed_from_u64(1);
        let err = plan_fixture(&league, &teams(1, 1), &mut rng).unwrap_err();
        assert!(matches!(err, CoreError::InsufficientData(_)));
    }
}
