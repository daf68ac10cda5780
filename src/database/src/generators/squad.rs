use crate::loaders::PeopleNames;
use core::{Player, PlayerPosition, Team};
use rand::prelude::*;

/// Position mix of a generated 22-man squad.
const SQUAD_SHAPE: [(PlayerPosition, u8); 4] = [
    (PlayerPosition::Goalkeeper, 3),
    (PlayerPosition::Defender, 7),
    (PlayerPosition::Midfielder, 7),
    (PlayerPosition::Forward, 5),
];

/// Generates squads around a club's rating from embedded name pools.
pub struct SquadGenerator<'n> {
    names: &'n PeopleNames,
}

impl<'n> SquadGenerator<'n> {
    pub fn with_people_names(names: &'n PeopleNames) -> Self {
        SquadGenerator { names }
    }

    pub fn generate<R: Rng>(&self, team: &Team, next_id: &mut u32, rng: &mut R) -> Vec<Player> {
        let mut squad = Vec::with_capacity(22);

        for (position, count) in SQUAD_SHAPE {
            for _ in 0..count {
                let rating =
                    (team.rating as i16 + rng.random_range(-6..=6)).clamp(40, 96) as u8;

                squad.push(Player {
                    id: *next_id,
                    name: self.full_name(rng),
                    position,
                    rating,
                    age: rng.random_range(17..=36),
                    team_id: Some(team.id),
                });
                *next_id += 1;
            }
        }

        squad
    }

    fn full_name<R: Rng>(&self, rng: &mut R) -> String {
        let first = self
            .names
            .first_names
            .choose(rng)
            .map(String::as_str)
            .unwrap_or("Juan");
        let last = self
            .names
            .last_names
            .choose(rng)
            .map(String::as_str)
            .unwrap_or("Pérez");
        format!("{first} {last}")
    }
}
