use core::{League, LeagueFormat, Team};
use serde::Deserialize;

const STATIC_LEAGUES_JSON: &str = include_str!("../data/leagues.json");

#[derive(Deserialize)]
pub struct LeagueEntity {
    pub id: u32,
    pub name: String,
    pub country: String,
    pub format: LeagueFormatEntity,
    pub teams: Vec<TeamEntity>,
}

#[derive(Deserialize, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum LeagueFormatEntity {
    SingleTable,
    SplitZones,
}

#[derive(Deserialize)]
pub struct TeamEntity {
    pub name: String,
    pub rating: u8,
}

pub struct LeagueLoader;

impl LeagueLoader {
    pub fn load() -> (Vec<League>, Vec<Team>) {
        let entities: Vec<LeagueEntity> =
            serde_json::from_str(STATIC_LEAGUES_JSON).expect("embedded leagues.json is valid");

        let mut leagues = Vec::with_capacity(entities.len());
        let mut teams = Vec::new();
        let mut next_team_id: u32 = 1;

        for entity in entities {
            let format = match entity.format {
                LeagueFormatEntity::SingleTable => LeagueFormat::SingleTable,
                LeagueFormatEntity::SplitZones => LeagueFormat::SplitZones,
            };

            leagues.push(League::new(
                entity.id,
                entity.name,
                entity.country,
                entity.teams.len() as u8,
                format,
            ));

            for team in entity.teams {
                teams.push(Team::new(next_team_id, team.name, entity.id, team.rating));
                next_team_id += 1;
            }
        }

        (leagues, teams)
    }
}
