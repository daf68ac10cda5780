pub mod generators;
pub mod loaders;
pub mod session;
pub mod store;

pub use generators::*;
pub use loaders::*;
pub use session::*;
pub use store::*;

use log::info;
use rand::Rng;

/// Builds the fully populated in-memory store: embedded league and team seed
/// data, plus a generated squad for every club.
pub struct DatabaseLoader;

impl DatabaseLoader {
    pub fn load<R: Rng>(rng: &mut R) -> CareerStore {
        let (leagues, teams) = LeagueLoader::load();
        let names = NamesLoader::load();

        let generator = SquadGenerator::with_people_names(&names);
        let mut players = Vec::new();
        let mut next_player_id: u32 = 1;
        for team in &teams {
            players.extend(generator.generate(team, &mut next_player_id, rng));
        }

        info!(
            "database loaded: {} leagues, {} teams, {} players",
            leagues.len(),
            teams.len(),
            players.len()
        );

        CareerStore::new(leagues, teams, players)
    }
}
