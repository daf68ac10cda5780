use crate::r#match::{MatchSimulator, Score};
use log::debug;
use rand::{Rng, RngExt};

/// A knockout tie always publishes a winner; the score is what gets narrated.
#[derive(Debug, Clone, Copy)]
pub struct KnockoutOutcome {
    pub score: Score,
    pub home_won: bool,
}

/// Plays one knockout match. A level score after normal simulation is settled
/// by rating: the stronger side is awarded one extra goal. Equal ratings come
/// down to a fair coin, with a goalless draw shown as a nominal 1-0 to the
/// winner instead of 1-1.
pub fn resolve_knockout(
    simulator: &dyn MatchSimulator,
    home_rating: u8,
    away_rating: u8,
    rng: &mut dyn Rng,
) -> KnockoutOutcome {
    let mut score = simulator.simulate(home_rating, away_rating, rng);

    if score.is_draw() {
        if home_rating > away_rating {
            score.home += 1;
        } else if away_rating > home_rating {
            score.away += 1;
        } else {
            let home_wins = rng.random_bool(0.5);
            debug!("knockout tie-break by coin flip, home_wins={home_wins}");

            if score.home == 0 && score.away == 0 {
                if home_wins {
                    score.home = 1;
                } else {
                    score.away = 1;
                }
            } else if home_wins {
                score.home += 1;
            } else {
                score.away += 1;
            }
        }
    }

    KnockoutOutcome {
        score,
        home_won: score.home_won(),
    }
}
