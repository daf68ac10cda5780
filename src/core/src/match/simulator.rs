use rand::{Rng, RngExt};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub home: u8,
    pub away: u8,
}

impl Score {
    pub fn new(home: u8, away: u8) -> Self {
        Score { home, away }
    }

    pub fn is_draw(&self) -> bool {
        self.home == self.away
    }

    pub fn home_won(&self) -> bool {
        self.home > self.away
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.home, self.away)
    }
}

/// Resolves a single match between two team ratings. Implementations must
/// return a non-negative scoreline and never touch game state; everything
/// else about the probability curve is up to them.
pub trait MatchSimulator {
    fn simulate(&self, home_rating: u8, away_rating: u8, rng: &mut dyn Rng) -> Score;
}

/// Default model: win probability shifts with the rating differential,
/// clamped so even heavy mismatches stay uncertain.
#[derive(Debug, Default)]
pub struct RatingSimulator;

impl MatchSimulator for RatingSimulator {
    fn simulate(&self, home_rating: u8, away_rating: u8, rng: &mut dyn Rng) -> Score {
        let diff = home_rating as f64 - away_rating as f64;
        let home_win = (0.5 + diff / 100.0 * 0.2).clamp(0.1, 0.9);

        let roll: f64 = rng.random();

        if roll < home_win {
            let home: u8 = rng.random_range(1..=4);
            let away = rng.random_range(0..home);
            Score::new(home, away)
        } else if roll > 1.0 - home_win {
            let away: u8 = rng.random_range(1..=4);
            let home = rng.random_range(0..away);
            Score::new(home, away)
        } else {
            let goals: u8 = rng.random_range(0..=3);
            Score::new(goals, goals)
        }
    }
}
