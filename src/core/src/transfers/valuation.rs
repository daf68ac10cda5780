use crate::club::Player;
use rand::{Rng, RngExt};

/// Rough market value from rating and age. Bands are wide on purpose: the
/// same player quoted twice will not price identically.
pub fn market_value<R: Rng>(player: &Player, rng: &mut R) -> i64 {
    let base: i64 = match player.rating {
        0..=59 => rng.random_range(50_000..=500_000),
        60..=69 => rng.random_range(500_000..=3_000_000),
        70..=74 => rng.random_range(3_000_000..=10_000_000),
        75..=79 => rng.random_range(10_000_000..=25_000_000),
        80..=84 => rng.random_range(25_000_000..=50_000_000),
        85..=89 => rng.random_range(50_000_000..=100_000_000),
        _ => rng.random_range(100_000_000..=150_000_000),
    };

    let age_factor = if player.age < 22 {
        rng.random_range(1.1..1.3)
    } else if player.age > 34 {
        rng.random_range(0.3..0.5)
    } else if player.age > 30 {
        rng.random_range(0.6..0.8)
    } else {
        1.0
    };

    let fluctuation = rng.random_range(0.9..1.1);
    let value = (base as f64 * age_factor * fluctuation) as i64;

    // round to a "pretty" figure
    let rounded = if value >= 1_000_000 {
        (value / 100_000) * 100_000
    } else if value >= 100_000 {
        (value / 10_000) * 10_000
    } else {
        (value / 1_000) * 1_000
    };

    rounded.max(20_000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::club::PlayerPosition;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn player(rating: u8, age: u8) -> Player {
        Player {
            id: 1,
            name: String::from("Test Player"),
            position: PlayerPosition::Midfielder,
            rating,
            age,
            team_id: Some(1),
        }
    }

    #[test]
    fn values_track_the_rating_bands() {
        let mut rng = StdRng::seed_from_u64(21);

        for _ in 0..200 {
            let journeyman = market_value(&player(55, 26), &mut rng);
            let star = market_value(&player(91, 26), &mut rng);

            assert!(journeyman >= 20_000);
            assert!(journeyman <= 550_000);
            assert!(star >= 90_000_000);
            assert!(star > journeyman);
        }
    }

    #[test]
    fn veterans_are_discounted_and_prospects_boosted() {
        let mut rng = StdRng::seed_from_u64(22);

        let mut veteran_total = 0i64;
        let mut prospect_total = 0i64;
        for _ in 0..300 {
            veteran_total += market_value(&player(78, 36), &mut rng);
            prospect_total += market_value(&player(78, 19), &mut rng);
        }

        assert!(prospect_total > veteran_total * 2);
    }

    #[test]
    fn never_below_the_floor() {
        let mut rng = StdRng::seed_from_u64(23);
        for _ in 0..200 {
            assert!(market_value(&player(40, 36), &mut rng) >= 20_000);
        }
    }
}
