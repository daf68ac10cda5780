use crate::club::Zone;
use crate::r#match::Score;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Accumulated league record of one team for one season. Mutated exactly once
/// per played match, never recomputed from scratch outside an explicit reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandingsRow {
    pub league_id: u32,
    pub team_id: u32,
    /// Display name, filled in by the store on read.
    pub team_name: String,
    pub season: u16,
    pub zone: Option<Zone>,

    pub played: u8,
    pub won: u8,
    pub drawn: u8,
    pub lost: u8,
    pub goals_for: i32,
    pub goals_against: i32,
    pub goal_difference: i32,
    pub points: u8,
}

impl StandingsRow {
    pub fn zero(league_id: u32, team_id: u32, season: u16) -> Self {
        StandingsRow {
            league_id,
            team_id,
            team_name: String::new(),
            season,
            zone: None,
            played: 0,
            won: 0,
            drawn: 0,
            lost: 0,
            goals_for: 0,
            goals_against: 0,
            goal_difference: 0,
            points: 0,
        }
    }

    fn absorb(&mut self, scored: u8, conceded: u8) {
        self.played += 1;
        self.goals_for += scored as i32;
        self.goals_against += conceded as i32;
        self.goal_difference = self.goals_for - self.goals_against;

        if scored > conceded {
            self.won += 1;
            self.points += 3;
        } else if scored < conceded {
            self.lost += 1;
        } else {
            self.drawn += 1;
            self.points += 1;
        }
    }
}

/// Folds one result into both rows and stamps the fixture's zone on them.
pub fn apply_result(
    home: &mut StandingsRow,
    away: &mut StandingsRow,
    score: &Score,
    zone: Option<Zone>,
) {
    home.absorb(score.home, score.away);
    away.absorb(score.away, score.home);
    home.zone = zone;
    away.zone = zone;
}

/// Table order: points, goal difference, goals for (all descending), then
/// team name ascending. The same ranking seeds the knockout pairings.
pub fn table_ordering(a: &StandingsRow, b: &StandingsRow) -> Ordering {
    b.points
        .cmp(&a.points)
        .then(b.goal_difference.cmp(&a.goal_difference))
        .then(b.goals_for.cmp(&a.goals_for))
        .then(a.team_name.cmp(&b.team_name))
}

pub fn sort_table(rows: &mut [StandingsRow]) {
    rows.sort_by(table_ordering);
}

/// Renders a table as a fixed-width ANSI code block, highlighting the user's
/// team in cyan when present.
pub fn format_table(rows: &[StandingsRow], highlight: Option<u32>) -> String {
    if rows.is_empty() {
        return String::from("No table data available.");
    }

    let mut lines = vec![String::from("```ansi"), String::from(
        "POS TEAM              P  W  D  L  GF GA GD  PTS",
    )];

    for (i, row) in rows.iter().enumerate() {
        let name: String = row.team_name.chars().take(17).collect();
        let line = format!(
            "{:<3} {:<17} {:<2} {:<2} {:<2} {:<2} {:<2} {:<2} {:<3} {:<3}",
            i + 1,
            name,
            row.played,
            row.won,
            row.drawn,
            row.lost,
            row.goals_for,
            row.goals_against,
            row.goal_difference,
            row.points,
        );

        if highlight == Some(row.team_id) {
            lines.push(format!("\u{1b}[2;36m{line}\u{1b}[0m"));
        } else {
            lines.push(line);
        }
    }

    lines.push(String::from("```"));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, points: u8, gd: i32, gf: i32) -> StandingsRow {
        let mut r = StandingsRow::zero(1, 1, 1);
        r.team_name = name.to_string();
        r.points = points;
        r.goal_difference = gd;
        r.goals_for = gf;
        r
    }

    #[test]
    fn bookkeeping_stays_consistent() {
        let mut home = StandingsRow::zero(1, 10, 1);
        let mut away = StandingsRow::zero(1, 20, 1);

        apply_result(&mut home, &mut away, &Score::new(3, 1), None);
        apply_result(&mut away, &mut home, &Score::new(2, 2), Some(Zone::A));
        apply_result(&mut home, &mut away, &Score::new(0, 1), Some(Zone::A));

        for r in [&home, &away] {
            assert_eq!(r.points, 3 * r.won + r.drawn);
            assert_eq!(r.goal_difference, r.goals_for - r.goals_against);
            assert_eq!(r.played, r.won + r.drawn + r.lost);
        }

        assert_eq!(home.played, 3);
        assert_eq!(home.points, 4);
        assert_eq!(away.points, 4);
        assert_eq!(home.zone, Some(Zone::A));
    }

    #[test]
    fn ordering_uses_points_then_difference_then_goals_then_name() {
        let mut rows = vec![
            row("Cordoba", 10, 5, 12),
            row("Belgrano", 12, 2, 8),
            row("Alvarado", 10, 5, 14),
            row("Mitre", 10, 7, 9),
            row("Aldosivi", 10, 5, 12),
        ];
        sort_table(&mut rows);

        let names: Vec<&str> = rows.iter().map(|r| r.team_name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Belgrano", "Mitre", "Alvarado", "Aldosivi", "Cordoba"]
        );
    }

    #[test]
    fn highlight_wraps_the_users_row_in_ansi() {
        let mut a = row("Quilmes", 3, 1, 2);
        a.team_id = 77;
        let b = row("Temperley", 1, 0, 1);

        let text = format_table(&[a, b], Some(77));
        assert!(text.starts_with("```ansi"));
        assert!(text.contains("\u{1b}[2;36m"));
        assert!(text.contains("Quilmes"));
    }
}
