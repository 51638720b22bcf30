use crate::dataset::{MatchHistory, Role};
use crate::error::ForecastError;
use crate::standings::StandingsTable;

pub const HOME_WEIGHT: f64 = 1.2;
pub const AWAY_WEIGHT: f64 = 0.9;
pub const DEFAULT_LOOKBACK: usize = 5;

/// Per-call snapshot of a team's recent form, already scaled by role weight
/// and (when standings are supplied) league context. Never mutated after
/// construction.
#[derive(Debug, Clone, Copy)]
pub struct StrengthProfile {
    pub goals_scored: f64,
    pub goals_conceded: f64,
    /// Share of ball control inferred from shot counts. Clamped to [0, 1]
    /// after the role weight; the standings adjustment may push it back above
    /// 1, which the possession normalizer reconciles against the opponent.
    pub possession: f64,
    /// Mean shots on target per match.
    pub chances: f64,
}

/// Estimates a team's strength from its last `lookback` matches in `role`.
///
/// Deterministic and side-effect free. A team with zero qualifying matches
/// is an `InsufficientData` error rather than a NaN-filled profile.
pub fn estimate_strength(
    team: &str,
    history: &MatchHistory,
    role: Role,
    lookback: usize,
    standings: Option<&StandingsTable>,
) -> Result<StrengthProfile, ForecastError> {
    if team.trim().is_empty() {
        return Err(ForecastError::InvalidArgument(
            "team name must not be empty".to_string(),
        ));
    }
    if lookback == 0 {
        return Err(ForecastError::InvalidArgument(
            "lookback must be positive".to_string(),
        ));
    }

    let matches = history.recent_for(team, role, lookback);
    if matches.is_empty() {
        return Err(ForecastError::InsufficientData {
            team: team.to_string(),
            role,
        });
    }

    let weight = match role {
        Role::Home => HOME_WEIGHT,
        Role::Away => AWAY_WEIGHT,
    };
    let n = matches.len() as f64;

    let mut goals_scored =
        matches.iter().map(|m| m.goals_for(role) as f64).sum::<f64>() / n * weight;
    let mut goals_conceded = matches
        .iter()
        .map(|m| m.goals_against(role) as f64)
        .sum::<f64>()
        / n
        * weight;

    let own_shots: u32 = matches.iter().map(|m| m.shots_for(role)).sum();
    let total_shots: u32 = matches
        .iter()
        .map(|m| m.home_shots + m.away_shots)
        .sum();
    // With no shots on either side there is no evidence either way.
    let mut possession = if total_shots > 0 {
        own_shots as f64 / total_shots as f64
    } else {
        0.5
    };
    possession = (possession * weight).clamp(0.0, 1.0);

    let mut chances = matches
        .iter()
        .map(|m| m.shots_on_target_for(role) as f64)
        .sum::<f64>()
        / n
        * weight;

    if let Some(table) = standings {
        let entry = table.entry(team);
        let position_w = 1.0 / (entry.position as f64 + 1.0);
        let points_w = entry.points as f64 / 100.0;
        let goal_diff_w = entry.goal_diff as f64 / 100.0;

        goals_scored *= 1.0 + position_w + points_w + goal_diff_w;
        // A strong enough table position drives the factor negative; conceded
        // goals floor at zero.
        goals_conceded = (goals_conceded * (1.0 - position_w - points_w - goal_diff_w)).max(0.0);
        possession *= 1.0 + position_w + points_w;
        chances *= 1.0 + position_w + points_w;
    }

    Ok(StrengthProfile {
        goals_scored,
        goals_conceded,
        possession,
        chances,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::MatchRecord;
    use crate::standings::StandingsEntry;

    fn record(home: &str, away: &str, stats: [u32; 6]) -> MatchRecord {
        MatchRecord {
            date: None,
            home_team: home.to_string(),
            away_team: away.to_string(),
            home_goals: stats[0],
            away_goals: stats[1],
            home_shots: stats[2],
            away_shots: stats[3],
            home_shots_on_target: stats[4],
            away_shots_on_target: stats[5],
        }
    }

    // Alpha at home scores [2, 1, 3, 0, 2], mean 1.6.
    fn alpha_history() -> MatchHistory {
        MatchHistory::new(vec![
            record("Alpha", "Beta", [2, 1, 12, 8, 5, 3]),
            record("Alpha", "Beta", [1, 1, 10, 9, 4, 4]),
            record("Alpha", "Beta", [3, 0, 15, 6, 7, 2]),
            record("Alpha", "Beta", [0, 2, 7, 11, 2, 5]),
            record("Alpha", "Beta", [2, 1, 11, 9, 5, 3]),
        ])
    }

    #[test]
    fn home_form_is_mean_goals_times_home_weight() {
        let profile =
            estimate_strength("Alpha", &alpha_history(), Role::Home, 5, None).unwrap();
        assert!((profile.goals_scored - 1.92).abs() < 1e-9);
        assert!((profile.goals_conceded - 1.0 * HOME_WEIGHT).abs() < 1e-9);
    }

    #[test]
    fn away_form_uses_the_away_weight() {
        let profile =
            estimate_strength("Beta", &alpha_history(), Role::Away, 5, None).unwrap();
        assert!((profile.goals_scored - 1.0 * AWAY_WEIGHT).abs() < 1e-9);
        // Beta's away shots on target: [3, 4, 2, 5, 3], mean 3.4.
        assert!((profile.chances - 3.4 * AWAY_WEIGHT).abs() < 1e-9);
    }

    #[test]
    fn possession_comes_from_the_shot_ratio() {
        let history = MatchHistory::new(vec![record("Alpha", "Beta", [1, 0, 15, 5, 4, 1])]);
        let profile = estimate_strength("Alpha", &history, Role::Home, 5, None).unwrap();
        // 15 of 20 shots, times 1.2, capped at 1.
        assert!((profile.possession - 0.9).abs() < 1e-9);
    }

    #[test]
    fn possession_defaults_to_even_when_no_shots() {
        let history = MatchHistory::new(vec![record("Alpha", "Beta", [0, 0, 0, 0, 0, 0])]);
        let profile = estimate_strength("Alpha", &history, Role::Home, 5, None).unwrap();
        assert!((profile.possession - 0.5 * HOME_WEIGHT).abs() < 1e-9);
    }

    #[test]
    fn lookback_truncates_to_the_most_recent_matches() {
        let profile =
            estimate_strength("Alpha", &alpha_history(), Role::Home, 2, None).unwrap();
        // Last two home matches: goals [0, 2], mean 1.0.
        assert!((profile.goals_scored - 1.0 * HOME_WEIGHT).abs() < 1e-9);
    }

    #[test]
    fn unknown_role_history_is_insufficient_data() {
        let err = estimate_strength("Zeta", &alpha_history(), Role::Away, 5, None).unwrap_err();
        assert!(matches!(
            err,
            ForecastError::InsufficientData { ref team, role }
                if team == "Zeta" && role == Role::Away
        ));
    }

    #[test]
    fn empty_team_and_zero_lookback_are_invalid() {
        let history = alpha_history();
        assert!(matches!(
            estimate_strength("", &history, Role::Home, 5, None),
            Err(ForecastError::InvalidArgument(_))
        ));
        assert!(matches!(
            estimate_strength("Alpha", &history, Role::Home, 0, None),
            Err(ForecastError::InvalidArgument(_))
        ));
    }

    #[test]
    fn standings_scale_every_metric() {
        let mut table = StandingsTable::new();
        table.insert(
            "Alpha",
            StandingsEntry {
                position: 1,
                points: 50,
                goal_diff: 20,
                played: 30,
            },
        );
        let profile =
            estimate_strength("Alpha", &alpha_history(), Role::Home, 5, Some(&table)).unwrap();
        let base = estimate_strength("Alpha", &alpha_history(), Role::Home, 5, None).unwrap();

        // position_w 0.5, points_w 0.5, goal_diff_w 0.2.
        assert!((profile.goals_scored - base.goals_scored * 2.2).abs() < 1e-9);
        assert!((profile.possession - base.possession * 2.0).abs() < 1e-9);
        assert!((profile.chances - base.chances * 2.0).abs() < 1e-9);
        // Conceded factor 1 - 1.2 is negative and floors at zero.
        assert_eq!(profile.goals_conceded, 0.0);
    }

    #[test]
    fn more_points_never_reduce_expected_goals() {
        let history = alpha_history();
        let entry = |points| StandingsEntry {
            position: 8,
            points,
            goal_diff: 0,
            played: 30,
        };

        let mut low = StandingsTable::new();
        low.insert("Alpha", entry(40));
        let mut high = StandingsTable::new();
        high.insert("Alpha", entry(80));

        let scored_low = estimate_strength("Alpha", &history, Role::Home, 5, Some(&low))
            .unwrap()
            .goals_scored;
        let scored_high = estimate_strength("Alpha", &history, Role::Home, 5, Some(&high))
            .unwrap()
            .goals_scored;
        assert!(scored_high >= scored_low);
    }

    #[test]
    fn absent_entry_equals_explicit_worst_case() {
        let history = alpha_history();
        let empty = StandingsTable::new();
        let mut explicit = StandingsTable::new();
        explicit.insert("Alpha", StandingsEntry::absent());

        let a = estimate_strength("Alpha", &history, Role::Home, 5, Some(&empty)).unwrap();
        let b = estimate_strength("Alpha", &history, Role::Home, 5, Some(&explicit)).unwrap();
        assert_eq!(a.goals_scored, b.goals_scored);
        assert_eq!(a.goals_conceded, b.goals_conceded);
        assert_eq!(a.possession, b.possession);
        assert_eq!(a.chances, b.chances);
    }
}
