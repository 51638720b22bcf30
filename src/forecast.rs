use serde::Serialize;

use crate::error::ForecastError;

/// One stochastic sample of a simulated match. Lives only for the duration
/// of a simulation run.
#[derive(Debug, Clone, Copy)]
pub struct TrialOutcome {
    pub home_goals: f64,
    pub away_goals: f64,
    pub home_possession: f64,
    pub away_possession: f64,
    pub home_chances: f64,
    pub away_chances: f64,
}

/// The reported forecast: trial means, with goals and chances rounded and
/// possession expressed as percentages summing to 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchForecast {
    pub home_goals: u32,
    pub away_goals: u32,
    pub home_possession_pct: f64,
    pub away_possession_pct: f64,
    pub home_chances: u32,
    pub away_chances: u32,
}

/// Reduces trial outcomes to a single forecast. Rounding happens on the
/// mean, not per trial.
pub fn aggregate_trials(outcomes: &[TrialOutcome]) -> Result<MatchForecast, ForecastError> {
    if outcomes.is_empty() {
        return Err(ForecastError::EmptyInput);
    }

    let mut home_goals = 0.0_f64;
    let mut away_goals = 0.0_f64;
    let mut home_possession = 0.0_f64;
    let mut away_possession = 0.0_f64;
    let mut home_chances = 0.0_f64;
    let mut away_chances = 0.0_f64;
    for o in outcomes {
        home_goals += o.home_goals;
        away_goals += o.away_goals;
        home_possession += o.home_possession;
        away_possession += o.away_possession;
        home_chances += o.home_chances;
        away_chances += o.away_chances;
    }
    let n = outcomes.len() as f64;

    Ok(MatchForecast {
        home_goals: round_mean(home_goals / n),
        away_goals: round_mean(away_goals / n),
        home_possession_pct: home_possession / n * 100.0,
        away_possession_pct: away_possession / n * 100.0,
        home_chances: round_mean(home_chances / n),
        away_chances: round_mean(away_chances / n),
    })
}

// Chance noise is unclamped, so a near-zero rate can leave the mean a hair
// below zero; floor before rounding.
fn round_mean(mean: f64) -> u32 {
    mean.max(0.0).round() as u32
}
