use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use rayon::prelude::*;
use tracing::debug;

use crate::dataset::{MatchHistory, Role};
use crate::error::ForecastError;
use crate::forecast::{MatchForecast, TrialOutcome, aggregate_trials};
use crate::possession::{self, NormalizationMode};
use crate::standings::StandingsTable;
use crate::strength::{DEFAULT_LOOKBACK, StrengthProfile, estimate_strength};

pub const DEFAULT_TRIALS: u32 = 5000;
pub const DEFAULT_NOISE_STD_DEV: f64 = 0.1;

const MAX_GOALS: f64 = 5.0;
// Below this many trials the rayon fan-out costs more than it saves.
const PARALLEL_THRESHOLD: u32 = 1024;

/// Knobs for one simulation run. `Default` matches the engine's documented
/// defaults; a `None` seed draws a fresh one per run.
#[derive(Debug, Clone, Copy)]
pub struct SimConfig {
    pub trials: u32,
    pub lookback: usize,
    pub noise_std_dev: f64,
    pub normalization: NormalizationMode,
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            lookback: DEFAULT_LOOKBACK,
            noise_std_dev: DEFAULT_NOISE_STD_DEV,
            normalization: NormalizationMode::default(),
            seed: None,
        }
    }
}

/// Runs `config.trials` stochastic trials for the fixture and aggregates
/// them into a forecast.
///
/// With a fixed seed the forecast is reproducible byte for byte; trials draw
/// from per-index generator streams, so the sequential and parallel paths
/// produce identical results.
pub fn simulate_match(
    home_team: &str,
    away_team: &str,
    history: &MatchHistory,
    standings: Option<&StandingsTable>,
    config: &SimConfig,
) -> Result<MatchForecast, ForecastError> {
    if config.trials == 0 {
        return Err(ForecastError::InvalidArgument(
            "trials must be positive".to_string(),
        ));
    }
    if !config.noise_std_dev.is_finite() || config.noise_std_dev < 0.0 {
        return Err(ForecastError::InvalidArgument(format!(
            "noise std dev must be finite and non-negative, got {}",
            config.noise_std_dev
        )));
    }

    // No randomness feeds the strength profiles, so one computation serves
    // every trial.
    let home = estimate_strength(home_team, history, Role::Home, config.lookback, standings)?;
    let away = estimate_strength(away_team, history, Role::Away, config.lookback, standings)?;

    let noise = Normal::new(0.0, config.noise_std_dev).map_err(|err| {
        ForecastError::InvalidArgument(format!("bad noise distribution: {err}"))
    })?;

    let seed = config.seed.unwrap_or_else(rand::random);
    debug!(
        home_team,
        away_team,
        trials = config.trials,
        seed,
        "simulating match"
    );

    let run = |trial: u32| run_trial(&home, &away, noise, config.normalization, seed, trial);
    let outcomes: Vec<TrialOutcome> = if config.trials >= PARALLEL_THRESHOLD {
        (0..config.trials).into_par_iter().map(run).collect()
    } else {
        (0..config.trials).map(run).collect()
    };

    aggregate_trials(&outcomes)
}

fn run_trial(
    home: &StrengthProfile,
    away: &StrengthProfile,
    noise: Normal<f64>,
    mode: NormalizationMode,
    seed: u64,
    trial: u32,
) -> TrialOutcome {
    let mut rng = trial_rng(seed, trial);

    let home_goals = ((home.goals_scored + away.goals_conceded) / 2.0 + noise.sample(&mut rng))
        .clamp(0.0, MAX_GOALS);
    let away_goals = ((away.goals_scored + home.goals_conceded) / 2.0 + noise.sample(&mut rng))
        .clamp(0.0, MAX_GOALS);

    let (home_possession, away_possession) =
        possession::normalize_shares(home.possession, away.possession, mode);

    let home_chances = home.chances + noise.sample(&mut rng);
    let away_chances = away.chances + noise.sample(&mut rng);

    TrialOutcome {
        home_goals,
        away_goals,
        home_possession,
        away_possession,
        home_chances,
        away_chances,
    }
}

// Every trial gets its own ChaCha stream off the run seed, so results do not
// depend on whether trials execute sequentially or across rayon workers.
fn trial_rng(seed: u64, trial: u32) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(trial as u64);
    rng
}
