use thiserror::Error;

use crate::dataset::Role;

/// Failures surfaced by the forecasting engine. Adapter-level problems
/// (unreadable files, malformed documents) stay on `anyhow` in the modules
/// that own the I/O.
#[derive(Debug, Error)]
pub enum ForecastError {
    /// The dataset holds no matches for the team in the requested role, so
    /// every form average would be undefined.
    #[error("{team} has no {role} matches in the dataset")]
    InsufficientData { team: String, role: Role },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Aggregation was asked to reduce zero trial outcomes.
    #[error("no trial outcomes to aggregate")]
    EmptyInput,
}
