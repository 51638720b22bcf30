//! Match outcome forecasting from recent team form.
//!
//! The engine estimates per-team strength from the tail of a match history,
//! optionally scaled by league-standings context, then Monte Carlo samples
//! the fixture to produce a stable point forecast. Inputs can come from a
//! football-data season CSV, a standings JSON, or in-memory fixtures; the
//! engine does not care which.

pub mod dataset;
pub mod error;
pub mod forecast;
pub mod match_sim;
pub mod possession;
pub mod standings;
pub mod strength;
