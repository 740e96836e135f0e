// Scoring engine - fantasy and prediction points, applied as deltas

mod engine;
mod error;
mod fantasy;
mod predictions;


pub use engine::{recalculate, run_league, run_league_unchecked};
pub use error::ScoringError;
pub use fantasy::fantasy_points;
pub use predictions::{historical_points, live_points, score_prediction};
