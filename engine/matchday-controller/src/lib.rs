// Matchday lifecycle controller - feed ingestion and window transitions

mod controller;
mod error;
mod feed;

#[cfg(test)]
mod tests;

pub use controller::{ingest, IngestOutcome};
pub use error::LifecycleError;
pub use feed::{ClubFact, FeedUpdate, FutureFixture, PlayerFact};
