// Ledger store - durable league records and the ingestion lock

mod error;
mod lock;
mod records;
mod store;
mod types;

pub use error::LedgerError;
pub use lock::{IngestGuard, LockError, LockRegistry};
pub use records::{
    Club, FeedState, FutureClub, FuturePrediction, HistoricalClub, HistoricalPlayer,
    HistoricalPrediction, HistoricalSquad, HistoricalTransfer, LeagueSettings, Membership, Player,
    PointsRecord, Prediction, SquadSlot, Transfer,
};
pub use store::LedgerStore;
pub use types::{
    Counterparty, Formation, LeagueId, Matchday, Money, Placement, PointTotal, Position, UserId,
};
