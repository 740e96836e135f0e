use auction_engine::AuctionError;
use ledger_store::{LeagueId, LedgerError, LockError, UserId};
use matchday_controller::LifecycleError;
use scoring_engine::ScoringError;
use squad_manager::SquadError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("player id {uid:?} contains unsupported characters")]
    InvalidPlayerId { uid: String },

    #[error("predicted score {value} is out of range")]
    InvalidScore { value: i32 },

    #[error("user {user} is not an admin of league {league}")]
    NotAdmin { league: LeagueId, user: UserId },

    #[error("league {league} does not have predictions enabled")]
    PredictionsDisabled { league: LeagueId },

    #[error("no current or upcoming home fixture for club {club}")]
    UnknownMatch { club: String },

    #[error(transparent)]
    Lock(#[from] LockError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Auction(#[from] AuctionError),

    #[error(transparent)]
    Squad(#[from] SquadError),

    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}
