use ledger_store::LedgerError;
use scoring_engine::ScoringError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LifecycleError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Scoring(#[from] ScoringError),
}
