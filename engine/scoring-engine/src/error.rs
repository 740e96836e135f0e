use ledger_store::LedgerError;
use squad_manager::SquadError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoringError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Squad(#[from] SquadError),
}
