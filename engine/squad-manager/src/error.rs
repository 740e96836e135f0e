use ledger_store::{Formation, LeagueId, LedgerError, Position};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SquadError {
    #[error("{formation} is not an allowed formation")]
    InvalidFormation { formation: Formation },

    #[error("not enough room for {position} under the requested formation")]
    NotEnoughRoom { position: Position },

    #[error("player {uid} is locked, their match has started")]
    PlayerLocked { uid: String },

    #[error("player {uid} is not on the field")]
    NotOnField { uid: String },

    #[error("player {uid} is not in your squad or pending purchases")]
    NotYourPlayer { uid: String },

    #[error("league {league} runs Top-11; manual squad changes are disabled while the window is closed")]
    TopElevenActive { league: LeagueId },

    #[error("league {league} does not run a fantasy squad game")]
    FantasyDisabled { league: LeagueId },

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
