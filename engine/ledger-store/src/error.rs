use thiserror::Error;

use crate::types::{LeagueId, Money, UserId};

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("league {league} does not exist")]
    UnknownLeague { league: LeagueId },

    #[error("league {league} is archived")]
    LeagueArchived { league: LeagueId },

    #[error("user {user} is not a member of league {league}")]
    NotAMember { league: LeagueId, user: UserId },

    #[error("user {user} is already a member of league {league}")]
    AlreadyMember { league: LeagueId, user: UserId },

    #[error("player {uid} does not exist")]
    UnknownPlayer { uid: String },

    #[error("a transfer for player {uid} by the same seller already exists in league {league}")]
    DuplicateTransfer { league: LeagueId, uid: String },

    #[error("debiting {amount} would take user {user} in league {league} below zero")]
    BalanceUnderflow {
        league: LeagueId,
        user: UserId,
        amount: Money,
    },

    #[error("league {league} has no open matchday for user {user}")]
    NoOpenMatchday { league: LeagueId, user: UserId },
}
