use ledger_store::{LeagueId, LedgerError, Money, UserId};
use thiserror::Error;

/// Rejection reasons - explicit, enumerable. State-conflict variants never
/// leave a partial mutation behind.
#[derive(Error, Debug)]
pub enum AuctionError {
    #[error("amount {amount} is not a valid offer")]
    InvalidAmount { amount: Money },

    #[error("the transfer market of league {league} is closed")]
    MarketClosed { league: LeagueId },

    #[error("league {league} does not run a fantasy squad game")]
    FantasyDisabled { league: LeagueId },

    #[error("player {uid} is already in your squad")]
    AlreadyOwned { uid: String },

    #[error("player {uid} is not in your squad")]
    NotOwned { uid: String },

    #[error("bid is below your current commitment of {committed}")]
    BidTooLow { committed: Money },

    #[error("user {user} has no transfers left in league {league}")]
    NoTransfersLeft { league: LeagueId, user: UserId },

    #[error("player {uid} is not for sale")]
    NotForSale { uid: String },

    #[error("offer too low, the position asks {asking}")]
    InsufficientOffer { asking: Money },

    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: Money, available: Money },

    #[error("no pending transfer for player {uid} to act on")]
    NoSuchTransfer { uid: String },

    #[error("outbid loop for player {uid} in league {league} exceeded its bound")]
    OutbidStalled { league: LeagueId, uid: String },

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
