use ledger_store::{Counterparty, LeagueId, Money, UserId};

/// Settlement events emitted by the market, in the order they happened.
/// One user operation can produce several (auto-raises before an outbid).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarketEvent {
    /// A bid settled instantly against the AI pool's remaining stock.
    AiSale {
        league: LeagueId,
        uid: String,
        buyer: UserId,
        price: Money,
    },
    /// An existing purchase offer's ceiling was lifted.
    CeilingRaised {
        league: LeagueId,
        uid: String,
        buyer: UserId,
        max: Money,
    },
    /// An incumbent buyer automatically defended their offer by one step.
    AutoRaise {
        league: LeagueId,
        uid: String,
        holder: UserId,
        value: Money,
    },
    /// A challenger took over the cheapest offer.
    Outbid {
        league: LeagueId,
        uid: String,
        buyer: UserId,
        previous: Counterparty,
        price: Money,
    },
    /// The AI pool bought a listing at sale price on the spot.
    PoolSale {
        league: LeagueId,
        uid: String,
        seller: UserId,
        price: Money,
    },
    /// A listing above sale price went up without a buyer.
    Listed {
        league: LeagueId,
        uid: String,
        seller: UserId,
        asking: Money,
    },
    /// The matched buyer accepted a higher minimum.
    SaleRaised {
        league: LeagueId,
        uid: String,
        seller: UserId,
        value: Money,
    },
    /// The raise exceeded the buyer's ceiling; offer reverted to the open
    /// market and the buyer was made whole.
    SaleParked {
        league: LeagueId,
        uid: String,
        seller: UserId,
        refunded: Counterparty,
        asking: Money,
    },
    SaleCancelled {
        league: LeagueId,
        uid: String,
        seller: UserId,
        refunded: Counterparty,
    },
    PurchaseCancelled {
        league: LeagueId,
        uid: String,
        buyer: UserId,
        refunded: Money,
    },
}
