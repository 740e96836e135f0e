//! The continuous transfer market. Every operation validates against the
//! ledger before any money moves; each debit/credit pair is applied
//! together, so a rejected operation leaves no partial mutation.

use ledger_store::{Counterparty, LeagueId, LedgerStore, Money, Placement, Transfer, UserId};

use crate::error::AuctionError;
use crate::events::MarketEvent;

/// Fixed increment offers climb by when contested.
pub const RAISE_STEP: Money = 100_000;

/// Checks shared by every market operation: league active, fantasy squads
/// on, and the window open (or matchday trading allowed).
fn market_gate(store: &LedgerStore, league: LeagueId) -> Result<MarketContext, AuctionError> {
    let settings = store.active_league(league)?;
    if !settings.fantasy_enabled {
        return Err(AuctionError::FantasyDisabled { league });
    }
    if !settings.transfer_open && !settings.matchday_transfers {
        return Err(AuctionError::MarketClosed { league });
    }
    Ok(MarketContext {
        league_type: settings.league_type.clone(),
        duplicate_players: settings.duplicate_players as usize,
        allowance: settings.transfers as usize,
    })
}

struct MarketContext {
    league_type: String,
    duplicate_players: usize,
    allowance: usize,
}

/// The allowance counts this window's settled buys and sells; a user with
/// an empty squad is exempt so newcomers can build one.
fn ensure_allowance(
    store: &LedgerStore,
    league: LeagueId,
    user: UserId,
    allowance: usize,
) -> Result<(), AuctionError> {
    if store.slots_of_user(league, user).is_empty() {
        return Ok(());
    }
    if store.transfers_involving(league, user) >= allowance {
        return Err(AuctionError::NoTransfersLeft { league, user });
    }
    Ok(())
}

/// Place or raise a purchase offer. `amount` is the most the bidder is
/// willing to pay; what they actually pay is set by the market.
pub fn bid(
    store: &mut LedgerStore,
    league: LeagueId,
    user: UserId,
    uid: &str,
    amount: Money,
) -> Result<Vec<MarketEvent>, AuctionError> {
    if amount <= 0 {
        return Err(AuctionError::InvalidAmount { amount });
    }
    let ctx = market_gate(store, league)?;
    let sale_price = store.player(&ctx.league_type, uid)?.sale_price;
    store.membership(league, user)?;

    if store.slot(league, user, uid).is_some() {
        return Err(AuctionError::AlreadyOwned { uid: uid.to_string() });
    }

    // An existing offer can only have its ceiling lifted, never lowered.
    if let Some(current) = store.transfer_by_buyer(league, uid, Counterparty::User(user)) {
        if amount < current.value {
            return Err(AuctionError::BidTooLow { committed: current.value });
        }
        let current = store
            .transfer_by_buyer_mut(league, uid, Counterparty::User(user))
            .expect("offer fetched above");
        current.max = amount;
        tracing::info!(league, user, uid, max = amount, "purchase ceiling raised");
        return Ok(vec![MarketEvent::CeilingRaised {
            league,
            uid: uid.to_string(),
            buyer: user,
            max: amount,
        }]);
    }

    ensure_allowance(store, league, user, ctx.allowance)?;

    // Fresh AI stock: instances owned or already claimed from the pool.
    let owned = store.owners_of_player(league, uid);
    let transfers = store.transfers_for_player(league, uid);
    let pool_claims = transfers
        .iter()
        .filter(|t| t.seller == Counterparty::AiPool)
        .count();
    let human_sales = transfers
        .iter()
        .filter(|t| t.seller.as_user().is_some())
        .count();

    if owned + pool_claims < ctx.duplicate_players {
        // The pool sells at sale price, not at the bid; the bid becomes
        // the ceiling for future automatic raises.
        if amount < sale_price {
            return Err(AuctionError::InsufficientOffer { asking: sale_price });
        }
        let available = store.membership(league, user)?.money;
        if available < sale_price {
            return Err(AuctionError::InsufficientFunds {
                needed: sale_price,
                available,
            });
        }
        store.debit(league, user, sale_price)?;
        store.insert_transfer(Transfer {
            league,
            uid: uid.to_string(),
            seller: Counterparty::AiPool,
            buyer: Counterparty::User(user),
            value: sale_price,
            max: amount,
            placement: Placement::Bench,
            starred: false,
        })?;
        tracing::info!(league, user, uid, price = sale_price, max = amount, "bought from the pool");
        return Ok(vec![MarketEvent::AiSale {
            league,
            uid: uid.to_string(),
            buyer: user,
            price: sale_price,
        }]);
    }

    // Every instance is held; only an instance that could change hands
    // (a real seller, or an offer to take over) is biddable.
    if owned.saturating_sub(human_sales) >= ctx.duplicate_players {
        return Err(AuctionError::NotForSale { uid: uid.to_string() });
    }

    outbid(store, league, user, uid, amount)
}

/// The outbid protocol: auto-raise the cheapest offer while its holder's
/// ceiling and funds allow, then either reject the challenge or move the
/// offer to the challenger one step up.
fn outbid(
    store: &mut LedgerStore,
    league: LeagueId,
    user: UserId,
    uid: &str,
    amount: Money,
) -> Result<Vec<MarketEvent>, AuctionError> {
    let mut events = Vec::new();

    let offers = store.transfers_for_player(league, uid);
    if offers.is_empty() {
        return Err(AuctionError::NotForSale { uid: uid.to_string() });
    }
    let floor = offers.iter().map(|t| t.value).min().unwrap_or(0);
    // Each iteration either raises one offer by one step or exits, and no
    // offer is raised past `amount`, so this bound can only trip on
    // corrupted data.
    let climb = ((amount - floor).max(0) / RAISE_STEP) as usize;
    let bound = offers.len() * (climb + 1) + 2;

    for _ in 0..bound {
        let cheapest = match store
            .transfers_for_player(league, uid)
            .into_iter()
            .min_by_key(|t| t.value)
        {
            Some(t) => t.clone(),
            None => return Err(AuctionError::NotForSale { uid: uid.to_string() }),
        };

        // The incumbent defends up to their recorded ceiling, paying the
        // seller one step at a time. Defending stops as soon as the
        // challenge is repelled; a hopeless challenge triggers no raise.
        if cheapest.max > cheapest.value && cheapest.value + RAISE_STEP < amount {
            if let Some(holder) = cheapest.buyer.as_user() {
                if store.membership(league, holder)?.money >= RAISE_STEP {
                    store.debit(league, holder, RAISE_STEP)?;
                    store.credit_party(league, cheapest.seller, RAISE_STEP)?;
                    let offer = store
                        .transfer_mut(league, uid, cheapest.seller, cheapest.buyer)
                        .expect("cheapest offer fetched above");
                    offer.value += RAISE_STEP;
                    let value = offer.value;
                    tracing::info!(league, holder, uid, value, "automatic bid increase");
                    events.push(MarketEvent::AutoRaise {
                        league,
                        uid: uid.to_string(),
                        holder,
                        value,
                    });
                    continue;
                }
            }
        }

        // Taking over a synthetic holder costs the current value; a real
        // incumbent must be beaten by a full step.
        let step = if cheapest.buyer.is_synthetic() { 0 } else { RAISE_STEP };
        let price = cheapest.value + step;
        if price >= amount {
            return Err(AuctionError::InsufficientOffer { asking: price });
        }
        let available = store.membership(league, user)?.money;
        if available < price {
            return Err(AuctionError::InsufficientFunds {
                needed: price,
                available,
            });
        }

        store.debit(league, user, price)?;
        if let Some(previous) = cheapest.buyer.as_user() {
            // Full refund of what the incumbent had paid in.
            store.credit(league, previous, cheapest.value)?;
        }
        if step > 0 {
            store.credit_party(league, cheapest.seller, step)?;
        }
        if cheapest.buyer == Counterparty::OpenMarket {
            // An open listing is unfunded; the challenger's payment is
            // what the seller has been waiting for.
            store.credit_party(league, cheapest.seller, cheapest.value)?;
        }
        let offer = store
            .transfer_mut(league, uid, cheapest.seller, cheapest.buyer)
            .expect("cheapest offer fetched above");
        offer.buyer = Counterparty::User(user);
        offer.value = cheapest.value + step;
        offer.max = amount;
        offer.placement = Placement::Bench;
        offer.starred = false;
        tracing::info!(
            league,
            user,
            uid,
            price,
            previous = %cheapest.buyer,
            "outbid"
        );
        events.push(MarketEvent::Outbid {
            league,
            uid: uid.to_string(),
            buyer: user,
            previous: cheapest.buyer,
            price,
        });
        return Ok(events);
    }

    tracing::error!(league, uid, "outbid loop exceeded its iteration bound");
    Err(AuctionError::OutbidStalled {
        league,
        uid: uid.to_string(),
    })
}

/// List a player for sale, or raise/cancel an existing listing.
/// `min_amount <= 0` cancels. Asking below sale price is clamped up to it;
/// a listing at exactly sale price is bought by the pool on the spot.
pub fn sell(
    store: &mut LedgerStore,
    league: LeagueId,
    user: UserId,
    uid: &str,
    min_amount: Money,
) -> Result<Vec<MarketEvent>, AuctionError> {
    if min_amount <= 0 {
        let has_sale = store
            .transfers_for_player(league, uid)
            .iter()
            .any(|t| t.seller == Counterparty::User(user));
        if !has_sale {
            return Err(AuctionError::NoSuchTransfer { uid: uid.to_string() });
        }
        return cancel(store, league, user, uid);
    }

    let ctx = market_gate(store, league)?;
    let sale_price = store.player(&ctx.league_type, uid)?.sale_price;
    store.membership(league, user)?;

    // Raising an existing listing.
    if let Some(existing) = store
        .transfers_for_player(league, uid)
        .into_iter()
        .find(|t| t.seller == Counterparty::User(user))
        .cloned()
    {
        if min_amount <= existing.value {
            return Ok(Vec::new());
        }
        return raise_sale(store, league, user, uid, existing, min_amount);
    }

    if store.slot(league, user, uid).is_none() {
        return Err(AuctionError::NotOwned { uid: uid.to_string() });
    }
    ensure_allowance(store, league, user, ctx.allowance)?;

    let asking = min_amount.max(sale_price);
    if asking == sale_price {
        // The pool takes any player at sale price, immediately.
        store.insert_transfer(Transfer {
            league,
            uid: uid.to_string(),
            seller: Counterparty::User(user),
            buyer: Counterparty::AiPool,
            value: asking,
            max: asking,
            placement: Placement::Bench,
            starred: false,
        })?;
        store.credit(league, user, asking)?;
        tracing::info!(league, user, uid, price = asking, "sold to the pool");
        Ok(vec![MarketEvent::PoolSale {
            league,
            uid: uid.to_string(),
            seller: user,
            price: asking,
        }])
    } else {
        store.insert_transfer(Transfer {
            league,
            uid: uid.to_string(),
            seller: Counterparty::User(user),
            buyer: Counterparty::OpenMarket,
            value: asking,
            max: asking,
            placement: Placement::Bench,
            starred: false,
        })?;
        tracing::info!(league, user, uid, asking, "listed above sale price");
        Ok(vec![MarketEvent::Listed {
            league,
            uid: uid.to_string(),
            seller: user,
            asking,
        }])
    }
}

fn raise_sale(
    store: &mut LedgerStore,
    league: LeagueId,
    user: UserId,
    uid: &str,
    existing: Transfer,
    min_amount: Money,
) -> Result<Vec<MarketEvent>, AuctionError> {
    let seller = Counterparty::User(user);
    match existing.buyer {
        Counterparty::User(buyer) => {
            let gap = min_amount - existing.value;
            let buyer_money = store.membership(league, buyer)?.money;
            if existing.max >= min_amount && buyer_money >= gap {
                // The buyer's commitment follows the trade value.
                store.debit(league, buyer, gap)?;
                store.credit(league, user, gap)?;
                let offer = store
                    .transfer_mut(league, uid, seller, existing.buyer)
                    .expect("existing sale fetched above");
                offer.value = min_amount;
                tracing::info!(league, user, uid, value = min_amount, "sale minimum raised");
                Ok(vec![MarketEvent::SaleRaised {
                    league,
                    uid: uid.to_string(),
                    seller: user,
                    value: min_amount,
                }])
            } else {
                // Beyond the buyer's ceiling or funds: the sale reverts to
                // an open listing, the seller hands back the proceeds and
                // the displaced buyer is made whole.
                let seller_money = store.membership(league, user)?.money;
                if seller_money < existing.value {
                    return Err(AuctionError::InsufficientFunds {
                        needed: existing.value,
                        available: seller_money,
                    });
                }
                store.debit(league, user, existing.value)?;
                store.credit(league, buyer, existing.value)?;
                park_listing(store, league, uid, seller, existing.buyer, min_amount);
                tracing::info!(league, user, uid, asking = min_amount, "sale parked as open offer");
                Ok(vec![MarketEvent::SaleParked {
                    league,
                    uid: uid.to_string(),
                    seller: user,
                    refunded: existing.buyer,
                    asking: min_amount,
                }])
            }
        }
        Counterparty::AiPool => {
            // Un-selling from the pool to ask for more on the open market.
            let seller_money = store.membership(league, user)?.money;
            if seller_money < existing.value {
                return Err(AuctionError::InsufficientFunds {
                    needed: existing.value,
                    available: seller_money,
                });
            }
            store.debit(league, user, existing.value)?;
            park_listing(store, league, uid, seller, Counterparty::AiPool, min_amount);
            tracing::info!(league, user, uid, asking = min_amount, "pool sale relisted higher");
            Ok(vec![MarketEvent::SaleParked {
                league,
                uid: uid.to_string(),
                seller: user,
                refunded: Counterparty::AiPool,
                asking: min_amount,
            }])
        }
        Counterparty::OpenMarket => {
            let offer = store
                .transfer_mut(league, uid, seller, Counterparty::OpenMarket)
                .expect("existing sale fetched above");
            offer.value = min_amount;
            offer.max = min_amount;
            tracing::info!(league, user, uid, asking = min_amount, "open listing raised");
            Ok(vec![MarketEvent::SaleRaised {
                league,
                uid: uid.to_string(),
                seller: user,
                value: min_amount,
            }])
        }
    }
}

fn park_listing(
    store: &mut LedgerStore,
    league: LeagueId,
    uid: &str,
    seller: Counterparty,
    buyer: Counterparty,
    asking: Money,
) {
    let offer = store
        .transfer_mut(league, uid, seller, buyer)
        .expect("existing sale fetched above");
    offer.buyer = Counterparty::OpenMarket;
    offer.value = asking;
    offer.max = asking;
    offer.placement = Placement::Bench;
    offer.starred = false;
}

/// Withdraw a pending purchase or sale.
pub fn cancel(
    store: &mut LedgerStore,
    league: LeagueId,
    user: UserId,
    uid: &str,
) -> Result<Vec<MarketEvent>, AuctionError> {
    market_gate(store, league)?;
    store.membership(league, user)?;
    let party = Counterparty::User(user);

    // Sale side: the seller returns what the trade had paid them.
    if let Some(sale) = store
        .transfers_for_player(league, uid)
        .into_iter()
        .find(|t| t.seller == party)
        .cloned()
    {
        match sale.buyer {
            Counterparty::OpenMarket => {}
            _ => {
                let available = store.membership(league, user)?.money;
                if available < sale.value {
                    return Err(AuctionError::InsufficientFunds {
                        needed: sale.value,
                        available,
                    });
                }
                store.debit(league, user, sale.value)?;
                store.credit_party(league, sale.buyer, sale.value)?;
            }
        }
        store.remove_transfer(league, uid, party, sale.buyer);
        tracing::info!(league, user, uid, buyer = %sale.buyer, "sale cancelled");
        return Ok(vec![MarketEvent::SaleCancelled {
            league,
            uid: uid.to_string(),
            seller: user,
            refunded: sale.buyer,
        }]);
    }

    // Purchase side: refund the settled value; a real seller's sale stands,
    // with the pool taking over the buy side.
    if let Some(purchase) = store.transfer_by_buyer(league, uid, party).cloned() {
        store.credit(league, user, purchase.value)?;
        if purchase.seller == Counterparty::AiPool {
            store.remove_transfer(league, uid, purchase.seller, party);
        } else {
            let offer = store
                .transfer_mut(league, uid, purchase.seller, party)
                .expect("purchase fetched above");
            offer.buyer = Counterparty::AiPool;
            offer.max = offer.value;
            offer.placement = Placement::Bench;
            offer.starred = false;
        }
        tracing::info!(league, user, uid, refunded = purchase.value, "purchase cancelled");
        return Ok(vec![MarketEvent::PurchaseCancelled {
            league,
            uid: uid.to_string(),
            buyer: user,
            refunded: purchase.value,
        }]);
    }

    Err(AuctionError::NoSuchTransfer { uid: uid.to_string() })
}
