// Auction engine - resolves buy/sell requests against the ledger

mod error;
mod events;
mod market;


pub use error::AuctionError;
pub use events::MarketEvent;
pub use market::{bid, cancel, sell, RAISE_STEP};
