// Squad manager - formations, bench/field moves, stars, Top-11

mod error;
mod formation;
mod manager;
mod placement;

pub use error::SquadError;
pub use formation::{is_valid, VALID_FORMATIONS};
pub use manager::{move_player, occupancy, set_formation, set_starred};
pub use placement::{strategy_for, ManualPlacement, PlacementStrategy, TopEleven};
