//! The contract with the feed collaborator: one canonicalized snapshot of
//! window state plus player/club facts per league type per cycle.

use ledger_store::{Money, PointTotal, Position};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeedUpdate {
    pub transfer_open: bool,
    pub countdown_secs: i64,
    pub players: Vec<PlayerFact>,
    pub clubs: Vec<ClubFact>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerFact {
    pub uid: String,
    pub name: String,
    pub club: String,
    pub value: Money,
    pub sale_price: Option<Money>,
    pub position: Position,
    pub total_points: Option<PointTotal>,
    pub average_points: Option<f32>,
    pub last_match: Option<PointTotal>,
    pub exists: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClubFact {
    pub club: String,
    pub full_name: Option<String>,
    pub game_start: i64,
    pub game_end: i64,
    pub opponent: Option<String>,
    pub home: Option<bool>,
    pub team_score: Option<i32>,
    pub opponent_score: Option<i32>,
    #[serde(default)]
    pub future_games: Vec<FutureFixture>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FutureFixture {
    pub game_start: i64,
    pub opponent: String,
    pub home: Option<bool>,
}
