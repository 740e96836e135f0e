//! Persisted record shapes. Pure data; every rule that interprets these
//! lives in the engine crates.

use serde::{Deserialize, Serialize};

use crate::types::{
    Counterparty, Formation, LeagueId, Matchday, Money, Placement, PointTotal, Position, UserId,
};

/// League configuration plus the bits of window state the feed drives.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LeagueSettings {
    pub id: LeagueId,
    pub name: String,
    /// Upstream competition this league draws player/club facts from.
    pub league_type: String,
    pub start_money: Money,
    /// Settled buys + sells allowed per transfer window.
    pub transfers: u32,
    /// Max simultaneous holders of one player (plus pending AI stock offers).
    pub duplicate_players: u32,
    /// Star bonus in percent; 150 means a starred player scores 1.5x.
    pub starred_percentage: u32,
    pub predict_exact: PointTotal,
    pub predict_difference: PointTotal,
    pub predict_winner: PointTotal,
    pub top11: bool,
    /// Allows market operations while the window is closed.
    pub matchday_transfers: bool,
    pub fantasy_enabled: bool,
    pub predictions_enabled: bool,
    /// Archival timestamp; any value means the league is read-only.
    pub archived: Option<i64>,
    pub transfer_open: bool,
    pub countdown_secs: i64,
}

impl LeagueSettings {
    pub fn new(id: LeagueId, name: impl Into<String>, league_type: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            league_type: league_type.into(),
            start_money: 150_000_000,
            transfers: 6,
            duplicate_players: 1,
            starred_percentage: 150,
            predict_exact: 15,
            predict_difference: 5,
            predict_winner: 2,
            top11: false,
            matchday_transfers: false,
            fantasy_enabled: true,
            predictions_enabled: true,
            archived: None,
            transfer_open: false,
            countdown_secs: 0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Membership {
    pub league: LeagueId,
    pub user: UserId,
    pub money: Money,
    pub formation: Formation,
    pub fantasy_points: PointTotal,
    pub prediction_points: PointTotal,
    pub points: PointTotal,
    pub admin: bool,
}

impl Membership {
    pub fn new(league: LeagueId, user: UserId, money: Money, admin: bool) -> Self {
        Self {
            league,
            user,
            money,
            formation: Formation([1, 4, 4, 2]),
            fantasy_points: 0,
            prediction_points: 0,
            points: 0,
            admin,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Player {
    pub uid: String,
    pub league_type: String,
    pub name: String,
    pub club: String,
    pub value: Money,
    /// What the AI pool charges; never below `value`.
    pub sale_price: Money,
    pub position: Position,
    pub total_points: PointTotal,
    pub average_points: f32,
    pub last_match: PointTotal,
    /// Set once the player's club's match has started.
    pub locked: bool,
    /// False while the player is absent from the feed.
    pub exists: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Club {
    pub club: String,
    pub league_type: String,
    pub full_name: Option<String>,
    pub opponent: Option<String>,
    pub game_start: i64,
    pub game_end: i64,
    pub home: Option<bool>,
    pub team_score: Option<i32>,
    pub opponent_score: Option<i32>,
    pub exists: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SquadSlot {
    pub league: LeagueId,
    pub user: UserId,
    pub uid: String,
    pub placement: Placement,
    pub starred: bool,
}

/// Pending ledger entry for one player changing hands. At most one per
/// (league, player, seller).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Transfer {
    pub league: LeagueId,
    pub uid: String,
    pub seller: Counterparty,
    pub buyer: Counterparty,
    /// Current trade value; what the buyer has paid in.
    pub value: Money,
    /// Ceiling the buyer will go to under automatic raises.
    pub max: Money,
    pub placement: Placement,
    pub starred: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PointsRecord {
    pub league: LeagueId,
    pub user: UserId,
    pub matchday: Matchday,
    pub fantasy_points: PointTotal,
    pub prediction_points: PointTotal,
    pub points: PointTotal,
    pub money: Money,
    /// Settlement time; None while the matchday is in progress.
    pub time: Option<i64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Prediction {
    pub league: LeagueId,
    pub user: UserId,
    /// Home club of the fixture being predicted.
    pub club: String,
    pub home: Option<i32>,
    pub away: Option<i32>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FutureClub {
    pub club: String,
    pub league_type: String,
    pub game_start: i64,
    pub opponent: String,
    pub full_name: Option<String>,
    pub home: Option<bool>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FuturePrediction {
    pub league: LeagueId,
    pub user: UserId,
    pub club: String,
    pub game_start: i64,
    pub home: i32,
    pub away: i32,
}

/// Per-league-type window state reported by the feed each cycle.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct FeedState {
    pub transfer_open: bool,
    pub countdown_secs: i64,
    pub last_update: i64,
}

// Write-once archival mirrors, created only by the lifecycle controller.

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoricalPlayer {
    pub time: i64,
    pub player: Player,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoricalClub {
    pub time: i64,
    pub club: Club,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoricalSquad {
    pub matchday: Matchday,
    pub league: LeagueId,
    pub user: UserId,
    pub uid: String,
    pub placement: Placement,
    pub starred: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoricalTransfer {
    pub matchday: Matchday,
    pub league: LeagueId,
    pub seller: Counterparty,
    pub buyer: Counterparty,
    pub uid: String,
    pub value: Money,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoricalPrediction {
    pub matchday: Matchday,
    pub league: LeagueId,
    pub user: UserId,
    pub club: String,
    pub home: Option<i32>,
    pub away: Option<i32>,
}
