use core::fmt;
use serde::{Deserialize, Serialize};

pub type LeagueId = u32;
pub type UserId = u32;
pub type Money = i64;
pub type Matchday = u32;
pub type PointTotal = i32;

/// One side of a pending transfer. Replaces the original sentinel ids
/// (0 = AI pool, -1 = open offer) with a proper tagged union so no code
/// path can do arithmetic on a synthetic identity.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Counterparty {
    User(UserId),
    AiPool,
    OpenMarket,
}

impl Counterparty {
    #[inline]
    pub fn as_user(&self) -> Option<UserId> {
        match self {
            Counterparty::User(id) => Some(*id),
            _ => None,
        }
    }

    /// True for both synthetic identities: the pool and an unmatched listing.
    #[inline]
    pub fn is_synthetic(&self) -> bool {
        !matches!(self, Counterparty::User(_))
    }
}

impl fmt::Display for Counterparty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Counterparty::User(id) => write!(f, "user {id}"),
            Counterparty::AiPool => write!(f, "ai-pool"),
            Counterparty::OpenMarket => write!(f, "open-market"),
        }
    }
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Gk = 0,
    Def = 1,
    Mid = 2,
    Att = 3,
}

impl Position {
    pub const ALL: [Position; 4] = [Position::Gk, Position::Def, Position::Mid, Position::Att];

    #[inline]
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Position::Gk => "gk",
            Position::Def => "def",
            Position::Mid => "mid",
            Position::Att => "att",
        };
        write!(f, "{s}")
    }
}

/// Where a squad member (or pending purchase) currently sits. A fielded
/// player always occupies their natural position.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Placement {
    Bench,
    Field(Position),
}

impl Placement {
    #[inline]
    pub fn is_field(&self) -> bool {
        matches!(self, Placement::Field(_))
    }

    #[inline]
    pub fn field_position(&self) -> Option<Position> {
        match self {
            Placement::Field(p) => Some(*p),
            Placement::Bench => None,
        }
    }
}

/// Slot counts per position: (gk, def, mid, att). Always sums to 11 for
/// the formations the squad manager accepts.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Formation(pub [u8; 4]);

impl Formation {
    #[inline]
    pub fn slots(&self, position: Position) -> u8 {
        self.0[position.index()]
    }

    #[inline]
    pub fn total(&self) -> u8 {
        self.0.iter().sum()
    }
}

impl fmt::Display for Formation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}-{}", self.0[0], self.0[1], self.0[2], self.0[3])
    }
}
