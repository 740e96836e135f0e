//! Fantasy points: last-match points of the fielded squad, with the star
//! bonus applied to the starred subset. Bench players never contribute,
//! and neither do pending purchases.

use ledger_store::{LeagueId, LeagueSettings, LedgerStore, PointTotal, UserId};

/// Ceiling of n/d for positive d, correct for negative n as well
/// (players can finish a matchday with negative points).
pub(crate) fn ceil_ratio(n: i64, d: i64) -> i64 {
    -((-n).div_euclid(d))
}

pub fn fantasy_points(
    store: &LedgerStore,
    settings: &LeagueSettings,
    user: UserId,
) -> PointTotal {
    let league: LeagueId = settings.id;
    let mut unstarred: i64 = 0;
    let mut starred: i64 = 0;
    for slot in store.slots_of_user(league, user) {
        if !slot.placement.is_field() {
            continue;
        }
        let last_match = match store.player(&settings.league_type, &slot.uid) {
            Ok(p) => p.last_match as i64,
            Err(_) => continue,
        };
        if slot.starred {
            starred += last_match;
        } else {
            unstarred += last_match;
        }
    }
    (unstarred + ceil_ratio(starred * settings.starred_percentage as i64, 100)) as PointTotal
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_store::{Placement, Player, Position, SquadSlot};

    fn player(uid: &str, last_match: i32) -> Player {
        Player {
            uid: uid.to_string(),
            league_type: "bundesliga".to_string(),
            name: uid.to_uppercase(),
            club: "fcb".to_string(),
            value: 1_000_000,
            sale_price: 1_000_000,
            position: Position::Mid,
            total_points: last_match,
            average_points: last_match as f32,
            last_match,
            locked: false,
            exists: true,
        }
    }

    #[test]
    fn ceil_ratio_rounds_up_toward_positive() {
        assert_eq!(ceil_ratio(300, 100), 3);
        assert_eq!(ceil_ratio(301, 100), 4);
        assert_eq!(ceil_ratio(-301, 100), -3);
        assert_eq!(ceil_ratio(0, 100), 0);
    }

    #[test]
    fn starred_points_are_scaled_and_rounded_up() {
        let mut store = LedgerStore::new();
        let league = store.create_league("test", "bundesliga", 1);
        let settings = store.league(league).unwrap().clone();

        for (uid, pts, placement, starred) in [
            ("m1", 7, Placement::Field(Position::Mid), false),
            ("m2", 5, Placement::Field(Position::Mid), true),
            ("m3", 9, Placement::Bench, false),
        ] {
            store.upsert_player(player(uid, pts));
            store.insert_slot(SquadSlot {
                league,
                user: 1,
                uid: uid.to_string(),
                placement,
                starred,
            });
        }
        // 7 + ceil(5 * 1.5) = 7 + 8; the benched 9 never counts.
        assert_eq!(fantasy_points(&store, &settings, 1), 15);
    }

    #[test]
    fn negative_last_match_points_pass_through() {
        let mut store = LedgerStore::new();
        let league = store.create_league("test", "bundesliga", 1);
        let settings = store.league(league).unwrap().clone();
        store.upsert_player(player("m1", -3));
        store.insert_slot(SquadSlot {
            league,
            user: 1,
            uid: "m1".to_string(),
            placement: Placement::Field(Position::Mid),
            starred: true,
        });
        // ceil(-3 * 1.5) = ceil(-4.5) = -4.
        assert_eq!(fantasy_points(&store, &settings, 1), -4);
    }
}
