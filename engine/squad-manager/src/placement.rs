//! Squad placement strategies. Leagues either leave placement to their
//! members or run Top-11, which re-arranges every squad optimally each
//! scoring pass.

use ledger_store::{LeagueId, LedgerStore, Placement, Position, UserId};

use crate::error::SquadError;

pub trait PlacementStrategy {
    fn arrange(
        &self,
        store: &mut LedgerStore,
        league: LeagueId,
        user: UserId,
    ) -> Result<(), SquadError>;
}

/// Members arrange their own squads; nothing to do here.
pub struct ManualPlacement;

impl PlacementStrategy for ManualPlacement {
    fn arrange(&self, _: &mut LedgerStore, _: LeagueId, _: UserId) -> Result<(), SquadError> {
        Ok(())
    }
}

/// Ranks owned players by star-adjusted last-match points and greedily
/// fills the formation position by position, benching the rest. Stars are
/// left alone so the bonus follows the player wherever they land.
pub struct TopEleven;

impl PlacementStrategy for TopEleven {
    fn arrange(
        &self,
        store: &mut LedgerStore,
        league: LeagueId,
        user: UserId,
    ) -> Result<(), SquadError> {
        let settings = store.league(league)?;
        let league_type = settings.league_type.clone();
        let pct = settings.starred_percentage as i64;
        let formation = store.membership(league, user)?.formation;

        let mut ranked: Vec<(String, Position, i64)> = Vec::new();
        for slot in store.slots_of_user(league, user) {
            let player = match store.player(&league_type, &slot.uid) {
                Ok(p) => p,
                Err(_) => {
                    tracing::warn!(league, user, uid = %slot.uid, "squad slot without player record");
                    continue;
                }
            };
            let score = player.last_match as i64 * if slot.starred { pct } else { 100 };
            ranked.push((slot.uid.clone(), player.position, score));
        }
        ranked.sort_by(|a, b| a.1.cmp(&b.1).then(b.2.cmp(&a.2)).then(a.0.cmp(&b.0)));

        let mut remaining = [0i32; 4];
        for position in Position::ALL {
            remaining[position.index()] = formation.slots(position) as i32;
        }
        for (uid, position, _) in ranked {
            let placement = if remaining[position.index()] > 0 {
                remaining[position.index()] -= 1;
                Placement::Field(position)
            } else {
                Placement::Bench
            };
            if let Some(slot) = store.slot_mut(league, user, &uid) {
                slot.placement = placement;
            }
        }
        Ok(())
    }
}

/// Pick the strategy the league is configured for.
pub fn strategy_for(top11: bool) -> &'static dyn PlacementStrategy {
    if top11 {
        &TopEleven
    } else {
        &ManualPlacement
    }
}
