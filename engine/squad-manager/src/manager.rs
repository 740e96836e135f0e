//! Manual squad management. Every operation sees the union of owned slots
//! and pending purchases; both carry placement and star flags.

use ledger_store::{Counterparty, Formation, LeagueId, LedgerStore, Placement, Position, UserId};

use crate::error::SquadError;
use crate::formation;

struct SquadContext {
    league_type: String,
}

/// League must be active and running fantasy squads. While Top-11 is on
/// and the window is closed, the auto-arranger owns the squad and manual
/// changes are rejected.
fn squad_gate(store: &LedgerStore, league: LeagueId) -> Result<SquadContext, SquadError> {
    let settings = store.active_league(league)?;
    if !settings.fantasy_enabled {
        return Err(SquadError::FantasyDisabled { league });
    }
    if settings.top11 && !settings.transfer_open {
        return Err(SquadError::TopElevenActive { league });
    }
    Ok(SquadContext {
        league_type: settings.league_type.clone(),
    })
}

/// Fielded players in a position, counting pending purchases.
pub fn occupancy(store: &LedgerStore, league: LeagueId, user: UserId, position: Position) -> usize {
    let fielded = Placement::Field(position);
    let owned = store
        .slots_of_user(league, user)
        .iter()
        .filter(|s| s.placement == fielded)
        .count();
    let pending = store
        .transfers_of_buyer(league, Counterparty::User(user))
        .iter()
        .filter(|t| t.placement == fielded)
        .count();
    owned + pending
}

fn holding_placement(
    store: &LedgerStore,
    league: LeagueId,
    user: UserId,
    uid: &str,
) -> Option<Placement> {
    if let Some(slot) = store.slot(league, user, uid) {
        return Some(slot.placement);
    }
    store
        .transfer_by_buyer(league, uid, Counterparty::User(user))
        .map(|t| t.placement)
}

fn place_holding(
    store: &mut LedgerStore,
    league: LeagueId,
    user: UserId,
    uid: &str,
    placement: Placement,
    starred: bool,
) {
    if let Some(slot) = store.slot_mut(league, user, uid) {
        slot.placement = placement;
        slot.starred = starred;
    } else if let Some(t) = store.transfer_by_buyer_mut(league, uid, Counterparty::User(user)) {
        t.placement = placement;
        t.starred = starred;
    }
}

pub fn set_formation(
    store: &mut LedgerStore,
    league: LeagueId,
    user: UserId,
    formation: Formation,
) -> Result<(), SquadError> {
    squad_gate(store, league)?;
    if !formation::is_valid(formation) {
        return Err(SquadError::InvalidFormation { formation });
    }
    store.membership(league, user)?;
    for position in [Position::Def, Position::Mid, Position::Att] {
        if occupancy(store, league, user, position) > formation.slots(position) as usize {
            return Err(SquadError::NotEnoughRoom { position });
        }
    }
    store.membership_mut(league, user)?.formation = formation;
    tracing::info!(league, user, %formation, "formation changed");
    Ok(())
}

/// Toggle a player between bench and field. Benching always works and
/// drops any star; fielding needs an unlocked player and a free slot.
pub fn move_player(
    store: &mut LedgerStore,
    league: LeagueId,
    user: UserId,
    uid: &str,
) -> Result<(), SquadError> {
    let ctx = squad_gate(store, league)?;
    let placement = holding_placement(store, league, user, uid)
        .ok_or_else(|| SquadError::NotYourPlayer { uid: uid.to_string() })?;

    if placement.is_field() {
        place_holding(store, league, user, uid, Placement::Bench, false);
        tracing::info!(league, user, uid, "moved to bench");
        return Ok(());
    }

    let player = store.player(&ctx.league_type, uid)?;
    if player.locked {
        return Err(SquadError::PlayerLocked { uid: uid.to_string() });
    }
    let position = player.position;
    let formation = store.membership(league, user)?.formation;
    if occupancy(store, league, user, position) >= formation.slots(position) as usize {
        return Err(SquadError::NotEnoughRoom { position });
    }
    place_holding(store, league, user, uid, Placement::Field(position), false);
    tracing::info!(league, user, uid, %position, "moved to field");
    Ok(())
}

/// Star the given players. Each must be fielded and unlocked; the previous
/// star of the same position category is cleared first, across owned slots
/// and pending purchases alike.
pub fn set_starred(
    store: &mut LedgerStore,
    league: LeagueId,
    user: UserId,
    uids: &[String],
) -> Result<(), SquadError> {
    let ctx = squad_gate(store, league)?;
    for uid in uids {
        let placement = holding_placement(store, league, user, uid)
            .ok_or_else(|| SquadError::NotYourPlayer { uid: uid.clone() })?;
        let position = placement
            .field_position()
            .ok_or_else(|| SquadError::NotOnField { uid: uid.clone() })?;
        if store.player(&ctx.league_type, uid)?.locked {
            return Err(SquadError::PlayerLocked { uid: uid.clone() });
        }

        let cleared = Placement::Field(position);
        for slot in store.slots_of_user_mut(league, user) {
            if slot.placement == cleared || slot.placement == Placement::Bench {
                slot.starred = false;
            }
        }
        for t in store.transfers_of_buyer_mut(league, Counterparty::User(user)) {
            if t.placement == cleared || t.placement == Placement::Bench {
                t.starred = false;
            }
        }
        place_holding(store, league, user, uid, cleared, true);
        tracing::info!(league, user, uid, %position, "starred");
    }
    Ok(())
}
