//! Applies point computations to the ledger as deltas, never absolutes,
//! so a pass can run any number of times per matchday without
//! double-counting.

use ledger_store::{LeagueId, LedgerStore, PointTotal};
use squad_manager::strategy_for;

use crate::error::ScoringError;
use crate::{fantasy, predictions};

/// Opportunistic pass: a no-op while the transfer window is open.
pub fn run_league(store: &mut LedgerStore, league: LeagueId) -> Result<(), ScoringError> {
    let settings = store.league(league)?;
    if settings.transfer_open {
        return Ok(());
    }
    run_league_unchecked(store, league)
}

/// The pass itself, used directly by the lifecycle controller around
/// window transitions where the stored flag is mid-flip.
pub fn run_league_unchecked(store: &mut LedgerStore, league: LeagueId) -> Result<(), ScoringError> {
    let settings = store.league(league)?.clone();
    if settings.archived.is_some() {
        return Ok(());
    }
    if store.current_matchday(league) == 0 {
        return Ok(());
    }
    let strategy = strategy_for(settings.top11);

    for user in store.members_of_league(league) {
        strategy.arrange(store, league, user)?;
        predictions::coalesce_live(store, league, user);

        let Some(open) = store.open_points(league, user) else {
            continue;
        };
        let matchday = open.matchday;
        let old_fantasy = open.fantasy_points;
        let old_prediction = open.prediction_points;

        let new_fantasy = fantasy::fantasy_points(store, &settings, user);
        let new_prediction = predictions::live_points(store, &settings, user);

        if new_fantasy != old_fantasy {
            let row = store
                .points_record_mut(league, user, matchday)
                .expect("open points row fetched above");
            row.fantasy_points = new_fantasy;
            row.points = row.prediction_points + new_fantasy;
            let membership = store.membership_mut(league, user)?;
            membership.fantasy_points += new_fantasy - old_fantasy;
            membership.points = membership.prediction_points + membership.fantasy_points;
            tracing::debug!(league, user, matchday, new_fantasy, "fantasy points updated");
        }
        if new_prediction != old_prediction {
            let row = store
                .points_record_mut(league, user, matchday)
                .expect("open points row fetched above");
            row.prediction_points = new_prediction;
            row.points = row.fantasy_points + new_prediction;
            let membership = store.membership_mut(league, user)?;
            membership.prediction_points += new_prediction - old_prediction;
            membership.points = membership.fantasy_points + membership.prediction_points;
            tracing::debug!(league, user, matchday, new_prediction, "prediction points updated");
        }
    }
    Ok(())
}

/// Recompute prediction points for every settled matchday from the
/// historical mirrors and fold the accumulated difference into the
/// membership aggregates. Run after an admin corrects game results.
pub fn recalculate(store: &mut LedgerStore, league: LeagueId) -> Result<PointTotal, ScoringError> {
    let settings = store.active_league(league)?.clone();

    let mut rows: Vec<_> = store
        .points_of_league(league)
        .into_iter()
        .filter(|p| p.time.is_some())
        .cloned()
        .collect();
    rows.sort_by_key(|p| (p.user, p.matchday));

    let mut total_change: PointTotal = 0;
    let mut current_user = None;
    let mut user_change: PointTotal = 0;

    for row in rows {
        if current_user != Some(row.user) {
            if let Some(user) = current_user {
                apply_user_change(store, league, user, user_change)?;
            }
            current_user = Some(row.user);
            user_change = 0;
        }
        let fresh = predictions::historical_points(store, &settings, &row);
        let diff = fresh - row.prediction_points;
        if diff != 0 {
            let stored = store
                .points_record_mut(league, row.user, row.matchday)
                .expect("settled row fetched above");
            stored.prediction_points = fresh;
            stored.points += diff;
            user_change += diff;
            total_change += diff;
        }
    }
    if let Some(user) = current_user {
        apply_user_change(store, league, user, user_change)?;
    }
    tracing::info!(league, total_change, "prediction points recalculated");
    Ok(total_change)
}

fn apply_user_change(
    store: &mut LedgerStore,
    league: LeagueId,
    user: ledger_store::UserId,
    change: PointTotal,
) -> Result<(), ScoringError> {
    if change == 0 {
        return Ok(());
    }
    let membership = store.membership_mut(league, user)?;
    membership.prediction_points += change;
    membership.points += change;
    Ok(())
}
