//! The operation surface the web/API collaborator calls into. Each user
//! intent validates its input shape, waits out any in-flight feed
//! ingestion for the league's type, and runs against the single-writer
//! ledger.

use std::sync::Mutex;
use std::time::Duration;

use chrono::Utc;

use auction_engine::MarketEvent;
use ledger_store::{
    Formation, FuturePrediction, LeagueId, LedgerStore, LockRegistry, Membership, Money,
    Prediction, SquadSlot, UserId,
};
use matchday_controller::{FeedUpdate, IngestOutcome};

use crate::config::ServiceConfig;
use crate::error::ServiceError;

pub struct LeagueService {
    store: Mutex<LedgerStore>,
    locks: LockRegistry,
    config: ServiceConfig,
}

impl LeagueService {
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            store: Mutex::new(LedgerStore::new()),
            locks: LockRegistry::new(),
            config,
        }
    }

    fn wait_timeout(&self) -> Duration {
        Duration::from_millis(self.config.lock.wait_timeout_ms)
    }

    fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.config.lock.poll_interval_ms)
    }

    /// Run an operation that needs a consistent player/club snapshot:
    /// wait for any in-flight ingestion of the league's type, then take
    /// the store.
    fn with_settled_league<R>(
        &self,
        league: LeagueId,
        op: impl FnOnce(&mut LedgerStore) -> Result<R, ServiceError>,
    ) -> Result<R, ServiceError> {
        let league_type = {
            let store = self.store.lock().expect("ledger mutex poisoned");
            store.league(league)?.league_type.clone()
        };
        self.locks
            .wait_clear(&league_type, self.wait_timeout(), self.poll_interval())?;
        let mut store = self.store.lock().expect("ledger mutex poisoned");
        op(&mut store)
    }

    // ---- league administration --------------------------------------

    pub fn create_league(
        &self,
        name: &str,
        league_type: &str,
        founder: UserId,
    ) -> Result<LeagueId, ServiceError> {
        validate_identifier(league_type)?;
        let mut store = self.store.lock().expect("ledger mutex poisoned");
        Ok(store.create_league(name, league_type, founder))
    }

    pub fn join_league(&self, league: LeagueId, user: UserId) -> Result<(), ServiceError> {
        self.with_settled_league(league, |store| Ok(store.join_league(league, user)?))
    }

    pub fn leave_league(&self, league: LeagueId, user: UserId) -> Result<(), ServiceError> {
        self.with_settled_league(league, |store| Ok(store.leave_league(league, user)?))
    }

    pub fn archive_league(&self, league: LeagueId, acting: UserId) -> Result<(), ServiceError> {
        self.with_settled_league(league, |store| {
            ensure_admin(store, league, acting)?;
            Ok(store.archive_league(league, Utc::now().timestamp())?)
        })
    }

    // ---- transfer market --------------------------------------------

    pub fn place_bid(
        &self,
        league: LeagueId,
        user: UserId,
        uid: &str,
        amount: Money,
    ) -> Result<Vec<MarketEvent>, ServiceError> {
        validate_identifier(uid)?;
        self.with_settled_league(league, |store| {
            Ok(auction_engine::bid(store, league, user, uid, amount)?)
        })
    }

    pub fn place_sale(
        &self,
        league: LeagueId,
        user: UserId,
        uid: &str,
        min_amount: Money,
    ) -> Result<Vec<MarketEvent>, ServiceError> {
        validate_identifier(uid)?;
        self.with_settled_league(league, |store| {
            Ok(auction_engine::sell(store, league, user, uid, min_amount)?)
        })
    }

    pub fn cancel_offer(
        &self,
        league: LeagueId,
        user: UserId,
        uid: &str,
    ) -> Result<Vec<MarketEvent>, ServiceError> {
        validate_identifier(uid)?;
        self.with_settled_league(league, |store| {
            Ok(auction_engine::cancel(store, league, user, uid)?)
        })
    }

    // ---- squad management -------------------------------------------

    pub fn set_formation(
        &self,
        league: LeagueId,
        user: UserId,
        formation: Formation,
    ) -> Result<(), ServiceError> {
        self.with_settled_league(league, |store| {
            Ok(squad_manager::set_formation(store, league, user, formation)?)
        })
    }

    pub fn move_player(
        &self,
        league: LeagueId,
        user: UserId,
        uid: &str,
    ) -> Result<(), ServiceError> {
        validate_identifier(uid)?;
        self.with_settled_league(league, |store| {
            Ok(squad_manager::move_player(store, league, user, uid)?)
        })
    }

    pub fn set_starred(
        &self,
        league: LeagueId,
        user: UserId,
        uids: &[String],
    ) -> Result<(), ServiceError> {
        for uid in uids {
            validate_identifier(uid)?;
        }
        self.with_settled_league(league, |store| {
            Ok(squad_manager::set_starred(store, league, user, uids)?)
        })
    }

    // ---- predictions ------------------------------------------------

    pub fn submit_prediction(
        &self,
        league: LeagueId,
        user: UserId,
        club: &str,
        home: i32,
        away: i32,
    ) -> Result<(), ServiceError> {
        self.submit_prediction_at(league, user, club, home, away, Utc::now().timestamp())
    }

    pub fn submit_prediction_at(
        &self,
        league: LeagueId,
        user: UserId,
        club: &str,
        home: i32,
        away: i32,
        now: i64,
    ) -> Result<(), ServiceError> {
        validate_identifier(club)?;
        for value in [home, away] {
            if !(0..=99).contains(&value) {
                return Err(ServiceError::InvalidScore { value });
            }
        }
        self.with_settled_league(league, |store| {
            let settings = store.active_league(league)?;
            if !settings.predictions_enabled {
                return Err(ServiceError::PredictionsDisabled { league });
            }
            let league_type = settings.league_type.clone();
            store.membership(league, user)?;

            // A home fixture that has not kicked off takes the prediction
            // live; otherwise the earliest announced future fixture holds
            // it until the matchday catches up.
            let current = store
                .club(&league_type, club)
                .filter(|c| c.home == Some(true) && c.game_start > now)
                .is_some();
            if current {
                store.upsert_prediction(Prediction {
                    league,
                    user,
                    club: club.to_string(),
                    home: Some(home),
                    away: Some(away),
                });
                tracing::info!(league, user, club, home, away, "prediction saved");
                return Ok(());
            }
            let upcoming = store
                .future_clubs_for(&league_type, club)
                .into_iter()
                .filter(|f| f.home != Some(false) && f.game_start > now)
                .map(|f| f.game_start)
                .min();
            match upcoming {
                Some(game_start) => {
                    store.upsert_future_prediction(FuturePrediction {
                        league,
                        user,
                        club: club.to_string(),
                        game_start,
                        home,
                        away,
                    });
                    tracing::info!(league, user, club, home, away, "future prediction saved");
                    Ok(())
                }
                None => Err(ServiceError::UnknownMatch {
                    club: club.to_string(),
                }),
            }
        })
    }

    /// Admin-only: replay prediction scoring for settled matchdays after
    /// results were corrected.
    pub fn recalculate_prediction_points(
        &self,
        league: LeagueId,
        acting: UserId,
    ) -> Result<i32, ServiceError> {
        self.with_settled_league(league, |store| {
            ensure_admin(store, league, acting)?;
            Ok(scoring_engine::recalculate(store, league)?)
        })
    }

    // ---- feed entry -------------------------------------------------

    pub fn ingest(
        &self,
        league_type: &str,
        update: &FeedUpdate,
    ) -> Result<IngestOutcome, ServiceError> {
        self.ingest_at(league_type, update, Utc::now().timestamp())
    }

    pub fn ingest_at(
        &self,
        league_type: &str,
        update: &FeedUpdate,
        now: i64,
    ) -> Result<IngestOutcome, ServiceError> {
        let mut store = self.store.lock().expect("ledger mutex poisoned");
        Ok(matchday_controller::ingest(
            &mut store,
            &self.locks,
            league_type,
            update,
            now,
        )?)
    }

    // ---- read surface for collaborators -----------------------------

    pub fn membership(&self, league: LeagueId, user: UserId) -> Result<Membership, ServiceError> {
        let store = self.store.lock().expect("ledger mutex poisoned");
        Ok(store.membership(league, user)?.clone())
    }

    /// Memberships ordered by total points, best first.
    pub fn standings(&self, league: LeagueId) -> Result<Vec<Membership>, ServiceError> {
        let store = self.store.lock().expect("ledger mutex poisoned");
        let mut rows: Vec<Membership> = store
            .members_of_league(league)
            .into_iter()
            .filter_map(|user| store.membership(league, user).ok().cloned())
            .collect();
        rows.sort_by(|a, b| b.points.cmp(&a.points).then(a.user.cmp(&b.user)));
        Ok(rows)
    }

    pub fn squad(&self, league: LeagueId, user: UserId) -> Result<Vec<SquadSlot>, ServiceError> {
        let store = self.store.lock().expect("ledger mutex poisoned");
        Ok(store
            .slots_of_user(league, user)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Test and tooling access to the underlying ledger.
    pub fn with_store<R>(&self, op: impl FnOnce(&mut LedgerStore) -> R) -> R {
        let mut store = self.store.lock().expect("ledger mutex poisoned");
        op(&mut store)
    }
}

fn ensure_admin(
    store: &LedgerStore,
    league: LeagueId,
    user: UserId,
) -> Result<(), ServiceError> {
    if !store.membership(league, user)?.admin {
        return Err(ServiceError::NotAdmin { league, user });
    }
    Ok(())
}

/// Feed-supplied identifiers are plain tokens; anything else is rejected
/// before it reaches the ledger.
fn validate_identifier(value: &str) -> Result<(), ServiceError> {
    let ok = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if ok {
        Ok(())
    } else {
        Err(ServiceError::InvalidPlayerId {
            uid: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_must_be_plain_tokens() {
        assert!(validate_identifier("abc-123_x.y").is_ok());
        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("p1; drop").is_err());
        assert!(validate_identifier("späti").is_err());
    }
}
