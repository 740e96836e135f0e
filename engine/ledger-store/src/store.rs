//! In-process ledger. BTreeMap-backed so every scan is deterministic,
//! single writer per league by construction (callers serialize).

use std::collections::BTreeMap;

use crate::error::LedgerError;
use crate::records::*;
use crate::types::{Counterparty, LeagueId, Matchday, Money, UserId};

#[derive(Debug, Default)]
pub struct LedgerStore {
    leagues: BTreeMap<LeagueId, LeagueSettings>,
    memberships: BTreeMap<(LeagueId, UserId), Membership>,
    /// Keyed by (league type, player uid); players are shared by every
    /// league of the same type.
    players: BTreeMap<(String, String), Player>,
    clubs: BTreeMap<(String, String), Club>,
    squad: BTreeMap<(LeagueId, UserId, String), SquadSlot>,
    /// Insertion-ordered; rows are unique per (league, player, seller,
    /// buyer), and a real user sells a given player at most once.
    transfers: Vec<Transfer>,
    points: BTreeMap<(LeagueId, UserId, Matchday), PointsRecord>,
    predictions: BTreeMap<(LeagueId, UserId, String), Prediction>,
    future_clubs: BTreeMap<(String, String, i64), FutureClub>,
    future_predictions: BTreeMap<(LeagueId, UserId, String, i64), FuturePrediction>,
    feed_states: BTreeMap<String, FeedState>,
    historical_players: Vec<HistoricalPlayer>,
    historical_clubs: Vec<HistoricalClub>,
    historical_squad: Vec<HistoricalSquad>,
    historical_transfers: Vec<HistoricalTransfer>,
    historical_predictions: Vec<HistoricalPrediction>,
    next_league_id: LeagueId,
}

impl LedgerStore {
    pub fn new() -> Self {
        Self {
            next_league_id: 1,
            ..Self::default()
        }
    }

    // ---- leagues ----------------------------------------------------

    pub fn league(&self, league: LeagueId) -> Result<&LeagueSettings, LedgerError> {
        self.leagues
            .get(&league)
            .ok_or(LedgerError::UnknownLeague { league })
    }

    pub fn league_mut(&mut self, league: LeagueId) -> Result<&mut LeagueSettings, LedgerError> {
        self.leagues
            .get_mut(&league)
            .ok_or(LedgerError::UnknownLeague { league })
    }

    /// Rejects operations against archived leagues up front.
    pub fn active_league(&self, league: LeagueId) -> Result<&LeagueSettings, LedgerError> {
        let settings = self.league(league)?;
        if settings.archived.is_some() {
            return Err(LedgerError::LeagueArchived { league });
        }
        Ok(settings)
    }

    pub fn leagues_of_type(&self, league_type: &str) -> Vec<LeagueId> {
        self.leagues
            .values()
            .filter(|l| l.league_type == league_type)
            .map(|l| l.id)
            .collect()
    }

    pub fn create_league(
        &mut self,
        name: impl Into<String>,
        league_type: impl Into<String>,
        founder: UserId,
    ) -> LeagueId {
        let id = self.next_league_id;
        self.next_league_id += 1;
        let settings = LeagueSettings::new(id, name, league_type);
        let membership = Membership::new(id, founder, settings.start_money, true);
        tracing::info!(league = id, user = founder, "created league {:?}", settings.name);
        self.leagues.insert(id, settings);
        self.memberships.insert((id, founder), membership);
        id
    }

    pub fn join_league(&mut self, league: LeagueId, user: UserId) -> Result<(), LedgerError> {
        let settings = self.active_league(league)?;
        if self.memberships.contains_key(&(league, user)) {
            return Err(LedgerError::AlreadyMember { league, user });
        }
        let membership = Membership::new(league, user, settings.start_money, false);
        self.memberships.insert((league, user), membership);
        tracing::info!(league, user, "user joined league");
        Ok(())
    }

    /// Removes a member and their traces. Pending transfers they were part
    /// of fall to the AI pool; rows left with two synthetic parties are
    /// dropped. An emptied league is deleted outright.
    pub fn leave_league(&mut self, league: LeagueId, user: UserId) -> Result<(), LedgerError> {
        self.membership(league, user)?;
        self.memberships.remove(&(league, user));
        self.points.retain(|&(l, u, _), _| !(l == league && u == user));
        self.squad.retain(|&(l, u, _), _| !(l == league && u == user));
        self.predictions.retain(|&(l, u, _), _| !(l == league && u == user));
        self.future_predictions.retain(|&(l, u, _, _), _| !(l == league && u == user));
        self.historical_squad.retain(|s| !(s.league == league && s.user == user));
        self.historical_predictions.retain(|p| !(p.league == league && p.user == user));
        self.historical_transfers.retain(|t| {
            !(t.league == league
                && ((t.buyer == Counterparty::User(user) && t.seller == Counterparty::AiPool)
                    || (t.seller == Counterparty::User(user) && t.buyer == Counterparty::AiPool)))
        });

        let party = Counterparty::User(user);
        for transfer in self.transfers.iter_mut().filter(|t| t.league == league) {
            if transfer.seller == party {
                transfer.seller = Counterparty::AiPool;
            }
            if transfer.buyer == party {
                transfer.buyer = Counterparty::AiPool;
            }
        }
        // Rows the departure left with two synthetic parties mean nothing.
        self.transfers
            .retain(|t| !(t.league == league && t.seller.is_synthetic() && t.buyer.is_synthetic()));
        tracing::info!(league, user, "user left league");

        let empty = !self.memberships.keys().any(|&(l, _)| l == league);
        if empty {
            self.leagues.remove(&league);
            self.transfers.retain(|t| t.league != league);
            self.historical_transfers.retain(|t| t.league != league);
            self.historical_squad.retain(|s| s.league != league);
            self.historical_predictions.retain(|p| p.league != league);
            self.points.retain(|&(l, _, _), _| l != league);
            tracing::info!(league, "league emptied and deleted");
        }
        Ok(())
    }

    pub fn archive_league(&mut self, league: LeagueId, now: i64) -> Result<(), LedgerError> {
        let settings = self.league_mut(league)?;
        settings.archived = Some(now);
        tracing::info!(league, "league archived");
        Ok(())
    }

    // ---- memberships ------------------------------------------------

    pub fn membership(&self, league: LeagueId, user: UserId) -> Result<&Membership, LedgerError> {
        self.memberships
            .get(&(league, user))
            .ok_or(LedgerError::NotAMember { league, user })
    }

    pub fn membership_mut(
        &mut self,
        league: LeagueId,
        user: UserId,
    ) -> Result<&mut Membership, LedgerError> {
        self.memberships
            .get_mut(&(league, user))
            .ok_or(LedgerError::NotAMember { league, user })
    }

    pub fn members_of_league(&self, league: LeagueId) -> Vec<UserId> {
        self.memberships
            .keys()
            .filter(|&&(l, _)| l == league)
            .map(|&(_, u)| u)
            .collect()
    }

    pub fn credit(&mut self, league: LeagueId, user: UserId, amount: Money) -> Result<(), LedgerError> {
        let membership = self.membership_mut(league, user)?;
        membership.money += amount;
        Ok(())
    }

    pub fn debit(&mut self, league: LeagueId, user: UserId, amount: Money) -> Result<(), LedgerError> {
        let membership = self.membership_mut(league, user)?;
        if membership.money < amount {
            tracing::error!(
                league,
                user,
                amount,
                balance = membership.money,
                "debit would underflow; caller skipped an affordability check"
            );
            return Err(LedgerError::BalanceUnderflow { league, user, amount });
        }
        membership.money -= amount;
        Ok(())
    }

    /// Credit that silently absorbs synthetic counterparties.
    pub fn credit_party(
        &mut self,
        league: LeagueId,
        party: Counterparty,
        amount: Money,
    ) -> Result<(), LedgerError> {
        match party.as_user() {
            Some(user) => self.credit(league, user, amount),
            None => Ok(()),
        }
    }

    // ---- players & clubs --------------------------------------------

    pub fn player(&self, league_type: &str, uid: &str) -> Result<&Player, LedgerError> {
        self.players
            .get(&(league_type.to_string(), uid.to_string()))
            .ok_or_else(|| LedgerError::UnknownPlayer { uid: uid.to_string() })
    }

    pub fn player_mut(&mut self, league_type: &str, uid: &str) -> Result<&mut Player, LedgerError> {
        self.players
            .get_mut(&(league_type.to_string(), uid.to_string()))
            .ok_or_else(|| LedgerError::UnknownPlayer { uid: uid.to_string() })
    }

    pub fn upsert_player(&mut self, player: Player) {
        self.players
            .insert((player.league_type.clone(), player.uid.clone()), player);
    }

    pub fn players_of_type(&self, league_type: &str) -> impl Iterator<Item = &Player> + '_ {
        let key = league_type.to_string();
        self.players
            .range((key.clone(), String::new())..)
            .take_while(move |((t, _), _)| *t == key)
            .map(|(_, p)| p)
    }

    pub fn players_of_type_mut(&mut self, league_type: &str) -> impl Iterator<Item = &mut Player> + '_ {
        let key = league_type.to_string();
        self.players
            .range_mut((key.clone(), String::new())..)
            .take_while(move |((t, _), _)| *t == key)
            .map(|(_, p)| p)
    }

    pub fn club(&self, league_type: &str, club: &str) -> Option<&Club> {
        self.clubs.get(&(league_type.to_string(), club.to_string()))
    }

    pub fn club_mut(&mut self, league_type: &str, club: &str) -> Option<&mut Club> {
        self.clubs
            .get_mut(&(league_type.to_string(), club.to_string()))
    }

    pub fn upsert_club(&mut self, club: Club) {
        self.clubs
            .insert((club.league_type.clone(), club.club.clone()), club);
    }

    pub fn clubs_of_type(&self, league_type: &str) -> impl Iterator<Item = &Club> + '_ {
        let key = league_type.to_string();
        self.clubs
            .range((key.clone(), String::new())..)
            .take_while(move |((t, _), _)| *t == key)
            .map(|(_, c)| c)
    }

    pub fn clubs_of_type_mut(&mut self, league_type: &str) -> impl Iterator<Item = &mut Club> + '_ {
        let key = league_type.to_string();
        self.clubs
            .range_mut((key.clone(), String::new())..)
            .take_while(move |((t, _), _)| *t == key)
            .map(|(_, c)| c)
    }

    // ---- squads -----------------------------------------------------

    pub fn slot(&self, league: LeagueId, user: UserId, uid: &str) -> Option<&SquadSlot> {
        self.squad.get(&(league, user, uid.to_string()))
    }

    pub fn slot_mut(&mut self, league: LeagueId, user: UserId, uid: &str) -> Option<&mut SquadSlot> {
        self.squad.get_mut(&(league, user, uid.to_string()))
    }

    pub fn insert_slot(&mut self, slot: SquadSlot) {
        self.squad
            .insert((slot.league, slot.user, slot.uid.clone()), slot);
    }

    pub fn remove_slot(&mut self, league: LeagueId, user: UserId, uid: &str) -> Option<SquadSlot> {
        self.squad.remove(&(league, user, uid.to_string()))
    }

    pub fn slots_of_user(&self, league: LeagueId, user: UserId) -> Vec<&SquadSlot> {
        self.squad
            .values()
            .filter(|s| s.league == league && s.user == user)
            .collect()
    }

    pub fn slots_of_user_mut(
        &mut self,
        league: LeagueId,
        user: UserId,
    ) -> impl Iterator<Item = &mut SquadSlot> + '_ {
        self.squad
            .values_mut()
            .filter(move |s| s.league == league && s.user == user)
    }

    pub fn slots_of_league(&self, league: LeagueId) -> Vec<&SquadSlot> {
        self.squad.values().filter(|s| s.league == league).collect()
    }

    /// How many distinct squads hold this player right now.
    pub fn owners_of_player(&self, league: LeagueId, uid: &str) -> usize {
        self.squad
            .values()
            .filter(|s| s.league == league && s.uid == uid)
            .count()
    }

    // ---- transfers --------------------------------------------------

    pub fn insert_transfer(&mut self, transfer: Transfer) -> Result<(), LedgerError> {
        let clash = self.transfers.iter().any(|t| {
            t.league == transfer.league
                && t.uid == transfer.uid
                && t.seller == transfer.seller
                && (t.buyer == transfer.buyer || transfer.seller.as_user().is_some())
        });
        if clash {
            return Err(LedgerError::DuplicateTransfer {
                league: transfer.league,
                uid: transfer.uid,
            });
        }
        self.transfers.push(transfer);
        Ok(())
    }

    pub fn remove_transfer(
        &mut self,
        league: LeagueId,
        uid: &str,
        seller: Counterparty,
        buyer: Counterparty,
    ) -> Option<Transfer> {
        let idx = self.transfers.iter().position(|t| {
            t.league == league && t.uid == uid && t.seller == seller && t.buyer == buyer
        })?;
        Some(self.transfers.remove(idx))
    }

    pub fn transfer_mut(
        &mut self,
        league: LeagueId,
        uid: &str,
        seller: Counterparty,
        buyer: Counterparty,
    ) -> Option<&mut Transfer> {
        self.transfers.iter_mut().find(|t| {
            t.league == league && t.uid == uid && t.seller == seller && t.buyer == buyer
        })
    }

    pub fn transfers_for_player(&self, league: LeagueId, uid: &str) -> Vec<&Transfer> {
        self.transfers
            .iter()
            .filter(|t| t.league == league && t.uid == uid)
            .collect()
    }

    pub fn transfer_by_buyer(
        &self,
        league: LeagueId,
        uid: &str,
        buyer: Counterparty,
    ) -> Option<&Transfer> {
        self.transfers
            .iter()
            .find(|t| t.league == league && t.uid == uid && t.buyer == buyer)
    }

    pub fn transfer_by_buyer_mut(
        &mut self,
        league: LeagueId,
        uid: &str,
        buyer: Counterparty,
    ) -> Option<&mut Transfer> {
        self.transfers
            .iter_mut()
            .find(|t| t.league == league && t.uid == uid && t.buyer == buyer)
    }

    pub fn transfers_of_buyer(&self, league: LeagueId, buyer: Counterparty) -> Vec<&Transfer> {
        self.transfers
            .iter()
            .filter(|t| t.league == league && t.buyer == buyer)
            .collect()
    }

    pub fn transfers_of_buyer_mut(
        &mut self,
        league: LeagueId,
        buyer: Counterparty,
    ) -> impl Iterator<Item = &mut Transfer> + '_ {
        self.transfers
            .iter_mut()
            .filter(move |t| t.league == league && t.buyer == buyer)
    }

    /// Settled buys + sells this window for the transfer allowance.
    pub fn transfers_involving(&self, league: LeagueId, user: UserId) -> usize {
        let party = Counterparty::User(user);
        self.transfers
            .iter()
            .filter(|t| t.league == league && (t.seller == party || t.buyer == party))
            .count()
    }

    pub fn transfers_of_league(&self, league: LeagueId) -> Vec<Transfer> {
        self.transfers
            .iter()
            .filter(|t| t.league == league)
            .cloned()
            .collect()
    }

    pub fn remove_transfers_of_league(&mut self, league: LeagueId) {
        self.transfers.retain(|t| t.league != league);
    }

    pub fn remove_transfers_where(&mut self, mut pred: impl FnMut(&Transfer) -> bool) {
        self.transfers.retain(|t| !pred(t));
    }

    // ---- points -----------------------------------------------------

    pub fn insert_points(&mut self, record: PointsRecord) {
        self.points
            .insert((record.league, record.user, record.matchday), record);
    }

    /// Highest matchday number seen for the league; 0 before the first one.
    pub fn current_matchday(&self, league: LeagueId) -> Matchday {
        self.points
            .keys()
            .filter(|&&(l, _, _)| l == league)
            .map(|&(_, _, m)| m)
            .max()
            .unwrap_or(0)
    }

    /// The in-progress points row (unstamped, highest matchday) for a member.
    pub fn open_points_mut(
        &mut self,
        league: LeagueId,
        user: UserId,
    ) -> Option<&mut PointsRecord> {
        self.points
            .values_mut()
            .filter(|p| p.league == league && p.user == user && p.time.is_none())
            .max_by_key(|p| p.matchday)
    }

    pub fn open_points(&self, league: LeagueId, user: UserId) -> Option<&PointsRecord> {
        self.points
            .values()
            .filter(|p| p.league == league && p.user == user && p.time.is_none())
            .max_by_key(|p| p.matchday)
    }

    pub fn points_of_league(&self, league: LeagueId) -> Vec<&PointsRecord> {
        self.points.values().filter(|p| p.league == league).collect()
    }

    pub fn points_of_league_mut(
        &mut self,
        league: LeagueId,
    ) -> impl Iterator<Item = &mut PointsRecord> + '_ {
        self.points.values_mut().filter(move |p| p.league == league)
    }

    pub fn points_record_mut(
        &mut self,
        league: LeagueId,
        user: UserId,
        matchday: Matchday,
    ) -> Option<&mut PointsRecord> {
        self.points.get_mut(&(league, user, matchday))
    }

    // ---- predictions ------------------------------------------------

    pub fn upsert_prediction(&mut self, prediction: Prediction) {
        self.predictions.insert(
            (prediction.league, prediction.user, prediction.club.clone()),
            prediction,
        );
    }

    pub fn predictions_of_user(&self, league: LeagueId, user: UserId) -> Vec<&Prediction> {
        self.predictions
            .values()
            .filter(|p| p.league == league && p.user == user)
            .collect()
    }

    pub fn predictions_of_user_mut(
        &mut self,
        league: LeagueId,
        user: UserId,
    ) -> impl Iterator<Item = &mut Prediction> + '_ {
        self.predictions
            .values_mut()
            .filter(move |p| p.league == league && p.user == user)
    }

    pub fn predictions_of_league(&self, league: LeagueId) -> Vec<&Prediction> {
        self.predictions
            .values()
            .filter(|p| p.league == league)
            .collect()
    }

    pub fn clear_predictions_of_league(&mut self, league: LeagueId) {
        self.predictions.retain(|&(l, _, _), _| l != league);
    }

    // ---- future fixtures --------------------------------------------

    pub fn upsert_future_club(&mut self, row: FutureClub) {
        self.future_clubs.insert(
            (row.league_type.clone(), row.club.clone(), row.game_start),
            row,
        );
    }

    pub fn future_club(&self, league_type: &str, club: &str, game_start: i64) -> Option<&FutureClub> {
        self.future_clubs
            .get(&(league_type.to_string(), club.to_string(), game_start))
    }

    pub fn future_clubs_for(&self, league_type: &str, club: &str) -> Vec<&FutureClub> {
        self.future_clubs
            .values()
            .filter(|f| f.league_type == league_type && f.club == club)
            .collect()
    }

    pub fn remove_future_club(&mut self, league_type: &str, club: &str, game_start: i64) {
        self.future_clubs
            .remove(&(league_type.to_string(), club.to_string(), game_start));
    }

    pub fn purge_future_clubs_before(&mut self, cutoff: i64) {
        self.future_clubs.retain(|_, f| f.game_start >= cutoff);
    }

    pub fn upsert_future_prediction(&mut self, row: FuturePrediction) {
        self.future_predictions.insert(
            (row.league, row.user, row.club.clone(), row.game_start),
            row,
        );
    }

    pub fn take_future_predictions(&mut self, club: &str, game_start: i64) -> Vec<FuturePrediction> {
        let keys: Vec<_> = self
            .future_predictions
            .iter()
            .filter(|((_, _, c, g), _)| c == club && *g == game_start)
            .map(|(k, _)| k.clone())
            .collect();
        keys.into_iter()
            .filter_map(|k| self.future_predictions.remove(&k))
            .collect()
    }

    pub fn purge_future_predictions_before(&mut self, cutoff: i64) {
        self.future_predictions.retain(|_, f| f.game_start >= cutoff);
    }

    // ---- feed state -------------------------------------------------

    pub fn feed_state(&self, league_type: &str) -> FeedState {
        self.feed_states.get(league_type).copied().unwrap_or_default()
    }

    pub fn set_feed_state(&mut self, league_type: &str, state: FeedState) {
        self.feed_states.insert(league_type.to_string(), state);
    }

    // ---- historical mirrors -----------------------------------------

    pub fn push_historical_player(&mut self, row: HistoricalPlayer) {
        self.historical_players.push(row);
    }

    pub fn push_historical_club(&mut self, row: HistoricalClub) {
        self.historical_clubs.push(row);
    }

    pub fn push_historical_squad(&mut self, row: HistoricalSquad) {
        self.historical_squad.push(row);
    }

    pub fn push_historical_transfer(&mut self, row: HistoricalTransfer) {
        self.historical_transfers.push(row);
    }

    pub fn push_historical_prediction(&mut self, row: HistoricalPrediction) {
        self.historical_predictions.push(row);
    }

    pub fn historical_players(&self) -> &[HistoricalPlayer] {
        &self.historical_players
    }

    /// Matchdays a player has been archived for; feeds the running average.
    pub fn historical_appearances(&self, league_type: &str, uid: &str) -> usize {
        self.historical_players
            .iter()
            .filter(|h| h.player.league_type == league_type && h.player.uid == uid)
            .count()
    }

    pub fn historical_clubs(&self) -> &[HistoricalClub] {
        &self.historical_clubs
    }

    pub fn historical_squad(&self) -> &[HistoricalSquad] {
        &self.historical_squad
    }

    pub fn historical_transfers(&self) -> &[HistoricalTransfer] {
        &self.historical_transfers
    }

    pub fn historical_predictions_for(
        &self,
        league: LeagueId,
        user: UserId,
        matchday: Matchday,
    ) -> Vec<&HistoricalPrediction> {
        self.historical_predictions
            .iter()
            .filter(|p| p.league == league && p.user == user && p.matchday == matchday)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Placement;

    fn store_with_league() -> (LedgerStore, LeagueId) {
        let mut store = LedgerStore::new();
        let league = store.create_league("test", "bundesliga", 1);
        (store, league)
    }

    #[test]
    fn founder_gets_start_money_and_admin() {
        let (store, league) = store_with_league();
        let m = store.membership(league, 1).unwrap();
        assert_eq!(m.money, 150_000_000);
        assert!(m.admin);
    }

    #[test]
    fn debit_refuses_underflow() {
        let (mut store, league) = store_with_league();
        assert!(store.debit(league, 1, 150_000_001).is_err());
        assert!(store.debit(league, 1, 150_000_000).is_ok());
        assert_eq!(store.membership(league, 1).unwrap().money, 0);
    }

    #[test]
    fn transfer_uniqueness_rules() {
        let (mut store, league) = store_with_league();
        let t = Transfer {
            league,
            uid: "p1".into(),
            seller: Counterparty::AiPool,
            buyer: Counterparty::User(1),
            value: 1_000_000,
            max: 1_000_000,
            placement: Placement::Bench,
            starred: false,
        };
        store.insert_transfer(t.clone()).unwrap();
        // Same quadruple is rejected.
        assert!(matches!(
            store.insert_transfer(t.clone()),
            Err(LedgerError::DuplicateTransfer { .. })
        ));
        // The pool may sell the same player to a second buyer.
        store
            .insert_transfer(Transfer {
                buyer: Counterparty::User(2),
                ..t.clone()
            })
            .unwrap();
        // A real user sells a given player at most once.
        store
            .insert_transfer(Transfer {
                seller: Counterparty::User(1),
                buyer: Counterparty::OpenMarket,
                ..t.clone()
            })
            .unwrap();
        assert!(matches!(
            store.insert_transfer(Transfer {
                seller: Counterparty::User(1),
                buyer: Counterparty::AiPool,
                ..t
            }),
            Err(LedgerError::DuplicateTransfer { .. })
        ));
    }

    #[test]
    fn leaving_reassigns_transfers_to_pool() {
        let (mut store, league) = store_with_league();
        store.join_league(league, 2).unwrap();
        store
            .insert_transfer(Transfer {
                league,
                uid: "p1".into(),
                seller: Counterparty::User(2),
                buyer: Counterparty::User(1),
                value: 500_000,
                max: 500_000,
                placement: Placement::Bench,
                starred: false,
            })
            .unwrap();
        store.leave_league(league, 2).unwrap();
        let transfers = store.transfers_for_player(league, "p1");
        assert_eq!(transfers.len(), 1);
        assert_eq!(transfers[0].seller, Counterparty::AiPool);
        assert_eq!(transfers[0].buyer, Counterparty::User(1));
    }

    #[test]
    fn last_member_leaving_deletes_league() {
        let (mut store, league) = store_with_league();
        store.leave_league(league, 1).unwrap();
        assert!(store.league(league).is_err());
    }

    #[test]
    fn open_points_picks_unstamped_row() {
        let (mut store, league) = store_with_league();
        store.insert_points(PointsRecord {
            league,
            user: 1,
            matchday: 1,
            fantasy_points: 3,
            prediction_points: 0,
            points: 3,
            money: 0,
            time: Some(100),
        });
        store.insert_points(PointsRecord {
            league,
            user: 1,
            matchday: 2,
            fantasy_points: 0,
            prediction_points: 0,
            points: 0,
            money: 0,
            time: None,
        });
        assert_eq!(store.current_matchday(league), 2);
        assert_eq!(store.open_points_mut(league, 1).unwrap().matchday, 2);
    }
}
