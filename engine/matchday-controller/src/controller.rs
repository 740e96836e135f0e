//! One feed cycle: take the league-type lock, detect window edges, apply
//! facts, run the transition the edge calls for, and only then commit the
//! new window state - a failed cycle leaves the old state in place so the
//! next cycle retries the same edge instead of wedging the machine.

use std::collections::{BTreeMap, BTreeSet};

use ledger_store::{
    Club, Counterparty, FeedState, HistoricalClub, HistoricalPlayer, HistoricalPrediction,
    HistoricalSquad, HistoricalTransfer, LeagueId, LedgerStore, LockRegistry, Player, PointsRecord,
    Prediction, SquadSlot,
};

use crate::error::LifecycleError;
use crate::feed::{ClubFact, FeedUpdate};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Another cycle holds the league-type lock; nothing was touched.
    SkippedLocked,
    Applied {
        window_opened: bool,
        window_closed: bool,
    },
}

pub fn ingest(
    store: &mut LedgerStore,
    locks: &LockRegistry,
    league_type: &str,
    update: &FeedUpdate,
    now: i64,
) -> Result<IngestOutcome, LifecycleError> {
    let Some(_guard) = locks.try_acquire(league_type) else {
        tracing::info!(league_type, "league type is locked, update skipped");
        return Ok(IngestOutcome::SkippedLocked);
    };

    let previous = store.feed_state(league_type);
    let window_opened = update.transfer_open && !previous.transfer_open;
    let window_closed = !update.transfer_open && previous.transfer_open;

    if window_opened {
        end_matchday(store, league_type, now)?;
    }

    apply_facts(store, league_type, update, previous.last_update, now);

    if !update.transfer_open {
        if window_closed {
            start_matchday(store, league_type, now)?;
        } else {
            // Steady state: keep in-progress totals current.
            for league in store.leagues_of_type(league_type) {
                scoring_engine::run_league_unchecked(store, league)?;
            }
        }
    }

    store.set_feed_state(
        league_type,
        FeedState {
            transfer_open: update.transfer_open,
            countdown_secs: update.countdown_secs,
            last_update: now,
        },
    );
    for league in store.leagues_of_type(league_type) {
        let settings = store.league_mut(league)?;
        settings.transfer_open = update.transfer_open;
        settings.countdown_secs = update.countdown_secs;
    }

    tracing::info!(
        league_type,
        window_opened,
        window_closed,
        players = update.players.len(),
        "feed cycle applied"
    );
    Ok(IngestOutcome::Applied {
        window_opened,
        window_closed,
    })
}

/// TransferOpen -> MatchdayRunning. Unmatched listings evaporate, pending
/// transfers materialize into squad slots, and a zero points row opens the
/// new matchday for every membership.
fn start_matchday(
    store: &mut LedgerStore,
    league_type: &str,
    _now: i64,
) -> Result<(), LifecycleError> {
    tracing::info!(league_type, "transfer window closed, starting matchday");
    let leagues: BTreeSet<LeagueId> = store.leagues_of_type(league_type).into_iter().collect();

    store.remove_transfers_where(|t| {
        leagues.contains(&t.league) && t.buyer == Counterparty::OpenMarket
    });

    for &league in &leagues {
        if store.league(league)?.archived.is_some() {
            store.remove_transfers_of_league(league);
            continue;
        }
        let matchday = store.current_matchday(league) + 1;
        for transfer in store.transfers_of_league(league) {
            if let Some(seller) = transfer.seller.as_user() {
                store.remove_slot(league, seller, &transfer.uid);
            }
            if let Some(buyer) = transfer.buyer.as_user() {
                store.insert_slot(SquadSlot {
                    league,
                    user: buyer,
                    uid: transfer.uid.clone(),
                    placement: transfer.placement,
                    starred: transfer.starred,
                });
            }
            store.push_historical_transfer(HistoricalTransfer {
                matchday,
                league,
                seller: transfer.seller,
                buyer: transfer.buyer,
                uid: transfer.uid,
                value: transfer.value,
            });
        }
        store.remove_transfers_of_league(league);

        for user in store.members_of_league(league) {
            let money = store.membership(league, user)?.money;
            store.insert_points(PointsRecord {
                league,
                user,
                matchday,
                fantasy_points: 0,
                prediction_points: 0,
                points: 0,
                money,
                time: None,
            });
        }
    }

    // A fresh matchday starts from zero for everyone.
    for player in store.players_of_type_mut(league_type) {
        player.last_match = 0;
    }
    for &league in &leagues {
        scoring_engine::run_league_unchecked(store, league)?;
    }
    Ok(())
}

/// MatchdayRunning -> TransferOpen. Final scoring, settlement stamps, and
/// the write-once archives.
fn end_matchday(store: &mut LedgerStore, league_type: &str, now: i64) -> Result<(), LifecycleError> {
    tracing::info!(league_type, "transfer window opened, archiving matchday");
    let leagues = store.leagues_of_type(league_type);

    for &league in &leagues {
        scoring_engine::run_league_unchecked(store, league)?;
    }
    for &league in &leagues {
        for record in store.points_of_league_mut(league) {
            if record.time.is_none() {
                record.time = Some(now);
            }
        }
    }

    let players: Vec<Player> = store.players_of_type(league_type).cloned().collect();
    for player in players {
        store.push_historical_player(HistoricalPlayer { time: now, player });
    }
    let clubs: Vec<Club> = store.clubs_of_type(league_type).cloned().collect();
    for club in clubs {
        store.push_historical_club(HistoricalClub { time: now, club });
    }

    for &league in &leagues {
        let matchday = store.current_matchday(league);
        for prediction in store
            .predictions_of_league(league)
            .into_iter()
            .cloned()
            .collect::<Vec<Prediction>>()
        {
            store.push_historical_prediction(HistoricalPrediction {
                matchday,
                league,
                user: prediction.user,
                club: prediction.club,
                home: prediction.home,
                away: prediction.away,
            });
        }
        store.clear_predictions_of_league(league);

        for slot in store
            .slots_of_league(league)
            .into_iter()
            .cloned()
            .collect::<Vec<SquadSlot>>()
        {
            store.push_historical_squad(HistoricalSquad {
                matchday,
                league,
                user: slot.user,
                uid: slot.uid,
                placement: slot.placement,
                starred: slot.starred,
            });
        }
    }

    store.purge_future_clubs_before(now);
    store.purge_future_predictions_before(now);
    for club in store.clubs_of_type_mut(league_type) {
        club.team_score = None;
        club.opponent_score = None;
    }
    Ok(())
}

/// Upsert the cycle's player and club facts. Market fields only move while
/// the window is open; stats reconcile while a game runs; `locked` follows
/// the game having started; `exists` follows feed presence.
fn apply_facts(
    store: &mut LedgerStore,
    league_type: &str,
    update: &FeedUpdate,
    last_update: i64,
    now: i64,
) {
    for player in store.players_of_type_mut(league_type) {
        player.exists = false;
    }

    let mut seen_clubs: BTreeSet<String> = BTreeSet::new();
    let mut started_clubs: BTreeMap<String, bool> = BTreeMap::new();
    let mut finished_clubs: BTreeMap<String, bool> = BTreeMap::new();

    for fact in &update.clubs {
        seen_clubs.insert(fact.club.clone());
        let (started, finished) =
            apply_club_fact(store, league_type, fact, update.transfer_open, last_update, now);
        started_clubs.insert(fact.club.clone(), started);
        finished_clubs.insert(fact.club.clone(), finished);
    }

    for fact in &update.players {
        let started = started_clubs.get(&fact.club).copied().unwrap_or(false);
        let finished = finished_clubs.get(&fact.club).copied().unwrap_or(false);
        apply_player_fact(store, league_type, fact, update.transfer_open, started, finished);
    }

    let absent: Vec<String> = store
        .clubs_of_type(league_type)
        .filter(|c| !seen_clubs.contains(&c.club))
        .map(|c| c.club.clone())
        .collect();
    for code in absent {
        if let Some(club) = store.club_mut(league_type, &code) {
            club.exists = false;
            club.home = None;
        }
    }
}

fn apply_club_fact(
    store: &mut LedgerStore,
    league_type: &str,
    fact: &ClubFact,
    window_open: bool,
    last_update: i64,
    now: i64,
) -> (bool, bool) {
    // Fixtures beyond the current matchday; the home side of a pairing can
    // be inferred from the opponent's mirrored row.
    for fixture in &fact.future_games {
        let home = fixture.home.or_else(|| {
            store
                .future_club(league_type, &fixture.opponent, fixture.game_start)
                .and_then(|m| m.home.map(|h| !h))
        });
        store.upsert_future_club(ledger_store::FutureClub {
            club: fact.club.clone(),
            league_type: league_type.to_string(),
            game_start: fixture.game_start,
            opponent: fixture.opponent.clone(),
            full_name: fact.full_name.clone(),
            home,
        });
    }

    // The fixture the feed now reports as current has matured out of the
    // future tables; saved future predictions go live.
    store.remove_future_club(league_type, &fact.club, fact.game_start);
    for future in store.take_future_predictions(&fact.club, fact.game_start) {
        let already = store
            .predictions_of_user(future.league, future.user)
            .iter()
            .any(|p| p.club == future.club);
        if !already {
            store.upsert_prediction(Prediction {
                league: future.league,
                user: future.user,
                club: future.club,
                home: Some(future.home),
                away: Some(future.away),
            });
        }
    }

    let previous = store.club(league_type, &fact.club).cloned();
    let prev_start = previous.as_ref().map(|c| c.game_start).unwrap_or(i64::MAX);
    let prev_end = previous.as_ref().map(|c| c.game_end).unwrap_or(i64::MAX);
    let started = !window_open && prev_start.min(fact.game_start) < now;
    let finished = last_update > prev_end.min(fact.game_end);

    match previous {
        None => {
            store.upsert_club(Club {
                club: fact.club.clone(),
                league_type: league_type.to_string(),
                full_name: fact.full_name.clone(),
                opponent: fact.opponent.clone(),
                game_start: fact.game_start,
                game_end: fact.game_end,
                home: fact.home,
                team_score: if started && !finished { fact.team_score } else { None },
                opponent_score: if started && !finished { fact.opponent_score } else { None },
                exists: true,
            });
        }
        Some(_) => {
            let club = store
                .club_mut(league_type, &fact.club)
                .expect("club fetched above");
            club.exists = true;
            if fact.full_name.is_some() {
                club.full_name = fact.full_name.clone();
            }
            if let Some(home) = fact.home {
                club.home = Some(home);
            }
            if !started {
                club.game_start = fact.game_start;
                club.game_end = fact.game_end;
                club.opponent = fact.opponent.clone();
            }
            if !finished {
                club.game_end = fact.game_end;
            }
            if started && !finished {
                if let (Some(team), Some(opponent)) = (fact.team_score, fact.opponent_score) {
                    club.team_score = Some(team);
                    club.opponent_score = Some(opponent);
                }
            }
        }
    }
    (started, finished)
}

fn apply_player_fact(
    store: &mut LedgerStore,
    league_type: &str,
    fact: &crate::feed::PlayerFact,
    window_open: bool,
    started: bool,
    finished: bool,
) {
    if store.player(league_type, &fact.uid).is_err() {
        let total = fact.total_points.or(fact.last_match).unwrap_or(0);
        let last = fact.last_match.or(fact.total_points).unwrap_or(0);
        store.upsert_player(Player {
            uid: fact.uid.clone(),
            league_type: league_type.to_string(),
            name: fact.name.clone(),
            club: fact.club.clone(),
            value: fact.value,
            sale_price: fact.sale_price.unwrap_or(fact.value),
            position: fact.position,
            total_points: total,
            average_points: fact.average_points.unwrap_or(total as f32),
            last_match: last,
            locked: started,
            exists: fact.exists,
        });
        return;
    }

    let appearances = store.historical_appearances(league_type, &fact.uid);
    let player = store
        .player_mut(league_type, &fact.uid)
        .expect("player fetched above");
    player.name = fact.name.clone();
    player.exists = fact.exists;
    player.locked = started;

    if !started {
        if let Some(total) = fact.total_points {
            player.total_points = total;
        }
        if let Some(average) = fact.average_points {
            player.average_points = average;
        }
    }
    if window_open {
        player.club = fact.club.clone();
        player.value = fact.value;
        player.sale_price = fact.sale_price.unwrap_or(fact.value);
        player.position = fact.position;
    }
    if started && !finished {
        match (fact.last_match, fact.total_points) {
            (Some(last), None) => {
                player.total_points += last - player.last_match;
                player.last_match = last;
            }
            (None, Some(total)) => {
                player.last_match += total - player.total_points;
                player.total_points = total;
            }
            (Some(last), Some(total)) => {
                player.last_match = last;
                player.total_points = total;
            }
            (None, None) => {}
        }
        player.average_points = fact.average_points.unwrap_or_else(|| {
            let games = (appearances + 1) as f32;
            (player.total_points as f32 / games * 10.0).round() / 10.0
        });
    }
}
