use ledger_store::{
    Counterparty, LeagueId, LedgerStore, LockRegistry, Placement, Position, Prediction, SquadSlot,
    Transfer, UserId,
};

use crate::controller::{ingest, IngestOutcome};
use crate::feed::{ClubFact, FeedUpdate, FutureFixture, PlayerFact};

const CARLA: UserId = 3;
const DENIS: UserId = 4;

fn player_fact(uid: &str, club: &str, last_match: i32) -> PlayerFact {
    PlayerFact {
        uid: uid.to_string(),
        name: uid.to_uppercase(),
        club: club.to_string(),
        value: 1_000_000,
        sale_price: Some(1_000_000),
        position: Position::Mid,
        total_points: None,
        average_points: None,
        last_match: Some(last_match),
        exists: true,
    }
}

fn club_fact(code: &str, game_start: i64, game_end: i64) -> ClubFact {
    ClubFact {
        club: code.to_string(),
        full_name: None,
        game_start,
        game_end,
        opponent: Some("bvb".to_string()),
        home: Some(code != "bvb"),
        team_score: None,
        opponent_score: None,
        future_games: Vec::new(),
    }
}

fn feed(open: bool, players: Vec<PlayerFact>, clubs: Vec<ClubFact>) -> FeedUpdate {
    FeedUpdate {
        transfer_open: open,
        countdown_secs: 600,
        players,
        clubs,
    }
}

/// League with two members and players fed in during an open window.
fn seeded() -> (LedgerStore, LockRegistry, LeagueId) {
    let mut store = LedgerStore::new();
    let locks = LockRegistry::new();
    let league = store.create_league("test", "bundesliga", CARLA);
    store.join_league(league, DENIS).unwrap();
    let update = feed(
        true,
        vec![player_fact("p1", "fcb", 0), player_fact("p2", "fcb", 0)],
        vec![club_fact("fcb", 10_000, 20_000)],
    );
    ingest(&mut store, &locks, "bundesliga", &update, 100).unwrap();
    (store, locks, league)
}

#[test]
fn locked_league_type_skips_the_cycle() {
    let (mut store, locks, _league) = seeded();
    let _guard = locks.try_acquire("bundesliga").unwrap();
    let outcome = ingest(
        &mut store,
        &locks,
        "bundesliga",
        &feed(true, vec![], vec![]),
        150,
    )
    .unwrap();
    assert_eq!(outcome, IngestOutcome::SkippedLocked);
}

#[test]
fn ingest_creates_players_and_mirrors_window_state() {
    let (store, _locks, league) = seeded();
    assert!(store.player("bundesliga", "p1").is_ok());
    let settings = store.league(league).unwrap();
    assert!(settings.transfer_open);
    assert_eq!(settings.countdown_secs, 600);
}

#[test]
fn window_close_materializes_pending_transfers() {
    let (mut store, locks, league) = seeded();
    // Denis owns p1 and has sold it to Carla for 900,000.
    store.insert_slot(SquadSlot {
        league,
        user: DENIS,
        uid: "p1".to_string(),
        placement: Placement::Field(Position::Mid),
        starred: false,
    });
    store
        .insert_transfer(Transfer {
            league,
            uid: "p1".to_string(),
            seller: Counterparty::User(DENIS),
            buyer: Counterparty::User(CARLA),
            value: 900_000,
            max: 900_000,
            placement: Placement::Bench,
            starred: false,
        })
        .unwrap();

    let outcome = ingest(
        &mut store,
        &locks,
        "bundesliga",
        &feed(false, vec![], vec![club_fact("fcb", 10_000, 20_000)]),
        200,
    )
    .unwrap();
    assert_eq!(
        outcome,
        IngestOutcome::Applied {
            window_opened: false,
            window_closed: true
        }
    );

    assert!(store.slot(league, CARLA, "p1").is_some());
    assert!(store.slot(league, DENIS, "p1").is_none());
    assert!(store.transfers_for_player(league, "p1").is_empty());

    let archived = store.historical_transfers();
    assert_eq!(archived.len(), 1);
    assert_eq!(archived[0].matchday, 1);
    assert_eq!(archived[0].seller, Counterparty::User(DENIS));
    assert_eq!(archived[0].buyer, Counterparty::User(CARLA));
    assert_eq!(archived[0].value, 900_000);
}

#[test]
fn window_close_purges_open_offers_and_vacates_pool_sales() {
    let (mut store, locks, league) = seeded();
    store.insert_slot(SquadSlot {
        league,
        user: DENIS,
        uid: "p1".to_string(),
        placement: Placement::Bench,
        starred: false,
    });
    store.insert_slot(SquadSlot {
        league,
        user: DENIS,
        uid: "p2".to_string(),
        placement: Placement::Bench,
        starred: false,
    });
    // p1 listed with no buyer; p2 sold to the pool.
    store
        .insert_transfer(Transfer {
            league,
            uid: "p1".to_string(),
            seller: Counterparty::User(DENIS),
            buyer: Counterparty::OpenMarket,
            value: 2_000_000,
            max: 2_000_000,
            placement: Placement::Bench,
            starred: false,
        })
        .unwrap();
    store
        .insert_transfer(Transfer {
            league,
            uid: "p2".to_string(),
            seller: Counterparty::User(DENIS),
            buyer: Counterparty::AiPool,
            value: 1_000_000,
            max: 1_000_000,
            placement: Placement::Bench,
            starred: false,
        })
        .unwrap();

    ingest(&mut store, &locks, "bundesliga", &feed(false, vec![], vec![]), 200).unwrap();

    // The unmatched listing evaporated, the player stayed put.
    assert!(store.slot(league, DENIS, "p1").is_some());
    // The pool sale went through: slot vacated, nobody took it over.
    assert!(store.slot(league, DENIS, "p2").is_none());
    // Only the pool sale reached the archive.
    assert_eq!(store.historical_transfers().len(), 1);
    assert_eq!(store.historical_transfers()[0].uid, "p2");
}

#[test]
fn window_close_opens_a_zero_matchday_with_money_snapshot() {
    let (mut store, locks, league) = seeded();
    store.membership_mut(league, CARLA).unwrap().money = 123_000_000;
    ingest(&mut store, &locks, "bundesliga", &feed(false, vec![], vec![]), 200).unwrap();

    let row = store.open_points(league, CARLA).unwrap();
    assert_eq!(row.matchday, 1);
    assert_eq!(row.points, 0);
    assert_eq!(row.money, 123_000_000);
    assert!(row.time.is_none());
    assert!(store.open_points(league, DENIS).is_some());
}

#[test]
fn steady_closed_cycles_keep_scores_current() {
    let (mut store, locks, league) = seeded();
    store.insert_slot(SquadSlot {
        league,
        user: CARLA,
        uid: "p1".to_string(),
        placement: Placement::Field(Position::Mid),
        starred: false,
    });
    ingest(&mut store, &locks, "bundesliga", &feed(false, vec![], vec![]), 200).unwrap();

    // The match runs; p1 scores 8.
    let update = feed(
        false,
        vec![player_fact("p1", "fcb", 8), player_fact("p2", "fcb", 0)],
        vec![club_fact("fcb", 150, 20_000)],
    );
    ingest(&mut store, &locks, "bundesliga", &update, 300).unwrap();

    assert_eq!(store.player("bundesliga", "p1").unwrap().last_match, 8);
    assert!(store.player("bundesliga", "p1").unwrap().locked);
    let row = store.open_points(league, CARLA).unwrap();
    assert_eq!(row.fantasy_points, 8);
}

#[test]
fn window_open_edge_stamps_and_archives_the_matchday() {
    let (mut store, locks, league) = seeded();
    store.insert_slot(SquadSlot {
        league,
        user: CARLA,
        uid: "p1".to_string(),
        placement: Placement::Field(Position::Mid),
        starred: true,
    });
    ingest(&mut store, &locks, "bundesliga", &feed(false, vec![], vec![]), 200).unwrap();
    store.upsert_prediction(Prediction {
        league,
        user: CARLA,
        club: "fcb".to_string(),
        home: Some(2),
        away: Some(1),
    });

    // The window reopens: the matchday ends.
    let update = feed(
        true,
        vec![player_fact("p1", "fcb", 4), player_fact("p2", "fcb", 0)],
        vec![club_fact("fcb", 10_150, 20_000)],
    );
    ingest(&mut store, &locks, "bundesliga", &update, 400).unwrap();

    // Points row settled.
    assert!(store.open_points(league, CARLA).is_none());
    let settled = store
        .points_of_league(league)
        .into_iter()
        .find(|p| p.user == CARLA)
        .unwrap()
        .clone();
    assert_eq!(settled.time, Some(400));

    // Squad and predictions snapshotted under the closing matchday.
    assert!(store
        .historical_squad()
        .iter()
        .any(|s| s.user == CARLA && s.uid == "p1" && s.matchday == 1 && s.starred));
    let archived = store.historical_predictions_for(league, CARLA, 1);
    assert_eq!(archived.len(), 1);
    assert_eq!(archived[0].home, Some(2));
    assert!(store.predictions_of_user(league, CARLA).is_empty());

    // Player and club state archived at the settlement time.
    assert!(store
        .historical_players()
        .iter()
        .any(|h| h.time == 400 && h.player.uid == "p1"));
    assert!(store
        .historical_clubs()
        .iter()
        .any(|h| h.time == 400 && h.club.club == "fcb"));

    // Current club scores reset for the next matchday.
    assert_eq!(store.club("bundesliga", "fcb").unwrap().team_score, None);
}

#[test]
fn market_fields_are_frozen_while_the_window_is_closed() {
    let (mut store, locks, _league) = seeded();
    ingest(&mut store, &locks, "bundesliga", &feed(false, vec![], vec![]), 200).unwrap();

    let mut pricier = player_fact("p1", "fcb", 0);
    pricier.value = 9_000_000;
    pricier.sale_price = Some(9_000_000);
    let update = feed(
        false,
        vec![pricier.clone(), player_fact("p2", "fcb", 0)],
        vec![club_fact("fcb", 10_000, 20_000)],
    );
    ingest(&mut store, &locks, "bundesliga", &update, 300).unwrap();
    assert_eq!(store.player("bundesliga", "p1").unwrap().value, 1_000_000);

    // Once the window opens the new valuation lands.
    let update = feed(
        true,
        vec![pricier, player_fact("p2", "fcb", 0)],
        vec![club_fact("fcb", 10_000, 20_000)],
    );
    ingest(&mut store, &locks, "bundesliga", &update, 500).unwrap();
    assert_eq!(store.player("bundesliga", "p1").unwrap().value, 9_000_000);
}

#[test]
fn future_predictions_go_live_when_the_fixture_matures() {
    let (mut store, locks, league) = seeded();
    // The feed announces a future fcb fixture; Carla predicts it early.
    let mut club = club_fact("fcb", 10_000, 20_000);
    club.future_games = vec![FutureFixture {
        game_start: 50_000,
        opponent: "s04".to_string(),
        home: Some(true),
    }];
    ingest(
        &mut store,
        &locks,
        "bundesliga",
        &feed(true, vec![], vec![club]),
        150,
    )
    .unwrap();
    assert!(store.future_club("bundesliga", "fcb", 50_000).is_some());
    store.upsert_future_prediction(ledger_store::FuturePrediction {
        league,
        user: CARLA,
        club: "fcb".to_string(),
        game_start: 50_000,
        home: 3,
        away: 0,
    });

    // Next cycle reports that fixture as current.
    ingest(
        &mut store,
        &locks,
        "bundesliga",
        &feed(true, vec![], vec![club_fact("fcb", 50_000, 60_000)]),
        200,
    )
    .unwrap();
    let live = store.predictions_of_user(league, CARLA);
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].home, Some(3));
    assert!(store.future_club("bundesliga", "fcb", 50_000).is_none());
}

#[test]
fn failed_cycles_release_the_lock() {
    let (mut store, locks, _league) = seeded();
    // Whatever the outcome, the flag must be clear afterwards.
    let _ = ingest(&mut store, &locks, "bundesliga", &feed(false, vec![], vec![]), 200);
    assert!(!locks.is_locked("bundesliga"));
    let _ = ingest(&mut store, &locks, "bundesliga", &feed(true, vec![], vec![]), 300);
    assert!(!locks.is_locked("bundesliga"));
}
