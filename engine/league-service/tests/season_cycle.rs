//! A full matchday cycle driven through the service facade: feed opens the
//! window, users trade and predict, the window closes, scores trickle in,
//! the window reopens and the matchday is archived.

use ledger_store::{Placement, Position};
use league_service::{LeagueService, ServiceConfig, ServiceError};
use matchday_controller::{ClubFact, FeedUpdate, PlayerFact};

const ALICE: u32 = 1;
const BOB: u32 = 2;

fn player_fact(uid: &str, position: Position, sale_price: i64, last_match: i32) -> PlayerFact {
    PlayerFact {
        uid: uid.to_string(),
        name: uid.to_uppercase(),
        club: "fcb".to_string(),
        value: sale_price,
        sale_price: Some(sale_price),
        position,
        total_points: None,
        average_points: None,
        last_match: Some(last_match),
        exists: true,
    }
}

fn club_fact(game_start: i64, score: Option<(i32, i32)>) -> ClubFact {
    ClubFact {
        club: "fcb".to_string(),
        full_name: Some("Bayern".to_string()),
        game_start,
        game_end: game_start + 7_000,
        opponent: Some("bvb".to_string()),
        home: Some(true),
        team_score: score.map(|s| s.0),
        opponent_score: score.map(|s| s.1),
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

fn default_players(last_match: i32) -> Vec<PlayerFact> {
    vec![
        player_fact("p1", Position::Mid, 1_000_000, last_match),
        player_fact("p2", Position::Att, 800_000, 0),
    ]
}

#[test]
fn one_matchday_from_open_to_archive() {
    let service = LeagueService::new(ServiceConfig::default());
    let league = service.create_league("kreisliga", "bundesliga", ALICE).unwrap();
    service.join_league(league, BOB).unwrap();

    // Window opens with the first feed cycle.
    service
        .ingest_at("bundesliga", &feed(true, default_players(0), vec![club_fact(10_000, None)]), 100)
        .unwrap();

    // Both members buy from the pool and Alice predicts the fixture.
    service.place_bid(league, ALICE, "p1", 1_000_000).unwrap();
    service.place_bid(league, BOB, "p2", 800_000).unwrap();
    service
        .submit_prediction_at(league, ALICE, "fcb", 2, 1, 150)
        .unwrap();

    // Window closes: purchases materialize, matchday 1 opens.
    service
        .ingest_at("bundesliga", &feed(false, default_players(0), vec![club_fact(10_000, None)]), 200)
        .unwrap();
    let squad = service.squad(league, ALICE).unwrap();
    assert_eq!(squad.len(), 1);
    assert_eq!(squad[0].uid, "p1");
    assert_eq!(squad[0].placement, Placement::Bench);
    assert_eq!(service.membership(league, ALICE).unwrap().money, 149_000_000);

    // Alice fields her midfielder before kickoff.
    service.move_player(league, ALICE, "p1").unwrap();

    // The match runs: p1 scores 7, the game stands 2:1.
    service
        .ingest_at(
            "bundesliga",
            &feed(false, default_players(7), vec![club_fact(250, Some((2, 1)))]),
            300,
        )
        .unwrap();

    let alice = service.membership(league, ALICE).unwrap();
    assert_eq!(alice.fantasy_points, 7);
    assert_eq!(alice.prediction_points, 15);
    assert_eq!(alice.points, 22);
    let standings = service.standings(league).unwrap();
    assert_eq!(standings[0].user, ALICE);
    assert_eq!(standings[1].points, 0);

    // The window reopens: the matchday is settled and archived.
    service
        .ingest_at("bundesliga", &feed(true, default_players(7), vec![club_fact(250, None)]), 400)
        .unwrap();

    service.with_store(|store| {
        let row = store
            .points_of_league(league)
            .into_iter()
            .find(|p| p.user == ALICE)
            .cloned()
            .unwrap();
        assert_eq!(row.matchday, 1);
        assert_eq!(row.points, 22);
        assert_eq!(row.time, Some(400));
        assert!(store
            .historical_squad()
            .iter()
            .any(|s| s.user == ALICE && s.uid == "p1" && s.matchday == 1));
        assert_eq!(store.historical_predictions_for(league, ALICE, 1).len(), 1);
        assert!(store.predictions_of_user(league, ALICE).is_empty());
        assert!(store
            .historical_clubs()
            .iter()
            .any(|c| c.time == 400 && c.club.team_score == Some(2)));
    });

    // Aggregates survive the archival.
    let alice = service.membership(league, ALICE).unwrap();
    assert_eq!(alice.points, 22);

    // Recalculation is admin-gated and stable when nothing changed.
    assert!(matches!(
        service.recalculate_prediction_points(league, BOB),
        Err(ServiceError::NotAdmin { .. })
    ));
    assert_eq!(service.recalculate_prediction_points(league, ALICE).unwrap(), 0);
}

#[test]
fn predictions_validate_shape_and_fixture() {
    let service = LeagueService::new(ServiceConfig::default());
    let league = service.create_league("kreisliga", "bundesliga", ALICE).unwrap();
    service
        .ingest_at("bundesliga", &feed(true, vec![], vec![club_fact(10_000, None)]), 100)
        .unwrap();

    assert!(matches!(
        service.submit_prediction_at(league, ALICE, "fcb", -1, 0, 150),
        Err(ServiceError::InvalidScore { .. })
    ));
    assert!(matches!(
        service.submit_prediction_at(league, ALICE, "nope", 1, 0, 150),
        Err(ServiceError::UnknownMatch { .. })
    ));
    // A fixture that already kicked off no longer takes predictions.
    assert!(matches!(
        service.submit_prediction_at(league, ALICE, "fcb", 1, 0, 11_000),
        Err(ServiceError::UnknownMatch { .. })
    ));
    service
        .submit_prediction_at(league, ALICE, "fcb", 1, 0, 150)
        .unwrap();
}

#[test]
fn malformed_player_ids_never_reach_the_ledger() {
    let service = LeagueService::new(ServiceConfig::default());
    let league = service.create_league("kreisliga", "bundesliga", ALICE).unwrap();
    assert!(matches!(
        service.place_bid(league, ALICE, "p1'; --", 1_000_000),
        Err(ServiceError::InvalidPlayerId { .. })
    ));
}
