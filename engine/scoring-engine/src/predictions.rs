//! Prediction points: score guesses compared against home-fixture results.

use ledger_store::{LeagueSettings, LedgerStore, PointTotal, PointsRecord, UserId};

/// Exact score beats goal difference beats picking the right outcome.
/// The outcome comparison is draw-aware: predicting 1:1 when the game
/// ends 2:1 earns nothing, a draw is only "the right winner" if the game
/// actually drew.
pub fn score_prediction(
    predicted: (i32, i32),
    actual: (i32, i32),
    settings: &LeagueSettings,
) -> PointTotal {
    let (ph, pa) = predicted;
    let (ah, aa) = actual;
    if ph == ah && pa == aa {
        settings.predict_exact
    } else if ph - pa == ah - aa {
        settings.predict_difference
    } else if (ph > pa) == (ah > aa) && (ph == pa) == (ah == aa) {
        settings.predict_winner
    } else {
        0
    }
}

/// Unsubmitted halves of a live prediction become zeros before scoring so
/// downstream aggregates stay consistent through archival.
pub fn coalesce_live(store: &mut LedgerStore, league: ledger_store::LeagueId, user: UserId) {
    for prediction in store.predictions_of_user_mut(league, user) {
        prediction.home = Some(prediction.home.unwrap_or(0));
        prediction.away = Some(prediction.away.unwrap_or(0));
    }
}

/// Points for the window in progress, measured against current club rows
/// with a final-looking score.
pub fn live_points(store: &LedgerStore, settings: &LeagueSettings, user: UserId) -> PointTotal {
    let mut total = 0;
    for prediction in store.predictions_of_user(settings.id, user) {
        let (Some(ph), Some(pa)) = (prediction.home, prediction.away) else {
            continue;
        };
        let Some(club) = store.club(&settings.league_type, &prediction.club) else {
            continue;
        };
        if club.home != Some(true) {
            continue;
        }
        let (Some(ah), Some(aa)) = (club.team_score, club.opponent_score) else {
            continue;
        };
        total += score_prediction((ph, pa), (ah, aa), settings);
    }
    total
}

/// Points for a settled matchday, replayed from the historical mirrors.
pub fn historical_points(
    store: &LedgerStore,
    settings: &LeagueSettings,
    record: &PointsRecord,
) -> PointTotal {
    let Some(time) = record.time else {
        return 0;
    };
    let mut total = 0;
    for prediction in store.historical_predictions_for(record.league, record.user, record.matchday)
    {
        let (Some(ph), Some(pa)) = (prediction.home, prediction.away) else {
            continue;
        };
        for archived in store.historical_clubs() {
            let club = &archived.club;
            if archived.time != time
                || club.league_type != settings.league_type
                || club.home != Some(true)
                || club.club != prediction.club
            {
                continue;
            }
            let (Some(ah), Some(aa)) = (club.team_score, club.opponent_score) else {
                continue;
            };
            total += score_prediction((ph, pa), (ah, aa), settings);
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_store::LeagueSettings;

    fn settings() -> LeagueSettings {
        // Default scoring: exact 15, difference 5, winner 2.
        LeagueSettings::new(1, "test", "bundesliga")
    }

    #[test]
    fn exact_beats_difference_beats_winner() {
        let s = settings();
        assert_eq!(score_prediction((2, 1), (2, 1), &s), 15);
        assert_eq!(score_prediction((3, 2), (2, 1), &s), 5);
        assert_eq!(score_prediction((4, 2), (2, 1), &s), 2);
        assert_eq!(score_prediction((0, 2), (2, 1), &s), 0);
    }

    #[test]
    fn draws_are_handled_specially() {
        let s = settings();
        assert_eq!(score_prediction((1, 1), (1, 1), &s), 15);
        assert_eq!(score_prediction((2, 2), (1, 1), &s), 5);
        // Predicting a draw when the home side won scores nothing, even
        // though neither "winner" comparison alone would catch it.
        assert_eq!(score_prediction((1, 1), (2, 1), &s), 0);
        assert_eq!(score_prediction((2, 1), (1, 1), &s), 0);
    }
}
