//! Sample slate used when the agent runs against simulated odds.

use betting_core::{GameLog, StatKind};
use chrono::{DateTime, Duration, Utc};
use flip_monitor::GameRegistration;
use prop_edge_calculator::{PropContext, PropQuery, StatFamily};

/// Favorites to watch, scheduled relative to `now`.
pub fn favorites(now: DateTime<Utc>) -> Vec<GameRegistration> {
    vec![
        GameRegistration::new("LALvsBOS", "Lakers", "Celtics", -200, now - Duration::minutes(2))
            .with_sport("NBA"),
        GameRegistration::new("KCvsBUF", "Chiefs", "Bills", -150, now + Duration::minutes(3))
            .with_sport("NFL"),
        GameRegistration::new("NYYvsHOU", "Yankees", "Astros", -240, now + Duration::minutes(20))
            .with_sport("MLB"),
    ]
}

fn log(now: DateTime<Utc>, days_ago: i64, minutes: f64) -> GameLog {
    GameLog::new(now - Duration::days(days_ago), minutes)
}

/// Labelled prop queries priced once at startup.
pub fn props(now: DateTime<Utc>) -> Vec<(&'static str, PropQuery)> {
    let big_man: Vec<GameLog> = [(8.0, 12.0, 36.0), (11.0, 9.0, 34.0), (9.0, 14.0, 38.0), (13.0, 8.0, 35.0), (7.0, 16.0, 37.0)]
        .iter()
        .enumerate()
        .map(|(i, &(reb, ast, min))| {
            log(now, i as i64 + 1, min)
                .with_stat(StatKind::Rebounds, reb)
                .with_stat(StatKind::Assists, ast)
        })
        .collect();

    let shooter: Vec<GameLog> = [(11.0, 5.0), (9.0, 4.0), (7.0, 2.0), (8.0, 3.0), (6.0, 2.0)]
        .iter()
        .enumerate()
        .map(|(i, &(att, made))| {
            log(now, i as i64 + 1, 34.0)
                .with_stat(StatKind::ThreePointAttempts, att)
                .with_stat(StatKind::ThreePointMakes, made)
        })
        .collect();

    let quarterback: Vec<GameLog> = [280.0, 310.0, 265.0, 300.0, 242.0]
        .iter()
        .enumerate()
        .map(|(i, &yards)| log(now, 7 * (i as i64 + 1), 60.0).with_stat(StatKind::PassingYards, yards))
        .collect();

    let hitter: Vec<GameLog> = [(1.0, 4.0), (2.0, 5.0), (0.0, 3.0), (2.0, 4.0), (1.0, 4.0)]
        .iter()
        .enumerate()
        .map(|(i, &(hits, at_bats))| {
            log(now, i as i64 + 1, 0.0)
                .with_stat(StatKind::Hits, hits)
                .with_stat(StatKind::AtBats, at_bats)
        })
        .collect();

    vec![
        (
            "Jokic reb+ast o21.5",
            PropQuery::new(
                StatFamily::CompoundRate {
                    first: StatKind::Rebounds,
                    second: StatKind::Assists,
                },
                big_man.clone(),
                21.5,
            )
            .with_context(PropContext::default().with_expected_minutes(36.0)),
        ),
        (
            "Jokic assists o10.5",
            PropQuery::new(StatFamily::PerMinuteRate { stat: StatKind::Assists }, big_man, 10.5)
                .with_context(PropContext::default().with_expected_minutes(36.0)),
        ),
        (
            "Curry 3PM o3.5",
            PropQuery::new(
                StatFamily::WeightedRecentForm {
                    attempts: StatKind::ThreePointAttempts,
                    makes: StatKind::ThreePointMakes,
                },
                shooter,
                3.5,
            ),
        ),
        (
            "Mahomes passing yards o274.5",
            PropQuery::new(StatFamily::Normal { stat: StatKind::PassingYards }, quarterback, 274.5)
                .with_context(
                    PropContext::default()
                        .with_pace_adjustment(prop_edge_calculator::game_script_adjustment(3.5)),
                ),
        ),
        (
            "Judge hits o0.5",
            PropQuery::new(
                StatFamily::BoundedTrials {
                    successes: StatKind::Hits,
                    trials: StatKind::AtBats,
                    expected_trials: Some(4),
                },
                hitter,
                0.5,
            ),
        ),
    ]
}
