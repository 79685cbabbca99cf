use std::collections::HashMap;
use chrono::{TimeZone, Utc};
use httpmock::prelude::*;
use crate::models::{circuits, qualifying_results, race_winners, schedule, standings};
use crate::models::schedule::EventType;
use crate::{should_fetch_qualifying, ErgastClient};

const SCHEDULE_2024: &'static str = include_str!("../../test-data/schedule_2024.json");
const WINNERS_2023: &'static str = include_str!("../../test-data/winners_2023.json");
const QUALIFYING_2024_1: &'static str = include_str!("../../test-data/qualifying_2024_1.json");
const DRIVER_STANDINGS_2024: &'static str = include_str!("../../test-data/driver_standings_2024.json");
const CONSTRUCTOR_STANDINGS_2024: &'static str = include_str!("../../test-data/constructor_standings_2024.json");

fn build_schedule() -> Vec<schedule::F1Event> {
    let races = schedule::parse(SCHEDULE_2024).unwrap();
    let winners = race_winners::parse(WINNERS_2023).unwrap();
    let mut qualifying = HashMap::new();
    qualifying.insert(1, qualifying_results::parse(QUALIFYING_2024_1).unwrap());
    // an empty list must not end up on the event
    qualifying.insert(5, Vec::new());

    schedule::build_events(2024, races, &winners, &qualifying)
}

#[test]
fn test_qualifying_results_1() {
    let results = qualifying_results::parse(QUALIFYING_2024_1).unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].position, "1");
    assert_eq!(results[0].driver.code.as_deref(), Some("VER"));
    assert_eq!(results[0].constructor.name, "Red Bull");
    assert_eq!(results[0].q3.as_deref(), Some("1:29.179"));
    assert_eq!(results[0].best_lap_millis, Some(89179));

    assert_eq!(results[1].q2, None);
    assert_eq!(results[1].best_lap_millis, Some(91431));

    let json = serde_json::to_value(&results[1]).unwrap();
    assert_eq!(json["Q1"], "1:31.431");
    assert!(json.get("Q2").is_none());
    assert_eq!(json["driver"]["familyName"], "Stroll");
}

#[test]
fn test_qualifying_results_not_run_yet() {
    let body = r#"{"MRData": {"RaceTable": {"season": "2024", "Races": []}}}"#;
    assert!(qualifying_results::parse(body).unwrap().is_empty());
}

#[test]
fn test_race_winners_2023() {
    let winners = race_winners::parse(WINNERS_2023).unwrap();

    // imola has no results
    assert_eq!(winners.len(), 2);

    let bahrain = winners.get("Bahrain International Circuit").unwrap();
    assert_eq!(bahrain.driver.full_name(), "Max Verstappen");
    assert_eq!(bahrain.points, "25");
    assert_eq!(bahrain.time.as_deref(), Some("1:33:56.736"));

    let miami = winners.get("Miami International Autodrome").unwrap();
    assert_eq!(miami.points, "26");
    assert_eq!(miami.time, None);
}

#[test]
fn test_race_winners_without_race_table() {
    let winners = race_winners::parse(r#"{"MRData": {}}"#).unwrap();
    assert!(winners.is_empty());
}

#[test]
fn test_schedule_events_2024() {
    let events = build_schedule();

    let ids: Vec<&str> = events.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "2024-1-race",
            "2024-1-qualifying",
            "2024-1-practice1",
            "2024-1-practice2",
            "2024-1-practice3",
            "2024-5-race",
            "2024-5-qualifying",
            "2024-5-sprint",
            "2024-5-practice1",
            "2024-6-race",
        ]
    );

    let bahrain = &events[0];
    assert_eq!(bahrain.name, "Bahrain Grand Prix");
    assert_eq!(bahrain.location, "Sakhir, Bahrain");
    assert_eq!(bahrain.utc_date_time, "2024-03-02T15:00:00Z");
    assert_eq!(bahrain.event_type, EventType::Race);
    assert_eq!(bahrain.has_sprint, Some(false));
    assert_eq!(bahrain.qualifying_results.as_ref().map(|v| v.len()), Some(2));
    assert_eq!(
        bahrain.last_year_winner.as_ref().map(|v| v.driver.family_name.as_str()),
        Some("Verstappen")
    );
    assert_eq!(bahrain.circuit_details.as_ref().unwrap().location.lat, "26.0325");

    let quali = &events[1];
    assert_eq!(quali.name, "Qualifying - Bahrain Grand Prix");
    assert_eq!(quali.event_type, EventType::Qualifying);
    assert_eq!(quali.qualifying_results, None);
    assert_eq!(quali.last_year_winner, None);
    assert_eq!(quali.has_sprint, None);
    assert_eq!(quali.round.as_deref(), Some("1"));

    assert_eq!(events[3].name, "Practice 2 - Bahrain Grand Prix");

    let china = &events[5];
    assert_eq!(china.has_sprint, Some(true));
    assert_eq!(china.qualifying_results, None);
    assert_eq!(china.last_year_winner, None);
    assert_eq!(events[7].name, "Sprint - Chinese Grand Prix");
    assert_eq!(events[7].event_type, EventType::Sprint);

    let miami = &events[9];
    assert_eq!(miami.time, "00:00:00Z");
    assert_eq!(miami.utc_date_time, "2024-05-05T00:00:00Z");
    assert!(miami.last_year_winner.is_some());

    assert!(events.iter().all(|v| !v.is_next));
}

#[test]
fn test_schedule_serialization() {
    let events = build_schedule();
    let json = serde_json::to_value(&events[1]).unwrap();

    assert_eq!(json["eventType"], "qualifying");
    assert_eq!(json["utcDateTime"], "2024-03-01T16:00:00Z");
    assert_eq!(json["isNext"], false);
    assert_eq!(json["circuitDetails"]["circuitId"], "bahrain");
    assert!(json.get("lastYearWinner").is_none());
    assert!(json.get("hasSprint").is_none());
}

#[test]
fn test_schedule_invalid_payload() {
    let err = schedule::parse(r#"{"MRData": {"RaceTable": {"season": "2024"}}}"#).unwrap_err();
    assert_eq!(err.to_string(), "Invalid API response format");
}

#[test]
fn test_mark_next_event() {
    let mut events = build_schedule();
    let now = Utc.with_ymd_and_hms(2024, 4, 19, 0, 0, 0).unwrap();

    let idx = schedule::mark_next_event(&mut events, now).unwrap();
    assert_eq!(events[idx].id, "2024-5-practice1");
    assert_eq!(events.iter().filter(|v| v.is_next).count(), 1);

    let next = schedule::next_event(&events, now).unwrap();
    assert_eq!(next.event.id, "2024-5-practice1");
    assert!(next.event.is_next);
    assert_eq!(next.seconds_until, 3 * 3600 + 30 * 60);

    // moving on clears the old flag
    let later = Utc.with_ymd_and_hms(2024, 4, 21, 7, 0, 0).unwrap();
    let idx = schedule::mark_next_event(&mut events, later).unwrap();
    assert_eq!(events[idx].id, "2024-6-race");
    assert_eq!(events.iter().filter(|v| v.is_next).count(), 1);
}

#[test]
fn test_mark_next_event_after_season() {
    let mut events = build_schedule();
    let now = Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap();

    assert_eq!(schedule::mark_next_event(&mut events, now), None);
    assert_eq!(schedule::next_event(&events, now), None);
    assert!(events.iter().all(|v| !v.is_next));
}

#[test]
fn test_should_fetch_qualifying() {
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

    assert!(should_fetch_qualifying("2024-03-02", now));
    assert!(should_fetch_qualifying("2024-02-24", now));
    assert!(!should_fetch_qualifying("2024-02-23", now));
    assert!(should_fetch_qualifying("2024-04-01", now));
    assert!(!should_fetch_qualifying("2024-04-02", now));
    assert!(!should_fetch_qualifying("not a date", now));
}

#[test]
fn test_driver_standings_2024() {
    let standings = standings::parse_drivers(DRIVER_STANDINGS_2024).unwrap();

    // the driver without a constructor is skipped
    assert_eq!(standings.len(), 2);
    assert_eq!(standings[0].position, "1");
    assert_eq!(standings[0].points, "437");
    assert_eq!(standings[0].constructor.name, "Red Bull");
    assert_eq!(standings[1].driver.code.as_deref(), Some("NOR"));
    assert_eq!(standings[1].wins, "4");
}

#[test]
fn test_constructor_standings_2024() {
    let standings = standings::parse_constructors(CONSTRUCTOR_STANDINGS_2024).unwrap();

    assert_eq!(standings.len(), 2);
    assert_eq!(standings[0].constructor.name, "McLaren");
    assert_eq!(standings[1].points, "652");
}

#[test]
fn test_standings_invalid_payload() {
    let err = standings::parse_drivers(CONSTRUCTOR_STANDINGS_2024).unwrap_err();
    assert_eq!(err.to_string(), "Invalid driver standings response format");

    let err = standings::parse_constructors(r#"{"MRData": {"StandingsTable": {"StandingsLists": []}}}"#).unwrap_err();
    assert_eq!(err.to_string(), "Invalid constructor standings response format");
}

#[test]
fn test_circuit_visualization() {
    let winners = race_winners::parse(WINNERS_2023).unwrap();

    let bahrain = circuits::visualize("bahrain", &winners).unwrap();
    assert_eq!(bahrain.circuit_name, "Bahrain International Circuit");
    assert_eq!(bahrain.location.as_ref().unwrap().locality, "Bahrain");
    assert_eq!(bahrain.characteristics.lap_record.time_millis, Some(87264));
    assert_eq!(bahrain.track_layout.as_ref().unwrap().view_box, "0 0 400 220");
    assert_eq!(bahrain.recent_winners.as_ref().map(|v| v.len()), Some(1));

    assert!(circuits::visualize("nurburgring", &winners).is_none());

    let all = circuits::visualize_all(&winners);
    assert_eq!(all.len(), 8);
    assert!(all.iter().all(|v| v.location.is_none()));
    let monaco = all.iter().find(|v| v.circuit_id == "monaco").unwrap();
    assert_eq!(monaco.recent_winners, None);

    let json = serde_json::to_value(monaco).unwrap();
    assert_eq!(json["characteristics"]["trackType"], "street");
    assert_eq!(json["characteristics"]["drsZones"], 1);
    assert!(json.get("recentWinners").is_none());
}

#[tokio::test]
async fn test_client_requests() {
    let server = MockServer::start_async().await;
    let standings_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/2024/constructorStandings.json");
            then.status(200)
                .header("Content-Type", "application/json")
                .body(CONSTRUCTOR_STANDINGS_2024);
        })
        .await;
    let winners_mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/2023/results/1.json")
                .query_param("limit", "100");
            then.status(200).body(WINNERS_2023);
        })
        .await;

    let client = ErgastClient::new(format!("{}/", server.base_url()));

    let standings = client.get_constructor_standings(2024).await.unwrap();
    assert_eq!(standings.len(), 2);
    let winners = client.get_race_winners(2023).await.unwrap();
    assert_eq!(winners.len(), 2);

    standings_mock.assert_async().await;
    winners_mock.assert_async().await;
}

#[tokio::test]
async fn test_client_upstream_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/2024.json");
            then.status(503);
        })
        .await;

    let client = ErgastClient::new(server.base_url());
    let err = client.get_season_races(2024).await.unwrap_err();
    assert!(err.to_string().contains("503"));
}
