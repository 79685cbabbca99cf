use crate::models::common::CircuitDetails;
use crate::models::ergast::{self, Race, Session};
use crate::models::qualifying_results::QualifyingResult;
use crate::models::race_winners::{RaceWinner, RaceWinners};
use crate::util::parse_utc_date_time;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::collections::HashMap;

// Upstream leaves out session times for older seasons
const DEFAULT_SESSION_TIME: &'static str = "00:00:00Z";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Race,
    Qualifying,
    Sprint,
    Practice,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct F1Event {
    pub id: String,
    pub name: String,
    pub circuit: String,
    pub location: String,
    pub date: String,
    pub time: String,
    pub utc_date_time: String,
    pub event_type: EventType,
    pub is_next: bool,
    pub qualifying_results: Option<Vec<QualifyingResult>>,
    pub last_year_winner: Option<RaceWinner>,
    pub circuit_details: Option<CircuitDetails>,
    pub round: Option<String>,
    pub has_sprint: Option<bool>,
}

/// The upcoming event together with the countdown to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextEvent {
    pub event: F1Event,
    pub seconds_until: i64,
}

impl F1Event {
    pub fn starts_at(&self) -> Option<DateTime<Utc>> {
        parse_utc_date_time(&self.utc_date_time)
    }
}

/// Returns the races of the season in upstream order.
pub fn parse(body: &str) -> anyhow::Result<Vec<Race>> {
    let data = ergast::parse(body)?;

    match data.race_table.and_then(|v| v.races) {
        Some(races) => Ok(races),
        None => anyhow::bail!("Invalid API response format"),
    }
}

/// Flattens every race into its race event followed by its qualifying,
/// sprint and practice sessions.
///
/// `qualifying` is keyed by round number, `winners` by circuit name.
pub fn build_events(
    season: i32,
    races: Vec<Race>,
    winners: &RaceWinners,
    qualifying: &HashMap<u32, Vec<QualifyingResult>>,
) -> Vec<F1Event> {
    let mut events = Vec::with_capacity(races.len() * 6);

    for race in races {
        let circuit_name = race.circuit.circuit_name.clone();
        let location = format!(
            "{}, {}",
            race.circuit.location.locality, race.circuit.location.country
        );
        let circuit_details = CircuitDetails::from(race.circuit.clone());

        let session_event = |suffix: &str, name: String, event_type: EventType, session: &Session| {
            let time = session
                .time
                .clone()
                .unwrap_or_else(|| DEFAULT_SESSION_TIME.to_string());

            F1Event {
                id: format!("{}-{}-{}", season, race.round, suffix),
                name,
                circuit: circuit_name.clone(),
                location: location.clone(),
                date: session.date.clone(),
                utc_date_time: format!("{}T{}", session.date, time),
                time,
                event_type,
                is_next: false,
                qualifying_results: None,
                last_year_winner: None,
                circuit_details: Some(circuit_details.clone()),
                round: Some(race.round.clone()),
                has_sprint: None,
            }
        };

        let race_session = Session {
            date: race.date.clone(),
            time: race.time.clone(),
        };
        let mut race_event = session_event("race", race.race_name.clone(), EventType::Race, &race_session);
        race_event.qualifying_results = qualifying
            .get(&race.round_number())
            .filter(|v| !v.is_empty())
            .cloned();
        race_event.last_year_winner = winners.get(&circuit_name).cloned();
        race_event.has_sprint = Some(race.sprint.is_some());
        events.push(race_event);

        if let Some(session) = &race.qualifying {
            events.push(session_event(
                "qualifying",
                format!("Qualifying - {}", race.race_name),
                EventType::Qualifying,
                session,
            ));
        }

        if let Some(session) = &race.sprint {
            events.push(session_event(
                "sprint",
                format!("Sprint - {}", race.race_name),
                EventType::Sprint,
                session,
            ));
        }

        let practices = [&race.first_practice, &race.second_practice, &race.third_practice];
        for (i, session) in practices.into_iter().enumerate() {
            if let Some(session) = session {
                events.push(session_event(
                    &format!("practice{}", i + 1),
                    format!("Practice {} - {}", i + 1, race.race_name),
                    EventType::Practice,
                    session,
                ));
            }
        }
    }

    events
}

fn find_next(events: &[F1Event], now: DateTime<Utc>) -> Option<(usize, DateTime<Utc>)> {
    let mut next: Option<(usize, DateTime<Utc>)> = None;

    for (idx, event) in events.iter().enumerate() {
        let starts_at = match event.starts_at() {
            Some(v) => v,
            None => {
                warn!("Unparseable start time '{}' for {}", event.utc_date_time, event.id);
                continue;
            }
        };

        if starts_at <= now {
            continue;
        }

        // strictly earlier, so the first of equal start times wins
        let earlier = match next {
            Some((_, best)) => starts_at < best,
            None => true,
        };
        if earlier {
            next = Some((idx, starts_at));
        }
    }

    next
}

/// Flags the earliest event after `now` as the next one, clearing any
/// previous flag. Returns its index.
pub fn mark_next_event(events: &mut [F1Event], now: DateTime<Utc>) -> Option<usize> {
    for event in events.iter_mut() {
        event.is_next = false;
    }

    let (idx, _) = find_next(events, now)?;
    events[idx].is_next = true;
    debug!("Next event: {} on {}", events[idx].name, events[idx].date);

    Some(idx)
}

pub fn next_event(events: &[F1Event], now: DateTime<Utc>) -> Option<NextEvent> {
    let (idx, starts_at) = find_next(events, now)?;

    let mut event = events[idx].clone();
    event.is_next = true;

    Some(NextEvent {
        event,
        seconds_until: (starts_at - now).num_seconds(),
    })
}
