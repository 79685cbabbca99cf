use crate::models::common::{Constructor, Driver};
use crate::models::ergast;
use log::{trace, warn};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::collections::HashMap;

/// Keyed by the upstream circuit name.
pub type RaceWinners = HashMap<String, RaceWinner>;

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceWinner {
    pub driver: Driver,
    pub constructor: Constructor,
    pub points: String,
    pub time: Option<String>,
}

/// The first result of every race is taken as its winner.
pub fn parse(body: &str) -> anyhow::Result<RaceWinners> {
    let data = ergast::parse(body)?;
    let mut winners = RaceWinners::new();

    let races = match data.race_table.and_then(|v| v.races) {
        Some(v) => v,
        None => {
            trace!("No races in results payload");
            return Ok(winners);
        }
    };

    for race in races {
        let circuit_name = race.circuit.circuit_name;
        let winner = match race.results.and_then(|v| v.into_iter().next()) {
            Some(v) => v,
            None => continue,
        };

        match (winner.driver, winner.constructor) {
            (Some(driver), Some(constructor)) => {
                winners.insert(
                    circuit_name,
                    RaceWinner {
                        driver: driver.into(),
                        constructor: constructor.into(),
                        points: winner.points,
                        time: winner.time.map(|v| v.time),
                    },
                );
            }
            _ => warn!("Winner of round {} has no driver or constructor", race.round),
        }
    }

    Ok(winners)
}
