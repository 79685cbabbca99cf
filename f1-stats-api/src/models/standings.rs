use crate::models::common::{Constructor, Driver};
use crate::models::ergast::{self, StandingsList};
use anyhow::Context;
use log::warn;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverStanding {
    pub position: String,
    pub points: String,
    pub wins: String,
    pub driver: Driver,
    pub constructor: Constructor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstructorStanding {
    pub position: String,
    pub points: String,
    pub wins: String,
    pub constructor: Constructor,
}

fn first_standings_list(body: &str) -> anyhow::Result<Option<StandingsList>> {
    let data = ergast::parse(body)?;
    Ok(data
        .standings_table
        .and_then(|v| v.standings_lists.into_iter().next()))
}

fn position(position: Option<String>, position_text: Option<String>) -> String {
    position.or(position_text).unwrap_or_default()
}

/// Drivers are flattened onto the first constructor they drove for.
pub fn parse_drivers(body: &str) -> anyhow::Result<Vec<DriverStanding>> {
    let rows = first_standings_list(body)?
        .and_then(|v| v.driver_standings)
        .context("Invalid driver standings response format")?;

    let mut res = Vec::with_capacity(rows.len());

    for row in rows {
        let constructor = match row.constructors.into_iter().next() {
            Some(v) => v,
            None => {
                warn!(
                    "Skipping standing of {} {}, no constructor",
                    row.driver.given_name, row.driver.family_name
                );
                continue;
            }
        };

        res.push(DriverStanding {
            position: position(row.position, row.position_text),
            points: row.points,
            wins: row.wins,
            driver: row.driver.into(),
            constructor: constructor.into(),
        });
    }

    Ok(res)
}

pub fn parse_constructors(body: &str) -> anyhow::Result<Vec<ConstructorStanding>> {
    let rows = first_standings_list(body)?
        .and_then(|v| v.constructor_standings)
        .context("Invalid constructor standings response format")?;

    Ok(rows
        .into_iter()
        .map(|row| ConstructorStanding {
            position: position(row.position, row.position_text),
            points: row.points,
            wins: row.wins,
            constructor: row.constructor.into(),
        })
        .collect())
}
