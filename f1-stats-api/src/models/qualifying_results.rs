use crate::components::lap_time;
use crate::models::common::{Constructor, Driver};
use crate::models::ergast::{self, QualifyingRow};
use log::trace;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualifyingResult {
    pub position: String,
    pub number: String,
    pub driver: Driver,
    pub constructor: Constructor,
    #[serde(rename = "Q1")]
    pub q1: Option<String>,
    #[serde(rename = "Q2")]
    pub q2: Option<String>,
    #[serde(rename = "Q3")]
    pub q3: Option<String>,
    /// Fastest of the Q1-Q3 laps
    pub best_lap_millis: Option<u32>,
}

impl From<QualifyingRow> for QualifyingResult {
    fn from(row: QualifyingRow) -> Self {
        let best_lap_millis = [&row.q1, &row.q2, &row.q3]
            .into_iter()
            .flatten()
            .filter_map(|v| lap_time::parse(v))
            .min();

        Self {
            position: row.position,
            number: row.number,
            driver: row.driver.into(),
            constructor: row.constructor.into(),
            q1: row.q1,
            q2: row.q2,
            q3: row.q3,
            best_lap_millis,
        }
    }
}

/// A payload without qualifying results (session not run yet) gives an empty list.
pub fn parse(body: &str) -> anyhow::Result<Vec<QualifyingResult>> {
    let data = ergast::parse(body)?;

    let rows = data
        .race_table
        .and_then(|v| v.races)
        .and_then(|v| v.into_iter().next())
        .and_then(|v| v.qualifying_results);

    match rows {
        Some(rows) => Ok(rows.into_iter().map(QualifyingResult::from).collect()),
        None => {
            trace!("No qualifying results in payload");
            Ok(Vec::new())
        }
    }
}
