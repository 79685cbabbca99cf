//! Response shapes of the Ergast-compatible API.
//!
//! Every nested table is optional so a payload with missing pieces can
//! still be deserialized; the reshaping modules decide what is an error.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Response {
    #[serde(rename = "MRData")]
    pub mr_data: MrData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MrData {
    #[serde(rename = "RaceTable")]
    pub race_table: Option<RaceTable>,
    #[serde(rename = "StandingsTable")]
    pub standings_table: Option<StandingsTable>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RaceTable {
    pub season: Option<String>,
    #[serde(rename = "Races")]
    pub races: Option<Vec<Race>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Race {
    pub season: String,
    pub round: String,
    pub url: Option<String>,
    pub race_name: String,
    pub date: String,
    pub time: Option<String>,
    #[serde(rename = "Circuit")]
    pub circuit: Circuit,
    #[serde(rename = "FirstPractice")]
    pub first_practice: Option<Session>,
    #[serde(rename = "SecondPractice")]
    pub second_practice: Option<Session>,
    #[serde(rename = "ThirdPractice")]
    pub third_practice: Option<Session>,
    #[serde(rename = "Qualifying")]
    pub qualifying: Option<Session>,
    #[serde(rename = "Sprint")]
    pub sprint: Option<Session>,
    #[serde(rename = "Results")]
    pub results: Option<Vec<RaceResult>>,
    #[serde(rename = "QualifyingResults")]
    pub qualifying_results: Option<Vec<QualifyingRow>>,
}

impl Race {
    /// Rounds are numeric strings upstream, 0 when that doesn't hold.
    pub fn round_number(&self) -> u32 {
        self.round.parse().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    pub date: String,
    pub time: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Circuit {
    pub circuit_id: String,
    #[serde(default)]
    pub url: String,
    pub circuit_name: String,
    #[serde(rename = "Location")]
    pub location: Location,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub lat: String,
    #[serde(default)]
    pub long: String,
    pub locality: String,
    pub country: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub driver_id: Option<String>,
    pub code: Option<String>,
    pub given_name: String,
    pub family_name: String,
    #[serde(default)]
    pub nationality: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constructor {
    pub constructor_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub nationality: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RaceResult {
    pub number: Option<String>,
    pub position: String,
    #[serde(default)]
    pub points: String,
    #[serde(rename = "Driver")]
    pub driver: Option<Driver>,
    #[serde(rename = "Constructor")]
    pub constructor: Option<Constructor>,
    #[serde(rename = "Time")]
    pub time: Option<ResultTime>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResultTime {
    pub millis: Option<String>,
    pub time: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QualifyingRow {
    pub number: String,
    pub position: String,
    #[serde(rename = "Driver")]
    pub driver: Driver,
    #[serde(rename = "Constructor")]
    pub constructor: Constructor,
    #[serde(rename = "Q1")]
    pub q1: Option<String>,
    #[serde(rename = "Q2")]
    pub q2: Option<String>,
    #[serde(rename = "Q3")]
    pub q3: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StandingsTable {
    pub season: Option<String>,
    #[serde(rename = "StandingsLists", default)]
    pub standings_lists: Vec<StandingsList>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StandingsList {
    pub season: Option<String>,
    pub round: Option<String>,
    #[serde(rename = "DriverStandings")]
    pub driver_standings: Option<Vec<DriverStandingRow>>,
    #[serde(rename = "ConstructorStandings")]
    pub constructor_standings: Option<Vec<ConstructorStandingRow>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverStandingRow {
    // drivers excluded from the championship only carry a positionText
    pub position: Option<String>,
    pub position_text: Option<String>,
    pub points: String,
    pub wins: String,
    #[serde(rename = "Driver")]
    pub driver: Driver,
    #[serde(rename = "Constructors", default)]
    pub constructors: Vec<Constructor>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstructorStandingRow {
    pub position: Option<String>,
    pub position_text: Option<String>,
    pub points: String,
    pub wins: String,
    #[serde(rename = "Constructor")]
    pub constructor: Constructor,
}

pub fn parse(body: &str) -> anyhow::Result<MrData> {
    let response: Response = serde_json::from_str(body)?;
    Ok(response.mr_data)
}
