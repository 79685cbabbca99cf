use arc_swap::ArcSwapOption;
use reqwest::{Client, ClientBuilder};
use std::ops::Deref;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::SyncSender;
use std::sync::Arc;

pub use crate::models::circuits::{CircuitCharacteristics, CircuitVisualization, TrackLayout};
pub use crate::models::common::{CircuitDetails, CircuitLocation, Constructor, Driver};
pub use crate::models::qualifying_results::QualifyingResult;
pub use crate::models::race_winners::{RaceWinner, RaceWinners};
pub use crate::models::schedule::{EventType, F1Event, NextEvent};
pub use crate::models::standings::{ConstructorStanding, DriverStanding};
pub use chrono;

pub mod components;
pub mod models;
mod util;

#[cfg(test)]
mod tests;

use crate::models::ergast::Race;
pub use crate::util::should_fetch_qualifying;
pub use reqwest::{Request, StatusCode};

pub const DEFAULT_BASE_URL: &'static str = "http://api.jolpi.ca/ergast/f1";
const USER_AGENT: &'static str =
    git_version::git_version!(prefix = "f1-stats-api/", args = ["--always"], fallback = "f1-stats-api");

static REQUEST_SENDER: ArcSwapOption<SyncSender<(usize, Request)>> = ArcSwapOption::const_empty();
static STATUS_SENDER: ArcSwapOption<SyncSender<(usize, StatusCode)>> = ArcSwapOption::const_empty();
static REQUEST_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Every request made by any [`ErgastClient`] is reported to these channels,
/// the request before it is sent and the status code once it returns.
pub fn set_request_callback(
    request_sender: SyncSender<(usize, Request)>,
    status_sender: SyncSender<(usize, StatusCode)>,
) {
    REQUEST_SENDER.store(Some(Arc::new(request_sender)));
    STATUS_SENDER.store(Some(Arc::new(status_sender)));
}

/// Client for an Ergast-compatible results API (Jolpica by default).
#[derive(Clone)]
pub struct ErgastClient {
    base_url: String,
    client: Client,
}

impl Default for ErgastClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ErgastClient {
    pub fn new<T: ToString>(base_url: T) -> Self {
        let client = ClientBuilder::new()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();

        Self {
            base_url: base_url.to_string().trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn send_request(&self, path: &str) -> anyhow::Result<String> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let req = self.client.get(&url).build()?;

        let id = REQUEST_COUNTER.fetch_add(1, Ordering::Relaxed);

        if let Some(sender) = REQUEST_SENDER.load().deref() {
            if let Some(req) = req.try_clone() {
                // a full channel only loses a log line
                let _ = sender.try_send((id, req));
            }
        }

        let res = self.client.execute(req).await?;

        if let Some(sender) = STATUS_SENDER.load().deref() {
            let _ = sender.try_send((id, res.status()));
        }

        let status = res.status();
        if !status.is_success() {
            anyhow::bail!("Upstream returned {} for {}", status, url);
        }

        Ok(res.text().await?)
    }

    pub async fn get_season_races(&self, season: i32) -> anyhow::Result<Vec<Race>> {
        let body = self.send_request(&format!("{}.json", season)).await?;
        models::schedule::parse(&body)
    }

    pub async fn get_qualifying_results(
        &self,
        season: i32,
        round: u32,
    ) -> anyhow::Result<Vec<QualifyingResult>> {
        let body = self
            .send_request(&format!("{}/{}/qualifying.json", season, round))
            .await?;
        models::qualifying_results::parse(&body)
    }

    /// Only the winning result of every race is requested, one row per race.
    pub async fn get_race_winners(&self, season: i32) -> anyhow::Result<RaceWinners> {
        let body = self
            .send_request(&format!("{}/results/1.json?limit=100", season))
            .await?;
        models::race_winners::parse(&body)
    }

    pub async fn get_driver_standings(&self, season: i32) -> anyhow::Result<Vec<DriverStanding>> {
        let body = self
            .send_request(&format!("{}/driverStandings.json", season))
            .await?;
        models::standings::parse_drivers(&body)
    }

    pub async fn get_constructor_standings(
        &self,
        season: i32,
    ) -> anyhow::Result<Vec<ConstructorStanding>> {
        let body = self
            .send_request(&format!("{}/constructorStandings.json", season))
            .await?;
        models::standings::parse_constructors(&body)
    }
}
