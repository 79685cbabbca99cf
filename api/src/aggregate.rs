use crate::cache::{Cache, UpstreamRequest};
use crate::config::AppConfig;
use f1_stats_api::chrono::{DateTime, Utc};
use f1_stats_api::models::schedule;
use f1_stats_api::{should_fetch_qualifying, ErgastClient, F1Event, QualifyingResult, RaceWinners};
use leaky_bucket::RateLimiter;
use log::{error, info};
use rocket::tokio;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// The upstream API behind the shared rate limiter.
pub struct Upstream {
    client: ErgastClient,
    ratelimiter: RateLimiter,
    round_delay_every: u32,
    round_delay: Duration,
}

impl Upstream {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: ErgastClient::new(&config.upstream_url),
            ratelimiter: config.ratelimiter(),
            round_delay_every: config.round_delay_every,
            round_delay: config.round_delay(),
        }
    }

    /// Waits for a rate limit permit, one per upstream request.
    pub async fn client(&self) -> &ErgastClient {
        self.ratelimiter.acquire_one().await;
        &self.client
    }
}

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Never fails: outside the window nothing is fetched, an upstream error is
/// answered with a cached empty list.
pub async fn qualifying_results(
    cache: &Cache,
    upstream: &Upstream,
    season: i32,
    round: u32,
    race_date: &str,
    now: DateTime<Utc>,
) -> Vec<QualifyingResult> {
    if !should_fetch_qualifying(race_date, now) {
        return Vec::new();
    }

    let request = UpstreamRequest::QualifyingResults { season, round };
    match request.load(cache, upstream).await {
        Ok((v, _)) => v,
        Err(e) => {
            error!("Error loading qualifying results for {}/{}: {:#}", season, round, e);
            Vec::new()
        }
    }
}

/// Never fails: an upstream error is answered with a cached empty map. The
/// instant is the insertion time on a cache hit.
pub async fn race_winners(cache: &Cache, upstream: &Upstream, season: i32) -> (RaceWinners, Option<Instant>) {
    match (UpstreamRequest::RaceWinners { season }).load(cache, upstream).await {
        Ok(v) => v,
        Err(e) => {
            error!("Error loading race winners for season {}: {:#}", season, e);
            (RaceWinners::new(), None)
        }
    }
}

/// The season's events joined with last season's winners and, for races
/// close to `now`, their qualifying results.
pub async fn schedule(
    cache: &Cache,
    upstream: &Upstream,
    season: i32,
    now: DateTime<Utc>,
) -> anyhow::Result<Vec<F1Event>> {
    info!("Fetching fresh F1 schedule for {}", season);
    let races = upstream.client().await.get_season_races(season).await?;
    let (winners, _) = race_winners(cache, upstream, season - 1).await;

    let mut qualifying = HashMap::new();
    for race in races.iter() {
        let round = race.round_number();
        let results = qualifying_results(cache, upstream, season, round, &race.date, now).await;
        qualifying.insert(round, results);

        if upstream.round_delay_every > 0 && round % upstream.round_delay_every == 0 {
            tokio::time::sleep(upstream.round_delay).await;
        }
    }

    let mut events = schedule::build_events(season, races, &winners, &qualifying);
    if let Some(idx) = schedule::mark_next_event(&mut events, now) {
        info!("Next event: {} on {}", events[idx].name, events[idx].date);
    }
    info!("Built F1 schedule with {} events", events.len());

    Ok(events)
}
