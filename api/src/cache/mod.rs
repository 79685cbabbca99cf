
use crate::aggregate::{self, Upstream};
use crate::util::ApiResponse;
use dashmap::DashMap;
use log::{error, info, trace};
use rocket::request::{FromRequest, Outcome};
use rocket::{Request, State};
use serde::de::DeserializeOwned;
use std::ops::Deref;
use std::sync::Arc;
use std::time::{Duration, Instant};

const MINUTE_IN_S: u64 = 60;
const HOUR_IN_S: u64 = 60 * MINUTE_IN_S;

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum CachedRequest {
    Schedule { season: i32 },
    Upstream(UpstreamRequest),
}

/// Answered by a single upstream call.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum UpstreamRequest {
    DriverStandings { season: i32 },
    ConstructorStandings { season: i32 },
    QualifyingResults { season: i32, round: u32 },
    RaceWinners { season: i32 },
}

impl CachedRequest {
    pub fn new_schedule(season: i32) -> Self {
        Self::Schedule { season }
    }

    pub fn new_driver_standings(season: i32) -> Self {
        Self::Upstream(UpstreamRequest::DriverStandings { season })
    }

    pub fn new_constructor_standings(season: i32) -> Self {
        Self::Upstream(UpstreamRequest::ConstructorStandings { season })
    }

    pub fn new_qualifying_results(season: i32, round: u32) -> Self {
        Self::Upstream(UpstreamRequest::QualifyingResults { season, round })
    }

    pub fn cache_duration(&self) -> Duration {
        match self {
            Self::Schedule { .. } => Duration::from_secs(HOUR_IN_S * 2),
            Self::Upstream(request) => request.cache_duration(),
        }
    }

    /// Returns the cached body, or fetches and caches it. The instant is the
    /// insertion time on a cache hit.
    pub async fn resolve(
        &self,
        cache: &Cache,
        upstream: &Upstream,
    ) -> anyhow::Result<(String, Option<Instant>)> {
        let season = match self {
            Self::Schedule { season } => *season,
            Self::Upstream(request) => return request.resolve(cache, upstream).await,
        };

        if let Some((age, v)) = cache.lookup(self) {
            trace!("Found {:?} in cache", self);
            return Ok((v, Some(age)));
        }

        let events = aggregate::schedule(cache, upstream, season, aggregate::now()).await?;
        let body = rocket::serde::json::to_string(&events)?;
        cache.insert(self.clone(), body.clone(), self.cache_duration());

        Ok((body, None))
    }

    pub async fn load<T: DeserializeOwned>(
        &self,
        cache: &Cache,
        upstream: &Upstream,
    ) -> anyhow::Result<(T, Option<Instant>)> {
        let (body, age) = self.resolve(cache, upstream).await?;
        Ok((rocket::serde::json::from_str(&body)?, age))
    }

    pub async fn run(self, cache: RequestCache, upstream: &Upstream, error_message: &str) -> ApiResponse {
        match self.resolve(&cache, upstream).await {
            Ok((body, age)) => ApiResponse::new_ok_from_string(body).cache_status(age),
            Err(e) => {
                error!("{:?}: {:#}", self, e);
                ApiResponse::new_internal_error(error_message, e)
            }
        }
    }
}

impl UpstreamRequest {
    pub fn cache_duration(&self) -> Duration {
        match self {
            Self::DriverStandings { .. } => Duration::from_secs(MINUTE_IN_S * 30),
            Self::ConstructorStandings { .. } => Duration::from_secs(MINUTE_IN_S * 30),
            Self::QualifyingResults { .. } => Duration::from_secs(HOUR_IN_S * 4),
            Self::RaceWinners { .. } => Duration::from_secs(HOUR_IN_S * 24),
        }
    }

    /// An empty answer may just not be published yet, so it is kept shorter.
    pub fn empty_duration(&self) -> Duration {
        match self {
            Self::QualifyingResults { .. } => Duration::from_secs(HOUR_IN_S),
            Self::RaceWinners { .. } => Duration::from_secs(HOUR_IN_S * 2),
            _ => self.cache_duration(),
        }
    }

    /// The empty body cached after a failed fetch and how long it is kept.
    /// `None` means the failure is reported to the client instead.
    pub fn failure_fallback(&self) -> Option<(&'static str, Duration)> {
        match self {
            Self::QualifyingResults { .. } => Some(("[]", Duration::from_secs(MINUTE_IN_S * 30))),
            Self::RaceWinners { .. } => Some(("{}", Duration::from_secs(HOUR_IN_S))),
            _ => None,
        }
    }

    /// Fetches from upstream, returning the JSON body and whether it is empty.
    async fn fetch(&self, upstream: &Upstream) -> anyhow::Result<(String, bool)> {
        let client = upstream.client().await;
        let (body, empty) = match self {
            Self::DriverStandings { season } => {
                let standings = client.get_driver_standings(*season).await?;
                (rocket::serde::json::to_string(&standings)?, standings.is_empty())
            }
            Self::ConstructorStandings { season } => {
                let standings = client.get_constructor_standings(*season).await?;
                (rocket::serde::json::to_string(&standings)?, standings.is_empty())
            }
            Self::QualifyingResults { season, round } => {
                let results = client.get_qualifying_results(*season, *round).await?;
                (rocket::serde::json::to_string(&results)?, results.is_empty())
            }
            Self::RaceWinners { season } => {
                let winners = client.get_race_winners(*season).await?;
                if !winners.is_empty() {
                    info!("Fetched {} race winners from {}", winners.len(), season);
                }
                (rocket::serde::json::to_string(&winners)?, winners.is_empty())
            }
        };

        Ok((body, empty))
    }

    pub async fn resolve(
        &self,
        cache: &Cache,
        upstream: &Upstream,
    ) -> anyhow::Result<(String, Option<Instant>)> {
        let key = CachedRequest::Upstream(self.clone());
        if let Some((age, v)) = cache.lookup(&key) {
            trace!("Found {:?} in cache", self);
            return Ok((v, Some(age)));
        }

        let (body, ttl) = match self.fetch(upstream).await {
            Ok((body, true)) => (body, self.empty_duration()),
            Ok((body, false)) => (body, self.cache_duration()),
            Err(e) => match self.failure_fallback() {
                Some((fallback, ttl)) => {
                    error!("{:?}: {:#}, answering {} for {}s", self, e, fallback, ttl.as_secs());
                    (fallback.to_string(), ttl)
                }
                None => return Err(e),
            },
        };
        cache.insert(key, body.clone(), ttl);

        Ok((body, None))
    }

    pub async fn load<T: DeserializeOwned>(
        &self,
        cache: &Cache,
        upstream: &Upstream,
    ) -> anyhow::Result<(T, Option<Instant>)> {
        let (body, age) = self.resolve(cache, upstream).await?;
        Ok((rocket::serde::json::from_str(&body)?, age))
    }
}

pub struct CacheEntry {
    pub timestamp: Instant,
    pub ttl: Duration,
    pub value: String,
}

impl CacheEntry {
    pub fn is_expired(&self) -> bool {
        self.timestamp.elapsed() >= self.ttl
    }
}

/// Shared between requests, every clone points at the same map.
#[derive(Clone, Default)]
pub struct Cache {
    cached: Arc<DashMap<CachedRequest, CacheEntry>>,
}

impl Cache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cached.len()
    }

    pub fn clean(&self) {
        self.cached.retain(|key, entry| {
            let valid = !entry.is_expired();
            if !valid {
                trace!(
                    "Removing {:?} from cache (age {}s, max {}s)",
                    key,
                    entry.timestamp.elapsed().as_secs(),
                    entry.ttl.as_secs()
                );
            }

            valid
        });
    }

    pub fn lookup(&self, query: &CachedRequest) -> Option<(Instant, String)> {
        let entry = self.cached.get(query)?;
        if entry.is_expired() {
            return None;
        }

        Some((entry.timestamp, entry.value.clone()))
    }

    pub fn insert(&self, query: CachedRequest, value: String, ttl: Duration) {
        trace!("Inserted {:?} into cache for {}s", query, ttl.as_secs());
        self.cached.insert(
            query,
            CacheEntry {
                timestamp: Instant::now(),
                ttl,
                value,
            },
        );
    }
}

pub struct RequestCache {
    cache: Cache,
}

#[async_trait]
impl<'r> FromRequest<'r> for RequestCache {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        request
            .guard::<&State<Cache>>()
            .await
            .map(|cache| RequestCache {
                cache: cache.inner().clone(),
            })
    }
}

impl Deref for RequestCache {
    type Target = Cache;

    fn deref(&self) -> &Self::Target {
        &self.cache
    }
}
