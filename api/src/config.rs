use f1_stats_api::DEFAULT_BASE_URL;
use leaky_bucket::RateLimiter;
use serde::Deserialize;
use std::time::Duration;

/// Settings read from `Rocket.toml` / `ROCKET_*` next to Rocket's own.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub upstream_url: String,
    pub ratelimit_refill_interval_ms: u64,
    pub ratelimit_max: usize,
    pub cache_clean_interval_s: u64,
    /// Pause after every n-th round while building a schedule, 0 disables it
    pub round_delay_every: u32,
    pub round_delay_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            upstream_url: DEFAULT_BASE_URL.to_string(),
            ratelimit_refill_interval_ms: 250,
            ratelimit_max: 4,
            cache_clean_interval_s: 600,
            round_delay_every: 5,
            round_delay_ms: 100,
        }
    }
}

impl AppConfig {
    pub fn ratelimiter(&self) -> RateLimiter {
        let max = self.ratelimit_max.max(1);

        RateLimiter::builder()
            .initial(max)
            .refill(1)
            .interval(Duration::from_millis(self.ratelimit_refill_interval_ms.max(1)))
            .max(max)
            .build()
    }

    pub fn round_delay(&self) -> Duration {
        Duration::from_millis(self.round_delay_ms)
    }

    pub fn cache_clean_interval(&self) -> Duration {
        Duration::from_secs(self.cache_clean_interval_s.max(1))
    }
}
