use crate::aggregate::{self, Upstream};
use crate::cache::{CachedRequest, RequestCache};
use crate::util::{current_season, ApiResponse};
use f1_stats_api::models::{circuits, schedule};
use f1_stats_api::F1Event;
use rocket::State;

const SCHEDULE_ERROR: &str = "Failed to fetch F1 schedule data";

#[get("/schedule?<season>")]
pub async fn get_schedule(season: Option<i32>, cache: RequestCache, upstream: &State<Upstream>) -> ApiResponse {
    let req = CachedRequest::new_schedule(season.unwrap_or_else(current_season));
    req.run(cache, upstream, SCHEDULE_ERROR)
        .await
        .add_header("Cache-Control", "public, s-maxage=7200, stale-while-revalidate=3600")
}

#[get("/schedule/next?<season>")]
pub async fn get_next_event(season: Option<i32>, cache: RequestCache, upstream: &State<Upstream>) -> ApiResponse {
    let req = CachedRequest::new_schedule(season.unwrap_or_else(current_season));
    let (events, age): (Vec<F1Event>, _) = match req.load(&cache, upstream).await {
        Ok(v) => v,
        Err(e) => {
            log::error!("Error loading schedule for next event: {:#}", e);
            return ApiResponse::new_internal_error(SCHEDULE_ERROR, e);
        }
    };

    match schedule::next_event(&events, aggregate::now()) {
        Some(next) => ApiResponse::new_ok(&next).cache_status(age),
        None => ApiResponse::new_not_found("No upcoming event this season"),
    }
}

#[get("/standings/drivers?<season>")]
pub async fn get_driver_standings(season: Option<i32>, cache: RequestCache, upstream: &State<Upstream>) -> ApiResponse {
    let req = CachedRequest::new_driver_standings(season.unwrap_or_else(current_season));
    req.run(cache, upstream, "Failed to fetch driver standings data").await
}

#[get("/standings/constructors?<season>")]
pub async fn get_constructor_standings(season: Option<i32>, cache: RequestCache, upstream: &State<Upstream>) -> ApiResponse {
    let req = CachedRequest::new_constructor_standings(season.unwrap_or_else(current_season));
    req.run(cache, upstream, "Failed to fetch constructor standings data")
        .await
        .add_header("Cache-Control", "public, s-maxage=1800, stale-while-revalidate=900")
}

/// Upstream failures answer an empty list, cached for a while.
#[get("/qualifying/<season>/<round>")]
pub async fn get_qualifying_results(season: i32, round: u32, cache: RequestCache, upstream: &State<Upstream>) -> ApiResponse {
    let req = CachedRequest::new_qualifying_results(season, round);
    req.run(cache, upstream, "Failed to fetch qualifying data").await
}

/// A known `id` gives that circuit, anything else the whole catalog.
#[get("/circuits?<id>")]
pub async fn get_circuits(id: Option<String>, cache: RequestCache, upstream: &State<Upstream>) -> ApiResponse {
    let (winners, age) = aggregate::race_winners(&cache, upstream, current_season() - 1).await;

    let res = match id.as_deref().and_then(|id| circuits::visualize(id, &winners)) {
        Some(circuit) => ApiResponse::new_ok(&circuit),
        None => ApiResponse::new_ok(&circuits::visualize_all(&winners)),
    };

    res.cache_status(age).add_header("Cache-Control", "public, s-maxage=86400")
}
