mod aggregate;
mod cache;
mod config;
mod route;
mod util;


#[macro_use]
extern crate rocket;

use crate::aggregate::Upstream;
use crate::cache::Cache;
use crate::config::AppConfig;
use log::{info, trace};
use rocket::figment::Figment;
use rocket::{tokio, Build, Rocket};
use std::sync::mpsc::sync_channel;
use std::time::Duration;

pub fn build(figment: Figment, config: &AppConfig, cache: Cache) -> Rocket<Build> {
    rocket::custom(figment)
        .mount(
            "/api/f1",
            routes![
                route::get_schedule,
                route::get_next_event,
                route::get_driver_standings,
                route::get_constructor_standings,
                route::get_qualifying_results,
                route::get_circuits,
            ],
        )
        .manage(cache)
        .manage(Upstream::new(config))
}

#[rocket::main]
async fn main() -> Result<(), rocket::Error> {
    let figment = rocket::Config::figment();
    let config: AppConfig = match figment.extract() {
        Ok(v) => v,
        Err(e) => {
            println!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    println!("Using upstream API at {}", config.upstream_url);

    tokio::spawn(async {
        let (req_tx, req_rx) = sync_channel::<(usize, f1_stats_api::Request)>(1000);
        let (sta_tx, sta_rx) = sync_channel::<(usize, f1_stats_api::StatusCode)>(1000);

        f1_stats_api::set_request_callback(req_tx, sta_tx);

        loop {
            tokio::time::sleep(Duration::from_millis(50)).await;

            for i in req_rx.try_iter() {
                info!("REQUEST {} --> {}", i.0, i.1.url());
            }

            for i in sta_rx.try_iter() {
                info!("REQUEST {} --> STATUS {}", i.0, i.1);
            }
        }
    });

    let cache = Cache::new();

    let cache_copy = cache.clone();
    let clean_interval = config.cache_clean_interval();
    tokio::spawn(async move {
        let cache = cache_copy;
        loop {
            tokio::time::sleep(clean_interval).await;

            trace!("Starting cache clean");
            cache.clean();
            trace!("Finished cache clean, {} entries left", cache.len());
        }
    });

    let _ = build(figment, &config, cache).launch().await?;

    Ok(())
}
