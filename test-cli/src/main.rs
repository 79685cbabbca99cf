use f1_stats_api::chrono::{Datelike, Utc};
use f1_stats_api::models::schedule;
use f1_stats_api::ErgastClient;
use log::error;
use std::collections::HashMap;
use std::sync::mpsc::{sync_channel, Receiver};
use tokio;

#[tokio::main]
async fn main() {
    pretty_env_logger::init();
    let (req_tx, req_rx) = sync_channel::<(usize, f1_stats_api::Request)>(1000);
    let (sta_tx, sta_rx) = sync_channel::<(usize, f1_stats_api::StatusCode)>(1000);

    f1_stats_api::set_request_callback(req_tx, sta_tx);

    // first argument picks the season, second the upstream
    let mut args = std::env::args().skip(1);
    let season = args
        .next()
        .and_then(|v| v.parse().ok())
        .unwrap_or_else(|| Utc::now().year());
    let client = match args.next() {
        Some(url) => ErgastClient::new(url),
        None => ErgastClient::default(),
    };

    println!("Season {} from {}", season, client.base_url());

    let races = match client.get_season_races(season).await {
        Ok(v) => v,
        Err(e) => {
            error!("Failed to fetch the {} season: {:#}", season, e);
            print_channel_updates(&req_rx, &sta_rx);
            return;
        }
    };

    let winners = client.get_race_winners(season - 1).await.unwrap_or_default();
    let mut events = schedule::build_events(season, races, &winners, &HashMap::new());
    schedule::mark_next_event(&mut events, Utc::now());

    for event in events.iter() {
        println!(
            "{}{:<24} {:<48} {}",
            if event.is_next { "> " } else { "  " },
            event.id,
            event.name,
            event.utc_date_time
        );
    }

    if let Some(next) = schedule::next_event(&events, Utc::now()) {
        println!("Next: {} in {}h", next.event.name, next.seconds_until / 3600);
    }

    match client.get_driver_standings(season).await {
        Ok(standings) => {
            for i in standings.iter().take(5) {
                println!("P{} {} ({}) {}pts", i.position, i.driver.full_name(), i.constructor.name, i.points);
            }
        }
        Err(e) => error!("Failed to fetch driver standings: {:#}", e),
    }

    print_channel_updates(&req_rx, &sta_rx);
}

fn print_channel_updates(
    req_rx: &Receiver<(usize, f1_stats_api::Request)>,
    sta_rx: &Receiver<(usize, f1_stats_api::StatusCode)>,
) {
    for i in req_rx.try_iter() {
        println!("REQUEST {} --> {}", i.0, i.1.url().to_string());
    }

    for i in sta_rx.try_iter() {
        println!("REQUEST {} --> STATUS {}", i.0, i.1);
    }
}
