use f1_stats_api::models::{qualifying_results, race_winners, schedule};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::collections::HashMap;

const SCHEDULE_2024_JSON: &'static str = include_str!("../test-data/schedule_2024.json");

const WINNERS_2023_JSON: &'static str = include_str!("../test-data/winners_2023.json");

const QUALIFYING_2024_1_JSON: &'static str = include_str!("../test-data/qualifying_2024_1.json");

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("schedule::parse (3 races)", |b| {
        b.iter(|| schedule::parse(black_box(SCHEDULE_2024_JSON)))
    });

    c.bench_function("race_winners::parse", |b| {
        b.iter(|| race_winners::parse(black_box(WINNERS_2023_JSON)))
    });

    let winners = race_winners::parse(WINNERS_2023_JSON).unwrap();
    let mut qualifying = HashMap::new();
    qualifying.insert(1, qualifying_results::parse(QUALIFYING_2024_1_JSON).unwrap());

    c.bench_function("schedule::build_events (3 races)", |b| {
        b.iter(|| {
            let races = schedule::parse(SCHEDULE_2024_JSON).unwrap();
            schedule::build_events(2024, races, &winners, &qualifying)
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
