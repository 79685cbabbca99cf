pub mod circuits;
pub mod common;
pub mod ergast;
pub mod qualifying_results;
pub mod race_winners;
pub mod schedule;
pub mod standings;
