pub mod lap_time;
