pub mod config;
pub mod poll_interval;
