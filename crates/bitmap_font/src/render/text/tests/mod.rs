//! End-to-end text scenarios over the fixture fonts

pub mod fixtures;

mod cache_scenarios;
