pub mod calendar;
pub mod config;
pub mod filter;
pub mod fixtures;
pub mod http_cache;
pub mod http_client;
pub mod navigator;
pub mod outcome;
pub mod predictions_fetch;
pub mod provider;
pub mod state;
