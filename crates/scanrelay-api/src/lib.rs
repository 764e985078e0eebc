pub mod config;
pub mod ledger;
pub mod middleware;
pub mod sheets;
pub mod state;
pub mod webhook;
