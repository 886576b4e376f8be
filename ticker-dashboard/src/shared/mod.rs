/// Shared modules for the ticker dashboard
pub mod calc;
pub mod config;
pub mod dates;
pub mod error;
pub mod poller;
pub mod source;
pub mod state;
pub mod types;
