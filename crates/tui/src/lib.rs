//! Terminal client for a personal budget tracker.
//!
//! Mirrors a remote transaction collection in memory, renders the latest
//! entries with a running balance, and reconciles create/update/delete
//! responses into local state.

pub mod app;
pub mod balance;
pub mod categories;
pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod form;
pub mod logging;
pub mod store;
pub mod ui;
pub mod view;
