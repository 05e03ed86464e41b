//! Sleep status reports dashboard.
//!
//! An in-memory report store, a keyed query cache in front of it, and a
//! terminal UI that adds reports and watches the cached list refresh.

pub mod app;
pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod logging;
pub mod query;
pub mod reports;
pub mod ui;
