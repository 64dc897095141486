//! Terminal to-do list: a persisted task list with filters, inline editing,
//! confirmed deletes, and a light/dark/auto theme.

pub mod app;
pub mod config;
pub mod kv;
pub mod logging;
pub mod store;
pub mod tui;
