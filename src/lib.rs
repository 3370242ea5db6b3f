//! Terminal dashboard for a garage workshop backend.
//!
//! The [`controller::DashboardController`] owns tab, filter and refresh
//! state and never performs I/O; [`infrastructure::RuntimeBridge`] runs its
//! fetch requests on a tokio runtime and hands results back.

pub mod app;
pub mod config;
pub mod controller;
pub mod core;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod view;
