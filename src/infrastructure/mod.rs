//! Infrastructure layer - External service integrations
//!
//! This layer contains:
//! - the `GarageApi` seam with HTTP and demo backends
//! - Tokio runtime bridge for async fetches

pub mod api;
pub mod runtime;

pub use api::{DemoGarageApi, GarageApi, HttpGarageApi};
pub use runtime::{RuntimeBridge, RuntimeEvent};
