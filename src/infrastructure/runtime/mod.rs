//! Runtime infrastructure - Tokio runtime bridge for backend fetches

mod bridge;
mod worker;

pub use bridge::{RuntimeBridge, RuntimeCommand, RuntimeEvent};
pub use worker::{run_async_worker, run_fetch};
