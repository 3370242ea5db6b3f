//! Async worker - runs in the Tokio runtime and executes backend queries

use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::time::{interval, timeout};
use tracing::{debug, info, warn};

use crate::controller::{FetchRequest, Payload};
use crate::infrastructure::api::{execute, ApiError, GarageApi};
use crate::infrastructure::runtime::bridge::{RuntimeCommand, RuntimeEvent};

/// Run the async worker loop until shutdown or until the TUI side hangs up
pub async fn run_async_worker(
    api: Arc<dyn GarageApi>,
    request_timeout: Duration,
    cmd_rx: Receiver<RuntimeCommand>,
    evt_tx: Sender<RuntimeEvent>,
) -> Result<()> {
    info!(backend = %api.describe(), "runtime worker started");

    // Command channel is std mpsc; poll it without blocking the runtime
    let mut poll = interval(Duration::from_millis(20));

    loop {
        loop {
            match cmd_rx.try_recv() {
                Ok(RuntimeCommand::Shutdown) => {
                    info!("runtime worker shutting down");
                    return Ok(());
                }
                Ok(RuntimeCommand::Fetch(request)) => {
                    let api = Arc::clone(&api);
                    let evt_tx = evt_tx.clone();
                    tokio::spawn(async move {
                        let event = run_fetch(api.as_ref(), request, request_timeout).await;
                        let _ = evt_tx.send(event);
                    });
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return Ok(()),
            }
        }
        poll.tick().await;
    }
}

/// Execute one request and wrap the result with its ticket
pub async fn run_fetch(
    api: &dyn GarageApi,
    request: FetchRequest,
    request_timeout: Duration,
) -> RuntimeEvent {
    let FetchRequest { ticket, query, .. } = request;
    debug!(seq = ticket.seq, tab = %ticket.tab, "fetch started");

    let result = match timeout(request_timeout, execute(api, &query)).await {
        Ok(result) => result,
        Err(_) => Err(ApiError::Timeout(request_timeout.as_secs())),
    };

    match result {
        Ok(Payload::Dashboard(snapshot)) => RuntimeEvent::DashboardReady { ticket, snapshot },
        Ok(Payload::Tab(snapshot)) => RuntimeEvent::TabReady { ticket, snapshot },
        Err(err) => {
            warn!(seq = ticket.seq, tab = %ticket.tab, error = %err, "fetch failed");
            RuntimeEvent::FetchFailed {
                ticket,
                message: err.to_string(),
            }
        }
    }
}
