//! Runtime bridge - connects the sync TUI thread with the async Tokio runtime
//!
//! The controller never awaits anything. Fetch requests go over a command
//! channel to a worker thread that owns a Tokio runtime; results come back as
//! events carrying the ticket they were issued under.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tokio::runtime::Builder;
use tracing::error;

use crate::controller::{FetchOutcome, FetchRequest, Payload, RequestTicket};
use crate::domain::{DashboardSnapshot, TabSnapshot};
use crate::infrastructure::api::GarageApi;
use crate::infrastructure::runtime::worker::run_async_worker;

/// Commands sent from the TUI to the async worker
#[derive(Debug, Clone)]
pub enum RuntimeCommand {
    /// Run one backend query
    Fetch(FetchRequest),
    /// Shutdown the worker
    Shutdown,
}

/// Events sent from the async worker to the TUI
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    DashboardReady {
        ticket: RequestTicket,
        snapshot: DashboardSnapshot,
    },
    TabReady {
        ticket: RequestTicket,
        snapshot: TabSnapshot,
    },
    FetchFailed {
        ticket: RequestTicket,
        message: String,
    },
    /// Worker-level failure not tied to a request
    Error { message: String },
}

impl RuntimeEvent {
    /// Split a fetch result into what the controller consumes
    pub fn into_response(self) -> Option<(RequestTicket, FetchOutcome)> {
        match self {
            RuntimeEvent::DashboardReady { ticket, snapshot } => {
                Some((ticket, Ok(Payload::Dashboard(snapshot))))
            }
            RuntimeEvent::TabReady { ticket, snapshot } => {
                Some((ticket, Ok(Payload::Tab(snapshot))))
            }
            RuntimeEvent::FetchFailed { ticket, message } => Some((ticket, Err(message))),
            RuntimeEvent::Error { .. } => None,
        }
    }
}

/// Bridge between sync TUI thread and async Tokio runtime
pub struct RuntimeBridge {
    cmd_tx: Sender<RuntimeCommand>,
    evt_rx: Receiver<RuntimeEvent>,
}

impl RuntimeBridge {
    pub fn new(api: Arc<dyn GarageApi>, request_timeout: Duration) -> anyhow::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<RuntimeCommand>();
        let (evt_tx, evt_rx) = mpsc::channel::<RuntimeEvent>();

        let runtime = Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("garage-dash-io")
            .enable_all()
            .build()?;

        thread::Builder::new()
            .name("garage-dash-runtime".to_string())
            .spawn(move || {
                runtime.block_on(async {
                    if let Err(err) =
                        run_async_worker(api, request_timeout, cmd_rx, evt_tx.clone()).await
                    {
                        error!(error = %err, "runtime worker exited");
                        let _ = evt_tx.send(RuntimeEvent::Error {
                            message: format!("Worker exited: {:#}", err),
                        });
                    }
                });
            })?;

        Ok(Self { cmd_tx, evt_rx })
    }

    /// Send a command to the async worker
    pub fn send(&self, cmd: RuntimeCommand) -> anyhow::Result<()> {
        self.cmd_tx
            .send(cmd)
            .map_err(|_| anyhow::anyhow!("Worker channel closed"))
    }

    pub fn submit(&self, requests: Vec<FetchRequest>) -> anyhow::Result<()> {
        for request in requests {
            self.send(RuntimeCommand::Fetch(request))?;
        }
        Ok(())
    }

    /// Poll for events (non-blocking)
    pub fn poll_events(&self) -> Vec<RuntimeEvent> {
        let mut events = Vec::new();
        while let Ok(evt) = self.evt_rx.try_recv() {
            events.push(evt);
        }
        events
    }

    /// Wait up to `timeout` for one event
    pub fn recv_timeout(&self, timeout: Duration) -> Option<RuntimeEvent> {
        self.evt_rx.recv_timeout(timeout).ok()
    }
}

impl Drop for RuntimeBridge {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(RuntimeCommand::Shutdown);
    }
}
