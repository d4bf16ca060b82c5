//! Progress reporting to the hosting application
//!
//! The executor emits one event before and one after every action; the
//! transport that forwards them to a human is the caller's concern.

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::info;

use webpilot_core_types::{ActionStatus, FailureKind};

/// One progress update
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    ActionStarted {
        index: usize,
        kind: &'static str,
    },

    ActionFinished {
        index: usize,
        kind: &'static str,
        status: ActionStatus,
        latency_ms: u64,

        #[serde(skip_serializing_if = "Option::is_none")]
        failure: Option<FailureKind>,
    },

    /// Emitted once per run; `stopped_early` marks early termination
    RunFinished {
        executed: usize,
        total: usize,
        stopped_early: bool,
    },
}

/// Event consumer
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: ProgressEvent);
}

/// Default sink: structured log lines
#[derive(Debug, Default)]
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn emit(&self, event: ProgressEvent) {
        match &event {
            ProgressEvent::ActionStarted { index, kind } => {
                info!(index, kind, "action started");
            }
            ProgressEvent::ActionFinished {
                index,
                kind,
                status,
                latency_ms,
                ..
            } => {
                info!(index, kind, ?status, latency_ms, "action finished");
            }
            ProgressEvent::RunFinished {
                executed,
                total,
                stopped_early,
            } => {
                info!(executed, total, stopped_early, "run finished");
            }
        }
    }
}

/// Channel sink for embedding in a host that streams progress elsewhere
#[derive(Debug)]
pub struct ChannelSink {
    sender: mpsc::UnboundedSender<ProgressEvent>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl ProgressSink for ChannelSink {
    fn emit(&self, event: ProgressEvent) {
        // A detached receiver just means nobody is listening anymore.
        let _ = self.sender.send(event);
    }
}
