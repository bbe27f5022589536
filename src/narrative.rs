//! Delivery flavor text
//!
//! The narrative service is the one asynchronous collaborator: a delivery
//! queues a [`NarrativeRequest`], a worker thread calls the service, and the
//! host polls the resulting [`NarrativeReply`] on a later frame. Replies carry
//! the [`Ticket`] they were issued under so a reset session can drop them.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use serde::{Deserialize, Serialize};

/// Shown whenever the service fails or returns nothing
pub const FALLBACK_TEXT: &str =
    "The harbormaster signs your manifest without a word and waves you back out to sea.";

/// Event name sent for island deliveries
pub const DELIVERY_EVENT: &str = "island_delivery";

#[derive(Debug, thiserror::Error)]
pub enum NarrativeError {
    #[error("narrative service unavailable: {0}")]
    Unavailable(String),
    #[error("narrative service returned no text")]
    Empty,
    #[error("failed to start narrative worker: {0}")]
    Worker(#[from] std::io::Error),
}

/// External flavor-text generator
pub trait NarrativeService: Send + 'static {
    fn fetch_event(&self, event_name: &str, context: &str) -> Result<String, NarrativeError>;
}

/// Service that never answers; every delivery gets the fallback text
#[derive(Debug, Clone, Copy, Default)]
pub struct Offline;

impl NarrativeService for Offline {
    fn fetch_event(&self, _event_name: &str, _context: &str) -> Result<String, NarrativeError> {
        Err(NarrativeError::Unavailable("offline".to_string()))
    }
}

/// Identifies one fetch within one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ticket {
    pub session: u32,
    pub seq: u32,
}

#[derive(Debug, Clone)]
pub struct NarrativeRequest {
    pub ticket: Ticket,
    pub event_name: String,
    pub context: String,
}

#[derive(Debug)]
pub struct NarrativeReply {
    pub ticket: Ticket,
    pub result: Result<String, NarrativeError>,
}

impl NarrativeReply {
    /// Text to display, substituting the fallback on failure or empty output
    pub fn into_text(self) -> String {
        match self.result {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                log::warn!("Narrative {:?}: {}", self.ticket, NarrativeError::Empty);
                FALLBACK_TEXT.to_string()
            }
            Err(err) => {
                log::warn!("Narrative {:?} failed: {err}", self.ticket);
                FALLBACK_TEXT.to_string()
            }
        }
    }
}

/// Request/reply channel pair backed by a worker thread
pub struct Narrator {
    requests: Sender<NarrativeRequest>,
    replies: Receiver<NarrativeReply>,
}

impl Narrator {
    /// Start a worker thread serving `service`.
    ///
    /// The worker exits once the `Narrator` is dropped.
    pub fn spawn(service: impl NarrativeService) -> Result<Self, NarrativeError> {
        let (request_tx, request_rx) = mpsc::channel::<NarrativeRequest>();
        let (reply_tx, reply_rx) = mpsc::channel::<NarrativeReply>();

        thread::Builder::new()
            .name("narrative".to_string())
            .spawn(move || {
                while let Ok(request) = request_rx.recv() {
                    // A panicking service still owes the pending ticket a reply
                    let result = panic::catch_unwind(AssertUnwindSafe(|| {
                        service.fetch_event(&request.event_name, &request.context)
                    }))
                    .unwrap_or_else(|_| {
                        Err(NarrativeError::Unavailable(
                            "narrative service panicked".to_string(),
                        ))
                    });
                    let reply = NarrativeReply {
                        ticket: request.ticket,
                        result,
                    };
                    if reply_tx.send(reply).is_err() {
                        break;
                    }
                }
            })?;

        Ok(Self {
            requests: request_tx,
            replies: reply_rx,
        })
    }

    /// Hand a request to the worker.
    ///
    /// On failure the request comes back so the caller can resolve it locally.
    pub fn submit(&self, request: NarrativeRequest) -> Result<(), NarrativeRequest> {
        self.requests.send(request).map_err(|err| err.0)
    }

    /// Non-blocking drain of finished fetches
    pub fn poll(&self) -> Vec<NarrativeReply> {
        self.replies.try_iter().collect()
    }
}
