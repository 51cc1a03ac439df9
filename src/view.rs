//! View-state containers.
//!
//! A view owns its state and an [`EventQueue`]. Requests run as spawned tasks
//! and come back as typed events; `pump` applies what is ready and `settle`
//! waits for everything outstanding.

use std::future::Future;

use log::{debug, warn};
use tokio::sync::mpsc;

use crate::CHANNEL_BUFFER_DEFAULT;

pub mod analysis;
pub mod chart;
pub mod dashboard;
pub mod debounce;
pub mod market;
pub mod search;
pub mod training;

/// Monotonic request token; only the latest token is current.
#[derive(Clone, Copy, Debug, Default)]
pub struct RequestSeq(u64);

impl RequestSeq {
    pub fn advance(&mut self) -> u64 {
        self.0 += 1;
        self.0
    }

    pub fn current(&self) -> u64 {
        self.0
    }

    pub fn is_current(&self, token: u64) -> bool {
        self.0 == token
    }
}

/// A task that panics or is cancelled still reports back, as `None`, so the
/// pending counts always drain.
pub struct EventQueue<E> {
    sender: mpsc::Sender<(u64, Option<E>)>,
    receiver: mpsc::Receiver<(u64, Option<E>)>,
    pending: usize,
    current_pending: usize,
    seq: RequestSeq,
}

impl<E: Send + 'static> EventQueue<E> {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel::<(u64, Option<E>)>(CHANNEL_BUFFER_DEFAULT);

        Self {
            sender,
            receiver,
            pending: 0,
            current_pending: 0,
            seq: RequestSeq::default(),
        }
    }

    /// Runs `task` and queues its output under the current generation.
    pub fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = E> + Send + 'static,
    {
        let token = self.seq.current();
        let sender = self.sender.clone();
        self.pending += 1;
        self.current_pending += 1;

        tokio::spawn(async move {
            let event = match tokio::spawn(task).await {
                Ok(event) => Some(event),
                Err(err) => {
                    warn!("[View] Task #{token} failed: {err}");
                    None
                }
            };
            let _ = sender.send((token, event)).await;
        });
    }

    /// Outputs of tasks spawned before this call will be dropped.
    pub fn invalidate(&mut self) {
        self.seq.advance();
        self.current_pending = 0;
    }

    /// No task of any generation is outstanding.
    pub fn is_idle(&self) -> bool {
        self.pending == 0
    }

    /// A task of the current generation is outstanding.
    pub fn is_loading(&self) -> bool {
        self.current_pending > 0
    }

    pub fn try_next(&mut self) -> Option<E> {
        while let Ok((token, event)) = self.receiver.try_recv() {
            if let Some(event) = self.receive(token, event) {
                return Some(event);
            }
        }

        None
    }

    pub async fn next(&mut self) -> Option<E> {
        while self.pending > 0 {
            let (token, event) = self.receiver.recv().await?;
            if let Some(event) = self.receive(token, event) {
                return Some(event);
            }
        }

        None
    }

    fn receive(&mut self, token: u64, event: Option<E>) -> Option<E> {
        self.pending = self.pending.saturating_sub(1);

        if !self.seq.is_current(token) {
            debug!("[View] Dropped stale event #{token}");
            return None;
        }

        self.current_pending = self.current_pending.saturating_sub(1);
        event
    }
}

impl<E: Send + 'static> Default for EventQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Transient user-facing messages, drained by whoever renders the view.
#[derive(Clone, Debug, Default)]
pub struct Notices(Vec<String>);

impl Notices {
    pub fn push(&mut self, message: impl Into<String>) {
        self.0.push(message.into());
    }

    pub fn take(&mut self) -> Vec<String> {
        std::mem::take(&mut self.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}
