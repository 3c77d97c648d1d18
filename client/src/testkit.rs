//! Test doubles for exercising the controller without a browser or a server.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use futures_channel::oneshot;
use futures_util::future::LocalBoxFuture;

use crate::render::RenderBinder;
use crate::toggle::{ReactionCounts, ToggleKey, ToggleState};
use crate::transport::{ToggleRequest, Transport, TransportError};

/// Binder that records calls instead of touching a UI. Mutation counting
/// mirrors an idempotent DOM binder: re-rendering the state a key already
/// shows is not a mutation.
#[derive(Default)]
pub struct RecordingBinder {
    last: HashMap<ToggleKey, ToggleState>,
    pub renders: usize,
    pub mutations: Vec<(ToggleKey, ToggleState)>,
    pub counts: Vec<(ToggleKey, ReactionCounts, u64)>,
    pub notices: Vec<String>,
}

impl RecordingBinder {
    pub fn shown(&self, key: &ToggleKey) -> Option<ToggleState> {
        self.last.get(key).copied()
    }
}

impl RenderBinder for RecordingBinder {
    fn render(&mut self, key: &ToggleKey, state: ToggleState) {
        self.renders += 1;
        if self.last.get(key) == Some(&state) {
            return;
        }
        self.last.insert(key.clone(), state);
        self.mutations.push((key.clone(), state));
    }

    fn render_counts(&mut self, key: &ToggleKey, counts: &ReactionCounts, total: u64) {
        self.counts.push((key.clone(), counts.clone(), total));
    }

    fn notify(&mut self, message: &str) {
        self.notices.push(message.to_owned());
    }
}

/// Transport whose replies the test resolves by hand, so requests stay
/// observably in flight for as long as the test wants.
#[derive(Clone, Default)]
pub struct ManualTransport {
    pending: Rc<RefCell<Vec<(ToggleRequest, oneshot::Sender<Result<String, TransportError>>)>>>,
    sent: Rc<RefCell<Vec<ToggleRequest>>>,
}

impl ManualTransport {
    pub fn new() -> Self {
        ManualTransport::default()
    }

    /// Requests dispatched so far, in order.
    pub fn sent(&self) -> Vec<ToggleRequest> {
        self.sent.borrow().clone()
    }

    /// Number of requests currently awaiting a reply.
    pub fn in_flight(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Resolves the oldest outstanding request.
    pub fn resolve_next(&self, reply: Result<&str, TransportError>) {
        let (_request, sender) = self.pending.borrow_mut().remove(0);
        let _ = sender.send(reply.map(str::to_owned));
    }
}

impl Transport for ManualTransport {
    fn send(&self, request: ToggleRequest) -> LocalBoxFuture<'static, Result<String, TransportError>> {
        let (sender, receiver) = oneshot::channel();
        self.sent.borrow_mut().push(request.clone());
        self.pending.borrow_mut().push((request, sender));
        Box::pin(async move {
            receiver
                .await
                .unwrap_or_else(|_canceled| Err(TransportError::Network("transport dropped".into())))
        })
    }
}
