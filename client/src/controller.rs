use std::cell::RefCell;
use std::rc::Rc;

use futures_channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use futures_util::future::LocalBoxFuture;
use futures_util::stream::{FuturesUnordered, StreamExt};
use log::{debug, warn};

use crate::api_result::ToggleOutcome;
use crate::kinds;
use crate::render::RenderBinder;
use crate::store::ToggleStore;
use crate::toggle::{RestaurantInfo, ToggleKey, ToggleKind, ToggleState};
use crate::transport::{Transport, TransportError};

pub const TOGGLE_FAILED_NOTICE: &str = "操作失敗";

type Settlement = (ToggleKey, u64, Result<ToggleOutcome, TransportError>);

enum Event {
    Wake(ToggleKey),
    Settled(Settlement),
}

/// Clonable click-side handle. Records the user's intent, renders it
/// optimistically, and wakes the pump; it never issues requests itself, so
/// clicks landing in the same event-loop turn coalesce into one dispatch.
#[derive(Clone)]
pub struct ToggleHandle {
    store: Rc<RefCell<ToggleStore>>,
    binder: Rc<RefCell<dyn RenderBinder>>,
    wake_sender: UnboundedSender<ToggleKey>,
}

impl ToggleHandle {
    /// Registers a toggle intent for `(kind, id)`.
    ///
    /// Coalescing policy is replace-pending: while a request is in flight for
    /// the same key, the stored intent is overwritten with the latest desired
    /// state and fires once, when the in-flight request settles.
    pub fn request_toggle(&self, kind: ToggleKind, id: &str, desired: ToggleState) {
        if id.is_empty() {
            warn!("ignoring toggle intent with empty id");
            return;
        }
        let key = ToggleKey::new(kind, id);
        self.store.borrow_mut().entry(&key).intent = Some(desired);
        self.binder.borrow_mut().render(&key, desired);
        let _ = self.wake_sender.unbounded_send(key);
    }

    /// Convenience for boolean kinds: toggles away from whatever the user
    /// currently sees. Reaction toggles need an explicit desired state.
    pub fn click(&self, kind: ToggleKind, id: &str) {
        if kind == ToggleKind::Reaction {
            warn!("reaction toggles need an explicit desired state");
            return;
        }
        if id.is_empty() {
            warn!("ignoring toggle intent with empty id");
            return;
        }
        let key = ToggleKey::new(kind, id);
        let desired = self.store.borrow_mut().entry(&key).visible().flipped();
        self.request_toggle(kind, id, desired);
    }

    /// Records the server-rendered initial state for a toggle element.
    pub fn seed(&self, kind: ToggleKind, id: &str, state: ToggleState) {
        self.store
            .borrow_mut()
            .seed(&ToggleKey::new(kind, id), state);
    }

    /// Attaches the denormalized restaurant fields the favorite-restaurant
    /// endpoint wants in its body. Keyed by place id.
    pub fn seed_restaurant(&self, info: RestaurantInfo) {
        let key = ToggleKey::new(ToggleKind::RestaurantFavorite, info.place_id.clone());
        self.store.borrow_mut().seed_restaurant(&key, info);
    }

    /// Drops the entry for an element that left the page. A settlement that
    /// arrives afterwards is discarded.
    pub fn evict(&self, kind: ToggleKind, id: &str) -> bool {
        self.store.borrow_mut().evict(&ToggleKey::new(kind, id))
    }

    /// Last server-confirmed state, if the entry exists.
    pub fn confirmed(&self, kind: ToggleKind, id: &str) -> Option<ToggleState> {
        self.store
            .borrow()
            .get(&ToggleKey::new(kind, id))
            .map(|entry| entry.confirmed)
    }
}

/// The optimistic toggle controller: one pump that owns dispatch and
/// settlement for every toggle on the page.
///
/// Per `(kind, id)` requests are strictly serialized — never more than one
/// outstanding — while requests for different ids proceed concurrently; the
/// pump never awaits a response inline. All state lives behind `Rc<RefCell>`
/// and is touched only from the UI thread.
pub struct ToggleClient<T: Transport> {
    handle: ToggleHandle,
    transport: T,
    wake_receiver: UnboundedReceiver<ToggleKey>,
    in_flight: FuturesUnordered<LocalBoxFuture<'static, Settlement>>,
}

impl<T: Transport> ToggleClient<T> {
    pub fn new(transport: T, binder: Rc<RefCell<dyn RenderBinder>>) -> Self {
        let (wake_sender, wake_receiver) = unbounded();
        ToggleClient {
            handle: ToggleHandle {
                store: Rc::new(RefCell::new(ToggleStore::new())),
                binder,
                wake_sender,
            },
            transport,
            wake_receiver,
            in_flight: FuturesUnordered::new(),
        }
    }

    pub fn handle(&self) -> ToggleHandle {
        self.handle.clone()
    }

    pub fn in_flight_requests(&self) -> usize {
        self.in_flight.len()
    }

    /// Processes one event: either a batch of wakes (all clicks that landed
    /// since the pump last ran, coalesced per key) or one settled request.
    pub async fn advance_once(&mut self) {
        let event = futures_util::select! {
            key = self.wake_receiver.select_next_some() => Event::Wake(key),
            settled = self.in_flight.select_next_some() => Event::Settled(settled),
        };

        match event {
            Event::Wake(key) => {
                let mut keys = vec![key];
                while let Ok(Some(more)) = self.wake_receiver.try_next() {
                    keys.push(more);
                }
                keys.sort();
                keys.dedup();
                for key in keys {
                    self.dispatch(key);
                }
            }
            Event::Settled((key, seq, result)) => self.settle(key, seq, result),
        }
    }

    pub async fn run(&mut self) {
        loop {
            self.advance_once().await;
        }
    }

    /// Sends the latest intent for `key`, unless a request is already in
    /// flight (the settlement redispatches) or the intent was already taken.
    fn dispatch(&mut self, key: ToggleKey) {
        let (request, desired, seq) = {
            let mut store = self.handle.store.borrow_mut();
            if store
                .get(&key)
                .map_or(false, |entry| entry.in_flight.is_some())
            {
                return;
            }
            let seq = store.next_seq();
            let entry = store.entry(&key);
            let desired = match entry.intent.take() {
                Some(desired) => desired,
                None => return,
            };
            entry.in_flight = Some(seq);
            entry.pending = Some(desired);
            (kinds::request_for(&key, desired, entry), desired, seq)
        };

        debug!("dispatch {:?} seq {} -> {}", key, seq, request.path);
        let response = self.transport.send(request);
        let kind = key.kind;
        let settled_key = key;
        self.in_flight.push(Box::pin(async move {
            let result = match response.await {
                Ok(body) => kinds::parse_reply(kind, desired, &body),
                Err(err) => Err(err),
            };
            (settled_key, seq, result)
        }));
    }

    fn settle(&mut self, key: ToggleKey, seq: u64, result: Result<ToggleOutcome, TransportError>) {
        enum Next {
            Redispatch,
            Render(ToggleOutcome),
            Rollback(ToggleState),
            Drop,
        }

        let next = {
            let mut store = self.handle.store.borrow_mut();
            match store.get_mut(&key) {
                None => {
                    debug!("settlement for evicted entry {:?} discarded", key);
                    Next::Drop
                }
                Some(entry) if entry.in_flight != Some(seq) => {
                    debug!("stale settlement for {:?} seq {} discarded", key, seq);
                    Next::Drop
                }
                Some(entry) => {
                    entry.in_flight = None;
                    entry.pending = None;
                    match result {
                        Ok(outcome) => {
                            entry.confirmed = outcome.state;
                            if entry.intent.is_some() {
                                // the queued intent is already on screen; skip
                                // the intermediate confirmed render
                                Next::Redispatch
                            } else {
                                Next::Render(outcome)
                            }
                        }
                        Err(err) => {
                            warn!("toggle {:?} failed: {}", key, err);
                            entry.intent = None;
                            Next::Rollback(entry.confirmed)
                        }
                    }
                }
            }
        };

        match next {
            Next::Redispatch => self.dispatch(key),
            Next::Render(outcome) => {
                let mut binder = self.handle.binder.borrow_mut();
                binder.render(&key, outcome.state);
                if let (Some(counts), Some(total)) =
                    (&outcome.reaction_counts, outcome.total_reactions)
                {
                    binder.render_counts(&key, counts, total);
                }
            }
            Next::Rollback(confirmed) => {
                let mut binder = self.handle.binder.borrow_mut();
                binder.render(&key, confirmed);
                binder.notify(TOGGLE_FAILED_NOTICE);
            }
            Next::Drop => {}
        }
    }
}
