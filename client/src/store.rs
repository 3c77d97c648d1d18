use std::collections::HashMap;

use crate::toggle::{RestaurantInfo, ToggleKey, ToggleState};

/// Bookkeeping for one toggle target.
///
/// `confirmed` is the last server-acknowledged state. `pending` is the
/// desired state of the in-flight request, non-null exactly while one is
/// outstanding; `in_flight` carries its sequence number so a settlement for a
/// superseded or evicted entry can be discarded. `intent` is the latest
/// user-desired state not yet dispatched; while a request is in flight it
/// holds the coalesced follow-up intent, if any.
#[derive(Clone, Debug, PartialEq)]
pub struct ToggleEntry {
    pub confirmed: ToggleState,
    pub pending: Option<ToggleState>,
    pub intent: Option<ToggleState>,
    pub in_flight: Option<u64>,
    pub restaurant: Option<RestaurantInfo>,
}

impl ToggleEntry {
    fn new(confirmed: ToggleState) -> Self {
        ToggleEntry {
            confirmed,
            pending: None,
            intent: None,
            in_flight: None,
            restaurant: None,
        }
    }

    /// The state the user currently sees: the newest undispatched intent,
    /// else the in-flight desired state, else the confirmed state.
    pub fn visible(&self) -> ToggleState {
        self.intent.or(self.pending).unwrap_or(self.confirmed)
    }
}

/// Last-known-confirmed toggle state per entity. Entries are created lazily on
/// first interaction (or by seeding from the server-rendered page) and can be
/// evicted once their rendering element leaves the page. Mutated only on the
/// UI thread, so no locking.
#[derive(Default)]
pub struct ToggleStore {
    entries: HashMap<ToggleKey, ToggleEntry>,
    last_seq: u64,
}

impl ToggleStore {
    pub fn new() -> Self {
        ToggleStore::default()
    }

    /// Issues the next request sequence number. The counter is store-wide, so
    /// a sequence from an evicted entry's lifecycle can never collide with one
    /// issued to the entry that replaced it.
    pub fn next_seq(&mut self) -> u64 {
        self.last_seq += 1;
        self.last_seq
    }

    pub fn entry(&mut self, key: &ToggleKey) -> &mut ToggleEntry {
        self.entries
            .entry(key.clone())
            .or_insert_with(|| ToggleEntry::new(ToggleState::initial_for(key.kind)))
    }

    pub fn get(&self, key: &ToggleKey) -> Option<&ToggleEntry> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &ToggleKey) -> Option<&mut ToggleEntry> {
        self.entries.get_mut(key)
    }

    /// Records the server-rendered initial state. Ignored while a request is
    /// in flight; the settlement of that request is more recent than the page.
    pub fn seed(&mut self, key: &ToggleKey, state: ToggleState) {
        let entry = self.entry(key);
        if entry.in_flight.is_none() {
            entry.confirmed = state;
        }
    }

    pub fn seed_restaurant(&mut self, key: &ToggleKey, info: RestaurantInfo) {
        self.entry(key).restaurant = Some(info);
    }

    pub fn evict(&mut self, key: &ToggleKey) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
