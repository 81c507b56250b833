//! Published event descriptions.
//!
//! Instrumented code publishes the descriptions it may fire so tracers can
//! find and enable them without having seen them fire first.

use crate::prelude::*;
use crate::state::state;
use side_types::EventDescription;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

pub(crate) struct EventsEntry {
    id: u64,
    events: &'static [&'static EventDescription],
}

impl EventsEntry {
    pub fn events(&self) -> &'static [&'static EventDescription] {
        self.events
    }
}

static EVENTS: Mutex<Vec<EventsEntry>> = Mutex::new(Vec::new());
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Proof of publication, consumed by [`unregister_events`].
#[must_use = "dropping the handle leaves the events published forever"]
#[derive(Debug, PartialEq, Eq)]
pub struct EventsHandle {
    id: u64,
}

/// Locks the published batches. Taken before the tracer registry lock.
pub(crate) fn lock() -> MutexGuard<'static, Vec<EventsEntry>> {
    EVENTS.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Publishes a batch of descriptions and notifies the registered tracers.
pub fn register_events(events: &'static [&'static EventDescription]) -> EventsHandle {
    let mut published = lock();
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    published.push(EventsEntry { id, events });
    debug!("Published event batch {id} ({} events)", events.len());

    let tracers = state().tracers.read();
    for tracer in tracers.iter() {
        tracer.events_registered(events);
    }

    EventsHandle { id }
}

/// Withdraws a batch published by [`register_events`] and notifies the
/// registered tracers.
pub fn unregister_events(handle: EventsHandle) {
    let mut published = lock();
    let Some(position) = published.iter().position(|entry| entry.id == handle.id) else {
        warn!("Event batch {} is not published", handle.id);
        return;
    };
    let entry = published.remove(position);
    debug!(
        "Withdrew event batch {} ({} events)",
        entry.id,
        entry.events.len()
    );

    let tracers = state().tracers.read();
    for tracer in tracers.iter() {
        tracer.events_unregistered(entry.events);
    }
}

/// Calls `f` on every published description, in publication order.
///
/// The registry is not locked while `f` runs.
pub fn for_each_event<F>(f: F)
where
    F: FnMut(&'static EventDescription),
{
    let batches: Vec<_> = lock().iter().map(EventsEntry::events).collect();
    batches
        .into_iter()
        .flat_map(|events| events.iter().copied())
        .for_each(f);
}

/// Enables every published event of `provider`. Returns how many were enabled.
pub fn enable_provider(provider: &str) -> usize {
    let mut count = 0;
    for_each_event(|desc| {
        if desc.provider_name() == provider && desc.enable() {
            count += 1;
        }
    });
    debug!("Enabled {count} event(s) of provider {provider}");
    count
}

/// Reverts one [`enable_provider`]. Returns how many events were disabled;
/// events that were not enabled are left alone.
pub fn disable_provider(provider: &str) -> usize {
    let mut count = 0;
    for_each_event(|desc| {
        if desc.provider_name() == provider && desc.disable() {
            count += 1;
        }
    });
    debug!("Disabled {count} event(s) of provider {provider}");
    count
}
