//! Registered tracers, published to dispatch as an RCU-protected snapshot.

use crate::events;
use crate::prelude::*;
use crate::rcu::{RcuGpState, RcuReadGuard};
use crate::state::state;
use side_types::{ArgVec, DynamicStruct, EventDescription};
use std::ptr;
use std::sync::atomic::{AtomicPtr, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Consumer of dispatched events.
///
/// Callbacks run on the instrumented thread, inside a read-side critical
/// section. They must not retain references to the arguments past the call,
/// and must not register or unregister tracers, which would wait for their own
/// critical section to end.
pub trait Tracer: Send + Sync {
    fn call(&self, desc: &'static EventDescription, args: &ArgVec<'_>);

    fn call_variadic(
        &self,
        desc: &'static EventDescription,
        args: &ArgVec<'_>,
        var_struct: &DynamicStruct<'_>,
    );

    /// A batch of event descriptions was published, or was already published
    /// when this tracer registered.
    ///
    /// Runs with the event registry locked: only the descriptions themselves
    /// may be touched (e.g. [`EventDescription::enable`]).
    fn events_registered(&self, _events: &[&'static EventDescription]) {}

    /// A batch of event descriptions was withdrawn, or this tracer is being
    /// unregistered while the batch is still published.
    fn events_unregistered(&self, _events: &[&'static EventDescription]) {}
}

/// Proof of registration, consumed by [`unregister`].
#[must_use = "dropping the handle leaves the tracer registered forever"]
#[derive(Debug, PartialEq, Eq)]
pub struct TracerHandle {
    id: u64,
}

impl TracerHandle {
    pub fn id(&self) -> u64 {
        self.id
    }
}

#[derive(Clone)]
pub(crate) struct TracerEntry {
    id: u64,
    tracer: Arc<dyn Tracer>,
}

pub(crate) struct TracerRegistry {
    gp: RcuGpState,
    snapshot: AtomicPtr<Vec<TracerEntry>>,
    next_id: AtomicU64,
    write_lock: Mutex<()>,
}

/// The tracers registered when the read-side critical section began.
pub(crate) struct TracerSnapshot<'a> {
    _guard: RcuReadGuard<'a>,
    entries: &'a [TracerEntry],
}

impl TracerSnapshot<'_> {
    pub fn iter(&self) -> impl Iterator<Item = &dyn Tracer> + '_ {
        self.entries.iter().map(|entry| entry.tracer.as_ref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl TracerRegistry {
    pub fn new(gp: RcuGpState) -> Self {
        Self {
            gp,
            snapshot: AtomicPtr::new(Box::into_raw(Box::default())),
            next_id: AtomicU64::new(1),
            write_lock: Mutex::new(()),
        }
    }

    /// Enters a read-side critical section and loads the current snapshot.
    #[inline]
    pub fn read(&self) -> TracerSnapshot<'_> {
        let guard = self.gp.read_begin();
        // SAFETY: the pointer always comes from `Box::into_raw` and is only
        // freed after a grace period, which cannot complete while `guard` lives.
        let entries = unsafe { &*self.snapshot.load(Ordering::Acquire) };
        TracerSnapshot {
            _guard: guard,
            entries: entries.as_slice(),
        }
    }

    pub fn register(&self, tracer: Arc<dyn Tracer>) -> TracerHandle {
        let _lock = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        let mut next = self.current().clone();
        next.push(TracerEntry { id, tracer });
        let count = next.len();
        self.publish(next);

        debug!("Registered tracer {id}, {count} tracer(s) registered");
        TracerHandle { id }
    }

    /// Removes the tracer and returns it once no critical section can still
    /// be calling it.
    pub fn unregister(&self, handle: TracerHandle) -> Option<Arc<dyn Tracer>> {
        let _lock = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let current = self.current();
        let Some(position) = current.iter().position(|entry| entry.id == handle.id) else {
            warn!("Tracer {} is not registered", handle.id);
            return None;
        };

        let mut next = current.clone();
        let removed = next.remove(position);
        let count = next.len();
        self.publish(next);

        debug!(
            "Unregistered tracer {}, {count} tracer(s) registered",
            handle.id
        );
        Some(removed.tracer)
    }

    /// Must be called with `write_lock` held.
    fn current(&self) -> &Vec<TracerEntry> {
        // SAFETY: only writers replace the snapshot, and they are serialized by
        // `write_lock`, so the pointer stays valid while the caller holds it.
        unsafe { &*self.snapshot.load(Ordering::Acquire) }
    }

    /// Must be called with `write_lock` held.
    fn publish(&self, next: Vec<TracerEntry>) {
        let old = self
            .snapshot
            .swap(Box::into_raw(Box::new(next)), Ordering::AcqRel);
        self.gp.wait_grace_period();
        // SAFETY: `old` came from `Box::into_raw` and no reader can hold it
        // after the grace period.
        drop(unsafe { Box::from_raw(old) });
    }
}

impl Drop for TracerRegistry {
    fn drop(&mut self) {
        let snapshot = std::mem::replace(self.snapshot.get_mut(), ptr::null_mut());
        if !snapshot.is_null() {
            // SAFETY: `&mut self` excludes any reader.
            drop(unsafe { Box::from_raw(snapshot) });
        }
    }
}

/// Attaches `tracer` to every subsequent dispatch.
///
/// The tracer is first told about every event batch already published, see
/// [`Tracer::events_registered`]. Blocks until the previous tracer snapshot is
/// no longer referenced.
pub fn register(tracer: Arc<dyn Tracer>) -> TracerHandle {
    let published = events::lock();
    let handle = state().tracers.register(Arc::clone(&tracer));
    for entry in published.iter() {
        tracer.events_registered(entry.events());
    }
    handle
}

/// Detaches a tracer.
///
/// Once this returns, no dispatch is running the tracer's callbacks and none
/// will start. The tracer is then told about the event batches still
/// published, see [`Tracer::events_unregistered`].
pub fn unregister(handle: TracerHandle) {
    let published = events::lock();
    if let Some(tracer) = state().tracers.unregister(handle) {
        for entry in published.iter() {
            tracer.events_unregistered(entry.events());
        }
    }
}

/// Number of currently registered tracers.
pub fn tracer_count() -> usize {
    state().tracers.read().len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use side_types::LogLevel;
    use std::num::NonZeroUsize;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    static EVENT: EventDescription = EventDescription::new("test", "noop", LogLevel::Info, &[]);

    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
    }

    impl Tracer for Counting {
        fn call(&self, _desc: &'static EventDescription, _args: &ArgVec<'_>) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }

        fn call_variadic(
            &self,
            _desc: &'static EventDescription,
            _args: &ArgVec<'_>,
            _var_struct: &DynamicStruct<'_>,
        ) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn registry() -> TracerRegistry {
        TracerRegistry::new(RcuGpState::new(
            NonZeroUsize::new(2).unwrap(),
            Duration::from_micros(50),
        ))
    }

    fn fire(registry: &TracerRegistry) {
        let snapshot = registry.read();
        for tracer in snapshot.iter() {
            tracer.call(&EVENT, &ArgVec::empty());
        }
    }

    #[test]
    fn test_register_and_unregister() {
        let registry = registry();
        let first = Arc::new(Counting::default());
        let second = Arc::new(Counting::default());

        let first_handle = registry.register(first.clone());
        let second_handle = registry.register(second.clone());
        assert_ne!(first_handle.id(), second_handle.id());
        assert_eq!(registry.read().len(), 2);

        fire(&registry);
        assert!(registry.unregister(first_handle).is_some());
        fire(&registry);

        assert_eq!(first.calls.load(Ordering::SeqCst), 1);
        assert_eq!(second.calls.load(Ordering::SeqCst), 2);

        assert!(registry.unregister(second_handle).is_some());
        assert_eq!(registry.read().len(), 0);
    }

    #[test]
    fn test_unknown_handle() {
        let registry = registry();
        assert!(registry.unregister(TracerHandle { id: 42 }).is_none());
    }

    #[test]
    fn test_snapshot_outlives_unregister_until_dropped() {
        let registry = registry();
        let tracer = Arc::new(Counting::default());
        let handle = registry.register(tracer.clone());

        std::thread::scope(|s| {
            let snapshot = registry.read();
            let writer = s.spawn(|| registry.unregister(handle));

            std::thread::sleep(Duration::from_millis(20));
            assert!(!writer.is_finished());
            for tracer in snapshot.iter() {
                tracer.call(&EVENT, &ArgVec::empty());
            }
            drop(snapshot);

            assert!(writer.join().unwrap().is_some());
        });

        assert_eq!(tracer.calls.load(Ordering::SeqCst), 1);
        assert_eq!(registry.read().len(), 0);
    }
}
