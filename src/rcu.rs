//! Grace-period synchronizer protecting the registered tracer snapshot.
//!
//! Readers bump a per-CPU `begin` counter on entry and a per-CPU `end` counter
//! on exit, both indexed by the parity of the current period. A writer that has
//! just published a new snapshot waits until, for each parity, the sum of
//! `end` counters across all CPUs catches up with the sum of `begin` counters.
//! Sums are taken across CPUs, so a reader migrating between entry and exit is
//! accounted for correctly.
//!
//! The read side never blocks and never allocates. The write side is serialized
//! by a mutex and polls for quiescence.

use crate::prelude::*;
use crate::smp;
use crossbeam_utils::CachePadded;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering, fence};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

#[derive(Debug, Default)]
struct RcuCpuCount {
    begin: AtomicUsize,
    end: AtomicUsize,
}

#[derive(Debug, Default)]
struct RcuCpuState {
    count: [RcuCpuCount; 2],
}

#[derive(Debug)]
pub struct RcuGpState {
    percpu: Box<[CachePadded<RcuCpuState>]>,
    period: AtomicUsize,
    gp_lock: Mutex<()>,
    poll_interval: Duration,
}

/// Marks the calling thread as inside a read-side critical section until dropped.
///
/// Anything loaded from an RCU-protected pointer while the guard is alive stays
/// valid until the guard is dropped.
#[must_use = "the critical section ends when the guard is dropped"]
#[derive(Debug)]
pub struct RcuReadGuard<'a> {
    gp: &'a RcuGpState,
    period: usize,
}

impl RcuGpState {
    pub fn new(nr_cpus: NonZeroUsize, poll_interval: Duration) -> Self {
        let percpu = (0..nr_cpus.get())
            .map(|_| CachePadded::new(RcuCpuState::default()))
            .collect();

        Self {
            percpu,
            period: AtomicUsize::new(0),
            gp_lock: Mutex::new(()),
            poll_interval,
        }
    }

    pub fn nr_cpus(&self) -> usize {
        self.percpu.len()
    }

    #[inline]
    fn cpu_state(&self) -> &RcuCpuState {
        &self.percpu[smp::current_cpu() % self.percpu.len()]
    }

    /// Enters a read-side critical section.
    #[inline]
    pub fn read_begin(&self) -> RcuReadGuard<'_> {
        let period = self.period.load(Ordering::Relaxed) & 1;
        self.cpu_state().count[period]
            .begin
            .fetch_add(1, Ordering::Relaxed);
        // Orders the begin increment before any load of protected data.
        fence(Ordering::SeqCst);
        RcuReadGuard { gp: self, period }
    }

    #[inline]
    fn read_end(&self, period: usize) {
        // Orders all loads of protected data before the end increment.
        fence(Ordering::SeqCst);
        self.cpu_state().count[period]
            .end
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Waits until every read-side critical section that may have observed
    /// data published before this call has exited.
    ///
    /// Must not be called from inside a read-side critical section: it would
    /// wait for itself forever.
    pub fn wait_grace_period(&self) {
        let mut active_readers = [true, true];

        // Orders prior writes to protected data before the counter loads.
        fence(Ordering::SeqCst);
        let guard = self.gp_lock.lock().unwrap_or_else(PoisonError::into_inner);

        // If no reader is accounted for in either period, quiescence is
        // already observed.
        self.check_active_readers(&mut active_readers);
        if active_readers[0] || active_readers[1] {
            self.wait_for_prev_period_readers(&mut active_readers);
            self.period.fetch_xor(1, Ordering::Relaxed);
            self.wait_for_prev_period_readers(&mut active_readers);
        }

        drop(guard);
        fence(Ordering::SeqCst);
        trace!("Grace period complete");
    }

    fn check_active_readers(&self, active_readers: &mut [bool; 2]) {
        let mut sum = [0usize; 2];

        // Load `end` before `begin`: a reader racing with the scan can only
        // make it look active, never quiescent.
        for cpu in self.percpu.iter() {
            for (period, count) in cpu.count.iter().enumerate() {
                if active_readers[period] {
                    sum[period] = sum[period].wrapping_add(count.end.load(Ordering::Relaxed));
                }
            }
        }
        fence(Ordering::SeqCst);
        for cpu in self.percpu.iter() {
            for (period, count) in cpu.count.iter().enumerate() {
                if active_readers[period] {
                    sum[period] = sum[period].wrapping_sub(count.begin.load(Ordering::Relaxed));
                }
            }
        }

        for (period, active) in active_readers.iter_mut().enumerate() {
            if *active {
                *active = sum[period] != 0;
            }
        }
    }

    fn wait_for_prev_period_readers(&self, active_readers: &mut [bool; 2]) {
        let prev_period = (self.period.load(Ordering::Relaxed) & 1) ^ 1;

        while active_readers[prev_period] {
            if self.poll_interval.is_zero() {
                std::thread::yield_now();
            } else {
                std::thread::sleep(self.poll_interval);
            }
            self.check_active_readers(active_readers);
        }
    }
}

impl Drop for RcuReadGuard<'_> {
    fn drop(&mut self) {
        self.gp.read_end(self.period);
    }
}
