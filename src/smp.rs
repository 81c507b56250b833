//! Minimal CPU topology: how many CPUs may ever exist, and which one runs us.

use crate::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};

const POSSIBLE_CPUS_PATH: &str = "/sys/devices/system/cpu/possible";

/// Number of slots needed to index every CPU the system may bring online.
pub fn possible_cpus() -> Result<usize> {
    match std::fs::read_to_string(POSSIBLE_CPUS_PATH) {
        Ok(content) => match parse_cpu_list(&content) {
            Ok(count) => return Ok(count),
            Err(e) => debug!("Ignoring {POSSIBLE_CPUS_PATH}: {e:#}"),
        },
        Err(e) => trace!("Unable to read {POSSIBLE_CPUS_PATH}: {e}"),
    }

    let configured = unsafe { libc::sysconf(libc::_SC_NPROCESSORS_CONF) };
    if configured > 0 {
        return Ok(configured as usize);
    }

    let available = std::thread::available_parallelism()
        .context("Failed to determine the number of possible CPUs")?;
    Ok(available.get())
}

/// Parse a kernel CPU list such as `0-3,8,10-11` into the highest id + 1.
pub(crate) fn parse_cpu_list(list: &str) -> Result<usize> {
    let mut highest: Option<usize> = None;

    for part in list.trim().split(',').filter(|part| !part.is_empty()) {
        let last = match part.split_once('-') {
            Some((start, end)) => {
                let start: usize = start
                    .parse()
                    .with_context(|| format!("Invalid CPU range '{part}'"))?;
                let end: usize = end
                    .parse()
                    .with_context(|| format!("Invalid CPU range '{part}'"))?;
                if start > end {
                    bail!("Invalid CPU range '{part}'");
                }
                end
            }
            None => part
                .parse()
                .with_context(|| format!("Invalid CPU id '{part}'"))?,
        };
        highest = Some(highest.map_or(last, |highest| highest.max(last)));
    }

    match highest {
        Some(highest) => Ok(highest + 1),
        None => bail!("Empty CPU list"),
    }
}

/// Index of the CPU the calling thread currently runs on.
///
/// The value may be stale as soon as it is returned. Callers only use it to
/// spread counters and must map it into their own bounds.
#[inline]
pub fn current_cpu() -> usize {
    #[cfg(target_os = "linux")]
    {
        let cpu = unsafe { libc::sched_getcpu() };
        if cpu >= 0 {
            return cpu as usize;
        }
    }

    thread_slot()
}

/// Per-thread index, assigned round-robin on first use.
fn thread_slot() -> usize {
    static NEXT_SLOT: AtomicUsize = AtomicUsize::new(0);

    thread_local! {
        static SLOT: usize = NEXT_SLOT.fetch_add(1, Ordering::Relaxed);
    }

    SLOT.with(|slot| *slot)
}
