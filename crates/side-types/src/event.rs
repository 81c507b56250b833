use crate::types::{Field, LogLevel};
use serde::{Deserialize, Serialize};
use static_assertions::assert_impl_all;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Feature flags of an event description.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EventFlags(u32);

impl EventFlags {
    pub const NONE: EventFlags = EventFlags(0);
    /// The event accepts a trailing list of dynamic (name, value) arguments.
    pub const VARIADIC: EventFlags = EventFlags(1 << 0);

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(&self) -> u32 {
        self.0
    }

    pub const fn contains(&self, other: EventFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: EventFlags) -> Self {
        Self(self.0 | other.0)
    }
}

/// Static descriptor of one instrumentation point.
///
/// Meant to live in a `static` next to its call site. The only mutable parts
/// are the enabled count, toggled by tracers, and the kernel delivery request.
#[derive(Debug)]
pub struct EventDescription {
    provider_name: &'static str,
    event_name: &'static str,
    loglevel: LogLevel,
    fields: &'static [Field],
    flags: EventFlags,
    enabled: AtomicU32,
    kernel_user_event: AtomicBool,
}

assert_impl_all!(EventDescription: Send, Sync);

impl EventDescription {
    pub const fn new(
        provider_name: &'static str,
        event_name: &'static str,
        loglevel: LogLevel,
        fields: &'static [Field],
    ) -> Self {
        Self::with_flags(provider_name, event_name, loglevel, fields, EventFlags::NONE)
    }

    pub const fn new_variadic(
        provider_name: &'static str,
        event_name: &'static str,
        loglevel: LogLevel,
        fields: &'static [Field],
    ) -> Self {
        Self::with_flags(
            provider_name,
            event_name,
            loglevel,
            fields,
            EventFlags::VARIADIC,
        )
    }

    pub const fn with_flags(
        provider_name: &'static str,
        event_name: &'static str,
        loglevel: LogLevel,
        fields: &'static [Field],
        flags: EventFlags,
    ) -> Self {
        Self {
            provider_name,
            event_name,
            loglevel,
            fields,
            flags,
            enabled: AtomicU32::new(0),
            kernel_user_event: AtomicBool::new(false),
        }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider_name
    }

    pub fn event_name(&self) -> &'static str {
        self.event_name
    }

    pub fn loglevel(&self) -> LogLevel {
        self.loglevel
    }

    pub fn fields(&self) -> &'static [Field] {
        self.fields
    }

    pub fn flags(&self) -> EventFlags {
        self.flags
    }

    pub fn is_variadic(&self) -> bool {
        self.flags.contains(EventFlags::VARIADIC)
    }

    /// Fast-path check gating all dispatch work.
    ///
    /// A kernel delivery request alone also opens the gate, like a tracer would.
    #[inline(always)]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire) != 0
            || self.kernel_user_event.load(Ordering::Acquire)
    }

    /// Number of tracers currently asking for this event.
    pub fn enabled_count(&self) -> u32 {
        self.enabled.load(Ordering::Acquire)
    }

    /// Registers interest in this event. Each call must be balanced by [`Self::disable`].
    ///
    /// Saturates at `u32::MAX` and returns `false` when the count is full.
    pub fn enable(&self) -> bool {
        self.enabled
            .fetch_update(Ordering::Release, Ordering::Relaxed, |count| {
                count.checked_add(1)
            })
            .is_ok()
    }

    /// Drops one unit of interest. Saturates at zero.
    ///
    /// Returns `false` if the event was not enabled.
    pub fn disable(&self) -> bool {
        self.enabled
            .fetch_update(Ordering::Release, Ordering::Relaxed, |count| {
                count.checked_sub(1)
            })
            .is_ok()
    }

    /// Asks for the event to also be written through the kernel user-event path.
    ///
    /// Kernel delivery is not implemented: dispatch only reports that it was
    /// requested.
    pub fn request_kernel_delivery(&self, requested: bool) {
        self.kernel_user_event.store(requested, Ordering::Release);
    }

    pub fn kernel_delivery_requested(&self) -> bool {
        self.kernel_user_event.load(Ordering::Acquire)
    }
}

impl std::fmt::Display for EventDescription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.provider_name, self.event_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Type;

    static EVENT: EventDescription = EventDescription::new(
        "myprovider",
        "myevent",
        LogLevel::Debug,
        &[
            Field {
                name: "abc",
                ty: Type::U32,
            },
            Field {
                name: "def",
                ty: Type::S64,
            },
        ],
    );

    #[test]
    fn test_static_description() {
        assert_eq!(EVENT.to_string(), "myprovider:myevent");
        assert_eq!(EVENT.fields().len(), 2);
        assert_eq!(EVENT.fields()[1].ty, Type::S64);
        assert!(!EVENT.is_variadic());
    }

    #[test]
    fn test_enable_is_counted_and_saturates() {
        let desc = EventDescription::new("p", "e", LogLevel::Info, &[]);
        assert!(!desc.is_enabled());
        assert!(!desc.disable());

        assert!(desc.enable());
        assert!(desc.enable());
        assert_eq!(desc.enabled_count(), 2);

        assert!(desc.disable());
        assert!(desc.is_enabled());
        assert!(desc.disable());
        assert!(!desc.is_enabled());
        assert!(!desc.disable());
        assert_eq!(desc.enabled_count(), 0);
    }

    #[test]
    fn test_flags() {
        let desc = EventDescription::new_variadic("p", "e", LogLevel::Info, &[]);
        assert!(desc.is_variadic());
        assert_eq!(desc.flags().bits(), 1);
        assert!(EventFlags::NONE.union(EventFlags::VARIADIC).contains(EventFlags::VARIADIC));
        assert!(!EventFlags::NONE.contains(EventFlags::VARIADIC));
    }

    #[test]
    fn test_enable_saturates_at_max() {
        let desc = EventDescription::new("p", "e", LogLevel::Info, &[]);
        desc.enabled.store(u32::MAX - 1, Ordering::Relaxed);

        assert!(desc.enable());
        assert!(!desc.enable());
        assert_eq!(desc.enabled_count(), u32::MAX);
        assert!(desc.is_enabled());
    }

    #[test]
    fn test_kernel_request_opens_gate_without_count() {
        let desc = EventDescription::new("p", "e", LogLevel::Info, &[]);
        desc.request_kernel_delivery(true);
        assert!(desc.kernel_delivery_requested());
        assert!(desc.is_enabled());
        assert_eq!(desc.enabled_count(), 0);

        desc.request_kernel_delivery(false);
        assert!(!desc.is_enabled());
    }
}
