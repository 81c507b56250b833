//! Entry points called by instrumented code.

use crate::prelude::*;
use crate::state::state;
use side_types::{ArgVec, DynamicStruct, EventDescription};
use std::fmt;
use std::sync::Once;

/// Reports a programming error and aborts the process.
#[cold]
pub(crate) fn fatal(args: fmt::Arguments<'_>) -> ! {
    if log::log_enabled!(log::Level::Error) {
        error!("{args}");
    } else {
        eprintln!("side: {args}");
    }
    std::process::abort()
}

/// Fires a non-variadic event to every registered tracer.
///
/// Returns right away when the event is disabled. Calling this with a
/// variadic description aborts the process.
#[inline]
pub fn call(desc: &'static EventDescription, args: &ArgVec<'_>) {
    let state = state();
    if desc.is_variadic() {
        fatal(format_args!(
            "Event {desc} is variadic and must be fired with call_variadic"
        ));
    }
    if !desc.is_enabled() {
        return;
    }
    if desc.kernel_delivery_requested() {
        kernel_write(desc);
    }
    #[cfg(debug_assertions)]
    check_shape(desc, args, None);

    let tracers = state.tracers.read();
    for tracer in tracers.iter() {
        tracer.call(desc, args);
    }
}

/// Fires a variadic event to every registered tracer.
///
/// Returns right away when the event is disabled. Calling this with a
/// non-variadic description aborts the process.
#[inline]
pub fn call_variadic(
    desc: &'static EventDescription,
    args: &ArgVec<'_>,
    var_struct: &DynamicStruct<'_>,
) {
    let state = state();
    if !desc.is_variadic() {
        fatal(format_args!(
            "Event {desc} is not variadic and must be fired with call"
        ));
    }
    if !desc.is_enabled() {
        return;
    }
    if desc.kernel_delivery_requested() {
        kernel_write(desc);
    }
    #[cfg(debug_assertions)]
    check_shape(desc, args, Some(var_struct));

    let tracers = state.tracers.read();
    for tracer in tracers.iter() {
        tracer.call_variadic(desc, args, var_struct);
    }
}

/// Kernel user-event delivery is not available: the request is reported once
/// and the event still goes to the registered tracers.
#[cold]
fn kernel_write(desc: &EventDescription) {
    static UNSUPPORTED: Once = Once::new();
    UNSUPPORTED.call_once(|| {
        warn!("Kernel user-event delivery requested for {desc} is not implemented, events are only handed to tracers");
    });
}

#[cfg(debug_assertions)]
fn check_shape(
    desc: &'static EventDescription,
    args: &ArgVec<'_>,
    var_struct: Option<&DynamicStruct<'_>>,
) {
    use side_types::shape;

    if let Err(e) = shape::check_fields(desc.fields(), args) {
        fatal(format_args!("Arguments do not match event {desc}: {e}"));
    }
    if let Some(Err(e)) = var_struct.map(shape::check_dynamic_struct) {
        fatal(format_args!("Variadic arguments do not match event {desc}: {e}"));
    }
}
