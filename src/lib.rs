//! Static instrumentation for applications.
//!
//! Instrumented code declares each instrumentation point ahead of time as a
//! static [`EventDescription`] and fires it with [`call`] or
//! [`call_variadic`]. Tracers attach at runtime with [`register`]. A disabled
//! event costs two atomic loads at the call site.
//!
//! ```
//! use side::{ArgVec, Arg};
//!
//! side::define_event! {
//!     static PING: "myapp", "ping", Info, [side::field!("seq", U32)]
//! }
//!
//! side::event!(PING, [1u32]);
//! side::call(&PING, &ArgVec::new(&[Arg::U32(2)]));
//! ```
//!
//! Tracers run on the instrumented threads. The set of registered tracers is
//! published as a read-copy-update snapshot (see [`rcu`]): dispatch never
//! blocks on registration, and [`unregister`] waits for in-flight dispatches
//! before returning.

pub mod config;
mod dispatch;
pub mod events;
pub mod logger;
mod macros;
mod prelude;
pub mod rcu;
pub mod smp;
mod state;
mod tracer;

pub use dispatch::{call, call_variadic};
pub use events::{
    EventsHandle, disable_provider, enable_provider, for_each_event, register_events,
    unregister_events,
};
pub use side_types::visitor::for_each_elem;
pub use side_types::{
    Arg, ArgVec, Dynamic, DynamicField, DynamicStruct, EventDescription, EventFlags, Field,
    IntSlice, IntType, LogLevel, ShapeError, Type, Visitor, VisitorStatus, WriteElem, shape,
};
pub use state::{init, runtime_config};
pub use tracer::{Tracer, TracerHandle, register, tracer_count, unregister};
