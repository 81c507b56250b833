//! Self-describing event and argument types shared between instrumented code
//! and tracers.
//!
//! This crate is a pure data-shape layer: it performs no I/O and holds no
//! global state.
//! - [`EventDescription`] and [`Field`]/[`Type`] describe an instrumentation
//!   point ahead of time, usually in a `static`.
//! - [`Arg`]/[`ArgVec`] and [`Dynamic`] carry the values of one call.
//! - [`Visitor`]/[`WriteElem`] let a call site expose a sequence lazily.
//! - [`shape`] checks that the values of a call match their description.

pub mod arg;
pub mod dynamic;
pub mod event;
pub mod shape;
pub mod types;
pub mod visitor;

pub use arg::{Arg, ArgVec, IntSlice};
pub use dynamic::{Dynamic, DynamicField, DynamicStruct};
pub use event::{EventDescription, EventFlags};
pub use shape::ShapeError;
pub use types::{Field, IntType, LogLevel, Type};
pub use visitor::{Visitor, VisitorStatus, WriteElem};
