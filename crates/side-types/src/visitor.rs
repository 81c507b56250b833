//! Lazy sequences: the call site hands over a traversal instead of a
//! materialized array, and the tracer receives the elements one by one.
//!
//! A [`Visitor`] is the traversal (the trait object carries both the function
//! and its context), and [`WriteElem`] is the sink provided by whoever consumes
//! the sequence. Elements may themselves be [`Arg::VlaVisitor`], which gives
//! nested multi-dimensional traversal without any copy.

use crate::arg::{Arg, IntSlice};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitorStatus {
    Ok,
    Error,
}

impl VisitorStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, VisitorStatus::Ok)
    }
}

/// Consumer side of a visit: receives one element per call.
pub trait WriteElem {
    fn write_elem(&mut self, elem: &Arg<'_>) -> VisitorStatus;
}

impl<F> WriteElem for F
where
    F: FnMut(&Arg<'_>) -> VisitorStatus,
{
    fn write_elem(&mut self, elem: &Arg<'_>) -> VisitorStatus {
        self(elem)
    }
}

/// Producer side of a visit, implemented by the instrumented code.
///
/// Implementations should stop and return [`VisitorStatus::Error`] as soon as
/// `write_elem` fails.
pub trait Visitor {
    fn visit(&self, writer: &mut dyn WriteElem) -> VisitorStatus;
}

/// Runs `visitor`, handing each element to `f`.
pub fn for_each_elem<F>(visitor: &dyn Visitor, mut f: F) -> VisitorStatus
where
    F: FnMut(&Arg<'_>) -> VisitorStatus,
{
    visitor.visit(&mut f)
}

impl Visitor for IntSlice<'_> {
    fn visit(&self, writer: &mut dyn WriteElem) -> VisitorStatus {
        for elem in self.iter() {
            if !writer.write_elem(&elem).is_ok() {
                return VisitorStatus::Error;
            }
        }
        VisitorStatus::Ok
    }
}
