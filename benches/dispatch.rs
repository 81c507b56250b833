use divan::Bencher;
use side::{Arg, ArgVec, DynamicStruct, EventDescription, Tracer};
use std::hint::black_box;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

fn main() {
    divan::main();
}

side::define_event! {
    static DISABLED: "bench", "disabled", Debug, [
        side::field!("a", U32),
        side::field!("b", String),
    ]
}

side::define_event! {
    static ENABLED: "bench", "enabled", Debug, [
        side::field!("a", U32),
        side::field!("b", String),
    ]
}

/// Sums the first argument, the cheapest tracer that still reads the call.
#[derive(Default)]
struct SumTracer {
    sum: AtomicU64,
}

impl Tracer for SumTracer {
    fn call(&self, _desc: &'static EventDescription, args: &ArgVec<'_>) {
        if let Some(Arg::U32(v)) = args.args().first() {
            self.sum.fetch_add(u64::from(*v), Ordering::Relaxed);
        }
    }

    fn call_variadic(
        &self,
        _desc: &'static EventDescription,
        _args: &ArgVec<'_>,
        _var_struct: &DynamicStruct<'_>,
    ) {
    }
}

#[divan::bench]
fn disabled_event() {
    side::event!(DISABLED, [black_box(1u32), "payload"]);
}

#[divan::bench]
fn disabled_call() {
    side::call(
        &DISABLED,
        &ArgVec::new(&[Arg::U32(black_box(1)), Arg::String("payload")]),
    );
}

#[divan::bench(args = [1, 4, 16])]
fn enabled_call(bencher: Bencher, tracers: usize) {
    let handles: Vec<_> = (0..tracers)
        .map(|_| side::register(Arc::new(SumTracer::default())))
        .collect();
    ENABLED.enable();

    bencher.bench_local(|| {
        side::call(
            &ENABLED,
            &ArgVec::new(&[Arg::U32(black_box(1)), Arg::String("payload")]),
        );
    });

    ENABLED.disable();
    handles.into_iter().for_each(side::unregister);
}
