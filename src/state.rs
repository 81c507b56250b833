use crate::config::Config;
use crate::dispatch::fatal;
use crate::prelude::*;
use crate::rcu::RcuGpState;
use crate::smp;
use crate::tracer::TracerRegistry;
use lazy_static::lazy_static;
use std::num::NonZeroUsize;

/// Process-wide state, created on first use and never torn down.
pub(crate) struct SideState {
    pub config: Config,
    pub tracers: TracerRegistry,
}

lazy_static! {
    static ref STATE: SideState = SideState::init();
}

impl SideState {
    fn init() -> Self {
        let config = Config::from_env().unwrap_or_else(|e| {
            warn!("Ignoring invalid configuration, using defaults: {e:#}");
            Config::default()
        });

        let nr_cpus = match config.nr_cpus {
            Some(nr_cpus) => nr_cpus,
            None => smp::possible_cpus().unwrap_or_else(|e| {
                fatal(format_args!(
                    "Unable to determine the number of possible CPUs: {e:#}"
                ))
            }),
        };
        let Some(nr_cpus) = NonZeroUsize::new(nr_cpus) else {
            fatal(format_args!("The number of possible CPUs must not be zero"));
        };

        debug!("Initializing with {nr_cpus} CPU slot(s), config: {config:?}");
        let gp = RcuGpState::new(nr_cpus, config.grace_period_poll);

        Self {
            config,
            tracers: TracerRegistry::new(gp),
        }
    }
}

pub(crate) fn state() -> &'static SideState {
    &STATE
}

/// Initializes the process-wide state.
///
/// Idempotent and safe to call from several threads. Dispatch initializes
/// lazily, so calling this is only needed to control when the configuration is
/// read and when a fatal setup error may abort the process.
pub fn init() {
    lazy_static::initialize(&STATE);
}

/// The configuration read at initialization.
pub fn runtime_config() -> &'static Config {
    &state().config
}
