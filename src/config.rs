use crate::prelude::*;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Overrides the number of possible CPUs used to size the grace-period state.
pub const NR_CPUS_ENV: &str = "SIDE_NR_CPUS";
/// Delay between two reader scans while a grace period waits for quiescence.
pub const GP_POLL_ENV: &str = "SIDE_GP_POLL";

const DEFAULT_GRACE_PERIOD_POLL: Duration = Duration::from_millis(1);

/// Process-wide runtime configuration, read once at initialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Number of per-CPU read-side slots. Detected from the host when unset.
    pub nr_cpus: Option<usize>,
    /// A zero interval makes grace periods spin with `yield_now` instead of sleeping.
    pub grace_period_poll: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            nr_cpus: None,
            grace_period_poll: DEFAULT_GRACE_PERIOD_POLL,
        }
    }
}

/// Parse a poll interval.
/// Supports humantime format ("500us", "1ms", "2s") and plain numbers interpreted as
/// milliseconds.
fn parse_poll_interval(s: &str) -> Result<Duration> {
    let s = s.trim();

    if let Ok(millis) = s.parse::<u64>() {
        return Ok(Duration::from_millis(millis));
    }

    humantime::parse_duration(s).with_context(|| {
        format!("Invalid duration format: '{s}'. Expected format like '500us', '1ms' or a number of milliseconds")
    })
}

fn parse_nr_cpus(s: &str) -> Result<usize> {
    s.trim()
        .parse::<usize>()
        .with_context(|| format!("Invalid CPU count: '{s}'"))
}

impl Config {
    /// Load the configuration from the `SIDE_*` environment variables, falling back to
    /// the defaults for unset ones.
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();

        if let Ok(value) = env::var(NR_CPUS_ENV) {
            config.nr_cpus = Some(parse_nr_cpus(&value).context(NR_CPUS_ENV)?);
        }

        if let Ok(value) = env::var(GP_POLL_ENV) {
            config.grace_period_poll = parse_poll_interval(&value).context(GP_POLL_ENV)?;
        }

        Ok(config)
    }
}
