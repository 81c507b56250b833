use env_logger::Env;

/// Environment variable holding the `env_logger` filter, e.g. `SIDE_LOG=side=debug`.
pub const LOG_ENV: &str = "SIDE_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Installs an `env_logger` configured from [`LOG_ENV`].
///
/// Meant for processes that do not set up logging themselves. Returns `false`
/// if another logger was already installed, in which case it is left untouched.
pub fn init_logger() -> bool {
    env_logger::Builder::from_env(Env::default().filter_or(LOG_ENV, DEFAULT_FILTER))
        .format_timestamp_micros()
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_keeps_existing_logger() {
        let _ = init_logger();
        assert!(!init_logger());
    }
}
