use env_logger::Env;
use log::SetLoggerError;

/// Installs the global logger, defaulting to `info` when `RUST_LOG` is unset.
pub fn init() -> Result<(), SetLoggerError> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).try_init()
}
