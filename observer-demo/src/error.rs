use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unable to load configuration: {0}")]
    Config(#[from] ::config::ConfigError),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] validator::ValidationErrors),
    #[error("Unable to reach the statsd daemon: {0}")]
    Gateway(#[from] std::io::Error),
}
