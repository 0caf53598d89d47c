use config::{builder::DefaultState, Config, ConfigBuilder, Environment, File, FileFormat};
use registry::FailurePolicy;
use serde::Deserialize;
use validator::Validate;

use crate::AppError;

const DEFAULT_CONFIG: &str = include_str!("../../resources/config/default.toml");
const DEFAULT_CONFIG_PREFIX: &str = "APP";
const LIST_SEPARATOR: &str = ",";

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct AppConfig {
    #[validate(length(min = 1))]
    pub employee_name: String,
    pub initial_activity: String,
    #[validate(length(min = 1))]
    pub activities: Vec<String>,
    pub final_activity: String,
    #[validate(length(min = 1))]
    pub manager_name: String,
    #[validate(length(min = 1))]
    pub contractor_name: String,
    pub contractor_initial_activity: String,
    pub contractor_activities: Vec<String>,
    pub failure_policy: FailurePolicy,
    pub statsd_enabled: bool,
    pub statsd_host: String,
    pub statsd_port: u16,
}

impl AppConfig {
    /// Embedded defaults overridden by `APP_*` environment variables.
    pub fn new() -> Result<Self, AppError> {
        let builder = defaults_builder().add_source(
            Environment::with_prefix(DEFAULT_CONFIG_PREFIX)
                .try_parsing(true)
                .list_separator(LIST_SEPARATOR)
                .with_list_parse_key("activities")
                .with_list_parse_key("contractor_activities"),
        );
        build(builder)
    }

    /// Embedded defaults only.
    pub fn defaults() -> Result<Self, AppError> {
        build(defaults_builder())
    }
}

fn defaults_builder() -> ConfigBuilder<DefaultState> {
    Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
}

fn build(builder: ConfigBuilder<DefaultState>) -> Result<AppConfig, AppError> {
    let config: AppConfig = builder.build()?.try_deserialize()?;
    config.validate()?;
    Ok(config)
}
