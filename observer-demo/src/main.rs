mod config;
mod error;
mod scenario;

use anyhow::Context;
use log::info;

use crate::config::app::AppConfig;
use error::AppError;

fn main() -> anyhow::Result<()> {
    crate::config::log::init()?;

    let app_config = AppConfig::new().context("Unable to prepare the office")?;
    let transcript = scenario::run(&app_config).context("The office scenario failed")?;

    for check_in in &transcript.check_ins {
        println!("{} was {}", check_in.employee, check_in.activity);
    }
    info!(
        "{} notification passes, {} failed callbacks",
        transcript.passes, transcript.failures
    );

    Ok(())
}
