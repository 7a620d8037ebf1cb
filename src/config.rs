use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// The legacy job slept 200ms between accounts to stay under the key-value
/// store's provisioned throughput.
const DEFAULT_DELAY_MS: u64 = 200;

/// Process configuration, read once from the environment at startup.
/// AWS credentials come from the default provider chain, not from here.
#[derive(Debug, Clone)]
pub struct Config {
    pub mysql_url: String,
    pub mysql_username: String,
    pub mysql_password: String,
    pub mysql_use_ssl: bool,
    pub dynamodb_table: String,
    pub limit: usize,
    pub delay: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let delay_ms = match env::var("MIGRATION_DELAY_MS") {
            Ok(v) => v
                .parse()
                .context("MIGRATION_DELAY_MS must be a valid number")?,
            Err(_) => DEFAULT_DELAY_MS,
        };

        Ok(Self {
            mysql_url: required("MYSQL_URL")?,
            mysql_username: required("MYSQL_USERNAME")?,
            mysql_password: required("MYSQL_PASSWORD")?,
            mysql_use_ssl: env::var("MYSQL_USE_SSL").map(|v| v == "true").unwrap_or(false),
            dynamodb_table: required("DYNAMODB_TABLE")?,
            limit: required("MIGRATION_LIMIT")?
                .parse()
                .context("MIGRATION_LIMIT must be a valid number")?,
            delay: Duration::from_millis(delay_ms),
        })
    }
}

fn required(name: &str) -> Result<String> {
    env::var(name).map_err(|_| anyhow::anyhow!("{} environment variable must be set", name))
}
