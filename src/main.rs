//! One-shot migration of legacy participant options into normalized
//! account columns and tables.
//!
//! Usage:
//!   MYSQL_URL=... MYSQL_USERNAME=... MYSQL_PASSWORD=... \
//!   DYNAMODB_TABLE=... MIGRATION_LIMIT=500 migrate-profiles
//!
//! Add --dry-run to log the statements without applying them.

use anyhow::{Context, Result};
use aws_config::BehaviorVersion;
use profile_migration::config::Config;
use profile_migration::migrator::Migrator;
use profile_migration::storage::{DynamoOptionsStore, MySqlAccountStore};
use std::env;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let dry_run = env::args().any(|a| a == "--dry-run");
    let config = Config::from_env().context("Failed to load configuration")?;

    info!(
        table = %config.dynamodb_table,
        limit = config.limit,
        dry_run,
        "Starting profile-options migration"
    );

    let accounts = MySqlAccountStore::connect(
        &config.mysql_url,
        &config.mysql_username,
        &config.mysql_password,
        config.mysql_use_ssl,
    )
    .await?;

    let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let options = DynamoOptionsStore::new(
        aws_sdk_dynamodb::Client::new(&aws_config),
        config.dynamodb_table,
    );

    let report = Migrator::new(accounts, options, config.limit, config.delay)
        .dry_run(dry_run)
        .run()
        .await?;

    info!(
        selected = report.selected,
        migrated = report.migrated,
        failed = report.failed,
        "Migration run complete"
    );

    Ok(())
}
