use super::AccountStore;
use crate::types::AccountCandidate;
use anyhow::{Context, Result};
use sqlx::Row;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions, MySqlSslMode};
use std::str::FromStr;

const SELECT_CANDIDATES_SQL: &str =
    "SELECT id, healthCode FROM Accounts WHERE migrationVersion != 1 LIMIT ?";

// ============================================================================
// MySqlAccountStore — sqlx-backed AccountStore implementation
// ============================================================================

pub struct MySqlAccountStore {
    pool: MySqlPool,
}

impl MySqlAccountStore {
    /// Connect to the accounts database. The session timezone is pinned to
    /// UTC (the legacy connector needed the same workaround), and `use_ssl`
    /// requires SSL without verifying the server certificate, matching how
    /// the legacy deployment terminated TLS.
    pub async fn connect(
        url: &str,
        username: &str,
        password: &str,
        use_ssl: bool,
    ) -> Result<Self> {
        let mut options = MySqlConnectOptions::from_str(url)
            .context("Invalid MySQL URL")?
            .username(username)
            .password(password)
            .timezone(Some("+00:00".to_string()));

        if use_ssl {
            options = options.ssl_mode(MySqlSslMode::Required);
        }

        // The job is strictly sequential; one exclusively-owned connection
        // is all it ever uses.
        let pool = MySqlPoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .context("Failed to connect to the accounts database")?;

        Ok(Self { pool })
    }
}

impl AccountStore for MySqlAccountStore {
    async fn unmigrated_accounts(&self, limit: usize) -> Result<Vec<AccountCandidate>> {
        let rows = sqlx::query(SELECT_CANDIDATES_SQL)
            .bind(limit as u64)
            .fetch_all(&self.pool)
            .await
            .context("Failed to select un-migrated accounts")?;

        rows.iter()
            .map(|row| {
                Ok(AccountCandidate {
                    account_id: row.try_get("id")?,
                    health_code: row.try_get("healthCode")?,
                })
            })
            .collect()
    }

    async fn apply_statements(&self, account_id: &str, statements: &[String]) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin migration transaction")?;

        for sql in statements {
            // Dropping the transaction on the error path rolls it back.
            sqlx::query(sql)
                .execute(&mut *tx)
                .await
                .with_context(|| format!("Statement failed for account '{}'", account_id))?;
        }

        tx.commit()
            .await
            .with_context(|| format!("Failed to commit migration of account '{}'", account_id))?;

        Ok(())
    }
}
