//! The migration driver: selects un-migrated accounts, then fetches,
//! transforms, and commits one account at a time.
//!
//! One bad account never stops the run. A per-account error (unreadable
//! options record, failed transaction) is logged at warn level and counted;
//! the account's completion marker stays unset so the next run retries it.

use crate::statements::migration_statements;
use crate::storage::{AccountStore, OptionsStore};
use crate::types::{AccountCandidate, MigrationReport};
use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{info, warn};

pub struct Migrator<A, O> {
    accounts: A,
    options: O,
    limit: usize,
    delay: Duration,
    dry_run: bool,
}

impl<A: AccountStore, O: OptionsStore> Migrator<A, O> {
    pub fn new(accounts: A, options: O, limit: usize, delay: Duration) -> Self {
        Self {
            accounts,
            options,
            limit,
            delay,
            dry_run: false,
        }
    }

    /// In dry-run mode the statements are logged but never applied.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub async fn run(&self) -> Result<MigrationReport> {
        let candidates = self
            .accounts
            .unmigrated_accounts(self.limit)
            .await
            .context("Failed to select accounts to migrate")?;

        info!(
            found = candidates.len(),
            limit = self.limit,
            "Selected un-migrated accounts"
        );

        let mut report = MigrationReport {
            selected: candidates.len(),
            ..Default::default()
        };

        for candidate in &candidates {
            match self.migrate_account(candidate).await {
                Ok(()) => report.migrated += 1,
                Err(e) => {
                    warn!(
                        account_id = %candidate.account_id,
                        error = %e,
                        "Account migration failed, continuing with next account"
                    );
                    report.failed += 1;
                }
            }

            // Plain throttling of the key-value store, not a correctness
            // mechanism. Tests run with Duration::ZERO.
            tokio::time::sleep(self.delay).await;
        }

        Ok(report)
    }

    async fn migrate_account(&self, candidate: &AccountCandidate) -> Result<()> {
        info!(account_id = %candidate.account_id, "Migrating account");

        let options = self.options.fetch_options(&candidate.health_code).await?;
        let statements = migration_statements(&candidate.account_id, &options);

        if self.dry_run {
            for sql in &statements {
                info!(account_id = %candidate.account_id, sql = %sql, "[dry run] would execute");
            }
            return Ok(());
        }

        self.accounts
            .apply_statements(&candidate.account_id, &statements)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_utils::{FakeAccountStore, FakeOptionsStore};

    fn migrator(
        accounts: FakeAccountStore,
        options: FakeOptionsStore,
        limit: usize,
    ) -> Migrator<FakeAccountStore, FakeOptionsStore> {
        Migrator::new(accounts, options, limit, Duration::ZERO)
    }

    #[tokio::test]
    async fn migrates_each_candidate_in_one_batch() {
        let accounts = FakeAccountStore::new()
            .with_candidate("AAA", "hc-1")
            .with_candidate("BBB", "hc-2");
        let options = FakeOptionsStore::new()
            .with_record("hc-1", r#"{"SHARING_SCOPE":"NO_SHARING","LANGUAGES":"en,fr"}"#);

        let m = migrator(accounts, options, 10);
        let report = m.run().await.unwrap();

        assert_eq!(report.selected, 2);
        assert_eq!(report.migrated, 2);
        assert_eq!(report.failed, 0);

        let batch = m.accounts.applied_for("AAA").unwrap();
        assert_eq!(
            batch,
            vec![
                "UPDATE Accounts SET sharingScope = 'NO_SHARING', notifyByEmail = true, migrationVersion = 1 WHERE id = 'AAA';",
                "INSERT INTO AccountLanguages (accountId, language) VALUES ('AAA','en');",
                "INSERT INTO AccountLanguages (accountId, language) VALUES ('AAA','fr');",
            ]
        );
    }

    #[tokio::test]
    async fn missing_record_applies_defaults_only_update() {
        let accounts = FakeAccountStore::new().with_candidate("AAA", "hc-missing");
        let m = migrator(accounts, FakeOptionsStore::new(), 10);

        let report = m.run().await.unwrap();
        assert_eq!(report.migrated, 1);

        let batch = m.accounts.applied_for("AAA").unwrap();
        assert_eq!(
            batch,
            vec!["UPDATE Accounts SET notifyByEmail = true, migrationVersion = 1 WHERE id = 'AAA';"]
        );
    }

    #[tokio::test]
    async fn failed_account_does_not_stop_the_run() {
        let accounts = FakeAccountStore::new()
            .with_candidate("AAA", "hc-1")
            .with_candidate("BAD", "hc-2")
            .with_candidate("CCC", "hc-3")
            .with_failing("BAD");

        let m = migrator(accounts, FakeOptionsStore::new(), 10);
        let report = m.run().await.unwrap();

        assert_eq!(report.selected, 3);
        assert_eq!(report.migrated, 2);
        assert_eq!(report.failed, 1);
        assert!(m.accounts.applied_for("AAA").is_some());
        assert!(m.accounts.applied_for("BAD").is_none());
        assert!(m.accounts.applied_for("CCC").is_some());
    }

    #[tokio::test]
    async fn unparseable_record_counts_as_failed_account() {
        let accounts = FakeAccountStore::new()
            .with_candidate("AAA", "hc-bad")
            .with_candidate("BBB", "hc-ok");
        let options = FakeOptionsStore::new()
            .with_record("hc-bad", "{not valid json")
            .with_record("hc-ok", "{}");

        let m = migrator(accounts, options, 10);
        let report = m.run().await.unwrap();

        assert_eq!(report.failed, 1);
        assert_eq!(report.migrated, 1);
        assert!(m.accounts.applied_for("AAA").is_none());
    }

    #[tokio::test]
    async fn selection_honors_limit() {
        let accounts = FakeAccountStore::new()
            .with_candidate("AAA", "hc-1")
            .with_candidate("BBB", "hc-2")
            .with_candidate("CCC", "hc-3");

        let m = migrator(accounts, FakeOptionsStore::new(), 2);
        let report = m.run().await.unwrap();

        assert_eq!(report.selected, 2);
        assert_eq!(m.accounts.applied_count(), 2);
    }

    #[tokio::test]
    async fn duplicate_account_ids_are_both_processed() {
        // The legacy job collected candidates into a map keyed by account
        // id, silently dropping a health code on collision. Candidates are
        // a Vec now, so both rows go through.
        let accounts = FakeAccountStore::new()
            .with_candidate("AAA", "hc-1")
            .with_candidate("AAA", "hc-2");

        let m = migrator(accounts, FakeOptionsStore::new(), 10);
        let report = m.run().await.unwrap();

        assert_eq!(report.selected, 2);
        assert_eq!(report.migrated, 2);
    }

    #[tokio::test]
    async fn dry_run_applies_nothing() {
        let accounts = FakeAccountStore::new().with_candidate("AAA", "hc-1");
        let m = migrator(accounts, FakeOptionsStore::new(), 10).dry_run(true);

        let report = m.run().await.unwrap();

        assert_eq!(report.migrated, 1);
        assert_eq!(m.accounts.applied_count(), 0);
    }

    #[tokio::test]
    async fn no_candidates_is_a_clean_run() {
        let m = migrator(FakeAccountStore::new(), FakeOptionsStore::new(), 10);
        let report = m.run().await.unwrap();
        assert_eq!(report, MigrationReport::default());
    }
}
