use crate::options::LegacyOptions;
use crate::types::AccountCandidate;
use anyhow::Result;

pub mod dynamo;
pub mod mysql;
pub use dynamo::DynamoOptionsStore;
pub use mysql::MySqlAccountStore;

// ============================================================================
// Store traits
// ============================================================================

/// The relational side of the migration: candidate selection and
/// transactional application of one account's statement batch.
#[allow(async_fn_in_trait)]
pub trait AccountStore: Send + Sync {
    /// Accounts whose completion marker is not yet set, bounded by `limit`.
    async fn unmigrated_accounts(&self, limit: usize) -> Result<Vec<AccountCandidate>>;

    /// Execute one account's statements inside a single transaction. Any
    /// statement failure rolls the whole batch back.
    async fn apply_statements(&self, account_id: &str, statements: &[String]) -> Result<()>;
}

/// The key-value side: point lookup of the legacy options blob.
#[allow(async_fn_in_trait)]
pub trait OptionsStore: Send + Sync {
    /// Fetch the legacy options document for a health code. An absent
    /// record yields the empty document, not an error.
    async fn fetch_options(&self, health_code: &str) -> Result<LegacyOptions>;
}

// ============================================================================
// Test utilities — shared fakes for in-crate tests
// ============================================================================
