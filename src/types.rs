/// One row of the candidate-selection query: an account whose completion
/// marker is not yet set, plus the health code linking it to its key-value
/// record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountCandidate {
    pub account_id: String,
    pub health_code: String,
}

impl AccountCandidate {
    pub fn new(account_id: impl Into<String>, health_code: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            health_code: health_code.into(),
        }
    }
}

/// Outcome counts for one migration run. Failed accounts keep their
/// completion marker unset and are selected again on the next run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub selected: usize,
    pub migrated: usize,
    pub failed: usize,
}
