use super::OptionsStore;
use crate::options::LegacyOptions;
use anyhow::{Context, Result};
use aws_sdk_dynamodb::{Client, types::AttributeValue};

const HEALTH_CODE_KEY: &str = "healthDataCode";
const DATA_ATTRIBUTE: &str = "data";
const STUDY_KEY_ATTRIBUTE: &str = "studyKey";

// ============================================================================
// DynamoOptionsStore — DynamoDB-backed OptionsStore implementation
// ============================================================================

pub struct DynamoOptionsStore {
    client: Client,
    table_name: String,
}

impl DynamoOptionsStore {
    pub fn new(client: Client, table_name: String) -> Self {
        Self { client, table_name }
    }
}

impl OptionsStore for DynamoOptionsStore {
    async fn fetch_options(&self, health_code: &str) -> Result<LegacyOptions> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(HEALTH_CODE_KEY, AttributeValue::S(health_code.to_string()))
            .attributes_to_get(DATA_ATTRIBUTE)
            .attributes_to_get(STUDY_KEY_ATTRIBUTE)
            .send()
            .await
            .context("Failed to fetch legacy options record")?;

        // Accounts that never stored options have no record at all; they
        // still get the defaults-only update.
        let Some(item) = output.item else {
            return Ok(LegacyOptions::empty());
        };

        let raw = item
            .get(DATA_ATTRIBUTE)
            .and_then(|v| v.as_s().ok())
            .ok_or_else(|| {
                anyhow::anyhow!("Options record is missing its '{}' attribute", DATA_ATTRIBUTE)
            })?;

        LegacyOptions::from_json(raw)
    }
}
