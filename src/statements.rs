//! SQL statement builders for one account's migration.
//!
//! These are pure functions so the exact statement text is testable without
//! a database. Output is byte-stable: fixed field order, fixed spacing.

use crate::options::{
    DATA_GROUPS, EMAIL_NOTIFICATIONS, EXTERNAL_IDENTIFIER, LANGUAGES, LegacyOptions,
    SHARING_SCOPE, TIME_ZONE,
};

/// The single `UPDATE Accounts` statement for one account.
///
/// Optional assignments are included only when the source field carries a
/// meaningful value; `notifyByEmail` (defaulting to true) and the
/// `migrationVersion = 1` completion marker are always set, so even an
/// empty document still marks the account migrated.
pub fn account_update_sql(account_id: &str, options: &LegacyOptions) -> String {
    let mut sql = String::from("UPDATE Accounts SET ");

    if let Some(external_id) = options.get_string(EXTERNAL_IDENTIFIER) {
        sql.push_str(&format!("externalId = {}, ", quoted(external_id)));
    }
    if let Some(scope) = options.get_string(SHARING_SCOPE) {
        sql.push_str(&format!("sharingScope = {}, ", quoted(scope)));
    }
    if let Some(zone) = options.get_string(TIME_ZONE) {
        sql.push_str(&format!("timeZone = {}, ", quoted(zone)));
    }

    let notify_by_email = options.get_boolean(EMAIL_NOTIFICATIONS, true);
    sql.push_str(&format!("notifyByEmail = {}, ", notify_by_email));
    sql.push_str(&format!("migrationVersion = 1 WHERE id = {};", quoted(account_id)));
    sql
}

/// One `AccountLanguages` insert per language, in source order.
pub fn language_inserts_sql(account_id: &str, options: &LegacyOptions) -> Vec<String> {
    options
        .get_list(LANGUAGES)
        .into_iter()
        .map(|language| {
            format!(
                "INSERT INTO AccountLanguages (accountId, language) VALUES ({},{});",
                quoted(account_id),
                quoted(language)
            )
        })
        .collect()
}

/// One `AccountDataGroups` insert per data group, in source order.
pub fn data_group_inserts_sql(account_id: &str, options: &LegacyOptions) -> Vec<String> {
    options
        .get_list(DATA_GROUPS)
        .into_iter()
        .map(|group| {
            format!(
                "INSERT INTO AccountDataGroups (accountId, dataGroup) VALUES ({},{});",
                quoted(account_id),
                quoted(group)
            )
        })
        .collect()
}

/// The full ordered batch for one account: the update first, then language
/// inserts, then data-group inserts.
pub fn migration_statements(account_id: &str, options: &LegacyOptions) -> Vec<String> {
    let mut statements = vec![account_update_sql(account_id, options)];
    statements.extend(language_inserts_sql(account_id, options));
    statements.extend(data_group_inserts_sql(account_id, options));
    statements
}

/// Single-quote a value, doubling embedded quotes so source data cannot
/// break out of the literal.
fn quoted(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
