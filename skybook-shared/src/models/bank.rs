use serde::{Deserialize, Serialize};

/// Receiving account returned by `GET bank-info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAccount {
    pub bin: String,
    pub account_number: String,
    pub account_name: String,
}

/// Display metadata for a bank from the public bank directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bank {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub code: String,
    pub bin: String,
    #[serde(default)]
    pub short_name: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub transfer_supported: i32,
    #[serde(default)]
    pub lookup_supported: i32,
}
