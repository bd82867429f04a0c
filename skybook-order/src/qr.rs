use serde::Deserialize;
use skybook_shared::BankAccount;

fn default_base_url() -> String {
    "https://img.vietqr.io/image".to_string()
}

fn default_template() -> String {
    "qr_only".to_string()
}

/// Where payment QR images are rendered.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QrSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_template")]
    pub template: String,
}

impl Default for QrSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            template: default_template(),
        }
    }
}

/// A VietQR transfer: receiving account, amount and transfer memo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrPayload {
    pub bin: String,
    pub account_number: String,
    pub amount: i64,
    pub description: String,
    pub account_name: String,
}

impl QrPayload {
    pub fn new(account: &BankAccount, amount: i64, description: impl Into<String>) -> Self {
        Self {
            bin: account.bin.clone(),
            account_number: account.account_number.clone(),
            amount,
            description: description.into(),
            account_name: account.account_name.clone(),
        }
    }

    /// `{base}/{bin}-{account}-{template}.png?amount=..&addInfo=..&accountName=..`
    pub fn url(&self, settings: &QrSettings) -> String {
        format!(
            "{}/{}-{}-{}.png?amount={}&addInfo={}&accountName={}",
            settings.base_url.trim_end_matches('/'),
            self.bin,
            self.account_number,
            settings.template,
            self.amount,
            urlencoding::encode(&self.description),
            urlencoding::encode(&self.account_name),
        )
    }
}
