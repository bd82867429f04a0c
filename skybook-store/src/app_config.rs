use serde::Deserialize;
use skybook_core::SearchSettings;
use skybook_order::{PaymentSettings, QrSettings};
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    #[serde(default)]
    pub bank_directory: BankDirectoryConfig,
    #[serde(default)]
    pub ip_lookup: IpLookupConfig,
    #[serde(default)]
    pub qr: QrSettings,
    #[serde(default)]
    pub payment: PaymentSettings,
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BankDirectoryConfig {
    #[serde(default = "default_bank_directory_url")]
    pub url: String,
    #[serde(default = "default_cache_ttl_hours")]
    pub cache_ttl_hours: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct IpLookupConfig {
    #[serde(default = "default_ip_lookup_url")]
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_country")]
    pub default_country: String,
    /// Location table to load instead of the built-in one.
    pub directory_path: Option<String>,
}

impl SearchConfig {
    pub fn settings(&self) -> SearchSettings {
        SearchSettings {
            debounce_ms: self.debounce_ms,
            default_country: self.default_country.clone(),
        }
    }
}

fn default_timeout_secs() -> u64 { 10 }
fn default_debounce_ms() -> u64 { SearchSettings::default().debounce_ms }
fn default_country() -> String { SearchSettings::default().default_country }
fn default_cache_ttl_hours() -> u64 { 24 }
fn default_bank_directory_url() -> String { "https://api.vietqr.io/v2/banks".into() }
fn default_ip_lookup_url() -> String { "https://get.geojs.io/v1/ip".into() }

impl Default for BankDirectoryConfig {
    fn default() -> Self {
        Self {
            url: default_bank_directory_url(),
            cache_ttl_hours: default_cache_ttl_hours(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            default_country: default_country(),
            directory_path: None,
        }
    }
}

impl Default for IpLookupConfig {
    fn default() -> Self {
        Self {
            url: default_ip_lookup_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. `SKYBOOK__PAYMENT__SETTLEMENT=simulated`
            .add_source(config::Environment::with_prefix("SKYBOOK").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    /// Payment settings with the top-level `qr` section applied.
    pub fn payment_settings(&self) -> PaymentSettings {
        PaymentSettings {
            qr: self.qr.clone(),
            ..self.payment.clone()
        }
    }
}
