pub mod app_config;
pub mod backend;
pub mod bank_directory;
mod http;
pub mod ip_lookup;

pub use app_config::Config;
pub use backend::BackendClient;
pub use bank_directory::VietQrBankDirectory;
pub use ip_lookup::GeoJsIpResolver;
