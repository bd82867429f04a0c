//! Public VietQR bank list, cached in memory.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use skybook_core::{BankDirectory, GatewayError, GatewayResult};
use skybook_shared::Bank;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::app_config::BankDirectoryConfig;
use crate::http::{build_client, read_json, request_failed};

#[derive(Deserialize)]
struct BankListResponse {
    code: String,
    #[serde(default)]
    desc: String,
    #[serde(default)]
    data: Vec<Bank>,
}

struct CachedBanks {
    fetched_at: Instant,
    banks: Vec<Bank>,
}

pub struct VietQrBankDirectory {
    client: Client,
    url: String,
    ttl: Duration,
    cache: RwLock<Option<CachedBanks>>,
}

impl VietQrBankDirectory {
    pub fn new(config: &BankDirectoryConfig) -> GatewayResult<Self> {
        Ok(Self {
            client: build_client(config.timeout_secs)?,
            url: config.url.clone(),
            ttl: Duration::from_secs(config.cache_ttl_hours * 3600),
            cache: RwLock::new(None),
        })
    }

    /// The full list, refetched once the cached copy is older than the TTL.
    /// A failed refresh keeps serving the stale list if there is one.
    pub async fn banks(&self) -> GatewayResult<Vec<Bank>> {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.fetched_at.elapsed() < self.ttl {
                    return Ok(cached.banks.clone());
                }
            }
        }

        let mut cache = self.cache.write().await;
        // Another caller may have refreshed while we waited.
        if let Some(cached) = cache.as_ref() {
            if cached.fetched_at.elapsed() < self.ttl {
                return Ok(cached.banks.clone());
            }
        }

        match self.fetch().await {
            Ok(banks) => {
                info!(count = banks.len(), "Bank directory refreshed");
                *cache = Some(CachedBanks {
                    fetched_at: Instant::now(),
                    banks: banks.clone(),
                });
                Ok(banks)
            }
            Err(e) => match cache.as_ref() {
                Some(stale) => {
                    warn!("Bank directory refresh failed, serving cached list: {}", e);
                    Ok(stale.banks.clone())
                }
                None => Err(e),
            },
        }
    }

    async fn fetch(&self) -> GatewayResult<Vec<Bank>> {
        let response = self.client.get(&self.url).send().await.map_err(request_failed)?;
        let list: BankListResponse = read_json(response).await?;
        if list.code != "00" {
            return Err(GatewayError::UnexpectedStatus {
                status: 200,
                body: format!("{}: {}", list.code, list.desc),
            });
        }
        Ok(list.data)
    }
}

#[async_trait]
impl BankDirectory for VietQrBankDirectory {
    async fn find_by_bin(&self, bin: &str) -> GatewayResult<Option<Bank>> {
        Ok(self.banks().await?.into_iter().find(|b| b.bin == bin))
    }
}
