use async_trait::async_trait;
use reqwest::Client;
use skybook_core::{GatewayError, GatewayResult, IpResolver};

use crate::app_config::IpLookupConfig;
use crate::http::{build_client, ensure_success, request_failed};

/// Plain-text public IP lookup.
pub struct GeoJsIpResolver {
    client: Client,
    url: String,
}

impl GeoJsIpResolver {
    pub fn new(config: &IpLookupConfig) -> GatewayResult<Self> {
        Ok(Self {
            client: build_client(config.timeout_secs)?,
            url: config.url.clone(),
        })
    }
}

#[async_trait]
impl IpResolver for GeoJsIpResolver {
    async fn resolve_ip(&self) -> GatewayResult<String> {
        let response = self.client.get(&self.url).send().await.map_err(request_failed)?;
        let body = ensure_success(response)
            .await?
            .text()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))?;
        Ok(body.trim().to_string())
    }
}
