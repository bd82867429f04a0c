//! HTTP client for the booking backend.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use skybook_core::{BankInfoProvider, BookingGateway, GatewayResult};
use skybook_shared::{BankAccount, BookingReceipt, BookingRecord, BookingRequest};
use tracing::{debug, info, instrument};

use crate::app_config::BackendConfig;
use crate::http::{build_client, read_json, request_failed};

#[derive(Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    data: Vec<BookingRecord>,
}

#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> GatewayResult<Self> {
        Ok(Self {
            client: build_client(config.timeout_secs)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl BookingGateway for BackendClient {
    #[instrument(skip_all, fields(flight_id = %request.flight_id))]
    async fn submit_booking(&self, request: &BookingRequest) -> GatewayResult<BookingReceipt> {
        let response = self
            .client
            .post(self.url("bookings"))
            .json(request)
            .send()
            .await
            .map_err(request_failed)?;
        let receipt: BookingReceipt = read_json(response).await?;
        info!(booking_id = ?receipt.id, "Booking accepted by backend");
        Ok(receipt)
    }

    #[instrument(skip_all)]
    async fn booking_history(&self, id_number: &str) -> GatewayResult<Vec<BookingRecord>> {
        let response = self
            .client
            .get(self.url("history-booking"))
            .query(&[("idNumber", id_number)])
            .send()
            .await
            .map_err(request_failed)?;
        let history: HistoryResponse = read_json(response).await?;
        debug!(records = history.data.len(), "Fetched booking history");
        Ok(history.data)
    }
}

#[async_trait]
impl BankInfoProvider for BackendClient {
    async fn bank_account(&self) -> GatewayResult<BankAccount> {
        let response = self
            .client
            .get(self.url("bank-info"))
            .send()
            .await
            .map_err(request_failed)?;
        read_json(response).await
    }
}
