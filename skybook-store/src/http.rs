use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use skybook_core::{GatewayError, GatewayResult};
use std::time::Duration;

pub(crate) fn build_client(timeout_secs: u64) -> GatewayResult<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| GatewayError::ConnectionFailed(e.to_string()))
}

pub(crate) fn request_failed(e: reqwest::Error) -> GatewayError {
    GatewayError::ConnectionFailed(e.to_string())
}

/// Rejects non-2xx responses, keeping the body for the error message.
pub(crate) async fn ensure_success(response: Response) -> GatewayResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(GatewayError::UnexpectedStatus {
        status: status.as_u16(),
        body,
    })
}

pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> GatewayResult<T> {
    ensure_success(response)
        .await?
        .json::<T>()
        .await
        .map_err(|e| GatewayError::Decode(e.to_string()))
}
