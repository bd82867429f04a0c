//! Contracts for the external collaborators the booking flow talks to.
//!
//! Implementations live in `skybook-store`; tests substitute in-memory fakes.

use async_trait::async_trait;
use skybook_shared::{Bank, BankAccount, BookingReceipt, BookingRecord, BookingRequest};

#[derive(Debug, Clone, thiserror::Error)]
pub enum GatewayError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
    #[error("Could not decode response: {0}")]
    Decode(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// The booking backend: submission and per-customer history.
#[async_trait]
pub trait BookingGateway: Send + Sync {
    /// `POST bookings`
    async fn submit_booking(&self, request: &BookingRequest) -> GatewayResult<BookingReceipt>;

    /// `GET history-booking?idNumber=`
    async fn booking_history(&self, id_number: &str) -> GatewayResult<Vec<BookingRecord>>;
}

/// The receiving bank account used to build the payment QR.
#[async_trait]
pub trait BankInfoProvider: Send + Sync {
    async fn bank_account(&self) -> GatewayResult<BankAccount>;
}

/// Third-party bank list, used only for display metadata.
#[async_trait]
pub trait BankDirectory: Send + Sync {
    async fn find_by_bin(&self, bin: &str) -> GatewayResult<Option<Bank>>;
}

/// Resolves the caller's public IP for the booking audit trail.
#[async_trait]
pub trait IpResolver: Send + Sync {
    async fn resolve_ip(&self) -> GatewayResult<String>;
}
