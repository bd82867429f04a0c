//! Decides how a payment window ends once its countdown expires.

use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};
use skybook_core::BookingGateway;
use skybook_shared::BookingStatus;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SettlementOutcome {
    Completed,
    TimedOut,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementMode {
    /// Ask the backend whether the booking was marked paid.
    #[default]
    BookingStatus,
    /// Coin flip, for demos without a backend that confirms transfers.
    Simulated,
}

/// What a settlement check needs to know about the booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementRequest {
    pub flight_id: String,
    pub id_number: String,
    pub amount: i64,
}

#[async_trait]
pub trait SettlementCheck: Send + Sync {
    async fn check(&self, request: &SettlementRequest) -> SettlementOutcome;
}

pub struct SimulatedSettlement;

#[async_trait]
impl SettlementCheck for SimulatedSettlement {
    async fn check(&self, request: &SettlementRequest) -> SettlementOutcome {
        let completed = rand::thread_rng().gen_bool(0.5);
        info!(flight_id = %request.flight_id, completed, "Simulated settlement");
        if completed {
            SettlementOutcome::Completed
        } else {
            SettlementOutcome::TimedOut
        }
    }
}

/// Completed only when the customer's history holds a successful booking
/// for the same flight.
pub struct BookingStatusSettlement {
    gateway: Arc<dyn BookingGateway>,
}

impl BookingStatusSettlement {
    pub fn new(gateway: Arc<dyn BookingGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl SettlementCheck for BookingStatusSettlement {
    async fn check(&self, request: &SettlementRequest) -> SettlementOutcome {
        match self.gateway.booking_history(&request.id_number).await {
            Ok(records) => {
                let paid = records
                    .iter()
                    .any(|r| r.flight_id == request.flight_id && r.status == BookingStatus::Success);
                info!(flight_id = %request.flight_id, paid, "Checked booking status");
                if paid {
                    SettlementOutcome::Completed
                } else {
                    SettlementOutcome::TimedOut
                }
            }
            Err(e) => {
                warn!(flight_id = %request.flight_id, "Booking history unavailable: {}", e);
                SettlementOutcome::TimedOut
            }
        }
    }
}

pub fn settlement_for(mode: SettlementMode, gateway: Arc<dyn BookingGateway>) -> Arc<dyn SettlementCheck> {
    match mode {
        SettlementMode::BookingStatus => Arc::new(BookingStatusSettlement::new(gateway)),
        SettlementMode::Simulated => Arc::new(SimulatedSettlement),
    }
}
