//! A live payment: the flow, its collaborators and the settlement countdown.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skybook_core::timer::{countdown_label, Countdown};
use skybook_core::{BankDirectory, BankInfoProvider, BookingGateway, IpResolver};
use skybook_shared::{Bank, ContactInfo, FlightType, PassengerTally};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

use crate::flow::{PaymentError, PaymentFlow, PaymentReference};
use crate::models::{FlightSelection, PaymentState};
use crate::pricing::PriceBreakdown;
use crate::qr::QrSettings;
use crate::settlement::{SettlementCheck, SettlementMode, SettlementOutcome};

fn default_countdown_seconds() -> u64 {
    60
}

fn default_session_ttl_seconds() -> u64 {
    900
}

fn default_history_path() -> String {
    "/tra-cuu-lich-su-dat-ve".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentSettings {
    #[serde(default = "default_countdown_seconds")]
    pub countdown_seconds: u64,
    /// Idle time after which a session not awaiting settlement is dropped.
    #[serde(default = "default_session_ttl_seconds")]
    pub session_ttl_seconds: u64,
    #[serde(default)]
    pub settlement: SettlementMode,
    #[serde(default = "default_history_path")]
    pub history_path: String,
    #[serde(default)]
    pub qr: QrSettings,
}

impl Default for PaymentSettings {
    fn default() -> Self {
        Self {
            countdown_seconds: default_countdown_seconds(),
            session_ttl_seconds: default_session_ttl_seconds(),
            settlement: SettlementMode::default(),
            history_path: default_history_path(),
            qr: QrSettings::default(),
        }
    }
}

#[derive(Clone)]
pub struct Collaborators {
    pub bookings: Arc<dyn BookingGateway>,
    pub bank_info: Arc<dyn BankInfoProvider>,
    pub banks: Arc<dyn BankDirectory>,
    pub ip: Arc<dyn IpResolver>,
    pub settlement: Arc<dyn SettlementCheck>,
}

struct SessionInner {
    flow: PaymentFlow,
    countdown: Option<Countdown>,
    bank: Option<Bank>,
    touched_at: Instant,
}

/// Flight summary echoed back on every view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightSummary {
    pub flight_id: String,
    pub airline: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub from: String,
    pub to: String,
    pub date: String,
    pub return_date: Option<String>,
    pub flight_type: FlightType,
    pub passengers: PassengerTally,
}

impl From<&FlightSelection> for FlightSummary {
    fn from(s: &FlightSelection) -> Self {
        Self {
            flight_id: s.flight_id.clone(),
            airline: s.airline.clone(),
            departure_time: s.departure_time.clone(),
            arrival_time: s.arrival_time.clone(),
            from: s.from.clone(),
            to: s.to.clone(),
            date: s.date.clone(),
            return_date: s.return_date.clone(),
            flight_type: if s.is_round_trip() { FlightType::RoundTrip } else { FlightType::OneWay },
            passengers: s.passengers,
        }
    }
}

/// Snapshot of a session for rendering.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: Uuid,
    pub state: PaymentState,
    pub notice: &'static str,
    pub opened_at: DateTime<Utc>,
    pub flight: FlightSummary,
    pub price: PriceBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_seconds: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub countdown: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank: Option<Bank>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_path: Option<String>,
}

pub struct PaymentSession {
    id: Uuid,
    opened_at: DateTime<Utc>,
    ip: String,
    settings: PaymentSettings,
    collaborators: Collaborators,
    inner: Mutex<SessionInner>,
}

impl PaymentSession {
    /// Opens a session for the selected flight. An IP lookup failure is
    /// recorded as an empty address.
    pub async fn open(
        selection: FlightSelection,
        collaborators: Collaborators,
        settings: PaymentSettings,
    ) -> Arc<Self> {
        let ip = match collaborators.ip.resolve_ip().await {
            Ok(ip) => ip,
            Err(e) => {
                warn!("IP lookup failed, continuing without it: {}", e);
                String::new()
            }
        };

        let flow = PaymentFlow::new(selection, settings.qr.clone());
        let session = Arc::new(Self {
            id: Uuid::new_v4(),
            opened_at: Utc::now(),
            ip,
            settings,
            collaborators,
            inner: Mutex::new(SessionInner {
                flow,
                countdown: None,
                bank: None,
                touched_at: Instant::now(),
            }),
        });
        info!(session_id = %session.id, "Payment session opened");
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub async fn state(&self) -> PaymentState {
        self.inner.lock().await.flow.state()
    }

    pub async fn confirm(&self) -> PaymentState {
        let mut inner = self.inner.lock().await;
        inner.touched_at = Instant::now();
        inner.flow.confirm()
    }

    /// Whether the session has sat untouched for the configured TTL. A
    /// session awaiting settlement never expires before its countdown fires.
    pub async fn is_expired(&self) -> bool {
        let inner = self.inner.lock().await;
        inner.flow.state() != PaymentState::AwaitingSettlement
            && inner.touched_at.elapsed() >= Duration::from_secs(self.settings.session_ttl_seconds)
    }

    /// Submits the contact and, on success, starts the settlement countdown.
    pub async fn submit_contact(self: &Arc<Self>, contact: ContactInfo) -> Result<PaymentState, PaymentError> {
        let mut inner = self.inner.lock().await;
        inner.touched_at = Instant::now();
        let before = inner.flow.state();
        let state = inner
            .flow
            .submit_contact(
                contact,
                &self.ip,
                self.collaborators.bank_info.as_ref(),
                self.collaborators.bookings.as_ref(),
            )
            .await?;

        if before == PaymentState::CollectingContact && state == PaymentState::AwaitingSettlement {
            if let Some(bin) = inner.flow.reference().map(|r| r.account.bin.clone()) {
                inner.bank = self.lookup_bank(&bin).await;
            }

            let session = Arc::downgrade(self);
            let duration = Duration::from_secs(self.settings.countdown_seconds);
            inner.countdown = Some(Countdown::start(duration, async move {
                if let Some(session) = session.upgrade() {
                    session.settle().await;
                }
            }));
            info!(session_id = %self.id, seconds = self.settings.countdown_seconds, "Settlement countdown started");
        }
        Ok(state)
    }

    /// Runs the settlement check once the countdown expires.
    async fn settle(&self) {
        let mut inner = self.inner.lock().await;
        let Some(request) = inner.flow.settlement_request() else {
            return;
        };
        if inner.flow.state() != PaymentState::AwaitingSettlement {
            return;
        }
        let outcome = self.collaborators.settlement.check(&request).await;
        inner.touched_at = Instant::now();
        if let Err(e) = inner.flow.resolve(outcome) {
            warn!(session_id = %self.id, "Settlement ignored: {}", e);
        }
        if outcome == SettlementOutcome::TimedOut {
            info!(session_id = %self.id, "Payment window closed without settlement");
        }
    }

    /// Aborts the flow and stops the countdown.
    pub async fn cancel(&self) -> PaymentState {
        let mut inner = self.inner.lock().await;
        if let Some(countdown) = inner.countdown.as_mut() {
            countdown.cancel();
        }
        inner.touched_at = Instant::now();
        inner.flow.abort()
    }

    pub async fn view(&self) -> SessionView {
        let inner = self.inner.lock().await;
        let flow = &inner.flow;
        let remaining = match (flow.state(), inner.countdown.as_ref()) {
            (PaymentState::AwaitingSettlement, Some(countdown)) => Some(countdown.remaining()),
            _ => None,
        };
        let history_path = match flow.state() {
            PaymentState::Completed | PaymentState::TimedOut => flow.history_path(&self.settings.history_path),
            _ => None,
        };

        SessionView {
            id: self.id,
            state: flow.state(),
            notice: flow.notice(),
            opened_at: self.opened_at,
            flight: FlightSummary::from(flow.selection()),
            price: *flow.price(),
            remaining_seconds: remaining.map(|r| r.as_secs() + u64::from(r.subsec_nanos() > 0)),
            countdown: remaining.map(countdown_label),
            payment: flow.reference().cloned(),
            bank: inner.bank.clone(),
            history_path,
        }
    }

    async fn lookup_bank(&self, bin: &str) -> Option<Bank> {
        match self.collaborators.banks.find_by_bin(bin).await {
            Ok(bank) => bank,
            Err(e) => {
                warn!(session_id = %self.id, bin, "Bank directory unavailable: {}", e);
                None
            }
        }
    }
}
