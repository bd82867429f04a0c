use serde::Serialize;
use skybook_core::{BankInfoProvider, BookingGateway, GatewayError};
use skybook_shared::{BankAccount, BookedPassenger, BookingRequest, ContactInfo, PassengerKind};
use tracing::{info, warn};

use crate::contact::{self, ContactErrors};
use crate::models::{FlightSelection, PaymentState};
use crate::pricing::PriceBreakdown;
use crate::qr::{QrPayload, QrSettings};
use crate::settlement::{SettlementOutcome, SettlementRequest};

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("Invalid contact details: {0}")]
    Validation(ContactErrors),
    #[error("Booking could not be submitted: {0}")]
    Collaborator(#[from] GatewayError),
    #[error("Invalid state transition from {from:?} to {to:?}")]
    InvalidTransition { from: PaymentState, to: PaymentState },
}

/// What the customer needs to make the transfer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReference {
    pub qr_code_url: String,
    pub amount: i64,
    pub description: String,
    pub account: BankAccount,
    pub booking_id: Option<i64>,
}

/// Payment state machine for one selected flight.
///
/// Idle -> CollectingContact -> AwaitingSettlement -> Completed | TimedOut.
/// Any non-terminal state may be aborted.
#[derive(Debug)]
pub struct PaymentFlow {
    state: PaymentState,
    selection: FlightSelection,
    price: PriceBreakdown,
    qr: QrSettings,
    contact: Option<ContactInfo>,
    reference: Option<PaymentReference>,
}

impl PaymentFlow {
    pub fn new(selection: FlightSelection, qr: QrSettings) -> Self {
        let price = PriceBreakdown::compute(selection.price, &selection.passengers);
        Self {
            state: PaymentState::Idle,
            selection,
            price,
            qr,
            contact: None,
            reference: None,
        }
    }

    pub fn state(&self) -> PaymentState {
        self.state
    }

    pub fn selection(&self) -> &FlightSelection {
        &self.selection
    }

    pub fn price(&self) -> &PriceBreakdown {
        &self.price
    }

    pub fn contact(&self) -> Option<&ContactInfo> {
        self.contact.as_ref()
    }

    pub fn reference(&self) -> Option<&PaymentReference> {
        self.reference.as_ref()
    }

    /// Opens the contact form. Ignored outside `Idle`.
    pub fn confirm(&mut self) -> PaymentState {
        if self.state == PaymentState::Idle {
            self.state = PaymentState::CollectingContact;
        }
        self.state
    }

    /// Validates the contact, builds the QR and submits the booking.
    ///
    /// Only a successful submission advances to `AwaitingSettlement`; a
    /// repeated submit while awaiting is ignored. A blank email is taken
    /// from the selection.
    pub async fn submit_contact(
        &mut self,
        mut contact: ContactInfo,
        ip: &str,
        bank_info: &dyn BankInfoProvider,
        bookings: &dyn BookingGateway,
    ) -> Result<PaymentState, PaymentError> {
        match self.state {
            PaymentState::CollectingContact => {}
            PaymentState::AwaitingSettlement => return Ok(self.state),
            from => {
                return Err(PaymentError::InvalidTransition {
                    from,
                    to: PaymentState::AwaitingSettlement,
                })
            }
        }

        if contact.email.trim().is_empty() {
            contact.email = self.selection.email.clone();
        }

        // 1. Validate
        contact::validate(&contact).map_err(PaymentError::Validation)?;

        // 2. Receiving account and QR
        let account = bank_info.bank_account().await.map_err(|e| {
            warn!(flight_id = %self.selection.flight_id, "Bank info unavailable: {}", e);
            e
        })?;
        let description = self.selection.flight_id.clone();
        let qr_code_url = QrPayload::new(&account, self.price.total, description.clone()).url(&self.qr);

        // 3. Submit booking
        let request = self.booking_request(&contact, ip, &qr_code_url);
        let receipt = bookings.submit_booking(&request).await.map_err(|e| {
            warn!(flight_id = %self.selection.flight_id, "Booking submission failed: {}", e);
            e
        })?;

        info!(
            flight_id = %self.selection.flight_id,
            amount = self.price.total,
            booking_id = ?receipt.id,
            "Booking submitted, awaiting transfer"
        );

        self.reference = Some(PaymentReference {
            qr_code_url,
            amount: self.price.total,
            description,
            account,
            booking_id: receipt.id,
        });
        self.contact = Some(contact);
        self.state = PaymentState::AwaitingSettlement;
        Ok(self.state)
    }

    /// Applies the settlement outcome. Only valid while awaiting.
    pub fn resolve(&mut self, outcome: SettlementOutcome) -> Result<PaymentState, PaymentError> {
        let to = match outcome {
            SettlementOutcome::Completed => PaymentState::Completed,
            SettlementOutcome::TimedOut => PaymentState::TimedOut,
        };
        if self.state != PaymentState::AwaitingSettlement {
            return Err(PaymentError::InvalidTransition { from: self.state, to });
        }
        info!(flight_id = %self.selection.flight_id, state = ?to, "Payment settled");
        self.state = to;
        Ok(self.state)
    }

    /// Dismisses the flow. Terminal states are kept as they are.
    pub fn abort(&mut self) -> PaymentState {
        if !self.state.is_terminal() {
            info!(flight_id = %self.selection.flight_id, from = ?self.state, "Payment aborted");
            self.state = PaymentState::Aborted;
        }
        self.state
    }

    pub fn settlement_request(&self) -> Option<SettlementRequest> {
        let contact = self.contact.as_ref()?;
        Some(SettlementRequest {
            flight_id: self.selection.flight_id.clone(),
            id_number: contact.id_number.expose().clone(),
            amount: self.price.total,
        })
    }

    /// Booking-history link for the submitted citizen id.
    pub fn history_path(&self, base: &str) -> Option<String> {
        let contact = self.contact.as_ref()?;
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("tim_kiem", contact.id_number.expose())
            .finish();
        Some(format!("{}?{}", base, query))
    }

    /// Heading shown for the current state.
    pub fn notice(&self) -> &'static str {
        match self.state {
            PaymentState::Idle => "Thanh toán",
            PaymentState::CollectingContact => "Thông tin liên hệ",
            PaymentState::AwaitingSettlement => "Vui lòng hoàn tất thanh toán",
            PaymentState::Completed => "Đặt vé thành công. Vui lòng kiểm tra email để xem chi tiết.",
            PaymentState::TimedOut => "Đã hết thời gian thanh toán. Vui lòng kiểm tra lịch sử đặt vé.",
            PaymentState::Aborted => "Đã hủy thanh toán",
        }
    }

    fn booking_request(&self, contact: &ContactInfo, ip: &str, qr_code_url: &str) -> BookingRequest {
        let s = &self.selection;
        let passengers = [PassengerKind::Adult, PassengerKind::Child, PassengerKind::Infant]
            .into_iter()
            .flat_map(|kind| {
                let name = s.passenger_name.clone();
                std::iter::repeat_with(move || BookedPassenger {
                    kind,
                    name: name.clone(),
                })
                .take(s.passengers.get(kind) as usize)
            })
            .collect();

        BookingRequest {
            ip: ip.to_string(),
            flight_id: s.flight_id.clone(),
            amount: self.price.total,
            passengers,
            contact_info: contact.clone(),
            airline: s.airline.clone(),
            departure_time: s.departure_time.clone(),
            arrival_time: s.arrival_time.clone(),
            from: s.from.clone(),
            to: s.to.clone(),
            date: s.date.clone(),
            flight_type: s.flight_type,
            return_date: s.return_date.clone(),
            qr_code_url: qr_code_url.to_string(),
        }
    }
}
