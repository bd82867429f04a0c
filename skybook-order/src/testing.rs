//! In-memory collaborators for unit tests.

use async_trait::async_trait;
use skybook_core::{BankDirectory, BankInfoProvider, BookingGateway, GatewayError, GatewayResult, IpResolver};
use skybook_shared::{
    Bank, BankAccount, BookingReceipt, BookingRecord, BookingRequest, BookingStatus, ContactInfo, FlightType,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::settlement::{SettlementCheck, SettlementOutcome, SettlementRequest};

#[derive(Default)]
pub struct FakeBackend {
    failing: AtomicBool,
    submitted: Mutex<Vec<BookingRequest>>,
    history: Mutex<Vec<BookingRecord>>,
    pub history_calls: AtomicUsize,
}

impl FakeBackend {
    pub fn fail_requests(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn push_history(&self, record: BookingRecord) {
        self.history.lock().unwrap().push(record);
    }

    pub fn submitted(&self) -> Vec<BookingRequest> {
        self.submitted.lock().unwrap().clone()
    }

    fn check(&self) -> GatewayResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(GatewayError::ConnectionFailed("backend offline".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl BookingGateway for FakeBackend {
    async fn submit_booking(&self, request: &BookingRequest) -> GatewayResult<BookingReceipt> {
        self.check()?;
        let mut submitted = self.submitted.lock().unwrap();
        submitted.push(request.clone());
        Ok(BookingReceipt {
            id: Some(submitted.len() as i64),
            message: Some("Đặt chỗ thành công".to_string()),
        })
    }

    async fn booking_history(&self, _id_number: &str) -> GatewayResult<Vec<BookingRecord>> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.history.lock().unwrap().clone())
    }
}

#[async_trait]
impl BankInfoProvider for FakeBackend {
    async fn bank_account(&self) -> GatewayResult<BankAccount> {
        self.check()?;
        Ok(account())
    }
}

#[async_trait]
impl BankDirectory for FakeBackend {
    async fn find_by_bin(&self, bin: &str) -> GatewayResult<Option<Bank>> {
        self.check()?;
        Ok((bin == "970436").then(|| Bank {
            id: 43,
            name: "Ngân hàng TMCP Ngoại Thương Việt Nam".to_string(),
            code: "VCB".to_string(),
            bin: "970436".to_string(),
            short_name: "Vietcombank".to_string(),
            logo: "https://api.vietqr.io/img/VCB.png".to_string(),
            transfer_supported: 1,
            lookup_supported: 1,
        }))
    }
}

#[async_trait]
impl IpResolver for FakeBackend {
    async fn resolve_ip(&self) -> GatewayResult<String> {
        self.check()?;
        Ok("203.0.113.9".to_string())
    }
}

/// Settlement stub returning a fixed outcome and counting calls.
pub struct FixedSettlement {
    outcome: SettlementOutcome,
    pub calls: AtomicUsize,
}

impl FixedSettlement {
    pub fn new(outcome: SettlementOutcome) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl SettlementCheck for FixedSettlement {
    async fn check(&self, _request: &SettlementRequest) -> SettlementOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome
    }
}

pub fn account() -> BankAccount {
    BankAccount {
        bin: "970436".to_string(),
        account_number: "0123456789".to_string(),
        account_name: "NGUYEN VAN A".to_string(),
    }
}

pub fn record(flight_id: &str, status: BookingStatus) -> BookingRecord {
    BookingRecord {
        id: 1,
        ip: String::new(),
        flight_id: flight_id.to_string(),
        amount: 0.0,
        passengers: Vec::new(),
        contact_info: ContactInfo::new("a@example.com", "0987654321", "123456789012"),
        airline: String::new(),
        departure_time: String::new(),
        arrival_time: String::new(),
        from: String::new(),
        to: String::new(),
        date: String::new(),
        return_date: None,
        flight_type: FlightType::OneWay,
        status,
        created_at: None,
    }
}

pub const SELECTION_QS: &str = "flightId=VN213&airline=Vietnam+Airlines&departureTime=08%3A00\
    &arrivalTime=10%3A10&price=1000000&email=buyer%40example.com&passengerName=NGUYEN+VAN+A&from=SGN&to=HAN\
    &date=20%2F11%2F2026&flightType=one-way\
    &passengers=%7B%22adults%22%3A2%2C%22children%22%3A1%2C%22infants%22%3A1%7D";
