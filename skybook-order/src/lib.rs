pub mod contact;
pub mod flow;
pub mod models;
pub mod pricing;
pub mod qr;
pub mod session;
pub mod settlement;

#[cfg(test)]
pub(crate) mod testing;

pub use contact::ContactErrors;
pub use flow::{PaymentError, PaymentFlow, PaymentReference};
pub use models::{FlightSelection, PaymentState};
pub use pricing::PriceBreakdown;
pub use qr::{QrPayload, QrSettings};
pub use session::{Collaborators, FlightSummary, PaymentSession, PaymentSettings, SessionView};
pub use settlement::{settlement_for, SettlementCheck, SettlementMode, SettlementOutcome, SettlementRequest};
