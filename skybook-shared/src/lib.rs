pub mod models;
pub mod pii;

pub use models::bank::{Bank, BankAccount};
pub use models::booking::{
    BookedPassenger, BookingReceipt, BookingRecord, BookingRequest, BookingStatus, ContactInfo,
    FlightType,
};
pub use models::location::{Coordinates, Country, InvalidCoordinates, Location, Region};
pub use models::passengers::{PassengerCounts, PassengerKind, PassengerTally, Step};
pub use pii::Masked;
