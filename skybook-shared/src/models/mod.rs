pub mod bank;
pub mod booking;
pub mod location;
pub mod passengers;
