pub mod directory;
pub mod form;
pub mod gateway;
pub mod geo;
pub mod search;
pub mod timer;

pub use directory::LocationDirectory;
pub use form::{BookingForm, FlightQuery, FocusRegion, Viewport};
pub use gateway::{BankDirectory, BankInfoProvider, BookingGateway, GatewayError, GatewayResult, IpResolver};
pub use geo::{FlightEstimate, FlightTime};
pub use search::{LocationSearchWidget, RouteSelection, SearchSettings, SearchView, Slot};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Directory could not be loaded: {0}")]
    DirectoryError(String),
    #[error("Internal service error: {0}")]
    InternalError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
