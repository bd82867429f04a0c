use serde::Serialize;
use skybook_shared::PassengerTally;

pub const CHILD_FARE_RATIO: f64 = 0.75;
pub const INFANT_FARE_RATIO: f64 = 0.1;

/// Fare per passenger type and the amount to transfer, in VND.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub base_price: f64,
    pub adults: f64,
    pub children: f64,
    pub infants: f64,
    pub total: i64,
}

impl PriceBreakdown {
    pub fn compute(base_price: f64, passengers: &PassengerTally) -> Self {
        let adults = base_price * f64::from(passengers.adults);
        let children = base_price * CHILD_FARE_RATIO * f64::from(passengers.children);
        let infants = base_price * INFANT_FARE_RATIO * f64::from(passengers.infants);
        Self {
            base_price,
            adults,
            children,
            infants,
            total: (adults + children + infants).round() as i64,
        }
    }
}
