use serde::{Deserialize, Serialize};
use skybook_shared::{FlightType, PassengerCounts, PassengerTally};

/// Most passengers of one type a single booking may carry.
pub const MAX_PASSENGERS_PER_TYPE: u32 = 9;

/// Payment flow lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaymentState {
    Idle,
    CollectingContact,
    AwaitingSettlement,
    Completed,
    TimedOut,
    /// Dismissed before reaching an outcome.
    Aborted,
}

impl PaymentState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PaymentState::Completed | PaymentState::TimedOut | PaymentState::Aborted
        )
    }
}

/// The flight picked on the results page, as carried on the payment URL.
///
/// Parsing never fails: absent or malformed values become empty strings or
/// zero, so a missing price yields a zero total rather than an error.
/// Passenger numbers that break the picker rules or exceed
/// [`MAX_PASSENGERS_PER_TYPE`] count as malformed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightSelection {
    pub flight_id: String,
    pub airline: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub price: f64,
    pub email: String,
    pub passenger_name: String,
    pub from: String,
    pub to: String,
    pub date: String,
    pub return_date: Option<String>,
    pub flight_type: FlightType,
    pub passengers: PassengerTally,
}

impl FlightSelection {
    pub fn from_query_string(query: &str) -> Self {
        let mut selection = Self::default();
        for (key, value) in url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
            let value = value.into_owned();
            match key.as_ref() {
                "flightId" => selection.flight_id = value,
                "airline" => selection.airline = value,
                "departureTime" => selection.departure_time = value,
                "arrivalTime" => selection.arrival_time = value,
                "price" => {
                    selection.price = value
                        .trim()
                        .parse::<f64>()
                        .ok()
                        .filter(|p| p.is_finite())
                        .unwrap_or(0.0)
                }
                "email" => selection.email = value,
                "passengerName" => selection.passenger_name = value,
                "from" => selection.from = value,
                "to" => selection.to = value,
                "date" => selection.date = value,
                "returnDate" if !value.is_empty() => selection.return_date = Some(value),
                "flightType" => selection.flight_type = FlightType::from_param(&value),
                "passengers" => selection.passengers = parse_passengers(&value),
                _ => {}
            }
        }
        selection
    }

    /// Round trip only when both the type and a return date are present.
    pub fn is_round_trip(&self) -> bool {
        self.flight_type == FlightType::RoundTrip && self.return_date.is_some()
    }
}

fn parse_passengers(value: &str) -> PassengerTally {
    let Ok(tally) = serde_json::from_str::<PassengerTally>(value) else {
        return PassengerTally::default();
    };
    let within_limit = [tally.adults, tally.children, tally.infants]
        .iter()
        .all(|n| *n <= MAX_PASSENGERS_PER_TYPE);
    match PassengerCounts::new(tally.adults, tally.children, tally.infants) {
        Some(counts) if within_limit => counts.into(),
        _ => PassengerTally::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_selection() {
        let qs = "flightId=VN213&airline=Vietnam+Airlines&departureTime=08%3A00&arrivalTime=10%3A10\
                  &price=1500000&email=a%40example.com&passengerName=NGUYEN+VAN+A\
                  &from=H%E1%BB%93+Ch%C3%AD+Minh+%28SGN%29&to=H%C3%A0+N%E1%BB%99i+%28HAN%29\
                  &date=20%2F11%2F2026&returnDate=27%2F11%2F2026&flightType=round-trip\
                  &passengers=%7B%22adults%22%3A2%2C%22children%22%3A1%2C%22infants%22%3A0%7D";
        let s = FlightSelection::from_query_string(qs);
        assert_eq!(s.flight_id, "VN213");
        assert_eq!(s.airline, "Vietnam Airlines");
        assert_eq!(s.price, 1_500_000.0);
        assert_eq!(s.from, "Hồ Chí Minh (SGN)");
        assert_eq!(s.passengers.adults, 2);
        assert_eq!(s.passengers.children, 1);
        assert!(s.is_round_trip());
    }

    #[test]
    fn test_missing_values_degrade_to_zero() {
        let s = FlightSelection::from_query_string("?flightId=VN1&price=abc&passengers=%7Bbroken");
        assert_eq!(s.flight_id, "VN1");
        assert_eq!(s.price, 0.0);
        assert_eq!(s.passengers, PassengerTally::default());
        assert_eq!(s.flight_type, FlightType::OneWay);
        assert!(!s.is_round_trip());
    }

    #[test]
    fn test_oversized_passenger_counts_degrade_to_zero() {
        let huge = FlightSelection::from_query_string(
            "flightId=VN1&passengers=%7B%22adults%22%3A4294967295%7D",
        );
        assert_eq!(huge.passengers, PassengerTally::default());

        let ten = FlightSelection::from_query_string(
            "passengers=%7B%22adults%22%3A10%2C%22children%22%3A0%2C%22infants%22%3A0%7D",
        );
        assert_eq!(ten.passengers, PassengerTally::default());

        let nine = FlightSelection::from_query_string(
            "passengers=%7B%22adults%22%3A9%2C%22children%22%3A9%2C%22infants%22%3A9%7D",
        );
        assert_eq!(nine.passengers.adults, 9);
        assert_eq!(nine.passengers.infants, 9);
    }

    #[test]
    fn test_passenger_rules_apply_to_url_counts() {
        let no_adult = FlightSelection::from_query_string(
            "passengers=%7B%22adults%22%3A0%2C%22children%22%3A2%7D",
        );
        assert_eq!(no_adult.passengers, PassengerTally::default());

        let lap_infants = FlightSelection::from_query_string(
            "passengers=%7B%22adults%22%3A1%2C%22infants%22%3A2%7D",
        );
        assert_eq!(lap_infants.passengers, PassengerTally::default());
    }

    #[test]
    fn test_terminal_states() {
        assert!(!PaymentState::AwaitingSettlement.is_terminal());
        assert!(PaymentState::TimedOut.is_terminal());
        assert!(PaymentState::Aborted.is_terminal());
    }
}
