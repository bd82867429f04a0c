use serde::{Deserialize, Serialize};
use std::fmt;

use crate::pii::Masked;
use crate::models::passengers::PassengerKind;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlightType {
    #[default]
    OneWay,
    RoundTrip,
}

impl FlightType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlightType::OneWay => "one-way",
            FlightType::RoundTrip => "round-trip",
        }
    }

    /// Parses the URL form; anything unrecognised reads as one-way.
    pub fn from_param(value: &str) -> Self {
        match value {
            "round-trip" => FlightType::RoundTrip,
            _ => FlightType::OneWay,
        }
    }
}

impl fmt::Display for FlightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: Masked<String>,
    #[serde(default)]
    pub id_number: Masked<String>,
}

impl ContactInfo {
    pub fn new(email: impl Into<String>, phone_number: impl Into<String>, id_number: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            phone_number: Masked(phone_number.into()),
            id_number: Masked(id_number.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookedPassenger {
    #[serde(rename = "type")]
    pub kind: PassengerKind,
    pub name: String,
}

/// Body of `POST bookings`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub ip: String,
    pub flight_id: String,
    pub amount: i64,
    pub passengers: Vec<BookedPassenger>,
    pub contact_info: ContactInfo,
    pub airline: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub from: String,
    pub to: String,
    pub date: String,
    pub flight_type: FlightType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_date: Option<String>,
    pub qr_code_url: String,
}

/// Response of `POST bookings`. The backend may answer with only a message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingReceipt {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A booking as stored by the backend and returned by the history lookup.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRecord {
    pub id: i64,
    #[serde(default)]
    pub ip: String,
    pub flight_id: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub passengers: Vec<BookedPassenger>,
    pub contact_info: ContactInfo,
    #[serde(default)]
    pub airline: String,
    #[serde(default)]
    pub departure_time: String,
    #[serde(default)]
    pub arrival_time: String,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub return_date: Option<String>,
    pub flight_type: FlightType,
    pub status: BookingStatus,
    #[serde(default, alias = "created_at")]
    pub created_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flight_type_wire_form() {
        assert_eq!(serde_json::to_string(&FlightType::RoundTrip).unwrap(), "\"round-trip\"");
        assert_eq!(FlightType::from_param("round-trip"), FlightType::RoundTrip);
        assert_eq!(FlightType::from_param("bogus"), FlightType::OneWay);
    }

    #[test]
    fn test_history_record_deserialization() {
        let json = r#"{
            "id": 7,
            "ip": "203.0.113.9",
            "flightId": "VN213",
            "amount": 1250000,
            "passengers": [{"type": "adult", "name": "NGUYEN VAN A"}],
            "contactInfo": {"email": "a@example.com", "phoneNumber": "0987654321", "idNumber": "123456789012"},
            "airline": "Vietnam Airlines",
            "departureTime": "08:00",
            "arrivalTime": "10:10",
            "from": "Hồ Chí Minh (SGN)",
            "to": "Hà Nội (HAN)",
            "date": "20/11/2026",
            "flightType": "one-way",
            "status": "success",
            "created_at": "2026-11-01 09:12:00"
        }"#;
        let record: BookingRecord = serde_json::from_str(json).expect("Failed to deserialize");
        assert_eq!(record.status, BookingStatus::Success);
        assert_eq!(record.passengers[0].kind, PassengerKind::Adult);
        assert_eq!(record.contact_info.id_number.expose(), "123456789012");
        assert_eq!(record.created_at.as_deref(), Some("2026-11-01 09:12:00"));
    }

    #[test]
    fn test_contact_without_email() {
        let contact: ContactInfo =
            serde_json::from_str(r#"{"phoneNumber": "0987654321", "idNumber": "123456789012"}"#).unwrap();
        assert!(contact.email.is_empty());
        assert_eq!(contact.phone_number.expose(), "0987654321");
    }

    #[test]
    fn test_request_omits_missing_return_date() {
        let request = BookingRequest {
            ip: String::new(),
            flight_id: "VN213".into(),
            amount: 500000,
            passengers: vec![],
            contact_info: ContactInfo::new("a@example.com", "0987654321", "123456789012"),
            airline: "Vietnam Airlines".into(),
            departure_time: "08:00".into(),
            arrival_time: "10:10".into(),
            from: "Hồ Chí Minh (SGN)".into(),
            to: "Hà Nội (HAN)".into(),
            date: "20/11/2026".into(),
            flight_type: FlightType::OneWay,
            return_date: None,
            qr_code_url: "https://img.vietqr.io/image/x.png".into(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("returnDate").is_none());
        assert_eq!(value["contactInfo"]["idNumber"], "123456789012");
        assert_eq!(value["qrCodeUrl"], "https://img.vietqr.io/image/x.png");
    }
}
