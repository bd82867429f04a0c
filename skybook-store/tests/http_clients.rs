//! HTTP collaborators against a mock server.

use serde_json::json;
use skybook_core::{BankDirectory, BankInfoProvider, BookingGateway, GatewayError, IpResolver};
use skybook_shared::{
    BookedPassenger, BookingRequest, BookingStatus, ContactInfo, FlightType, PassengerKind,
};
use skybook_store::app_config::{BackendConfig, BankDirectoryConfig, IpLookupConfig};
use skybook_store::{BackendClient, GeoJsIpResolver, VietQrBankDirectory};
use wiremock::{
    matchers::{body_partial_json, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

fn backend(server: &MockServer) -> BackendClient {
    BackendClient::new(&BackendConfig {
        base_url: format!("{}/api/", server.uri()),
        timeout_secs: 5,
    })
    .unwrap()
}

fn booking_request() -> BookingRequest {
    BookingRequest {
        ip: "203.0.113.9".to_string(),
        flight_id: "VN213".to_string(),
        amount: 1_750_000,
        passengers: vec![
            BookedPassenger {
                kind: PassengerKind::Adult,
                name: "NGUYEN VAN A".to_string(),
            },
            BookedPassenger {
                kind: PassengerKind::Child,
                name: "NGUYEN VAN A".to_string(),
            },
        ],
        contact_info: ContactInfo::new("a@example.com", "0987654321", "123456789012"),
        airline: "Vietnam Airlines".to_string(),
        departure_time: "08:00".to_string(),
        arrival_time: "10:10".to_string(),
        from: "SGN".to_string(),
        to: "HAN".to_string(),
        date: "20/11/2026".to_string(),
        flight_type: FlightType::OneWay,
        return_date: None,
        qr_code_url: "https://img.vietqr.io/image/970436-0123456789-qr_only.png".to_string(),
    }
}

#[tokio::test]
async fn test_submit_booking_posts_camel_case_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/bookings"))
        .and(body_partial_json(json!({
            "flightId": "VN213",
            "amount": 1750000,
            "flightType": "one-way",
            "passengers": [{"type": "adult", "name": "NGUYEN VAN A"}, {"type": "child", "name": "NGUYEN VAN A"}],
            "contactInfo": {"phoneNumber": "0987654321", "idNumber": "123456789012"}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"message": "Đặt chỗ thành công", "id": 5})))
        .expect(1)
        .mount(&server)
        .await;

    let receipt = backend(&server).submit_booking(&booking_request()).await.unwrap();
    assert_eq!(receipt.id, Some(5));
    assert_eq!(receipt.message.as_deref(), Some("Đặt chỗ thành công"));
}

#[tokio::test]
async fn test_submit_booking_surfaces_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/bookings"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "Thiếu thông tin"})))
        .mount(&server)
        .await;

    let err = backend(&server).submit_booking(&booking_request()).await.unwrap_err();
    match err {
        GatewayError::UnexpectedStatus { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("Thiếu thông tin"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_booking_history_reads_data_array() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/history-booking"))
        .and(query_param("idNumber", "123456789012"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Lấy lịch sử thành công",
            "data": [{
                "id": 3,
                "ip": "203.0.113.9",
                "flightId": "VN213",
                "amount": 1750000,
                "passengers": [{"type": "adult", "name": "NGUYEN VAN A"}],
                "contactInfo": {"email": "a@example.com", "phoneNumber": "0987654321", "idNumber": "123456789012"},
                "airline": "Vietnam Airlines",
                "departureTime": "08:00",
                "arrivalTime": "10:10",
                "from": "SGN",
                "to": "HAN",
                "date": "20/11/2026",
                "returnDate": null,
                "flightType": "one-way",
                "status": "success",
                "created_at": "2026-11-01 10:00:00"
            }]
        })))
        .mount(&server)
        .await;

    let records = backend(&server).booking_history("123456789012").await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].flight_id, "VN213");
    assert_eq!(records[0].status, BookingStatus::Success);
    assert_eq!(records[0].created_at.as_deref(), Some("2026-11-01 10:00:00"));
}

#[tokio::test]
async fn test_bank_account() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/bank-info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "bin": "970436",
            "accountNumber": "0123456789",
            "accountName": "NGUYEN VAN A"
        })))
        .mount(&server)
        .await;

    let account = backend(&server).bank_account().await.unwrap();
    assert_eq!(account.bin, "970436");
    assert_eq!(account.account_number, "0123456789");
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/bank-info"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = backend(&server).bank_account().await.unwrap_err();
    assert!(matches!(err, GatewayError::Decode(_)));
}

#[tokio::test]
async fn test_unreachable_backend() {
    let client = BackendClient::new(&BackendConfig {
        base_url: "http://127.0.0.1:1/api".to_string(),
        timeout_secs: 2,
    })
    .unwrap();
    let err = client.bank_account().await.unwrap_err();
    assert!(matches!(err, GatewayError::ConnectionFailed(_)));
}

fn bank_list() -> serde_json::Value {
    json!({
        "code": "00",
        "desc": "Get Bank list successful! Total 2 banks",
        "data": [
            {
                "id": 17,
                "name": "Ngân hàng TMCP Công thương Việt Nam",
                "code": "ICB",
                "bin": "970415",
                "shortName": "VietinBank",
                "logo": "https://api.vietqr.io/img/ICB.png",
                "transferSupported": 1,
                "lookupSupported": 1
            },
            {
                "id": 43,
                "name": "Ngân hàng TMCP Ngoại Thương Việt Nam",
                "code": "VCB",
                "bin": "970436",
                "shortName": "Vietcombank",
                "logo": "https://api.vietqr.io/img/VCB.png",
                "transferSupported": 1,
                "lookupSupported": 1
            }
        ]
    })
}

#[tokio::test]
async fn test_bank_directory_is_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/banks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(bank_list()))
        .expect(1)
        .mount(&server)
        .await;

    let directory = VietQrBankDirectory::new(&BankDirectoryConfig {
        url: format!("{}/v2/banks", server.uri()),
        ..Default::default()
    })
    .unwrap();

    let vcb = directory.find_by_bin("970436").await.unwrap().unwrap();
    assert_eq!(vcb.short_name, "Vietcombank");
    assert_eq!(vcb.code, "VCB");
    assert!(directory.find_by_bin("000000").await.unwrap().is_none());
    assert_eq!(directory.banks().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_bank_directory_rejects_error_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/banks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": "11", "desc": "Quota exceeded", "data": []})))
        .mount(&server)
        .await;

    let directory = VietQrBankDirectory::new(&BankDirectoryConfig {
        url: format!("{}/v2/banks", server.uri()),
        ..Default::default()
    })
    .unwrap();
    assert!(directory.find_by_bin("970436").await.is_err());
}

#[tokio::test]
async fn test_ip_lookup_trims_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/ip"))
        .respond_with(ResponseTemplate::new(200).set_body_string("203.0.113.9\n"))
        .mount(&server)
        .await;

    let resolver = GeoJsIpResolver::new(&IpLookupConfig {
        url: format!("{}/v1/ip", server.uri()),
        timeout_secs: 5,
    })
    .unwrap();
    assert_eq!(resolver.resolve_ip().await.unwrap(), "203.0.113.9");
}
