//! Integration tests for the Foodshare HTTP client

#![cfg(feature = "client")]

use foodshare_core::{DonationStatus, NewDonation};
use foodshare_http::client::{FoodshareClient, error::ClientError};
use foodshare_http::types::RegisterRequest;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn donation_json(id: i64, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "food_item": "Bread",
        "description": "Sourdough",
        "quantity": "2 loaves",
        "pickup_location_lat": 40.7,
        "pickup_location_lon": -74.0,
        "preferred_pickup_time": null,
        "expiration_date": null,
        "allergens": null,
        "is_perishable": false,
        "status": status,
        "created_at": "2024-05-01T09:00:00",
        "donor_id": 1
    })
}

#[tokio::test]
async fn test_client_builder() {
    let client = FoodshareClient::builder()
        .base_url("http://localhost:3000/")
        .build()
        .unwrap();
    assert_eq!(client.base_url(), "http://localhost:3000");
}

#[tokio::test]
async fn test_client_builder_requires_base_url() {
    let result = FoodshareClient::builder().build();
    assert!(matches!(result, Err(ClientError::Configuration(_))));
}

#[tokio::test]
async fn test_login_cookie_is_sent_on_later_requests() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"email": "ada@example.com", "password": "pw"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"message": "Login successful"}))
                .append_header("set-cookie", "access_token=aaa; Path=/"),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("cookie", "access_token=aaa"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "email": "ada@example.com",
            "created_at": "2024-05-01T09:00:00"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = FoodshareClient::new(server.uri()).unwrap();
    client.login("ada@example.com", "pw").await.unwrap();
    let user = client.me().await.unwrap();

    assert_eq!(user.id, 1);
    assert_eq!(user.email, "ada@example.com");
}

#[tokio::test]
async fn test_rejection_carries_extracted_detail() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Invalid credentials"})),
        )
        .mount(&server)
        .await;

    let client = FoodshareClient::new(server.uri()).unwrap();
    let err = client.login("ada@example.com", "wrong").await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(err.detail(), Some("Invalid credentials"));
}

#[tokio::test]
async fn test_rejection_without_json_body_has_no_detail() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/donations"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let client = FoodshareClient::new(server.uri()).unwrap();
    let err = client.list_donations().await.unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert_eq!(err.detail(), None);
}

#[tokio::test]
async fn test_list_and_claim_donations() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/donations"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([donation_json(1, "available"), donation_json(2, "claimed")])),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/donations/1/claim"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "message": "Donation claimed"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = FoodshareClient::new(server.uri()).unwrap();
    let donations = client.list_donations().await.unwrap();
    assert_eq!(donations.len(), 2);
    assert_eq!(donations[1].status, DonationStatus::Claimed);

    let reply = client.claim_donation(1).await.unwrap();
    assert_eq!(reply["message"], "Donation claimed");
}

#[tokio::test]
async fn test_get_donation_by_id() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/donations/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(donation_json(7, "available")))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/donations/8"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"detail": "Donation not found"})),
        )
        .mount(&server)
        .await;

    let client = FoodshareClient::new(server.uri()).unwrap();
    let donation = client.get_donation(7).await.unwrap();
    assert_eq!(donation.id, 7);
    assert_eq!(donation.status, DonationStatus::Available);

    let err = client.get_donation(8).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.detail(), Some("Donation not found"));
}

#[tokio::test]
async fn test_register_posts_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .and(body_json(json!({"email": "ada@example.com", "password": "pw"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 1,
            "email": "ada@example.com",
            "created_at": "2024-05-01T09:00:00"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = FoodshareClient::new(server.uri()).unwrap();
    let created = client
        .register(&RegisterRequest {
            email: "ada@example.com".to_string(),
            password: "pw".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(created["email"], "ada@example.com");
}

#[tokio::test]
async fn test_create_donation_posts_payload() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/donations"))
        .and(body_json(json!({
            "food_item": "Soup",
            "description": null,
            "quantity": "1 pot",
            "pickup_location_lat": 40.0,
            "pickup_location_lon": -73.0,
            "preferred_pickup_time": null,
            "expiration_date": null,
            "allergens": ["Dairy"],
            "is_perishable": true
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(donation_json(5, "available")))
        .expect(1)
        .mount(&server)
        .await;

    let client = FoodshareClient::new(server.uri()).unwrap();
    let created = client
        .create_donation(&NewDonation {
            food_item: "Soup".to_string(),
            description: None,
            quantity: "1 pot".to_string(),
            pickup_location_lat: 40.0,
            pickup_location_lon: -73.0,
            preferred_pickup_time: None,
            expiration_date: None,
            allergens: Some(vec!["Dairy".to_string()]),
            is_perishable: true,
        })
        .await
        .unwrap();

    assert_eq!(created.id, 5);
}

#[tokio::test]
async fn test_unreachable_proxy_is_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let closed = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let client = FoodshareClient::new(closed).unwrap();
    let err = client.me().await.unwrap_err();

    assert!(err.is_network());
}
