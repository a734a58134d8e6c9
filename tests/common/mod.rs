#![allow(dead_code)]

use std::sync::Once;

use serde_json::{Value, json};
use sqlx::PgPool;
use tokio::net::TcpListener;

pub fn init_tracing_once() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("fixly=debug")
            .with_test_writer()
            .init();
    });
}

/// Spawns the application on a random port and returns its address.
///
/// Returned address format: `http://127.0.0.1:8492`
pub async fn spawn_app(test_db_pool: PgPool) -> String {
    dotenvy::from_filename_override("tests/data/.test.env").unwrap();
    init_tracing_once();

    // Randomly choose an available port
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port at localhost");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        let app = fixly::app(test_db_pool);
        axum::serve(listener, app).await.unwrap();
    });

    let address = format!("http://127.0.0.1:{port}");

    // Wait for server to be ready
    let client = reqwest::Client::new();
    for _ in 0..10 {
        if client
            .get(format!("{address}/health-check"))
            .send()
            .await
            .is_ok()
        {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    }

    address
}

/// Registers a user and returns the response body.
pub async fn register_user(
    client: &reqwest::Client,
    address: &str,
    name: &str,
    email: &str,
    password: &str,
    role: &str,
) -> Value {
    let response = client
        .post(format!("{address}/auth/register"))
        .json(&json!({
            "name": name,
            "email": email,
            "password": password,
            "role": role
        }))
        .send()
        .await
        .expect("Failed to register user");
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    response.json().await.expect("Failed to parse user response")
}

/// Logs in with the form-encoded credentials and returns the access token.
pub async fn login(
    client: &reqwest::Client,
    address: &str,
    email: &str,
    password: &str,
) -> String {
    let response = client
        .post(format!("{address}/auth/login"))
        .form(&[("username", email), ("password", password)])
        .send()
        .await
        .expect("Failed to log in");
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse token response");
    body["access_token"]
        .as_str()
        .expect("Response should contain an access token")
        .to_string()
}

/// Registers a user and immediately logs them in, returning the token.
pub async fn register_and_login(
    client: &reqwest::Client,
    address: &str,
    name: &str,
    email: &str,
    role: &str,
) -> String {
    register_user(client, address, name, email, "password123", role).await;
    login(client, address, email, "password123").await
}

/// Registers a provider profile for an already-authenticated provider user.
/// Returns the profile's id.
pub async fn create_provider_profile(
    client: &reqwest::Client,
    address: &str,
    provider_token: &str,
    services: &str,
    pincode: &str,
) -> String {
    let response = client
        .post(format!("{address}/providers/register"))
        .header("Authorization", format!("Bearer {provider_token}"))
        .json(&json!({
            "services": services,
            "experience": 5,
            "contact_info": "call me",
            "location_pincode": pincode
        }))
        .send()
        .await
        .expect("Failed to register provider profile");
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse provider response");
    body["id"]
        .as_str()
        .expect("Provider response should contain an id")
        .to_string()
}

/// Registers an admin account and returns its access token.
pub async fn admin_token(client: &reqwest::Client, address: &str) -> String {
    register_and_login(client, address, "Admin", "admin@example.com", "admin").await
}

/// Approves (or rejects) a provider profile through the admin API.
pub async fn verify_provider(
    client: &reqwest::Client,
    address: &str,
    admin_token: &str,
    provider_id: &str,
    approve: bool,
) {
    let response = client
        .post(format!(
            "{address}/admin/verify-provider/{provider_id}?approve={approve}"
        ))
        .header("Authorization", format!("Bearer {admin_token}"))
        .send()
        .await
        .expect("Failed to verify provider");
    assert_eq!(response.status(), reqwest::StatusCode::OK);
}

/// Full setup for a verified provider: registers the provider user, its
/// profile, an admin, and approves the profile.
///
/// Returns (provider_token, provider_id).
pub async fn setup_verified_provider(
    client: &reqwest::Client,
    address: &str,
    email: &str,
    services: &str,
    pincode: &str,
) -> (String, String) {
    let provider_token = register_and_login(client, address, "Pat Provider", email, "provider").await;
    let provider_id =
        create_provider_profile(client, address, &provider_token, services, pincode).await;

    let admin = admin_token(client, address).await;
    verify_provider(client, address, &admin, &provider_id, true).await;

    (provider_token, provider_id)
}

/// Creates a booking as the given customer. Returns the booking id.
pub async fn create_booking(
    client: &reqwest::Client,
    address: &str,
    customer_token: &str,
    provider_id: &str,
) -> String {
    let response = client
        .post(format!("{address}/bookings"))
        .header("Authorization", format!("Bearer {customer_token}"))
        .json(&json!({
            "provider_id": provider_id,
            "date_time": "2026-09-15T10:00:00Z"
        }))
        .send()
        .await
        .expect("Failed to create booking");
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse booking response");
    body["id"]
        .as_str()
        .expect("Booking response should contain an id")
        .to_string()
}

/// Transitions a booking's status and returns the raw response.
pub async fn update_booking_status(
    client: &reqwest::Client,
    address: &str,
    token: &str,
    booking_id: &str,
    status: &str,
) -> reqwest::Response {
    client
        .patch(format!("{address}/bookings/{booking_id}/status?status={status}"))
        .header("Authorization", format!("Bearer {token}"))
        .send()
        .await
        .expect("Failed to update booking status")
}

/// Books the provider as a fresh customer and has the provider complete it.
///
/// Returns (customer_token, booking_id).
pub async fn completed_booking(
    client: &reqwest::Client,
    address: &str,
    provider_token: &str,
    provider_id: &str,
    customer_email: &str,
) -> (String, String) {
    let customer_token =
        register_and_login(client, address, "Casey Customer", customer_email, "customer").await;
    let booking_id = create_booking(client, address, &customer_token, provider_id).await;

    let response =
        update_booking_status(client, address, provider_token, &booking_id, "completed").await;
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    (customer_token, booking_id)
}

/// Posts a review for a booking and returns the raw response.
pub async fn post_review(
    client: &reqwest::Client,
    address: &str,
    token: &str,
    booking_id: &str,
    rating: i32,
) -> reqwest::Response {
    client
        .post(format!("{address}/reviews"))
        .header("Authorization", format!("Bearer {token}"))
        .json(&json!({
            "booking_id": booking_id,
            "rating": rating,
            "comment": "good work"
        }))
        .send()
        .await
        .expect("Failed to post review")
}
