mod common;

use common::{
    admin_token, create_provider_profile, register_and_login, setup_verified_provider, spawn_app,
    verify_provider,
};
use serde_json::{Value, json};
use sqlx::PgPool;

#[sqlx::test]
async fn customer_cannot_register_provider_profile(pool: PgPool) {
    let address = spawn_app(pool).await;
    let client = reqwest::Client::new();

    let token = register_and_login(&client, &address, "Casey", "casey@example.com", "customer").await;

    let response = client
        .post(format!("{address}/providers/register"))
        .header("Authorization", format!("Bearer {token}"))
        .json(&json!({
            "services": "Plumbing",
            "experience": 3,
            "contact_info": "call me",
            "location_pincode": "560001"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), reqwest::StatusCode::FORBIDDEN);
}

#[sqlx::test]
async fn duplicate_profile_yields_conflict(pool: PgPool) {
    let address = spawn_app(pool).await;
    let client = reqwest::Client::new();

    let token = register_and_login(&client, &address, "Pat", "pat@example.com", "provider").await;
    create_provider_profile(&client, &address, &token, "Plumbing", "560001").await;

    let response = client
        .post(format!("{address}/providers/register"))
        .header("Authorization", format!("Bearer {token}"))
        .json(&json!({
            "services": "Electrical",
            "experience": 1,
            "contact_info": "call me",
            "location_pincode": "560002"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), reqwest::StatusCode::CONFLICT);
}

#[sqlx::test]
async fn new_profile_starts_unverified_with_zero_rating(pool: PgPool) {
    let address = spawn_app(pool).await;
    let client = reqwest::Client::new();

    let token = register_and_login(&client, &address, "Pat", "pat@example.com", "provider").await;

    let response = client
        .post(format!("{address}/providers/register"))
        .header("Authorization", format!("Bearer {token}"))
        .json(&json!({
            "services": "Plumbing, Drain Cleaning",
            "experience": 7,
            "contact_info": "pat@example.com",
            "location_pincode": "560001"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let profile: Value = response.json().await.unwrap();
    assert_eq!(profile["verified"], false);
    assert_eq!(profile["rating_avg"], 0.0);
    assert_eq!(profile["user"]["email"], "pat@example.com");
}

#[sqlx::test]
async fn default_listing_excludes_unverified(pool: PgPool) {
    let address = spawn_app(pool).await;
    let client = reqwest::Client::new();

    let token = register_and_login(&client, &address, "Pat", "pat@example.com", "provider").await;
    let provider_id =
        create_provider_profile(&client, &address, &token, "Plumbing", "560001").await;

    let listed: Vec<Value> = client
        .get(format!("{address}/providers"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(listed.is_empty());

    // Explicitly including unverified shows the profile
    let listed: Vec<Value> = client
        .get(format!("{address}/providers?verified_only=false"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], provider_id.as_str());
    assert_eq!(listed[0]["verified"], false);
}

#[sqlx::test]
async fn verified_provider_appears_in_default_listing(pool: PgPool) {
    let address = spawn_app(pool).await;
    let client = reqwest::Client::new();

    let (_, provider_id) =
        setup_verified_provider(&client, &address, "pat@example.com", "Plumbing", "560001").await;

    let listed: Vec<Value> = client
        .get(format!("{address}/providers"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], provider_id.as_str());
    assert_eq!(listed[0]["verified"], true);
    assert_eq!(listed[0]["user"]["role"], "provider");
}

#[sqlx::test]
async fn category_filter_is_case_insensitive_substring(pool: PgPool) {
    let address = spawn_app(pool).await;
    let client = reqwest::Client::new();

    let plumber_token =
        register_and_login(&client, &address, "Pat", "pat@example.com", "provider").await;
    let plumber_id = create_provider_profile(
        &client,
        &address,
        &plumber_token,
        "Plumbing, Drain Cleaning",
        "560001",
    )
    .await;

    let electrician_token =
        register_and_login(&client, &address, "Eli", "eli@example.com", "provider").await;
    let electrician_id = create_provider_profile(
        &client,
        &address,
        &electrician_token,
        "Electrical Repairs",
        "560002",
    )
    .await;

    let admin = admin_token(&client, &address).await;
    verify_provider(&client, &address, &admin, &plumber_id, true).await;
    verify_provider(&client, &address, &admin, &electrician_id, true).await;

    let listed: Vec<Value> = client
        .get(format!("{address}/providers?category=plumb"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], plumber_id.as_str());

    let listed: Vec<Value> = client
        .get(format!("{address}/providers?category=ELECTRIC"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], electrician_id.as_str());
}

#[sqlx::test]
async fn pincode_filter_is_exact(pool: PgPool) {
    let address = spawn_app(pool).await;
    let client = reqwest::Client::new();

    let (_, nearby_id) =
        setup_verified_provider(&client, &address, "pat@example.com", "Plumbing", "560001").await;

    let faraway_token =
        register_and_login(&client, &address, "Far", "far@example.com", "provider").await;
    let faraway_id =
        create_provider_profile(&client, &address, &faraway_token, "Plumbing", "560099").await;
    let admin = common::login(&client, &address, "admin@example.com", "password123").await;
    verify_provider(&client, &address, &admin, &faraway_id, true).await;

    let listed: Vec<Value> = client
        .get(format!("{address}/providers?pincode=560001"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], nearby_id.as_str());

    // A prefix is not a match
    let listed: Vec<Value> = client
        .get(format!("{address}/providers?pincode=5600"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(listed.is_empty());
}

#[sqlx::test]
async fn sort_by_experience_is_descending(pool: PgPool) {
    let address = spawn_app(pool).await;
    let client = reqwest::Client::new();

    let junior_token =
        register_and_login(&client, &address, "Junior", "junior@example.com", "provider").await;
    let junior_response = client
        .post(format!("{address}/providers/register"))
        .header("Authorization", format!("Bearer {junior_token}"))
        .json(&json!({
            "services": "Painting",
            "experience": 2,
            "contact_info": "junior",
            "location_pincode": "560001"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(junior_response.status(), reqwest::StatusCode::OK);
    let junior: Value = junior_response.json().await.unwrap();

    let senior_token =
        register_and_login(&client, &address, "Senior", "senior@example.com", "provider").await;
    let senior_response = client
        .post(format!("{address}/providers/register"))
        .header("Authorization", format!("Bearer {senior_token}"))
        .json(&json!({
            "services": "Painting",
            "experience": 20,
            "contact_info": "senior",
            "location_pincode": "560001"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(senior_response.status(), reqwest::StatusCode::OK);
    let senior: Value = senior_response.json().await.unwrap();

    let admin = admin_token(&client, &address).await;
    verify_provider(&client, &address, &admin, junior["id"].as_str().unwrap(), true).await;
    verify_provider(&client, &address, &admin, senior["id"].as_str().unwrap(), true).await;

    let listed: Vec<Value> = client
        .get(format!("{address}/providers?sort_by=experience"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0]["experience"], 20);
    assert_eq!(listed[1]["experience"], 2);
}

#[sqlx::test]
async fn get_provider_by_id(pool: PgPool) {
    let address = spawn_app(pool).await;
    let client = reqwest::Client::new();

    let (_, provider_id) =
        setup_verified_provider(&client, &address, "pat@example.com", "Plumbing", "560001").await;

    let response = client
        .get(format!("{address}/providers/{provider_id}"))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let profile: Value = response.json().await.unwrap();
    assert_eq!(profile["id"], provider_id.as_str());
    assert_eq!(profile["user"]["email"], "pat@example.com");
}

#[sqlx::test]
async fn unknown_provider_is_not_found(pool: PgPool) {
    let address = spawn_app(pool).await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!(
            "{address}/providers/00000000-0000-0000-0000-000000000000"
        ))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
}
