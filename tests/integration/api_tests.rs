//! API integration tests
//!
//! Run against a live server with a seeded database:
//! cargo test -- --ignored

use chrono::{Duration, Utc};
use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Unique suffix so tests can run repeatedly against the same database
fn unique(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    format!("{}-{}", prefix, nanos)
}

async fn create_employee(client: &Client, active: bool) -> i64 {
    let tag = unique("emp");
    let response = client
        .post(format!("{}/employees", BASE_URL))
        .json(&json!({
            "name": format!("Test Employee {}", tag),
            "email": format!("{}@example.com", tag),
            "badge_number": tag,
            "role": "Tester",
            "active": active
        }))
        .send()
        .await
        .expect("Failed to create employee");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_i64().expect("No employee ID")
}

async fn create_equipment(client: &Client, quantity: i64) -> i64 {
    let response = client
        .post(format!("{}/equipment", BASE_URL))
        .json(&json!({
            "name": unique("Test Helmet"),
            "category": "Head protection",
            "quantity": quantity
        }))
        .send()
        .await
        .expect("Failed to create equipment");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_i64().expect("No equipment ID")
}

async fn equipment_quantity(client: &Client, id: i64) -> i64 {
    let response = client
        .get(format!("{}/equipment/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to get equipment");
    let body: Value = response.json().await.expect("Failed to parse response");
    body["quantity"].as_i64().expect("No quantity")
}

async fn open_loan(client: &Client, employee_id: i64, equipment_id: i64, quantity: i64, status: &str) -> reqwest::Response {
    let due_date = (Utc::now() + Duration::days(30)).to_rfc3339();
    client
        .post(format!("{}/loans", BASE_URL))
        .json(&json!({
            "employee_id": employee_id,
            "equipment_id": equipment_id,
            "quantity": quantity,
            "due_date": due_date,
            "status": status
        }))
        .send()
        .await
        .expect("Failed to open loan")
}

async fn resolve_loan(client: &Client, loan_id: i64, status: &str, quantity: i64) -> reqwest::Response {
    client
        .post(format!("{}/loans/{}/resolve", BASE_URL, loan_id))
        .json(&json!({
            "status": status,
            "quantity": quantity,
            "resolution_date": Utc::now().to_rfc3339()
        }))
        .send()
        .await
        .expect("Failed to resolve loan")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_open_and_partial_resolve_splits_loan() {
    let client = Client::new();
    let employee_id = create_employee(&client, true).await;
    let equipment_id = create_equipment(&client, 5).await;

    // Open 3 of 5 units
    let response = open_loan(&client, employee_id, equipment_id, 3, "ON_LOAN").await;
    assert_eq!(response.status(), 201);
    let loan: Value = response.json().await.expect("Failed to parse response");
    let loan_id = loan["id"].as_i64().expect("No loan ID");
    assert_eq!(loan["status"], "ON_LOAN");
    assert_eq!(equipment_quantity(&client, equipment_id).await, 2);

    // Resolve 2 of the 3 as returned: loan splits
    let response = resolve_loan(&client, loan_id, "RETURNED", 2).await;
    assert_eq!(response.status(), 200);
    let outcome: Value = response.json().await.expect("Failed to parse response");

    assert_eq!(outcome["resolved"]["id"].as_i64(), Some(loan_id));
    assert_eq!(outcome["resolved"]["quantity"].as_i64(), Some(2));
    assert_eq!(outcome["resolved"]["status"], "RETURNED");
    assert!(outcome["resolved"]["resolution_date"].is_string());

    let remainder = &outcome["remainder"];
    assert_eq!(remainder["quantity"].as_i64(), Some(1));
    assert_eq!(remainder["status"], "ON_LOAN");
    assert_eq!(remainder["loan_date"], outcome["resolved"]["loan_date"]);
    assert_eq!(remainder["due_date"], outcome["resolved"]["due_date"]);
    assert!(remainder["resolution_date"].is_null());

    // 2 units came back
    assert_eq!(equipment_quantity(&client, equipment_id).await, 4);

    // Opening 10 against 4 available fails and leaves availability unchanged
    let response = open_loan(&client, employee_id, equipment_id, 10, "ON_LOAN").await;
    assert_eq!(response.status(), 409);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["available"].as_i64(), Some(4));
    assert_eq!(equipment_quantity(&client, equipment_id).await, 4);
}

#[tokio::test]
#[ignore]
async fn test_terminal_loan_is_immutable() {
    let client = Client::new();
    let employee_id = create_employee(&client, true).await;
    let equipment_id = create_equipment(&client, 5).await;

    let response = open_loan(&client, employee_id, equipment_id, 2, "ON_LOAN").await;
    let loan: Value = response.json().await.expect("Failed to parse response");
    let loan_id = loan["id"].as_i64().expect("No loan ID");

    let response = resolve_loan(&client, loan_id, "RETURNED", 2).await;
    assert_eq!(response.status(), 200);

    // Second resolution fails, stock unchanged
    let response = resolve_loan(&client, loan_id, "LOST", 2).await;
    assert_eq!(response.status(), 409);
    assert_eq!(equipment_quantity(&client, equipment_id).await, 5);

    // Status edits are also rejected
    let response = client
        .put(format!("{}/loans/{}/status", BASE_URL, loan_id))
        .json(&json!({ "status": "IN_USE" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_lost_never_credits_stock() {
    let client = Client::new();
    let employee_id = create_employee(&client, true).await;
    let equipment_id = create_equipment(&client, 5).await;

    let response = open_loan(&client, employee_id, equipment_id, 2, "ON_LOAN").await;
    let loan: Value = response.json().await.expect("Failed to parse response");
    let loan_id = loan["id"].as_i64().expect("No loan ID");
    assert_eq!(equipment_quantity(&client, equipment_id).await, 3);

    let response = resolve_loan(&client, loan_id, "LOST", 2).await;
    assert_eq!(response.status(), 200);
    assert_eq!(equipment_quantity(&client, equipment_id).await, 3);
}

#[tokio::test]
#[ignore]
async fn test_damaged_credits_stock() {
    let client = Client::new();
    let employee_id = create_employee(&client, true).await;
    let equipment_id = create_equipment(&client, 5).await;

    let response = open_loan(&client, employee_id, equipment_id, 2, "ON_LOAN").await;
    let loan: Value = response.json().await.expect("Failed to parse response");
    let loan_id = loan["id"].as_i64().expect("No loan ID");

    let response = resolve_loan(&client, loan_id, "DAMAGED", 2).await;
    assert_eq!(response.status(), 200);
    assert_eq!(equipment_quantity(&client, equipment_id).await, 5);
}

#[tokio::test]
#[ignore]
async fn test_issued_holds_no_stock_and_cannot_resolve() {
    let client = Client::new();
    let employee_id = create_employee(&client, true).await;
    let equipment_id = create_equipment(&client, 5).await;

    let response = open_loan(&client, employee_id, equipment_id, 2, "ISSUED").await;
    assert_eq!(response.status(), 201);
    let loan: Value = response.json().await.expect("Failed to parse response");
    let loan_id = loan["id"].as_i64().expect("No loan ID");

    // No reservation happened
    assert_eq!(equipment_quantity(&client, equipment_id).await, 5);

    let response = resolve_loan(&client, loan_id, "RETURNED", 2).await;
    assert_eq!(response.status(), 409);
    assert_eq!(equipment_quantity(&client, equipment_id).await, 5);
}

#[tokio::test]
#[ignore]
async fn test_status_edit_between_open_statuses() {
    let client = Client::new();
    let employee_id = create_employee(&client, true).await;
    let equipment_id = create_equipment(&client, 5).await;

    let response = open_loan(&client, employee_id, equipment_id, 1, "ON_LOAN").await;
    let loan: Value = response.json().await.expect("Failed to parse response");
    let loan_id = loan["id"].as_i64().expect("No loan ID");

    let response = client
        .put(format!("{}/loans/{}/status", BASE_URL, loan_id))
        .json(&json!({ "status": "IN_USE" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "IN_USE");

    // Edits never touch inventory
    assert_eq!(equipment_quantity(&client, equipment_id).await, 4);
}

#[tokio::test]
#[ignore]
async fn test_open_validation_errors() {
    let client = Client::new();
    let employee_id = create_employee(&client, true).await;
    let equipment_id = create_equipment(&client, 5).await;

    // Non-positive quantity and past due date
    let response = client
        .post(format!("{}/loans", BASE_URL))
        .json(&json!({
            "employee_id": employee_id,
            "equipment_id": equipment_id,
            "quantity": 0,
            "due_date": (Utc::now() - Duration::days(1)).to_rfc3339()
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["errors"]["quantity"].is_array());

    // Availability unchanged
    assert_eq!(equipment_quantity(&client, equipment_id).await, 5);
}

#[tokio::test]
#[ignore]
async fn test_inactive_employee_cannot_borrow() {
    let client = Client::new();
    let employee_id = create_employee(&client, false).await;
    let equipment_id = create_equipment(&client, 5).await;

    let response = open_loan(&client, employee_id, equipment_id, 1, "ON_LOAN").await;
    assert_eq!(response.status(), 422);
    assert_eq!(equipment_quantity(&client, equipment_id).await, 5);
}

#[tokio::test]
#[ignore]
async fn test_deletion_guards() {
    let client = Client::new();
    let employee_id = create_employee(&client, true).await;
    let equipment_id = create_equipment(&client, 5).await;

    let response = open_loan(&client, employee_id, equipment_id, 1, "ON_LOAN").await;
    let loan: Value = response.json().await.expect("Failed to parse response");
    let loan_id = loan["id"].as_i64().expect("No loan ID");

    // Neither entity can be deleted while the loan is open
    let response = client
        .delete(format!("{}/employees/{}", BASE_URL, employee_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    let response = client
        .delete(format!("{}/equipment/{}", BASE_URL, equipment_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    // After resolution both deletions succeed
    let response = resolve_loan(&client, loan_id, "RETURNED", 1).await;
    assert_eq!(response.status(), 200);

    let response = client
        .delete(format!("{}/employees/{}", BASE_URL, employee_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);

    let response = client
        .delete(format!("{}/equipment/{}", BASE_URL, equipment_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);
}

#[tokio::test]
#[ignore]
async fn test_read_accessors_are_idempotent() {
    let client = Client::new();
    let employee_id = create_employee(&client, true).await;
    let equipment_id = create_equipment(&client, 5).await;
    open_loan(&client, employee_id, equipment_id, 2, "ON_LOAN").await;

    let first: Value = client
        .get(format!("{}/equipment/{}/loans", BASE_URL, equipment_id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let second: Value = client
        .get(format!("{}/equipment/{}/loans", BASE_URL, equipment_id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(first, second);
}

#[tokio::test]
#[ignore]
async fn test_get_stats() {
    let client = Client::new();

    let response = client
        .get(format!("{}/stats", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["loans"]["total"].is_number());
    assert!(body["loans"]["open"].is_number());
    assert!(body["employees"]["total"].is_number());
    assert!(body["equipment"]["low_stock"].is_number());
}

#[tokio::test]
#[ignore]
async fn test_duplicate_equipment_name() {
    let client = Client::new();
    let name = unique("Test Gloves");

    let response = client
        .post(format!("{}/equipment", BASE_URL))
        .json(&json!({ "name": name, "category": "Hand protection", "quantity": 10 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    // Same name, different case
    let response = client
        .post(format!("{}/equipment", BASE_URL))
        .json(&json!({ "name": name.to_uppercase(), "category": "Hand protection", "quantity": 10 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["errors"]["name"].is_array());
}
