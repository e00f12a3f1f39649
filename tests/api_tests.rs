//! API integration tests
//!
//! Run against a live server with: cargo test -- --ignored

use reqwest::Client;
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Unique suffix so tests can run repeatedly against the same database
fn unique(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    format!("{}-{}", prefix, nanos)
}

async fn create_member(client: &Client) -> Value {
    let response = client
        .post(format!("{}/members", BASE_URL))
        .json(&json!({
            "first_name": "Ana",
            "last_name": "Torres",
            "email": format!("{}@example.com", unique("ana")),
            "address": "Calle Mayor 1",
            "birth_date": "1990-06-15"
        }))
        .send()
        .await
        .expect("Failed to create member");

    assert_eq!(response.status(), 201);
    response.json().await.expect("Failed to parse member")
}

async fn create_book(client: &Client, total_copies: i32) -> Value {
    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({
            "title": "Cien años de soledad",
            "author": "Gabriel García Márquez",
            "isbn": unique("isbn"),
            "category": "Novela",
            "total_copies": total_copies
        }))
        .send()
        .await
        .expect("Failed to create book");

    assert_eq!(response.status(), 201);
    response.json().await.expect("Failed to parse book")
}

async fn create_loan(client: &Client, member_id: i64, book_id: i64) -> reqwest::Response {
    client
        .post(format!("{}/loans", BASE_URL))
        .json(&json!({
            "member_id": member_id,
            "book_id": book_id,
            "loan_date": "2024-03-01"
        }))
        .send()
        .await
        .expect("Failed to send loan request")
}

async fn get_book(client: &Client, book_id: i64) -> Value {
    let response = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to get book");

    assert!(response.status().is_success());
    response.json().await.expect("Failed to parse book")
}

#[tokio::test]
#[ignore]
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
async fn test_member_crud() {
    let client = Client::new();

    let member = create_member(&client).await;
    let member_id = member["id"].as_i64().expect("No member ID");

    // Read back
    let response = client
        .get(format!("{}/members/{}", BASE_URL, member_id))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    // Update
    let response = client
        .put(format!("{}/members/{}", BASE_URL, member_id))
        .json(&json!({
            "first_name": "Ana María",
            "last_name": "Torres",
            "email": member["email"],
            "address": "Calle Menor 2",
            "birth_date": "1990-06-15"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let updated: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(updated["first_name"], "Ana María");
    assert_eq!(updated["address"], "Calle Menor 2");

    // Delete
    let response = client
        .delete(format!("{}/members/{}", BASE_URL, member_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);

    // Gone
    let response = client
        .get(format!("{}/members/{}", BASE_URL, member_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_duplicate_email_rejected() {
    let client = Client::new();

    let member = create_member(&client).await;

    let response = client
        .post(format!("{}/members", BASE_URL))
        .json(&json!({
            "first_name": "Otra",
            "last_name": "Persona",
            "email": member["email"],
            "address": "Calle Mayor 3",
            "birth_date": "1985-01-01"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_book_starts_with_all_copies_available() {
    let client = Client::new();

    let book = create_book(&client, 4).await;
    assert_eq!(book["total_copies"], 4);
    assert_eq!(book["available_copies"], 4);
}

#[tokio::test]
#[ignore]
async fn test_duplicate_isbn_rejected() {
    let client = Client::new();

    let book = create_book(&client, 1).await;

    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({
            "title": "Otro título",
            "author": "Otro autor",
            "isbn": book["isbn"],
            "category": "Ensayo",
            "total_copies": 2
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_loan_availability_lifecycle() {
    let client = Client::new();

    let member = create_member(&client).await;
    let member_id = member["id"].as_i64().unwrap();
    let book = create_book(&client, 2).await;
    let book_id = book["id"].as_i64().unwrap();

    // First loan takes one copy
    let response = create_loan(&client, member_id, book_id).await;
    assert_eq!(response.status(), 201);
    let loan1: Value = response.json().await.unwrap();
    assert_eq!(loan1["state"], "open");
    assert_eq!(get_book(&client, book_id).await["available_copies"], 1);

    // Second loan takes the last copy
    let response = create_loan(&client, member_id, book_id).await;
    assert_eq!(response.status(), 201);
    let loan2: Value = response.json().await.unwrap();
    assert_eq!(get_book(&client, book_id).await["available_copies"], 0);

    // Third loan is rejected and changes nothing
    let response = create_loan(&client, member_id, book_id).await;
    assert_eq!(response.status(), 422);
    assert_eq!(get_book(&client, book_id).await["available_copies"], 0);

    // Returning the first loan releases one copy
    let response = client
        .put(format!("{}/loans/{}", BASE_URL, loan1["id"].as_i64().unwrap()))
        .json(&json!({
            "member_id": member_id,
            "book_id": book_id,
            "loan_date": loan1["loan_date"],
            "due_date": loan1["due_date"],
            "state": "returned"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    assert_eq!(get_book(&client, book_id).await["available_copies"], 1);

    // Deleting the open second loan rolls back its decrement
    let response = client
        .delete(format!("{}/loans/{}", BASE_URL, loan2["id"].as_i64().unwrap()))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);
    assert_eq!(get_book(&client, book_id).await["available_copies"], 2);

    // No open loans remain, so the book can be deleted
    let response = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);
}

#[tokio::test]
#[ignore]
async fn test_loan_rejected_when_no_copies() {
    let client = Client::new();

    let member = create_member(&client).await;
    let book = create_book(&client, 0).await;

    let response = create_loan(
        &client,
        member["id"].as_i64().unwrap(),
        book["id"].as_i64().unwrap(),
    )
    .await;
    assert_eq!(response.status(), 422);
}

#[tokio::test]
#[ignore]
async fn test_loan_due_date_defaults_to_one_week() {
    let client = Client::new();

    let member = create_member(&client).await;
    let book = create_book(&client, 1).await;

    let response = create_loan(
        &client,
        member["id"].as_i64().unwrap(),
        book["id"].as_i64().unwrap(),
    )
    .await;
    assert_eq!(response.status(), 201);

    let loan: Value = response.json().await.unwrap();
    assert_eq!(loan["loan_date"], "2024-03-01");
    assert_eq!(loan["due_date"], "2024-03-08");
}

#[tokio::test]
#[ignore]
async fn test_explicit_due_date_wins() {
    let client = Client::new();

    let member = create_member(&client).await;
    let book = create_book(&client, 1).await;

    let response = client
        .post(format!("{}/loans", BASE_URL))
        .json(&json!({
            "member_id": member["id"],
            "book_id": book["id"],
            "loan_date": "2024-03-01",
            "due_date": "2024-03-20"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let loan: Value = response.json().await.unwrap();
    assert_eq!(loan["due_date"], "2024-03-20");
}

#[tokio::test]
#[ignore]
async fn test_member_delete_blocked_by_open_loan() {
    let client = Client::new();

    let member = create_member(&client).await;
    let member_id = member["id"].as_i64().unwrap();
    let book = create_book(&client, 1).await;
    let book_id = book["id"].as_i64().unwrap();

    let response = create_loan(&client, member_id, book_id).await;
    assert_eq!(response.status(), 201);
    let loan: Value = response.json().await.unwrap();

    // Blocked while the loan is open
    let response = client
        .delete(format!("{}/members/{}", BASE_URL, member_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    // The book is equally protected
    let response = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    // Return the loan, then the delete succeeds
    let response = client
        .put(format!("{}/loans/{}", BASE_URL, loan["id"].as_i64().unwrap()))
        .json(&json!({
            "member_id": member_id,
            "book_id": book_id,
            "loan_date": loan["loan_date"],
            "due_date": loan["due_date"],
            "state": "returned"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let response = client
        .delete(format!("{}/members/{}", BASE_URL, member_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);
}

#[tokio::test]
#[ignore]
async fn test_reopen_returned_loan_rejected() {
    let client = Client::new();

    let member = create_member(&client).await;
    let member_id = member["id"].as_i64().unwrap();
    let book = create_book(&client, 1).await;
    let book_id = book["id"].as_i64().unwrap();

    let response = create_loan(&client, member_id, book_id).await;
    let loan: Value = response.json().await.unwrap();
    let loan_id = loan["id"].as_i64().unwrap();

    let return_body = json!({
        "member_id": member_id,
        "book_id": book_id,
        "loan_date": loan["loan_date"],
        "due_date": loan["due_date"],
        "state": "returned"
    });

    let response = client
        .put(format!("{}/loans/{}", BASE_URL, loan_id))
        .json(&return_body)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    // Availability is released exactly once, capped at the total
    assert_eq!(get_book(&client, book_id).await["available_copies"], 1);

    let mut reopen_body = return_body.clone();
    reopen_body["state"] = json!("open");

    let response = client
        .put(format!("{}/loans/{}", BASE_URL, loan_id))
        .json(&reopen_body)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_edit_total_copies_preserves_loaned_count() {
    let client = Client::new();

    let member = create_member(&client).await;
    let member_id = member["id"].as_i64().unwrap();
    let book = create_book(&client, 5).await;
    let book_id = book["id"].as_i64().unwrap();

    // Put two copies on loan: available drops to 3
    create_loan(&client, member_id, book_id).await;
    create_loan(&client, member_id, book_id).await;
    assert_eq!(get_book(&client, book_id).await["available_copies"], 3);

    // Shrink the total to 3; the two copies on loan are preserved
    let response = client
        .put(format!("{}/books/{}", BASE_URL, book_id))
        .json(&json!({
            "title": book["title"],
            "author": book["author"],
            "isbn": book["isbn"],
            "category": book["category"],
            "total_copies": 3
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated["total_copies"], 3);
    assert_eq!(updated["available_copies"], 1);
}

#[tokio::test]
#[ignore]
async fn test_reservation_ignores_availability() {
    let client = Client::new();

    let member = create_member(&client).await;
    let book = create_book(&client, 0).await;

    // A hold on a book with zero available copies is accepted
    let response = client
        .post(format!("{}/reservations", BASE_URL))
        .json(&json!({
            "member_id": member["id"],
            "book_id": book["id"],
            "reservation_date": "2024-03-01"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let reservation: Value = response.json().await.unwrap();
    let reservation_id = reservation["id"].as_i64().unwrap();

    // The hold changed nothing on the book
    assert_eq!(get_book(&client, book["id"].as_i64().unwrap()).await["available_copies"], 0);

    // Update and delete are plain record operations
    let response = client
        .put(format!("{}/reservations/{}", BASE_URL, reservation_id))
        .json(&json!({
            "member_id": member["id"],
            "book_id": book["id"],
            "reservation_date": "2024-03-05"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let response = client
        .delete(format!("{}/reservations/{}", BASE_URL, reservation_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);
}

#[tokio::test]
#[ignore]
async fn test_loan_for_unknown_member_rejected() {
    let client = Client::new();

    let book = create_book(&client, 1).await;

    let response = create_loan(&client, 999_999_999, book["id"].as_i64().unwrap()).await;
    assert_eq!(response.status(), 404);

    // The failed loan did not consume a copy
    assert_eq!(get_book(&client, book["id"].as_i64().unwrap()).await["available_copies"], 1);
}
