//! API integration tests

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use crate::spawn_app;

async fn create(client: &Client, base: &str, body: Value) -> (StatusCode, Value) {
    let response = client
        .post(format!("{}/books", base))
        .json(&body)
        .send()
        .await
        .expect("Failed to send request");

    let status = response.status();
    let body = response.json().await.expect("Failed to parse response");
    (status, body)
}

async fn get(client: &Client, url: String) -> (StatusCode, Value) {
    let response = client.get(url).send().await.expect("Failed to send request");
    let status = response.status();
    let body = response.json().await.expect("Failed to parse response");
    (status, body)
}

async fn book_count(client: &Client, base: &str) -> usize {
    let (_, body) = get(client, format!("{}/books", base)).await;
    body["data"]["books"].as_array().expect("books array").len()
}

#[tokio::test]
async fn test_health_check() {
    let base = spawn_app().await;
    let (status, body) = get(&Client::new(), format!("{}/health", base)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["books"], 0);
}

#[tokio::test]
async fn test_create_book() {
    let base = spawn_app().await;
    let client = Client::new();

    let (status, body) = create(
        &client,
        &base,
        json!({
            "name": "Buku A",
            "year": 2010,
            "author": "John Doe",
            "summary": "Lorem ipsum",
            "publisher": "Dicoding",
            "pageCount": 100,
            "readPage": 25,
            "reading": false
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Buku berhasil ditambahkan");
    assert!(body["data"]["bookId"].as_str().is_some_and(|id| !id.is_empty()));
}

#[tokio::test]
async fn test_create_rejections() {
    let base = spawn_app().await;
    let client = Client::new();

    let (status, body) = create(&client, &base, json!({ "pageCount": 10, "readPage": 1 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "fail");
    assert_eq!(body["message"], "Gagal menambahkan buku. Mohon isi nama buku");
    assert!(body.get("data").is_none());

    let (status, body) = create(&client, &base, json!({ "name": "", "pageCount": 10 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Gagal menambahkan buku. Mohon isi nama buku");

    let (status, body) = create(
        &client,
        &base,
        json!({ "name": "X", "pageCount": 10, "readPage": 11 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Gagal menambahkan buku. readPage tidak boleh lebih besar dari pageCount"
    );

    assert_eq!(book_count(&client, &base).await, 0);
}

#[tokio::test]
async fn test_malformed_body() {
    let base = spawn_app().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/books", base))
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "fail");
    assert!(body["message"].is_string());

    let (status, body) = create(&client, &base, json!({ "name": "X", "pageCount": -1 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "fail");
    assert_eq!(
        body["message"],
        "Gagal menambahkan buku. pageCount dan readPage harus berupa bilangan bulat tidak negatif"
    );

    assert_eq!(book_count(&client, &base).await, 0);
}

#[tokio::test]
async fn test_unvalidated_fields_are_stored_as_sent() {
    let base = spawn_app().await;
    let client = Client::new();

    let (status, created) = create(
        &client,
        &base,
        json!({ "name": "X", "year": "2010", "author": 7, "reading": null, "pageCount": 3 }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["data"]["bookId"].as_str().expect("No book ID").to_string();

    let (_, body) = get(&client, format!("{}/books/{}", base, id)).await;
    let book = &body["data"]["book"];
    assert_eq!(book["year"], "2010");
    assert_eq!(book["author"], 7);
    assert_eq!(book["reading"], Value::Null);
    assert_eq!(book["publisher"], Value::Null);

    // A book without a boolean reading flag matches neither reading filter
    for flag in ["0", "1"] {
        let (_, body) = get(&client, format!("{}/books?reading={}", base, flag)).await;
        assert_eq!(body["data"]["books"], json!([]));
    }

    let response = client
        .put(format!("{}/books/{}", base, id))
        .json(&json!({ "name": "X", "year": ["not", "a", "year"], "reading": "yes" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let (_, body) = get(&client, format!("{}/books/{}", base, id)).await;
    assert_eq!(body["data"]["book"]["year"], json!(["not", "a", "year"]));
    assert_eq!(body["data"]["book"]["reading"], "yes");
}

#[tokio::test]
async fn test_list_filters() {
    let base = spawn_app().await;
    let client = Client::new();

    let (_, first) = create(
        &client,
        &base,
        json!({ "name": "A", "publisher": "P1", "pageCount": 10, "readPage": 5, "reading": true }),
    )
    .await;
    let (_, second) = create(
        &client,
        &base,
        json!({ "name": "Ab", "publisher": "P2", "pageCount": 10, "readPage": 10, "reading": false }),
    )
    .await;
    let first_id = first["data"]["bookId"].clone();
    let second_id = second["data"]["bookId"].clone();

    let (status, body) = get(&client, format!("{}/books", base)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert!(body.get("message").is_none());
    assert_eq!(
        body["data"]["books"],
        json!([
            { "id": first_id, "name": "A", "publisher": "P1" },
            { "id": second_id, "name": "Ab", "publisher": "P2" }
        ])
    );

    let (_, body) = get(&client, format!("{}/books?name=a&reading=1", base)).await;
    let books = body["data"]["books"].as_array().expect("books array");
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["id"], first_id);

    let (_, body) = get(&client, format!("{}/books?finished=1", base)).await;
    let books = body["data"]["books"].as_array().expect("books array");
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["id"], second_id);

    let (_, body) = get(&client, format!("{}/books?finished=0&reading=0", base)).await;
    assert_eq!(body["data"]["books"], json!([]));

    // First occurrence of a repeated key wins
    let (status, body) = get(&client, format!("{}/books?reading=1&reading=0", base)).await;
    assert_eq!(status, StatusCode::OK);
    let books = body["data"]["books"].as_array().expect("books array");
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["id"], first_id);

    let (_, body) = get(&client, format!("{}/books?finished=0x10", base)).await;
    let books = body["data"]["books"].as_array().expect("books array");
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["id"], second_id);

    let (_, body) = get(&client, format!("{}/books?name=AB", base)).await;
    let books = body["data"]["books"].as_array().expect("books array");
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["id"], second_id);
}

#[tokio::test]
async fn test_not_found_messages() {
    let base = spawn_app().await;
    let client = Client::new();

    let (status, body) = get(&client, format!("{}/books/unknown", base)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "fail");
    assert_eq!(body["message"], "Buku tidak ditemukan");

    // Unknown id wins over the empty name
    let response = client
        .put(format!("{}/books/unknown", base))
        .json(&json!({ "name": "", "pageCount": 1, "readPage": 2 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Gagal memperbarui buku. Id tidak ditemukan");

    // Field types are never checked before the id
    let response = client
        .put(format!("{}/books/unknown", base))
        .json(&json!({ "name": "X", "year": "2010", "pageCount": "ten", "reading": null }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = client
        .delete(format!("{}/books/unknown", base))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "fail");
    assert_eq!(body["message"], "Buku gagal dihapus. Id tidak ditemukan");
}

#[tokio::test]
async fn test_update_rejections() {
    let base = spawn_app().await;
    let client = Client::new();

    let (_, created) = create(&client, &base, json!({ "name": "X", "pageCount": 10 })).await;
    let id = created["data"]["bookId"].as_str().expect("No book ID").to_string();

    let response = client
        .put(format!("{}/books/{}", base, id))
        .json(&json!({ "pageCount": 10 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Gagal memperbarui buku. Mohon isi nama buku");

    let response = client
        .put(format!("{}/books/{}", base, id))
        .json(&json!({ "name": "X", "pageCount": 10, "readPage": 20 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        body["message"],
        "Gagal memperbarui buku. readPage tidak boleh lebih besar dari pageCount"
    );

    let (_, body) = get(&client, format!("{}/books/{}", base, id)).await;
    assert_eq!(body["data"]["book"]["name"], "X");
    assert_eq!(body["data"]["book"]["readPage"], 0);
}

#[tokio::test]
async fn test_book_lifecycle() {
    let base = spawn_app().await;
    let client = Client::new();

    let (status, created) = create(
        &client,
        &base,
        json!({ "name": "X", "pageCount": 100, "readPage": 100, "reading": false }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["data"]["bookId"].as_str().expect("No book ID").to_string();
    let url = format!("{}/books/{}", base, id);

    let (status, body) = get(&client, url.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert!(body.get("message").is_none());
    let book = &body["data"]["book"];
    assert_eq!(book["id"], id.as_str());
    assert_eq!(book["name"], "X");
    assert_eq!(book["finished"], true);
    assert_eq!(book["reading"], false);
    assert_eq!(book["year"], Value::Null);
    assert_eq!(book["insertedAt"], book["updatedAt"]);
    let inserted_at = book["insertedAt"].as_str().expect("insertedAt").to_string();

    let response = client
        .put(&url)
        .json(&json!({ "name": "X2", "pageCount": 100, "readPage": 50, "reading": true }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Buku berhasil diperbarui");
    assert!(body.get("data").is_none());

    let (_, body) = get(&client, url.clone()).await;
    let book = &body["data"]["book"];
    assert_eq!(book["name"], "X2");
    assert_eq!(book["finished"], false);
    assert_eq!(book["reading"], true);
    assert_eq!(book["insertedAt"], inserted_at.as_str());
    // Same-format ISO timestamps order lexicographically
    let updated_at = book["updatedAt"].as_str().expect("updatedAt");
    assert!(updated_at > inserted_at.as_str());

    let response = client
        .delete(&url)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Buku berhasil dihapus");

    let (status, _) = get(&client, url).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_concurrent_creates_get_unique_ids() {
    let base = spawn_app().await;
    let client = Client::new();

    let tasks: Vec<_> = (0..32)
        .map(|i| {
            let client = client.clone();
            let base = base.clone();
            tokio::spawn(async move {
                let (status, body) =
                    create(&client, &base, json!({ "name": format!("Book {}", i) })).await;
                assert_eq!(status, StatusCode::CREATED);
                body["data"]["bookId"].as_str().expect("No book ID").to_string()
            })
        })
        .collect();

    let mut ids = Vec::new();
    for task in tasks {
        ids.push(task.await.expect("Task panicked"));
    }
    ids.sort();
    ids.dedup();

    assert_eq!(ids.len(), 32);
    assert_eq!(book_count(&client, &base).await, 32);
}
