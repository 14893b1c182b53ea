use serde_json::{json, Value};

use crate::support::start_server;

#[tokio::test]
async fn ping() {
    let server = start_server().await;
    let resp = server.client.get(server.url("/ping")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "pong");
}

#[tokio::test]
async fn book_lifecycle() {
    let server = start_server().await;
    let client = &server.client;

    let resp = client
        .post(server.url("/api/books"))
        .json(&json!({
            "id": 42,
            "title": "Dune",
            "author": { "first_name": "Frank", "last_name": "Herbert" },
            "genres": ["Science Fiction"],
            "published_at": "1965-08-01T00:00:00Z",
            "price": 9.99,
            "stock": 5
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let created: Value = resp.json().await.unwrap();
    assert_eq!(created["id"], 1);

    let resp = client.get(server.url("/api/books/1")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let fetched: Value = resp.json().await.unwrap();
    assert_eq!(fetched["title"], "Dune");

    let resp = client
        .put(server.url("/api/books/1"))
        .json(&json!({ "title": "Dune (2nd ed.)", "price": 11.0, "stock": 8 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["id"], 1);
    assert_eq!(updated["stock"], 8);

    let resp = client.delete(server.url("/api/books/1")).send().await.unwrap();
    assert_eq!(resp.status(), 204);

    let resp = client.get(server.url("/api/books/1")).send().await.unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "book not found with id: 1");
}

#[tokio::test]
async fn invalid_input_is_bad_request() {
    let server = start_server().await;
    let client = &server.client;

    let resp = client
        .post(server.url("/api/authors"))
        .json(&json!({ "first_name": "", "last_name": "Nobody" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("first_name"));

    let resp = client
        .post(server.url("/api/customers"))
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let resp = client
        .get(server.url("/api/customers/not-a-number"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn authors_and_customers_list() {
    let server = start_server().await;
    let client = &server.client;

    for last in ["Le Guin", "Butler"] {
        let resp = client
            .post(server.url("/api/authors"))
            .json(&json!({ "first_name": "A", "last_name": last }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 201);
    }
    let authors: Vec<Value> = client
        .get(server.url("/api/authors"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(authors.len(), 2);
    assert_eq!(authors[1]["last_name"], "Butler");

    let resp = client
        .post(server.url("/api/customers"))
        .json(&json!({ "name": "Ada", "email": "ada@example.com", "address": { "city": "London" } }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let customer: Value = resp.json().await.unwrap();
    assert_eq!(customer["address"]["city"], "London");
    assert!(customer["created_at"].is_string());
}

#[tokio::test]
async fn book_search_query() {
    let server = start_server().await;
    let client = &server.client;

    for (title, genre, price) in [("Dune", "Science Fiction", 9.0), ("Emma", "Romance", 5.0)] {
        client
            .post(server.url("/api/books"))
            .json(&json!({ "title": title, "genres": [genre], "price": price, "stock": 1 }))
            .send()
            .await
            .unwrap();
    }

    let found: Vec<Value> = client
        .get(server.url("/api/books?genres=romance,poetry&max_price=6"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["title"], "Emma");

    let all: Vec<Value> = client
        .get(server.url("/api/books"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all.len(), 2);

    let resp = client
        .get(server.url("/api/books?min_price=cheap"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}
