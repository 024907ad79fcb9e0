mod support;

use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::{json, Value};

use support::{client, create_author, create_book, start_server, TestApp};

async fn reserve(app: &TestApp, book_id: i64, user: &str) -> anyhow::Result<reqwest::Response> {
    Ok(client()
        .post(app.url("/api/v1/reservations"))
        .json(&json!({"bookId": book_id, "userName": user}))
        .send()
        .await?)
}

#[tokio::test]
async fn e2e_reserve_cancel_and_history() -> anyhow::Result<()> {
    let Some(app) = start_server().await? else { return Ok(()) };
    let c = client();
    let a = create_author(&app, "Ursula", "Le Guin").await?;
    let book = create_book(&app, "The Dispossessed", &[a]).await?;
    let book_id = book["id"].as_i64().unwrap();

    let res = reserve(&app, book_id, "alice").await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let r: Value = res.json().await?;
    assert_eq!(r["status"], "ACTIVE");
    assert_eq!(r["bookTitle"], "The Dispossessed");
    assert!(r["cancelledAt"].is_null());
    let rid = r["id"].as_i64().unwrap();

    let res = reserve(&app, book_id, "bob").await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], format!("Book with id {} already has an active reservation", book_id));

    let res = c.patch(app.url(&format!("/api/v1/reservations/{}/cancel", rid))).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let r: Value = res.json().await?;
    assert_eq!(r["status"], "CANCELLED");
    assert!(r["cancelledAt"].is_string());

    let res = c.patch(app.url(&format!("/api/v1/reservations/{}/cancel", rid))).send().await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], format!("Reservation {} cannot be cancelled, current status is CANCELLED", rid));

    // Book is free again
    let res = reserve(&app, book_id, "bob").await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = c
        .get(app.url(&format!("/api/v1/reservations?bookId={}&sort=reservedAt,asc", book_id)))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let page: Value = res.json().await?;
    assert_eq!(page["totalElements"], 2);
    assert_eq!(page["content"][0]["userName"], "alice");

    let res = c
        .get(app.url(&format!("/api/v1/reservations?bookId={}&status=ACTIVE", book_id)))
        .send()
        .await?;
    let page: Value = res.json().await?;
    assert_eq!(page["totalElements"], 1);
    assert_eq!(page["content"][0]["userName"], "bob");

    let res = c.get(app.url("/api/v1/reservations?status=LOST")).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = c.delete(app.url(&format!("/api/v1/books/{}", book_id))).send().await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(res.json::<Value>().await?["message"], "Cannot delete a book with reservation history");
    Ok(())
}

#[tokio::test]
async fn e2e_reservation_validation_and_missing_book() -> anyhow::Result<()> {
    let Some(app) = start_server().await? else { return Ok(()) };

    let res = client().post(app.url("/api/v1/reservations")).json(&json!({"userName": "  "})).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    let fields: Vec<&str> = body["fieldErrors"].as_array().unwrap().iter().map(|f| f["field"].as_str().unwrap()).collect();
    assert!(fields.contains(&"bookId"));
    assert!(fields.contains(&"userName"));

    let res = reserve(&app, 9_000_000_000, "carol").await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.json::<Value>().await?["message"], "Book not found with id 9000000000");
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn e2e_concurrent_reservations_admit_exactly_one() -> anyhow::Result<()> {
    let Some(app) = start_server().await? else { return Ok(()) };
    let a = create_author(&app, "Octavia", "Butler").await?;
    let book = create_book(&app, "Kindred", &[a]).await?;
    let book_id = book["id"].as_i64().unwrap();

    let app = Arc::new(app);
    let mut handles = Vec::new();
    for i in 0..10 {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            reserve(&app, book_id, &format!("user-{}", i)).await.map(|r| r.status())
        }));
    }
    let mut created = 0;
    let mut conflicts = 0;
    for h in handles {
        match h.await?? {
            StatusCode::CREATED => created += 1,
            StatusCode::CONFLICT => conflicts += 1,
            other => panic!("unexpected status {}", other),
        }
    }
    assert_eq!(created, 1);
    assert_eq!(conflicts, 9);
    Ok(())
}
