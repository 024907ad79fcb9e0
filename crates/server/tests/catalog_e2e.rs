mod support;

use reqwest::StatusCode;
use serde_json::{json, Value};

use support::{client, create_author, create_book, start_server, unique_isbn};

#[tokio::test]
async fn e2e_health_and_docs() -> anyhow::Result<()> {
    let Some(app) = start_server().await? else { return Ok(()) };
    let res = client().get(app.url("/health")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body, json!({"status": "UP", "database": "UP"}));

    let res = client().get(app.url("/api-docs/openapi.json")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let doc: Value = res.json().await?;
    assert_eq!(doc["info"]["title"], "Library Catalog API");

    let res = client().get(app.url("/swagger-ui/")).send().await?;
    assert!(res.status().is_success());

    let res = client().get(app.url("/metrics")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.text().await?.contains("catalog_http_requests_total"));
    Ok(())
}

#[tokio::test]
async fn e2e_author_lifecycle() -> anyhow::Result<()> {
    let Some(app) = start_server().await? else { return Ok(()) };
    let c = client();

    let id = create_author(&app, "Toni", "Morrison").await?;
    let res = c.get(app.url(&format!("/api/v1/authors/{}", id))).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["firstName"], "Toni");
    assert_eq!(body["books"], json!([]));
    assert!(body["createdAt"].as_str().unwrap().ends_with('Z'));

    let res = c
        .put(app.url(&format!("/api/v1/authors/{}", id)))
        .json(&json!({"bio": "Beloved"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["bio"], "Beloved");
    assert_eq!(body["lastName"], "Morrison");

    let res = c.delete(app.url(&format!("/api/v1/authors/{}", id))).send().await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let res = c.get(app.url(&format!("/api/v1/authors/{}", id))).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], format!("Author not found with id {}", id));
    assert_eq!(body["path"], format!("/api/v1/authors/{}", id));
    Ok(())
}

#[tokio::test]
async fn e2e_author_validation() -> anyhow::Result<()> {
    let Some(app) = start_server().await? else { return Ok(()) };
    let res = client()
        .post(app.url("/api/v1/authors"))
        .json(&json!({"firstName": "", "lastName": "x".repeat(101)}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], "Bad Request");
    assert_eq!(body["message"], "Validation failed");
    let fields: Vec<&str> = body["fieldErrors"].as_array().unwrap().iter().map(|f| f["field"].as_str().unwrap()).collect();
    assert_eq!(fields, vec!["firstName", "lastName"]);
    Ok(())
}

#[tokio::test]
async fn e2e_book_lifecycle_and_conflicts() -> anyhow::Result<()> {
    let Some(app) = start_server().await? else { return Ok(()) };
    let c = client();

    let a = create_author(&app, "Iain", "Banks").await?;
    let book = create_book(&app, "Excession", &[a]).await?;
    let id = book["id"].as_i64().unwrap();
    assert_eq!(book["authors"][0]["lastName"], "Banks");

    let dup = c
        .post(app.url("/api/v1/books"))
        .json(&json!({"title": "Copy", "isbn": book["isbn"], "authorIds": [a]}))
        .send()
        .await?;
    assert_eq!(dup.status(), StatusCode::CONFLICT);
    let body: Value = dup.json().await?;
    assert_eq!(body["message"], format!("ISBN already exists: {}", book["isbn"].as_str().unwrap()));

    let missing_author = c
        .post(app.url("/api/v1/books"))
        .json(&json!({"title": "Ghost", "isbn": unique_isbn(), "authorIds": [a, 9_000_000_000_i64]}))
        .send()
        .await?;
    assert_eq!(missing_author.status(), StatusCode::NOT_FOUND);

    let updated = c
        .put(app.url(&format!("/api/v1/books/{}", id)))
        .json(&json!({"publishedYear": 1996}))
        .send()
        .await?;
    assert_eq!(updated.status(), StatusCode::OK);
    let body: Value = updated.json().await?;
    assert_eq!(body["publishedYear"], 1996);
    assert_eq!(body["title"], "Excession");

    // Sole author
    let res = c.delete(app.url(&format!("/api/v1/authors/{}", a))).send().await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Cannot delete author: sole author of book 'Excession'");

    let res = c.delete(app.url(&format!("/api/v1/books/{}", id))).send().await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    Ok(())
}

#[tokio::test]
async fn e2e_bad_inputs() -> anyhow::Result<()> {
    let Some(app) = start_server().await? else { return Ok(()) };
    let c = client();

    let res = c
        .post(app.url("/api/v1/books"))
        .header("content-type", "application/json")
        .body(r#"{"title": 5"#)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["message"], "Malformed request body");

    let res = c.get(app.url("/api/v1/books?sort=secret")).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["message"], "Invalid sort property 'secret'");

    let res = c.get(app.url("/api/v1/books?page=abc")).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(res.json::<Value>().await?["message"].as_str().unwrap().starts_with("Invalid value"));

    let res = c.get(app.url("/api/v1/books?size=500")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?["size"], 100);
    Ok(())
}
