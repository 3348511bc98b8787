mod common;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use common::{data_uri, spawn_app, total_count, TestApp, STAFF_EMAIL, STAFF_TOKEN};
use kistpark_admin::constants::{
    ERROR_CATEGORY_NOT_FOUND, ERROR_HIGHLIGHT_REQUIRED_FIELDS, ERROR_INVALID_CATEGORY_ID, ERROR_SEQ_TAKEN,
};

const TOKEN: Option<&str> = Some(STAFF_TOKEN);

async fn create_category(app: &TestApp, name: &str) -> String {
    let response = app.post("/api/v1/categories", TOKEN, json!({ "category": name })).await;
    assert_eq!(response.status, StatusCode::CREATED);
    response.body["_id"].as_str().unwrap().to_string()
}

async fn create_highlight(app: &TestApp, body: serde_json::Value) -> serde_json::Value {
    let response = app.post("/api/v1/highlights", TOKEN, body).await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.text);
    response.body["highlight"].clone()
}

#[tokio::test]
async fn test_create_persists_fields() {
    let app = spawn_app().await;
    let category_id = create_category(&app, "Research").await;

    let highlight = create_highlight(
        &app,
        json!({
            "title": "  Smart farm pilot ",
            "content": "<p>Results</p>",
            "sdg": "SDG-2 Zero Hunger",
            "category": category_id,
            "date": "2025-03-07T15:00:00.000Z",
            "location": "Gangneung",
            "status": "published",
        }),
    )
    .await;

    assert_eq!(highlight["title"], "Smart farm pilot");
    assert_eq!(highlight["content"], "<p>Results</p>");
    assert_eq!(highlight["sdg"], json!(["SDG-2 Zero Hunger"]));
    assert_eq!(highlight["date"], "2025-03-07");
    assert_eq!(highlight["location"], "Gangneung");
    assert_eq!(highlight["status"], "published");
    assert_eq!(highlight["email"], STAFF_EMAIL);
    assert_eq!(highlight["category"]["category"], "Research");
    assert_eq!(highlight["seq"], 1);

    let id = highlight["_id"].as_str().unwrap();
    let fetched = app.get(&format!("/api/v1/highlights/{}", id), TOKEN).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["title"], "Smart farm pilot");
    assert_eq!(fetched.body["category"]["_id"], category_id.as_str());
}

#[tokio::test]
async fn test_seq_is_assigned_and_must_be_unique() {
    let app = spawn_app().await;

    let first = create_highlight(&app, json!({ "title": "One", "content": "a" })).await;
    let second = create_highlight(&app, json!({ "title": "Two", "content": "b" })).await;
    assert_eq!(first["seq"], 1);
    assert_eq!(second["seq"], 2);
    assert_eq!(first["status"], "draft");

    let duplicate = app
        .post("/api/v1/highlights", TOKEN, json!({ "title": "Three", "content": "c", "seq": 2 }))
        .await;
    assert_eq!(duplicate.status, StatusCode::BAD_REQUEST);
    assert_eq!(duplicate.body["message"], ERROR_SEQ_TAKEN);
}

#[tokio::test]
async fn test_create_validation_errors() {
    let app = spawn_app().await;

    let missing = app.post("/api/v1/highlights", TOKEN, json!({ "title": "No body" })).await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.body["message"], ERROR_HIGHLIGHT_REQUIRED_FIELDS);

    let unknown_category = app
        .post(
            "/api/v1/highlights",
            TOKEN,
            json!({ "title": "t", "content": "c", "category": Uuid::new_v4().to_string() }),
        )
        .await;
    assert_eq!(unknown_category.status, StatusCode::BAD_REQUEST);
    assert_eq!(unknown_category.body["message"], ERROR_CATEGORY_NOT_FOUND);

    let malformed_category = app
        .post("/api/v1/highlights", TOKEN, json!({ "title": "t", "content": "c", "category": "42" }))
        .await;
    assert_eq!(malformed_category.status, StatusCode::BAD_REQUEST);
    assert_eq!(malformed_category.body["message"], ERROR_INVALID_CATEGORY_ID);

    let unknown_sdg = app
        .post("/api/v1/highlights", TOKEN, json!({ "title": "t", "content": "c", "sdg": ["SDG-18 Mars"] }))
        .await;
    assert_eq!(unknown_sdg.status, StatusCode::BAD_REQUEST);

    let bad_date = app
        .post("/api/v1/highlights", TOKEN, json!({ "title": "t", "content": "c", "date": "soon" }))
        .await;
    assert_eq!(bad_date.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_uploads_inline_images() {
    let app = spawn_app().await;

    let highlight = create_highlight(
        &app,
        json!({
            "title": "Gallery",
            "content": "c",
            "images": [data_uri(1), "https://example.com/existing.jpg", data_uri(2)],
        }),
    )
    .await;

    let images = highlight["images"].as_array().unwrap();
    assert_eq!(images.len(), 3);
    assert!(images[0].as_str().unwrap().starts_with("https://res.cloudinary.com/test/image/upload/"));
    assert_eq!(images[1], "https://example.com/existing.jpg");
    assert!(highlight.get("warning").is_none());

    let uploads = app.host.uploads.lock().unwrap().clone();
    assert_eq!(uploads.len(), 2);
    assert!(uploads
        .iter()
        .all(|(_, options)| options.width_limit == 1200 && options.quality == "auto:good"));
}

#[tokio::test]
async fn test_failed_uploads_are_dropped_with_warning() {
    let app = spawn_app().await;
    app.host.set_failing(true);

    let response = app
        .post(
            "/api/v1/highlights",
            TOKEN,
            json!({ "title": "t", "content": "c", "images": [data_uri(1)] }),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["highlight"]["images"], json!([]));
    assert!(response.body["warning"].is_string());
}

#[tokio::test]
async fn test_update_diffs_images() {
    let app = spawn_app().await;
    let highlight = create_highlight(
        &app,
        json!({ "title": "t", "content": "c", "images": [data_uri(1)] }),
    )
    .await;
    let id = highlight["_id"].as_str().unwrap().to_string();

    // Second image added through an update so ordering is deterministic
    let kept = highlight["images"][0].as_str().unwrap().to_string();
    let response = app
        .patch(
            &format!("/api/v1/highlights/{}", id),
            TOKEN,
            json!({ "images": [kept.clone(), data_uri(2)] }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let images = response.body["highlight"]["images"].as_array().unwrap().clone();
    assert_eq!(images.len(), 2);
    assert_eq!(images[0], kept.as_str());
    let removed = images[1].as_str().unwrap().to_string();

    let response = app
        .patch(&format!("/api/v1/highlights/{}", id), TOKEN, json!({ "images": [kept.clone()] }))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["highlight"]["images"], json!([kept]));

    let destroyed = app.wait_for_destroyed(1).await;
    assert_eq!(destroyed, vec!["kistpark/img2".to_string()]);
    assert!(removed.ends_with("kistpark/img2.png"));
}

#[tokio::test]
async fn test_update_only_touches_sent_fields() {
    let app = spawn_app().await;
    let category_id = create_category(&app, "Events").await;
    let highlight = create_highlight(
        &app,
        json!({ "title": "Before", "content": "body", "location": "Seoul", "category": category_id }),
    )
    .await;
    let id = highlight["_id"].as_str().unwrap();

    let response = app
        .patch(&format!("/api/v1/highlights/{}", id), TOKEN, json!({ "title": "After", "location": null }))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let updated = &response.body["highlight"];
    assert_eq!(updated["title"], "After");
    assert_eq!(updated["content"], "body");
    assert_eq!(updated["location"], serde_json::Value::Null);
    assert_eq!(updated["category"]["category"], "Events");
    assert_eq!(updated["seq"], 1);
}

#[tokio::test]
async fn test_update_missing_highlight() {
    let app = spawn_app().await;
    let response = app
        .patch(&format!("/api/v1/highlights/{}", Uuid::new_v4()), TOKEN, json!({ "title": "x" }))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app.get("/api/v1/highlights/not-an-id", TOKEN).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_filters_and_windows() {
    let app = spawn_app().await;
    for (title, status) in [
        ("Solar roof", "published"),
        ("Solar bus", "draft"),
        ("Wind farm", "published"),
        ("100% recycled", "rejected"),
    ] {
        create_highlight(&app, json!({ "title": title, "content": "c", "status": status })).await;
    }

    let all = app.get("/api/v1/highlights", TOKEN).await;
    assert_eq!(all.status, StatusCode::OK);
    assert_eq!(total_count(&all), 4);

    let solar = app.get("/api/v1/highlights?title_like=SOLAR", TOKEN).await;
    assert_eq!(total_count(&solar), 2);

    let published = app.get("/api/v1/highlights?status=published", TOKEN).await;
    assert_eq!(total_count(&published), 2);

    let percent = app.get("/api/v1/highlights?title_like=100%25", TOKEN).await;
    assert_eq!(total_count(&percent), 1);

    let page = app
        .get("/api/v1/highlights?_start=1&_end=3&_sort=title&_order=asc", TOKEN)
        .await;
    assert_eq!(total_count(&page), 4);
    let titles: Vec<&str> = page
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Solar bus", "Solar roof"]);

    let invalid = app.get("/api/v1/highlights?status=archived", TOKEN).await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_without_end_returns_remaining_rows() {
    let app = spawn_app().await;
    for title in ["a", "b", "c"] {
        create_highlight(&app, json!({ "title": title, "content": "c" })).await;
    }

    let all = app.get("/api/v1/highlights", TOKEN).await;
    assert_eq!(all.status, StatusCode::OK, "{}", all.text);
    assert_eq!(all.body.as_array().unwrap().len(), 3);

    let tail = app.get("/api/v1/highlights?_start=1&_sort=title&_order=asc", TOKEN).await;
    assert_eq!(tail.status, StatusCode::OK, "{}", tail.text);
    assert_eq!(total_count(&tail), 3);
    let titles: Vec<&str> = tail
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["b", "c"]);
}

#[tokio::test]
async fn test_dashboard_lists_recent_published() {
    let app = spawn_app().await;
    create_highlight(
        &app,
        json!({ "title": "Old", "content": "c", "status": "published", "date": "2024-01-01", "images": [data_uri(1)] }),
    )
    .await;
    create_highlight(
        &app,
        json!({ "title": "New", "content": "c", "status": "published", "date": "2025-01-01" }),
    )
    .await;
    create_highlight(&app, json!({ "title": "Hidden", "content": "c", "date": "2026-01-01" })).await;

    let response = app.get("/api/v1/highlights/dashboard-highlights", TOKEN).await;
    assert_eq!(response.status, StatusCode::OK);
    let cards = response.body.as_array().unwrap();
    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0]["title"], "New");
    assert_eq!(cards[0]["featuredImage"], serde_json::Value::Null);
    assert!(cards[1]["featuredImage"].as_str().unwrap().starts_with("https://"));

    let limited = app.get("/api/v1/highlights/dashboard-highlights?limit=1", TOKEN).await;
    assert_eq!(limited.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_many_and_cleanup() {
    let app = spawn_app().await;
    let a = create_highlight(&app, json!({ "title": "a", "content": "c", "images": [data_uri(1)] })).await;
    let b = create_highlight(&app, json!({ "title": "b", "content": "c" })).await;
    let c = create_highlight(&app, json!({ "title": "c", "content": "c" })).await;

    let ids = format!("{},{}", a["_id"].as_str().unwrap(), b["_id"].as_str().unwrap());
    let response = app.delete(&format!("/api/v1/highlights/{}", ids), TOKEN).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Successfully deleted 2 highlights");

    let remaining = app.get("/api/v1/highlights", TOKEN).await;
    assert_eq!(total_count(&remaining), 1);
    assert_eq!(remaining.body[0]["_id"], c["_id"]);

    assert_eq!(app.wait_for_destroyed(1).await, vec!["kistpark/img1".to_string()]);

    let again = app.delete(&format!("/api/v1/highlights/{}", ids), TOKEN).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);

    let malformed = app.delete("/api/v1/highlights/zzz", TOKEN).await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_deleting_category_clears_reference() {
    let app = spawn_app().await;
    let category_id = create_category(&app, "Temporary").await;
    let highlight = create_highlight(&app, json!({ "title": "t", "content": "c", "category": category_id })).await;

    let response = app.delete(&format!("/api/v1/categories/{}", category_id), TOKEN).await;
    assert_eq!(response.status, StatusCode::OK);

    let fetched = app
        .get(&format!("/api/v1/highlights/{}", highlight["_id"].as_str().unwrap()), TOKEN)
        .await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["category"], serde_json::Value::Null);
    assert_eq!(fetched.body["categoryId"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_public_feed_only_shows_published() {
    let app = spawn_app().await;
    let published = create_highlight(&app, json!({ "title": "Out", "content": "c", "status": "published" })).await;
    let draft = create_highlight(&app, json!({ "title": "Draft", "content": "c" })).await;

    let feed = app.get("/api/v1/highlights-web?status=draft", None).await;
    assert_eq!(feed.status, StatusCode::OK);
    assert_eq!(total_count(&feed), 1);
    assert_eq!(feed.body[0]["title"], "Out");

    let visible = app
        .get(&format!("/api/v1/highlights-web/{}", published["_id"].as_str().unwrap()), None)
        .await;
    assert_eq!(visible.status, StatusCode::OK);

    let hidden = app
        .get(&format!("/api/v1/highlights-web/{}", draft["_id"].as_str().unwrap()), None)
        .await;
    assert_eq!(hidden.status, StatusCode::NOT_FOUND);
}
