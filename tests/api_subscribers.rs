mod common;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use common::{spawn_app, TestApp, STAFF_TOKEN};
use kistpark_admin::constants::{
    ERROR_EMAIL_REQUIRED, ERROR_INVALID_EMAIL, ERROR_NO_SUBSCRIBERS_DELETED, ERROR_SUBSCRIBER_EXISTS,
    SUCCESS_SUBSCRIBED,
};

const TOKEN: Option<&str> = Some(STAFF_TOKEN);

async fn subscribe(app: &TestApp, email: &str) -> String {
    let response = app.post("/api/v1/subscribers", None, json!({ "email": email })).await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.text);
    response.body["data"]["_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_subscribe_is_public() {
    let app = spawn_app().await;

    let response = app
        .post("/api/v1/subscribers", None, json!({ "email": " reader@example.com " }))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["message"], SUCCESS_SUBSCRIBED);
    assert_eq!(response.body["data"]["email"], "reader@example.com");
    assert_eq!(response.body["data"]["seq"], 1);

    let second = app
        .post("/api/v1/subscribers", None, json!({ "email": "other@example.com" }))
        .await;
    assert_eq!(second.body["data"]["seq"], 2);
}

#[tokio::test]
async fn test_subscribe_validation() {
    let app = spawn_app().await;
    subscribe(&app, "reader@example.com").await;

    let duplicate = app
        .post("/api/v1/subscribers", None, json!({ "email": "reader@example.com" }))
        .await;
    assert_eq!(duplicate.status, StatusCode::BAD_REQUEST);
    assert_eq!(duplicate.body["message"], ERROR_SUBSCRIBER_EXISTS);

    let invalid = app.post("/api/v1/subscribers", None, json!({ "email": "not-an-email" })).await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
    assert_eq!(invalid.body["message"], ERROR_INVALID_EMAIL);

    let missing = app.post("/api/v1/subscribers", None, json!({})).await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.body["message"], ERROR_EMAIL_REQUIRED);
}

#[tokio::test]
async fn test_list_requires_token_and_is_newest_first() {
    let app = spawn_app().await;
    subscribe(&app, "first@example.com").await;
    subscribe(&app, "second@example.com").await;

    let anonymous = app.get("/api/v1/subscribers", None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let response = app.get("/api/v1/subscribers", TOKEN).await;
    assert_eq!(response.status, StatusCode::OK);
    let emails: Vec<&str> = response
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["email"].as_str().unwrap())
        .collect();
    assert_eq!(emails, vec!["second@example.com", "first@example.com"]);
}

#[tokio::test]
async fn test_export_csv() {
    let app = spawn_app().await;
    subscribe(&app, "first@example.com").await;
    subscribe(&app, "second@example.com").await;

    let response = app.get("/api/v1/subscribers/export", TOKEN).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.headers["content-type"].to_str().unwrap().starts_with("text/csv"));
    assert!(response.headers["content-disposition"]
        .to_str()
        .unwrap()
        .contains("subscribers.csv"));

    let lines: Vec<&str> = response.text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "Sequence,Email,Subscription Date");
    assert!(lines[1].starts_with("2,second@example.com,"));
    assert!(lines[2].starts_with("1,first@example.com,"));
}

#[tokio::test]
async fn test_delete_reports_per_id() {
    let app = spawn_app().await;
    let first = subscribe(&app, "first@example.com").await;
    let second = subscribe(&app, "second@example.com").await;
    let ghost = Uuid::new_v4().to_string();

    let ids = format!("{},{},bogus,{}", first, ghost, second);
    let response = app.delete(&format!("/api/v1/subscribers/{}", ids), TOKEN).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Successfully deleted 2 subscribers");

    let results = response.body["results"].as_array().unwrap();
    assert_eq!(results.len(), 4);
    assert_eq!(results[0]["success"], true);
    assert_eq!(results[1]["success"], false);
    assert_eq!(results[1]["message"], "Subscriber not found");
    assert_eq!(results[2]["id"], "bogus");
    assert_eq!(results[2]["success"], false);
    assert_eq!(results[3]["success"], true);

    let list = app.get("/api/v1/subscribers", TOKEN).await;
    assert_eq!(list.body, json!([]));
}

#[tokio::test]
async fn test_delete_nothing_is_not_found() {
    let app = spawn_app().await;
    let response = app
        .delete(&format!("/api/v1/subscribers/{}", Uuid::new_v4()), TOKEN)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], ERROR_NO_SUBSCRIBERS_DELETED);
    assert_eq!(response.body["results"][0]["success"], false);
}
