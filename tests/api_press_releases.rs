mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::{data_uri, spawn_app, total_count, TestApp, STAFF_TOKEN};
use kistpark_admin::constants::{
    ERROR_PRESS_RELEASE_REQUIRED_FIELDS, FAILED_CREATE_PRESS_RELEASE, SUCCESS_PRESS_RELEASE_DELETED,
};

const TOKEN: Option<&str> = Some(STAFF_TOKEN);

fn release(title: &str, publisher: &str) -> Value {
    json!({
        "title": title,
        "publisher": publisher,
        "date": "2025-02-01T00:00:00.000Z",
        "link": "https://news.example.com/story",
        "image": data_uri(7),
    })
}

async fn create_release(app: &TestApp, body: Value) -> Value {
    let response = app.post("/api/v1/press-release", TOKEN, body).await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.text);
    response.body["pressRelease"].clone()
}

#[tokio::test]
async fn test_create_uploads_image() {
    let app = spawn_app().await;
    let created = create_release(&app, release("Campus opens", "Korea Herald")).await;

    assert_eq!(created["title"], "Campus opens");
    assert_eq!(created["publisher"], "Korea Herald");
    assert_eq!(created["date"], "2025-02-01");
    assert_eq!(created["seq"], 1);
    assert_eq!(
        created["image"],
        "https://res.cloudinary.com/test/image/upload/v1700000000/kistpark/img1.png"
    );

    let uploads = app.host.uploads.lock().unwrap().clone();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].1.width_limit, 1024);
    assert_eq!(uploads[0].1.quality, "auto:low");
}

#[tokio::test]
async fn test_create_accepts_hosted_url_and_image_list() {
    let app = spawn_app().await;
    let mut body = release("Listed", "Yonhap");
    body["image"] = json!(["https://cdn.example.com/a.jpg", data_uri(1)]);

    let created = create_release(&app, body).await;
    assert_eq!(created["image"], "https://cdn.example.com/a.jpg");
    assert_eq!(app.host.upload_count(), 0);
}

#[tokio::test]
async fn test_create_requires_every_field() {
    let app = spawn_app().await;
    for field in ["title", "publisher", "date", "link", "image"] {
        let mut body = release("t", "p");
        body.as_object_mut().unwrap().remove(field);
        let response = app.post("/api/v1/press-release", TOKEN, body).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "missing {}", field);
        assert_eq!(response.body["message"], ERROR_PRESS_RELEASE_REQUIRED_FIELDS);
    }
    assert_eq!(app.host.upload_count(), 0);
}

#[tokio::test]
async fn test_create_fails_when_upload_fails() {
    let app = spawn_app().await;
    app.host.set_failing(true);

    let response = app.post("/api/v1/press-release", TOKEN, release("t", "p")).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["message"], FAILED_CREATE_PRESS_RELEASE);

    let list = app.get("/api/v1/press-release", TOKEN).await;
    assert_eq!(total_count(&list), 0);
}

#[tokio::test]
async fn test_update_replaces_image_after_saving() {
    let app = spawn_app().await;
    let created = create_release(&app, release("Before", "p")).await;
    let id = created["_id"].as_str().unwrap();

    let response = app
        .patch(
            &format!("/api/v1/press-release/{}", id),
            TOKEN,
            json!({ "title": "After", "image": data_uri(9) }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let updated = &response.body["pressRelease"];
    assert_eq!(updated["title"], "After");
    assert_eq!(updated["publisher"], "p");
    assert!(updated["image"].as_str().unwrap().ends_with("kistpark/img2.png"));

    assert_eq!(app.wait_for_destroyed(1).await, vec!["kistpark/img1".to_string()]);
}

#[tokio::test]
async fn test_update_keeps_old_image_when_upload_fails() {
    let app = spawn_app().await;
    let created = create_release(&app, release("Stable", "p")).await;
    let id = created["_id"].as_str().unwrap();
    app.host.set_failing(true);

    let response = app
        .patch(&format!("/api/v1/press-release/{}", id), TOKEN, json!({ "image": data_uri(3) }))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["pressRelease"]["image"], created["image"]);
    assert!(app.host.destroyed().is_empty());
}

#[tokio::test]
async fn test_update_rejects_blank_required_field() {
    let app = spawn_app().await;
    let created = create_release(&app, release("t", "p")).await;

    let response = app
        .patch(
            &format!("/api/v1/press-release/{}", created["_id"].as_str().unwrap()),
            TOKEN,
            json!({ "publisher": "   " }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_filters_by_publisher() {
    let app = spawn_app().await;
    create_release(&app, release("One", "Korea Herald")).await;
    create_release(&app, release("Two", "Yonhap")).await;
    create_release(&app, release("Three", "Korea Herald")).await;

    let response = app.get("/api/v1/press-release?publisher=Korea%20Herald", TOKEN).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(total_count(&response), 2);

    let windowed = app
        .get("/api/v1/press-release?_start=0&_end=1&_sort=seq&_order=desc", TOKEN)
        .await;
    assert_eq!(total_count(&windowed), 3);
    assert_eq!(windowed.body.as_array().unwrap().len(), 1);
    assert_eq!(windowed.body[0]["title"], "Three");
}

#[tokio::test]
async fn test_list_without_window_params() {
    let app = spawn_app().await;
    create_release(&app, release("One", "p")).await;
    create_release(&app, release("Two", "p")).await;

    let all = app.get("/api/v1/press-release", TOKEN).await;
    assert_eq!(all.status, StatusCode::OK, "{}", all.text);
    assert_eq!(all.body.as_array().unwrap().len(), 2);

    let tail = app.get("/api/v1/press-release?_start=1&_sort=seq&_order=asc", TOKEN).await;
    assert_eq!(tail.status, StatusCode::OK, "{}", tail.text);
    assert_eq!(tail.body.as_array().unwrap().len(), 1);
    assert_eq!(tail.body[0]["title"], "Two");
}

#[tokio::test]
async fn test_delete_single_and_many() {
    let app = spawn_app().await;
    let a = create_release(&app, release("a", "p")).await;
    let b = create_release(&app, release("b", "p")).await;
    let c = create_release(&app, release("c", "p")).await;

    let single = app
        .delete(&format!("/api/v1/press-release/{}", a["_id"].as_str().unwrap()), TOKEN)
        .await;
    assert_eq!(single.status, StatusCode::OK);
    assert_eq!(single.body["message"], SUCCESS_PRESS_RELEASE_DELETED);

    let ids = format!("{},{}", b["_id"].as_str().unwrap(), c["_id"].as_str().unwrap());
    let many = app.delete(&format!("/api/v1/press-release/{}", ids), TOKEN).await;
    assert_eq!(many.status, StatusCode::OK);
    assert_eq!(many.body["message"], "Successfully deleted 2 press releases");

    let mut destroyed = app.wait_for_destroyed(3).await;
    destroyed.sort();
    assert_eq!(destroyed, vec!["kistpark/img1", "kistpark/img2", "kistpark/img3"]);

    let again = app.delete(&format!("/api/v1/press-release/{}", ids), TOKEN).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_public_routes_need_no_token() {
    let app = spawn_app().await;
    let created = create_release(&app, release("Public", "p")).await;

    let list = app.get("/api/v1/press-release-web", None).await;
    assert_eq!(list.status, StatusCode::OK);
    assert_eq!(total_count(&list), 1);

    let one = app
        .get(&format!("/api/v1/press-release-web/{}", created["_id"].as_str().unwrap()), None)
        .await;
    assert_eq!(one.status, StatusCode::OK);
    assert_eq!(one.body["title"], "Public");

    let protected = app.get("/api/v1/press-release", None).await;
    assert_eq!(protected.status, StatusCode::UNAUTHORIZED);
}
