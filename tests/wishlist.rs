mod common;

use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{spawn_app, TestApp};

async fn seed_product(app: &TestApp, sku: &str) -> Value {
    let token = app.admin_token().await;
    let category = app
        .create_category(&token, json!({ "name": "Books", "slug": format!("books-{}", sku.to_lowercase()) }))
        .await;
    let group = app
        .create_group(
            &token,
            json!({
                "name": "Novel",
                "slug": format!("novel-{}", sku.to_lowercase()),
                "category_id": category["id"]
            }),
        )
        .await;
    app.create_product(
        &token,
        json!({ "product_group_id": group["id"], "sku": sku }),
    )
    .await
}

#[tokio::test]
async fn test_guest_wishlist() {
    let app = spawn_app().await;
    let product = seed_product(&app, "BK-1").await;

    let body = json!({ "session_id": "guest-1", "product_id": product["id"] });
    let response = app.post_json("/api/public/wishlist", &body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let entry = response.json::<Value>().await.expect("Failed to parse JSON");

    // Adding again hands back the same row.
    let response = app.post_json("/api/public/wishlist", &body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let again = response.json::<Value>().await.expect("Failed to parse JSON");
    assert_eq!(again["id"], entry["id"]);

    let response = app.get("/api/public/wishlist?session_id=guest-1").await;
    let list = response.json::<Value>().await.expect("Failed to parse JSON");
    assert_eq!(list.as_array().map(Vec::len), Some(1));

    let response = app.get("/api/public/wishlist?session_id=guest-2").await;
    let list = response.json::<Value>().await.expect("Failed to parse JSON");
    assert_eq!(list, json!([]));

    let id = entry["id"].as_str().expect("id");
    let response = app
        .client
        .delete(app.url(&format!("/api/public/wishlist/{}?session_id=guest-2", id)))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .client
        .delete(app.url(&format!("/api/public/wishlist/{}?session_id=guest-1", id)))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .post_json(
            "/api/public/wishlist",
            &json!({
                "session_id": "guest-1",
                "product_id": "00000000-0000-0000-0000-000000000000"
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_user_wishlist_requires_token() {
    let app = spawn_app().await;

    let response = app.get("/api/wishlist").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .client
        .get(app.url("/api/wishlist"))
        .bearer_auth("not-a-token")
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_claims_guest_wishlist() {
    let app = spawn_app().await;
    let product = seed_product(&app, "BK-2").await;

    let response = app
        .post_json(
            "/api/public/wishlist",
            &json!({ "session_id": "guest-claim", "product_id": product["id"] }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let token = app.login("+15557654321", Some("guest-claim")).await;

    let response = app
        .client
        .get(app.url("/api/wishlist"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let list = response.json::<Value>().await.expect("Failed to parse JSON");
    assert_eq!(list.as_array().map(Vec::len), Some(1));
    assert_eq!(list[0]["product_id"], product["id"]);

    let response = app.get("/api/public/wishlist?session_id=guest-claim").await;
    let list = response.json::<Value>().await.expect("Failed to parse JSON");
    assert_eq!(list, json!([]));

    let response = app
        .client
        .post(app.url("/api/wishlist"))
        .bearer_auth(&token)
        .json(&json!({ "product_id": product["id"] }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let id = list_first_id(&app, &token).await;
    let response = app
        .client
        .delete(app.url(&format!("/api/wishlist/{}", id)))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
}

async fn list_first_id(app: &TestApp, token: &str) -> String {
    let response = app
        .client
        .get(app.url("/api/wishlist"))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to send request");
    let list = response.json::<Value>().await.expect("Failed to parse JSON");
    list[0]["id"].as_str().expect("id").to_string()
}

#[tokio::test]
async fn test_admin_routes_reject_users() {
    let app = spawn_app().await;

    let body = json!({ "name": "Nope", "slug": "nope" });
    let response = app.post_json("/api/admin/brands", &body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let token = app.login("+15550009999", None).await;
    let response = app.admin_post(&token, "/api/admin/brands", &body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let admin = app.admin_token().await;
    let response = app.admin_post(&admin, "/api/admin/brands", &body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}
