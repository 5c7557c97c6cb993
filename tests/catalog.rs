mod common;

use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{spawn_app, TestApp};

struct Seed {
    category: Value,
    brand: Value,
    group: Value,
}

async fn seed(app: &TestApp, token: &str) -> Seed {
    let category = app
        .create_category(token, json!({ "name": "Footwear", "slug": "footwear" }))
        .await;
    let brand = app
        .create_brand(token, json!({ "name": "Stride", "slug": "stride" }))
        .await;
    let group = app
        .create_group(
            token,
            json!({
                "name": "Trail Runner",
                "slug": "trail-runner",
                "category_id": category["id"],
                "brand_id": brand["id"],
                "base_price": 499900,
                "is_featured": true
            }),
        )
        .await;
    Seed {
        category,
        brand,
        group,
    }
}

#[tokio::test]
async fn test_brands() {
    let app = spawn_app().await;
    let token = app.admin_token().await;

    app.create_brand(&token, json!({ "name": "Acme", "slug": "acme" }))
        .await;
    app.create_brand(
        &token,
        json!({ "name": "Dormant", "slug": "dormant", "is_active": false }),
    )
    .await;

    let response = app.get("/api/public/brands").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.json::<Value>().await.expect("Failed to parse JSON");
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["slug"], "acme");

    let response = app.get("/api/public/brands/acme").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.get("/api/public/brands/dormant").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.get("/api/public/brands/nobody").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .admin_post(
            &token,
            "/api/admin/brands",
            &json!({ "name": "Acme 2", "slug": "acme" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_product_groups() {
    let app = spawn_app().await;
    let token = app.admin_token().await;
    let seed = seed(&app, &token).await;

    app.create_group(
        &token,
        json!({
            "name": "Draft Sandal",
            "slug": "draft-sandal",
            "category_id": seed.category["id"],
            "status": "DRAFT"
        }),
    )
    .await;

    let response = app.get("/api/public/product-groups").await;
    let body = response.json::<Value>().await.expect("Failed to parse JSON");
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["slug"], "trail-runner");
    assert_eq!(body[0]["base_price"], 499900);

    let brand_id = seed.brand["id"].as_str().expect("id");
    let response = app
        .get(&format!("/api/public/product-groups?brand_id={}&featured=true", brand_id))
        .await;
    let body = response.json::<Value>().await.expect("Failed to parse JSON");
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let response = app
        .get("/api/public/product-groups?category_id=00000000-0000-0000-0000-000000000000")
        .await;
    let body = response.json::<Value>().await.expect("Failed to parse JSON");
    assert_eq!(body, json!([]));

    let response = app.get("/api/public/product-groups/draft-sandal").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .admin_post(
            &token,
            "/api/admin/product-groups",
            &json!({
                "name": "Copy",
                "slug": "trail-runner",
                "category_id": seed.category["id"]
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .admin_post(
            &token,
            "/api/admin/product-groups",
            &json!({
                "name": "Lost",
                "slug": "lost",
                "category_id": "00000000-0000-0000-0000-000000000000"
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let group_id = seed.group["id"].as_str().expect("id");
    let response = app
        .admin_patch(
            &token,
            &format!("/api/admin/product-groups/{}", group_id),
            &json!({ "status": "INACTIVE" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.get("/api/public/product-groups/trail-runner").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_products_and_variants() {
    let app = spawn_app().await;
    let token = app.admin_token().await;
    let seed = seed(&app, &token).await;

    let first = app
        .create_product(
            &token,
            json!({
                "product_group_id": seed.group["id"],
                "sku": "TR-42-BLK",
                "variant_name": "42 / Black",
                "mrp": 599900,
                "selling_price": 499900,
                "attributes": { "size": 42, "color": "black" },
                "stock_quantity": 3,
                "is_default_variant": true
            }),
        )
        .await;
    assert_eq!(first["in_stock"], true);
    assert_eq!(first["attributes"]["color"], "black");

    app.create_product(
        &token,
        json!({
            "product_group_id": seed.group["id"],
            "sku": "TR-43-BLK",
            "is_default_variant": true
        }),
    )
    .await;

    let response = app.get("/api/public/product-groups/trail-runner").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.json::<Value>().await.expect("Failed to parse JSON");
    assert_eq!(body["name"], "Trail Runner");
    let variants = body["variants"].as_array().expect("variants");
    assert_eq!(variants.len(), 2);
    // Only the latest default survives.
    assert_eq!(variants[0]["sku"], "TR-43-BLK");
    assert_eq!(variants[0]["is_default_variant"], true);
    assert_eq!(variants[1]["is_default_variant"], false);

    let response = app.get("/api/public/products/TR-42-BLK").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.json::<Value>().await.expect("Failed to parse JSON");
    assert_eq!(body["selling_price"], 499900);

    let response = app.get("/api/public/products/NOPE-1").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .admin_post(
            &token,
            "/api/admin/products",
            &json!({ "product_group_id": seed.group["id"], "sku": "TR-42-BLK" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .admin_post(
            &token,
            "/api/admin/products",
            &json!({
                "product_group_id": seed.group["id"],
                "sku": "TR-44",
                "mrp": 100,
                "selling_price": 200
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let id = first["id"].as_str().expect("id");
    let response = app
        .admin_patch(
            &token,
            &format!("/api/admin/products/{}", id),
            &json!({ "stock_quantity": 0 }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.json::<Value>().await.expect("Failed to parse JSON");
    assert_eq!(body["in_stock"], false);

    let response = app
        .admin_delete(&token, &format!("/api/admin/products/{}", id))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.get("/api/public/products/TR-42-BLK").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_product_views_are_counted() {
    let app = spawn_app().await;
    let token = app.admin_token().await;
    let seed = seed(&app, &token).await;

    let product = app
        .create_product(
            &token,
            json!({ "product_group_id": seed.group["id"], "sku": "TR-VIEW" }),
        )
        .await;

    for _ in 0..3 {
        let response = app.get("/api/public/products/TR-VIEW").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let id = product["id"].as_str().expect("id");
    let response = app
        .client
        .get(app.url(&format!("/api/admin/products/{}/views", id)))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.json::<Value>().await.expect("Failed to parse JSON");
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["view_count"], 3);
    assert_eq!(
        body[0]["day"],
        chrono::Utc::now().date_naive().to_string()
    );
}

#[tokio::test]
async fn test_product_images() {
    let app = spawn_app().await;
    let token = app.admin_token().await;
    let seed = seed(&app, &token).await;

    let product = app
        .create_product(
            &token,
            json!({ "product_group_id": seed.group["id"], "sku": "TR-IMG" }),
        )
        .await;
    let id = product["id"].as_str().expect("id");
    let path = format!("/api/admin/products/{}/images", id);

    let response = app
        .admin_post(
            &token,
            &path,
            &json!({
                "cloudinary_url": "https://img.example.com/a.jpg",
                "display_order": 2,
                "is_primary": true
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let first = response.json::<Value>().await.expect("Failed to parse JSON");
    assert_eq!(first["image_type"], "PRODUCT");

    let response = app
        .admin_post(
            &token,
            &path,
            &json!({
                "cloudinary_url": "https://img.example.com/b.jpg",
                "display_order": 1,
                "image_type": "THUMBNAIL",
                "is_primary": true
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.get("/api/public/products/TR-IMG/images").await;
    let images = response.json::<Value>().await.expect("Failed to parse JSON");
    assert_eq!(images.as_array().map(Vec::len), Some(2));
    assert_eq!(images[0]["cloudinary_url"], "https://img.example.com/b.jpg");
    assert_eq!(images[0]["is_primary"], true);
    assert_eq!(images[1]["is_primary"], false);

    let image_id = first["id"].as_str().expect("id");
    let response = app
        .admin_delete(&token, &format!("/api/admin/images/{}", image_id))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.get("/api/public/products/TR-IMG/images").await;
    let images = response.json::<Value>().await.expect("Failed to parse JSON");
    assert_eq!(images.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_category_brand_refresh() {
    let app = spawn_app().await;
    let token = app.admin_token().await;
    let seed = seed(&app, &token).await;

    app.create_group(
        &token,
        json!({
            "name": "Road Runner",
            "slug": "road-runner",
            "category_id": seed.category["id"],
            "brand_id": seed.brand["id"]
        }),
    )
    .await;

    let response = app
        .admin_post(&token, "/api/admin/category-brands/refresh", &json!({}))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.json::<Value>().await.expect("Failed to parse JSON");
    assert_eq!(body["rows"], 1);

    let response = app.get("/api/public/categories/footwear/brands").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.json::<Value>().await.expect("Failed to parse JSON");
    assert_eq!(body[0]["slug"], "stride");
    assert_eq!(body[0]["product_count"], 2);
}

#[tokio::test]
async fn test_variant_of_draft_group_is_hidden() {
    let app = spawn_app().await;
    let token = app.admin_token().await;
    let seed = seed(&app, &token).await;

    let group = app
        .create_group(
            &token,
            json!({
                "name": "Secret",
                "slug": "secret",
                "category_id": seed.category["id"],
                "status": "DRAFT"
            }),
        )
        .await;
    let product = app
        .create_product(
            &token,
            json!({ "product_group_id": group["id"], "sku": "SECRET-1" }),
        )
        .await;

    let response = app.get("/api/public/product-groups/secret").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.get("/api/public/products/SECRET-1").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.get("/api/public/products/SECRET-1/images").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Hidden variants don't collect views.
    let id = product["id"].as_str().expect("id");
    let response = app
        .client
        .get(app.url(&format!("/api/admin/products/{}/views", id)))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    let body = response.json::<Value>().await.expect("Failed to parse JSON");
    assert_eq!(body, json!([]));

    let group_id = group["id"].as_str().expect("id");
    let response = app
        .admin_patch(
            &token,
            &format!("/api/admin/product-groups/{}", group_id),
            &json!({ "status": "ACTIVE" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.get("/api/public/products/SECRET-1").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_patch_null_clears_optional_fields() {
    let app = spawn_app().await;
    let token = app.admin_token().await;
    let seed = seed(&app, &token).await;

    let group_id = seed.group["id"].as_str().expect("id");
    let response = app
        .admin_patch(
            &token,
            &format!("/api/admin/product-groups/{}", group_id),
            &json!({ "description": "Grippy", "brand_id": null }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.json::<Value>().await.expect("Failed to parse JSON");
    assert_eq!(body["brand_id"], Value::Null);
    assert_eq!(body["description"], "Grippy");

    // Absent fields stay as they are.
    let response = app
        .admin_patch(
            &token,
            &format!("/api/admin/product-groups/{}", group_id),
            &json!({ "description": null }),
        )
        .await;
    let body = response.json::<Value>().await.expect("Failed to parse JSON");
    assert_eq!(body["description"], Value::Null);
    assert_eq!(body["name"], "Trail Runner");

    let product = app
        .create_product(
            &token,
            json!({
                "product_group_id": seed.group["id"],
                "sku": "TR-40",
                "mrp": 599900,
                "selling_price": 499900,
                "attributes": { "size": 40 }
            }),
        )
        .await;
    let id = product["id"].as_str().expect("id");

    let response = app
        .admin_patch(
            &token,
            &format!("/api/admin/products/{}", id),
            &json!({ "mrp": null, "attributes": null }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.json::<Value>().await.expect("Failed to parse JSON");
    assert_eq!(body["mrp"], Value::Null);
    assert_eq!(body["attributes"], Value::Null);
    assert_eq!(body["selling_price"], 499900);

    // With the MRP gone only the sign of a price is checked.
    let response = app
        .admin_patch(
            &token,
            &format!("/api/admin/products/{}", id),
            &json!({ "selling_price": 700000 }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .admin_patch(
            &token,
            &format!("/api/admin/products/{}", id),
            &json!({ "mrp": 100 }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .admin_patch(
            &token,
            &format!("/api/admin/products/{}", id),
            &json!({ "selling_price": -1 }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .admin_patch(
            &token,
            &format!("/api/admin/products/{}", id),
            &json!({ "selling_price": null }),
        )
        .await;
    let body = response.json::<Value>().await.expect("Failed to parse JSON");
    assert_eq!(body["selling_price"], Value::Null);
}
