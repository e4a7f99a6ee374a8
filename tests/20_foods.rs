mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::{json, Value};

use common::TestApp;

fn names(body: &Value) -> Vec<String> {
    body.as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item["food_name"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[tokio::test]
async fn top_foods_sorted_by_count_and_capped_at_six() -> Result<()> {
    let app = TestApp::new();
    for (i, count) in [3, 9, 1, 7, 0, 12, 5, 8].iter().enumerate() {
        app.seed_food(json!({ "food_name": format!("food-{}", i), "count": count })).await?;
    }

    let res = app.get("/food").await?;
    assert_eq!(res.status, StatusCode::OK);

    let counts: Vec<i64> = res.body.as_array().unwrap().iter().filter_map(|f| f["count"].as_i64()).collect();
    assert_eq!(counts, vec![12, 9, 8, 7, 5, 3]);
    Ok(())
}

#[tokio::test]
async fn paged_list_uses_page_times_size_offset() -> Result<()> {
    let app = TestApp::new();
    for i in 0..7 {
        app.seed_food(json!({ "food_name": format!("food-{}", i) })).await?;
    }

    let page = app.get("/foods?page=1&size=3").await?;
    assert_eq!(page.status, StatusCode::OK);
    assert_eq!(names(&page.body), vec!["food-3", "food-4", "food-5"]);

    let last = app.get("/foods?page=2&size=3").await?;
    assert_eq!(names(&last.body), vec!["food-6"]);

    let beyond = app.get("/foods?page=10&size=3").await?;
    assert_eq!(beyond.body, json!([]));
    Ok(())
}

#[tokio::test]
async fn paged_list_is_idempotent_without_writes() -> Result<()> {
    let app = TestApp::new();
    for i in 0..5 {
        app.seed_food(json!({ "food_name": format!("food-{}", i), "count": i % 2 })).await?;
    }

    let first = app.get("/foods?page=0&size=4").await?;
    let second = app.get("/foods?page=0&size=4").await?;
    assert_eq!(first.body, second.body);
    assert_eq!(first.body.as_array().map(Vec::len), Some(4));
    Ok(())
}

#[tokio::test]
async fn paged_list_without_size_returns_everything() -> Result<()> {
    let app = TestApp::new();
    for i in 0..3 {
        app.seed_food(json!({ "food_name": format!("food-{}", i) })).await?;
    }

    let res = app.get("/foods").await?;
    assert_eq!(res.body.as_array().map(Vec::len), Some(3));
    Ok(())
}

#[tokio::test]
async fn fetch_by_id_returns_document_or_null() -> Result<()> {
    let app = TestApp::new();
    let id = app.seed_food(json!({ "food_name": "Bibimbap", "price": 12.5 })).await?;

    let found = app.get(&format!("/foods/{}", id)).await?;
    assert_eq!(found.status, StatusCode::OK);
    assert_eq!(found.body["food_name"], "Bibimbap");
    assert_eq!(found.body["_id"], json!(id));

    let missing = app.get("/foods/does-not-exist").await?;
    assert_eq!(missing.status, StatusCode::OK);
    assert_eq!(missing.body, Value::Null);
    Ok(())
}

#[tokio::test]
async fn create_stores_body_verbatim() -> Result<()> {
    let app = TestApp::new();
    let body = json!({ "food_name": "Tacos", "extra": { "spicy": true }, "tags": ["mexican"] });

    let res = app.post("/foods", body).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["acknowledged"], true);

    let id = res.body["insertedId"].as_str().unwrap();
    let stored = app.get(&format!("/foods/{}", id)).await?;
    assert_eq!(stored.body["extra"], json!({ "spicy": true }));
    assert_eq!(stored.body["tags"], json!(["mexican"]));
    Ok(())
}

#[tokio::test]
async fn stock_update_on_unknown_id_upserts_only_those_fields() -> Result<()> {
    let app = TestApp::new();
    let res = app.patch("/foods/unknown-id", json!({ "quantity": 5, "count": 1 })).await?;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(
        res.body,
        json!({ "acknowledged": true, "matchedCount": 0, "modifiedCount": 0, "upsertedId": "unknown-id", "upsertedCount": 1 })
    );

    let stored = app.get("/foods/unknown-id").await?;
    assert_eq!(stored.body, json!({ "_id": "unknown-id", "quantity": 5, "count": 1 }));
    Ok(())
}

#[tokio::test]
async fn stock_update_keeps_other_fields() -> Result<()> {
    let app = TestApp::new();
    let id = app.seed_food(json!({ "food_name": "Pho", "quantity": 10, "count": 2 })).await?;

    let res = app.patch(&format!("/foods/{}", id), json!({ "quantity": 9, "count": 3 })).await?;
    assert_eq!(res.body["matchedCount"], 1);
    assert_eq!(res.body["modifiedCount"], 1);

    let stored = app.get(&format!("/foods/{}", id)).await?;
    assert_eq!(stored.body["food_name"], "Pho");
    assert_eq!(stored.body["quantity"], 9);
    assert_eq!(stored.body["count"], 3);
    Ok(())
}

#[tokio::test]
async fn full_update_writes_editable_fields() -> Result<()> {
    let app = TestApp::new();
    let id = app
        .seed_food(json!({ "food_name": "Old", "email": "owner@example.com", "count": 4 }))
        .await?;

    let edit = json!({
        "food_name": "New",
        "food_image": "https://img.example.com/new.png",
        "food_category": "Dessert",
        "quantity": 20,
        "price": 7.25,
        "food_origin": "France",
        "description": "Fresh"
    });
    let res = app.patch(&format!("/updateFood/{}", id), edit).await?;
    assert_eq!(res.body["modifiedCount"], 1);

    let stored = app.get(&format!("/foods/{}", id)).await?;
    assert_eq!(stored.body["food_name"], "New");
    assert_eq!(stored.body["food_origin"], "France");
    assert_eq!(stored.body["email"], "owner@example.com");
    assert_eq!(stored.body["count"], 4);
    Ok(())
}

#[tokio::test]
async fn full_update_on_unknown_id_upserts() -> Result<()> {
    let app = TestApp::new();
    let res = app.patch("/updateFood/new-food", json!({ "food_name": "Gyoza" })).await?;
    assert_eq!(res.body["upsertedCount"], 1);

    let stored = app.get("/foods/new-food").await?;
    assert_eq!(stored.body["food_name"], "Gyoza");
    assert_eq!(stored.body["price"], Value::Null);
    Ok(())
}

#[tokio::test]
async fn search_is_case_insensitive_substring() -> Result<()> {
    let app = TestApp::new();
    app.seed_food(json!({ "food_name": "Pizza Margherita" })).await?;
    app.seed_food(json!({ "food_name": "Deep Dish PIZZA" })).await?;
    app.seed_food(json!({ "food_name": "Caesar Salad" })).await?;

    let res = app.get("/searchFoods?search=pizza").await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(names(&res.body), vec!["Pizza Margherita", "Deep Dish PIZZA"]);

    let none = app.get("/searchFoods?search=sushi").await?;
    assert_eq!(none.body, json!([]));
    Ok(())
}

#[tokio::test]
async fn count_reports_total_foods() -> Result<()> {
    let app = TestApp::new();
    assert_eq!(app.get("/foodsCount").await?.body, json!({ "count": 0 }));

    app.seed_food(json!({ "food_name": "A" })).await?;
    app.seed_food(json!({ "food_name": "B" })).await?;

    assert_eq!(app.get("/foodsCount").await?.body, json!({ "count": 2 }));
    Ok(())
}
