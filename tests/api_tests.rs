use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use http_body_util::BodyExt;
use randuser::config::Config;
use tower::ServiceExt;

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();

    let state = randuser::api::create_app_state(config)
        .await
        .expect("Failed to create app state");
    randuser::api::router(state)
}

fn json_request(method: Method, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", mime::APPLICATION_JSON.as_ref())
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn ali_veli() -> serde_json::Value {
    serde_json::json!({
        "gender": "male",
        "username": "aliveli",
        "name": {"first": "Ali", "last": "Veli"},
        "email": "a@b.com",
        "phone": "5551234567"
    })
}

async fn add_user(app: &Router, payload: &serde_json::Value) {
    let response = app
        .clone()
        .oneshot(json_request(Method::POST, "/api/users/add", payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

async fn list_users(app: &Router, uri: &str) -> Vec<serde_json::Value> {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    body["results"].as_array().unwrap().clone()
}

#[tokio::test]
async fn add_then_get_round_trip() {
    let app = spawn_app().await;

    add_user(&app, &ali_veli()).await;

    let results = list_users(&app, "/api/users").await;
    assert_eq!(results.len(), 1);

    let uuid = results[0]["login"]["uuid"].as_str().unwrap().to_string();
    assert!(!uuid.is_empty());

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/users/{uuid}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let user = body_json(response).await;
    assert_eq!(user["name"]["first"], "Ali");
    assert_eq!(user["name"]["last"], "Veli");
    assert_eq!(user["email"], "a@b.com");
    assert_eq!(user["phone"], "5551234567");
    assert_eq!(user["gender"], "male");
}

#[tokio::test]
async fn full_create_round_trips_required_fields() {
    let app = spawn_app().await;

    let record = serde_json::json!({
        "gender": "female",
        "name": {"title": "Ms", "first": "Ayse", "last": "Demir"},
        "location": {
            "street": {"number": 12, "name": "Istiklal"},
            "city": "Istanbul",
            "state": "Marmara",
            "country": "Turkey",
            "postcode": 34000,
            "coordinates": {"latitude": "41.0082", "longitude": "28.9784"},
            "timezone": {"offset": "+3:00", "description": "Istanbul"}
        },
        "email": "ayse@example.com",
        "login": {"uuid": "11111111-2222-3333-4444-555555555555", "username": "aysedemir"},
        "dob": {"date": "1990-05-01T10:00:00.000Z", "age": 36},
        "registered": {"date": "2020-01-01T00:00:00.000Z", "age": 6},
        "phone": "5550001122",
        "cell": "5330001122",
        "id": {"name": "TCKN", "value": null},
        "picture": {"large": "https://example.com/l.jpg"},
        "nat": "TR"
    });

    let response = app
        .clone()
        .oneshot(json_request(Method::POST, "/api/users", &record))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(body_json(response).await["message"].is_string());

    let results = list_users(&app, "/api/users").await;
    assert_eq!(results.len(), 1);

    let stored = &results[0];
    assert_eq!(stored["login"]["uuid"], "11111111-2222-3333-4444-555555555555");
    assert_eq!(stored["gender"], "female");
    assert_eq!(stored["email"], "ayse@example.com");
    // Numeric upstream postcode comes back as text.
    assert_eq!(stored["location"]["postcode"], "34000");
    assert_eq!(stored["location"]["street"]["number"], 12);
    assert_eq!(stored["dob"]["date"], "1990-05-01T10:00:00.000Z");
    assert_eq!(stored["id"]["value"], serde_json::Value::Null);
}

#[tokio::test]
async fn create_without_body_is_bad_request() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/users")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn add_with_missing_field_is_bad_request() {
    let app = spawn_app().await;

    let mut payload = ali_veli();
    payload["email"] = serde_json::json!("");

    let response = app
        .clone()
        .oneshot(json_request(Method::POST, "/api/users/add", &payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "email is required");
}

#[tokio::test]
async fn list_filters_by_gender_and_limit() {
    let app = spawn_app().await;

    let mut first = ali_veli();
    first["gender"] = serde_json::json!("female");
    first["name"] = serde_json::json!({"first": "Ayse", "last": "Demir"});
    add_user(&app, &first).await;

    let mut second = ali_veli();
    second["gender"] = serde_json::json!("female");
    second["name"] = serde_json::json!({"first": "Fatma", "last": "Kaya"});
    add_user(&app, &second).await;

    add_user(&app, &ali_veli()).await;

    let everyone = list_users(&app, "/api/users").await;
    assert_eq!(everyone.len(), 3);

    let women = list_users(&app, "/api/users?gender=female").await;
    assert_eq!(women.len(), 2);
    assert!(women.iter().all(|u| u["gender"] == "female"));

    let capped = list_users(&app, "/api/users?limit=2").await;
    assert_eq!(capped.len(), 2);

    // An empty filter value means no filter at all.
    let unfiltered = list_users(&app, "/api/users?gender=&limit=0").await;
    assert_eq!(unfiltered.len(), 3);
}

#[tokio::test]
async fn update_missing_user_is_not_found() {
    let app = spawn_app().await;

    let changes = serde_json::json!({
        "gender": "male",
        "name": {"title": "Mr", "first": "Ali", "last": "Veli"},
        "email": "a@b.com",
        "phone": "5551234567"
    });

    let response = app
        .clone()
        .oneshot(json_request(
            Method::PUT,
            "/api/users/no-such-uuid",
            &changes,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn update_with_empty_email_changes_nothing() {
    let app = spawn_app().await;

    add_user(&app, &ali_veli()).await;
    let uuid = list_users(&app, "/api/users").await[0]["login"]["uuid"]
        .as_str()
        .unwrap()
        .to_string();

    let changes = serde_json::json!({
        "gender": "male",
        "name": {"title": "", "first": "Ali", "last": "Veli"},
        "email": "",
        "phone": "5551234567"
    });

    let response = app
        .clone()
        .oneshot(json_request(
            Method::PUT,
            &format!("/api/users/{uuid}"),
            &changes,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let results = list_users(&app, "/api/users").await;
    assert_eq!(results[0]["email"], "a@b.com");
}

#[tokio::test]
async fn update_rewrites_editable_fields() {
    let app = spawn_app().await;

    add_user(&app, &ali_veli()).await;
    let uuid = list_users(&app, "/api/users").await[0]["login"]["uuid"]
        .as_str()
        .unwrap()
        .to_string();

    let changes = serde_json::json!({
        "gender": "male",
        "name": {"title": "Mr", "first": "Ali", "last": "Can"},
        "email": "ali.can@example.com",
        "phone": "5559998877"
    });

    let response = app
        .clone()
        .oneshot(json_request(
            Method::PUT,
            &format!("/api/users/{uuid}"),
            &changes,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let results = list_users(&app, "/api/users").await;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["name"]["last"], "Can");
    assert_eq!(results[0]["email"], "ali.can@example.com");
    // Untouched columns keep their stored values.
    assert_eq!(results[0]["login"]["username"], "aliveli");
}

#[tokio::test]
async fn delete_is_idempotent_in_effect() {
    let app = spawn_app().await;

    add_user(&app, &ali_veli()).await;
    let uuid = list_users(&app, "/api/users").await[0]["login"]["uuid"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::DELETE)
                .uri(format!("/api/users/{uuid}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::DELETE)
                .uri(format!("/api/users/{uuid}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    assert!(list_users(&app, "/api/users").await.is_empty());
}

#[tokio::test]
async fn get_unknown_user_is_not_found() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/users/missing-uuid")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_json(response).await["error"].is_string());
}
