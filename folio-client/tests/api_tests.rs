//! Integration tests for the HTTP catalog client against an in-process mock backend

use axum::{
    extract::{Path, Query},
    http::{header, HeaderMap, StatusCode},
    response::{AppendHeaders, IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use folio_client::HttpCatalog;
use folio_core::hero::ManualDriver;
use folio_core::pages::{CatalogPage, HomePage, ProfilePage};
use folio_core::{
    ApiError, BookQuery, BorrowRequest, CatalogApi, FolioConfig, ProfileUpdate, Registration,
    SessionContext, UserProfile,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;

const SESSION_COOKIE: &str = "sessionid=s3ss10n";
const CSRF_TOKEN: &str = "tok123";

fn books() -> Value {
    json!([
        {"id": 1, "name": "The Old Man and the Sea", "price": 30, "date": "1952-09-01",
         "category": [{"id": 1, "name": "Novel"}], "cover_image": "/media/book_covers/old.jpg"},
        {"id": 2, "name": "Dune", "date": "1965-08-01", "category": [{"id": 2, "name": "Sci-Fi"}]},
        {"id": 3, "name": "Emma", "price": 10, "sell": true, "available_copy": 3}
    ])
}

fn sara() -> Value {
    json!({"id": 1, "username": "sara", "email": "sara@example.com", "is_admin": false})
}

fn signed_in(headers: &HeaderMap) -> bool {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(|c| c.contains(SESSION_COOKIE))
        .unwrap_or(false)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"detail": "Authentication credentials were not provided."})),
    )
        .into_response()
}

async fn list_books(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let limit: usize = params
        .get("limit")
        .and_then(|l| l.parse().ok())
        .unwrap_or(10);
    let all = books();
    let mut data: Vec<Value> = all.as_array().cloned().unwrap_or_default();
    if let Some(search) = params.get("search") {
        data.retain(|b| {
            b["name"]
                .as_str()
                .map(|n| n.to_lowercase().contains(&search.to_lowercase()))
                .unwrap_or(false)
        });
    }
    data.truncate(limit);
    let count = data.len();
    Json(json!({"data": data, "count": count, "total_pages": 1, "current_page": 1}))
}

async fn get_book(Path(id): Path<i64>) -> Response {
    let all = books();
    match all.as_array().and_then(|b| b.iter().find(|b| b["id"] == id)) {
        Some(book) => Json(json!({"data": book})).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."}))).into_response(),
    }
}

async fn list_categories() -> Json<Value> {
    Json(json!({"data": [{"id": 1, "name": "Novel"}, {"id": 2, "name": "Sci-Fi"}], "count": 2}))
}

async fn category_books(Path(id): Path<i64>) -> Json<Value> {
    let all = books();
    let data: Vec<Value> = all
        .as_array()
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .filter(|b| {
            b["category"]
                .as_array()
                .map(|cats| cats.iter().any(|c| c["id"] == id))
                .unwrap_or(false)
        })
        .collect();
    Json(json!({"data": data}))
}

async fn home() -> Json<Value> {
    let all = books();
    Json(json!({
        "message": "Welcome",
        "data": {
            "previous_reading": [],
            "new_books": [all[0], all[1]],
            "popular_books": [all[1], all[2]],
            "special_books": [all[2]],
            "categories": [{"id": 1, "name": "Novel", "count": 1}],
            "authors": [{"id": 1, "name": "Ernest Hemingway"}]
        }
    }))
}

async fn login(Json(body): Json<Value>) -> Response {
    let username = body["username"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();
    if (username == "sara" || username == "sara@example.com") && password == "secret" {
        (
            AppendHeaders([
                (header::SET_COOKIE, format!("{}; Path=/; HttpOnly", SESSION_COOKIE)),
                (header::SET_COOKIE, format!("csrftoken={}; Path=/", CSRF_TOKEN)),
            ]),
            Json(json!({"message": "Login successful", "data": sara()})),
        )
            .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Invalid username or password"})),
        )
            .into_response()
    }
}

async fn register(Json(body): Json<Value>) -> Response {
    if body["password"] != body["password2"] {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "message": "Registration failed",
                "errors": {"non_field_errors": ["Passwords do not match"]}
            })),
        )
            .into_response();
    }
    if body["username"] == "sara" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "message": "Registration failed",
                "errors": {"username": ["user with this username already exists."]}
            })),
        )
            .into_response();
    }
    (
        StatusCode::CREATED,
        Json(json!({"message": "Registered", "data": {"id": 2, "username": body["username"]}})),
    )
        .into_response()
}

async fn logout(headers: HeaderMap) -> Response {
    if !signed_in(&headers) {
        return unauthorized();
    }
    let csrf = headers.get("X-CSRFToken").and_then(|v| v.to_str().ok());
    if csrf != Some(CSRF_TOKEN) {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({"detail": "CSRF Failed: CSRF token missing."})),
        )
            .into_response();
    }
    (
        AppendHeaders([(header::SET_COOKIE, "sessionid=; Path=/; Max-Age=0".to_string())]),
        Json(json!({"message": "Logged out"})),
    )
        .into_response()
}

async fn me(headers: HeaderMap) -> Response {
    if !signed_in(&headers) {
        return unauthorized();
    }
    Json(json!({"data": sara()})).into_response()
}

async fn profile(headers: HeaderMap) -> Response {
    if !signed_in(&headers) {
        return unauthorized();
    }
    Json(json!({
        "data": {"user": sara(), "borrow_limit": 2, "warning": 0, "address": "Tehran", "phone": 9121234567u64},
        "active_borrows": 1,
        "remaining_borrow_limit": 1
    }))
    .into_response()
}

async fn stats(headers: HeaderMap) -> Response {
    if !signed_in(&headers) {
        return unauthorized();
    }
    Json(json!({
        "total_borrows": 5,
        "active_borrows": 1,
        "returned_borrows": 4,
        "overdue_borrows": 0,
        "borrow_limit": 2,
        "remaining_borrow_limit": 1,
        "warnings": 0
    }))
    .into_response()
}

fn has_csrf(headers: &HeaderMap) -> bool {
    headers.get("X-CSRFToken").and_then(|v| v.to_str().ok()) == Some(CSRF_TOKEN)
}

fn borrow_of(id: i64, book: &Value, is_return: bool) -> Value {
    json!({
        "id": id,
        "user": sara(),
        "book": book,
        "borrow_date": "2024-03-01T09:00:00Z",
        "return_date": "2024-03-15T09:00:00Z",
        "is_return": is_return
    })
}

async fn my_active_borrows(headers: HeaderMap) -> Response {
    if !signed_in(&headers) {
        return unauthorized();
    }
    let all = books();
    Json(json!({"data": [borrow_of(7, &all[1], false)], "count": 1})).into_response()
}

async fn create_borrow(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !signed_in(&headers) {
        return unauthorized();
    }
    if !has_csrf(&headers) {
        return (StatusCode::FORBIDDEN, Json(json!({"detail": "CSRF Failed"}))).into_response();
    }
    let all = books();
    let Some(book) = all
        .as_array()
        .and_then(|b| b.iter().find(|b| b["id"] == body["book_id"]))
    else {
        return (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."}))).into_response();
    };
    if book["available_copy"].as_i64().unwrap_or(0) <= 0 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "No copies available"})),
        )
            .into_response();
    }
    let mut borrow = borrow_of(8, book, false);
    borrow["return_date"] = body["return_date"].clone();
    (
        StatusCode::CREATED,
        Json(json!({"message": "Book borrowed", "data": borrow})),
    )
        .into_response()
}

async fn return_borrow(headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if !signed_in(&headers) {
        return unauthorized();
    }
    if id != 7 {
        return (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."}))).into_response();
    }
    let all = books();
    Json(json!({
        "message": "Book returned late, a warning was added",
        "data": borrow_of(7, &all[1], true)
    }))
    .into_response()
}

async fn purchase(headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if !signed_in(&headers) {
        return unauthorized();
    }
    let all = books();
    match all.as_array().and_then(|b| b.iter().find(|b| b["id"] == id)) {
        Some(book) if book["sell"] == true => {
            let mut sold = book.clone();
            sold["available_copy"] = json!(book["available_copy"].as_i64().unwrap_or(0) - 1);
            Json(json!({"message": "Book purchased", "book": sold, "price": book["price"]}))
                .into_response()
        }
        Some(_) => (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "This book is not for sale"})),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."}))).into_response(),
    }
}

async fn update_profile(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !signed_in(&headers) {
        return unauthorized();
    }
    let mut profile = json!({"user": sara(), "borrow_limit": 2, "warning": 0, "address": "Tehran", "phone": 9121234567u64});
    if let Some(fields) = body.as_object() {
        for (key, value) in fields {
            profile[key] = value.clone();
        }
    }
    Json(json!({"message": "Profile updated", "data": profile})).into_response()
}

fn router() -> Router {
    Router::new()
        .route("/", get(home))
        .route("/books/", get(list_books))
        .route("/books/:id/", get(get_book))
        .route("/books/:id/purchase/", post(purchase))
        .route("/categories/", get(list_categories))
        .route("/categories/:id/books/", get(category_books))
        .route("/accounts/login/", post(login))
        .route("/accounts/register/", post(register))
        .route("/accounts/logout/", post(logout))
        .route("/accounts/me/", get(me))
        .route("/accounts/profile/", get(profile))
        .route("/accounts/profile/update/", put(update_profile))
        .route("/borrows/my-active/", get(my_active_borrows))
        .route("/borrows/create/", post(create_borrow))
        .route("/borrows/:id/return/", post(return_borrow))
        .route("/stats/", get(stats))
}

/// Start the mock backend and return its base URL
async fn spawn_backend() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock backend");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router()).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Create a client wired to a fresh mock backend
async fn create_test_client() -> (HttpCatalog, SessionContext) {
    let base = spawn_backend().await;
    let config = FolioConfig {
        api_url: base,
        request_timeout: Duration::from_secs(5),
        ..Default::default()
    };
    let session = SessionContext::new();
    let client = HttpCatalog::new(&config, session.clone()).expect("Failed to build client");
    (client, session)
}

#[tokio::test]
async fn test_list_books() {
    let (client, _) = create_test_client().await;

    let books = client.list_books(&BookQuery::with_limit(50)).await.unwrap();
    assert_eq!(books.len(), 3);
    assert_eq!(books[0].name, "The Old Man and the Sea");
    assert_eq!(books[0].primary_category().unwrap().name, "Novel");
    assert!(books[1].price.is_none());
}

#[tokio::test]
async fn test_list_books_sends_query() {
    let (client, _) = create_test_client().await;

    let books = client
        .list_books(&BookQuery::with_limit(50).search("dune"))
        .await
        .unwrap();
    assert_eq!(books.len(), 1);

    let books = client.list_books(&BookQuery::with_limit(2)).await.unwrap();
    assert_eq!(books.len(), 2);
}

#[tokio::test]
async fn test_get_book_not_found() {
    let (client, _) = create_test_client().await;

    assert_eq!(client.get_book(2).await.unwrap().name, "Dune");
    assert_eq!(
        client.get_book(99).await,
        Err(ApiError::NotFound("Not found.".to_string()))
    );
}

#[tokio::test]
async fn test_categories() {
    let (client, _) = create_test_client().await;

    let categories = client.list_categories().await.unwrap();
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[1].name, "Sci-Fi");

    let books = client
        .category_books(2, &BookQuery::with_limit(10))
        .await
        .unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].id, 2);
}

#[tokio::test]
async fn test_home_feed_hero_items() {
    let (client, _) = create_test_client().await;

    let feed = client.home_feed().await.unwrap();
    assert_eq!(feed.authors.len(), 1);
    assert_eq!(feed.categories[0].count, Some(1));

    let ids: Vec<i64> = feed.hero_items().iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![3, 2, 1]);
}

#[tokio::test]
async fn test_login_keeps_session_cookie() {
    let (client, _) = create_test_client().await;

    assert_eq!(client.me().await, Err(ApiError::Unauthorized));

    let user = client.login("sara", "secret").await.unwrap();
    assert_eq!(user.username, "sara");
    assert_eq!(client.me().await.unwrap(), user);

    let details = client.profile().await.unwrap();
    assert_eq!(details.profile.borrow_limit, 2);
    assert_eq!(details.remaining_borrow_limit, 1);

    let stats = client.user_stats().await.unwrap();
    assert_eq!(stats.total_borrows, 5);
    assert_eq!(stats.returned_borrows, 4);
}

#[tokio::test]
async fn test_login_rejects_bad_password() {
    let (client, _) = create_test_client().await;
    assert_eq!(
        client.login("sara", "wrong").await,
        Err(ApiError::Unauthorized)
    );
}

#[tokio::test]
async fn test_logout_sends_csrf_token() {
    let (client, _) = create_test_client().await;

    client.login("sara", "secret").await.unwrap();
    let ack = client.logout().await.unwrap();
    assert_eq!(ack.message.as_deref(), Some("Logged out"));
    assert_eq!(client.me().await, Err(ApiError::Unauthorized));
}

#[tokio::test]
async fn test_register_errors_surface_message() {
    let (client, _) = create_test_client().await;

    let ack = client
        .register(&Registration::new("omid", "omid@example.com", "pw", "pw"))
        .await
        .unwrap();
    assert_eq!(ack.message.as_deref(), Some("Registered"));

    let err = client
        .register(&Registration::new("sara", "sara@example.com", "pw", "pw"))
        .await
        .unwrap_err();
    match err {
        ApiError::Status { status, message } => {
            assert_eq!(status, 400);
            assert!(message.contains("already exists"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_borrow_lifecycle() {
    let (client, _) = create_test_client().await;
    assert_eq!(
        client.my_active_borrows().await,
        Err(ApiError::Unauthorized)
    );
    client.login("sara", "secret").await.unwrap();

    let active = client.my_active_borrows().await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].book.name, "Dune");

    let receipt = client
        .borrow(&BorrowRequest::for_days(3, 14))
        .await
        .unwrap();
    assert_eq!(receipt.borrow.book.id, 3);
    assert!(receipt.borrow.is_active());

    let err = client
        .borrow(&BorrowRequest::for_days(2, 14))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ApiError::Status {
            status: 400,
            message: "No copies available".to_string()
        }
    );

    let returned = client.return_borrow(7).await.unwrap();
    assert!(returned.borrow.is_return);
    assert!(returned.message.unwrap().contains("late"));
    assert!(matches!(
        client.return_borrow(99).await,
        Err(ApiError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_purchase() {
    let (client, _) = create_test_client().await;
    client.login("sara", "secret").await.unwrap();

    let purchase = client.purchase(3).await.unwrap();
    assert_eq!(purchase.price, Some(10.0));
    assert_eq!(purchase.book.available_copy, Some(2));

    assert!(matches!(
        client.purchase(2).await,
        Err(ApiError::Status { status: 400, .. })
    ));
}

#[tokio::test]
async fn test_update_profile() {
    let (client, _) = create_test_client().await;
    client.login("sara", "secret").await.unwrap();

    let profile = client
        .update_profile(&ProfileUpdate {
            address: Some("Isfahan".into()),
            phone: None,
        })
        .await
        .unwrap();
    assert_eq!(profile.address.as_deref(), Some("Isfahan"));
    assert_eq!(profile.phone, Some(9121234567));
    assert_eq!(profile.user.unwrap().username, "sara");
}

#[tokio::test]
async fn test_unauthorized_invalidates_session() {
    let (client, session) = create_test_client().await;
    session.sign_in(UserProfile {
        id: 1,
        username: "sara".into(),
        email: String::new(),
        is_admin: false,
    });

    assert!(client.user_stats().await.is_err());
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_unreachable_backend() {
    let config = FolioConfig {
        api_url: "http://127.0.0.1:9".into(),
        request_timeout: Duration::from_secs(2),
        ..Default::default()
    };
    let client = HttpCatalog::new(&config, SessionContext::new()).unwrap();

    let mut page = CatalogPage::new();
    page.load(&client, 50).await;
    assert!(page.view().is_empty());
    assert!(matches!(
        client.list_categories().await,
        Err(ApiError::Transport(_))
    ));
}

#[tokio::test]
async fn test_pages_over_http() {
    let (client, session) = create_test_client().await;

    let mut catalog = CatalogPage::new();
    catalog.load(&client, 50).await;
    catalog.set_sort("price-low".parse().unwrap());
    let ids: Vec<i64> = catalog.view().iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![3, 1, 2]);

    let driver = ManualDriver::new();
    let mut home = HomePage::new(driver.clone(), Duration::from_secs(6)).unwrap();
    home.load(&client).await;
    assert_eq!(home.hero().len(), 3);
    for _ in 0..3 {
        driver.fire();
    }
    assert_eq!(home.hero().current_index(), 0);

    let mut profile = ProfilePage::new(session.clone());
    assert!(profile.load(&client).await.is_err());

    let user = client.login("sara", "secret").await.unwrap();
    session.sign_in(user);
    profile.load(&client).await.unwrap();
    assert_eq!(profile.stats().unwrap().borrow_limit, 2);
}
