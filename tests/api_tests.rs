use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use cinedex::api::LOGIN_REQUIRED;
use cinedex::config::{Config, SessionBackend};
use cinedex::db::migrator::DEFAULT_ADMIN_API_KEY;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn spawn_app() -> Router {
    let db_path = std::env::temp_dir().join(format!("cinedex-api-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());
    config.server.secure_cookies = false;
    config.server.session_backend = SessionBackend::Database;

    let state = cinedex::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    cinedex::api::router(state)
}

enum Auth<'a> {
    None,
    Key(&'a str),
    Bearer(&'a str),
    Cookie(&'a str),
}

fn request(method: &str, uri: &str, auth: &Auth<'_>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    builder = match auth {
        Auth::None => builder,
        Auth::Key(key) => builder.header("X-Api-Key", *key),
        Auth::Bearer(key) => builder.header(header::AUTHORIZATION, format!("Bearer {key}")),
        Auth::Cookie(cookie) => builder.header(header::COOKIE, *cookie),
    };

    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Option<String>, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, cookie, json)
}

const ADMIN: Auth<'static> = Auth::Key(DEFAULT_ADMIN_API_KEY);

/// Registers an account and returns its session cookie.
async fn register(app: &Router, name: &str, email: &str) -> String {
    let (status, cookie, body) = send(
        app,
        request(
            "POST",
            "/api/auth/register",
            &Auth::None,
            Some(json!({ "name": name, "email": email, "password": "secret-password" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["role"], "user");
    cookie.expect("register should start a session")
}

async fn create_director(app: &Router, auth: &Auth<'_>, name: &str, year: Value) -> i64 {
    let (status, _, body) = send(
        app,
        request(
            "POST",
            "/api/directors",
            auth,
            Some(json!({ "name": name, "birthYear": year })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["id"].as_i64().unwrap()
}

async fn create_movie(app: &Router, auth: &Auth<'_>, title: &str, director_id: i64) -> i64 {
    let (status, _, body) = send(
        app,
        request(
            "POST",
            "/api/movies",
            auth,
            Some(json!({ "title": title, "releaseYear": 2021, "directorId": director_id })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_health_is_public() {
    let app = spawn_app().await;

    let (status, _, body) = send(&app, request("GET", "/api/health", &Auth::None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["database"], true);
}

#[tokio::test]
async fn test_auth_sources() {
    let app = spawn_app().await;

    let (status, _, body) = send(&app, request("GET", "/api/movies", &Auth::None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], LOGIN_REQUIRED);

    let (status, _, _) =
        send(&app, request("GET", "/api/movies", &Auth::Key("wrong-key"), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, _) = send(&app, request("GET", "/api/movies", &ADMIN, None)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, body) = send(
        &app,
        request("GET", "/api/auth/me", &Auth::Bearer(DEFAULT_ADMIN_API_KEY), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "admin@localhost");
    assert_eq!(body["data"]["role"], "admin");
}

#[tokio::test]
async fn test_login_session_lifecycle() {
    let app = spawn_app().await;

    let (status, _, body) = send(
        &app,
        request(
            "POST",
            "/api/auth/login",
            &Auth::None,
            Some(json!({ "email": "admin@localhost", "password": "wrong" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid email or password");

    let (status, cookie, body) = send(
        &app,
        request(
            "POST",
            "/api/auth/login",
            &Auth::None,
            Some(json!({ "email": "admin@localhost", "password": "password" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Logged in successfully!");
    assert_eq!(body["data"]["api_key"], DEFAULT_ADMIN_API_KEY);
    let cookie = cookie.expect("login should set a session cookie");
    assert!(cookie.starts_with("cinedex.sid="));

    let (status, _, body) =
        send(&app, request("GET", "/api/auth/me", &Auth::Cookie(&cookie), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Administrator");

    let (status, _, _) = send(
        &app,
        request("POST", "/api/auth/logout", &Auth::Cookie(&cookie), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, _) =
        send(&app, request("GET", "/api/auth/me", &Auth::Cookie(&cookie), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_rules() {
    let app = spawn_app().await;

    let (status, _, body) = send(
        &app,
        request(
            "POST",
            "/api/auth/register",
            &Auth::None,
            Some(json!({ "name": "Ann", "email": "not-an-email", "password": "secret-password" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid email address");

    let (status, _, body) = send(
        &app,
        request(
            "POST",
            "/api/auth/register",
            &Auth::None,
            Some(json!({ "name": "Ann", "email": "ann@example.com", "password": "short" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Password must be at least 8 characters");

    register(&app, "Ann", "ann@example.com").await;

    let (status, _, body) = send(
        &app,
        request(
            "POST",
            "/api/auth/register",
            &Auth::None,
            Some(json!({ "name": "Ann Again", "email": "ann@example.com", "password": "secret-password" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "User already exists. Use another email.");
}

#[tokio::test]
async fn test_emails_ignore_case() {
    let app = spawn_app().await;
    register(&app, "Ann", "Ann@Example.com").await;

    let (status, _, body) = send(
        &app,
        request(
            "POST",
            "/api/auth/register",
            &Auth::None,
            Some(json!({ "name": "Ann Two", "email": "ann@example.com", "password": "secret-password" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "User already exists. Use another email.");

    let (status, _, body) = send(
        &app,
        request(
            "POST",
            "/api/auth/login",
            &Auth::None,
            Some(json!({ "email": " ANN@EXAMPLE.COM ", "password": "secret-password" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["email"], "ann@example.com");
}

#[tokio::test]
async fn test_api_key_regeneration() {
    let app = spawn_app().await;
    let cookie = register(&app, "Kim", "kim@example.com").await;

    let (status, _, body) = send(
        &app,
        request("GET", "/api/auth/api-key", &Auth::Cookie(&cookie), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let old_key = body["data"]["api_key"].as_str().unwrap().to_string();
    assert_eq!(old_key.len(), 64);

    let (status, _, body) = send(
        &app,
        request("POST", "/api/auth/api-key/regenerate", &Auth::Cookie(&cookie), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let new_key = body["data"]["api_key"].as_str().unwrap().to_string();
    assert_ne!(old_key, new_key);

    let (status, _, _) = send(&app, request("GET", "/api/auth/me", &Auth::Key(&old_key), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _, _) = send(&app, request("GET", "/api/auth/me", &Auth::Key(&new_key), None)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_change_password() {
    let app = spawn_app().await;
    let cookie = register(&app, "Lee", "lee@example.com").await;

    let (status, _, _) = send(
        &app,
        request(
            "PUT",
            "/api/auth/password",
            &Auth::Cookie(&cookie),
            Some(json!({ "current_password": "nope-nope", "new_password": "another-secret" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = send(
        &app,
        request(
            "PUT",
            "/api/auth/password",
            &Auth::Cookie(&cookie),
            Some(json!({ "current_password": "secret-password", "new_password": "another-secret" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, _) = send(
        &app,
        request(
            "POST",
            "/api/auth/login",
            &Auth::None,
            Some(json!({ "email": "lee@example.com", "password": "another-secret" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_director_validation_and_uniqueness() {
    let app = spawn_app().await;

    let (status, _, body) = send(
        &app,
        request("POST", "/api/directors", &ADMIN, Some(json!({ "name": "   " }))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Name is required!");

    let (status, _, body) = send(
        &app,
        request(
            "POST",
            "/api/directors",
            &ADMIN,
            Some(json!({ "name": "Agnès Varda", "birthYear": "nineteen" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Birth year must be a valid number!");

    let (status, _, body) = send(
        &app,
        request(
            "POST",
            "/api/directors",
            &ADMIN,
            Some(json!({ "name": "Agnès Varda", "birthYear": 1700 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Birth year must be between 1800 and"));

    create_director(&app, &ADMIN, "Agnès Varda", json!("1928")).await;

    let (status, _, body) = send(
        &app,
        request(
            "POST",
            "/api/directors",
            &ADMIN,
            Some(json!({ "name": "Agnès Varda", "birthYear": 1928 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "A director with this name and birth year already exists!");

    create_director(&app, &ADMIN, "Unknown", Value::Null).await;
    let (status, _, _) = send(
        &app,
        request("POST", "/api/directors", &ADMIN, Some(json!({ "name": "Unknown" }))),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _, body) = send(&app, request("GET", "/api/directors/999", &ADMIN, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Director with ID 999 not found!");
}

#[tokio::test]
async fn test_director_with_movies_cannot_be_deleted() {
    let app = spawn_app().await;

    let director_id = create_director(&app, &ADMIN, "Denis Villeneuve", json!(1967)).await;
    let movie_id = create_movie(&app, &ADMIN, "Dune", director_id).await;

    let uri = format!("/api/directors/{director_id}");
    let (status, _, body) = send(&app, request("DELETE", &uri, &ADMIN, None)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Cannot delete a director that still has movies!");

    let (status, _, body) = send(
        &app,
        request("DELETE", &format!("/api/movies/{movie_id}"), &ADMIN, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Movie deleted successfully!");
    assert_eq!(body["data"]["title"], "Dune");

    let (status, _, body) = send(&app, request("DELETE", &uri, &ADMIN, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Director deleted successfully!");
}

#[tokio::test]
async fn test_only_creator_or_admin_can_modify() {
    let app = spawn_app().await;

    let owner = register(&app, "Owner", "owner@example.com").await;
    let other = register(&app, "Other", "other@example.com").await;
    let owner_auth = Auth::Cookie(&owner);
    let other_auth = Auth::Cookie(&other);

    let director_id = create_director(&app, &owner_auth, "Sofia Coppola", json!(1971)).await;
    let movie_id = create_movie(&app, &owner_auth, "Lost in Translation", director_id).await;

    let (status, _, body) = send(
        &app,
        request(
            "PUT",
            &format!("/api/directors/{director_id}"),
            &other_auth,
            Some(json!({ "name": "Renamed" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "You don't have permission to update this director!");

    let (status, _, body) = send(
        &app,
        request("DELETE", &format!("/api/movies/{movie_id}"), &other_auth, None),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "You don't have permission to delete this movie!");

    let (status, _, body) = send(
        &app,
        request(
            "PUT",
            &format!("/api/movies/{movie_id}"),
            &owner_auth,
            Some(json!({ "title": "Lost in Translation", "releaseYear": "2003", "directorId": director_id, "description": "Tokyo." })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["releaseYear"], 2003);
    assert_eq!(body["data"]["addedByUser"]["name"], "Owner");

    let (status, _, _) = send(
        &app,
        request("DELETE", &format!("/api/movies/{movie_id}"), &ADMIN, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_director_update_rules() {
    let app = spawn_app().await;

    let owner = register(&app, "Owner", "owner@example.com").await;
    let other = register(&app, "Other", "other@example.com").await;
    let owner_auth = Auth::Cookie(&owner);
    let other_auth = Auth::Cookie(&other);

    let director_id = create_director(&app, &owner_auth, "Bong Joon-ho", json!(1969)).await;
    create_director(&app, &owner_auth, "Park Chan-wook", json!(1963)).await;
    let uri = format!("/api/directors/{director_id}");

    let (status, _, body) = send(
        &app,
        request(
            "PUT",
            &uri,
            &owner_auth,
            Some(json!({ "name": "Bong Joon-ho", "birthYear": 1969 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Director updated successfully!");

    let (status, _, body) = send(
        &app,
        request(
            "PUT",
            &uri,
            &owner_auth,
            Some(json!({ "name": "Park Chan-wook", "birthYear": "1963" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "A director with this name and birth year already exists!");

    let (status, _, body) = send(
        &app,
        request(
            "PUT",
            &uri,
            &ADMIN,
            Some(json!({ "name": "Bong Joon Ho", "birthYear": 1969 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["name"], "Bong Joon Ho");
    assert_eq!(body["data"]["addedByName"], "Owner");

    let (status, _, body) = send(&app, request("DELETE", &uri, &other_auth, None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "You don't have permission to delete this director!");

    let (status, _, body) = send(&app, request("GET", &uri, &other_auth, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Bong Joon Ho");
}

#[tokio::test]
async fn test_movie_rules() {
    let app = spawn_app().await;
    let director_id = create_director(&app, &ADMIN, "Greta Gerwig", json!(1983)).await;

    let (status, _, body) = send(
        &app,
        request(
            "POST",
            "/api/movies",
            &ADMIN,
            Some(json!({ "title": "Ghost", "directorId": 4242 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Selected director does not exist!");

    let (status, _, body) = send(
        &app,
        request("POST", "/api/movies", &ADMIN, Some(json!({ "title": "No Director" }))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Director is required!");

    create_movie(&app, &ADMIN, "Barbie", director_id).await;
    let (status, _, body) = send(
        &app,
        request(
            "POST",
            "/api/movies",
            &ADMIN,
            Some(json!({ "title": "Barbie", "directorId": director_id.to_string() })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "A movie with this title and director already exists!");

    let (status, _, body) = send(&app, request("GET", "/api/movies/999", &ADMIN, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Movie with ID 999 not found!");
}

#[tokio::test]
async fn test_movie_search_and_latest() {
    let app = spawn_app().await;

    let (status, _, body) = send(&app, request("GET", "/api/movies", &ADMIN, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "0 movies were fetched successfully!");
    assert_eq!(body["data"]["count"], 0);

    let nolan = create_director(&app, &ADMIN, "Christopher Nolan", json!(1970)).await;
    let villeneuve = create_director(&app, &ADMIN, "Denis Villeneuve", json!(1967)).await;
    create_movie(&app, &ADMIN, "Inception", nolan).await;
    create_movie(&app, &ADMIN, "Arrival", villeneuve).await;
    create_movie(&app, &ADMIN, "Dune", villeneuve).await;

    let (status, _, body) = send(&app, request("GET", "/api/movies", &ADMIN, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Movies fetched successfully!");
    let titles: Vec<&str> = body["data"]["movies"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Arrival", "Dune", "Inception"]);

    let (_, _, body) = send(&app, request("GET", "/api/movies?q=VILLENEUVE", &ADMIN, None)).await;
    assert_eq!(body["data"]["count"], 2);

    let (_, _, body) = send(&app, request("GET", "/api/movies?q=%20%20", &ADMIN, None)).await;
    assert_eq!(body["data"]["count"], 3);

    let (status, _, body) =
        send(&app, request("GET", "/api/movies/latest?limit=2", &ADMIN, None)).await;
    assert_eq!(status, StatusCode::OK);
    let latest = body["data"].as_array().unwrap();
    assert_eq!(latest.len(), 2);
    assert_eq!(latest[0]["title"], "Dune");
    assert_eq!(latest[1]["title"], "Arrival");
    assert_eq!(latest[0]["director"]["name"], "Denis Villeneuve");

    let (status, _, _) =
        send(&app, request("GET", "/api/movies/latest?limit=0", &ADMIN, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, _, body) = send(&app, request("GET", "/api/directors?q=1970", &ADMIN, None)).await;
    assert_eq!(body["data"]["count"], 1);
    assert_eq!(body["data"]["directors"][0]["name"], "Christopher Nolan");
    assert_eq!(body["data"]["directors"][0]["addedByName"], "Administrator");
}

#[tokio::test]
async fn test_unknown_api_route_is_json_404() {
    let app = spawn_app().await;

    let (status, _, body) = send(&app, request("GET", "/api/nope", &ADMIN, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_malformed_requests_use_error_envelope() {
    let app = spawn_app().await;

    let (status, _, body) = send(&app, request("GET", "/api/directors/abc", &ADMIN, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());

    let malformed = Request::builder()
        .method("POST")
        .uri("/api/movies")
        .header("X-Api-Key", DEFAULT_ADMIN_API_KEY)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"title\": "))
        .unwrap();
    let (status, _, body) = send(&app, malformed).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());

    let (status, _, body) = send(
        &app,
        request("GET", "/api/movies/latest?limit=many", &ADMIN, None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}
