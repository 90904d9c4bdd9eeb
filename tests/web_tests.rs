use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use cinedex::config::Config;
use cinedex::db::migrator::DEFAULT_ADMIN_API_KEY;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn spawn_app() -> Router {
    let db_path = std::env::temp_dir().join(format!("cinedex-web-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());
    config.server.secure_cookies = false;

    let state = cinedex::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    cinedex::api::router(state)
}

struct Page {
    status: StatusCode,
    location: Option<String>,
    cookie: Option<String>,
    body: String,
}

async fn send(app: &Router, req: Request<Body>) -> Page {
    let response = app.clone().oneshot(req).await.unwrap();
    let header_str = |name| {
        response
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    let status = response.status();
    let location = header_str(header::LOCATION);
    let cookie = header_str(header::SET_COOKIE)
        .and_then(|c| c.split(';').next().map(str::to_string));

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    Page {
        status,
        location,
        cookie,
        body: String::from_utf8_lossy(&bytes).into_owned(),
    }
}

async fn get(app: &Router, uri: &str, cookie: Option<&str>) -> Page {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    send(app, builder.body(Body::empty()).unwrap()).await
}

async fn post_form(app: &Router, uri: &str, cookie: Option<&str>, form: &str) -> Page {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    send(app, builder.body(Body::from(form.to_string())).unwrap()).await
}

async fn api_post(app: &Router, uri: &str, body: Value) -> Value {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("X-Api-Key", DEFAULT_ADMIN_API_KEY)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let page = send(app, req).await;
    assert_eq!(page.status, StatusCode::CREATED, "{}", page.body);
    serde_json::from_str(&page.body).unwrap()
}

async fn login(app: &Router, email: &str, password: &str) -> String {
    let form = format!(
        "email={}&password={}&returnTo=%2F",
        urlencoding::encode(email),
        urlencoding::encode(password)
    );
    let page = post_form(app, "/login", None, &form).await;
    assert_eq!(page.status, StatusCode::SEE_OTHER, "{}", page.body);
    page.cookie.expect("login should set a session cookie")
}

#[tokio::test]
async fn test_home_page_is_public() {
    let app = spawn_app().await;

    let page = get(&app, "/", None).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Discover Your Next"));
    assert!(page.body.contains(r#"href="/login""#));
}

#[tokio::test]
async fn test_protected_page_redirects_to_login() {
    let app = spawn_app().await;

    let page = get(&app, "/movies?q=dune", None).await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(
        page.location.as_deref(),
        Some("/login?returnTo=%2Fmovies%3Fq%3Ddune")
    );
}

#[tokio::test]
async fn test_login_returns_to_requested_page() {
    let app = spawn_app().await;

    let page = post_form(
        &app,
        "/login",
        None,
        "email=admin%40localhost&password=wrong&returnTo=%2Fdirectors",
    )
    .await;
    assert_eq!(page.status, StatusCode::UNAUTHORIZED);
    assert!(page.body.contains("Invalid email or password"));

    let page = post_form(
        &app,
        "/login",
        None,
        "email=admin%40localhost&password=password&returnTo=%2Fdirectors",
    )
    .await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(page.location.as_deref(), Some("/directors"));
    let cookie = page.cookie.unwrap();

    let page = get(&app, "/directors", Some(&cookie)).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Welcome back, Administrator!"));
    assert!(page.body.contains("No directors found"));

    let page = get(&app, "/directors", Some(&cookie)).await;
    assert!(!page.body.contains("Welcome back"));

    let page = post_form(&app, "/logout", Some(&cookie), "").await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    let page = get(&app, "/directors", Some(&cookie)).await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_external_return_to_is_ignored() {
    let app = spawn_app().await;

    let page = post_form(
        &app,
        "/login",
        None,
        "email=admin%40localhost&password=password&returnTo=%2F%2Fevil.example",
    )
    .await;
    assert_eq!(page.location.as_deref(), Some("/"));

    for target in ["%2F%09%2Fevil.example", "%2Fa%0Ab", "%2Fa%0Db"] {
        let form = format!("email=admin%40localhost&password=password&returnTo={target}");
        let page = post_form(&app, "/login", None, &form).await;
        assert_eq!(page.status, StatusCode::SEE_OTHER, "returnTo={target}");
        assert_eq!(page.location.as_deref(), Some("/"), "returnTo={target}");
    }
}

#[tokio::test]
async fn test_register_page_logs_in() {
    let app = spawn_app().await;

    let page = post_form(
        &app,
        "/register",
        None,
        "name=Mia&email=mia%40example.com&password=short",
    )
    .await;
    assert_eq!(page.status, StatusCode::BAD_REQUEST);
    assert!(page.body.contains("Password must be at least 8 characters"));
    assert!(page.body.contains("mia@example.com"));

    let page = post_form(
        &app,
        "/register",
        None,
        "name=Mia&email=mia%40example.com&password=long-enough",
    )
    .await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    let cookie = page.cookie.unwrap();

    let page = get(&app, "/account", Some(&cookie)).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Account created successfully!"));
    assert!(page.body.contains("mia@example.com"));
}

#[tokio::test]
async fn test_director_wizard() {
    let app = spawn_app().await;
    let cookie = login(&app, "admin@localhost", "password").await;

    let page = get(&app, "/directors/new", Some(&cookie)).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Add New Director"));
    assert!(page.body.contains(r#"<li class="active"><span>1</span>Core Info</li>"#));

    let page = post_form(
        &app,
        "/directors/new",
        Some(&cookie),
        "step=review&name=Jane+Campion&birth_year=abc",
    )
    .await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Birth year must be a valid number!"));
    assert!(page.body.contains(r#"value="Jane Campion""#));

    let page = post_form(
        &app,
        "/directors/new",
        Some(&cookie),
        "step=review&name=Jane+Campion&birth_year=1954",
    )
    .await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains(r#"<li class="active"><span>2</span>Review</li>"#));
    assert!(page.body.contains(r#"<input type="hidden" name="birth_year" value="1954">"#));
    assert!(page.body.contains("Add Director"));

    let page = post_form(
        &app,
        "/directors/new",
        Some(&cookie),
        "step=edit&name=Jane+Campion&birth_year=1954",
    )
    .await;
    assert!(page.body.contains(r#"<li class="active"><span>1</span>Core Info</li>"#));

    let page = post_form(
        &app,
        "/directors/new",
        Some(&cookie),
        "step=confirm&name=Jane+Campion&birth_year=1954",
    )
    .await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(page.location.as_deref(), Some("/directors"));

    let page = get(&app, "/directors?q=campion", Some(&cookie)).await;
    assert!(page.body.contains("Director added successfully!"));
    assert!(page.body.contains("Found 1 director"));
    assert!(page.body.contains("Jane Campion"));
    assert!(page.body.contains("Administrator (You)"));

    let page = post_form(
        &app,
        "/directors/new",
        Some(&cookie),
        "step=confirm&name=Jane+Campion&birth_year=1954",
    )
    .await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("A director with this name and birth year already exists!"));
}

#[tokio::test]
async fn test_movie_pages() {
    let app = spawn_app().await;
    let cookie = login(&app, "admin@localhost", "password").await;

    let director = api_post(
        &app,
        "/api/directors",
        json!({ "name": "Céline Sciamma", "birthYear": 1978 }),
    )
    .await;
    let director_id = director["data"]["id"].as_i64().unwrap();

    let page = get(&app, "/movies/new", Some(&cookie)).await;
    assert!(page.body.contains("Céline Sciamma"));

    let form = format!(
        "step=review&title=Petite+Maman&release_year=2021&director_id={director_id}&description=Two+girls+in+the+woods."
    );
    let page = post_form(&app, "/movies/new", Some(&cookie), &form).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("<dt>Director</dt><dd>Céline Sciamma</dd>"));

    let form = form.replace("step=review", "step=confirm");
    let page = post_form(&app, "/movies/new", Some(&cookie), &form).await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    let location = page.location.unwrap();
    assert!(location.starts_with("/movies?id="));

    let page = get(&app, &location, Some(&cookie)).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Movie added successfully!"));
    assert!(page.body.contains("Petite Maman"));
    assert!(page.body.contains("Two girls in the woods."));
    assert!(page.body.contains("Edit movie"));

    let page = get(&app, "/movies?id=abc", Some(&cookie)).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("No movies were found with given ID."));

    let page = get(&app, "/", Some(&cookie)).await;
    assert!(page.body.contains("Latest movies"));
    assert!(page.body.contains("Petite Maman"));

    let page = get(&app, &format!("/directors/{director_id}/delete"), Some(&cookie)).await;
    assert!(page.body.contains("Are you sure you want to delete"));

    let page = post_form(
        &app,
        &format!("/directors/{director_id}/delete"),
        Some(&cookie),
        "",
    )
    .await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    let page = get(&app, "/directors", Some(&cookie)).await;
    assert!(page.body.contains("Cannot delete a director that still has movies!"));
}

#[tokio::test]
async fn test_foreign_records_are_read_only() {
    let app = spawn_app().await;

    let director = api_post(
        &app,
        "/api/directors",
        json!({ "name": "Wong Kar-wai", "birthYear": 1958 }),
    )
    .await;
    let director_id = director["data"]["id"].as_i64().unwrap();

    let page = post_form(
        &app,
        "/register",
        None,
        "name=Viewer&email=viewer%40example.com&password=long-enough",
    )
    .await;
    let cookie = page.cookie.unwrap();

    let page = get(&app, "/directors", Some(&cookie)).await;
    assert!(page.body.contains("Wong Kar-wai"));
    assert!(!page.body.contains(&format!("/directors/{director_id}/edit")));

    let page = get(&app, &format!("/directors/{director_id}/edit"), Some(&cookie)).await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    let page = get(&app, "/directors", Some(&cookie)).await;
    assert!(page.body.contains("You don't have permission to update this director!"));
}

#[tokio::test]
async fn test_unknown_page_and_assets() {
    let app = spawn_app().await;

    let page = get(&app, "/nowhere", None).await;
    assert_eq!(page.status, StatusCode::NOT_FOUND);
    assert!(page.body.contains("Page not found"));

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/assets/app.css").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        mime::TEXT_CSS.as_ref()
    );
}
