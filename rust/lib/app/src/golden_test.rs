//! Drives the wired app through Flux requests against an in-process axum
//! server, then checks the state a renderer would read.

use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use quill_kv::{KVStore, MemoryStore};
use serde_json::{json, Value};

use crate::request::*;
use crate::routing::Route;
use crate::session::{mint_token, unix_now};
use crate::state::*;
use crate::token_store::{ACCESS_KEY, REFRESH_KEY};
use crate::{ClientConfig, QuillApp};

// =====================================================================
// Mock server
// =====================================================================

#[derive(Default)]
struct Mock {
    access: String,
    /// Handed out for the `refresh-1` refresh token.
    refreshed: String,
    /// (endpoint, query) of every list GET.
    seen: Mutex<Vec<(String, HashMap<String, String>)>>,
    detail_hits: AtomicUsize,
    comment_posts: AtomicUsize,
    comment_deletes: AtomicUsize,
    comments: Mutex<Vec<Value>>,
    logouts: Mutex<Vec<String>>,
}

impl Mock {
    fn record(&self, endpoint: &str, q: HashMap<String, String>) {
        self.seen.lock().unwrap().push((endpoint.to_string(), q));
    }

    fn seen(&self, endpoint: &str) -> Vec<HashMap<String, String>> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .filter(|(e, _)| e == endpoint)
            .map(|(_, q)| q.clone())
            .collect()
    }
}

type Shared = State<Arc<Mock>>;

fn author(username: &str) -> Value {
    json!({"id": 1, "username": username, "image": null})
}

fn post_json(slug: &str) -> Value {
    json!({
        "id": 1,
        "slug": slug,
        "title": "Hello",
        "description": "d",
        "body": "first body",
        "thumbnail": null,
        "author": author("amy"),
        "tags": [],
        "favourites_count": 4,
        "is_favourited": false,
        "created_at": "2024-01-02T03:04:05Z",
        "updated_at": "2024-01-02T03:04:05Z"
    })
}

fn list_post(id: u64) -> Value {
    json!({
        "id": id,
        "slug": format!("post-{id}"),
        "title": format!("Post {id}"),
        "description": "",
        "author": author("amy"),
        "tags": [],
        "favourites_count": 0,
        "created_at": "2024-01-02T03:04:05Z"
    })
}

fn comment_json(id: u64, body: &str) -> Value {
    json!({
        "id": id,
        "author": author("amy"),
        "body": body,
        "created_at": "2024-01-02T03:04:05Z"
    })
}

fn profile_json(username: &str) -> Value {
    json!({
        "id": 2,
        "username": username,
        "bio": "",
        "image": null,
        "followers_count": 3,
        "followed_count": 1,
        "posts_count": 0,
        "favourites_count": 0,
        "is_followed_by_you": false
    })
}

fn empty_page() -> Json<Value> {
    Json(json!({"count": 0, "next": null, "previous": null, "results": []}))
}

async fn login(State(m): Shared, Json(body): Json<Value>) -> impl IntoResponse {
    if body["password"] == "secret" {
        Json(json!({"access": m.access, "refresh": "refresh-1"})).into_response()
    } else {
        (StatusCode::UNAUTHORIZED, "No active account found").into_response()
    }
}

async fn logout(State(m): Shared, Json(body): Json<Value>) -> StatusCode {
    let refresh = body["refresh"].as_str().unwrap_or_default().to_string();
    m.logouts.lock().unwrap().push(refresh);
    StatusCode::OK
}

/// `search=boom` always fails; `search=slow` answers late.
async fn list_posts(State(m): Shared, Query(q): Query<HashMap<String, String>>) -> impl IntoResponse {
    let search = q.get("search").cloned().unwrap_or_default();
    m.record("posts", q);
    match search.as_str() {
        "boom" => return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        "slow" => tokio::time::sleep(Duration::from_millis(300)).await,
        _ => {}
    }
    Json(json!({
        "count": 25,
        "next": "http://testserver/api/posts/?page=2",
        "previous": null,
        "results": [list_post(1), list_post(2)]
    }))
    .into_response()
}

async fn create_post(Json(body): Json<Value>) -> impl IntoResponse {
    let mut post = post_json("new-post");
    post["title"] = body["title"].clone();
    post["body"] = body["body"].clone();
    (StatusCode::CREATED, Json(post))
}

async fn feed(State(m): Shared, Query(q): Query<HashMap<String, String>>) -> Json<Value> {
    let page: u64 = q.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    m.record("feed", q);
    let next = if page < 3 {
        json!(format!("http://testserver/api/posts/feed/?page={}&page_size=10", page + 1))
    } else {
        Value::Null
    };
    Json(json!({"count": 3, "next": next, "previous": null, "results": [list_post(page)]}))
}

async fn post_detail(State(m): Shared, Path(slug): Path<String>) -> impl IntoResponse {
    m.detail_hits.fetch_add(1, Ordering::SeqCst);
    if slug == "hello" {
        Json(post_json(&slug)).into_response()
    } else {
        (StatusCode::NOT_FOUND, "Not found.").into_response()
    }
}

/// Answers with a changed title too; only `body` may be taken from it.
async fn patch_post(Path(slug): Path<String>, Json(body): Json<Value>) -> Json<Value> {
    let mut post = post_json(&slug);
    post["body"] = body["body"].clone();
    post["title"] = json!("Server title");
    post["favourites_count"] = json!(100);
    Json(post)
}

async fn comments(State(m): Shared, Query(q): Query<HashMap<String, String>>) -> Json<Value> {
    let page: usize = q.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let size: usize = q.get("page_size").and_then(|p| p.parse().ok()).unwrap_or(10);
    m.record("comments", q);
    let all = m.comments.lock().unwrap().clone();
    let results: Vec<Value> = all.iter().skip((page - 1) * size).take(size).cloned().collect();
    let next = if page * size < all.len() {
        json!(format!("http://testserver/api/posts/hello/comments/?page={}", page + 1))
    } else {
        Value::Null
    };
    Json(json!({"count": all.len(), "next": next, "previous": null, "results": results}))
}

async fn add_comment(State(m): Shared, Json(body): Json<Value>) -> impl IntoResponse {
    if body["body"] == "boom" {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    let id = 100 + m.comment_posts.fetch_add(1, Ordering::SeqCst) as u64;
    let comment = comment_json(id, body["body"].as_str().unwrap_or_default());
    m.comments.lock().unwrap().insert(0, comment.clone());
    (StatusCode::CREATED, Json(comment)).into_response()
}

async fn delete_comment(State(m): Shared, Path((_, id)): Path<(String, u64)>) -> impl IntoResponse {
    m.comment_deletes.fetch_add(1, Ordering::SeqCst);
    if id == 7 {
        return (StatusCode::FORBIDDEN, "You cannot delete this comment.").into_response();
    }
    m.comments.lock().unwrap().retain(|c| c["id"] != id);
    StatusCode::NO_CONTENT.into_response()
}

async fn profile_detail(Path(username): Path<String>) -> impl IntoResponse {
    if ["amy", "bob", "carl"].contains(&username.as_str()) {
        Json(profile_json(&username)).into_response()
    } else {
        (StatusCode::NOT_FOUND, "Not found.").into_response()
    }
}

async fn list_profiles(State(m): Shared, Query(q): Query<HashMap<String, String>>) -> Json<Value> {
    m.record("profiles", q);
    empty_page()
}

/// Every list of carl's fails.
async fn followers(Path(username): Path<String>) -> impl IntoResponse {
    if username == "carl" {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    empty_page().into_response()
}

/// carl's second page fails.
async fn followed(Path(username): Path<String>, Query(q): Query<HashMap<String, String>>) -> impl IntoResponse {
    if username != "carl" {
        return empty_page().into_response();
    }
    if q.get("page").is_some_and(|p| p != "1") {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    Json(json!({
        "count": 2,
        "next": "http://testserver/api/profiles/carl/followed/?page=2",
        "previous": null,
        "results": [{"id": 5, "username": "dan", "image": null}]
    }))
    .into_response()
}

async fn refresh_token(State(m): Shared, Json(body): Json<Value>) -> impl IntoResponse {
    if body["refresh"] == "refresh-1" {
        Json(json!({"access": m.refreshed})).into_response()
    } else {
        (StatusCode::UNAUTHORIZED, "Token is invalid or expired").into_response()
    }
}

async fn start_mock() -> (String, Arc<Mock>) {
    let mock = Arc::new(Mock {
        access: mint_token(1, "amy", unix_now() + 3600),
        refreshed: mint_token(1, "amy", unix_now() + 7200),
        ..Default::default()
    });
    mock.comments
        .lock()
        .unwrap()
        .extend([comment_json(7, "keep me"), comment_json(8, "delete me")]);

    let app = Router::new()
        .route("/api/auth/token/", post(login))
        .route("/api/auth/logout/", post(logout))
        .route("/api/auth/token/refresh/", post(refresh_token))
        .route(
            "/api/auth/register/",
            post(|Json(b): Json<Value>| async move {
                if b["username"] == "taken" {
                    (StatusCode::BAD_REQUEST, "username taken").into_response()
                } else {
                    StatusCode::CREATED.into_response()
                }
            }),
        )
        .route("/api/posts/", get(list_posts).post(create_post))
        .route("/api/posts/feed/", get(feed))
        .route("/api/posts/favourites/", get(|| async { empty_page() }))
        .route(
            "/api/posts/{slug}/",
            get(post_detail)
                .patch(patch_post)
                .delete(|| async { StatusCode::NO_CONTENT }),
        )
        .route(
            "/api/posts/{slug}/favourite/",
            post(|| async { Json(json!({"favourites_count": 5})) }),
        )
        .route("/api/posts/{slug}/comments/", get(comments).post(add_comment))
        .route("/api/posts/{slug}/comments/{id}/", delete(delete_comment))
        .route("/api/profiles/", get(list_profiles))
        .route("/api/profiles/{username}/", get(profile_detail))
        .route(
            "/api/profiles/{username}/follow/",
            post(|| async { Json(json!({"is_followed_by_you": true, "followers_count": 4})) }),
        )
        .route("/api/profiles/{username}/followers/", get(followers))
        .route("/api/profiles/{username}/followed/", get(followed))
        .route("/api/tags/", get(|| async { empty_page() }))
        .with_state(mock.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/api"), mock)
}

// =====================================================================
// Harness
// =====================================================================

struct Harness {
    app: QuillApp,
    kv: Arc<MemoryStore>,
    mock: Arc<Mock>,
}

impl Harness {
    async fn start() -> Self {
        Self::with_kv(Arc::new(MemoryStore::default())).await
    }

    async fn with_kv(kv: Arc<MemoryStore>) -> Self {
        let (api_url, mock) = start_mock().await;
        let config = ClientConfig {
            api_url,
            search_debounce_ms: 50,
            toast_ttl_ms: 0,
            comment_cooldown_ms: 200,
            retry: 2,
            retry_base_delay_ms: 10,
            ..Default::default()
        };
        let store: Arc<dyn KVStore> = kv.clone();
        let app = QuillApp::new(config, store).unwrap();
        Self { app, kv, mock }
    }

    async fn emit<T: Any + Send + Sync>(&self, path: &str, req: T) {
        assert_eq!(self.app.flux.emit(path, req).await, 1, "no handler for {path}");
    }

    fn state<T: Any + Clone>(&self, path: &str) -> T {
        self.app
            .flux
            .get_as::<T>(path)
            .unwrap_or_else(|| panic!("no state at {path}"))
    }

    fn route(&self) -> Route {
        self.state::<AppRoute>(AppRoute::PATH).route
    }

    fn toasts(&self) -> Toasts {
        self.app.flux.get_as(Toasts::PATH).unwrap_or_default()
    }

    async fn login(&self) {
        self.emit(
            LoginReq::PATH,
            LoginReq {
                email: "amy@example.com".into(),
                password: "secret".into(),
            },
        )
        .await;
    }
}

// =====================================================================
// Auth
// =====================================================================

#[tokio::test]
async fn login_persists_tokens_and_lands_on_posts() {
    let h = Harness::start().await;
    h.login().await;

    assert_eq!(h.kv.get_string(ACCESS_KEY).unwrap().as_deref(), Some(h.mock.access.as_str()));
    assert_eq!(h.kv.get_string(REFRESH_KEY).unwrap().as_deref(), Some("refresh-1"));

    let session = h.state::<SessionState>(SessionState::PATH);
    assert!(session.has_token);
    assert_eq!(session.username(), Some("amy"));
    assert_eq!(h.route(), Route::Posts);
    assert!(h.toasts().contains(ToastKind::Success, "Logged in successfully"));

    let navbar = h.state::<Navbar>(Navbar::PATH);
    assert_eq!(navbar.username.as_deref(), Some("amy"));

    let list = h.state::<PostsListPage>(PostsListPage::PATH);
    assert_eq!(list.status, LoadStatus::Ready);
    assert_eq!(list.page_count, 3);
}

#[tokio::test]
async fn bad_credentials_keep_the_form() {
    let h = Harness::start().await;
    h.emit(
        LoginReq::PATH,
        LoginReq {
            email: "amy@example.com".into(),
            password: "wrong".into(),
        },
    )
    .await;

    assert!(h.toasts().contains(ToastKind::Error, "Failed to authenticate..."));
    assert!(h.kv.get(ACCESS_KEY).unwrap().is_none());
    let form = h.state::<LoginForm>(LoginForm::PATH);
    assert_eq!(form.email, "amy@example.com");
    assert!(!form.busy);
}

#[tokio::test]
async fn register_sends_to_login() {
    let h = Harness::start().await;
    let req = |username: &str| RegisterReq {
        email: "new@example.com".into(),
        username: username.into(),
        password1: "pw".into(),
        password2: "pw".into(),
    };

    h.emit(RegisterReq::PATH, req("taken")).await;
    assert!(h.toasts().contains(ToastKind::Error, "Failed to register..."));

    h.emit(RegisterReq::PATH, req("newbie")).await;
    assert!(h.toasts().contains(ToastKind::Success, "Now you can login to your account"));
    assert_eq!(h.route(), Route::Login);
}

#[tokio::test]
async fn logout_clears_tokens_session_and_cache() {
    let h = Harness::start().await;
    h.login().await;
    let dropped = Arc::new(Mutex::new(Vec::<String>::new()));
    let d = dropped.clone();
    h.app.flux.subscribe("posts/#", move |path, value| {
        if value.is_none() {
            d.lock().unwrap().push(path.to_string());
        }
    });
    h.emit(LogoutReq::PATH, LogoutReq).await;

    assert!(h.kv.get(ACCESS_KEY).unwrap().is_none());
    assert!(h.kv.get(REFRESH_KEY).unwrap().is_none());
    let session = h.state::<SessionState>(SessionState::PATH);
    assert!(!session.has_token);
    assert!(session.session.is_none());
    assert_eq!(h.route(), Route::Login);
    assert_eq!(*h.mock.logouts.lock().unwrap(), vec!["refresh-1".to_string()]);
    assert!(h.app.ctx.cache.keys().is_empty());
    assert!(h.app.flux.get(PostsListPage::PATH).is_none());
    assert!(dropped.lock().unwrap().contains(&PostsListPage::PATH.to_string()));
}

#[tokio::test]
async fn refresh_replaces_an_expired_access_token() {
    let kv = Arc::new(MemoryStore::default());
    kv.set_string(ACCESS_KEY, &mint_token(1, "amy", unix_now() - 10)).unwrap();
    kv.set_string(REFRESH_KEY, "refresh-1").unwrap();
    let h = Harness::with_kv(kv).await;
    h.emit(InitializeReq::PATH, InitializeReq).await;
    assert!(h.state::<SessionState>(SessionState::PATH).session.is_none());

    h.emit(RefreshReq::PATH, RefreshReq).await;
    assert_eq!(h.kv.get_string(ACCESS_KEY).unwrap().as_deref(), Some(h.mock.refreshed.as_str()));
    assert_eq!(h.kv.get_string(REFRESH_KEY).unwrap().as_deref(), Some("refresh-1"));
    let session = h.state::<SessionState>(SessionState::PATH);
    assert_eq!(session.username(), Some("amy"));
}

#[tokio::test]
async fn rejected_refresh_signs_out() {
    let kv = Arc::new(MemoryStore::default());
    kv.set_string(ACCESS_KEY, &mint_token(1, "amy", unix_now() - 10)).unwrap();
    kv.set_string(REFRESH_KEY, "revoked").unwrap();
    let h = Harness::with_kv(kv).await;
    h.emit(InitializeReq::PATH, InitializeReq).await;

    h.emit(RefreshReq::PATH, RefreshReq).await;
    assert!(h.kv.get(ACCESS_KEY).unwrap().is_none());
    assert!(h.kv.get(REFRESH_KEY).unwrap().is_none());
    assert!(!h.state::<SessionState>(SessionState::PATH).has_token);
    assert!(h.toasts().contains(ToastKind::Error, "Your session has expired, please log in again"));
    assert_eq!(h.route(), Route::Login);
}

#[tokio::test]
async fn expired_token_still_passes_the_gate() {
    let kv = Arc::new(MemoryStore::default());
    kv.set_string(ACCESS_KEY, &mint_token(1, "amy", unix_now() - 10)).unwrap();
    let h = Harness::with_kv(kv).await;

    h.emit(InitializeReq::PATH, InitializeReq).await;
    let session = h.state::<SessionState>(SessionState::PATH);
    assert!(session.has_token);
    assert!(session.session.is_none());

    h.emit(NavigateReq::PATH, NavigateReq { path: "/posts/feed/".into() }).await;
    assert_eq!(h.route(), Route::PostsFeed);
}

#[tokio::test]
async fn protected_pages_redirect_guests() {
    let h = Harness::start().await;
    h.emit(NavigateReq::PATH, NavigateReq { path: "/posts/add".into() }).await;
    assert_eq!(h.route(), Route::Login);

    h.emit(NavigateReq::PATH, NavigateReq { path: "/".into() }).await;
    assert_eq!(h.route(), Route::Posts);

    h.emit(NavigateReq::PATH, NavigateReq { path: "/nowhere".into() }).await;
    assert_eq!(h.route(), Route::NotFound);
    assert_eq!(h.state::<AppRoute>(AppRoute::PATH).path, "/nowhere");
}

// =====================================================================
// Posts list and filters
// =====================================================================

#[tokio::test]
async fn any_filter_change_goes_back_to_page_one() {
    let h = Harness::start().await;
    h.emit(PostsLoadReq::PATH, PostsLoadReq).await;
    h.emit(PostsSetPageReq::PATH, PostsSetPageReq { page: 3 }).await;
    assert_eq!(h.mock.seen("posts").last().unwrap()["page"], "3");

    h.emit(
        PostsSetOrderingReq::PATH,
        PostsSetOrderingReq { ordering: "updated_at".into() },
    )
    .await;
    let last = h.mock.seen("posts").last().cloned().unwrap();
    assert_eq!(last["page"], "1");
    assert_eq!(last["ordering"], "updated_at");

    h.emit(PostsSetPageReq::PATH, PostsSetPageReq { page: 2 }).await;
    h.emit(PostsSetPageSizeReq::PATH, PostsSetPageSizeReq { page_size: 50 }).await;
    let last = h.mock.seen("posts").last().cloned().unwrap();
    assert_eq!(last["page"], "1");
    assert_eq!(last["page_size"], "50");
}

#[tokio::test]
async fn filter_dialog_stages_until_confirm_and_clear_restores_defaults() {
    let h = Harness::start().await;
    h.emit(PostsLoadReq::PATH, PostsLoadReq).await;
    h.emit(PostsSetPageSizeReq::PATH, PostsSetPageSizeReq { page_size: 20 }).await;

    h.emit(FiltersOpenReq::PATH, FiltersOpenReq).await;
    h.emit(
        FiltersEditReq::PATH,
        FiltersEditReq { field: FilterField::Title("intro".into()) },
    )
    .await;
    let requests = h.mock.seen("posts").len();
    // Staged only.
    assert!(h.state::<PostsListPage>(PostsListPage::PATH).filters.title.is_empty());

    h.emit(FiltersConfirmReq::PATH, FiltersConfirmReq).await;
    let seen = h.mock.seen("posts");
    assert_eq!(seen.len(), requests + 1);
    assert_eq!(seen.last().unwrap()["title__icontains"], "intro");
    assert!(!h.state::<FiltersDialog>(FiltersDialog::PATH).open);

    h.emit(FiltersClearReq::PATH, FiltersClearReq).await;
    let page = h.state::<PostsListPage>(PostsListPage::PATH);
    assert_eq!(page.filters, default_posts_filters());
    assert!(page.search_input.is_empty());
    let last = h.mock.seen("posts").last().cloned().unwrap();
    assert_eq!(last.get("title__icontains"), None);
    assert_eq!(last["page_size"], "10");
}

#[tokio::test]
async fn search_is_debounced() {
    let h = Arc::new(Harness::start().await);
    h.emit(PostsLoadReq::PATH, PostsLoadReq).await;

    let first = {
        let h = h.clone();
        tokio::spawn(async move {
            h.emit(PostsSearchInputReq::PATH, PostsSearchInputReq { value: "ru".into() })
                .await
        })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;
    h.emit(PostsSearchInputReq::PATH, PostsSearchInputReq { value: "rust".into() })
        .await;
    first.await.unwrap();

    let searches: Vec<String> = h
        .mock
        .seen("posts")
        .iter()
        .filter_map(|q| q.get("search").cloned())
        .collect();
    assert_eq!(searches, vec!["rust".to_string()]);
    assert_eq!(h.state::<PostsListPage>(PostsListPage::PATH).filters.page, Some(1));
}

#[tokio::test]
async fn failed_list_shows_inline_error_without_old_results() {
    let h = Harness::start().await;
    h.emit(PostsLoadReq::PATH, PostsLoadReq).await;
    assert!(h.state::<PostsListPage>(PostsListPage::PATH).data.is_some());

    h.emit(PostsSearchInputReq::PATH, PostsSearchInputReq { value: "boom".into() }).await;
    let page = h.state::<PostsListPage>(PostsListPage::PATH);
    assert_eq!(page.status, LoadStatus::Failed("Something went wrong...".into()));
    assert!(page.data.is_none());
    assert_eq!(page.page_count, 0);
    // First try plus two retries.
    let booms = h.mock.seen("posts").iter().filter(|q| q.get("search").is_some_and(|v| v == "boom")).count();
    assert_eq!(booms, 3);
}

#[tokio::test]
async fn new_filters_never_show_the_previous_page() {
    let h = Arc::new(Harness::start().await);
    h.emit(PostsLoadReq::PATH, PostsLoadReq).await;

    let search = {
        let h = h.clone();
        tokio::spawn(async move {
            h.emit(PostsSearchInputReq::PATH, PostsSearchInputReq { value: "slow".into() })
                .await
        })
    };
    tokio::time::sleep(Duration::from_millis(150)).await;
    let page = h.state::<PostsListPage>(PostsListPage::PATH);
    assert_eq!(page.filters.search, "slow");
    assert_eq!(page.status, LoadStatus::Loading);
    assert!(page.data.is_none());

    search.await.unwrap();
    let page = h.state::<PostsListPage>(PostsListPage::PATH);
    assert_eq!(page.status, LoadStatus::Ready);
    assert_eq!(page.data_filters.as_ref(), Some(&page.filters));
}

#[tokio::test]
async fn confirming_an_empty_draft_resets_everything() {
    let h = Harness::start().await;
    h.emit(PostsLoadReq::PATH, PostsLoadReq).await;
    h.emit(PostsSetOrderingReq::PATH, PostsSetOrderingReq { ordering: "updated_at".into() }).await;
    h.emit(PostsSetPageSizeReq::PATH, PostsSetPageSizeReq { page_size: 50 }).await;
    h.emit(PostsSearchInputReq::PATH, PostsSearchInputReq { value: "rust".into() }).await;

    h.emit(FiltersOpenReq::PATH, FiltersOpenReq).await;
    h.emit(FiltersConfirmReq::PATH, FiltersConfirmReq).await;

    let page = h.state::<PostsListPage>(PostsListPage::PATH);
    assert_eq!(page.filters, default_posts_filters());
    assert!(page.search_input.is_empty());
    let last = h.mock.seen("posts").last().cloned().unwrap();
    assert_eq!(last.get("search"), None);
    assert_eq!(last["ordering"], "-created_at");
}

#[tokio::test]
async fn author_lookup_sends_username() {
    let h = Harness::start().await;
    h.emit(FiltersOpenReq::PATH, FiltersOpenReq).await;
    h.emit(FiltersAuthorsReq::PATH, FiltersAuthorsReq { query: "bo".into() }).await;

    let last = h.mock.seen("profiles").last().cloned().unwrap();
    assert_eq!(last["username"], "bo");
    assert_eq!(last["page_size"], "25");
    assert_eq!(last.get("username__icontains"), None);
}

// =====================================================================
// Feed
// =====================================================================

#[tokio::test]
async fn feed_follows_next_links_and_stops() {
    let h = Harness::start().await;
    h.login().await;
    h.emit(NavigateReq::PATH, NavigateReq { path: "/posts/feed".into() }).await;
    h.emit(FeedLoadMoreReq::PATH, FeedLoadMoreReq).await;
    h.emit(FeedLoadMoreReq::PATH, FeedLoadMoreReq).await;

    let pages: Vec<String> = h.mock.seen("feed").iter().map(|q| q["page"].clone()).collect();
    assert_eq!(pages, vec!["1", "2", "3"]);

    let feed = h.state::<PostsFeedPage>(PostsFeedPage::PATH);
    assert_eq!(feed.posts.items.len(), 3);
    assert!(!feed.posts.has_next);

    h.emit(FeedLoadMoreReq::PATH, FeedLoadMoreReq).await;
    assert_eq!(h.mock.seen("feed").len(), 3);
}

// =====================================================================
// Post detail
// =====================================================================

#[tokio::test]
async fn missing_post_redirects_without_retry() {
    let h = Harness::start().await;
    h.emit(NavigateReq::PATH, NavigateReq { path: "/posts/missing".into() }).await;

    assert_eq!(h.mock.detail_hits.load(Ordering::SeqCst), 1);
    assert!(h.toasts().contains(
        ToastKind::Error,
        "The post you are looking for does not exist."
    ));
    assert_eq!(h.route(), Route::Posts);
    assert!(h.app.flux.get(&PostDetailPage::path_for("missing")).is_none());
}

#[tokio::test]
async fn favourite_and_update_patch_only_their_fields() {
    let h = Harness::start().await;
    h.login().await;
    h.emit(NavigateReq::PATH, NavigateReq { path: "/posts/hello".into() }).await;
    let path = PostDetailPage::path_for("hello");
    assert!(h.state::<PostDetailPage>(&path).is_author);

    h.emit(PostFavouriteReq::PATH, PostFavouriteReq { slug: "hello".into() }).await;
    let post = h.state::<PostDetailPage>(&path).post.unwrap();
    assert!(post.is_favourited);
    assert_eq!(post.favourites_count, 5);
    assert_eq!(post.title, "Hello");
    assert_eq!(post.body, "first body");
    assert!(h.toasts().contains(ToastKind::Success, "Post added to favourites"));

    h.emit(PostEditBeginReq::PATH, PostEditBeginReq { slug: "hello".into() }).await;
    assert_eq!(h.state::<PostDetailPage>(&path).draft, "first body");
    h.emit(
        PostUpdateReq::PATH,
        PostUpdateReq {
            slug: "hello".into(),
            body: "second body".into(),
        },
    )
    .await;
    let page = h.state::<PostDetailPage>(&path);
    let post = page.post.unwrap();
    assert_eq!(post.body, "second body");
    assert_eq!(post.title, "Hello");
    assert_eq!(post.favourites_count, 5);
    assert!(!page.editing);
    assert!(h.toasts().contains(ToastKind::Success, "Post updated"));
}

// =====================================================================
// Comments
// =====================================================================

#[tokio::test]
async fn comment_submit_clears_input_and_cools_down() {
    let h = Harness::start().await;
    h.login().await;
    h.emit(NavigateReq::PATH, NavigateReq { path: "/posts/hello".into() }).await;
    let path = CommentSection::path_for("hello");

    // Blank input never reaches the server.
    h.emit(CommentsInputReq::PATH, CommentsInputReq { slug: "hello".into(), value: "  ".into() }).await;
    h.emit(CommentsSubmitReq::PATH, CommentsSubmitReq { slug: "hello".into() }).await;
    assert_eq!(h.mock.comment_posts.load(Ordering::SeqCst), 0);

    h.emit(CommentsInputReq::PATH, CommentsInputReq { slug: "hello".into(), value: "Nice".into() }).await;
    h.emit(CommentsSubmitReq::PATH, CommentsSubmitReq { slug: "hello".into() }).await;
    let section = h.state::<CommentSection>(&path);
    assert!(section.input.is_empty());
    assert!(section.locked);
    assert_eq!(section.comments.items[0].body, "Nice");
    assert!(h.toasts().contains(ToastKind::Success, "Comment added"));

    h.emit(CommentsInputReq::PATH, CommentsInputReq { slug: "hello".into(), value: "Again".into() }).await;
    h.emit(CommentsSubmitReq::PATH, CommentsSubmitReq { slug: "hello".into() }).await;
    assert_eq!(h.mock.comment_posts.load(Ordering::SeqCst), 1);

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(!h.state::<CommentSection>(&path).locked);
    h.emit(CommentsSubmitReq::PATH, CommentsSubmitReq { slug: "hello".into() }).await;
    assert_eq!(h.mock.comment_posts.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn comment_delete_refetches_or_shows_server_message() {
    let h = Harness::start().await;
    h.login().await;
    h.emit(NavigateReq::PATH, NavigateReq { path: "/posts/hello".into() }).await;
    let path = CommentSection::path_for("hello");

    h.emit(CommentDeleteOpenReq::PATH, CommentDeleteOpenReq { slug: "hello".into(), id: 8 }).await;
    assert_eq!(h.state::<CommentSection>(&path).delete_target, Some(8));
    h.emit(CommentDeleteReq::PATH, CommentDeleteReq { slug: "hello".into(), id: 8 }).await;
    let section = h.state::<CommentSection>(&path);
    assert_eq!(section.delete_target, None);
    assert!(section.comments.items.iter().all(|c| c.id != 8));
    assert!(h.toasts().contains(ToastKind::Success, "Comment deleted"));

    h.emit(CommentDeleteOpenReq::PATH, CommentDeleteOpenReq { slug: "hello".into(), id: 7 }).await;
    h.emit(CommentDeleteReq::PATH, CommentDeleteReq { slug: "hello".into(), id: 7 }).await;
    assert!(h.toasts().contains(ToastKind::Error, "You cannot delete this comment."));
}

#[tokio::test]
async fn comment_delete_needs_the_confirmed_target() {
    let h = Harness::start().await;
    h.login().await;
    h.emit(NavigateReq::PATH, NavigateReq { path: "/posts/hello".into() }).await;

    h.emit(CommentDeleteReq::PATH, CommentDeleteReq { slug: "hello".into(), id: 8 }).await;
    assert_eq!(h.mock.comment_deletes.load(Ordering::SeqCst), 0);

    h.emit(CommentDeleteOpenReq::PATH, CommentDeleteOpenReq { slug: "hello".into(), id: 8 }).await;
    h.emit(CommentDeleteReq::PATH, CommentDeleteReq { slug: "hello".into(), id: 7 }).await;
    assert_eq!(h.mock.comment_deletes.load(Ordering::SeqCst), 0);
    let section = h.state::<CommentSection>(&CommentSection::path_for("hello"));
    assert_eq!(section.delete_target, Some(8));
    assert_eq!(section.comments.items.len(), 2);
}

#[tokio::test]
async fn comments_load_more_appends_the_next_page() {
    let h = Harness::start().await;
    h.mock
        .comments
        .lock()
        .unwrap()
        .extend((20..32).map(|id| comment_json(id, "more")));
    h.emit(NavigateReq::PATH, NavigateReq { path: "/posts/hello".into() }).await;
    let path = CommentSection::path_for("hello");

    let section = h.state::<CommentSection>(&path);
    assert_eq!(section.comments.items.len(), 10);
    assert_eq!(section.comments.total, 14);
    assert!(section.comments.has_next);

    h.emit(CommentsLoadMoreReq::PATH, CommentsLoadMoreReq { slug: "hello".into() }).await;
    let section = h.state::<CommentSection>(&path);
    assert_eq!(section.comments.items.len(), 14);
    assert!(!section.comments.has_next);
    assert!(!section.comments.loading_more);
    let pages: Vec<String> = h.mock.seen("comments").iter().map(|q| q["page"].clone()).collect();
    assert_eq!(pages, vec!["1", "2"]);
}

#[tokio::test]
async fn failed_comment_keeps_the_input() {
    let h = Harness::start().await;
    h.login().await;
    h.emit(NavigateReq::PATH, NavigateReq { path: "/posts/hello".into() }).await;

    h.emit(CommentsInputReq::PATH, CommentsInputReq { slug: "hello".into(), value: "boom".into() }).await;
    h.emit(CommentsSubmitReq::PATH, CommentsSubmitReq { slug: "hello".into() }).await;

    let section = h.state::<CommentSection>(&CommentSection::path_for("hello"));
    assert_eq!(section.input, "boom");
    assert!(!section.locked);
    assert_eq!(section.comments.items.len(), 2);
    assert!(h.toasts().contains(ToastKind::Error, "Something went wrong..."));
}

#[tokio::test]
async fn comment_ordering_is_part_of_the_request() {
    let h = Harness::start().await;
    h.emit(NavigateReq::PATH, NavigateReq { path: "/posts/hello".into() }).await;
    h.emit(
        CommentsSetOrderingReq::PATH,
        CommentsSetOrderingReq {
            slug: "hello".into(),
            ordering: "created_at".into(),
        },
    )
    .await;
    let orderings: Vec<String> = h
        .mock
        .seen("comments")
        .iter()
        .map(|q| q["ordering"].clone())
        .collect();
    assert_eq!(orderings, vec!["-created_at", "created_at"]);
    assert!(h.mock.seen("comments").iter().all(|q| q["page_size"] == "10"));
}

// =====================================================================
// New post
// =====================================================================

#[tokio::test]
async fn new_post_requires_a_body() {
    let h = Harness::start().await;
    h.login().await;
    h.emit(NavigateReq::PATH, NavigateReq { path: "/posts/add".into() }).await;
    h.emit(
        PostAddUpdateReq::PATH,
        PostAddUpdateReq { field: PostAddField::Title("Draft".into()) },
    )
    .await;
    h.emit(PostAddSubmitReq::PATH, PostAddSubmitReq).await;

    assert!(h.toasts().contains(ToastKind::Error, "Body is required!"));
    assert_eq!(h.state::<PostAddForm>(PostAddForm::PATH).title, "Draft");
    assert_eq!(h.route(), Route::PostsAdd);
}

#[tokio::test]
async fn new_post_lands_on_the_list() {
    let h = Harness::start().await;
    h.login().await;
    h.emit(NavigateReq::PATH, NavigateReq { path: "/posts/add".into() }).await;
    h.emit(PostAddUpdateReq::PATH, PostAddUpdateReq { field: PostAddField::Title("Fresh".into()) }).await;
    h.emit(PostAddUpdateReq::PATH, PostAddUpdateReq { field: PostAddField::Body("Words".into()) }).await;
    h.emit(PostAddSubmitReq::PATH, PostAddSubmitReq).await;

    assert!(h.toasts().contains(ToastKind::Success, "Your post has been created successfully."));
    assert_eq!(h.route(), Route::Posts);
    assert_eq!(h.state::<PostAddForm>(PostAddForm::PATH), PostAddForm::default());
}

#[tokio::test]
async fn deleting_a_post_returns_to_the_list() {
    let h = Harness::start().await;
    h.login().await;
    h.emit(NavigateReq::PATH, NavigateReq { path: "/posts/hello".into() }).await;
    h.emit(PostDeleteOpenReq::PATH, PostDeleteOpenReq { slug: "hello".into() }).await;
    assert!(h.state::<PostDetailPage>(&PostDetailPage::path_for("hello")).delete_open);

    h.emit(PostDeleteReq::PATH, PostDeleteReq { slug: "hello".into() }).await;
    assert!(h.toasts().contains(ToastKind::Success, "Post deleted"));
    assert_eq!(h.route(), Route::Posts);
    assert!(h.app.flux.get(&PostDetailPage::path_for("hello")).is_none());
}

// =====================================================================
// Profiles
// =====================================================================

#[tokio::test]
async fn missing_profile_redirects_to_list() {
    let h = Harness::start().await;
    h.emit(NavigateReq::PATH, NavigateReq { path: "/profiles/ghost".into() }).await;
    assert!(h.toasts().contains(
        ToastKind::Error,
        "The profile you are looking for does not exist..."
    ));
    assert_eq!(h.route(), Route::Profiles);
}

#[tokio::test]
async fn follow_patches_profile_from_response() {
    let h = Harness::start().await;
    h.login().await;
    h.emit(NavigateReq::PATH, NavigateReq { path: "/profiles/bob".into() }).await;
    let path = ProfileDetailPage::path_for("bob");
    let page = h.state::<ProfileDetailPage>(&path);
    assert!(!page.is_self);
    assert_eq!(page.profile.as_ref().unwrap().followers_count, 3);

    h.emit(ProfileFollowReq::PATH, ProfileFollowReq { username: "bob".into() }).await;
    let profile = h.state::<ProfileDetailPage>(&path).profile.unwrap();
    assert!(profile.is_followed_by_you);
    assert_eq!(profile.followers_count, 4);
    assert_eq!(profile.followed_count, 1);
    assert!(h.toasts().contains(ToastKind::Success, "You are now following user: bob"));
}

#[tokio::test]
async fn follow_from_the_list_refetches_it() {
    let h = Harness::start().await;
    h.login().await;
    h.emit(NavigateReq::PATH, NavigateReq { path: "/profiles".into() }).await;
    let before = h.mock.seen("profiles").len();

    h.emit(ProfilesFollowReq::PATH, ProfilesFollowReq { username: "bob".into() }).await;
    assert!(h.toasts().contains(ToastKind::Success, "You are now following user: bob"));
    assert_eq!(h.mock.seen("profiles").len(), before + 1);
}

#[tokio::test]
async fn follow_on_a_profile_revalidates_the_visited_list() {
    let h = Harness::start().await;
    h.login().await;
    h.emit(NavigateReq::PATH, NavigateReq { path: "/profiles".into() }).await;
    h.emit(NavigateReq::PATH, NavigateReq { path: "/profiles/bob".into() }).await;
    let before = h.mock.seen("profiles").len();

    h.emit(ProfileFollowReq::PATH, ProfileFollowReq { username: "bob".into() }).await;
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(h.mock.seen("profiles").len(), before + 1);
}

#[tokio::test]
async fn failing_profile_lists_report_errors() {
    let h = Harness::start().await;
    h.emit(NavigateReq::PATH, NavigateReq { path: "/profiles/carl".into() }).await;
    let path = ProfileDetailPage::path_for("carl");

    let page = h.state::<ProfileDetailPage>(&path);
    assert_eq!(page.status, LoadStatus::Ready);
    assert_eq!(page.followers.status, LoadStatus::Failed("Something went wrong...".into()));
    assert_eq!(page.followed.status, LoadStatus::Ready);
    assert!(page.followed.has_next);

    h.emit(
        ProfileFollowedMoreReq::PATH,
        ProfileFollowedMoreReq { username: "carl".into() },
    )
    .await;
    let followed = h.state::<ProfileDetailPage>(&path).followed;
    assert_eq!(followed.items.len(), 1);
    assert!(!followed.loading_more);
    assert_eq!(followed.status, LoadStatus::Ready);
    assert!(h.toasts().contains(ToastKind::Error, "Something went wrong..."));
}
