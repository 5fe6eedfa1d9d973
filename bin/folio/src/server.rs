//! HTTP server: routes, handlers and error mapping.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::get,
};
use folio_content::{PostSource, StoreError};
use folio_core::{Config, Mode, Page};
use folio_site::{
    BlogIndex, CategoryListing, PostPage, SiteError, SitemapGenerator, SitemapSources,
    load_page, sitemap,
};
use tokio::task::JoinError;
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Data source queried on every request.
    pub source: Arc<dyn PostSource>,
    pub config: Arc<Config>,
    pub mode: Mode,
}

impl AppState {
    /// Create server state.
    pub fn new(source: Arc<dyn PostSource>, config: Config, mode: Mode) -> Self {
        Self {
            source,
            config: Arc::new(config),
            mode,
        }
    }
}

/// Errors a handler can return.
#[derive(Debug)]
pub enum AppError {
    Site(SiteError),
    /// No configured base URL and no host on the request.
    MissingHost,
    /// A blocking data-source task panicked or was cancelled.
    Join(JoinError),
}

impl From<SiteError> for AppError {
    fn from(err: SiteError) -> Self {
        Self::Site(err)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        Self::Site(SiteError::Store(err))
    }
}

impl From<JoinError> for AppError {
    fn from(err: JoinError) -> Self {
        Self::Join(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Site(SiteError::NotFound(message)) => (StatusCode::NOT_FOUND, message),
            AppError::MissingHost => (StatusCode::BAD_REQUEST, "cannot determine request origin"),
            AppError::Site(err) => {
                error!(error = %err, "data source failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
            AppError::Join(err) => {
                error!(error = %err, "blocking task failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// Create the site router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/sitemap.xml", get(sitemap_handler))
        .route("/blog/", get(blog_handler))
        .route("/now/", get(now_handler))
        .route("/{category}/", get(category_handler))
        .route("/{category}/{slug}/", get(post_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run a data-source query on the blocking pool.
async fn blocking<T, E, F>(state: &AppState, f: F) -> Result<T, AppError>
where
    F: FnOnce(&dyn PostSource) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Into<AppError> + Send + 'static,
{
    let source = Arc::clone(&state.source);
    tokio::task::spawn_blocking(move || f(source.as_ref()))
        .await?
        .map_err(Into::into)
}

/// Origin for absolute URLs: the configured base URL, else the request's host.
fn request_origin(config: &Config, headers: &HeaderMap, uri: &Uri) -> Result<String, AppError> {
    if let Some(base_url) = config.base_url() {
        return Ok(base_url.to_string());
    }

    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .or_else(|| uri.authority().map(|authority| authority.as_str()))
        .ok_or(AppError::MissingHost)?;
    // Proxies append hops as a comma-separated list; the first is the client's.
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|scheme| !scheme.is_empty())
        .or_else(|| uri.scheme_str())
        .unwrap_or("http");

    Ok(format!("{scheme}://{host}"))
}

/// `GET /{category}/{slug}/`
async fn post_handler(
    State(state): State<AppState>,
    Path((category, slug)): Path<(String, String)>,
) -> Result<Json<PostPage>, AppError> {
    debug!(%category, %slug, "post page");
    let mode = state.mode;
    let page = blocking(&state, move |source| {
        PostPage::load(source, &category, &slug, mode)
    })
    .await?;
    Ok(Json(page))
}

/// `GET /sitemap.xml`
async fn sitemap_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Response, AppError> {
    let origin = request_origin(&state.config, &headers, &uri)?;
    let mode = state.mode;
    let now_page = state.config.content.now_page.clone();

    let (now, categories, posts) = tokio::try_join!(
        blocking(&state, move |source| source.page(&now_page)),
        blocking(&state, move |source| source.all_categories(mode)),
        blocking(&state, move |source| source.all_posts(mode)),
    )?;

    let sources = SitemapSources {
        now_lastmod: now.and_then(|page| page.updated),
        categories,
        posts,
    };
    let xml = SitemapGenerator::new(&origin).generate(&sources);

    Ok((
        [
            (header::CONTENT_TYPE, sitemap::CONTENT_TYPE.to_string()),
            (header::CACHE_CONTROL, sitemap::CACHE_CONTROL.to_string()),
        ],
        xml,
    )
        .into_response())
}

/// `GET /blog/`
async fn blog_handler(State(state): State<AppState>) -> Result<Json<BlogIndex>, AppError> {
    let mode = state.mode;
    let title = state.config.site.title.clone();
    let index = blocking(&state, move |source| BlogIndex::load(source, &title, mode)).await?;
    Ok(Json(index))
}

/// `GET /{category}/`
async fn category_handler(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<CategoryListing>, AppError> {
    let mode = state.mode;
    let listing = blocking(&state, move |source| {
        CategoryListing::load(source, &category, mode)
    })
    .await?;
    Ok(Json(listing))
}

/// `GET /now/`
async fn now_handler(State(state): State<AppState>) -> Result<Json<Page>, AppError> {
    let name = state.config.content.now_page.clone();
    let page = blocking(&state, move |source| load_page(source, &name)).await?;
    Ok(Json(page))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use axum::{body::Body, http::Request};
    use folio_content::ContentStore;
    use folio_core::{CategorySummary, Post};
    use tower::ServiceExt;

    use super::*;

    fn config(base_url: Option<&str>) -> Config {
        let mut toml = String::from("[site]\ntitle = \"Notes\"\n");
        if let Some(base_url) = base_url {
            toml.push_str(&format!("base_url = \"{base_url}\"\n"));
        }
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("folio.toml");
        fs::write(&path, toml).expect("write");
        Config::load(&path).expect("load config")
    }

    fn sample_site() -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("create temp dir");
        let root = dir.path();
        fs::create_dir_all(root.join("tech")).expect("mkdir");
        fs::write(
            root.join("tech/hello.md"),
            "---\ntitle: Hello\nseoTitle: Hello SEO\ndate: 2023-01-05T00:00:00Z\n---\n\nHi.\n",
        )
        .expect("write");
        fs::write(
            root.join("now.md"),
            "---\ntitle: Now\nupdated: 2023-03-01\n---\n\nBusy.\n",
        )
        .expect("write");
        dir
    }

    fn router(root: &std::path::Path, base_url: Option<&str>) -> Router {
        let state = AppState::new(
            Arc::new(ContentStore::new(root)),
            config(base_url),
            Mode::Production,
        );
        create_router(state)
    }

    async fn fetch(router: Router, uri: &str) -> (StatusCode, HeaderMap, String) {
        let request = Request::builder()
            .uri(uri)
            .header(header::HOST, "blog.test")
            .body(Body::empty())
            .expect("request");
        let response = router.oneshot(request).await.expect("response");
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        (status, headers, String::from_utf8(body.to_vec()).expect("utf-8"))
    }

    #[tokio::test]
    async fn test_post_page() {
        let site = sample_site();
        let (status, _, body) = fetch(router(site.path(), None), "/tech/hello/").await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).expect("json");
        assert_eq!(json["title"], "Hello SEO");
        assert_eq!(json["description"], "Hello");
        assert_eq!(json["category_count"], 1);
        assert_eq!(json["post"]["slug"], "hello");
    }

    #[tokio::test]
    async fn test_post_not_found() {
        let site = sample_site();
        let (status, _, body) = fetch(router(site.path(), None), "/tech/missing/").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        let json: serde_json::Value = serde_json::from_str(&body).expect("json");
        assert_eq!(json["error"], "post not found");
    }

    #[tokio::test]
    async fn test_sitemap_uses_request_host() {
        let site = sample_site();
        let (status, headers, body) = fetch(router(site.path(), None), "/sitemap.xml").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "application/xml");
        assert_eq!(headers[header::CACHE_CONTROL], "max-age=0, s-maxage=3600");
        assert!(body.contains("<url><loc>http://blog.test/</loc></url>"));
        assert!(body.contains(
            "<url><loc>http://blog.test/now/</loc><lastmod>2023-03-01</lastmod></url>"
        ));
        assert!(body.contains(
            "<url><loc>http://blog.test/tech/hello/</loc><lastmod>2023-01-05</lastmod></url>"
        ));
    }

    #[tokio::test]
    async fn test_sitemap_prefers_configured_base_url() {
        let site = sample_site();
        let (_, _, body) =
            fetch(router(site.path(), Some("https://example.com/")), "/sitemap.xml").await;

        assert!(body.contains("<url><loc>https://example.com/blog/</loc>"));
        assert!(!body.contains("blog.test"));
    }

    #[tokio::test]
    async fn test_sitemap_forwarded_proto() {
        let site = sample_site();
        let request = Request::builder()
            .uri("/sitemap.xml")
            .header(header::HOST, "blog.test")
            .header("x-forwarded-proto", "https")
            .body(Body::empty())
            .expect("request");
        let response = router(site.path(), None)
            .oneshot(request)
            .await
            .expect("response");
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let body = String::from_utf8(body.to_vec()).expect("utf-8");
        assert!(body.contains("<loc>https://blog.test/</loc>"));
    }

    #[tokio::test]
    async fn test_sitemap_forwarded_proto_chain() {
        let site = sample_site();
        let request = Request::builder()
            .uri("/sitemap.xml")
            .header(header::HOST, "blog.test")
            .header("x-forwarded-proto", "https , http")
            .body(Body::empty())
            .expect("request");
        let response = router(site.path(), None)
            .oneshot(request)
            .await
            .expect("response");
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let body = String::from_utf8(body.to_vec()).expect("utf-8");
        assert!(body.contains("<url><loc>https://blog.test/</loc></url>"));
        assert!(!body.contains("http,"));
    }

    #[tokio::test]
    async fn test_sitemap_cache_header_ignores_config() {
        let site = sample_site();
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("folio.toml");
        fs::write(
            &path,
            "[site]\ntitle = \"Notes\"\n\n[sitemap]\ncache_control = \"no-store\"\n",
        )
        .expect("write");
        let config = Config::load(&path).expect("load config");
        let state = AppState::new(
            Arc::new(ContentStore::new(site.path())),
            config,
            Mode::Production,
        );

        let (status, headers, _) = fetch(create_router(state), "/sitemap.xml").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CACHE_CONTROL], "max-age=0, s-maxage=3600");
    }

    #[tokio::test]
    async fn test_sitemap_without_host() {
        let site = sample_site();
        let request = Request::builder()
            .uri("/sitemap.xml")
            .body(Body::empty())
            .expect("request");
        let response = router(site.path(), None)
            .oneshot(request)
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_listings() {
        let site = sample_site();

        let (status, _, body) = fetch(router(site.path(), None), "/blog/").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).expect("json");
        assert_eq!(json["title"], "Notes");
        assert_eq!(json["categories"][0]["category"], "tech");
        assert_eq!(json["categories"][0]["count"], 1);

        let (status, _, body) = fetch(router(site.path(), None), "/tech/").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).expect("json");
        assert_eq!(json["posts"][0]["slug"], "hello");

        let (status, _, _) = fetch(router(site.path(), None), "/cooking/").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _, body) = fetch(router(site.path(), None), "/now/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Busy."));
    }

    struct BrokenSource;

    impl PostSource for BrokenSource {
        fn single_post(&self, _: &str, _: &str) -> folio_content::Result<Option<Post>> {
            Err(StoreError::Source("disk on fire".to_string()))
        }

        fn category_count(&self, _: &str, _: Mode) -> folio_content::Result<usize> {
            Err(StoreError::Source("disk on fire".to_string()))
        }

        fn all_categories(&self, _: Mode) -> folio_content::Result<Vec<CategorySummary>> {
            Err(StoreError::Source("disk on fire".to_string()))
        }

        fn all_posts(&self, _: Mode) -> folio_content::Result<Vec<Post>> {
            Err(StoreError::Source("disk on fire".to_string()))
        }

        fn category_posts(&self, _: &str, _: Mode) -> folio_content::Result<Vec<Post>> {
            Err(StoreError::Source("disk on fire".to_string()))
        }

        fn page(&self, _: &str) -> folio_content::Result<Option<Page>> {
            Err(StoreError::Source("disk on fire".to_string()))
        }
    }

    #[tokio::test]
    async fn test_source_failure_is_500() {
        let state = AppState::new(Arc::new(BrokenSource), config(None), Mode::Production);

        for uri in ["/sitemap.xml", "/tech/hello/"] {
            let (status, _, body) = fetch(create_router(state.clone()), uri).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
            assert!(!body.contains("disk on fire"));
        }
    }
}
