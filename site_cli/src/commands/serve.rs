//! `serve`: the site's JSON proxy routes and the `/articles` view-model over HTTP.
//!
//! Every response is marked `Cache-Control: no-store`. When no upstream base
//! is configured, each request's `Host` header picks the upstream.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Path, RawQuery, State};
use axum::http::header::{CACHE_CONTROL, HOST};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use clap::Args;
use serde_json::json;
use site_lib::proxy::{self, ProxyReply};
use site_lib::{load_article_list, ArticleListRequest, QueryParams, SafeClient, Settings, SiteError};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Args)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,
}

struct AppState {
    settings: Settings,
}

type SharedState = Arc<AppState>;

struct Reply(ProxyReply);

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status).unwrap_or(StatusCode::BAD_GATEWAY);
        (status, Json(self.0.body)).into_response()
    }
}

#[derive(Debug)]
struct ApiError(SiteError);

impl From<SiteError> for ApiError {
    fn from(e: SiteError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            SiteError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            other => {
                tracing::error!("request failed: {}", other);
                (StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

type ApiResult = Result<Reply, ApiError>;

pub fn build_router(settings: Settings) -> Router {
    let state = Arc::new(AppState { settings });
    Router::new()
        .route("/articles", get(articles))
        .route("/api/blogs", get(blogs))
        .route("/api/blogs/{slug}", get(blog_detail))
        .route("/api/categories", get(categories))
        .route("/api/homepage", get(homepage))
        .route("/api/page/{slug}", get(page))
        .route("/api/site-config", get(site_config))
        .route("/api/contact", post(contact))
        .route("/health", get(health))
        .with_state(state)
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

pub async fn run(args: &ServeArgs, settings: Settings) -> Result<()> {
    let router = build_router(settings);
    let listener = TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("failed to bind {}", args.bind))?;
    tracing::info!("listening on http://{}", args.bind);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = signal::ctrl_c().await;
    };
    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        if let Ok(mut stream) = signal(SignalKind::terminate()) {
            let _ = stream.recv().await;
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

fn client_for(state: &AppState, headers: &HeaderMap) -> SafeClient {
    let host = headers.get(HOST).and_then(|h| h.to_str().ok());
    SafeClient::from_settings(&state.settings, host)
}

fn params(query: Option<String>) -> QueryParams {
    QueryParams::parse(query.as_deref().unwrap_or_default())
}

async fn articles(
    State(state): State<SharedState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> impl IntoResponse {
    let client = client_for(&state, &headers);
    let request = ArticleListRequest::from_params(params(query));
    Json(load_article_list(&client, &request).await)
}

async fn blogs(
    State(state): State<SharedState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> ApiResult {
    let client = client_for(&state, &headers);
    Ok(Reply(proxy::blogs(&client, &params(query)).await?))
}

async fn blog_detail(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
) -> ApiResult {
    let client = client_for(&state, &headers);
    Ok(Reply(proxy::blog_detail(&client, &slug).await?))
}

async fn categories(
    State(state): State<SharedState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> ApiResult {
    let client = client_for(&state, &headers);
    Ok(Reply(proxy::categories(&client, &params(query)).await?))
}

async fn homepage(State(state): State<SharedState>, headers: HeaderMap) -> ApiResult {
    let client = client_for(&state, &headers);
    Ok(Reply(proxy::homepage(&client).await?))
}

async fn page(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
) -> ApiResult {
    let client = client_for(&state, &headers);
    Ok(Reply(proxy::page(&client, &slug).await?))
}

async fn site_config(State(state): State<SharedState>, headers: HeaderMap) -> ApiResult {
    let client = client_for(&state, &headers);
    Ok(Reply(proxy::site_config(&client).await?))
}

async fn contact(State(state): State<SharedState>, headers: HeaderMap, body: String) -> Reply {
    let client = client_for(&state, &headers);
    let urls = state.settings.contact_submit_urls();
    Reply(proxy::contact(&client, &urls, &body).await)
}

async fn health() -> Reply {
    Reply(proxy::health())
}

#[cfg(test)]
mod tests {
    use axum::body::{self, Body};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn call(router: Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, serde_json::from_slice(&bytes).unwrap())
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn health_is_not_cached() {
        let router = build_router(Settings::default().with_api_base("http://127.0.0.1:9"));
        let (status, headers, body) = call(router, get_req("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[CACHE_CONTROL], "no-store");
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn undefined_slug_is_400() {
        let router = build_router(Settings::default().with_api_base("http://127.0.0.1:9"));
        let (status, headers, body) = call(router, get_req("/api/blogs/undefined")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(headers[CACHE_CONTROL], "no-store");
        assert_eq!(body, json!({ "error": "Missing article slug" }));
    }

    #[tokio::test]
    async fn blog_detail_from_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/blogs/fr44/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "blog": {"slug": "fr44", "title": "FR-44"}
            })))
            .mount(&server)
            .await;

        let router = build_router(Settings::default().with_api_base(&server.uri()));
        let (status, _, body) = call(router, get_req("/api/blogs/fr44")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["blog"]["title"], "FR-44");
    }

    #[tokio::test]
    async fn upstream_follows_host_header_when_unconfigured() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/page/about-us/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "sections": [{"section_type": "rich_text"}]
            })))
            .mount(&server)
            .await;
        let host = server.uri().trim_start_matches("http://").to_string();

        let router = build_router(Settings::default());
        let request = Request::get("/api/page/about-us")
            .header(HOST, host)
            .body(Body::empty())
            .unwrap();
        let (_, _, body) = call(router, request).await;
        assert_eq!(body["sections"][0]["section_type"], "rich_text");
    }

    #[tokio::test]
    async fn articles_view_survives_dead_upstream() {
        let router = build_router(Settings::default().with_api_base("http://127.0.0.1:9"));
        let (status, _, body) = call(router, get_req("/articles?q=teen&q=drivers")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["search"], "teen,drivers");
        assert_eq!(body["error"], "Unable to load blog articles.");
        assert_eq!(body["items"], json!([]));
    }

    #[tokio::test]
    async fn contact_passes_rejection_through() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/contact/submit/"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({"phone": ["invalid"]})))
            .mount(&server)
            .await;

        let router = build_router(Settings::default().with_api_base(&server.uri()));
        let request = Request::post("/api/contact")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"phone":"x"}"#))
            .unwrap();
        let (status, _, body) = call(router, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"phone": ["invalid"]}));
    }
}
