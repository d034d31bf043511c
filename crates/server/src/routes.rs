//! Router and handlers.

use std::path::Path;
use std::time::Duration;

use axum::extract::{Path as UrlPath, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use modstats_core::{
    Author, ModInfo, ModListEntry, ModVersion, SteamClient, Upstream, count_mods, get_author_stats, get_mod_history,
    get_mod_info, get_mod_list,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::error::ApiError;

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Clients shared by every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub upstream: Upstream,
    pub steam: SteamClient,
}

impl AppState {
    pub fn from_config(config: &ServerConfig) -> modstats_core::Result<Self> {
        let mut builder = Upstream::builder().timeout(config.timeout);
        if let Some(site) = &config.site_url {
            builder = builder.site(site.as_str());
        }
        let upstream = builder.build()?;
        let steam = SteamClient::new(upstream.clone(), config.steam_api_key.as_str())?;

        Ok(Self { upstream, steam })
    }
}

#[derive(Debug, Deserialize)]
pub struct ModQuery {
    #[serde(default)]
    modname: String,
}

pub fn router(state: AppState, img_dir: &Path, timeout: Duration) -> Router {
    Router::new()
        .route("/modList", get(mod_list))
        .route("/modInfo", get(mod_info))
        .route("/modHistory", get(mod_history))
        .route("/author_api/{id}", get(author))
        .route("/count", get(count))
        .route("/version", get(version))
        .route("/health", get(health))
        .nest_service("/img", ServeDir::new(img_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::with_status_code(StatusCode::GATEWAY_TIMEOUT, timeout)),
        )
        .with_state(state)
}

async fn mod_list(State(state): State<AppState>) -> ApiResult<Vec<ModListEntry>> {
    Ok(Json(get_mod_list(&state.upstream).await?))
}

async fn mod_info(State(state): State<AppState>, Query(query): Query<ModQuery>) -> ApiResult<ModInfo> {
    Ok(Json(get_mod_info(&state.upstream, &query.modname).await?))
}

async fn mod_history(State(state): State<AppState>, Query(query): Query<ModQuery>) -> ApiResult<Vec<ModVersion>> {
    Ok(Json(get_mod_history(&state.upstream, &query.modname).await?))
}

async fn author(State(state): State<AppState>, UrlPath(id): UrlPath<String>) -> ApiResult<Author> {
    let steamid = state.steam.resolve(&id).await?;
    info!(%steamid, "author lookup");
    Ok(Json(get_author_stats(&state.upstream, &state.steam, steamid).await?))
}

async fn count(State(state): State<AppState>) -> ApiResult<Value> {
    let total = count_mods(&state.upstream).await?;
    Ok(Json(json!({ "total": total })))
}

async fn version() -> Json<Value> {
    Json(json!({ "version": env!("CARGO_PKG_VERSION") }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const AUTHOR_PAGE: &str = "<html><body><br>Total Downloads: 900<br>Yesterday Downloads: 9\
        <table><tr><th>Rank</th><th>Name</th><th>Total</th><th>Yesterday</th></tr>\
        <tr><td>7</td><td>Some Mod</td><td>900</td><td>9</td></tr></table>\
        <table><tr><th>x</th></tr></table><table><tr><th>y</th></tr></table>\
        <table><tr><th>Name</th><th>Total</th><th>Yesterday</th></tr>\
        <tr><td>SomeMod</td><td>900</td><td>9</td></tr></table></body></html>";

    const DAILY: &str = "<table><tr><th>h</th></tr>\
        <tr><td>Some Mod</td><td>4</td><td>3</td><td>v0.11</td><td>SomeMod</td></tr>\
        <tr><td>Other Mod</td><td>2</td><td>1</td><td>v0.11</td><td>OtherMod</td></tr></table>";

    fn app(server: &MockServer, img_dir: &Path) -> Router {
        app_with_key(server, img_dir, "key")
    }

    fn app_with_key(server: &MockServer, img_dir: &Path, key: &str) -> Router {
        let upstream = Upstream::builder()
            .site(server.uri())
            .icon_mirror(server.uri())
            .steam_api(server.uri())
            .build()
            .unwrap();
        let steam = SteamClient::new(upstream.clone(), key).unwrap();
        router(AppState { upstream, steam }, img_dir, Duration::from_secs(5))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_health_and_version() {
        let server = MockServer::start().await;

        let (status, body) = get_json(app(&server, Path::new("img")), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));

        let (status, body) = get_json(app(&server, Path::new("img")), "/version").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_count() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/modmigrationprogress.php"))
            .respond_with(ResponseTemplate::new(200).set_body_string(DAILY))
            .mount(&server)
            .await;

        let (status, body) = get_json(app(&server, Path::new("img")), "/count").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "total": 2 }));
    }

    #[tokio::test]
    async fn test_mod_info_without_name_is_bad_request() {
        let server = MockServer::start().await;

        let (status, body) = get_json(app(&server, Path::new("img")), "/modInfo").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("invalid modname"));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_steam_id_is_bad_request() {
        let server = MockServer::start().await;

        let (status, body) = get_json(app(&server, Path::new("img")), "/author_api/123").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "the steamid '123' is invalid");
    }

    #[tokio::test]
    async fn test_unknown_profile_is_bad_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ISteamUser/GetPlayerSummaries/v2/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"response":{"players":[]}}"#))
            .mount(&server)
            .await;

        let (status, _) = get_json(app(&server, Path::new("img")), "/author_api/76561198012345678").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_author() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ISteamUser/GetPlayerSummaries/v2/"))
            .and(query_param("steamids", "76561198012345678"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"response":{"players":[{"steamid":"76561198012345678","personaname":"modder"}]}}"#,
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/tools/ranksbysteamid.php"))
            .and(query_param("steamid64", "76561198012345678"))
            .respond_with(ResponseTemplate::new(200).set_body_string(AUTHOR_PAGE))
            .mount(&server)
            .await;

        let (status, body) = get_json(app(&server, Path::new("img")), "/author_api/76561198012345678").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["steam_name"], "modder");
        assert_eq!(body["downloads_total"], 900);
        assert_eq!(body["mods"][0]["rank"], 7);
        assert_eq!(body["maintained_mods"][0]["internal_name"], "SomeMod");
    }

    #[tokio::test]
    async fn test_upstream_failure_is_bad_gateway() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let (status, body) = get_json(app(&server, Path::new("img")), "/modList").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["error"].as_str().unwrap().contains("500"));
    }

    #[tokio::test]
    async fn test_steam_rejection_does_not_leak_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ISteamUser/GetPlayerSummaries/v2/"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let app = app_with_key(&server, Path::new("img"), "TOPSECRETKEY");
        let (status, body) = get_json(app, "/author_api/76561198012345678").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        let message = body["error"].as_str().unwrap();
        assert!(message.contains("403"));
        assert!(!message.contains("TOPSECRETKEY"), "{}", message);
    }

    #[tokio::test]
    async fn test_changed_layout_is_bad_gateway() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tools/moddownloadhistory.php"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<p>gone</p>"))
            .mount(&server)
            .await;

        let (status, _) = get_json(app(&server, Path::new("img")), "/modHistory?modname=SomeMod").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_serves_images() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("logo.png"), b"\x89PNG").unwrap();

        let response = app(&server, dir.path())
            .oneshot(Request::builder().uri("/img/logo.png").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"\x89PNG");

        let response = app(&server, dir.path())
            .oneshot(Request::builder().uri("/img/missing.png").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
