use crate::config::Config;
use crate::orchestrator::Orchestrator;
use crate::render::{placeholder_svg, render_page};
use crate::search::{normalize_query, submit_target, CURRENT_VIEW_PATH};
use crate::session::{Sessions, SESSION_COOKIE};
use crate::store::ViewStore;
use crate::tmdb::{MovieApi, TmdbClient};
use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{Html, IntoResponse, Redirect},
    routing::{get, post},
    Form, Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::{debug, info};

const MAX_BODY_BYTES: usize = 16 * 1024; // search form only

#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn MovieApi>,
    pub sessions: Arc<Sessions>,
    pub default_query: String,
}

impl AppState {
    pub fn new(api: Arc<dyn MovieApi>, default_query: impl Into<String>) -> Self {
        Self {
            api,
            sessions: Arc::new(Sessions::new()),
            default_query: default_query.into(),
        }
    }

    /// Looks up the caller's view store, issuing a session cookie when the
    /// request did not carry a live one.
    async fn session(&self, jar: CookieJar) -> (CookieJar, Arc<ViewStore>) {
        let presented = jar.get(SESSION_COOKIE).map(|c| c.value().to_string());
        let (id, store) = self.sessions.resolve(presented.as_deref()).await;
        if presented.as_deref() == Some(id.as_str()) {
            return (jar, store);
        }
        let cookie = Cookie::build((SESSION_COOKIE, id))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax);
        (jar.add(cookie), store)
    }

    async fn orchestrator(&self, jar: CookieJar) -> (CookieJar, Orchestrator) {
        let (jar, store) = self.session(jar).await;
        (jar, Orchestrator::new(self.api.clone(), store))
    }
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    movie: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    movie: String,
}

pub async fn run_server(config: Config) -> Result<()> {
    let tmdb: Arc<dyn MovieApi> = Arc::new(TmdbClient::from_config(&config)?);
    let state = AppState::new(tmdb, config.default_query.clone());
    info!("Default query: '{}'", state.default_query);

    let app = build_router(state);

    info!("Listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/movie/:id", get(open_movie))
        .route("/search", post(submit_search))
        .route("/current", get(current))
        .route("/trailer/show", post(show_trailer))
        .route("/trailer/hide", post(hide_trailer))
        .route("/api/state", get(api_state))
        .route("/placeholder.svg", get(placeholder))
        .route("/health", get(health))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn index(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<PageQuery>,
) -> (CookieJar, Html<String>) {
    let query = params
        .movie
        .as_deref()
        .and_then(normalize_query)
        .unwrap_or_else(|| state.default_query.clone());
    let (jar, orchestrator) = state.orchestrator(jar).await;
    let view = orchestrator.search(&query).await;
    (jar, Html(render_page(&view)))
}

async fn open_movie(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i32>,
) -> (CookieJar, Html<String>) {
    let (jar, orchestrator) = state.orchestrator(jar).await;
    let view = orchestrator.open(id).await;
    (jar, Html(render_page(&view)))
}

async fn submit_search(Form(form): Form<SearchForm>) -> Redirect {
    let target = submit_target(&form.movie);
    debug!("Search submitted, redirecting to {}", target);
    Redirect::to(&target)
}

async fn current(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Html<String>) {
    let (jar, store) = state.session(jar).await;
    let view = store.snapshot().await;
    (jar, Html(render_page(&view)))
}

async fn show_trailer(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    let (jar, store) = state.session(jar).await;
    if !store.set_trailer_visible(true).await {
        debug!("Ignoring trailer request: current movie has no trailer");
    }
    (jar, Redirect::to(CURRENT_VIEW_PATH))
}

async fn hide_trailer(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    let (jar, store) = state.session(jar).await;
    store.set_trailer_visible(false).await;
    (jar, Redirect::to(CURRENT_VIEW_PATH))
}

async fn api_state(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<serde_json::Value>) {
    let (jar, store) = state.session(jar).await;
    let view = store.snapshot().await;
    let body = json!({
        "phase": view.phase(),
        "trailer_url": view.current_movie.as_ref().and_then(|m| m.trailer_url()),
        "state": view,
    });
    (jar, Json(body))
}

async fn placeholder() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "image/svg+xml")], placeholder_svg())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
