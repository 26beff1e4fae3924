use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::core::api_types::{
    ApiFavoriteStatus, ApiLookupResponse, ApiMovie, ApiMovieDetail, ApiSearchResponse,
};
use crate::core::favorites::FavoritesStore;
use crate::core::models::{MediaType, PlotLength};
use crate::core::search::{self, MovieCatalog, SearchOptions};
use crate::core::storage::KeyValueStore;

// ── App state ────────────────────────────────────────────────

pub type DynStorage = Box<dyn KeyValueStore + Send>;
type SharedFavorites = Arc<Mutex<FavoritesStore<DynStorage>>>;

/// Combined state passed to handlers via axum State extractor.
#[derive(Clone)]
struct AppState {
    favorites: SharedFavorites,
    catalog: Arc<dyn MovieCatalog>,
}

// ── Server bootstrap ─────────────────────────────────────────

pub fn router(catalog: Arc<dyn MovieCatalog>, storage: DynStorage) -> Router {
    let app_state = AppState {
        favorites: Arc::new(Mutex::new(FavoritesStore::new(storage))),
        catalog,
    };

    Router::new()
        .route("/api/search", get(search_movies))
        .route("/api/suggest", get(suggest_movies))
        .route("/api/featured", get(featured_movies))
        .route("/api/movies/{id}", get(movie_details))
        .route("/api/lookup", get(lookup_title))
        .route("/api/query", get(advanced_query))
        .route("/api/favorites", get(list_favorites).post(add_favorite))
        .route(
            "/api/favorites/{id}",
            get(favorite_status).delete(remove_favorite),
        )
        .route("/api/favorites/{id}/toggle", post(toggle_favorite))
        .with_state(app_state)
        .fallback(landing_page)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        // Add CORS for development (frontend dev server on another port)
        .layer(tower_http::cors::CorsLayer::permissive())
}

pub async fn start_server(app: Router, port: u16) -> std::io::Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("CineSearch API listening on http://localhost:{port}/api");

    axum::serve(listener, app).await
}

async fn run_blocking<T, F>(f: F) -> Result<T, Response>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        error!("Blocking task failed: {e}");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
    })
}

/// Runs a catalog call on the blocking pool; the HTTP client is synchronous.
async fn with_catalog<T, F>(state: &AppState, f: F) -> Result<T, Response>
where
    T: Send + 'static,
    F: FnOnce(&dyn MovieCatalog) -> T + Send + 'static,
{
    let catalog = Arc::clone(&state.catalog);
    run_blocking(move || f(catalog.as_ref())).await
}

/// Same for the favorites store, which does file I/O. The lock is held
/// until the blocking call finishes.
async fn with_favorites<T, F>(state: &AppState, f: F) -> Result<T, Response>
where
    T: Send + 'static,
    F: FnOnce(&FavoritesStore<DynStorage>) -> T + Send + 'static,
{
    let favorites = Arc::clone(&state.favorites).lock_owned().await;
    run_blocking(move || f(&*favorites)).await
}

async fn favorite_ids(state: &AppState) -> Result<HashSet<String>, Response> {
    with_favorites(state, |favorites| {
        favorites.get_favorites().into_iter().map(|m| m.id).collect()
    })
    .await
}

fn bad_request(message: String) -> Response {
    (StatusCode::BAD_REQUEST, message).into_response()
}

// ── GET /api/search?q=...&page=..&type=..&y=.. ───────────────

#[derive(Deserialize)]
struct SearchQuery {
    q: Option<String>,
    page: Option<u32>,
    #[serde(rename = "type")]
    media_type: Option<String>,
    y: Option<String>,
}

async fn search_movies(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Response {
    let media_type = match params.media_type.as_deref() {
        None => MediaType::default(),
        Some(t) => match t.parse::<MediaType>() {
            Ok(mt) => mt,
            Err(e) => return bad_request(e),
        },
    };
    let term = params.q.unwrap_or_default();
    let page = params.page.unwrap_or(1);
    let year = params.y;

    let outcome = match with_catalog(&state, move |c| {
        c.search_movies(&term, page, media_type, year.as_deref())
    })
    .await
    {
        Ok(o) => o,
        Err(resp) => return resp,
    };

    let ids = match favorite_ids(&state).await {
        Ok(ids) => ids,
        Err(resp) => return resp,
    };
    Json(ApiSearchResponse::from_outcome(&outcome, |id| ids.contains(id))).into_response()
}

// ── GET /api/suggest?q=... ───────────────────────────────────

#[derive(Deserialize)]
struct SuggestQuery {
    q: Option<String>,
}

async fn suggest_movies(
    State(state): State<AppState>,
    Query(params): Query<SuggestQuery>,
) -> Response {
    let term = params.q.unwrap_or_default();
    let movies = match with_catalog(&state, move |c| search::suggestions(c, &term)).await {
        Ok(m) => m,
        Err(resp) => return resp,
    };

    let ids = match favorite_ids(&state).await {
        Ok(ids) => ids,
        Err(resp) => return resp,
    };
    let api: Vec<ApiMovie> = movies
        .iter()
        .map(|m| ApiMovie::from_summary(m, ids.contains(&m.id)))
        .collect();
    Json(api).into_response()
}

// ── GET /api/featured ────────────────────────────────────────

async fn featured_movies(State(state): State<AppState>) -> Response {
    let outcome = match with_catalog(&state, search::featured).await {
        Ok(o) => o,
        Err(resp) => return resp,
    };

    let ids = match favorite_ids(&state).await {
        Ok(ids) => ids,
        Err(resp) => return resp,
    };
    Json(ApiSearchResponse::from_outcome(&outcome, |id| ids.contains(id))).into_response()
}

// ── GET /api/movies/:id?plot=short|full ──────────────────────

#[derive(Deserialize)]
struct DetailQuery {
    plot: Option<String>,
}

async fn movie_details(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<DetailQuery>,
) -> Response {
    let plot = match params.plot.as_deref() {
        None => PlotLength::default(),
        Some(p) => match p.parse::<PlotLength>() {
            Ok(pl) => pl,
            Err(e) => return bad_request(e),
        },
    };

    let detail = match with_catalog(&state, move |c| c.get_movie_details(&id, plot)).await {
        Ok(d) => d,
        Err(resp) => return resp,
    };

    let favorite = if detail.is_available() {
        let id = detail.summary.id.clone();
        match with_favorites(&state, move |favorites| favorites.is_favorite(&id)).await {
            Ok(f) => f,
            Err(resp) => return resp,
        }
    } else {
        false
    };
    Json(ApiMovieDetail::from_detail(&detail, favorite)).into_response()
}

// ── GET /api/lookup?t=...&y=... ──────────────────────────────

#[derive(Deserialize)]
struct LookupQuery {
    t: Option<String>,
    y: Option<String>,
}

async fn lookup_title(
    State(state): State<AppState>,
    Query(params): Query<LookupQuery>,
) -> Response {
    let title = params.t.unwrap_or_default();
    let year = params.y;
    let outcome = match with_catalog(&state, move |c| {
        c.search_by_title_and_year(&title, year.as_deref())
    })
    .await
    {
        Ok(o) => o,
        Err(resp) => return resp,
    };

    let ids = match favorite_ids(&state).await {
        Ok(ids) => ids,
        Err(resp) => return resp,
    };
    Json(ApiLookupResponse::from_outcome(&outcome, |id| ids.contains(id))).into_response()
}

// ── GET /api/query?s=..&i=..&type=..&y=..&plot=..&page=.. ────

#[derive(Deserialize)]
struct AdvancedQuery {
    s: Option<String>,
    i: Option<String>,
    #[serde(rename = "type")]
    media_type: Option<String>,
    y: Option<String>,
    plot: Option<String>,
    page: Option<u32>,
}

async fn advanced_query(
    State(state): State<AppState>,
    Query(params): Query<AdvancedQuery>,
) -> Response {
    let media_type = match params.media_type.as_deref().map(str::parse::<MediaType>) {
        None => None,
        Some(Ok(mt)) => Some(mt),
        Some(Err(e)) => return bad_request(e),
    };
    let plot = match params.plot.as_deref().map(str::parse::<PlotLength>) {
        None => None,
        Some(Ok(pl)) => Some(pl),
        Some(Err(e)) => return bad_request(e),
    };

    let options = SearchOptions {
        title: params.s,
        imdb_id: params.i,
        media_type,
        year: params.y,
        plot,
        page: params.page,
    };
    let outcome = match with_catalog(&state, move |c| c.advanced_search(&options)).await {
        Ok(o) => o,
        Err(resp) => return resp,
    };

    let ids = match favorite_ids(&state).await {
        Ok(ids) => ids,
        Err(resp) => return resp,
    };
    Json(ApiLookupResponse::from_outcome(&outcome, |id| ids.contains(id))).into_response()
}

// ── GET /api/favorites ───────────────────────────────────────

async fn list_favorites(State(state): State<AppState>) -> Response {
    match with_favorites(&state, |favorites| favorites.get_favorites()).await {
        Ok(movies) => {
            let api: Vec<ApiMovie> = movies
                .iter()
                .map(|m| ApiMovie::from_summary(m, true))
                .collect();
            Json(api).into_response()
        }
        Err(resp) => resp,
    }
}

// ── POST /api/favorites ──────────────────────────────────────

async fn add_favorite(State(state): State<AppState>, Json(payload): Json<ApiMovie>) -> Response {
    let movie = match payload.into_summary() {
        Ok(m) => m,
        Err(e) => return bad_request(e),
    };

    let to_add = movie.clone();
    let result = with_favorites(&state, move |favorites| {
        let existed = favorites.is_favorite(&to_add.id);
        favorites.add_favorite(&to_add).map(|()| existed)
    })
    .await;

    match result {
        Ok(Ok(existed)) => {
            let status = if existed { StatusCode::OK } else { StatusCode::CREATED };
            (status, Json(ApiMovie::from_summary(&movie, true))).into_response()
        }
        Ok(Err(e)) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
        Err(resp) => resp,
    }
}

// ── GET /api/favorites/:id ───────────────────────────────────

async fn favorite_status(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let lookup_id = id.clone();
    match with_favorites(&state, move |favorites| favorites.is_favorite(&lookup_id)).await {
        Ok(favorite) => Json(ApiFavoriteStatus { id, favorite }).into_response(),
        Err(resp) => resp,
    }
}

// ── DELETE /api/favorites/:id ────────────────────────────────

async fn remove_favorite(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match with_favorites(&state, move |favorites| favorites.remove_favorite(&id)).await {
        Ok(Ok(())) => StatusCode::NO_CONTENT.into_response(),
        Ok(Err(e)) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
        Err(resp) => resp,
    }
}

// ── POST /api/favorites/:id/toggle ───────────────────────────

async fn toggle_favorite(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut payload): Json<ApiMovie>,
) -> Response {
    // Ensure the ID in the path matches the body
    payload.id = id;

    let movie = match payload.into_summary() {
        Ok(m) => m,
        Err(e) => return bad_request(e),
    };

    let id = movie.id.clone();
    match with_favorites(&state, move |favorites| favorites.toggle_favorite(&movie)).await {
        Ok(Ok(favorite)) => Json(ApiFavoriteStatus { id, favorite }).into_response(),
        Ok(Err(e)) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
        Err(resp) => resp,
    }
}

// ── Fallback ─────────────────────────────────────────────────

async fn landing_page() -> Response {
    (
        StatusCode::NOT_FOUND,
        axum::response::Html(
            r#"<!DOCTYPE html>
<html><head><meta charset="utf-8"><title>CineSearch</title></head>
<body style="font-family:system-ui;background:#0f1117;color:#e5e7eb;display:flex;align-items:center;justify-content:center;height:100vh;margin:0">
<div style="text-align:center">
<h1>CineSearch API Server</h1>
<p>Try <code>/api/search?q=batman</code> or <code>/api/favorites</code>.</p>
</div>
</body></html>"#,
        ),
    )
        .into_response()
}
