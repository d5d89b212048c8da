use crate::catalog::Catalog;
use crate::models::{SearchParams, SearchResponse};
use crate::request_id::inject_request_id;
use axum::{
    Json, Router,
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
}

impl AppState {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }
}

pub fn app(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/search", get(search))
        .layer(cors)
        .layer(axum::middleware::from_fn(inject_request_id))
        .with_state(state)
}

/// `GET /search?model=<query>`
///
/// 200 with `{"model", "link"}` on a match, 200 with `null` for an empty
/// query and 404 with `{"error"}` when nothing matches.
#[axum_macros::debug_handler]
pub async fn search(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    let params = SearchParams::from_pairs(pairs);
    debug!("Received search request for '{}'", params.model);

    match state.catalog.search(&params.model) {
        Ok(Some(entry)) => {
            info!("Resolved '{}' to '{}'", params.model, entry.name);
            Json(Some(SearchResponse::from(entry))).into_response()
        }
        Ok(None) => {
            debug!("Empty query, returning null");
            Json(None::<SearchResponse>).into_response()
        }
        Err(e) => {
            info!("No model matches '{}'", params.model);
            e.into_response()
        }
    }
}
