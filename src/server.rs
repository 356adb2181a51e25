//! HTTP surface for the navigation engine
//!
//! Exposes the engine's query API as JSON over HTTP for UI, AR overlay and
//! admin clients running out of process.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use log::info;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::core::engine::NavigationEngine;
use crate::core::error::{Error, Result};
use crate::core::model::{
    Closures, MallLayout, NavigationUserPreferences, PointOfInterest, PreferenceType,
    PreferencesUpdate, Route,
};

type SharedEngine = Arc<Mutex<NavigationEngine>>;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRequest {
    pub origin: String,
    pub destination: String,
    #[serde(default)]
    pub preference_type: Option<PreferenceType>,
    /// When present the route is computed on a closure overlay
    #[serde(default)]
    pub closures: Option<Closures>,
}

#[derive(Debug, Deserialize)]
pub struct PoiQuery {
    pub floor: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl ToString) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}

fn route_error(err: Error) -> ApiError {
    let status = match err {
        Error::PoiNotFound { .. } => StatusCode::NOT_FOUND,
        Error::NoRoute { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    api_error(status, err)
}

async fn layout_handler(
    State(engine): State<SharedEngine>,
) -> std::result::Result<Json<MallLayout>, ApiError> {
    engine
        .lock()
        .mall_layout()
        .cloned()
        .map(Json)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "no layout loaded"))
}

async fn pois_handler(
    State(engine): State<SharedEngine>,
    Query(query): Query<PoiQuery>,
) -> Json<Vec<PointOfInterest>> {
    let engine = engine.lock();
    Json(engine.all_pois(query.floor).into_iter().cloned().collect())
}

async fn poi_handler(
    State(engine): State<SharedEngine>,
    Path(id): Path<String>,
) -> std::result::Result<Json<PointOfInterest>, ApiError> {
    engine
        .lock()
        .poi_by_id(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, format!("POI '{id}' not found")))
}

async fn get_preferences_handler(
    State(engine): State<SharedEngine>,
) -> Json<NavigationUserPreferences> {
    Json(engine.lock().user_preferences().clone())
}

async fn update_preferences_handler(
    State(engine): State<SharedEngine>,
    Json(update): Json<PreferencesUpdate>,
) -> Json<NavigationUserPreferences> {
    let mut engine = engine.lock();
    engine.update_user_preferences(&update);
    Json(engine.user_preferences().clone())
}

async fn route_handler(
    State(engine): State<SharedEngine>,
    Json(req): Json<RouteRequest>,
) -> std::result::Result<Json<Route>, ApiError> {
    let engine = engine.lock();
    let result = match &req.closures {
        Some(closures) if !closures.is_empty() => engine.try_dynamic_route(
            &req.origin,
            &req.destination,
            closures,
            req.preference_type,
        ),
        _ => engine.try_find_route(&req.origin, &req.destination, req.preference_type),
    };
    result.map(Json).map_err(route_error)
}

/// Router over a shared engine.
pub fn router(engine: NavigationEngine) -> Router {
    let engine: SharedEngine = Arc::new(Mutex::new(engine));

    Router::new()
        .route("/layout", get(layout_handler))
        .route("/pois", get(pois_handler))
        .route("/pois/{id}", get(poi_handler))
        .route(
            "/preferences",
            get(get_preferences_handler).patch(update_preferences_handler),
        )
        .route("/route", post(route_handler))
        .layer(CorsLayer::permissive())
        .with_state(engine)
}

pub async fn run_server(engine: NavigationEngine, host: &str, port: u16) -> Result<()> {
    let app = router(engine);

    let addr = format!("{host}:{port}");
    info!("Server starting on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
