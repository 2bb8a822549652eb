//! HTTP server for the price API.
//!
//! This module wires the `/api/prices` lookup endpoint, a `/health` probe
//! and the OpenAPI document onto an axum router with tracing, timeout and
//! CORS middleware.

use crate::apis::price::PriceRequestError;
use axum::{
	extract::{rejection::QueryRejection, Query, State},
	http::StatusCode,
	response::{IntoResponse, Json, Response},
	routing::get,
	Router,
};
use price_config::ApiConfig;
use price_core::PriceService;
use price_types::{APIError, ErrorResponse, PriceQueryParams, PriceResponse};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use utoipa::OpenApi;

/// OpenAPI description of the price API.
#[derive(OpenApi)]
#[openapi(
	info(title = "Price Service API", description = "Applicable price lookup by date, product and brand"),
	paths(handle_get_price),
	components(schemas(PriceResponse, ErrorResponse)),
	tags((name = "prices", description = "Price lookup"))
)]
pub struct ApiDoc;

/// Shared application state for the API server.
#[derive(Clone)]
pub struct AppState {
	/// Price lookup shared by every request.
	pub prices: Arc<PriceService>,
}

/// Builds the API router.
pub fn router(state: AppState, request_timeout: Duration) -> Router {
	Router::new()
		.nest(
			"/api",
			Router::new().route("/prices", get(handle_get_price)),
		)
		.route("/health", get(handle_health))
		.route("/api-docs/openapi.json", get(handle_openapi))
		.layer(
			ServiceBuilder::new()
				.layer(TraceLayer::new_for_http())
				.layer(TimeoutLayer::new(request_timeout))
				.layer(CorsLayer::permissive()),
		)
		.with_state(state)
}

/// Starts the HTTP server for the API.
///
/// Runs until the process receives Ctrl+C.
pub async fn start_server(
	api_config: ApiConfig,
	prices: Arc<PriceService>,
) -> Result<(), Box<dyn std::error::Error>> {
	let app = router(
		AppState { prices },
		Duration::from_secs(api_config.timeout_seconds),
	);

	let bind_address = format!("{}:{}", api_config.host, api_config.port);
	let listener = TcpListener::bind(&bind_address).await?;

	tracing::info!("Price API server starting on {}", bind_address);

	axum::serve(listener, app)
		.with_graceful_shutdown(shutdown_signal())
		.await?;

	Ok(())
}

async fn shutdown_signal() {
	if let Err(e) = tokio::signal::ctrl_c().await {
		tracing::error!(error = %e, "Failed to listen for shutdown signal");
		return;
	}
	tracing::info!("Shutdown signal received");
}

/// Handles GET /api/prices requests.
///
/// Answers 200 with the applicable price, 404 with an empty body when no
/// price applies, or an error body otherwise.
#[utoipa::path(
	get,
	path = "/api/prices",
	tag = "prices",
	params(
		("applicationDate" = String, Query, description = "Application date, yyyy-MM-dd-HH:mm:ss", example = "2020-06-14-16:00:00"),
		("productId" = i64, Query, description = "Product identifier", example = 35455),
		("brandId" = i64, Query, description = "Brand identifier", example = 1)
	),
	responses(
		(status = 200, description = "Applicable price found", body = PriceResponse),
		(status = 400, description = "Missing, mistyped or invalid parameters", body = ErrorResponse),
		(status = 404, description = "No price applies at the given date"),
		(status = 500, description = "Price store failure", body = ErrorResponse)
	)
)]
async fn handle_get_price(
	State(state): State<AppState>,
	query: Result<Query<PriceQueryParams>, QueryRejection>,
) -> Result<Response, APIError> {
	let Query(params) = query.map_err(|rejection| {
		tracing::warn!(error = %rejection.body_text(), "Rejected price request query string");
		APIError::from(PriceRequestError::MalformedQuery(rejection.body_text()))
	})?;

	match crate::apis::price::get_price(params, &state.prices).await {
		Ok(Some(response)) => Ok(Json(response).into_response()),
		Ok(None) => Ok(StatusCode::NOT_FOUND.into_response()),
		Err(e) => Err(APIError::from(e)),
	}
}

/// Serves the OpenAPI document.
async fn handle_openapi() -> Json<utoipa::openapi::OpenApi> {
	Json(ApiDoc::openapi())
}

/// Handles GET /health requests.
async fn handle_health() -> Json<serde_json::Value> {
	Json(json!({ "status": "ok" }))
}
