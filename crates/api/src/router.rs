use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
	compression::CompressionLayer,
	cors::CorsLayer,
	limit::RequestBodyLimitLayer,
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	trace::TraceLayer,
};
use tracing::Level;

use crate::handlers::{get_history, get_locations, get_route, get_status, health};
use crate::security::add_security_headers;
use crate::state::AppState;

/// Read-only API; state is applied by the caller with `.with_state(...)`
pub fn create_router() -> Router<AppState> {
	let trace = TraceLayer::new_for_http()
		.make_span_with(|req: &axum::http::Request<_>| {
			let req_id = req
				.headers()
				.get("x-request-id")
				.and_then(|v| v.to_str().ok())
				.unwrap_or("-");
			tracing::info_span!(
				"http_request",
				method = %req.method(),
				uri = %req.uri(),
				req_id
			)
		})
		.on_request(tower_http::trace::DefaultOnRequest::new().level(Level::DEBUG))
		.on_response(
			tower_http::trace::DefaultOnResponse::new()
				.level(Level::INFO)
				.latency_unit(tower_http::LatencyUnit::Millis),
		);
	let req_id = ServiceBuilder::new()
		.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
		.layer(PropagateRequestIdLayer::x_request_id());

	let router = Router::new()
		.route("/health", get(health))
		.route("/api/v1/status", get(get_status))
		.route("/api/v1/history", get(get_history))
		.route("/api/v1/locations", get(get_locations))
		.route("/api/v1/route", get(get_route))
		.layer(CorsLayer::permissive())
		.layer(CompressionLayer::new())
		.layer(trace)
		.layer(req_id)
		// GET-only API
		.layer(RequestBodyLimitLayer::new(16 * 1024));

	add_security_headers(router)
}
