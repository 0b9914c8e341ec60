//! Location registry and route handlers

use axum::{
	extract::{Query, State},
	http::StatusCode,
	response::Json,
};
use polar_types::{Environment, Location, Pathway, PathwayFamily};
use serde::{Deserialize, Serialize};

use crate::handlers::common::{api_error, ApiError};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationsResponse {
	pub environment: String,
	pub locations: Vec<Location>,
}

/// GET /api/v1/locations
pub async fn get_locations(State(state): State<AppState>) -> Json<LocationsResponse> {
	Json(LocationsResponse {
		environment: state.environment.name().to_string(),
		locations: state.environment.locations().to_vec(),
	})
}

#[derive(Debug, Deserialize)]
pub struct RouteQuery {
	pub source: String,
	pub destination: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResponse {
	pub source: String,
	pub destination: String,
	pub pathway: Pathway,
	pub family: PathwayFamily,
}

/// GET /api/v1/route?source=&destination=
pub async fn get_route(
	State(state): State<AppState>,
	Query(query): Query<RouteQuery>,
) -> Result<Json<RouteResponse>, ApiError> {
	let source = find_location(&state.environment, &query.source)?;
	let destination = find_location(&state.environment, &query.destination)?;

	let pathway = polar_service::decide_route(source, destination, &state.environment)
		.map_err(|e| api_error(StatusCode::UNPROCESSABLE_ENTITY, "UNSUPPORTED_ROUTE", e.to_string()))?;

	Ok(Json(RouteResponse {
		source: query.source,
		destination: query.destination,
		pathway,
		family: pathway.family(),
	}))
}

fn find_location<'a>(environment: &'a Environment, id: &str) -> Result<&'a Location, ApiError> {
	environment.location(id).ok_or_else(|| {
		api_error(
			StatusCode::NOT_FOUND,
			"LOCATION_NOT_FOUND",
			format!("Location {} not found", id),
		)
	})
}
