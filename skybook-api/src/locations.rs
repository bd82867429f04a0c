use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use skybook_core::geo;
use skybook_core::search::search;
use skybook_shared::{Location, Region};

use crate::{error::AppError, state::AppState};

#[derive(Debug, Serialize)]
pub struct CountrySummary {
    pub name: String,
    pub regions: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct LocationsParams {
    pub country: Option<String>,
    #[serde(default)]
    pub q: String,
}

/// Region listing while the search box is empty, matches otherwise.
#[derive(Debug, Serialize)]
#[serde(tag = "view", rename_all = "camelCase")]
pub enum LocationsResponse {
    Idle { country: String, regions: Vec<Region> },
    Results { country: String, locations: Vec<Location> },
}

#[derive(Debug, Deserialize)]
pub struct FlightInfoParams {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightInfoResponse {
    pub from: Location,
    pub to: Location,
    pub distance_km: Option<u32>,
    pub duration: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/countries", get(list_countries))
        .route("/v1/locations", get(list_locations))
        .route("/v1/flight-info", get(flight_info))
}

/// GET /v1/countries
async fn list_countries(State(state): State<AppState>) -> Json<Vec<CountrySummary>> {
    let countries = state
        .directory
        .countries()
        .iter()
        .map(|c| CountrySummary {
            name: c.name.clone(),
            regions: c.regions.iter().map(|r| r.name.clone()).collect(),
        })
        .collect();
    Json(countries)
}

/// GET /v1/locations?country=&q=
async fn list_locations(
    State(state): State<AppState>,
    Query(params): Query<LocationsParams>,
) -> Result<Json<LocationsResponse>, AppError> {
    let country = params.country.unwrap_or_else(|| state.search.default_country.clone());
    if state.directory.country(&country).is_none() {
        return Err(AppError::NotFoundError(format!("Unknown country: {}", country)));
    }

    let response = if params.q.trim().is_empty() {
        LocationsResponse::Idle {
            regions: state.directory.regions(&country).to_vec(),
            country,
        }
    } else {
        LocationsResponse::Results {
            locations: search(&state.directory, &country, &params.q).cloned().collect(),
            country,
        }
    };
    Ok(Json(response))
}

/// GET /v1/flight-info?from=&to=
async fn flight_info(
    State(state): State<AppState>,
    Query(params): Query<FlightInfoParams>,
) -> Result<Json<FlightInfoResponse>, AppError> {
    let from = find(&state, &params.from)?;
    let to = find(&state, &params.to)?;
    let estimate = geo::estimate(&from, &to);

    Ok(Json(FlightInfoResponse {
        from,
        to,
        distance_km: estimate.as_ref().map(|e| e.distance_km),
        duration: estimate.map(|e| e.duration),
    }))
}

pub(crate) fn find(state: &AppState, code: &str) -> Result<Location, AppError> {
    state
        .directory
        .find_by_code(code)
        .cloned()
        .ok_or_else(|| AppError::NotFoundError(format!("Unknown location code: {}", code)))
}
