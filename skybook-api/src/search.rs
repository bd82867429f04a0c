use axum::{extract::State, routing::post, Json, Router};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use skybook_core::{BookingForm, Slot};
use skybook_shared::{FlightType, PassengerCounts, PassengerTally};

use crate::{error::AppError, locations::find, state::AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub from: String,
    pub to: String,
    /// Defaults to tomorrow.
    pub departure_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    #[serde(default)]
    pub passengers: Option<PassengerTally>,
    #[serde(default)]
    pub flight_type: FlightType,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub query_string: String,
    pub results_path: String,
    pub flight_type: FlightType,
    pub passengers: String,
    pub distance_km: Option<u32>,
    pub duration: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/search", post(submit_search))
}

/// POST /v1/search
async fn submit_search(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    // 1. Resolve route and passengers
    let from = find(&state, &req.from)?;
    let to = find(&state, &req.to)?;
    let passengers = match req.passengers {
        Some(t) => PassengerCounts::new(t.adults, t.children, t.infants).ok_or_else(|| {
            AppError::ValidationError(
                "At least one adult is required and infants cannot outnumber adults".to_string(),
            )
        })?,
        None => PassengerCounts::default(),
    };

    // 2. Fill the form the way the picker would
    let mut form = BookingForm::new(state.directory.clone(), &state.search, Utc::now().date_naive())?;
    form.open_location_picker(Slot::Origin);
    form.choose_location(from);
    form.open_location_picker(Slot::Destination);
    form.choose_location(to);
    form.set_flight_type(req.flight_type);
    if let Some(date) = req.departure_date {
        form.set_departure_date(Some(date));
    }
    form.set_return_date(req.return_date);
    form.set_passengers(passengers);

    // 3. Submit
    let query = form.search();
    Ok(Json(SearchResponse {
        query_string: query.to_query_string(),
        results_path: query.results_path(),
        flight_type: query.flight_type(),
        passengers: query.passengers().summary(),
        distance_km: query.distance_km(),
        duration: query.duration().map(str::to_string),
    }))
}
