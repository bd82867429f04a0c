use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use skybook_order::{FlightSelection, PaymentSession, SessionView};
use skybook_shared::ContactInfo;
use tracing::info;
use uuid::Uuid;

use crate::{error::AppError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/payments", post(open_payment))
        .route("/v1/payments/{id}", get(get_payment).delete(cancel_payment))
        .route("/v1/payments/{id}/confirm", post(confirm_payment))
        .route("/v1/payments/{id}/contact", post(submit_contact))
}

/// POST /v1/payments?flightId=..&price=..&passengers=..
/// Opens a payment session for the flight chosen on the results page.
async fn open_payment(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> (StatusCode, Json<SessionView>) {
    let selection = FlightSelection::from_query_string(query.as_deref().unwrap_or_default());
    let session = PaymentSession::open(selection, state.collaborators.clone(), state.payment.clone()).await;
    state.insert_session(session.clone()).await;
    (StatusCode::CREATED, Json(session.view().await))
}

/// GET /v1/payments/{id}
async fn get_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = state.session(id).await?;
    Ok(Json(session.view().await))
}

/// POST /v1/payments/{id}/confirm
async fn confirm_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = state.session(id).await?;
    session.confirm().await;
    Ok(Json(session.view().await))
}

/// POST /v1/payments/{id}/contact
async fn submit_contact(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(contact): Json<ContactInfo>,
) -> Result<Json<SessionView>, AppError> {
    let session = state.session(id).await?;
    session.submit_contact(contact).await?;
    Ok(Json(session.view().await))
}

/// DELETE /v1/payments/{id}
/// Aborts the flow and forgets the session. A booking already sent to the
/// backend stays there.
async fn cancel_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = state.remove_session(id).await?;
    let final_state = session.cancel().await;
    info!(session_id = %id, state = ?final_state, "Payment session closed");
    Ok(Json(session.view().await))
}
