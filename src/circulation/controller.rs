use axum::{
    extract::State,
    response::Json,
};
use serde_json::{json, Value};
use crate::circulation::domain::CirculationService;
use crate::circulation::factory;
use crate::core::controller::{AppState, ServerError};

async fn build_service(state: AppState) -> Box<dyn CirculationService> {
    factory::create_circulation_service(&state.config, state.store).await
}

pub(crate) async fn checkout_book(
    State(state): State<AppState>,
    json: Json<Value>) -> Result<Json<Value>, ServerError> {
    let svc = build_service(state).await;
    svc.checkout_book(&json.0).await?;
    Ok(Json(json!({"status": "checked_out"})))
}

pub(crate) async fn return_book(
    State(state): State<AppState>,
    json: Json<Value>) -> Result<Json<Value>, ServerError> {
    let svc = build_service(state).await;
    svc.return_book(&json.0).await?;
    Ok(Json(json!({"status": "returned"})))
}

pub(crate) async fn clear_circulation(
    State(state): State<AppState>) -> Result<Json<Value>, ServerError> {
    let svc = build_service(state).await;
    svc.clear().await?;
    Ok(Json(json!({"status": "cleared"})))
}
