use axum::{
    extract::State,
    response::Json,
};
use serde_json::{json, Value};
use crate::books::dto::BookDto;
use crate::catalog::domain::CatalogService;
use crate::catalog::factory;
use crate::core::controller::{AppState, ServerError};

async fn build_service(state: AppState) -> Box<dyn CatalogService> {
    factory::create_catalog_service(&state.config, state.store).await
}

pub(crate) async fn add_book(
    State(state): State<AppState>,
    json: Json<Value>) -> Result<Json<BookDto>, ServerError> {
    let svc = build_service(state).await;
    let res = svc.add_book(&json.0).await?;
    Ok(Json(res))
}

pub(crate) async fn find_books(
    State(state): State<AppState>,
    json: Json<Value>) -> Result<Json<Vec<BookDto>>, ServerError> {
    let svc = build_service(state).await;
    let res = svc.find_books(&json.0).await?;
    Ok(Json(res))
}

pub(crate) async fn clear_books(
    State(state): State<AppState>) -> Result<Json<Value>, ServerError> {
    let svc = build_service(state).await;
    svc.clear().await?;
    Ok(Json(json!({"status": "cleared"})))
}
