include!("../../lib.rs");
use std::net::SocketAddr;
use axum::{
    routing::{delete, post},
    Router,
};
use crate::circulation::controller::{checkout_book, clear_circulation, return_book};
use crate::core::controller::AppState;
use crate::core::repository::RepositoryStore;
use crate::utils::ddb::setup_tracing;

const DEV_MODE: bool = true;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();

    let state = if DEV_MODE {
        AppState::new(RepositoryStore::Memory)
    } else {
        AppState::new(RepositoryStore::DynamoDB)
    };

    let app = Router::new()
        .route("/circulation/checkout", post(checkout_book))
        .route("/circulation/return", post(return_book))
        .route("/circulation", delete(clear_circulation))
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], 8081));
    axum::Server::bind(&addr).serve(app.into_make_service()).await?;
    Ok(())
}
