include!("../../lib.rs");
use std::net::SocketAddr;
use axum::{
    routing::post,
    Router,
};
use crate::catalog::controller::{add_book, clear_books, find_books};
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
        .route("/books", post(add_book).delete(clear_books))
        .route("/books/search", post(find_books))
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], 8080));
    axum::Server::bind(&addr).serve(app.into_make_service()).await?;
    Ok(())
}
