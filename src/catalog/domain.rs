pub mod service;

use async_trait::async_trait;
use serde_json::Value;
use crate::books::dto::BookDto;
use crate::core::library::LibraryResult;

// Catalog owns book insertion semantics and the word search; requests arrive
// as loose JSON and are validated before any storage call.
#[async_trait]
pub(crate) trait CatalogService: Sync + Send {
    async fn add_book(&self, req: &Value) -> LibraryResult<BookDto>;
    async fn find_books(&self, req: &Value) -> LibraryResult<Vec<BookDto>>;
    async fn clear(&self) -> LibraryResult<()>;
}
