pub mod service;

use async_trait::async_trait;
use serde_json::Value;
use crate::core::library::LibraryResult;

// Circulation owns checkout and return: availability, duplicate-checkout
// prevention, the copy-count decrement/increment, and the per-patron set.
#[async_trait]
pub(crate) trait CirculationService: Sync + Send {
    async fn checkout_book(&self, req: &Value) -> LibraryResult<()>;
    async fn return_book(&self, req: &Value) -> LibraryResult<()>;
    async fn clear(&self) -> LibraryResult<()>;
}
