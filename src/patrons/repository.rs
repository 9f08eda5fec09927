pub mod ddb_patron_repository;
pub mod memory_patron_repository;

use async_trait::async_trait;
use crate::core::library::LibraryResult;
use crate::patrons::domain::model::PatronEntity;

// Persistence surface for per-patron checked-out sets. Set membership changes
// are single atomic updates; add upserts the record when the patron is new.
#[async_trait]
pub(crate) trait PatronRepository: Sync + Send {
    async fn find_by_patron_id(&self, patron_id: &str) -> LibraryResult<Option<PatronEntity>>;

    async fn add_checked_out(&self, patron_id: &str, isbn: &str) -> LibraryResult<usize>;

    async fn remove_checked_out(&self, patron_id: &str, isbn: &str) -> LibraryResult<usize>;

    async fn clear(&self) -> LibraryResult<usize>;
}
