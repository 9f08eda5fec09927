use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use lazy_static::lazy_static;
use tokio::sync::RwLock;

use crate::core::library::LibraryResult;
use crate::patrons::domain::model::PatronEntity;
use crate::patrons::repository::PatronRepository;

lazy_static! {
    static ref SHARED_STATE: Arc<RwLock<BTreeMap<String, PatronEntity>>> =
        Arc::new(RwLock::new(BTreeMap::new()));
}

// In-process patron store; add upserts the record like the DynamoDB ADD does.
#[derive(Debug, Clone)]
pub struct MemoryPatronRepository {
    state: Arc<RwLock<BTreeMap<String, PatronEntity>>>,
}

impl MemoryPatronRepository {
    // a repository with its own private state, for tests
    pub(crate) fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    // the process-wide store used when the factory runs with the memory store
    pub(crate) fn shared() -> Self {
        Self {
            state: SHARED_STATE.clone(),
        }
    }
}

#[async_trait]
impl PatronRepository for MemoryPatronRepository {
    async fn find_by_patron_id(&self, patron_id: &str) -> LibraryResult<Option<PatronEntity>> {
        let state = self.state.read().await;
        Ok(state.get(patron_id).cloned())
    }

    async fn add_checked_out(&self, patron_id: &str, isbn: &str) -> LibraryResult<usize> {
        let mut state = self.state.write().await;
        state.entry(patron_id.to_string())
            .or_insert_with(|| PatronEntity::new(patron_id))
            .checked_out_isbns.insert(isbn.to_string());
        Ok(1)
    }

    async fn remove_checked_out(&self, patron_id: &str, isbn: &str) -> LibraryResult<usize> {
        let mut state = self.state.write().await;
        if let Some(patron) = state.get_mut(patron_id) {
            patron.checked_out_isbns.remove(isbn);
        }
        Ok(1)
    }

    async fn clear(&self) -> LibraryResult<usize> {
        let mut state = self.state.write().await;
        let deleted = state.len();
        state.clear();
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use crate::patrons::repository::PatronRepository;
    use crate::patrons::repository::memory_patron_repository::MemoryPatronRepository;

    #[tokio::test]
    async fn test_should_add_and_remove_checked_out() {
        let patrons_repo = MemoryPatronRepository::new();
        assert_eq!(None, patrons_repo.find_by_patron_id("p1").await.expect("should find none"));

        let _ = patrons_repo.add_checked_out("p1", "123-456-789-0").await.expect("should add");
        let _ = patrons_repo.add_checked_out("p1", "123-456-789-0").await.expect("should re-add");
        let _ = patrons_repo.add_checked_out("p1", "123-456-789-1").await.expect("should add");
        let patron = patrons_repo.find_by_patron_id("p1").await
            .expect("should find patron").expect("patron should exist");
        assert_eq!(2, patron.checked_out_isbns.len());

        let _ = patrons_repo.remove_checked_out("p1", "123-456-789-0").await.expect("should remove");
        let patron = patrons_repo.find_by_patron_id("p1").await
            .expect("should find patron").expect("patron should exist");
        assert!(!patron.has_checked_out("123-456-789-0"));
        assert!(patron.has_checked_out("123-456-789-1"));
    }

    #[tokio::test]
    async fn test_should_tolerate_remove_for_unknown_patron() {
        let patrons_repo = MemoryPatronRepository::new();
        let _ = patrons_repo.remove_checked_out("ghost", "123-456-789-0").await.expect("should accept");
        assert_eq!(None, patrons_repo.find_by_patron_id("ghost").await.expect("should find none"));
    }

    #[tokio::test]
    async fn test_should_clear_patrons() {
        let patrons_repo = MemoryPatronRepository::new();
        let _ = patrons_repo.add_checked_out("p1", "123-456-789-0").await.expect("should add");
        let _ = patrons_repo.add_checked_out("p2", "123-456-789-1").await.expect("should add");
        let deleted = patrons_repo.clear().await.expect("should clear");
        assert_eq!(2, deleted);
        assert_eq!(None, patrons_repo.find_by_patron_id("p1").await.expect("should find none"));
    }
}
