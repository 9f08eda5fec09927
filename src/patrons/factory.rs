use crate::core::domain::Configuration;
use crate::core::repository::RepositoryStore;
use crate::patrons::repository::PatronRepository;
use crate::patrons::repository::ddb_patron_repository::DDBPatronRepository;
use crate::patrons::repository::memory_patron_repository::MemoryPatronRepository;
use crate::utils::ddb::{build_db_client, create_table};

pub(crate) async fn create_patron_repository(config: &Configuration,
                                             store: RepositoryStore) -> Box<dyn PatronRepository> {
    match store {
        RepositoryStore::DynamoDB => {
            let client = build_db_client(store).await;
            Box::new(DDBPatronRepository::new(client, config.patrons_table.as_str()))
        }
        RepositoryStore::LocalDynamoDB => {
            let client = build_db_client(store).await;
            let _ = create_table(&client, config.patrons_table.as_str(), "patron_id").await;
            Box::new(DDBPatronRepository::new(client, config.patrons_table.as_str()))
        }
        RepositoryStore::Memory => {
            Box::new(MemoryPatronRepository::shared())
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::domain::Configuration;
    use crate::core::repository::RepositoryStore;
    use crate::patrons::factory::create_patron_repository;
    use crate::patrons::repository::PatronRepository;

    #[tokio::test]
    async fn test_should_create_memory_repository() {
        let repo = create_patron_repository(&Configuration::new(), RepositoryStore::Memory).await;
        assert_eq!(None, repo.find_by_patron_id("nobody").await.expect("should find none"));
    }
}
