use crate::books;
use crate::circulation::domain::CirculationService;
use crate::circulation::domain::service::CirculationServiceImpl;
use crate::core::domain::Configuration;
use crate::core::repository::RepositoryStore;
use crate::patrons;

pub(crate) async fn create_circulation_service(config: &Configuration,
                                               store: RepositoryStore) -> Box<dyn CirculationService> {
    let book_repo = books::factory::create_book_repository(config, store).await;
    let patron_repo = patrons::factory::create_patron_repository(config, store).await;
    Box::new(CirculationServiceImpl::new(config, book_repo, patron_repo))
}
