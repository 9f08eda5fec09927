use async_trait::async_trait;
use serde_json::Value;
use crate::books::repository::BookRepository;
use crate::circulation::domain::CirculationService;
use crate::core::domain::Configuration;
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::validation::req_string;
use crate::patrons::repository::PatronRepository;

pub(crate) struct CirculationServiceImpl {
    book_repository: Box<dyn BookRepository>,
    patron_repository: Box<dyn PatronRepository>,
}

impl CirculationServiceImpl {
    pub(crate) fn new(_config: &Configuration, book_repository: Box<dyn BookRepository>,
                      patron_repository: Box<dyn PatronRepository>) -> Self {
        Self {
            book_repository,
            patron_repository,
        }
    }
}

#[async_trait]
impl CirculationService for CirculationServiceImpl {
    async fn checkout_book(&self, req: &Value) -> LibraryResult<()> {
        let patron_id = req_string(req, "patronId")?;
        let isbn = req_string(req, "isbn")?;
        let book = match self.book_repository.find_by_isbn(isbn.as_str()).await? {
            Some(book) => book,
            None => return Err(LibraryError::bad_request(
                Some("isbn"), format!("no book with isbn {}", isbn).as_str())),
        };
        if book.n_copies <= 0 {
            return Err(LibraryError::bad_request(
                Some("isbn"), format!("no copies of {} available for checkout", isbn).as_str()));
        }
        if let Some(patron) = self.patron_repository.find_by_patron_id(patron_id.as_str()).await? {
            if patron.has_checked_out(isbn.as_str()) {
                return Err(LibraryError::bad_request(
                    Some("isbn"),
                    format!("patron {} already has {} checked out", patron_id, isbn).as_str()));
            }
        }
        // the conditional decrement re-checks n_copies > 0 in the store, so
        // two checkouts racing for the last copy cannot both succeed
        if !self.book_repository.checkout_copy(isbn.as_str()).await? {
            return Err(LibraryError::bad_request(
                Some("isbn"), format!("no copies of {} available for checkout", isbn).as_str()));
        }
        // the decrement above and the set add below are separate writes; a
        // crash between them leaves a copy held by no patron until the store
        // is reconciled
        self.patron_repository.add_checked_out(patron_id.as_str(), isbn.as_str()).await?;
        Ok(())
    }

    async fn return_book(&self, req: &Value) -> LibraryResult<()> {
        let patron_id = req_string(req, "patronId")?;
        let isbn = req_string(req, "isbn")?;
        if self.book_repository.find_by_isbn(isbn.as_str()).await?.is_none() {
            return Err(LibraryError::bad_request(
                Some("isbn"), format!("no book with isbn {}", isbn).as_str()));
        }
        let checked_out = self.patron_repository.find_by_patron_id(patron_id.as_str()).await?
            .map(|patron| patron.has_checked_out(isbn.as_str()))
            .unwrap_or(false);
        if !checked_out {
            return Err(LibraryError::bad_request(
                Some("isbn"),
                format!("patron {} has no checkout for {}", patron_id, isbn).as_str()));
        }
        self.book_repository.add_copies(isbn.as_str(), 1).await?;
        self.patron_repository.remove_checked_out(patron_id.as_str(), isbn.as_str()).await?;
        Ok(())
    }

    async fn clear(&self) -> LibraryResult<()> {
        self.patron_repository.clear().await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use serde_json::{json, Value};
    use crate::books::domain::model::BookEntity;
    use crate::books::repository::BookRepository;
    use crate::books::repository::memory_book_repository::MemoryBookRepository;
    use crate::circulation::domain::CirculationService;
    use crate::circulation::domain::service::CirculationServiceImpl;
    use crate::core::domain::Configuration;
    use crate::core::library::ErrorCode;
    use crate::patrons::repository::PatronRepository;
    use crate::patrons::repository::memory_patron_repository::MemoryPatronRepository;

    struct Fixture {
        books: MemoryBookRepository,
        patrons: MemoryPatronRepository,
        svc: CirculationServiceImpl,
    }

    fn fixture() -> Fixture {
        let books = MemoryBookRepository::new();
        let patrons = MemoryPatronRepository::new();
        let svc = CirculationServiceImpl::new(
            &Configuration::new(), Box::new(books.clone()), Box::new(patrons.clone()));
        Fixture { books, patrons, svc }
    }

    async fn add_book(books: &MemoryBookRepository, isbn: &str, n_copies: i64) {
        let book = BookEntity {
            isbn: isbn.to_string(),
            title: "Moby Dick".to_string(),
            authors: vec!["Herman Melville".to_string()],
            pages: 635,
            year: 1851,
            publisher: "Harper".to_string(),
            n_copies,
        };
        let _ = books.create(&book).await.expect("should create book");
    }

    fn req(patron_id: &str, isbn: &str) -> Value {
        json!({"patronId": patron_id, "isbn": isbn})
    }

    #[tokio::test]
    async fn test_should_validate_request_fields() {
        let f = fixture();

        let err = f.svc.checkout_book(&json!({"isbn": "123-456-789-0"})).await.unwrap_err();
        assert_eq!(ErrorCode::Missing, err.code());
        assert_eq!(Some("patronId"), err.field());

        let err = f.svc.checkout_book(&json!({"patronId": "p1"})).await.unwrap_err();
        assert_eq!(ErrorCode::Missing, err.code());
        assert_eq!(Some("isbn"), err.field());

        let err = f.svc.checkout_book(&json!({"patronId": 7, "isbn": "123-456-789-0"})).await.unwrap_err();
        assert_eq!(ErrorCode::BadType, err.code());

        let err = f.svc.return_book(&json!({"patronId": "p1", "isbn": 7})).await.unwrap_err();
        assert_eq!(ErrorCode::BadType, err.code());
    }

    #[tokio::test]
    async fn test_should_reject_unknown_isbn() {
        let f = fixture();

        let err = f.svc.checkout_book(&req("p1", "999-999-999-9")).await.unwrap_err();
        assert_eq!(ErrorCode::BadReq, err.code());
        assert_eq!(Some("isbn"), err.field());

        let err = f.svc.return_book(&req("p1", "999-999-999-9")).await.unwrap_err();
        assert_eq!(ErrorCode::BadReq, err.code());
    }

    #[tokio::test]
    async fn test_should_checkout_and_track_patron() {
        let f = fixture();
        add_book(&f.books, "123-456-789-0", 2).await;

        let _ = f.svc.checkout_book(&req("p1", "123-456-789-0")).await.expect("should checkout");

        let book = f.books.find_by_isbn("123-456-789-0").await
            .expect("should find book").expect("book should exist");
        assert_eq!(1, book.n_copies);
        let patron = f.patrons.find_by_patron_id("p1").await
            .expect("should find patron").expect("patron should exist");
        assert!(patron.has_checked_out("123-456-789-0"));
    }

    #[tokio::test]
    async fn test_should_reject_duplicate_checkout() {
        let f = fixture();
        add_book(&f.books, "123-456-789-0", 5).await;

        let _ = f.svc.checkout_book(&req("p1", "123-456-789-0")).await.expect("should checkout");
        let err = f.svc.checkout_book(&req("p1", "123-456-789-0")).await.unwrap_err();
        assert_eq!(ErrorCode::BadReq, err.code());

        // the failed second checkout must not consume a copy
        let book = f.books.find_by_isbn("123-456-789-0").await
            .expect("should find book").expect("book should exist");
        assert_eq!(4, book.n_copies);
    }

    #[tokio::test]
    async fn test_should_allow_distinct_patrons_to_share_title() {
        let f = fixture();
        add_book(&f.books, "123-456-789-0", 2).await;

        let _ = f.svc.checkout_book(&req("p1", "123-456-789-0")).await.expect("should checkout");
        let _ = f.svc.checkout_book(&req("p2", "123-456-789-0")).await.expect("should checkout");

        let book = f.books.find_by_isbn("123-456-789-0").await
            .expect("should find book").expect("book should exist");
        assert_eq!(0, book.n_copies);
    }

    #[tokio::test]
    async fn test_should_reject_checkout_when_no_copies_left() {
        let f = fixture();
        add_book(&f.books, "123-456-789-0", 1).await;

        let _ = f.svc.checkout_book(&req("p1", "123-456-789-0")).await.expect("should checkout");
        let err = f.svc.checkout_book(&req("p2", "123-456-789-0")).await.unwrap_err();
        assert_eq!(ErrorCode::BadReq, err.code());

        let book = f.books.find_by_isbn("123-456-789-0").await
            .expect("should find book").expect("book should exist");
        assert_eq!(0, book.n_copies);
    }

    #[tokio::test]
    async fn test_should_grant_last_copy_to_exactly_one_racing_checkout() {
        let f = fixture();
        add_book(&f.books, "123-456-789-0", 1).await;
        let svc: Arc<CirculationServiceImpl> = Arc::new(CirculationServiceImpl::new(
            &Configuration::new(), Box::new(f.books.clone()), Box::new(f.patrons.clone())));

        let svc1 = svc.clone();
        let task1 = tokio::spawn(async move {
            svc1.checkout_book(&req("p1", "123-456-789-0")).await
        });
        let svc2 = svc.clone();
        let task2 = tokio::spawn(async move {
            svc2.checkout_book(&req("p2", "123-456-789-0")).await
        });
        let res1 = task1.await.expect("task should not panic");
        let res2 = task2.await.expect("task should not panic");
        assert_eq!(1, [&res1, &res2].iter().filter(|r| r.is_ok()).count());

        let book = f.books.find_by_isbn("123-456-789-0").await
            .expect("should find book").expect("book should exist");
        assert_eq!(0, book.n_copies);
    }

    #[tokio::test]
    async fn test_should_round_trip_checkout_and_return() {
        let f = fixture();
        add_book(&f.books, "123-456-789-0", 3).await;

        let _ = f.svc.checkout_book(&req("p1", "123-456-789-0")).await.expect("should checkout");
        let _ = f.svc.return_book(&req("p1", "123-456-789-0")).await.expect("should return");

        let book = f.books.find_by_isbn("123-456-789-0").await
            .expect("should find book").expect("book should exist");
        assert_eq!(3, book.n_copies);
        let patron = f.patrons.find_by_patron_id("p1").await
            .expect("should find patron").expect("patron should exist");
        assert!(!patron.has_checked_out("123-456-789-0"));

        // and the same patron may take the book out again
        let _ = f.svc.checkout_book(&req("p1", "123-456-789-0")).await.expect("should checkout");
    }

    #[tokio::test]
    async fn test_should_reject_return_without_checkout() {
        let f = fixture();
        add_book(&f.books, "123-456-789-0", 1).await;

        let err = f.svc.return_book(&req("p1", "123-456-789-0")).await.unwrap_err();
        assert_eq!(ErrorCode::BadReq, err.code());

        // a return by the wrong patron is also rejected
        let _ = f.svc.checkout_book(&req("p1", "123-456-789-0")).await.expect("should checkout");
        let err = f.svc.return_book(&req("p2", "123-456-789-0")).await.unwrap_err();
        assert_eq!(ErrorCode::BadReq, err.code());
        let book = f.books.find_by_isbn("123-456-789-0").await
            .expect("should find book").expect("book should exist");
        assert_eq!(0, book.n_copies);
    }

    #[tokio::test]
    async fn test_should_clear_patron_records() {
        let f = fixture();
        add_book(&f.books, "123-456-789-0", 1).await;

        let _ = f.svc.checkout_book(&req("p1", "123-456-789-0")).await.expect("should checkout");
        let _ = f.svc.clear().await.expect("should clear");
        assert_eq!(None, f.patrons.find_by_patron_id("p1").await.expect("should find none"));
    }
}
