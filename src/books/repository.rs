pub mod ddb_book_repository;
pub mod memory_book_repository;

use async_trait::async_trait;
use crate::books::domain::model::BookEntity;
use crate::core::library::LibraryResult;

// Persistence surface for books plus the word index over title and authors.
// All copy-count changes are single atomic updates against the store; callers
// never read-modify-write n_copies in process memory.
#[async_trait]
pub(crate) trait BookRepository: Sync + Send {
    // inserts a new book and its word postings; fails when the isbn exists
    async fn create(&self, book: &BookEntity) -> LibraryResult<usize>;

    async fn find_by_isbn(&self, isbn: &str) -> LibraryResult<Option<BookEntity>>;

    // atomically adds delta to n_copies and returns the updated record
    async fn add_copies(&self, isbn: &str, delta: i64) -> LibraryResult<BookEntity>;

    // decrements n_copies by one only while it is positive; Ok(false) means
    // the book had no copies left (or no such isbn) and nothing changed
    async fn checkout_copy(&self, isbn: &str) -> LibraryResult<bool>;

    // books whose title/author words contain every given word, ascending by
    // title, sliced to [index, index + count) before leaving the store
    async fn find_by_words(&self, words: &[String],
                           index: usize, count: usize) -> LibraryResult<Vec<BookEntity>>;

    async fn clear(&self) -> LibraryResult<usize>;
}
