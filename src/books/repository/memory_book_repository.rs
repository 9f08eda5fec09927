use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use lazy_static::lazy_static;
use tokio::sync::RwLock;

use crate::books::domain::model::BookEntity;
use crate::books::repository::BookRepository;
use crate::books::repository::ddb_book_repository::indexed_words;
use crate::core::library::{LibraryError, LibraryResult};

// books by isbn plus the word index, word -> sort key -> isbn; one lock over
// both so a book and its postings change together
#[derive(Debug, Default)]
struct MemoryBookState {
    books: BTreeMap<String, BookEntity>,
    words: BTreeMap<String, BTreeMap<String, String>>,
}

lazy_static! {
    static ref SHARED_STATE: Arc<RwLock<MemoryBookState>> =
        Arc::new(RwLock::new(MemoryBookState::default()));
}

// In-process store with the same surface and update semantics as the DynamoDB
// repository; the write lock stands in for the conditional atomic updates.
#[derive(Debug, Clone)]
pub struct MemoryBookRepository {
    state: Arc<RwLock<MemoryBookState>>,
}

impl MemoryBookRepository {
    // a repository with its own private state, for tests
    pub(crate) fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(MemoryBookState::default())),
        }
    }

    // the process-wide store used when the factory runs with the memory store,
    // so catalog and circulation see the same books
    pub(crate) fn shared() -> Self {
        Self {
            state: SHARED_STATE.clone(),
        }
    }
}

#[async_trait]
impl BookRepository for MemoryBookRepository {
    async fn create(&self, book: &BookEntity) -> LibraryResult<usize> {
        let mut state = self.state.write().await;
        if state.books.contains_key(book.isbn.as_str()) {
            return Err(LibraryError::database(
                format!("book {} already exists", book.isbn).as_str(),
                Some("ConditionalCheckFailed".to_string()), false));
        }
        for word in indexed_words(book) {
            state.words.entry(word).or_default()
                .insert(book.title_sort_key(), book.isbn.to_string());
        }
        state.books.insert(book.isbn.to_string(), book.clone());
        Ok(1)
    }

    async fn find_by_isbn(&self, isbn: &str) -> LibraryResult<Option<BookEntity>> {
        let state = self.state.read().await;
        Ok(state.books.get(isbn).cloned())
    }

    async fn add_copies(&self, isbn: &str, delta: i64) -> LibraryResult<BookEntity> {
        let mut state = self.state.write().await;
        match state.books.get_mut(isbn) {
            Some(book) => {
                book.n_copies += delta;
                Ok(book.clone())
            }
            None => Err(LibraryError::database(
                format!("book {} not found", isbn).as_str(),
                Some("ConditionalCheckFailed".to_string()), false)),
        }
    }

    async fn checkout_copy(&self, isbn: &str) -> LibraryResult<bool> {
        let mut state = self.state.write().await;
        match state.books.get_mut(isbn) {
            Some(book) if book.n_copies > 0 => {
                book.n_copies -= 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn find_by_words(&self, words: &[String],
                           index: usize, count: usize) -> LibraryResult<Vec<BookEntity>> {
        let state = self.state.read().await;
        let mut iter = words.iter();
        let first = match iter.next() {
            Some(word) => word,
            None => return Ok(Vec::new()),
        };
        let mut ordered: Vec<(String, String)> = match state.words.get(first.as_str()) {
            Some(postings) => postings.iter()
                .map(|(sort_key, isbn)| (sort_key.clone(), isbn.clone())).collect(),
            None => return Ok(Vec::new()),
        };
        for word in iter {
            match state.words.get(word.as_str()) {
                Some(postings) => {
                    let matched: HashSet<&String> = postings.keys().collect();
                    ordered.retain(|(sort_key, _)| matched.contains(sort_key));
                }
                None => return Ok(Vec::new()),
            }
        }
        Ok(ordered.into_iter()
            .skip(index)
            .take(count)
            .filter_map(|(_, isbn)| state.books.get(isbn.as_str()).cloned())
            .collect())
    }

    async fn clear(&self) -> LibraryResult<usize> {
        let mut state = self.state.write().await;
        let deleted = state.books.len();
        state.books.clear();
        state.words.clear();
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use crate::books::domain::model::BookEntity;
    use crate::books::repository::BookRepository;
    use crate::books::repository::memory_book_repository::MemoryBookRepository;

    fn book(isbn: &str, title: &str, n_copies: i64) -> BookEntity {
        BookEntity {
            isbn: isbn.to_string(),
            title: title.to_string(),
            authors: vec!["Jane Doe".to_string()],
            pages: 100,
            year: 2001,
            publisher: "Acme".to_string(),
            n_copies,
        }
    }

    #[tokio::test]
    async fn test_should_create_find_books() {
        let books_repo = MemoryBookRepository::new();
        let book = book("123-456-789-0", "Systems Programming", 2);
        let size = books_repo.create(&book).await.expect("should create book");
        assert_eq!(1, size);

        let loaded = books_repo.find_by_isbn(book.isbn.as_str()).await
            .expect("should find book").expect("book should exist");
        assert_eq!(book, loaded);
        assert_eq!(None, books_repo.find_by_isbn("999-999-999-9").await.expect("should find none"));
    }

    #[tokio::test]
    async fn test_should_reject_duplicate_create() {
        let books_repo = MemoryBookRepository::new();
        let book = book("123-456-789-0", "Duplicate Keys", 1);
        let _ = books_repo.create(&book).await.expect("should create book");
        assert!(books_repo.create(&book).await.is_err());
    }

    #[tokio::test]
    async fn test_should_add_copies() {
        let books_repo = MemoryBookRepository::new();
        let book = book("123-456-789-0", "Copy Counts", 1);
        let _ = books_repo.create(&book).await.expect("should create book");

        let merged = books_repo.add_copies(book.isbn.as_str(), 3).await.expect("should add copies");
        assert_eq!(4, merged.n_copies);
        assert!(books_repo.add_copies("999-999-999-9", 1).await.is_err());
    }

    #[tokio::test]
    async fn test_should_stop_checkout_at_zero_copies() {
        let books_repo = MemoryBookRepository::new();
        let book = book("123-456-789-0", "Scarce Copies", 1);
        let _ = books_repo.create(&book).await.expect("should create book");

        assert!(books_repo.checkout_copy(book.isbn.as_str()).await.expect("should checkout"));
        assert!(!books_repo.checkout_copy(book.isbn.as_str()).await.expect("should refuse"));
        assert!(!books_repo.checkout_copy("999-999-999-9").await.expect("should refuse unknown"));
        let loaded = books_repo.find_by_isbn(book.isbn.as_str()).await
            .expect("should find book").expect("book should exist");
        assert_eq!(0, loaded.n_copies);
    }

    #[tokio::test]
    async fn test_should_find_by_words_sorted_and_sliced() {
        let books_repo = MemoryBookRepository::new();
        for i in (0..6).rev() {
            let book = book(format!("10{}-456-789-0", i).as_str(),
                            format!("Gardening Almanac {}", i).as_str(), 1);
            let _ = books_repo.create(&book).await.expect("should create book");
        }
        let words = vec!["gardening".to_string(), "almanac".to_string()];
        let res = books_repo.find_by_words(&words, 0, 10).await.expect("should find books");
        assert_eq!(6, res.len());
        assert_eq!("Gardening Almanac 0", res[0].title.as_str());
        assert_eq!("Gardening Almanac 5", res[5].title.as_str());

        let res = books_repo.find_by_words(&words, 2, 2).await.expect("should find books");
        assert_eq!(2, res.len());
        assert_eq!("Gardening Almanac 2", res[0].title.as_str());
        assert_eq!("Gardening Almanac 3", res[1].title.as_str());

        let res = books_repo.find_by_words(&words, 10, 5).await.expect("should find books");
        assert!(res.is_empty());

        let words = vec!["gardening".to_string(), "unmatched".to_string()];
        let res = books_repo.find_by_words(&words, 0, 10).await.expect("should find books");
        assert!(res.is_empty());
    }

    #[tokio::test]
    async fn test_should_match_author_words() {
        let books_repo = MemoryBookRepository::new();
        let book = book("123-456-789-0", "Untitled Work", 1);
        let _ = books_repo.create(&book).await.expect("should create book");

        let words = vec!["jane".to_string(), "untitled".to_string()];
        let res = books_repo.find_by_words(&words, 0, 10).await.expect("should find books");
        assert_eq!(1, res.len());
    }

    #[tokio::test]
    async fn test_should_clear_books_and_words() {
        let books_repo = MemoryBookRepository::new();
        let book = book("123-456-789-0", "Short Lived", 1);
        let _ = books_repo.create(&book).await.expect("should create book");

        let deleted = books_repo.clear().await.expect("should clear");
        assert_eq!(1, deleted);
        assert_eq!(None, books_repo.find_by_isbn(book.isbn.as_str()).await.expect("should find none"));
        let words = vec!["short".to_string()];
        assert!(books_repo.find_by_words(&words, 0, 10).await.expect("should find none").is_empty());
    }
}
