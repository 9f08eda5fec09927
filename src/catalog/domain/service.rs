use async_trait::async_trait;
use serde_json::Value;
use crate::books::domain::model::BookEntity;
use crate::books::dto::BookDto;
use crate::books::repository::BookRepository;
use crate::catalog::domain::CatalogService;
use crate::core::domain::Configuration;
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::validation::{extract_words, opt_count, req_string};

pub(crate) struct CatalogServiceImpl {
    default_find_count: usize,
    book_repository: Box<dyn BookRepository>,
}

impl CatalogServiceImpl {
    pub(crate) fn new(config: &Configuration, book_repository: Box<dyn BookRepository>) -> Self {
        Self {
            default_find_count: config.default_find_count,
            book_repository,
        }
    }
}

#[async_trait]
impl CatalogService for CatalogServiceImpl {
    // Adds copies of a book. A payload matching an already stored isbn on all
    // immutable fields merges into it by bumping n_copies; a mismatch on any
    // immutable field is rejected naming the first conflicting field.
    async fn add_book(&self, req: &Value) -> LibraryResult<BookDto> {
        let book = BookDto::validate(req)?;
        if let Some(existing) = self.book_repository.find_by_isbn(book.isbn.as_str()).await? {
            if let Some(field) = existing.conflict_field(&BookEntity::from(&book)) {
                return Err(LibraryError::bad_request(
                    Some(field), format!("book conflict in field {}", field).as_str()));
            }
            let merged = self.book_repository.add_copies(book.isbn.as_str(), book.n_copies).await?;
            return Ok(BookDto::from(&merged));
        }
        let entity = BookEntity::from(&book);
        self.book_repository.create(&entity).await?;
        Ok(book)
    }

    // AND-of-words search over title and authors; the repository sorts by
    // title and slices to [index, index + count) before returning.
    async fn find_books(&self, req: &Value) -> LibraryResult<Vec<BookDto>> {
        let search = req_string(req, "search")?;
        let words = extract_words(search.as_str());
        if words.is_empty() {
            return Err(LibraryError::bad_request(Some("search"), "no valid words in search"));
        }
        let index = opt_count(req, "index", 0)?;
        let count = opt_count(req, "count", self.default_find_count)?;
        let records = self.book_repository.find_by_words(&words, index, count).await?;
        Ok(records.iter().map(BookDto::from).collect())
    }

    async fn clear(&self) -> LibraryResult<()> {
        self.book_repository.clear().await.map(|_| ())
    }
}

impl From<&BookEntity> for BookDto {
    fn from(other: &BookEntity) -> Self {
        Self {
            isbn: other.isbn.to_string(),
            title: other.title.to_string(),
            authors: other.authors.clone(),
            pages: other.pages,
            year: other.year,
            publisher: other.publisher.to_string(),
            n_copies: other.n_copies,
        }
    }
}

impl From<&BookDto> for BookEntity {
    fn from(other: &BookDto) -> Self {
        Self {
            isbn: other.isbn.to_string(),
            title: other.title.to_string(),
            authors: other.authors.clone(),
            pages: other.pages,
            year: other.year,
            publisher: other.publisher.to_string(),
            n_copies: other.n_copies,
        }
    }
}
