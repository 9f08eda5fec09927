use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::core::library::LibraryResult;
use crate::core::validation::{non_empty_string, req_authors, req_isbn, req_positive_int, req_year};

// BookDto is the boundary shape for the catalog service; requests arrive as
// loose JSON and are validated into this before any business rule runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BookDto {
    pub isbn: String,
    pub title: String,
    pub authors: Vec<String>,
    pub pages: i64,
    pub year: i64,
    pub publisher: String,
    pub n_copies: i64,
}

impl BookDto {
    // validates an add-book payload field by field; nCopies defaults to 1
    pub(crate) fn validate(req: &Value) -> LibraryResult<BookDto> {
        let isbn = req_isbn(req)?;
        let title = non_empty_string(req, "title")?;
        let authors = req_authors(req)?;
        let pages = req_positive_int(req, "pages", None)?;
        let year = req_year(req)?;
        let publisher = non_empty_string(req, "publisher")?;
        let n_copies = req_positive_int(req, "nCopies", Some(1))?;
        Ok(BookDto {
            isbn,
            title,
            authors,
            pages,
            year,
            publisher,
            n_copies,
        })
    }
}
