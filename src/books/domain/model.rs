use serde::{Deserialize, Serialize};

// BookEntity abstracts a book held by the library; n_copies counts physical
// copies of the same isbn and is the only field that may change after insert.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub(crate) struct BookEntity {
    pub isbn: String,
    pub title: String,
    pub authors: Vec<String>,
    pub pages: i64,
    pub year: i64,
    pub publisher: String,
    pub n_copies: i64,
}

impl BookEntity {
    // the first immutable field on which this stored book and an incoming book
    // with the same isbn disagree, in the order title, authors, pages, year,
    // publisher; None when the two are consistent
    pub fn conflict_field(&self, other: &BookEntity) -> Option<&'static str> {
        if self.title != other.title {
            return Some("title");
        }
        if self.authors.len() != other.authors.len()
            || self.authors.iter().zip(other.authors.iter()).any(|(a, b)| a != b) {
            return Some("authors");
        }
        if self.pages != other.pages {
            return Some("pages");
        }
        if self.year != other.year {
            return Some("year");
        }
        if self.publisher != other.publisher {
            return Some("publisher");
        }
        None
    }

    // the sort key under which this book appears in the word index; lowercased
    // title first so postings order by title, isbn last to keep ties deterministic
    pub fn title_sort_key(&self) -> String {
        format!("{}#{}", self.title.to_lowercase(), self.isbn)
    }
}
