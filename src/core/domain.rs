use serde::{Deserialize, Serialize};

// Configuration abstracts config options for the lending library
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub(crate) struct Configuration {
    pub books_table: String,
    pub book_words_table: String,
    pub patrons_table: String,
    pub default_find_count: usize,
}

impl Configuration {
    pub fn new() -> Self {
        Configuration {
            books_table: "books".to_string(),
            book_words_table: "book_words".to_string(),
            patrons_table: "patrons".to_string(),
            default_find_count: 5,
        }
    }
}
