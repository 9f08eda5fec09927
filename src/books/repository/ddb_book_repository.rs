use std::collections::{BTreeSet, HashMap, HashSet};

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};

use crate::books::domain::model::BookEntity;
use crate::books::repository::BookRepository;
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::validation::extract_words;
use crate::utils::ddb::{is_condition_failure, parse_item, parse_number_attribute, parse_string_attribute, parse_string_list_attribute};

// Books live in a table keyed by isbn; the word index lives in a second table
// keyed by word with a lowercased title + isbn range key, so postings for a
// word come back in title order and the slice never leaves the store layer.
#[derive(Debug)]
pub struct DDBBookRepository {
    client: Client,
    table_name: String,
    words_table_name: String,
}

impl DDBBookRepository {
    pub(crate) fn new(client: Client, table_name: &str, words_table_name: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
            words_table_name: words_table_name.to_string(),
        }
    }

    // all postings for one word, ascending by the title_isbn range key
    async fn query_postings(&self, word: &str) -> LibraryResult<Vec<(String, String)>> {
        let words_table_name: &str = self.words_table_name.as_ref();
        let mut postings: Vec<(String, String)> = Vec::new();
        let mut start_key: Option<HashMap<String, AttributeValue>> = None;
        loop {
            let resp = self.client
                .query()
                .table_name(words_table_name)
                .key_condition_expression("#w = :word")
                .expression_attribute_names("#w", "word")
                .expression_attribute_values(":word", AttributeValue::S(word.to_string()))
                .set_exclusive_start_key(start_key)
                .send()
                .await.map_err(LibraryError::from)?;
            let def_items = vec![];
            let items = resp.items.as_ref().unwrap_or(&def_items);
            for item in items {
                if let (Some(sort_key), Some(isbn)) = (
                    parse_string_attribute("title_isbn", item),
                    parse_string_attribute("isbn", item)) {
                    postings.push((sort_key, isbn));
                }
            }
            match resp.last_evaluated_key() {
                Some(key) => start_key = Some(key.clone()),
                None => return Ok(postings),
            }
        }
    }

    async fn delete_book_item(&self, isbn: &str) -> LibraryResult<()> {
        let table_name: &str = self.table_name.as_ref();
        self.client
            .delete_item()
            .table_name(table_name)
            .key("isbn", AttributeValue::S(isbn.to_string()))
            .send()
            .await.map(|_| ()).map_err(LibraryError::from)
    }

    async fn delete_posting_item(&self, word: &str, title_isbn: &str) -> LibraryResult<()> {
        let words_table_name: &str = self.words_table_name.as_ref();
        self.client
            .delete_item()
            .table_name(words_table_name)
            .key("word", AttributeValue::S(word.to_string()))
            .key("title_isbn", AttributeValue::S(title_isbn.to_string()))
            .send()
            .await.map(|_| ()).map_err(LibraryError::from)
    }
}

#[async_trait]
impl BookRepository for DDBBookRepository {
    async fn create(&self, book: &BookEntity) -> LibraryResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        let words_table_name: &str = self.words_table_name.as_ref();
        let val = serde_json::to_value(book)?;
        self.client
            .put_item()
            .table_name(table_name)
            .condition_expression("attribute_not_exists(isbn)")
            .set_item(Some(parse_item(val)?))
            .send()
            .await.map_err(LibraryError::from)?;
        // postings are written after the book item; a book is findable by isbn
        // before its words are all indexed
        for word in indexed_words(book) {
            self.client
                .put_item()
                .table_name(words_table_name)
                .item("word", AttributeValue::S(word))
                .item("title_isbn", AttributeValue::S(book.title_sort_key()))
                .item("isbn", AttributeValue::S(book.isbn.to_string()))
                .send()
                .await.map_err(LibraryError::from)?;
        }
        Ok(1)
    }

    async fn find_by_isbn(&self, isbn: &str) -> LibraryResult<Option<BookEntity>> {
        let table_name: &str = self.table_name.as_ref();
        let resp = self.client
            .get_item()
            .table_name(table_name)
            .key("isbn", AttributeValue::S(isbn.to_string()))
            .consistent_read(true)
            .send()
            .await.map_err(LibraryError::from)?;
        Ok(resp.item().map(map_to_book))
    }

    async fn add_copies(&self, isbn: &str, delta: i64) -> LibraryResult<BookEntity> {
        let table_name: &str = self.table_name.as_ref();
        let resp = self.client
            .update_item()
            .table_name(table_name)
            .key("isbn", AttributeValue::S(isbn.to_string()))
            .update_expression("ADD n_copies :delta")
            .expression_attribute_values(":delta", AttributeValue::N(delta.to_string()))
            .condition_expression("attribute_exists(isbn)")
            .return_values(ReturnValue::AllNew)
            .send()
            .await.map_err(LibraryError::from)?;
        match resp.attributes() {
            Some(map) => Ok(map_to_book(map)),
            None => Err(LibraryError::database(
                format!("no attributes returned for {}", isbn).as_str(), None, false)),
        }
    }

    async fn checkout_copy(&self, isbn: &str) -> LibraryResult<bool> {
        let table_name: &str = self.table_name.as_ref();
        let res = self.client
            .update_item()
            .table_name(table_name)
            .key("isbn", AttributeValue::S(isbn.to_string()))
            .update_expression("ADD n_copies :minus_one")
            .expression_attribute_values(":minus_one", AttributeValue::N("-1".to_string()))
            .expression_attribute_values(":zero", AttributeValue::N("0".to_string()))
            .condition_expression("attribute_exists(isbn) AND n_copies > :zero")
            .send()
            .await;
        match res {
            Ok(_) => Ok(true),
            Err(err) => {
                if is_condition_failure(&err) {
                    return Ok(false);
                }
                Err(LibraryError::from(err))
            }
        }
    }

    async fn find_by_words(&self, words: &[String],
                           index: usize, count: usize) -> LibraryResult<Vec<BookEntity>> {
        let mut iter = words.iter();
        let first = match iter.next() {
            Some(word) => word,
            None => return Ok(Vec::new()),
        };
        let mut ordered = self.query_postings(first.as_str()).await?;
        for word in iter {
            let matched: HashSet<String> = self.query_postings(word.as_str()).await?
                .into_iter().map(|(sort_key, _)| sort_key).collect();
            ordered.retain(|(sort_key, _)| matched.contains(sort_key));
            if ordered.is_empty() {
                return Ok(Vec::new());
            }
        }
        let mut records = Vec::new();
        for (_, isbn) in ordered.into_iter().skip(index).take(count) {
            if let Some(book) = self.find_by_isbn(isbn.as_str()).await? {
                records.push(book);
            }
        }
        Ok(records)
    }

    async fn clear(&self) -> LibraryResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        let words_table_name: &str = self.words_table_name.as_ref();
        let mut deleted = 0;
        let mut start_key: Option<HashMap<String, AttributeValue>> = None;
        loop {
            let resp = self.client
                .scan()
                .table_name(table_name)
                .set_exclusive_start_key(start_key)
                .send()
                .await.map_err(LibraryError::from)?;
            let def_items = vec![];
            let items = resp.items.as_ref().unwrap_or(&def_items);
            for item in items {
                if let Some(isbn) = parse_string_attribute("isbn", item) {
                    self.delete_book_item(isbn.as_str()).await?;
                    deleted += 1;
                }
            }
            match resp.last_evaluated_key() {
                Some(key) => start_key = Some(key.clone()),
                None => break,
            }
        }
        let mut start_key: Option<HashMap<String, AttributeValue>> = None;
        loop {
            let resp = self.client
                .scan()
                .table_name(words_table_name)
                .set_exclusive_start_key(start_key)
                .send()
                .await.map_err(LibraryError::from)?;
            let def_items = vec![];
            let items = resp.items.as_ref().unwrap_or(&def_items);
            for item in items {
                if let (Some(word), Some(title_isbn)) = (
                    parse_string_attribute("word", item),
                    parse_string_attribute("title_isbn", item)) {
                    self.delete_posting_item(word.as_str(), title_isbn.as_str()).await?;
                }
            }
            match resp.last_evaluated_key() {
                Some(key) => start_key = Some(key.clone()),
                None => break,
            }
        }
        Ok(deleted)
    }
}

// distinct indexable words from title and authors
pub(crate) fn indexed_words(book: &BookEntity) -> BTreeSet<String> {
    let mut words: BTreeSet<String> = extract_words(book.title.as_str()).into_iter().collect();
    for author in &book.authors {
        words.extend(extract_words(author.as_str()));
    }
    words
}

fn map_to_book(map: &HashMap<String, AttributeValue>) -> BookEntity {
    BookEntity {
        isbn: parse_string_attribute("isbn", map).unwrap_or(String::from("")),
        title: parse_string_attribute("title", map).unwrap_or(String::from("")),
        authors: parse_string_list_attribute("authors", map),
        pages: parse_number_attribute("pages", map),
        year: parse_number_attribute("year", map),
        publisher: parse_string_attribute("publisher", map).unwrap_or(String::from("")),
        n_copies: parse_number_attribute("n_copies", map),
    }
}
