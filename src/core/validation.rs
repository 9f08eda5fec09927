use chrono::{Datelike, Utc};
use serde_json::Value;
use crate::core::library::{LibraryError, LibraryResult};

// movable type puts a floor under plausible publication years
pub(crate) const MIN_YEAR: i64 = 1448;

// required string field: absent -> MISSING, non-string -> BAD_TYPE
pub(crate) fn req_string(req: &Value, field: &str) -> LibraryResult<String> {
    match req.get(field) {
        None | Some(Value::Null) => {
            Err(LibraryError::missing(field, format!("{} is required", field).as_str()))
        }
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(LibraryError::bad_type(field, format!("{} must be a string", field).as_str())),
    }
}

pub(crate) fn non_empty_string(req: &Value, field: &str) -> LibraryResult<String> {
    let s = req_string(req, field)?;
    if s.trim().is_empty() {
        return Err(LibraryError::bad_request(
            Some(field), format!("{} must not be empty", field).as_str()));
    }
    Ok(s)
}

fn int_value(value: &Value, field: &str) -> LibraryResult<i64> {
    match value {
        Value::Number(n) => n.as_i64().ok_or_else(|| LibraryError::bad_request(
            Some(field), format!("{} must be an integer", field).as_str())),
        _ => Err(LibraryError::bad_type(field, format!("{} must be a number", field).as_str())),
    }
}

// positive integer field; a None default makes the field required
pub(crate) fn req_positive_int(req: &Value, field: &str, default: Option<i64>) -> LibraryResult<i64> {
    let n = match req.get(field) {
        None | Some(Value::Null) => {
            match default {
                Some(d) => return Ok(d),
                None => return Err(LibraryError::missing(
                    field, format!("{} is required", field).as_str())),
            }
        }
        Some(value) => int_value(value, field)?,
    };
    if n <= 0 {
        return Err(LibraryError::bad_request(
            Some(field), format!("{} must be a positive integer", field).as_str()));
    }
    Ok(n)
}

// optional non-negative integer, used for find pagination fields
pub(crate) fn opt_count(req: &Value, field: &str, default: usize) -> LibraryResult<usize> {
    match req.get(field) {
        None | Some(Value::Null) => Ok(default),
        Some(Value::Number(n)) => match n.as_u64() {
            Some(u) => Ok(u as usize),
            None => Err(LibraryError::bad_type(
                field, format!("{} must be a non-negative integer", field).as_str())),
        },
        Some(_) => Err(LibraryError::bad_type(
            field, format!("{} must be a non-negative integer", field).as_str())),
    }
}

pub(crate) fn req_year(req: &Value) -> LibraryResult<i64> {
    let value = match req.get("year") {
        None | Some(Value::Null) => return Err(LibraryError::missing("year", "year is required")),
        Some(value) => value,
    };
    let year = int_value(value, "year")?;
    let current = Utc::now().year() as i64;
    if year < MIN_YEAR || year > current {
        return Err(LibraryError::bad_request(
            Some("year"), format!("year must be in [{}, {}]", MIN_YEAR, current).as_str()));
    }
    Ok(year)
}

pub(crate) fn req_authors(req: &Value) -> LibraryResult<Vec<String>> {
    let items = match req.get("authors") {
        None | Some(Value::Null) => return Err(LibraryError::missing("authors", "authors is required")),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(LibraryError::bad_type("authors", "authors must be an array")),
    };
    if items.is_empty() {
        return Err(LibraryError::bad_request(Some("authors"), "authors must not be empty"));
    }
    let mut authors = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::String(s) if !s.trim().is_empty() => authors.push(s.clone()),
            Value::String(_) => return Err(LibraryError::bad_request(
                Some("authors"), "authors must not contain an empty author")),
            _ => return Err(LibraryError::bad_type(
                "authors", "authors must contain only strings")),
        }
    }
    Ok(authors)
}

pub(crate) fn req_isbn(req: &Value) -> LibraryResult<String> {
    let isbn = req_string(req, "isbn")?;
    if !valid_isbn(isbn.as_str()) {
        return Err(LibraryError::bad_request(
            Some("isbn"), format!("isbn {} is not in ddd-ddd-ddd-d form", isbn).as_str()));
    }
    Ok(isbn)
}

pub(crate) fn valid_isbn(isbn: &str) -> bool {
    let bytes = isbn.as_bytes();
    bytes.len() == 13 && bytes.iter().enumerate().all(|(i, b)| match i {
        3 | 7 | 11 => *b == b'-',
        _ => b.is_ascii_digit(),
    })
}

// lowercase word tokens of length two or more, where a word is a maximal run
// of word characters (letters, digits, underscore)
pub(crate) fn extract_words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| w.chars().count() >= 2)
        .map(str::to_string)
        .collect()
}
