use std::collections::BTreeSet;
use serde::{Deserialize, Serialize};

// PatronEntity tracks which isbns a patron currently has out. The record is
// created implicitly on first checkout and never removed outside clear.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub(crate) struct PatronEntity {
    pub patron_id: String,
    pub checked_out_isbns: BTreeSet<String>,
}

impl PatronEntity {
    pub fn new(patron_id: &str) -> Self {
        Self {
            patron_id: patron_id.to_string(),
            checked_out_isbns: BTreeSet::new(),
        }
    }

    pub fn has_checked_out(&self, isbn: &str) -> bool {
        self.checked_out_isbns.contains(isbn)
    }
}
