use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::AttributeValue;

use crate::core::library::{LibraryError, LibraryResult};
use crate::patrons::domain::model::PatronEntity;
use crate::patrons::repository::PatronRepository;
use crate::utils::ddb::{parse_string_attribute, parse_string_set_attribute};

// Patron records are one item per patron_id holding a string set of isbns.
// ADD/DELETE on the set are atomic and ADD creates the item when missing,
// which is exactly the implicit-create-on-first-checkout lifecycle.
#[derive(Debug)]
pub struct DDBPatronRepository {
    client: Client,
    table_name: String,
}

impl DDBPatronRepository {
    pub(crate) fn new(client: Client, table_name: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
        }
    }
}

#[async_trait]
impl PatronRepository for DDBPatronRepository {
    async fn find_by_patron_id(&self, patron_id: &str) -> LibraryResult<Option<PatronEntity>> {
        let table_name: &str = self.table_name.as_ref();
        let resp = self.client
            .get_item()
            .table_name(table_name)
            .key("patron_id", AttributeValue::S(patron_id.to_string()))
            .consistent_read(true)
            .send()
            .await.map_err(LibraryError::from)?;
        Ok(resp.item().map(map_to_patron))
    }

    async fn add_checked_out(&self, patron_id: &str, isbn: &str) -> LibraryResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        self.client
            .update_item()
            .table_name(table_name)
            .key("patron_id", AttributeValue::S(patron_id.to_string()))
            .update_expression("ADD checked_out_isbns :isbns")
            .expression_attribute_values(":isbns", AttributeValue::Ss(vec![isbn.to_string()]))
            .send()
            .await.map(|_| 1).map_err(LibraryError::from)
    }

    async fn remove_checked_out(&self, patron_id: &str, isbn: &str) -> LibraryResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        self.client
            .update_item()
            .table_name(table_name)
            .key("patron_id", AttributeValue::S(patron_id.to_string()))
            .update_expression("DELETE checked_out_isbns :isbns")
            .expression_attribute_values(":isbns", AttributeValue::Ss(vec![isbn.to_string()]))
            .send()
            .await.map(|_| 1).map_err(LibraryError::from)
    }

    async fn clear(&self) -> LibraryResult<usize> {
        let table_name: &str = self.table_name.as_ref();
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
                if let Some(patron_id) = parse_string_attribute("patron_id", item) {
                    self.client
                        .delete_item()
                        .table_name(table_name)
                        .key("patron_id", AttributeValue::S(patron_id))
                        .send()
                        .await.map_err(LibraryError::from)?;
                    deleted += 1;
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

fn map_to_patron(map: &HashMap<String, AttributeValue>) -> PatronEntity {
    PatronEntity {
        patron_id: parse_string_attribute("patron_id", map).unwrap_or(String::from("")),
        checked_out_isbns: parse_string_set_attribute("checked_out_isbns", map),
    }
}
