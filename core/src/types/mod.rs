//! Domain DTOs for the Wintender API.
//!
//! # Design
//! Records mirror the server's JSON. Fields the dashboard reads are typed;
//! anything else lands in `extra` so a record round-trips untouched. The
//! mock-server crate defines its own copies; integration tests catch drift.

mod chat;
mod clarification;
mod entity;
mod reports;
mod settings;
mod user;

use serde::{Deserialize, Serialize};

pub use chat::{ChatMessage, ChatPrompt};
pub use clarification::{Clarification, ClarificationAnswer, ClarificationQuestion};
pub use entity::{Attachment, Entity, EntityForm};
pub use reports::{ActuatorHealth, StatisticsSummary, SystemError};
pub use settings::Settings;
pub use user::User;

/// Paged list envelope returned by every list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default)]
    pub content: Vec<T>,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub size: u32,
}

/// Acknowledgement body returned by write endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiAck<T = serde_json::Value> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Filter parameters of a list query. Together with the resource they form
/// the cache key, so every field participates in `Hash`/`Eq`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl ListParams {
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Query-string pairs in a fixed order. Empty strings are omitted.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(size) = self.size {
            pairs.push(("size", size.to_string()));
        }
        let text = [
            ("sort", &self.sort),
            ("search", &self.search),
            ("filter", &self.filter),
            ("phone", &self.phone),
        ];
        for (name, value) in text {
            if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
                pairs.push((name, v.to_string()));
            }
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_pairs_skip_unset_and_empty() {
        let params = ListParams::default().page(2).search("").phone("0911");
        assert_eq!(
            params.query_pairs(),
            vec![("page", "2".to_string()), ("phone", "0911".to_string())]
        );
    }

    #[test]
    fn envelopes_deserialize_records_without_default() {
        let page: Page<Entity> =
            serde_json::from_str(r#"{"content":[{"id":1,"name":"Abay"}],"totalElements":1}"#).unwrap();
        assert_eq!(page.content[0].name, "Abay");
        assert_eq!(page.total_elements, 1);

        let ack: ApiAck<Entity> = serde_json::from_str(r#"{"message":"ok","data":{"id":2,"name":"Tana"}}"#).unwrap();
        assert_eq!(ack.data.map(|e| e.name).as_deref(), Some("Tana"));

        let empty: ApiAck<Entity> = serde_json::from_str("{}").unwrap();
        assert!(empty.data.is_none());
    }

    #[test]
    fn page_tolerates_missing_counters() {
        let page: Page<User> = serde_json::from_str(r#"{"content":[]}"#).unwrap();
        assert!(page.content.is_empty());
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn ack_without_data() {
        let ack: ApiAck = serde_json::from_str(r#"{"message":"Saved"}"#).unwrap();
        assert_eq!(ack.message.as_deref(), Some("Saved"));
        assert!(ack.data.is_none());
    }
}
