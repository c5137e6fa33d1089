use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::listings::{PropertyListing, QuickFilters};

/// Who wrote a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Author {
    User,
    Assistant,
}

/// One line of the chat transcript. Entries are immutable once appended;
/// the transcript only ever grows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// UUIDv7, so ids sort in append order
    pub id: Uuid,
    pub author: Author,
    pub text: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied_filters: Option<QuickFilters>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<PropertyListing>>,
}

impl TranscriptEntry {
    fn new(author: Author, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            author,
            text: text.into(),
            created_at: Utc::now(),
            applied_filters: None,
            properties: None,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Author::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Author::Assistant, text)
    }

    pub fn with_filters(mut self, filters: Option<QuickFilters>) -> Self {
        self.applied_filters = filters;
        self
    }

    /// Attach listings. An empty list leaves the entry without a
    /// `properties` field at all.
    pub fn with_properties(mut self, properties: Vec<PropertyListing>) -> Self {
        self.properties = (!properties.is_empty()).then_some(properties);
        self
    }

    pub fn is_user(&self) -> bool {
        self.author == Author::User
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_property_list_is_omitted() {
        let entry = TranscriptEntry::assistant("nothing found").with_properties(Vec::new());
        assert_eq!(entry.properties, None);

        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("properties").is_none());
        assert_eq!(json["author"], "assistant");
    }

    #[test]
    fn ids_are_unique_and_ordered() {
        let a = TranscriptEntry::user("first");
        let b = TranscriptEntry::user("second");
        assert_ne!(a.id, b.id);
        assert!(a.id < b.id);
    }
}
