//! Capabilities the chat session needs from the outside world.
//!
//! The session only knows these traits; the HTTP implementation lives in the
//! CLI crate and tests plug in scripted fakes.

use async_trait::async_trait;

use crate::error::GatewayError;
use crate::listings::{AssistantReply, PropertyListing, QuickFilters};

/// Talks to the assistant (`POST /chat/message`).
#[async_trait]
pub trait AssistantGateway: Send + Sync {
    async fn send_message(
        &self,
        text: &str,
        filters: Option<&QuickFilters>,
    ) -> Result<AssistantReply, GatewayError>;
}

/// Records a saved property for a user (`POST /user/save`).
#[async_trait]
pub trait SaveGateway: Send + Sync {
    async fn save_property(&self, user_id: &str, property_id: &str) -> Result<(), GatewayError>;
}

/// Direct listing search without going through the assistant.
#[async_trait]
pub trait PropertySearchGateway: Send + Sync {
    async fn search_properties(
        &self,
        filters: &QuickFilters,
    ) -> Result<Vec<PropertyListing>, GatewayError>;
}

/// Reads back what a user has saved.
#[async_trait]
pub trait SavedPropertiesGateway: Send + Sync {
    async fn list_saved(&self, user_id: &str) -> Result<Vec<String>, GatewayError>;
}
