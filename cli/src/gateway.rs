use async_trait::async_trait;
use mira_core::error::GatewayError;
use mira_core::gateway::{
    AssistantGateway, PropertySearchGateway, SaveGateway, SavedPropertiesGateway,
};
use mira_core::listings::{
    AssistantReply, ChatMessageRequest, PropertyListing, PropertySearchResponse, QuickFilters,
    SavePropertyRequest, SavedPropertiesResponse,
};
use mira_core::ClientConfig;
use serde::de::DeserializeOwned;

/// reqwest-backed implementation of every backend capability.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpGateway {
    pub fn new(config: ClientConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(transport)?;
        Ok(Self { client, config })
    }

    /// Probe the backend root (`GET /`).
    pub async fn health(&self) -> Result<serde_json::Value, GatewayError> {
        let resp = self
            .client
            .get(self.config.endpoint("/"))
            .send()
            .await
            .map_err(transport)?;
        read_json(resp).await
    }
}

fn transport(err: reqwest::Error) -> GatewayError {
    GatewayError::Transport(err.to_string())
}

async fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response, GatewayError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(GatewayError::Status {
        status: status.as_u16(),
        body,
    })
}

async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, GatewayError> {
    ensure_success(resp)
        .await?
        .json::<T>()
        .await
        .map_err(|e| GatewayError::Decode(e.to_string()))
}

#[async_trait]
impl AssistantGateway for HttpGateway {
    async fn send_message(
        &self,
        text: &str,
        filters: Option<&QuickFilters>,
    ) -> Result<AssistantReply, GatewayError> {
        let body = ChatMessageRequest {
            message: text,
            filters,
        };
        let resp = self
            .client
            .post(self.config.endpoint("/chat/message"))
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        read_json(resp).await
    }
}

#[async_trait]
impl SaveGateway for HttpGateway {
    async fn save_property(&self, user_id: &str, property_id: &str) -> Result<(), GatewayError> {
        let body = SavePropertyRequest {
            user_id,
            property_id,
        };
        let resp = self
            .client
            .post(self.config.endpoint("/user/save"))
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        ensure_success(resp).await.map(|_| ())
    }
}

#[async_trait]
impl PropertySearchGateway for HttpGateway {
    async fn search_properties(
        &self,
        filters: &QuickFilters,
    ) -> Result<Vec<PropertyListing>, GatewayError> {
        let resp = self
            .client
            .get(self.config.endpoint("/properties"))
            .query(&filters.query_pairs())
            .send()
            .await
            .map_err(transport)?;
        read_json::<PropertySearchResponse>(resp)
            .await
            .map(PropertySearchResponse::into_properties)
    }
}

#[async_trait]
impl SavedPropertiesGateway for HttpGateway {
    async fn list_saved(&self, user_id: &str) -> Result<Vec<String>, GatewayError> {
        let mut url = self.config.endpoint("/user/saved");
        url.path_segments_mut()
            .map_err(|_| GatewayError::Transport("base URL cannot carry a path".to_string()))?
            .push(user_id);
        let resp = self.client.get(url).send().await.map_err(transport)?;
        read_json::<SavedPropertiesResponse>(resp)
            .await
            .map(|saved| saved.property_ids())
    }
}
