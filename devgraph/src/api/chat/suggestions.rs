//! Chat suggestion API implementation

use crate::api::{ApiError, Client};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const SUGGESTIONS_PATH: &str = "/api/v1/chat/suggestions";

#[derive(Debug, Clone, Deserialize)]
pub struct ChatSuggestion {
    pub id: Uuid,
    pub title: String,
    pub label: String,
    pub action: String,
    #[serde(default)]
    pub active: Option<bool>,
}

/// Request body for creating chat suggestions
#[derive(Debug, Serialize)]
pub struct CreateChatSuggestionRequest {
    pub title: String,
    pub label: String,
    pub action: String,
    pub active: bool,
}

/// Suggestions API for chat suggestion operations
pub struct SuggestionsApi<'a> {
    client: &'a Client,
}

impl<'a> SuggestionsApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// GET /api/v1/chat/suggestions
    pub async fn list(&self) -> Result<Vec<ChatSuggestion>, ApiError> {
        self.client.get(SUGGESTIONS_PATH).await
    }

    /// POST /api/v1/chat/suggestions
    pub async fn create(
        &self,
        request: &CreateChatSuggestionRequest,
    ) -> Result<ChatSuggestion, ApiError> {
        self.client.post(SUGGESTIONS_PATH, request).await
    }

    /// DELETE /api/v1/chat/suggestions/{id}
    pub async fn delete(&self, id: &Uuid) -> Result<(), ApiError> {
        self.client
            .delete(&format!("{}/{}", SUGGESTIONS_PATH, id))
            .await
    }

    /// Linear scan of the list endpoint
    pub async fn find(&self, id: &str) -> Result<Option<ChatSuggestion>, ApiError> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .find(|suggestion| suggestion.id.to_string() == id))
    }
}
