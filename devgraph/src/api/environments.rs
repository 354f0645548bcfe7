//! Environment API implementation
//!
//! The API has no single-environment lookup, no update and no delete.

use crate::api::{ApiError, Client};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const ENVIRONMENTS_PATH: &str = "/api/v1/environments";

#[derive(Debug, Clone, Deserialize)]
pub struct Environment {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub clerk_organization_id: String,
    pub customer_id: String,
    pub subscription_id: Uuid,
}

/// Request body for creating environments
#[derive(Debug, Serialize)]
pub struct CreateEnvironmentRequest {
    pub name: String,
    pub stripe_subscription_id: String,
    pub instance_url: String,
    pub invited_users: Vec<String>,
}

/// Environments API for environment operations
pub struct EnvironmentsApi<'a> {
    client: &'a Client,
}

impl<'a> EnvironmentsApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// GET /api/v1/environments
    pub async fn list(&self) -> Result<Vec<Environment>, ApiError> {
        self.client.get(ENVIRONMENTS_PATH).await
    }

    /// POST /api/v1/environments
    pub async fn create(&self, request: &CreateEnvironmentRequest) -> Result<Environment, ApiError> {
        self.client.post(ENVIRONMENTS_PATH, request).await
    }

    /// Linear scan of the list endpoint
    pub async fn find(&self, id: &str) -> Result<Option<Environment>, ApiError> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .find(|env| env.id.to_string() == id))
    }
}
