pub mod services;

use crate::api::Client;

/// OAuth API
pub struct OAuthApi<'a> {
    client: &'a Client,
}

impl<'a> OAuthApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Access OAuth service operations
    pub fn services(&self) -> services::ServicesApi<'a> {
        services::ServicesApi::new(self.client)
    }
}
