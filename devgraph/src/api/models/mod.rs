pub mod model;
pub mod providers;

use crate::api::Client;

/// Models API covering model providers and the models they serve
pub struct ModelsApi<'a> {
    client: &'a Client,
}

impl<'a> ModelsApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Access model provider operations
    pub fn providers(&self) -> providers::ProvidersApi<'a> {
        providers::ProvidersApi::new(self.client)
    }

    /// Access model operations
    pub fn models(&self) -> model::ModelApi<'a> {
        model::ModelApi::new(self.client)
    }
}
