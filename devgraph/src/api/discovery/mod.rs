pub mod providers;

use crate::api::Client;

/// Discovery API for configured source providers
pub struct DiscoveryApi<'a> {
    client: &'a Client,
}

impl<'a> DiscoveryApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Access discovery provider operations
    pub fn providers(&self) -> providers::ProvidersApi<'a> {
        providers::ProvidersApi::new(self.client)
    }
}
