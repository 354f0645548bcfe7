pub mod endpoints;

use crate::api::Client;

/// MCP API providing tool server registration
pub struct McpApi<'a> {
    client: &'a Client,
}

impl<'a> McpApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Access MCP endpoint operations
    pub fn endpoints(&self) -> endpoints::EndpointsApi<'a> {
        endpoints::EndpointsApi::new(self.client)
    }
}
