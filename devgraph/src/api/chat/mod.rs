pub mod suggestions;

use crate::api::Client;

/// Chat API
pub struct ChatApi<'a> {
    client: &'a Client,
}

impl<'a> ChatApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Access chat suggestion operations
    pub fn suggestions(&self) -> suggestions::SuggestionsApi<'a> {
        suggestions::SuggestionsApi::new(self.client)
    }
}
