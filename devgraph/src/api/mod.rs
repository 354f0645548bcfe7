//! Typed client for the Devgraph REST API

pub mod chat;
pub mod client;
pub mod common;
pub mod discovery;
pub mod environments;
pub mod error;
pub mod mcp;
pub mod models;
pub mod oauth;

pub use client::Client;
pub use common::Nullable;
pub use error::ApiError;
