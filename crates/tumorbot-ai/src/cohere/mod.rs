//! Cohere chat API client.
//!
//! Implements the `AiClient` trait against the Cohere v2 Chat API
//! (https://api.cohere.com/v2/chat), authenticated with a bearer API key.

mod api;
mod client;
mod config;

pub use client::{CohereClient, COHERE_API_URL};
pub use config::CohereConfig;
