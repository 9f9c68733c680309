//! Outbound delivery to the API endpoint

mod client;

pub use client::{API_KEY_HEADER, ApiClient, ApiResponse, HttpApiClient};
