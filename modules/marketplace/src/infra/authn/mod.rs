//! HTTP client for the external authentication service.

mod http_client;

pub use http_client::HttpAuthClient;
