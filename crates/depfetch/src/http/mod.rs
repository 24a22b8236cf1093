//! HTTP client used to fetch artifacts.

mod client;

pub use client::HttpClient;
pub(crate) use client::resolve_destination;
