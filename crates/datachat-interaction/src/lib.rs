//! Remote interaction layer: the HTTP client for the query backend.

pub mod http_backend;

pub use http_backend::HttpQueryBackend;
