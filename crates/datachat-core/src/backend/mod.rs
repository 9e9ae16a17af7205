//! Query backend interface.
//!
//! The engine talks to the remote data service only through [`QueryBackend`],
//! so the HTTP implementation can be swapped for a scripted one in tests.
//!
//! # Module Structure
//!
//! - `wire`: JSON request/response shapes for every backend operation

mod wire;

pub use wire::{
    AutocompleteResponse, DownloadReceipt, DownloadRequest, ErrorBody, FaqCatalog,
    GreetResponse, HealthStatus, QaPair, QueryRequest, QueryResponse, Settings,
    SettingsUpdated, TrainingData, UploadedFile, UploadedFiles,
};

use crate::error::Result;
use async_trait::async_trait;

/// An abstract client for the remote query service.
///
/// Implementations report failures through `DatachatError`:
/// - `Transport` when the service cannot be reached
/// - `Timeout` when a transport-level deadline elapses
/// - `Server` for non-success statuses (with the server's message when the
///   body carries one)
/// - `Decode` for success responses with an unexpected body
///
/// Deadlines specific to the widget (60 s for queries, 5 s for the health
/// probe) are applied by the caller, not by the implementation.
#[async_trait]
pub trait QueryBackend: Send + Sync {
    /// Connectivity probe.
    async fn health(&self) -> Result<HealthStatus>;

    /// Greeting text plus the initial suggestion list.
    async fn greet(&self) -> Result<GreetResponse>;

    /// Asks a natural-language question about the loaded data.
    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse>;

    /// Completions for a partially typed question.
    async fn autocomplete(&self, query: &str) -> Result<AutocompleteResponse>;

    /// Reads the persisted widget settings.
    async fn settings(&self) -> Result<Settings>;

    /// Replaces the persisted widget settings.
    async fn update_settings(&self, settings: &Settings) -> Result<SettingsUpdated>;

    /// The FAQ catalog.
    async fn faqs(&self) -> Result<FaqCatalog>;

    /// Data files the backend has received.
    async fn uploaded_files(&self) -> Result<UploadedFiles>;

    /// User-added training entries.
    async fn training(&self) -> Result<TrainingData>;

    /// Adds or replaces a training entry.
    async fn add_training(&self, entry: &QaPair) -> Result<()>;

    /// Persists a manually edited answer.
    async fn save_edited_answer(&self, entry: &QaPair) -> Result<()>;

    /// Asks the backend to write an answer to its download folder.
    async fn download(&self, request: &DownloadRequest) -> Result<DownloadReceipt>;
}
