//! JSON shapes exchanged with the query backend.

use crate::message::ServerMeta;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub rag_initialized: Option<bool>,
    #[serde(default)]
    pub loaded_files_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GreetResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub has_data: bool,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub show_faqs: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub numeric_value: Option<serde_json::Value>,
    #[serde(default)]
    pub suggestions: Option<Vec<String>>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub follow_up_message: Option<String>,
    #[serde(default)]
    pub intent: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl QueryResponse {
    /// The message a structured error payload wants the visitor to see.
    ///
    /// The friendlier `answer` text wins over the terse `error` label when the
    /// server sends both.
    pub fn error_message(&self) -> Option<String> {
        let error = self.error.as_ref()?;
        Some(
            self.answer
                .as_ref()
                .filter(|a| !a.trim().is_empty())
                .unwrap_or(error)
                .clone(),
        )
    }

    pub fn server_meta(&self) -> ServerMeta {
        ServerMeta {
            numeric_value: self.numeric_value.clone().filter(|v| !v.is_null()),
            suggestions: self.suggestions.clone().unwrap_or_default(),
            follow_up_message: self.follow_up_message.clone(),
            intent: self.intent.clone(),
            timestamp: self.timestamp.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AutocompleteResponse {
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// Error body the backend sends with non-success statuses.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
}

impl ErrorBody {
    pub fn message(&self) -> Option<String> {
        self.answer
            .clone()
            .filter(|a| !a.trim().is_empty())
            .or_else(|| self.error.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files_folder_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SettingsUpdated {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub settings: Settings,
}

/// Frequently asked questions grouped by difficulty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FaqCatalog {
    #[serde(default)]
    pub basic: Vec<String>,
    #[serde(default)]
    pub intermediate: Vec<String>,
    #[serde(default)]
    pub advanced: Vec<String>,
    #[serde(default)]
    pub operational: Vec<String>,
}

impl FaqCatalog {
    pub fn all(&self) -> impl Iterator<Item = &String> {
        self.basic
            .iter()
            .chain(&self.intermediate)
            .chain(&self.advanced)
            .chain(&self.operational)
    }

    pub fn is_empty(&self) -> bool {
        self.all().next().is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub filename: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub modified: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UploadedFiles {
    #[serde(default)]
    pub files: Vec<UploadedFile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrainingData {
    #[serde(default)]
    pub training_data: BTreeMap<String, String>,
    #[serde(default)]
    pub count: usize,
}

/// Question/answer pair used for training entries and edited answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadRequest {
    pub answer: String,
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric_value: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DownloadReceipt {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub file_path: String,
    #[serde(default)]
    pub filename: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greet_tolerates_missing_fields() {
        let greet: GreetResponse = serde_json::from_str(r#"{"has_data": false}"#).unwrap();
        assert!(!greet.has_data);
        assert!(greet.suggestions.is_empty());
        assert!(greet.message.is_empty());
    }

    #[test]
    fn error_payload_prefers_answer_text() {
        let resp: QueryResponse = serde_json::from_str(
            r#"{"error": "No files loaded", "answer": "No files loaded. Please upload a file."}"#,
        )
        .unwrap();
        assert_eq!(
            resp.error_message().as_deref(),
            Some("No files loaded. Please upload a file.")
        );

        let resp: QueryResponse = serde_json::from_str(r#"{"error": "boom"}"#).unwrap();
        assert_eq!(resp.error_message().as_deref(), Some("boom"));

        let resp: QueryResponse = serde_json::from_str(r#"{"answer": "42"}"#).unwrap();
        assert_eq!(resp.error_message(), None);
    }

    #[test]
    fn null_numeric_value_is_dropped_from_meta() {
        let resp: QueryResponse =
            serde_json::from_str(r#"{"answer": "ok", "numeric_value": null}"#).unwrap();
        assert_eq!(resp.server_meta().numeric_value, None);
    }

    #[test]
    fn faq_catalog_ignores_all_key() {
        let catalog: FaqCatalog = serde_json::from_str(
            r#"{"basic": ["a"], "advanced": ["b"], "all": ["a", "b"]}"#,
        )
        .unwrap();
        let all: Vec<&String> = catalog.all().collect();
        assert_eq!(all, vec!["a", "b"]);
    }
}
