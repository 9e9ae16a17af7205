//! In-memory backend with scripted responses for application tests.

#![allow(dead_code)]

use async_trait::async_trait;
use datachat_core::backend::{
    AutocompleteResponse, DownloadReceipt, DownloadRequest, FaqCatalog, GreetResponse,
    HealthStatus, QaPair, QueryBackend, QueryRequest, QueryResponse, Settings, SettingsUpdated,
    TrainingData, UploadedFiles,
};
use datachat_core::{DatachatError, Result};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

pub const GREETING: &str = "Hello! Ask me anything about your shipments.";

pub fn greeting_suggestions() -> Vec<String> {
    vec![
        "How many records are present in the file?".to_string(),
        "Which columns have missing values?".to_string(),
        "What is the total weight of all shipments?".to_string(),
    ]
}

/// How the backend answers `query`.
#[derive(Clone)]
pub enum QueryScript {
    Respond(QueryResponse),
    RespondAfter(Duration, QueryResponse),
    Fail(DatachatError),
    /// Never answers.
    Hang,
}

/// How the backend answers one `autocomplete` query.
#[derive(Clone)]
pub struct AutocompleteScript {
    pub delay: Duration,
    pub result: Result<AutocompleteResponse>,
}

pub struct Script {
    pub health: Result<HealthStatus>,
    pub health_delay: Duration,
    pub greet: Result<GreetResponse>,
    pub settings: Result<Settings>,
    pub query: QueryScript,
    pub autocomplete: HashMap<String, AutocompleteScript>,
    pub faqs: Result<FaqCatalog>,
    pub save_edited: Result<()>,
    pub download: Result<DownloadReceipt>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            health: Ok(HealthStatus {
                status: "healthy".into(),
                rag_initialized: Some(true),
                loaded_files_count: Some(1),
            }),
            health_delay: Duration::ZERO,
            greet: Ok(GreetResponse {
                message: GREETING.into(),
                has_data: true,
                suggestions: greeting_suggestions(),
                show_faqs: Some(true),
            }),
            settings: Ok(Settings {
                download_path: Some("/tmp/downloads".into()),
                files_folder_path: Some("/tmp/files".into()),
            }),
            query: QueryScript::Respond(QueryResponse {
                answer: Some("42".into()),
                ..Default::default()
            }),
            autocomplete: HashMap::new(),
            faqs: Err(DatachatError::transport("faqs unavailable")),
            save_edited: Ok(()),
            download: Ok(DownloadReceipt {
                message: "Answer downloaded successfully".into(),
                file_path: "/tmp/downloads/answer.txt".into(),
                filename: "answer.txt".into(),
            }),
        }
    }
}

#[derive(Default)]
pub struct ScriptedBackend {
    pub script: Mutex<Script>,
    pub autocomplete_calls: Mutex<Vec<String>>,
    pub queries: Mutex<Vec<String>>,
    pub saved_edits: Mutex<Vec<QaPair>>,
    pub training: Mutex<Vec<QaPair>>,
    pub downloads: Mutex<Vec<DownloadRequest>>,
}

impl ScriptedBackend {
    pub fn new(script: Script) -> Self {
        Self {
            script: Mutex::new(script),
            ..Default::default()
        }
    }

    pub fn autocomplete_calls(&self) -> Vec<String> {
        self.autocomplete_calls.lock().unwrap().clone()
    }
}

pub fn suggestions(items: &[&str]) -> AutocompleteScript {
    AutocompleteScript {
        delay: Duration::ZERO,
        result: Ok(AutocompleteResponse {
            suggestions: items.iter().map(|s| s.to_string()).collect(),
        }),
    }
}

pub fn failing(err: DatachatError) -> AutocompleteScript {
    AutocompleteScript {
        delay: Duration::ZERO,
        result: Err(err),
    }
}

#[async_trait]
impl QueryBackend for ScriptedBackend {
    async fn health(&self) -> Result<HealthStatus> {
        let (delay, result) = {
            let script = self.script.lock().unwrap();
            (script.health_delay, script.health.clone())
        };
        tokio::time::sleep(delay).await;
        result
    }

    async fn greet(&self) -> Result<GreetResponse> {
        self.script.lock().unwrap().greet.clone()
    }

    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse> {
        self.queries.lock().unwrap().push(request.query.clone());
        let script = self.script.lock().unwrap().query.clone();
        match script {
            QueryScript::Respond(response) => Ok(response),
            QueryScript::RespondAfter(delay, response) => {
                tokio::time::sleep(delay).await;
                Ok(response)
            }
            QueryScript::Fail(err) => Err(err),
            QueryScript::Hang => std::future::pending().await,
        }
    }

    async fn autocomplete(&self, query: &str) -> Result<AutocompleteResponse> {
        self.autocomplete_calls.lock().unwrap().push(query.to_string());
        let scripted = self.script.lock().unwrap().autocomplete.get(query).cloned();
        match scripted {
            Some(AutocompleteScript { delay, result }) => {
                tokio::time::sleep(delay).await;
                result
            }
            None => Ok(AutocompleteResponse::default()),
        }
    }

    async fn settings(&self) -> Result<Settings> {
        self.script.lock().unwrap().settings.clone()
    }

    async fn update_settings(&self, settings: &Settings) -> Result<SettingsUpdated> {
        Ok(SettingsUpdated {
            message: "Settings updated".into(),
            settings: settings.clone(),
        })
    }

    async fn faqs(&self) -> Result<FaqCatalog> {
        self.script.lock().unwrap().faqs.clone()
    }

    async fn uploaded_files(&self) -> Result<UploadedFiles> {
        Ok(UploadedFiles::default())
    }

    async fn training(&self) -> Result<TrainingData> {
        let entries = self.training.lock().unwrap();
        Ok(TrainingData {
            training_data: entries
                .iter()
                .map(|e| (e.question.clone(), e.answer.clone()))
                .collect(),
            count: entries.len(),
        })
    }

    async fn add_training(&self, entry: &QaPair) -> Result<()> {
        self.training.lock().unwrap().push(entry.clone());
        Ok(())
    }

    async fn save_edited_answer(&self, entry: &QaPair) -> Result<()> {
        self.saved_edits.lock().unwrap().push(entry.clone());
        self.script.lock().unwrap().save_edited.clone()
    }

    async fn download(&self, request: &DownloadRequest) -> Result<DownloadReceipt> {
        self.downloads.lock().unwrap().push(request.clone());
        self.script.lock().unwrap().download.clone()
    }
}
