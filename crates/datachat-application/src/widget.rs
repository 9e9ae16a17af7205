//! ChatWidget - the event loop that drives the engine.
//!
//! The widget owns every piece of mutable state: the help-surface
//! coordinator, the conversation, and the named timers. Timers and network
//! calls run as tokio tasks that report back through one unbounded channel,
//! and all state changes happen in [`ChatWidget::handle_event`] on the
//! caller's task. Nothing is shared across threads.

use crate::bootstrap::{BootstrapReport, Bootstrapper};
use crate::resolver::SuggestionResolver;
use crate::session::{ConversationController, Delivery, QueryOutcome, QueryTicket, run_query};
use datachat_core::backend::{
    DownloadReceipt, FaqCatalog, QaPair, QueryBackend, Settings, SettingsUpdated, TrainingData,
    UploadedFiles,
};
use datachat_core::suggestion::builtin_faq_catalog;
use datachat_core::surface::Transition;
use datachat_core::timer::{TimerFired, TimerManager};
use datachat_core::{
    DatachatError, HelpSurfaceCoordinator, Message, NavKey, Result, SurfaceEffect, WidgetConfig,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Everything that can wake the widget up.
#[derive(Debug)]
pub enum WidgetEvent {
    Timer(TimerFired),
    AutocompleteResolved { request_id: u64, items: Vec<String> },
    QueryFinished { ticket: QueryTicket, outcome: QueryOutcome },
}

impl From<TimerFired> for WidgetEvent {
    fn from(fired: TimerFired) -> Self {
        WidgetEvent::Timer(fired)
    }
}

/// Result of a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The key acted on a help surface.
    Consumed,
    /// Enter without a highlighted completion sent the current input.
    Sent(QueryTicket),
    /// Nothing to do.
    Ignored,
}

pub struct ChatWidget {
    config: WidgetConfig,
    backend: Arc<dyn QueryBackend>,
    resolver: Arc<SuggestionResolver>,
    coordinator: HelpSurfaceCoordinator,
    conversation: ConversationController,
    timers: TimerManager<WidgetEvent>,
    tx: UnboundedSender<WidgetEvent>,
    rx: UnboundedReceiver<WidgetEvent>,
    shutdown: CancellationToken,
    pending_queries: usize,
    pending_resolutions: usize,
    settings: Option<Settings>,
    faqs: Option<FaqCatalog>,
    show_faqs: bool,
}

impl ChatWidget {
    pub fn new(backend: Arc<dyn QueryBackend>, config: WidgetConfig) -> Self {
        Self::with_messages(backend, config, Vec::new())
    }

    /// Creates a widget whose conversation starts from `messages`.
    /// Seed/test messages among them are purged by [`ChatWidget::start`].
    pub fn with_messages(
        backend: Arc<dyn QueryBackend>,
        config: WidgetConfig,
        messages: Vec<Message>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            coordinator: HelpSurfaceCoordinator::new(config.timings(), config.stale_autocomplete),
            resolver: Arc::new(SuggestionResolver::new(backend.clone())),
            conversation: ConversationController::with_messages(messages),
            timers: TimerManager::new(tx.clone()),
            tx,
            rx,
            backend,
            config,
            shutdown: CancellationToken::new(),
            pending_queries: 0,
            pending_resolutions: 0,
            settings: None,
            faqs: None,
            show_faqs: true,
        }
    }

    // ============================================================================
    // Accessors
    // ============================================================================

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn coordinator(&self) -> &HelpSurfaceCoordinator {
        &self.coordinator
    }

    pub fn conversation(&self) -> &ConversationController {
        &self.conversation
    }

    pub fn messages(&self) -> &[Message] {
        self.conversation.messages()
    }

    pub fn settings(&self) -> Option<&Settings> {
        self.settings.as_ref()
    }

    pub fn show_faqs(&self) -> bool {
        self.show_faqs
    }

    /// True while a timer is armed or a network task has not reported back.
    pub fn is_busy(&self) -> bool {
        self.timers.has_pending() || self.pending_queries > 0 || self.pending_resolutions > 0
    }

    // ============================================================================
    // Startup
    // ============================================================================

    /// Purges seed messages, runs the bootstrap sequence, appends the
    /// greeting and seeds the suggestion chips.
    pub async fn start(&mut self) -> BootstrapReport {
        self.conversation.purge_seed_messages();

        let report = Bootstrapper::new(self.backend.clone(), self.config.health_timeout())
            .run()
            .await;

        self.settings = report.settings.clone();
        self.show_faqs = report.show_faqs;
        self.conversation.push_assistant(report.greeting.clone());
        let t = self.coordinator.seed_suggestions(report.suggestions.clone());
        self.apply(t);
        report
    }

    // ============================================================================
    // Visitor actions
    // ============================================================================

    /// The input text changed.
    pub fn input(&mut self, value: &str) {
        let t = self.coordinator.on_input(value);
        self.apply(t);
    }

    pub fn key(&mut self, key: NavKey) -> KeyOutcome {
        if let Some(t) = self.coordinator.on_key(key) {
            self.apply(t);
            return KeyOutcome::Consumed;
        }
        if key == NavKey::Enter {
            return self.submit().map_or(KeyOutcome::Ignored, KeyOutcome::Sent);
        }
        KeyOutcome::Ignored
    }

    /// Picks a visible suggestion chip. Returns the text placed into the input.
    pub fn click_chip(&mut self, index: usize) -> Option<String> {
        let t = self.coordinator.select_chip(index)?;
        self.apply(t)
    }

    /// Picks a visible autocomplete item. Returns the text placed into the input.
    pub fn click_autocomplete(&mut self, index: usize) -> Option<String> {
        let t = self.coordinator.select_autocomplete(index)?;
        self.apply(t)
    }

    pub fn click_faq(&mut self, question: &str) -> Option<String> {
        let t = self.coordinator.select_faq(question);
        self.apply(t)
    }

    /// Sends the current input. Returns `None` when the input is blank.
    pub fn submit(&mut self) -> Option<QueryTicket> {
        let ticket = self.conversation.begin_send(self.coordinator.input())?;
        let t = self.coordinator.on_message_sent();
        self.apply(t);

        tracing::debug!(query = %ticket.query, "query sent");
        self.pending_queries += 1;
        let tx = self.tx.clone();
        let backend = self.backend.clone();
        let deadline = self.config.query_timeout();
        let cancel = self.shutdown.child_token();
        let task_ticket = ticket.clone();
        tokio::spawn(async move {
            let outcome = run_query(backend, task_ticket.query.clone(), deadline, cancel).await;
            let _ = tx.send(WidgetEvent::QueryFinished {
                ticket: task_ticket,
                outcome,
            });
        });

        Some(ticket)
    }

    /// Types `text` into the input and sends it.
    pub fn send_text(&mut self, text: &str) -> Option<QueryTicket> {
        self.input(text);
        self.submit()
    }

    pub fn minimize(&mut self) {
        let t = self.coordinator.minimize();
        self.apply(t);
    }

    pub fn restore(&mut self) {
        let t = self.coordinator.restore();
        self.apply(t);
    }

    pub fn toggle_fullscreen(&mut self) -> bool {
        self.coordinator.toggle_fullscreen()
    }

    pub fn open_settings(&mut self) {
        self.coordinator.open_settings();
    }

    pub fn close_settings(&mut self) {
        self.coordinator.close_settings();
    }

    // ============================================================================
    // Backend-backed operations
    // ============================================================================

    /// Loads the FAQ catalog, falling back to the built-in one.
    pub async fn load_faqs(&mut self) -> &FaqCatalog {
        let catalog = match self.backend.faqs().await {
            Ok(catalog) if !catalog.is_empty() => catalog,
            Ok(_) => {
                tracing::warn!("FAQ catalog is empty, using built-in catalog");
                builtin_faq_catalog()
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load FAQs, using built-in catalog");
                builtin_faq_catalog()
            }
        };
        self.faqs.insert(catalog)
    }

    pub async fn update_settings(&mut self, settings: Settings) -> Result<SettingsUpdated> {
        let updated = self.backend.update_settings(&settings).await?;
        tracing::info!("[Settings] {}", updated.message);
        self.settings = Some(updated.settings.clone());
        Ok(updated)
    }

    pub async fn uploaded_files(&self) -> Result<UploadedFiles> {
        self.backend.uploaded_files().await
    }

    pub async fn training(&self) -> Result<TrainingData> {
        self.backend.training().await
    }

    /// Teaches the backend a fixed answer for `question`.
    pub async fn add_training(&self, question: &str, answer: &str) -> Result<()> {
        let entry = QaPair {
            question: question.trim().to_string(),
            answer: answer.trim().to_string(),
        };
        if entry.question.is_empty() || entry.answer.is_empty() {
            return Err(DatachatError::internal(
                "Training entries need both a question and an answer",
            ));
        }
        self.backend.add_training(&entry).await
    }

    /// Edits an assistant answer in place and persists the edit.
    ///
    /// A persistence failure is logged; the local edit stands.
    pub async fn edit_answer(&mut self, message_id: Uuid, new_text: &str) -> Result<()> {
        let pair = self.conversation.edit_answer(message_id, new_text)?;
        if let Err(e) = self.backend.save_edited_answer(&pair).await {
            tracing::warn!(%message_id, error = %e, "failed to persist edited answer");
        }
        Ok(())
    }

    pub async fn download_answer(
        &self,
        message_id: Uuid,
        filename: Option<String>,
    ) -> Result<DownloadReceipt> {
        let request = self.conversation.download_request(message_id, filename)?;
        let receipt = self.backend.download(&request).await?;
        tracing::info!("[Download] Saved answer to {}", receipt.file_path);
        Ok(receipt)
    }

    // ============================================================================
    // Event loop
    // ============================================================================

    /// Waits for the next event. Never returns `None` while the widget lives.
    pub async fn next_event(&mut self) -> Option<WidgetEvent> {
        self.rx.recv().await
    }

    pub fn handle_event(&mut self, event: WidgetEvent) {
        match event {
            WidgetEvent::Timer(fired) => {
                if self.timers.accept(fired) {
                    let t = self.coordinator.on_timer(fired.name);
                    self.apply(t);
                }
            }
            WidgetEvent::AutocompleteResolved { request_id, items } => {
                self.pending_resolutions = self.pending_resolutions.saturating_sub(1);
                let t = self.coordinator.on_autocomplete_resolved(request_id, items);
                self.apply(t);
            }
            WidgetEvent::QueryFinished { ticket, outcome } => {
                self.pending_queries = self.pending_queries.saturating_sub(1);
                match self.conversation.complete(&ticket, outcome) {
                    Delivery::Answered { suggestions, .. } => {
                        let t = self.coordinator.adopt_server_suggestions(suggestions);
                        self.apply(t);
                    }
                    Delivery::Failed { failure, .. } => {
                        tracing::debug!(query = %ticket.query, ?failure, "query failed");
                    }
                    Delivery::Cancelled => {}
                }
            }
        }
    }

    /// Processes events until no timer is armed and no task is outstanding.
    pub async fn settle(&mut self) {
        while self.is_busy() {
            match self.rx.recv().await {
                Some(event) => self.handle_event(event),
                None => break,
            }
        }
    }

    /// Processes events for `duration`, then returns.
    pub async fn process_for(&mut self, duration: Duration) {
        let deadline = tokio::time::Instant::now() + duration;
        loop {
            tokio::select! {
                event = self.rx.recv() => match event {
                    Some(event) => self.handle_event(event),
                    None => break,
                },
                _ = tokio::time::sleep_until(deadline) => break,
            }
        }
    }

    /// Cancels in-flight queries and disarms all timers.
    pub fn shutdown(&mut self) {
        self.shutdown.cancel();
        self.timers.cancel_all();
        self.pending_resolutions = 0;
        tracing::info!("[Widget] Shut down");
    }

    // ============================================================================
    // Effects
    // ============================================================================

    fn apply(&mut self, transition: Transition) -> Option<String> {
        for effect in transition.effects {
            match effect {
                SurfaceEffect::Schedule { timer, delay } => self.timers.schedule(timer, delay),
                SurfaceEffect::Cancel(timer) => self.timers.cancel(timer),
                SurfaceEffect::ResolveAutocomplete { request_id, query } => {
                    self.spawn_resolution(request_id, query)
                }
                SurfaceEffect::FocusInput => tracing::trace!("focus returned to input"),
            }
        }
        transition.selected
    }

    fn spawn_resolution(&mut self, request_id: u64, query: String) {
        self.pending_resolutions += 1;
        let tx = self.tx.clone();
        let resolver = self.resolver.clone();
        let cancel = self.shutdown.child_token();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                items = resolver.resolve(&query) => {
                    let _ = tx.send(WidgetEvent::AutocompleteResolved { request_id, items });
                }
            }
        });
    }
}

impl Drop for ChatWidget {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
