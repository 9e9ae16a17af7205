//! ConversationController - owns the message list.
//!
//! A send appends the user message and a loading placeholder together and
//! hands back a [`QueryTicket`]. Completing the ticket removes the
//! placeholder and appends exactly one assistant message (or nothing, when
//! the query was cancelled).

use super::query::QueryOutcome;
use datachat_core::backend::{DownloadRequest, QaPair};
use datachat_core::content_filter::{Screened, screen_answer};
use datachat_core::{DatachatError, Message, MessageRole, QueryFailure, Result};
use uuid::Uuid;

pub const TRANSPORT_FAILURE_TEXT: &str = "I couldn't reach the data service. Please check that:\n• the backend server is running\n• the API address in the widget configuration is correct\n• your network connection is working";

pub const TIMEOUT_FAILURE_TEXT: &str = "The request took too long to complete. Please try again, or try a more specific question.";

pub const NO_ANSWER_TEXT: &str = "The data service returned no answer for that question. Please try rephrasing it.";

/// Text patterns of seed/test messages removed at startup.
const SEED_MESSAGE_TEXTS: &[&str] = &["test message", "lorem ipsum", "sample message"];

/// Handle for one in-flight query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTicket {
    pub user_message_id: Uuid,
    pub placeholder_id: Uuid,
    pub query: String,
}

/// What completing a ticket rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// An answer was appended. `suggestions` are the follow-ons to offer;
    /// they are empty when the answer was refused by the content filter.
    Answered {
        message_id: Uuid,
        refused: bool,
        suggestions: Vec<String>,
    },
    /// A failure message was appended.
    Failed {
        message_id: Uuid,
        failure: QueryFailure,
    },
    /// The placeholder was removed and nothing was appended.
    Cancelled,
}

#[derive(Debug, Default)]
pub struct ConversationController {
    messages: Vec<Message>,
}

impl ConversationController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from a preloaded message list (e.g. restored by the host).
    pub fn with_messages(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn message(&self, id: Uuid) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    /// Number of loading placeholders still waiting for an answer.
    pub fn pending_count(&self) -> usize {
        self.messages.iter().filter(|m| m.is_loading()).count()
    }

    /// Removes seed/test messages. Returns how many were removed.
    pub fn purge_seed_messages(&mut self) -> usize {
        let before = self.messages.len();
        self.messages.retain(|m| !is_seed_text(&m.text));
        let removed = before - self.messages.len();
        if removed > 0 {
            tracing::info!("[Session] Purged {} seed message(s)", removed);
        }
        removed
    }

    /// Appends an assistant message that did not come from a query, such as
    /// the greeting.
    pub fn push_assistant(&mut self, text: impl Into<String>) -> Uuid {
        let message = Message::assistant(text);
        let id = message.id;
        self.messages.push(message);
        id
    }

    /// Appends the user message and the loading placeholder.
    ///
    /// Returns `None` for blank input; nothing is appended in that case.
    pub fn begin_send(&mut self, text: &str) -> Option<QueryTicket> {
        let query = text.trim();
        if query.is_empty() {
            return None;
        }

        let user = Message::user(query);
        let placeholder = Message::loading();
        let ticket = QueryTicket {
            user_message_id: user.id,
            placeholder_id: placeholder.id,
            query: query.to_string(),
        };
        self.messages.extend([user, placeholder]);
        Some(ticket)
    }

    /// Finishes `ticket` with `outcome`.
    pub fn complete(&mut self, ticket: &QueryTicket, outcome: QueryOutcome) -> Delivery {
        self.messages.retain(|m| m.id != ticket.placeholder_id);

        let response = match outcome {
            QueryOutcome::Cancelled => return Delivery::Cancelled,
            QueryOutcome::Failed(err) => return self.fail(QueryFailure::from(&err)),
            QueryOutcome::Response(response) => response,
        };

        if let Some(message) = response.error_message() {
            return self.fail(QueryFailure::Server(message));
        }

        let answer = match response.answer.as_deref() {
            Some(answer) if !answer.trim().is_empty() => answer.to_string(),
            _ => {
                tracing::warn!(query = %ticket.query, "response carried no answer text");
                NO_ANSWER_TEXT.to_string()
            }
        };
        let meta = response.server_meta();
        let screened = screen_answer(&answer);

        let suggestions = match &screened {
            Screened::Allowed(_) => meta.suggestions.clone(),
            Screened::Refused { categories } => {
                tracing::info!(
                    query = %ticket.query,
                    ?categories,
                    "answer replaced with personal-data refusal"
                );
                Vec::new()
            }
        };

        let message = Message::assistant(screened.display_text()).with_meta(meta);
        let message_id = message.id;
        self.messages.push(message);

        Delivery::Answered {
            message_id,
            refused: screened.is_refused(),
            suggestions,
        }
    }

    fn fail(&mut self, failure: QueryFailure) -> Delivery {
        let text = match &failure {
            QueryFailure::Transport => TRANSPORT_FAILURE_TEXT.to_string(),
            QueryFailure::Timeout => TIMEOUT_FAILURE_TEXT.to_string(),
            QueryFailure::Server(message) => message.clone(),
        };
        let message_id = self.push_assistant(text);
        Delivery::Failed {
            message_id,
            failure,
        }
    }

    /// Replaces the text of an assistant answer in place.
    ///
    /// Returns the question/answer pair to persist. The question is the
    /// closest preceding user message.
    pub fn edit_answer(&mut self, message_id: Uuid, new_text: &str) -> Result<QaPair> {
        let new_text = new_text.trim();
        if new_text.is_empty() {
            return Err(DatachatError::internal("Edited answer cannot be empty"));
        }

        let index = self.answer_index(message_id)?;
        let question = self.question_before(index);
        self.messages[index].text = new_text.to_string();

        Ok(QaPair {
            question,
            answer: new_text.to_string(),
        })
    }

    /// The answer with the question that produced it.
    pub fn answer_pair(&self, message_id: Uuid) -> Result<QaPair> {
        let index = self.answer_index(message_id)?;
        Ok(QaPair {
            question: self.question_before(index),
            answer: self.messages[index].text.clone(),
        })
    }

    /// Builds the download payload for an assistant answer.
    pub fn download_request(
        &self,
        message_id: Uuid,
        filename: Option<String>,
    ) -> Result<DownloadRequest> {
        let index = self.answer_index(message_id)?;
        let message = &self.messages[index];
        Ok(DownloadRequest {
            answer: message.text.clone(),
            query: self.question_before(index),
            numeric_value: message.numeric_value().cloned(),
            filename,
        })
    }

    fn answer_index(&self, message_id: Uuid) -> Result<usize> {
        let index = self
            .messages
            .iter()
            .position(|m| m.id == message_id)
            .ok_or_else(|| DatachatError::not_found("message", message_id.to_string()))?;

        let message = &self.messages[index];
        if message.role != MessageRole::Assistant || message.is_loading() {
            return Err(DatachatError::internal(format!(
                "Message {} is not an assistant answer",
                message_id
            )));
        }
        Ok(index)
    }

    fn question_before(&self, index: usize) -> String {
        self.messages[..index]
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::User)
            .map(|m| m.text.clone())
            .unwrap_or_default()
    }
}

fn is_seed_text(text: &str) -> bool {
    let text = text.trim().to_lowercase();
    SEED_MESSAGE_TEXTS.iter().any(|seed| text == *seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use datachat_core::backend::QueryResponse;
    use datachat_core::content_filter::REFUSAL_TEXT;
    use datachat_core::message::LOADING_TEXT;
    use serde_json::json;

    fn answer(text: &str) -> QueryOutcome {
        QueryOutcome::Response(QueryResponse {
            answer: Some(text.to_string()),
            ..Default::default()
        })
    }

    #[test]
    fn begin_send_appends_user_and_placeholder() {
        let mut controller = ConversationController::new();
        let ticket = controller.begin_send("  How many records?  ").unwrap();

        let messages = controller.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::User);
        assert_eq!(messages[0].text, "How many records?");
        assert!(messages[1].is_loading());
        assert_eq!(messages[1].text, LOADING_TEXT);
        assert_eq!(ticket.query, "How many records?");
        assert_eq!(controller.pending_count(), 1);
    }

    #[test]
    fn empty_payload_gets_fallback_text() {
        let mut controller = ConversationController::new();
        let ticket = controller.begin_send("total weight?").unwrap();
        let outcome: QueryResponse = serde_json::from_value(json!({})).unwrap();

        let delivery = controller.complete(&ticket, QueryOutcome::Response(outcome));

        assert!(matches!(delivery, Delivery::Answered { refused: false, .. }));
        assert_eq!(controller.messages().len(), 2);
        assert_eq!(controller.messages()[1].text, NO_ANSWER_TEXT);

        let ticket = controller.begin_send("again?").unwrap();
        controller.complete(&ticket, answer("   "));
        assert_eq!(controller.messages().last().unwrap().text, NO_ANSWER_TEXT);
    }

    #[test]
    fn blank_send_is_ignored() {
        let mut controller = ConversationController::new();
        assert!(controller.begin_send("   ").is_none());
        assert!(controller.messages().is_empty());
    }

    #[test]
    fn delivered_answer_replaces_placeholder() {
        let mut controller = ConversationController::new();
        let ticket = controller.begin_send("total weight?").unwrap();
        let outcome = QueryOutcome::Response(QueryResponse {
            answer: Some("12,400 kg".into()),
            numeric_value: Some(json!(12400)),
            suggestions: Some(vec!["Average weight?".into()]),
            ..Default::default()
        });

        let delivery = controller.complete(&ticket, outcome);

        let Delivery::Answered {
            message_id,
            refused,
            suggestions,
        } = delivery
        else {
            panic!("expected an answer");
        };
        assert!(!refused);
        assert_eq!(suggestions, vec!["Average weight?".to_string()]);
        assert_eq!(controller.pending_count(), 0);
        assert_eq!(controller.messages().len(), 2);
        let message = controller.message(message_id).unwrap();
        assert_eq!(message.text, "12,400 kg");
        assert_eq!(message.numeric_value(), Some(&json!(12400)));
    }

    #[test]
    fn personal_data_answer_is_refused_whole() {
        let mut controller = ConversationController::new();
        let ticket = controller.begin_send("list candidates").unwrap();
        let delivery = controller.complete(
            &ticket,
            answer("Full Name: Jane Doe\nEmail Address: jane@example.com"),
        );

        assert!(matches!(
            delivery,
            Delivery::Answered { refused: true, ref suggestions, .. } if suggestions.is_empty()
        ));
        assert_eq!(controller.messages().last().unwrap().text, REFUSAL_TEXT);
    }

    #[test]
    fn failures_are_classified() {
        let mut controller = ConversationController::new();

        let ticket = controller.begin_send("a").unwrap();
        controller.complete(
            &ticket,
            QueryOutcome::Failed(DatachatError::transport("connection refused")),
        );
        assert_eq!(
            controller.messages().last().unwrap().text,
            TRANSPORT_FAILURE_TEXT
        );

        let ticket = controller.begin_send("b").unwrap();
        controller.complete(
            &ticket,
            QueryOutcome::Failed(DatachatError::Timeout { seconds: 60 }),
        );
        assert_eq!(
            controller.messages().last().unwrap().text,
            TIMEOUT_FAILURE_TEXT
        );

        let ticket = controller.begin_send("c").unwrap();
        let delivery = controller.complete(
            &ticket,
            QueryOutcome::Response(QueryResponse {
                error: Some("No files loaded".into()),
                ..Default::default()
            }),
        );
        assert!(matches!(
            delivery,
            Delivery::Failed {
                failure: QueryFailure::Server(_),
                ..
            }
        ));
        assert_eq!(controller.messages().last().unwrap().text, "No files loaded");
        assert_eq!(controller.pending_count(), 0);
    }

    #[test]
    fn cancelled_query_only_removes_placeholder() {
        let mut controller = ConversationController::new();
        let ticket = controller.begin_send("a").unwrap();
        assert_eq!(
            controller.complete(&ticket, QueryOutcome::Cancelled),
            Delivery::Cancelled
        );
        assert_eq!(controller.messages().len(), 1);
        assert_eq!(controller.messages()[0].role, MessageRole::User);
    }

    #[test]
    fn purge_removes_only_exact_seed_texts() {
        let mut controller = ConversationController::with_messages(vec![
            Message::user("Test Message"),
            Message::assistant("  lorem ipsum "),
            Message::user("This is a test message about costs"),
            Message::assistant("Sample message"),
        ]);
        assert_eq!(controller.purge_seed_messages(), 3);
        assert_eq!(controller.messages().len(), 1);
        assert_eq!(
            controller.messages()[0].text,
            "This is a test message about costs"
        );
    }

    #[test]
    fn edit_answer_keeps_identity_and_pairs_with_question() {
        let mut controller = ConversationController::new();
        let ticket = controller.begin_send("Who ships most?").unwrap();
        let Delivery::Answered { message_id, .. } = controller.complete(&ticket, answer("Plant A"))
        else {
            panic!("expected answer");
        };

        let pair = controller.edit_answer(message_id, "Plant B").unwrap();
        assert_eq!(
            pair,
            QaPair {
                question: "Who ships most?".into(),
                answer: "Plant B".into()
            }
        );
        let edited = controller.message(message_id).unwrap();
        assert_eq!(edited.id, message_id);
        assert_eq!(edited.role, MessageRole::Assistant);
        assert_eq!(edited.text, "Plant B");
    }

    #[test]
    fn edit_rejects_user_messages_and_unknown_ids() {
        let mut controller = ConversationController::new();
        let ticket = controller.begin_send("q").unwrap();

        let err = controller
            .edit_answer(ticket.user_message_id, "x")
            .unwrap_err();
        assert!(matches!(err, DatachatError::Internal(_)));

        let err = controller.edit_answer(Uuid::new_v4(), "x").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn download_request_carries_question_and_value() {
        let mut controller = ConversationController::new();
        let ticket = controller.begin_send("total cost?").unwrap();
        let outcome = QueryOutcome::Response(QueryResponse {
            answer: Some("$1,200".into()),
            numeric_value: Some(json!(1200.0)),
            ..Default::default()
        });
        let Delivery::Answered { message_id, .. } = controller.complete(&ticket, outcome) else {
            panic!("expected answer");
        };

        let request = controller
            .download_request(message_id, Some("cost".into()))
            .unwrap();
        assert_eq!(request.query, "total cost?");
        assert_eq!(request.answer, "$1,200");
        assert_eq!(request.numeric_value, Some(json!(1200.0)));
        assert_eq!(request.filename.as_deref(), Some("cost"));

        let pair = controller.answer_pair(message_id).unwrap();
        assert_eq!(pair.question, "total cost?");
        assert_eq!(pair.answer, "$1,200");
    }
}
