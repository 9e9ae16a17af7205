//! Conversation session: message list ownership and the query lifecycle.

mod controller;
mod query;

pub use controller::{
    ConversationController, Delivery, NO_ANSWER_TEXT, QueryTicket, TIMEOUT_FAILURE_TEXT,
    TRANSPORT_FAILURE_TEXT,
};
pub use query::{QueryOutcome, run_query};
