//! Application layer for Datachat.
//!
//! This crate wires the pure domain pieces from `datachat-core` to a query
//! backend: it resolves autocomplete suggestions, runs the send/receive
//! cycle of the conversation, performs the startup bootstrap, and drives all
//! of it from a single event loop in [`ChatWidget`].

pub mod bootstrap;
pub mod resolver;
pub mod session;
pub mod widget;

pub use bootstrap::{BootstrapReport, Bootstrapper};
pub use resolver::SuggestionResolver;
pub use session::{ConversationController, Delivery, QueryOutcome, QueryTicket};
pub use widget::{ChatWidget, KeyOutcome, WidgetEvent};
