//! Core domain for the Datachat widget engine.
//!
//! This crate holds the state and rules of the input-assistance engine:
//! which help surface is visible, how suggestions are ranked, how answers
//! are screened, and the interface to the remote query service. It performs
//! no network or file I/O itself.

pub mod autocomplete;
pub mod backend;
pub mod config;
pub mod content_filter;
pub mod error;
pub mod message;
pub mod suggestion;
pub mod surface;
pub mod timer;

// Re-export common error type
pub use error::{DatachatError, QueryFailure, Result};

pub use config::{StaleAutocompletePolicy, SurfaceTimings, WidgetConfig};
pub use message::{Message, MessageRole, MessageStatus, ServerMeta};
pub use surface::{HelpSurface, HelpSurfaceCoordinator, NavKey, SessionFlags, SurfaceEffect};
