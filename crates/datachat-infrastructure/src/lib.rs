//! Infrastructure layer for Datachat: where configuration lives on disk and
//! how it is loaded.

pub mod config_service;
pub mod paths;

pub use crate::config_service::{BASE_URL_ENV, ConfigService};
pub use crate::paths::{DatachatPaths, PathError};
