//! CLI command implementations.

pub mod clean;
pub mod inspect;

use std::path::Path;

use tabclean::{CleanerConfig, TabcleanError};

/// Load the configuration file if one was given, otherwise defaults.
pub(crate) fn load_config(path: Option<&Path>) -> Result<CleanerConfig, TabcleanError> {
    match path {
        Some(path) => CleanerConfig::load(path),
        None => Ok(CleanerConfig::default()),
    }
}

/// Turn a library error into the message shown to the user.
pub(crate) fn user_error(err: TabcleanError) -> Box<dyn std::error::Error> {
    err.user_message().into()
}
