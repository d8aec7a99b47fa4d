//! Step-completion state
//!
//! Each finished provisioning step is recorded in a small JSON settings file
//! next to the installed application, so a rerun skips straight past the
//! steps that already succeeded. Deleting the file starts provisioning over
//! from scratch.

mod store;

pub use store::{SettingsFile, StateStore, SETTINGS_FILE_NAME};
