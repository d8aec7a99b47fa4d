//! Settings file CRUD - persisted step-completion flags

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::provision::StepId;

/// File name of the persisted completion map, stored inside the provisioned
/// application directory.
pub const SETTINGS_FILE_NAME: &str = "appstrap.settings.json";

/// Persisted step-completion flags.
///
/// Implementations never fail loudly: state that cannot be read counts as
/// "nothing completed", and a failed write is reported as `false` so the
/// caller can decide whether to warn. Losing a flag only costs a repeat of
/// an idempotent step on the next run.
pub trait StateStore: Send + Sync {
    /// Read the full completion map. Missing, empty, or malformed data
    /// degrades to an empty map.
    fn load(&self) -> BTreeMap<String, bool>;

    /// Persist `done` for `step`, rewriting the whole map. Returns `false`
    /// when the write could not be completed.
    fn set(&self, step: StepId, done: bool) -> bool;

    /// Whether `step` has been recorded as complete. Absent keys read as
    /// incomplete.
    fn is_complete(&self, step: StepId) -> bool {
        self.load()
            .get(step.settings_key())
            .copied()
            .unwrap_or(false)
    }
}

/// File-backed store: one flat JSON object of `"step": bool` entries.
///
/// Every `set` is a full-file read-modify-write, so keys written by other
/// versions of the tool survive untouched. The file is created on the first
/// successful write and never deleted; removing it by hand starts
/// provisioning over from scratch.
pub struct SettingsFile {
    path: PathBuf,
}

impl SettingsFile {
    /// Store backed by `dir/appstrap.settings.json`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(SETTINGS_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for SettingsFile {
    fn load(&self) -> BTreeMap<String, bool> {
        let Ok(content) = std::fs::read_to_string(&self.path) else {
            return BTreeMap::new();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    fn set(&self, step: StepId, done: bool) -> bool {
        let mut settings = self.load();
        settings.insert(step.settings_key().to_string(), done);

        let Ok(content) = serde_json::to_string_pretty(&settings) else {
            return false;
        };
        std::fs::write(&self.path, content).is_ok()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_store() -> (TempDir, SettingsFile) {
        let temp_dir = TempDir::new().unwrap();
        let store = SettingsFile::in_dir(temp_dir.path());
        (temp_dir, store)
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let (_temp, store) = setup_store();
        assert!(store.load().is_empty());
        assert!(!store.is_complete(StepId::CloneRepo));
    }

    #[test]
    fn test_load_empty_file_is_empty() {
        let (_temp, store) = setup_store();
        std::fs::write(store.path(), "").unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_load_malformed_file_is_empty() {
        let (_temp, store) = setup_store();
        std::fs::write(store.path(), "{not valid json").unwrap();
        assert!(store.load().is_empty());
        assert!(!store.is_complete(StepId::BuildProject));
    }

    #[test]
    fn test_set_then_load_round_trip() {
        let (_temp, store) = setup_store();

        assert!(store.set(StepId::CloneRepo, true));

        let settings = store.load();
        assert_eq!(settings.get("hasClonedRepo"), Some(&true));
        assert!(store.is_complete(StepId::CloneRepo));
        assert!(!store.is_complete(StepId::InstallPackages));
    }

    #[test]
    fn test_set_preserves_earlier_steps() {
        let (_temp, store) = setup_store();

        assert!(store.set(StepId::CloneRepo, true));
        assert!(store.set(StepId::InstallPackages, true));

        let settings = store.load();
        assert_eq!(settings.get("hasClonedRepo"), Some(&true));
        assert_eq!(settings.get("hasInstalledPackages"), Some(&true));
    }

    #[test]
    fn test_set_preserves_unknown_keys() {
        let (_temp, store) = setup_store();
        std::fs::write(store.path(), r#"{"someFutureStep": true}"#).unwrap();

        assert!(store.set(StepId::CloneRepo, true));

        let settings = store.load();
        assert_eq!(settings.get("someFutureStep"), Some(&true));
        assert_eq!(settings.get("hasClonedRepo"), Some(&true));
    }

    #[test]
    fn test_set_false_overwrites_true() {
        let (_temp, store) = setup_store();

        assert!(store.set(StepId::CloneRepo, true));
        assert!(store.set(StepId::CloneRepo, false));

        assert!(!store.is_complete(StepId::CloneRepo));
    }

    #[test]
    fn test_set_reports_failure_for_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let store = SettingsFile::in_dir(temp_dir.path().join("does-not-exist"));

        assert!(!store.set(StepId::CloneRepo, true));
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_file_stays_a_flat_json_object() {
        let (_temp, store) = setup_store();
        store.set(StepId::CloneRepo, true);
        store.set(StepId::BuildProject, true);

        let content = std::fs::read_to_string(store.path()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        let object = parsed.as_object().unwrap();
        assert!(object.values().all(|v| v.is_boolean()));
    }
}
