use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::state::InterviewState;

/// Load-on-start and save-on-change hooks around the interview state.
pub trait SnapshotStore: Send + Sync {
    fn load(&self) -> Result<Option<InterviewState>, SnapshotError>;
    fn save(&self, state: &InterviewState) -> Result<(), SnapshotError>;
}

/// Snapshot persistence failures.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot store unavailable: {0}")]
    Unavailable(String),
}

/// Keeps the state as a pretty-printed JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileSnapshotStore {
    path: PathBuf,
}

impl JsonFileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> SnapshotError {
        SnapshotError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SnapshotStore for JsonFileSnapshotStore {
    fn load(&self) -> Result<Option<InterviewState>, SnapshotError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(self.io_error(err)),
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn save(&self, state: &InterviewState) -> Result<(), SnapshotError> {
        let payload = serde_json::to_string_pretty(state)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
        }

        // staged write, then rename over the previous snapshot
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, payload).map_err(|err| self.io_error(err))?;
        fs::rename(&staging, &self.path).map_err(|err| self.io_error(err))
    }
}

/// Process-lifetime snapshot holder; still round-trips through JSON.
#[derive(Debug, Default, Clone)]
pub struct MemorySnapshotStore {
    document: Arc<Mutex<Option<String>>>,
}

impl MemorySnapshotStore {
    pub fn document(&self) -> Option<String> {
        self.document.lock().ok().and_then(|guard| guard.clone())
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self) -> Result<Option<InterviewState>, SnapshotError> {
        let guard = self
            .document
            .lock()
            .map_err(|_| SnapshotError::Unavailable("snapshot mutex poisoned".to_string()))?;
        guard
            .as_deref()
            .map(|raw| serde_json::from_str::<InterviewState>(raw))
            .transpose()
            .map_err(SnapshotError::from)
    }

    fn save(&self, state: &InterviewState) -> Result<(), SnapshotError> {
        let payload = serde_json::to_string(state)?;
        let mut guard = self
            .document
            .lock()
            .map_err(|_| SnapshotError::Unavailable("snapshot mutex poisoned".to_string()))?;
        *guard = Some(payload);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::candidate::NewCandidate;
    use chrono::Utc;

    fn populated_state() -> InterviewState {
        let mut state = InterviewState::default();
        state.register_candidate(
            NewCandidate {
                name: "Grace Hopper".to_string(),
                email: "grace@example.com".to_string(),
                phone: Some("5550001111".to_string()),
                resume_file_name: Some("grace.docx".to_string()),
                resume_data: None,
            },
            Utc::now(),
        );
        state.start_interview(Utc::now()).expect("session starts");
        state
    }

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("mock-interview-{}-{name}", std::process::id()))
            .join("state.json")
    }

    #[test]
    fn file_store_restores_what_it_saved() {
        let path = scratch_path("roundtrip");
        let store = JsonFileSnapshotStore::new(&path);
        let state = populated_state();

        store.save(&state).expect("save succeeds");
        let restored = store.load().expect("load succeeds").expect("snapshot present");
        assert_eq!(restored, state);

        let _ = fs::remove_dir_all(path.parent().expect("has parent"));
    }

    #[test]
    fn missing_file_loads_as_empty() {
        let store = JsonFileSnapshotStore::new(scratch_path("missing"));
        assert!(store.load().expect("missing is not an error").is_none());
    }

    #[test]
    fn corrupt_file_is_reported() {
        let path = scratch_path("corrupt");
        fs::create_dir_all(path.parent().expect("has parent")).expect("dir created");
        fs::write(&path, "{ not json").expect("written");

        let store = JsonFileSnapshotStore::new(&path);
        assert!(matches!(store.load(), Err(SnapshotError::Json(_))));

        let _ = fs::remove_dir_all(path.parent().expect("has parent"));
    }

    #[test]
    fn memory_store_keeps_latest_document() {
        let store = MemorySnapshotStore::default();
        assert!(store.load().expect("empty load").is_none());

        let state = populated_state();
        store.save(&state).expect("save succeeds");
        assert!(store.document().is_some());
        assert_eq!(store.load().expect("load").expect("present"), state);
    }
}
