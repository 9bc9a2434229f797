//! Data document loading.
//!
//! Each page performs exactly one load of its JSON document. A load either
//! yields the whole parsed document or a [`LoadError`]; controllers never
//! see a partially parsed document. There is no retry: a failed load is
//! final for that page and is rendered as a fallback message.
//!
//! The read runs on a worker thread and the caller waits at most the
//! configured timeout, so a stalled filesystem (network mounts, FUSE)
//! surfaces as [`LoadError::Timeout`] instead of hanging the build.

use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("timed out after {timeout:?} reading {path}")]
    Timeout { path: PathBuf, timeout: Duration },
    #[error("loader for {path} stopped without a result")]
    WorkerLost { path: PathBuf },
}

/// Outcome of a page's single data load.
#[derive(Debug)]
pub enum Loaded<T> {
    Ready(T),
    Failed(LoadError),
}

impl<T> Loaded<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Loaded::Ready(_))
    }

    pub fn error(&self) -> Option<&LoadError> {
        match self {
            Loaded::Ready(_) => None,
            Loaded::Failed(e) => Some(e),
        }
    }
}

impl<T> From<Result<T, LoadError>> for Loaded<T> {
    fn from(result: Result<T, LoadError>) -> Self {
        match result {
            Ok(doc) => Loaded::Ready(doc),
            Err(e) => Loaded::Failed(e),
        }
    }
}

/// Read and parse a JSON document, waiting at most `timeout`.
pub fn load_document<T>(path: &Path, timeout: Duration) -> Result<T, LoadError>
where
    T: DeserializeOwned + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    let owned = path.to_path_buf();
    std::thread::spawn(move || {
        let result = read_document::<T>(&owned);
        // Receiver is gone when the caller already timed out.
        let _ = tx.send(result);
    });

    match rx.recv_timeout(timeout) {
        Ok(result) => {
            if result.is_ok() {
                debug!(path = %path.display(), "loaded document");
            }
            result
        }
        Err(RecvTimeoutError::Timeout) => {
            warn!(path = %path.display(), ?timeout, "document load timed out");
            Err(LoadError::Timeout {
                path: path.to_path_buf(),
                timeout,
            })
        }
        Err(RecvTimeoutError::Disconnected) => {
            warn!(path = %path.display(), "document loader exited early");
            Err(LoadError::WorkerLost {
                path: path.to_path_buf(),
            })
        }
    }
}

/// Load a document for a page, logging failures at `warn`.
pub fn load_for_page<T>(path: &Path, timeout: Duration) -> Loaded<T>
where
    T: DeserializeOwned + Send + 'static,
{
    let loaded: Loaded<T> = load_document(path, timeout).into();
    if let Some(err) = loaded.error() {
        warn!(error = %err, "data load failed");
    }
    loaded
}

fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PlantsDocument;
    use tempfile::TempDir;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[test]
    fn loads_valid_document() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("plants-data.json");
        fs::write(&path, r#"{"categories": [], "plants": []}"#).unwrap();

        let doc: PlantsDocument = load_document(&path, TIMEOUT).unwrap();
        assert!(doc.plants.is_empty());
    }

    #[test]
    fn missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let result: Result<PlantsDocument, _> =
            load_document(&tmp.path().join("nope.json"), TIMEOUT);
        assert!(matches!(result, Err(LoadError::Io { .. })));
    }

    #[test]
    fn malformed_json_is_json_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("plants-data.json");
        fs::write(&path, "{ \"plants\": [").unwrap();

        let result: Result<PlantsDocument, _> = load_document(&path, TIMEOUT);
        let err = result.unwrap_err();
        assert!(matches!(err, LoadError::Json { .. }));
        assert!(err.to_string().contains("plants-data.json"));
    }

    #[test]
    fn wrong_shape_is_json_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("plants-data.json");
        fs::write(&path, r#"{"plants": [{"id": 1}]}"#).unwrap();

        let loaded: Loaded<PlantsDocument> = load_for_page(&path, TIMEOUT);
        assert!(!loaded.is_ready());
        assert!(matches!(loaded.error(), Some(LoadError::Json { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn stalled_read_times_out() {
        let tmp = TempDir::new().unwrap();
        let fifo = tmp.path().join("plants-data.json");
        let status = std::process::Command::new("mkfifo")
            .arg(&fifo)
            .status()
            .unwrap();
        assert!(status.success());

        // Opening a FIFO with no writer blocks the worker indefinitely.
        let started = std::time::Instant::now();
        let result: Result<PlantsDocument, _> =
            load_document(&fifo, Duration::from_millis(100));
        assert!(matches!(result, Err(LoadError::Timeout { .. })));
        assert!(started.elapsed() < TIMEOUT);
    }

    struct Explodes;

    impl<'de> serde::Deserialize<'de> for Explodes {
        fn deserialize<D: serde::Deserializer<'de>>(_: D) -> Result<Self, D::Error> {
            panic!("deserializer blew up");
        }
    }

    #[test]
    fn panicking_worker_is_not_a_timeout() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("photos.json");
        fs::write(&path, "{}").unwrap();

        let result: Result<Explodes, _> = load_document(&path, TIMEOUT);
        assert!(matches!(result, Err(LoadError::WorkerLost { .. })));
    }
}
