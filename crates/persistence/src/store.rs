//! Whole-document storage.
//!
//! Every backing document is read and written as a single JSON value. A
//! [`DocumentStore`] never patches a document in place: `save` replaces the
//! previous content entirely.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use thiserror::Error;
use tokio::sync::RwLock;

use crate::metrics::StoreTimer;

/// Errors raised while loading or saving a document.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {document}: {source}")]
    Read {
        document: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {document}: {source}")]
    Parse {
        document: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write {document}: {source}")]
    Write {
        document: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode {document}: {source}")]
    Encode {
        document: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("document {0} is unavailable")]
    Unavailable(String),
}

impl StoreError {
    /// Whether the failure happened while persisting rather than loading.
    pub fn is_write(&self) -> bool {
        matches!(self, StoreError::Write { .. } | StoreError::Encode { .. })
    }
}

/// Storage medium for one JSON document.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Name used in logs and metrics.
    fn name(&self) -> &str;

    /// Reads and parses the whole document.
    async fn load(&self) -> Result<Value, StoreError>;

    /// Replaces the whole document.
    async fn save(&self, document: &Value) -> Result<(), StoreError>;

    /// Whether a document is currently present.
    async fn exists(&self) -> bool;

    /// Prepares the medium before first use (e.g. creates directories).
    async fn prepare(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Loads a document and decodes it into `T`.
pub async fn load_as<T: DeserializeOwned>(store: &dyn DocumentStore) -> Result<T, StoreError> {
    let timer = StoreTimer::new(store.name(), "load");
    let result = store.load().await.and_then(|value| {
        serde_json::from_value(value).map_err(|source| StoreError::Parse {
            document: store.name().to_string(),
            source,
        })
    });
    timer.record();
    result
}

/// Encodes `value` and replaces the document with it.
pub async fn save_as<T: Serialize>(store: &dyn DocumentStore, value: &T) -> Result<(), StoreError> {
    let timer = StoreTimer::new(store.name(), "save");
    let document = serde_json::to_value(value).map_err(|source| StoreError::Encode {
        document: store.name().to_string(),
        source,
    })?;
    let result = store.save(&document).await;
    timer.record();
    result
}

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A document kept in a pretty-printed JSON file.
///
/// Saves write a sibling temporary file and rename it over the target, so a
/// failed write leaves the previous document intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    name: String,
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { name, path }
    }

    fn temp_path(&self) -> PathBuf {
        let seq = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let file = format!(".{}.{}-{}.tmp", self.name, std::process::id(), seq);
        match self.path.parent() {
            Some(dir) => dir.join(file),
            None => PathBuf::from(file),
        }
    }
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn load(&self) -> Result<Value, StoreError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| StoreError::Read {
                document: self.name.clone(),
                source,
            })?;

        serde_json::from_str(&content).map_err(|source| StoreError::Parse {
            document: self.name.clone(),
            source,
        })
    }

    async fn save(&self, document: &Value) -> Result<(), StoreError> {
        let content =
            serde_json::to_string_pretty(document).map_err(|source| StoreError::Encode {
                document: self.name.clone(),
                source,
            })?;

        let temp = self.temp_path();
        let write_err = |source| StoreError::Write {
            document: self.name.clone(),
            source,
        };

        if let Err(err) = tokio::fs::write(&temp, content).await {
            return Err(write_err(err));
        }
        if let Err(err) = tokio::fs::rename(&temp, &self.path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(write_err(err));
        }
        Ok(())
    }

    async fn exists(&self) -> bool {
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }

    async fn prepare(&self) -> Result<(), StoreError> {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => tokio::fs::create_dir_all(dir)
                .await
                .map_err(|source| StoreError::Write {
                    document: self.name.clone(),
                    source,
                }),
            _ => Ok(()),
        }
    }
}

/// A document held in memory.
///
/// Useful for tests and ephemeral deployments. Failures can be switched on to
/// simulate an unavailable medium.
#[derive(Debug)]
pub struct MemoryStore {
    name: String,
    document: RwLock<Option<Value>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    /// Creates an empty store; loads fail until something is saved.
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_parts(name.into(), None)
    }

    /// Creates a store already holding `document`.
    pub fn with_document(name: impl Into<String>, document: Value) -> Self {
        Self::from_parts(name.into(), Some(document))
    }

    fn from_parts(name: String, document: Option<Value>) -> Self {
        Self {
            name,
            document: RwLock::new(document),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Current content, bypassing failure simulation.
    pub async fn snapshot(&self) -> Option<Value> {
        self.document.read().await.clone()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn load(&self) -> Result<Value, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(self.name.clone()));
        }
        self.document
            .read()
            .await
            .clone()
            .ok_or_else(|| StoreError::Unavailable(self.name.clone()))
    }

    async fn save(&self, document: &Value) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Write {
                document: self.name.clone(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "simulated write failure"),
            });
        }
        *self.document.write().await = Some(document.clone());
        Ok(())
    }

    async fn exists(&self) -> bool {
        self.document.read().await.is_some()
    }
}
