//! The set of documents backing a deployment, and their first-run seeds.

use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;

use shared::time::local_timestamp;

use crate::store::{DocumentStore, JsonFileStore, StoreError};

/// Where the JSON documents live on disk.
#[derive(Debug, Clone)]
pub struct DocumentPaths {
    pub data_dir: PathBuf,
    pub status_file: String,
    pub devices_file: String,
    pub status_list_file: String,
}

impl DocumentPaths {
    pub fn status_path(&self) -> PathBuf {
        self.data_dir.join(&self.status_file)
    }

    pub fn devices_path(&self) -> PathBuf {
        self.data_dir.join(&self.devices_file)
    }

    pub fn status_list_path(&self) -> PathBuf {
        self.data_dir.join(&self.status_list_file)
    }
}

/// Stores for the status record, the device collection and the status list.
#[derive(Clone)]
pub struct Documents {
    pub status: Arc<dyn DocumentStore>,
    pub devices: Arc<dyn DocumentStore>,
    pub status_list: Arc<dyn DocumentStore>,
}

impl Documents {
    /// Opens one JSON file per document. Nothing is read until first use.
    pub fn json_files(paths: &DocumentPaths) -> Self {
        Self {
            status: Arc::new(JsonFileStore::new(paths.status_path())),
            devices: Arc::new(JsonFileStore::new(paths.devices_path())),
            status_list: Arc::new(JsonFileStore::new(paths.status_list_path())),
        }
    }

    /// Writes default content for every document that does not exist yet.
    ///
    /// Existing documents are never touched. Returns the names of the
    /// documents that were created.
    pub async fn seed_missing(&self) -> Result<Vec<String>, StoreError> {
        let seeds: [(&Arc<dyn DocumentStore>, fn() -> Value); 3] = [
            (&self.status, default_status_document),
            (&self.devices, default_devices_document),
            (&self.status_list, default_status_list),
        ];

        let mut created = Vec::new();
        for (store, seed) in seeds {
            store.prepare().await?;
            if store.exists().await {
                continue;
            }
            store.save(&seed()).await?;
            tracing::info!(document = %store.name(), "Seeded missing document");
            created.push(store.name().to_string());
        }
        Ok(created)
    }
}

/// Initial status record: code 0, stamped now.
pub fn default_status_document() -> Value {
    json!({
        "status": 0,
        "last_updated": local_timestamp(),
    })
}

/// Initial device collection: empty.
pub fn default_devices_document() -> Value {
    json!([])
}

/// Initial status-code reference list.
pub fn default_status_list() -> Value {
    json!([
        {
            "id": 0,
            "name": "Awake",
            "desc": "Online right now and reachable through any usual contact channel.",
            "color": "awake"
        },
        {
            "id": 1,
            "name": "Asleep",
            "desc": "Asleep or otherwise offline. Call in an emergency.",
            "color": "sleeping"
        }
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::{Device, StatusRecord};
    use tempfile::TempDir;

    fn paths(dir: &TempDir) -> DocumentPaths {
        DocumentPaths {
            data_dir: dir.path().join("_data"),
            status_file: "data.json".to_string(),
            devices_file: "devices.json".to_string(),
            status_list_file: "status.json".to_string(),
        }
    }

    #[test]
    fn test_document_paths() {
        let paths = DocumentPaths {
            data_dir: PathBuf::from("/srv/_data"),
            status_file: "data.json".to_string(),
            devices_file: "devices.json".to_string(),
            status_list_file: "status.json".to_string(),
        };
        assert_eq!(paths.status_path(), PathBuf::from("/srv/_data/data.json"));
        assert_eq!(paths.devices_path(), PathBuf::from("/srv/_data/devices.json"));
        assert_eq!(paths.status_list_path(), PathBuf::from("/srv/_data/status.json"));
    }

    #[tokio::test]
    async fn test_seed_missing_creates_all_documents() {
        let dir = TempDir::new().unwrap();
        let paths = paths(&dir);
        let docs = Documents::json_files(&paths);

        let created = docs.seed_missing().await.unwrap();
        assert_eq!(created, vec!["data.json", "devices.json", "status.json"]);

        let record: StatusRecord = serde_json::from_value(docs.status.load().await.unwrap()).unwrap();
        assert_eq!(record.status, 0);
        let devices: Vec<Device> = serde_json::from_value(docs.devices.load().await.unwrap()).unwrap();
        assert!(devices.is_empty());
        assert!(paths.status_list_path().exists());
    }

    #[tokio::test]
    async fn test_seed_missing_keeps_existing_documents() {
        let dir = TempDir::new().unwrap();
        let paths = paths(&dir);
        std::fs::create_dir_all(&paths.data_dir).unwrap();
        std::fs::write(paths.status_path(), r#"{"status": 9, "last_updated": "x"}"#).unwrap();

        let docs = Documents::json_files(&paths);
        let created = docs.seed_missing().await.unwrap();
        assert_eq!(created, vec!["devices.json", "status.json"]);
        assert_eq!(docs.status.load().await.unwrap()["status"], 9);
    }

    #[tokio::test]
    async fn test_seed_missing_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let docs = Documents::json_files(&paths(&dir));
        docs.seed_missing().await.unwrap();
        assert!(docs.seed_missing().await.unwrap().is_empty());
    }
}
