use crate::traits::{ObjectStore, StorageError, StorageResult, StoredObject};
use async_trait::async_trait;
use galleria_core::StorageBackend;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Sidecar record holding what a filesystem cannot: the declared content
/// type and the upload-time annotation map.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SidecarMeta {
    content_type: String,
    #[serde(default)]
    annotations: HashMap<String, String>,
}

const SIDECAR_SUFFIX: &str = ".meta.json";

/// Local filesystem storage implementation.
///
/// Objects live at `{base_path}/{container}/{key}`; content type and
/// annotations are kept in a JSON sidecar next to each object.
#[derive(Clone)]
pub struct LocalStore {
    base_path: PathBuf,
}

impl LocalStore {
    /// Create a new LocalStore rooted at `base_path`.
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStore { base_path })
    }

    /// Convert container + key to a filesystem path, rejecting traversal
    /// sequences that could escape the base directory.
    fn key_to_path(&self, container: &str, key: &str) -> StorageResult<PathBuf> {
        for part in [container, key] {
            if part.contains("..") || part.starts_with('/') || part.is_empty() {
                return Err(StorageError::InvalidKey(format!(
                    "{:?} contains invalid characters",
                    part
                )));
            }
        }
        Ok(self.base_path.join(container).join(key))
    }

    fn sidecar_path(path: &Path) -> PathBuf {
        let mut s = path.as_os_str().to_os_string();
        s.push(SIDECAR_SUFFIX);
        PathBuf::from(s)
    }

    async fn ensure_parent_dir(path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for LocalStore {
    async fn get(&self, container: &str, key: &str) -> StorageResult<StoredObject> {
        let path = self.key_to_path(container, key)?;

        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(key.to_string()));
            }
            Err(e) => return Err(StorageError::DownloadFailed(e.to_string())),
        };

        if bytes.is_empty() {
            return Err(StorageError::EmptyBody(key.to_string()));
        }

        let meta = match fs::read(Self::sidecar_path(&path)).await {
            Ok(raw) => serde_json::from_slice::<SidecarMeta>(&raw).unwrap_or_default(),
            Err(_) => SidecarMeta::default(),
        };

        Ok(StoredObject {
            bytes,
            content_type: meta.content_type,
            annotations: meta.annotations,
        })
    }

    async fn put(
        &self,
        container: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
        annotations: &HashMap<String, String>,
    ) -> StorageResult<()> {
        let path = self.key_to_path(container, key)?;
        Self::ensure_parent_dir(&path).await?;

        let size = bytes.len();
        fs::write(&path, bytes)
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        let meta = SidecarMeta {
            content_type: content_type.to_string(),
            annotations: annotations.clone(),
        };
        let raw = serde_json::to_vec(&meta)
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;
        fs::write(Self::sidecar_path(&path), raw)
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        tracing::debug!(
            container = container,
            key = key,
            size_bytes = size,
            "Local store write"
        );

        Ok(())
    }

    async fn exists(&self, container: &str, key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(container, key)?;
        Ok(fs::try_exists(&path).await?)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
