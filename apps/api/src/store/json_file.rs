use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::models::resume::ResumeMaster;
use crate::models::template::builtin_templates;
use crate::store::{Document, DocumentKind, DocumentStore, Documents, StoreError};

/// One pretty-printed JSON file per document kind inside a data directory.
///
/// Writes go to a temp file in the same directory and are renamed into place,
/// so a crash mid-save leaves the previous version intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| StoreError::Io {
                key: "data-dir",
                source,
            })?;
        info!("Document store opened at {}", dir.display());
        Ok(Self { dir })
    }

    fn path(&self, kind: DocumentKind) -> PathBuf {
        self.dir.join(format!("{}.json", kind.key()))
    }

    async fn read<T: DeserializeOwned>(&self, kind: DocumentKind) -> Result<Option<T>, StoreError> {
        let key = kind.key();
        let text = match tokio::fs::read_to_string(self.path(kind)).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Io { key, source }),
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| StoreError::Corrupt { key, source })
    }
}

fn write_temp(dir: &Path, json: &str) -> std::io::Result<NamedTempFile> {
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(json.as_bytes())?;
    tmp.as_file().sync_all()?;
    Ok(tmp)
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn load(&self) -> Result<Documents, StoreError> {
        let master = match self.read::<ResumeMaster>(DocumentKind::Master).await? {
            Some(master) => master,
            None => {
                warn!("No master resume on disk; starting from an empty one");
                ResumeMaster::new("")
            }
        };

        Ok(Documents {
            master,
            variants: self.read(DocumentKind::Variants).await?.unwrap_or_default(),
            jobs: self
                .read(DocumentKind::JobApplications)
                .await?
                .unwrap_or_default(),
            cover_letters: self
                .read(DocumentKind::CoverLetters)
                .await?
                .unwrap_or_default(),
            templates: self
                .read(DocumentKind::Templates)
                .await?
                .unwrap_or_else(builtin_templates),
        })
    }

    async fn save(&self, document: Document) -> Result<(), StoreError> {
        let key = document.kind().key();
        let json = document.to_json()?;
        let dir = self.dir.clone();
        let path = self.path(document.kind());

        tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            write_temp(&dir, &json)?.persist(&path).map_err(|e| e.error)?;
            Ok(())
        })
        .await?
        .map_err(|source| StoreError::Io { key, source })?;

        info!("Saved '{key}' document");
        Ok(())
    }

    /// Every document is serialized and written to a temp file before any of them
    /// is renamed into place, so a serialization or write failure leaves the whole
    /// store as it was. The renames themselves run one after another.
    async fn save_all(&self, documents: Vec<Document>) -> Result<(), StoreError> {
        let mut pending = Vec::with_capacity(documents.len());
        for document in &documents {
            let kind = document.kind();
            pending.push((kind.key(), self.path(kind), document.to_json()?));
        }
        let count = pending.len();
        let dir = self.dir.clone();

        tokio::task::spawn_blocking(move || -> Result<(), StoreError> {
            let mut staged = Vec::with_capacity(pending.len());
            for (key, path, json) in pending {
                let tmp =
                    write_temp(&dir, &json).map_err(|source| StoreError::Io { key, source })?;
                staged.push((key, path, tmp));
            }
            for (key, path, tmp) in staged {
                tmp.persist(&path).map_err(|e| StoreError::Io {
                    key,
                    source: e.error,
                })?;
            }
            Ok(())
        })
        .await??;

        info!("Saved {count} document(s) in one batch");
        Ok(())
    }
}
