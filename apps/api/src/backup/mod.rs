//! Backup bundles: a container of named JSON entries covering the whole store.
//!
//! `metadata.json` is mandatory; every other entry is optional. Restore decodes
//! and checks every present entry before returning anything, so a bad bundle
//! never results in a partial write.

pub mod handlers;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::models::resume::ResumeMaster;
use crate::models::tracking::{CoverLetter, JobApplication};
use crate::models::variant::Variant;
use crate::store::{Document, Documents};

pub const BACKUP_VERSION: &str = "1.0";

pub const METADATA_ENTRY: &str = "metadata.json";
pub const MASTER_ENTRY: &str = "master-resume.json";
pub const VARIANTS_ENTRY: &str = "variants.json";
pub const JOBS_ENTRY: &str = "job-applications.json";
pub const COVER_LETTERS_ENTRY: &str = "cover-letters.json";

const DATA_ENTRIES: [&str; 4] = [MASTER_ENTRY, VARIANTS_ENTRY, JOBS_ENTRY, COVER_LETTERS_ENTRY];

#[derive(Debug, Error)]
pub enum BackupError {
    #[error("Backup is missing {METADATA_ENTRY}")]
    MissingMetadata,

    #[error("Unsupported backup version '{0}'")]
    UnsupportedVersion(String),

    #[error("Backup entry '{entry}' is malformed: {source}")]
    MalformedEntry {
        entry: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupMetadata {
    pub export_date: DateTime<Utc>,
    pub version: String,
    pub data_types: Vec<String>,
}

/// Entry name → JSON content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BackupBundle {
    pub entries: BTreeMap<String, Value>,
}

/// Decoded bundle contents. Absent entries stay `None` and leave the store untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct RestoredData {
    pub metadata: BackupMetadata,
    pub master: Option<ResumeMaster>,
    pub variants: Option<Vec<Variant>>,
    pub jobs: Option<Vec<JobApplication>>,
    pub cover_letters: Option<Vec<CoverLetter>>,
}

impl RestoredData {
    pub fn into_documents(self) -> Vec<Document> {
        let mut documents = Vec::new();
        if let Some(master) = self.master {
            documents.push(Document::Master(master));
        }
        if let Some(variants) = self.variants {
            documents.push(Document::Variants(variants));
        }
        if let Some(jobs) = self.jobs {
            documents.push(Document::JobApplications(jobs));
        }
        if let Some(letters) = self.cover_letters {
            documents.push(Document::CoverLetters(letters));
        }
        documents
    }
}

fn encode<T: Serialize>(entry: &str, value: &T) -> Result<Value, BackupError> {
    serde_json::to_value(value).map_err(|source| BackupError::MalformedEntry {
        entry: entry.to_string(),
        source,
    })
}

fn decode<T: DeserializeOwned>(
    bundle: &BackupBundle,
    entry: &str,
) -> Result<Option<T>, BackupError> {
    bundle
        .entries
        .get(entry)
        .map(|value| {
            serde_json::from_value(value.clone()).map_err(|source| BackupError::MalformedEntry {
                entry: entry.to_string(),
                source,
            })
        })
        .transpose()
}

pub fn create_backup(documents: &Documents) -> Result<BackupBundle, BackupError> {
    let mut entries = BTreeMap::new();
    entries.insert(MASTER_ENTRY.to_string(), encode(MASTER_ENTRY, &documents.master)?);
    entries.insert(VARIANTS_ENTRY.to_string(), encode(VARIANTS_ENTRY, &documents.variants)?);
    entries.insert(JOBS_ENTRY.to_string(), encode(JOBS_ENTRY, &documents.jobs)?);
    entries.insert(
        COVER_LETTERS_ENTRY.to_string(),
        encode(COVER_LETTERS_ENTRY, &documents.cover_letters)?,
    );

    let metadata = BackupMetadata {
        export_date: Utc::now(),
        version: BACKUP_VERSION.to_string(),
        data_types: DATA_ENTRIES
            .iter()
            .map(|entry| entry.trim_end_matches(".json").to_string())
            .collect(),
    };
    entries.insert(METADATA_ENTRY.to_string(), encode(METADATA_ENTRY, &metadata)?);

    Ok(BackupBundle { entries })
}

/// Same major version is readable.
fn is_supported(version: &str) -> bool {
    let major = |v: &str| v.split('.').next().map(str::to_string);
    major(version).is_some() && major(version) == major(BACKUP_VERSION)
}

pub fn restore_backup(bundle: &BackupBundle) -> Result<RestoredData, BackupError> {
    let metadata: BackupMetadata =
        decode(bundle, METADATA_ENTRY)?.ok_or(BackupError::MissingMetadata)?;
    if !is_supported(&metadata.version) {
        return Err(BackupError::UnsupportedVersion(metadata.version));
    }

    for name in bundle.entries.keys() {
        if name != METADATA_ENTRY && !DATA_ENTRIES.contains(&name.as_str()) {
            warn!("Ignoring unknown backup entry '{name}'");
        }
    }

    Ok(RestoredData {
        master: decode(bundle, MASTER_ENTRY)?,
        variants: decode(bundle, VARIANTS_ENTRY)?,
        jobs: decode(bundle, JOBS_ENTRY)?,
        cover_letters: decode(bundle, COVER_LETTERS_ENTRY)?,
        metadata,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn documents() -> Documents {
        let mut docs = Documents::default();
        docs.master.owner = "Ada".to_string();
        docs.variants.push(Variant::new("Backend"));
        docs
    }

    #[test]
    fn test_backup_restores_every_entry() {
        let docs = documents();
        let bundle = create_backup(&docs).unwrap();
        assert!(bundle.entries.contains_key(METADATA_ENTRY));

        let restored = restore_backup(&bundle).unwrap();
        assert_eq!(restored.master.as_ref(), Some(&docs.master));
        assert_eq!(restored.variants.as_ref(), Some(&docs.variants));
        assert_eq!(restored.metadata.version, BACKUP_VERSION);
        assert_eq!(restored.into_documents().len(), 4);
    }

    #[test]
    fn test_metadata_lists_data_types() {
        let bundle = create_backup(&documents()).unwrap();
        let metadata = &bundle.entries[METADATA_ENTRY];
        assert_eq!(
            metadata["dataTypes"],
            json!(["master-resume", "variants", "job-applications", "cover-letters"])
        );
        assert!(metadata.get("exportDate").is_some());
    }

    #[test]
    fn test_missing_metadata_fails() {
        let mut bundle = create_backup(&documents()).unwrap();
        bundle.entries.remove(METADATA_ENTRY);
        assert!(matches!(
            restore_backup(&bundle),
            Err(BackupError::MissingMetadata)
        ));
    }

    #[test]
    fn test_newer_major_version_is_rejected() {
        let mut bundle = create_backup(&documents()).unwrap();
        bundle.entries.insert(
            METADATA_ENTRY.to_string(),
            json!({"exportDate": "2024-01-01T00:00:00Z", "version": "2.0", "dataTypes": []}),
        );
        assert!(matches!(
            restore_backup(&bundle),
            Err(BackupError::UnsupportedVersion(v)) if v == "2.0"
        ));
    }

    #[test]
    fn test_malformed_entry_names_the_entry() {
        let mut bundle = create_backup(&documents()).unwrap();
        bundle
            .entries
            .insert(VARIANTS_ENTRY.to_string(), json!({"not": "a list"}));
        match restore_backup(&bundle) {
            Err(BackupError::MalformedEntry { entry, .. }) => assert_eq!(entry, VARIANTS_ENTRY),
            other => panic!("expected MalformedEntry, got {other:?}"),
        }
    }

    #[test]
    fn test_partial_bundle_restores_present_entries_only() {
        let full = create_backup(&documents()).unwrap();
        let mut bundle = BackupBundle::default();
        for name in [METADATA_ENTRY, MASTER_ENTRY] {
            bundle
                .entries
                .insert(name.to_string(), full.entries[name].clone());
        }

        let restored = restore_backup(&bundle).unwrap();
        assert!(restored.master.is_some());
        assert!(restored.variants.is_none());
        assert_eq!(restored.into_documents().len(), 1);
    }
}
