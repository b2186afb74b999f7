//! Document store: the local key-value persistence the UI loads from and saves to.
//!
//! Values are whole documents keyed by kind. The store never interprets content;
//! resolution and import logic operate on the loaded values.

pub mod json_file;
pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::resume::ResumeMaster;
use crate::models::template::{builtin_templates, Template};
use crate::models::tracking::{CoverLetter, JobApplication};
use crate::models::variant::Variant;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on '{key}': {source}")]
    Io {
        key: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt '{key}' document: {source}")]
    Corrupt {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Storage task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Master,
    Variants,
    JobApplications,
    CoverLetters,
    Templates,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 5] = [
        DocumentKind::Master,
        DocumentKind::Variants,
        DocumentKind::JobApplications,
        DocumentKind::CoverLetters,
        DocumentKind::Templates,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            DocumentKind::Master => "master-resume",
            DocumentKind::Variants => "variants",
            DocumentKind::JobApplications => "job-applications",
            DocumentKind::CoverLetters => "cover-letters",
            DocumentKind::Templates => "templates",
        }
    }
}

/// One storable value, tagged with the kind it is saved under.
#[derive(Debug, Clone)]
pub enum Document {
    Master(ResumeMaster),
    Variants(Vec<Variant>),
    JobApplications(Vec<JobApplication>),
    CoverLetters(Vec<CoverLetter>),
    Templates(Vec<Template>),
}

impl Document {
    pub fn kind(&self) -> DocumentKind {
        match self {
            Document::Master(_) => DocumentKind::Master,
            Document::Variants(_) => DocumentKind::Variants,
            Document::JobApplications(_) => DocumentKind::JobApplications,
            Document::CoverLetters(_) => DocumentKind::CoverLetters,
            Document::Templates(_) => DocumentKind::Templates,
        }
    }

    pub fn to_json(&self) -> Result<String, StoreError> {
        let key = self.kind().key();
        let result = match self {
            Document::Master(v) => serde_json::to_string_pretty(v),
            Document::Variants(v) => serde_json::to_string_pretty(v),
            Document::JobApplications(v) => serde_json::to_string_pretty(v),
            Document::CoverLetters(v) => serde_json::to_string_pretty(v),
            Document::Templates(v) => serde_json::to_string_pretty(v),
        };
        result.map_err(|source| StoreError::Corrupt { key, source })
    }
}

/// Everything the application persists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Documents {
    pub master: ResumeMaster,
    pub variants: Vec<Variant>,
    pub jobs: Vec<JobApplication>,
    pub cover_letters: Vec<CoverLetter>,
    pub templates: Vec<Template>,
}

impl Default for Documents {
    fn default() -> Self {
        Self {
            master: ResumeMaster::new(""),
            variants: Vec::new(),
            jobs: Vec::new(),
            cover_letters: Vec::new(),
            templates: builtin_templates(),
        }
    }
}

impl Documents {
    pub fn apply(&mut self, document: Document) {
        match document {
            Document::Master(v) => self.master = v,
            Document::Variants(v) => self.variants = v,
            Document::JobApplications(v) => self.jobs = v,
            Document::CoverLetters(v) => self.cover_letters = v,
            Document::Templates(v) => self.templates = v,
        }
    }

    pub fn find_variant(&self, id: Option<&str>) -> Option<&Variant> {
        let id = id?;
        self.variants.iter().find(|v| v.id == id)
    }
}

/// Load/save persistence keyed by document kind. Implementations must make each
/// `save` all-or-nothing for its document.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn load(&self) -> Result<Documents, StoreError>;

    async fn save(&self, document: Document) -> Result<(), StoreError>;

    /// Writes documents one at a time. Each write is all-or-nothing, the batch
    /// is not: a failure part way through leaves earlier documents saved.
    async fn save_all(&self, documents: Vec<Document>) -> Result<(), StoreError> {
        for document in documents {
            self.save(document).await?;
        }
        Ok(())
    }
}
