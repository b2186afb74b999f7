use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::store::{Document, DocumentStore, Documents, StoreError};

/// In-process store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<Documents>,
}

impl MemoryStore {
    pub fn new(documents: Documents) -> Self {
        Self {
            documents: RwLock::new(documents),
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn load(&self) -> Result<Documents, StoreError> {
        Ok(self.documents.read().await.clone())
    }

    async fn save(&self, document: Document) -> Result<(), StoreError> {
        self.documents.write().await.apply(document);
        Ok(())
    }
}
