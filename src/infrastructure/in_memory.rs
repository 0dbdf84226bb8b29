use crate::domain::commitment::CommitmentEntry;
use crate::domain::ports::{AuditRecord, AuditSink, CommitmentStore};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for commitment entries.
///
/// Uses `Arc<RwLock<HashMap>>` keyed by `(project_code, entry_id)` to allow
/// shared concurrent access. Ideal for testing or single-process deployments
/// where persistence is not required.
#[derive(Default, Clone)]
pub struct InMemoryCommitmentStore {
    entries: Arc<RwLock<HashMap<(String, String), CommitmentEntry>>>,
}

impl InMemoryCommitmentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CommitmentStore for InMemoryCommitmentStore {
    async fn put(&self, entry: CommitmentEntry) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert((entry.project_code.clone(), entry.id.clone()), entry);
        Ok(())
    }

    async fn get(&self, project_code: &str, entry_id: &str) -> Result<Option<CommitmentEntry>> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(&(project_code.to_string(), entry_id.to_string()))
            .cloned())
    }

    async fn delete(&self, project_code: &str, entry_id: &str) -> Result<bool> {
        let mut entries = self.entries.write().await;
        Ok(entries
            .remove(&(project_code.to_string(), entry_id.to_string()))
            .is_some())
    }

    async fn list(&self, project_code: &str) -> Result<Vec<CommitmentEntry>> {
        let entries = self.entries.read().await;
        Ok(entries
            .values()
            .filter(|e| e.project_code == project_code)
            .cloned()
            .collect())
    }
}

/// A thread-safe in-memory audit log.
///
/// Keeps records in arrival order; `records()` returns a snapshot so tests
/// can assert on emitted audit entries.
#[derive(Default, Clone)]
pub struct InMemoryAuditLog {
    records: Arc<RwLock<Vec<AuditRecord>>>,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn records(&self) -> Vec<AuditRecord> {
        self.records.read().await.clone()
    }
}

#[async_trait]
impl AuditSink for InMemoryAuditLog {
    async fn record(&self, record: AuditRecord) -> Result<()> {
        let mut records = self.records.write().await;
        records.push(record);
        Ok(())
    }
}
