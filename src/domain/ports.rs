use super::commitment::CommitmentEntry;
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type CommitmentStoreBox = Box<dyn CommitmentStore>;
pub type AuditSinkBox = Box<dyn AuditSink>;

/// Backing store for commitment entries, keyed by project code + entry id.
#[async_trait]
pub trait CommitmentStore: Send + Sync {
    async fn put(&self, entry: CommitmentEntry) -> Result<()>;
    async fn get(&self, project_code: &str, entry_id: &str) -> Result<Option<CommitmentEntry>>;
    async fn delete(&self, project_code: &str, entry_id: &str) -> Result<bool>;
    /// All entries for a project, unordered; callers sort.
    async fn list(&self, project_code: &str) -> Result<Vec<CommitmentEntry>>;
}

/// One audit record per workflow transition or CRUD mutation.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct AuditRecord {
    pub id: Uuid,
    pub action: String,
    pub entity_type: String,
    pub entity_id: String,
    pub project_code: String,
    pub actor_name: String,
    pub actor_email: String,
    pub detail: String,
    pub recorded_at: DateTime<Utc>,
}

impl AuditRecord {
    pub fn new(
        action: impl Into<String>,
        entry: &CommitmentEntry,
        actor_name: impl Into<String>,
        actor_email: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            action: action.into(),
            entity_type: "commitment".to_string(),
            entity_id: entry.id.clone(),
            project_code: entry.project_code.clone(),
            actor_name: actor_name.into(),
            actor_email: actor_email.into(),
            detail: detail.into(),
            recorded_at: Utc::now(),
        }
    }
}

/// Fire-and-forget audit collaborator.
///
/// Failures here are best-effort: the engine logs them and never rolls back
/// the underlying state transition.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, record: AuditRecord) -> Result<()>;
}
