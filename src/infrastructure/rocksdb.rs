use crate::domain::commitment::CommitmentEntry;
use crate::domain::ports::{AuditRecord, AuditSink, CommitmentStore};
use crate::error::{BuyoutError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family for commitment entries.
pub const CF_COMMITMENTS: &str = "commitments";
/// Column Family for the audit trail.
pub const CF_AUDIT: &str = "audit";

/// A persistent store implementation using RocksDB.
///
/// Commitments are stored as JSON values under `project_code/entry_id`
/// composite keys; audit records append under their UUID. The struct is
/// thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDbStore {
    db: Arc<DB>,
}

fn commitment_key(project_code: &str, entry_id: &str) -> Vec<u8> {
    // '/' cannot appear in project codes or entry ids, so the composite key
    // prefix-scans cleanly per project.
    format!("{project_code}/{entry_id}").into_bytes()
}

fn internal(e: impl std::error::Error + Send + Sync + 'static) -> BuyoutError {
    BuyoutError::Internal(Box::new(e))
}

impl RocksDbStore {
    /// Opens or creates a RocksDB instance at the specified path, ensuring
    /// the required column families exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_commitments = ColumnFamilyDescriptor::new(CF_COMMITMENTS, Options::default());
        let cf_audit = ColumnFamilyDescriptor::new(CF_AUDIT, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_commitments, cf_audit])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn cf_handle(&self, name: &str) -> Result<&rocksdb::ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            internal(std::io::Error::other(format!(
                "column family {name} not found"
            )))
        })
    }
}

#[async_trait]
impl CommitmentStore for RocksDbStore {
    async fn put(&self, entry: CommitmentEntry) -> Result<()> {
        let cf = self.cf_handle(CF_COMMITMENTS)?;
        let key = commitment_key(&entry.project_code, &entry.id);
        let value = serde_json::to_vec(&entry).map_err(internal)?;
        self.db.put_cf(cf, key, value)?;
        Ok(())
    }

    async fn get(&self, project_code: &str, entry_id: &str) -> Result<Option<CommitmentEntry>> {
        let cf = self.cf_handle(CF_COMMITMENTS)?;
        let result = self.db.get_cf(cf, commitment_key(project_code, entry_id))?;

        match result {
            Some(bytes) => {
                let entry = serde_json::from_slice(&bytes).map_err(internal)?;
                Ok(Some(entry))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, project_code: &str, entry_id: &str) -> Result<bool> {
        let cf = self.cf_handle(CF_COMMITMENTS)?;
        let key = commitment_key(project_code, entry_id);
        let existed = self.db.get_pinned_cf(cf, &key)?.is_some();
        if existed {
            self.db.delete_cf(cf, key)?;
        }
        Ok(existed)
    }

    async fn list(&self, project_code: &str) -> Result<Vec<CommitmentEntry>> {
        let cf = self.cf_handle(CF_COMMITMENTS)?;
        let prefix = format!("{project_code}/");
        let mut entries = Vec::new();

        let iter = self.db.iterator_cf(
            cf,
            rocksdb::IteratorMode::From(prefix.as_bytes(), rocksdb::Direction::Forward),
        );
        for item in iter {
            let (key, value) = item?;
            if !key.starts_with(prefix.as_bytes()) {
                break;
            }
            let entry: CommitmentEntry = serde_json::from_slice(&value).map_err(internal)?;
            entries.push(entry);
        }

        Ok(entries)
    }
}

#[async_trait]
impl AuditSink for RocksDbStore {
    async fn record(&self, record: AuditRecord) -> Result<()> {
        let cf = self.cf_handle(CF_AUDIT)?;
        let value = serde_json::to_vec(&record).map_err(internal)?;
        self.db.put_cf(cf, record.id.as_bytes(), value)?;
        Ok(())
    }
}
