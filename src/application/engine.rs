use crate::domain::approval::{Actor, ApprovalRole, ApprovalStep, StepStatus};
use crate::domain::commitment::{
    CommitmentEntry, CommitmentStatus, CommitmentUpdate, LifecycleStatus,
};
use crate::domain::divisions::STANDARD_DIVISIONS;
use crate::domain::money::Money;
use crate::domain::ports::{AuditRecord, AuditSinkBox, CommitmentStoreBox};
use crate::domain::risk::{determine_waiver_type, evaluate_risk};
use crate::error::{BuyoutError, Result};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// The main entry point for the commitment approval workflow.
///
/// `ApprovalEngine` owns the storage backend and the audit sink and drives
/// every state transition. Each transition is staged on a clone of the entry
/// and written back only once it has fully succeeded, so a failed call never
/// leaves an entry partially updated.
///
/// The check-then-mutate sequence on a single entry runs under a per-entry
/// async lock; entries are independent and never block each other.
pub struct ApprovalEngine {
    store: CommitmentStoreBox,
    audit: AuditSinkBox,
    entry_locks: Mutex<HashMap<(String, String), Arc<Mutex<()>>>>,
    project_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ApprovalEngine {
    pub fn new(store: CommitmentStoreBox, audit: AuditSinkBox) -> Self {
        Self {
            store,
            audit,
            entry_locks: Mutex::new(HashMap::new()),
            project_locks: Mutex::new(HashMap::new()),
        }
    }

    async fn entry_lock(&self, project_code: &str, entry_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.entry_locks.lock().await;
        locks
            .entry((project_code.to_string(), entry_id.to_string()))
            .or_default()
            .clone()
    }

    async fn project_lock(&self, project_code: &str) -> Arc<Mutex<()>> {
        let mut locks = self.project_locks.lock().await;
        locks.entry(project_code.to_string()).or_default().clone()
    }

    async fn load(&self, project_code: &str, entry_id: &str) -> Result<CommitmentEntry> {
        self.store
            .get(project_code, entry_id)
            .await?
            .ok_or_else(|| BuyoutError::not_found(project_code, entry_id))
    }

    /// Audit emission is best-effort: a sink failure must never roll back or
    /// fail the state transition it describes.
    async fn emit_audit(&self, record: AuditRecord) {
        if let Err(e) = self.audit.record(record).await {
            tracing::warn!(error = %e, "audit sink failure, transition already committed");
        }
    }

    /// Adds a new commitment entry.
    ///
    /// Derived budget fields are recomputed here regardless of what the
    /// caller supplied; a duplicate identifier is a validation error.
    pub async fn add(&self, mut entry: CommitmentEntry, actor: &Actor) -> Result<CommitmentEntry> {
        let lock = self.entry_lock(&entry.project_code, &entry.id).await;
        let _guard = lock.lock().await;

        if self.store.get(&entry.project_code, &entry.id).await?.is_some() {
            return Err(BuyoutError::ValidationError(format!(
                "commitment {} already exists in project {}",
                entry.id, entry.project_code
            )));
        }

        entry.recalculate();
        entry.touch(Utc::now());
        self.store.put(entry.clone()).await?;

        self.emit_audit(AuditRecord::new(
            "commitment.add",
            &entry,
            &actor.name,
            &actor.email,
            format!("added {} ({})", entry.division_code, entry.division_description),
        ))
        .await;
        Ok(entry)
    }

    /// Applies a partial update, recomputing `total_budget`/`over_under`
    /// whenever a budget-affecting field changes.
    pub async fn update(
        &self,
        project_code: &str,
        entry_id: &str,
        update: CommitmentUpdate,
        actor: &Actor,
    ) -> Result<CommitmentEntry> {
        let lock = self.entry_lock(project_code, entry_id).await;
        let _guard = lock.lock().await;

        let mut entry = self.load(project_code, entry_id).await?;
        entry.apply(update)?;
        entry.touch(Utc::now());
        self.store.put(entry.clone()).await?;

        self.emit_audit(AuditRecord::new(
            "commitment.update",
            &entry,
            &actor.name,
            &actor.email,
            format!("updated {}", entry.division_code),
        ))
        .await;
        Ok(entry)
    }

    pub async fn remove(&self, project_code: &str, entry_id: &str, actor: &Actor) -> Result<()> {
        let lock = self.entry_lock(project_code, entry_id).await;
        let _guard = lock.lock().await;

        let entry = self.load(project_code, entry_id).await?;
        self.store.delete(project_code, entry_id).await?;

        self.emit_audit(AuditRecord::new(
            "commitment.remove",
            &entry,
            &actor.name,
            &actor.email,
            format!("removed {}", entry.division_code),
        ))
        .await;
        Ok(())
    }

    /// All entries for a project, sorted by division code (id as tiebreak so
    /// the order is stable across bootstraps).
    pub async fn list(&self, project_code: &str) -> Result<Vec<CommitmentEntry>> {
        let mut entries = self.store.list(project_code).await?;
        entries.sort_by(|a, b| {
            a.division_code
                .cmp(&b.division_code)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(entries)
    }

    /// Creates the canonical set of standard divisions for a project that has
    /// no entries yet. Idempotent: a project with existing entries gets them
    /// back unchanged.
    pub async fn initialize_standard_divisions(
        &self,
        project_code: &str,
        actor: &Actor,
    ) -> Result<Vec<CommitmentEntry>> {
        let lock = self.project_lock(project_code).await;
        let _guard = lock.lock().await;

        let existing = self.list(project_code).await?;
        if !existing.is_empty() {
            return Ok(existing);
        }

        for (code, description) in STANDARD_DIVISIONS {
            let mut entry = CommitmentEntry::new(
                Uuid::new_v4().to_string(),
                project_code,
                *code,
                *description,
                Money::ZERO,
                Money::ZERO,
            );
            entry.is_standard = true;
            self.store.put(entry.clone()).await?;
            self.emit_audit(AuditRecord::new(
                "commitment.add",
                &entry,
                &actor.name,
                &actor.email,
                format!("standard division bootstrap: {code}"),
            ))
            .await;
        }

        self.list(project_code).await
    }

    /// Submits a commitment for approval.
    ///
    /// Risk is assessed from the entry's current fields; a waiver-requiring
    /// posture parks the entry in `WaiverPending`, otherwise it goes to
    /// `PendingReview`. Either way the first hop is a pending PX step.
    /// Exactly one workflow may be active per entry at a time.
    pub async fn submit(
        &self,
        project_code: &str,
        entry_id: &str,
        submitter: Option<Actor>,
    ) -> Result<CommitmentEntry> {
        let lock = self.entry_lock(project_code, entry_id).await;
        let _guard = lock.lock().await;

        let mut entry = self.load(project_code, entry_id).await?;
        if entry.pending_step().is_some() {
            return Err(BuyoutError::InvalidTransition(format!(
                "commitment {entry_id} already has an approval step pending"
            )));
        }

        let assessment = evaluate_risk(&entry);
        entry.waiver_required = assessment.requires_waiver;
        if assessment.requires_waiver {
            entry.waiver_type = determine_waiver_type(&entry);
            entry.commitment_status = CommitmentStatus::WaiverPending;
        } else {
            entry.commitment_status = CommitmentStatus::PendingReview;
        }

        let actor = submitter.unwrap_or_default();
        entry.approval_history.push(ApprovalStep::pending(
            &entry.id,
            &entry.project_code,
            ApprovalRole::Px,
            &actor,
        ));
        entry.current_step = Some(ApprovalRole::Px);
        entry.touch(Utc::now());

        self.store.put(entry.clone()).await?;
        tracing::debug!(
            project = project_code,
            entry = entry_id,
            status = %entry.commitment_status,
            "commitment submitted for approval"
        );

        self.emit_audit(AuditRecord::new(
            "commitment.submit",
            &entry,
            &actor.name,
            &actor.email,
            format!(
                "submitted for approval, status {}, triggers: [{}]",
                entry.commitment_status,
                assessment.triggers.join("; ")
            ),
        ))
        .await;
        Ok(entry)
    }

    /// Responds to the currently pending approval step.
    ///
    /// Rejection terminates the cycle. Approval of the PX step re-evaluates
    /// risk against the entry's current fields: a high-value compliance gap
    /// escalates automatically to the Compliance Manager, anything else
    /// finalizes. Compliance Manager approval escalates to the CFO only when
    /// the approver explicitly asks (`escalate_further`); CFO approval always
    /// finalizes.
    pub async fn respond(
        &self,
        project_code: &str,
        entry_id: &str,
        approved: bool,
        comment: Option<String>,
        escalate_further: bool,
        responder: Option<Actor>,
    ) -> Result<CommitmentEntry> {
        let lock = self.entry_lock(project_code, entry_id).await;
        let _guard = lock.lock().await;

        let mut entry = self.load(project_code, entry_id).await?;
        let role = match entry.pending_step() {
            Some(step) => step.role,
            None => {
                return Err(BuyoutError::InvalidTransition(
                    "no pending approval step".to_string(),
                ));
            }
        };

        let now = Utc::now();
        let resolution = if approved {
            StepStatus::Approved
        } else {
            StepStatus::Rejected
        };
        if let Some(step) = entry.pending_step_mut() {
            step.resolve(resolution, comment, now);
        }

        if !approved {
            entry.commitment_status = CommitmentStatus::Rejected;
            entry.current_step = None;
        } else {
            match role {
                ApprovalRole::Px => {
                    // Re-evaluated against current fields, not the posture
                    // frozen at submission time.
                    let assessment = evaluate_risk(&entry);
                    if assessment.escalation_level == ApprovalRole::ComplianceManager {
                        Self::escalate(&mut entry, ApprovalRole::ComplianceManager);
                        entry.commitment_status = CommitmentStatus::ComplianceReview;
                    } else {
                        Self::finalize(&mut entry);
                    }
                }
                ApprovalRole::ComplianceManager => {
                    if escalate_further {
                        Self::escalate(&mut entry, ApprovalRole::Cfo);
                        entry.commitment_status = CommitmentStatus::CfoReview;
                    } else {
                        Self::finalize(&mut entry);
                    }
                }
                // CFO is a terminal authority.
                ApprovalRole::Cfo => Self::finalize(&mut entry),
            }
        }

        entry.touch(now);
        self.store.put(entry.clone()).await?;
        tracing::debug!(
            project = project_code,
            entry = entry_id,
            step = %role,
            approved,
            status = %entry.commitment_status,
            "approval step resolved"
        );

        let actor = responder.unwrap_or_else(|| Actor::for_role(role));
        self.emit_audit(AuditRecord::new(
            "commitment.respond",
            &entry,
            &actor.name,
            &actor.email,
            format!(
                "{} step {}, status now {}",
                if approved { "approved" } else { "rejected" },
                role,
                entry.commitment_status
            ),
        ))
        .await;
        Ok(entry)
    }

    fn escalate(entry: &mut CommitmentEntry, role: ApprovalRole) {
        entry.approval_history.push(ApprovalStep::pending(
            &entry.id,
            &entry.project_code,
            role,
            &Actor::for_role(role),
        ));
        entry.current_step = Some(role);
    }

    fn finalize(entry: &mut CommitmentEntry) {
        entry.commitment_status = CommitmentStatus::Committed;
        entry.lifecycle = LifecycleStatus::Executed;
        entry.current_step = None;
    }

    /// Snapshot of an entry's approval history.
    ///
    /// Returns copies, never references into the store; mutating the result
    /// cannot affect subsequent calls.
    pub async fn approval_history(
        &self,
        project_code: &str,
        entry_id: &str,
    ) -> Result<Vec<ApprovalStep>> {
        let entry = self.load(project_code, entry_id).await?;
        Ok(entry.approval_history)
    }
}
