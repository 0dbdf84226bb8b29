use crate::domain::approval::{ApprovalRole, ApprovalStep};
use crate::domain::money::Money;
use crate::error::{BuyoutError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Workflow state of a commitment.
///
/// `PxApproved` is reachable but transient: the engine moves straight through
/// it in the common path (PX approval either escalates or finalizes in the
/// same transition).
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
pub enum CommitmentStatus {
    Budgeted,
    PendingReview,
    WaiverPending,
    PxApproved,
    ComplianceReview,
    CfoReview,
    Committed,
    Rejected,
}

impl std::fmt::Display for CommitmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Budgeted => "Budgeted",
            Self::PendingReview => "Pending Review",
            Self::WaiverPending => "Waiver Pending",
            Self::PxApproved => "PX Approved",
            Self::ComplianceReview => "Compliance Review",
            Self::CfoReview => "CFO Review",
            Self::Committed => "Committed",
            Self::Rejected => "Rejected",
        };
        f.write_str(label)
    }
}

/// Legacy lifecycle tag carried alongside the workflow state.
///
/// `Executed` is set only when the final approval commits the entry.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
pub enum LifecycleStatus {
    #[default]
    NotStarted,
    InProgress,
    Awarded,
    Executed,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "snake_case")]
pub enum EVerifyStatus {
    #[default]
    NotSent,
    Sent,
    Reminder,
    Received,
    Overdue,
}

impl EVerifyStatus {
    /// Sent but not yet confirmed (includes never-sent).
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::NotSent | Self::Sent | Self::Reminder)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
pub enum WaiverType {
    Sdi,
    Bond,
    Multiple,
}

/// Document checklist a subcontractor must complete before award.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
pub struct ComplianceChecklist {
    pub w9_on_file: bool,
    pub license_verified: bool,
    pub safety_program_received: bool,
}

impl ComplianceChecklist {
    pub fn is_complete(&self) -> bool {
        self.w9_on_file && self.license_verified && self.safety_program_received
    }
}

/// One row per division/scope-of-work for a project.
///
/// `total_budget` and `over_under` are derived fields: every mutation path
/// goes through [`CommitmentEntry::recalculate`], caller-supplied values for
/// them are never trusted.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct CommitmentEntry {
    pub id: String,
    pub project_code: String,
    pub division_code: String,
    pub division_description: String,
    pub is_standard: bool,
    pub original_budget: Money,
    pub estimated_tax: Money,
    pub total_budget: Money,
    pub subcontractor_name: Option<String>,
    pub contract_value: Option<Money>,
    pub over_under: Option<Decimal>,
    pub enrolled_in_sdi: bool,
    pub bond_required: bool,
    pub q_score: Option<u8>,
    pub checklist: ComplianceChecklist,
    pub exhibit_c_insurance: bool,
    pub e_verify_status: EVerifyStatus,
    pub commitment_status: CommitmentStatus,
    pub waiver_required: bool,
    pub waiver_type: Option<WaiverType>,
    pub waiver_reason: Option<String>,
    pub current_step: Option<ApprovalRole>,
    pub approval_history: Vec<ApprovalStep>,
    pub lifecycle: LifecycleStatus,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl CommitmentEntry {
    pub fn new(
        id: impl Into<String>,
        project_code: impl Into<String>,
        division_code: impl Into<String>,
        division_description: impl Into<String>,
        original_budget: Money,
        estimated_tax: Money,
    ) -> Self {
        let now = Utc::now();
        let mut entry = Self {
            id: id.into(),
            project_code: project_code.into(),
            division_code: division_code.into(),
            division_description: division_description.into(),
            is_standard: false,
            original_budget,
            estimated_tax,
            total_budget: Money::ZERO,
            subcontractor_name: None,
            contract_value: None,
            over_under: None,
            enrolled_in_sdi: false,
            bond_required: false,
            q_score: None,
            checklist: ComplianceChecklist::default(),
            exhibit_c_insurance: false,
            e_verify_status: EVerifyStatus::default(),
            commitment_status: CommitmentStatus::Budgeted,
            waiver_required: false,
            waiver_type: None,
            waiver_reason: None,
            current_step: None,
            approval_history: Vec::new(),
            lifecycle: LifecycleStatus::default(),
            created_at: now,
            modified_at: now,
        };
        entry.recalculate();
        entry
    }

    /// Recomputes the derived budget fields from their sources.
    ///
    /// Invariants: `total_budget == original_budget + estimated_tax`;
    /// `over_under` is present iff `contract_value` is, and equals
    /// `total_budget - contract_value`.
    pub fn recalculate(&mut self) {
        self.total_budget = self.original_budget + self.estimated_tax;
        self.over_under = self.contract_value.map(|cv| self.total_budget - cv);
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.modified_at = now;
    }

    /// The currently pending step, if any.
    ///
    /// The pending step is always the tail of the history; `current_step`
    /// is a weak reference into the log, never a second source of truth.
    pub fn pending_step(&self) -> Option<&ApprovalStep> {
        self.current_step?;
        self.approval_history.last().filter(|s| s.is_pending())
    }

    pub fn pending_step_mut(&mut self) -> Option<&mut ApprovalStep> {
        self.current_step?;
        self.approval_history.last_mut().filter(|s| s.is_pending())
    }

    /// Applies a partial update, revalidating and recomputing derived fields.
    pub fn apply(&mut self, update: CommitmentUpdate) -> Result<()> {
        if let Some(score) = update.q_score
            && score > 100
        {
            return Err(BuyoutError::ValidationError(format!(
                "q-score must be within 0-100, got {score}"
            )));
        }

        if let Some(desc) = update.division_description {
            self.division_description = desc;
        }
        if let Some(budget) = update.original_budget {
            self.original_budget = budget;
        }
        if let Some(tax) = update.estimated_tax {
            self.estimated_tax = tax;
        }
        if let Some(name) = update.subcontractor_name {
            self.subcontractor_name = Some(name);
        }
        if let Some(value) = update.contract_value {
            self.contract_value = Some(value);
        }
        if let Some(sdi) = update.enrolled_in_sdi {
            self.enrolled_in_sdi = sdi;
        }
        if let Some(bond) = update.bond_required {
            self.bond_required = bond;
        }
        if let Some(score) = update.q_score {
            self.q_score = Some(score);
        }
        if let Some(checklist) = update.checklist {
            self.checklist = checklist;
        }
        if let Some(insurance) = update.exhibit_c_insurance {
            self.exhibit_c_insurance = insurance;
        }
        if let Some(status) = update.e_verify_status {
            self.e_verify_status = status;
        }
        if let Some(reason) = update.waiver_reason {
            self.waiver_reason = Some(reason);
        }
        if let Some(lifecycle) = update.lifecycle {
            self.lifecycle = lifecycle;
        }

        self.recalculate();
        Ok(())
    }
}

/// Partial update applied through the store; absent fields are left alone.
#[derive(Debug, Clone, Default)]
pub struct CommitmentUpdate {
    pub division_description: Option<String>,
    pub original_budget: Option<Money>,
    pub estimated_tax: Option<Money>,
    pub subcontractor_name: Option<String>,
    pub contract_value: Option<Money>,
    pub enrolled_in_sdi: Option<bool>,
    pub bond_required: Option<bool>,
    pub q_score: Option<u8>,
    pub checklist: Option<ComplianceChecklist>,
    pub exhibit_c_insurance: Option<bool>,
    pub e_verify_status: Option<EVerifyStatus>,
    pub waiver_reason: Option<String>,
    pub lifecycle: Option<LifecycleStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn entry() -> CommitmentEntry {
        CommitmentEntry::new(
            "e1",
            "P-100",
            "03-3000",
            "Concrete",
            Money::new(dec!(100000)).unwrap(),
            Money::new(dec!(8250)).unwrap(),
        )
    }

    #[test]
    fn test_new_entry_derives_total() {
        let e = entry();
        assert_eq!(e.total_budget, Money::new(dec!(108250)).unwrap());
        assert_eq!(e.over_under, None);
        assert_eq!(e.commitment_status, CommitmentStatus::Budgeted);
        assert_eq!(e.lifecycle, LifecycleStatus::NotStarted);
    }

    #[test]
    fn test_apply_recomputes_over_under() {
        let mut e = entry();
        e.apply(CommitmentUpdate {
            subcontractor_name: Some("Acme Concrete".to_string()),
            contract_value: Some(Money::new(dec!(95000)).unwrap()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(e.over_under, Some(dec!(13250)));

        // Budget change moves both derived fields
        e.apply(CommitmentUpdate {
            original_budget: Some(Money::new(dec!(90000)).unwrap()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(e.total_budget, Money::new(dec!(98250)).unwrap());
        assert_eq!(e.over_under, Some(dec!(3250)));
    }

    #[test]
    fn test_apply_rejects_out_of_range_q_score() {
        let mut e = entry();
        let before = e.clone();
        let result = e.apply(CommitmentUpdate {
            q_score: Some(101),
            ..Default::default()
        });
        assert!(matches!(result, Err(BuyoutError::ValidationError(_))));
        assert_eq!(e, before);
    }

    #[test]
    fn test_pending_step_requires_pointer_and_pending_tail() {
        use crate::domain::approval::{Actor, ApprovalRole, ApprovalStep, StepStatus};

        let mut e = entry();
        assert!(e.pending_step().is_none());

        e.approval_history.push(ApprovalStep::pending(
            "e1",
            "P-100",
            ApprovalRole::Px,
            &Actor::default(),
        ));
        // History has a pending tail but no pointer: not considered pending.
        assert!(e.pending_step().is_none());

        e.current_step = Some(ApprovalRole::Px);
        assert!(e.pending_step().is_some());

        e.approval_history[0].status = StepStatus::Approved;
        assert!(e.pending_step().is_none());
    }
}
