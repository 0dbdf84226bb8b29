use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The role responsible for an approval hop.
///
/// `Px` (Project Executive) is the entry point of every workflow;
/// `ComplianceManager` is reached by automatic risk-driven escalation and
/// `Cfo` only by discretionary escalation from the compliance step.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
pub enum ApprovalRole {
    Px,
    ComplianceManager,
    Cfo,
}

impl std::fmt::Display for ApprovalRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Px => "PX",
            Self::ComplianceManager => "Compliance Manager",
            Self::Cfo => "CFO",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
pub enum StepStatus {
    Pending,
    Approved,
    Rejected,
    Escalated,
}

/// One record per workflow hop.
///
/// The history an entry carries is append-only: once a step leaves `Pending`
/// it is never edited again, and only the currently pending tail record is
/// ever resolved in place.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct ApprovalStep {
    pub id: Uuid,
    pub entry_id: String,
    pub project_code: String,
    pub role: ApprovalRole,
    pub approver_name: String,
    pub approver_email: String,
    pub status: StepStatus,
    pub comment: Option<String>,
    pub action_date: Option<DateTime<Utc>>,
}

impl ApprovalStep {
    /// Creates a fresh pending step for the given role and entry.
    pub fn pending(
        entry_id: impl Into<String>,
        project_code: impl Into<String>,
        role: ApprovalRole,
        actor: &Actor,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            entry_id: entry_id.into(),
            project_code: project_code.into(),
            role,
            approver_name: actor.name.clone(),
            approver_email: actor.email.clone(),
            status: StepStatus::Pending,
            comment: None,
            action_date: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == StepStatus::Pending
    }

    /// Resolves this pending step in place with the final decision.
    pub fn resolve(&mut self, status: StepStatus, comment: Option<String>, at: DateTime<Utc>) {
        self.status = status;
        self.comment = comment;
        self.action_date = Some(at);
    }
}

/// The acting user attached to approval steps and audit records.
///
/// Identity resolution happens outside the workflow; callers that supply no
/// identity get the project-executive default.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Actor {
    pub name: String,
    pub email: String,
}

impl Actor {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// Placeholder identity for a step appended by the workflow itself
    /// (escalations), before a named approver picks it up.
    pub fn for_role(role: ApprovalRole) -> Self {
        match role {
            ApprovalRole::Px => Self::new("Project Executive", "px@example.com"),
            ApprovalRole::ComplianceManager => {
                Self::new("Compliance Manager", "compliance@example.com")
            }
            ApprovalRole::Cfo => Self::new("CFO", "cfo@example.com"),
        }
    }
}

impl Default for Actor {
    fn default() -> Self {
        Self::for_role(ApprovalRole::Px)
    }
}
