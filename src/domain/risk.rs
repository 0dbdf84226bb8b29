use crate::domain::approval::ApprovalRole;
use crate::domain::commitment::{CommitmentEntry, WaiverType};
use rust_decimal::Decimal;

/// Contract value at or above which a payment/performance bond is expected.
pub const BOND_THRESHOLD: Decimal = Decimal::from_parts(50_000, 0, 0, false, 0);
/// Contract value at or above which SDI enrollment (or a bond) is mandatory
/// and compliance sign-off moves to the Compliance Manager.
pub const SDI_THRESHOLD: Decimal = Decimal::from_parts(250_000, 0, 0, false, 0);
/// Prequalification score below which a subcontractor is flagged.
pub const Q_SCORE_FLOOR: u8 = 70;

/// Compliance-risk posture of a commitment at a single point in time.
///
/// Ephemeral by design: computed fresh from the entry's current fields every
/// time it is needed, never persisted or cached, since the fields may change
/// between submission and response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskAssessment {
    pub triggers: Vec<String>,
    pub requires_waiver: bool,
    pub escalation_level: ApprovalRole,
    pub q_score_warning: bool,
}

impl Default for RiskAssessment {
    fn default() -> Self {
        Self {
            triggers: Vec::new(),
            requires_waiver: false,
            escalation_level: ApprovalRole::Px,
            q_score_warning: false,
        }
    }
}

/// Evaluates the compliance-risk posture of a commitment.
///
/// Pure and deterministic: identical entry fields always yield an identical
/// assessment. Rules are evaluated independently; a later rule can raise but
/// never lower severity.
pub fn evaluate_risk(entry: &CommitmentEntry) -> RiskAssessment {
    let mut assessment = RiskAssessment::default();
    let value = entry
        .contract_value
        .map(Decimal::from)
        .unwrap_or(Decimal::ZERO);

    if value >= BOND_THRESHOLD && !entry.bond_required {
        assessment
            .triggers
            .push(format!("bond not required for contract >= ${BOND_THRESHOLD}"));
        assessment.requires_waiver = true;
    }

    if value >= SDI_THRESHOLD && (!entry.enrolled_in_sdi || !entry.bond_required) {
        assessment
            .triggers
            .push(format!("SDI/bond compliance gap for contract >= ${SDI_THRESHOLD}"));
        assessment.requires_waiver = true;
        assessment.escalation_level = ApprovalRole::ComplianceManager;
    }

    let q_score = entry.q_score.unwrap_or(100);
    if q_score < Q_SCORE_FLOOR {
        assessment.triggers.push(format!(
            "prequalification score {q_score} below floor of {Q_SCORE_FLOOR}"
        ));
        assessment.q_score_warning = true;
    }

    assessment
}

/// Determines which waiver a non-compliant commitment needs.
///
/// Only coverages the thresholds actually demand count as missing: a bond is
/// missing from `BOND_THRESHOLD` up, SDI enrollment from `SDI_THRESHOLD` up.
pub fn determine_waiver_type(entry: &CommitmentEntry) -> Option<WaiverType> {
    let value = entry
        .contract_value
        .map(Decimal::from)
        .unwrap_or(Decimal::ZERO);

    let bond_missing = value >= BOND_THRESHOLD && !entry.bond_required;
    let sdi_missing = value >= SDI_THRESHOLD && !entry.enrolled_in_sdi;

    match (sdi_missing, bond_missing) {
        (true, true) => Some(WaiverType::Multiple),
        (true, false) => Some(WaiverType::Sdi),
        (false, true) => Some(WaiverType::Bond),
        (false, false) => None,
    }
}
