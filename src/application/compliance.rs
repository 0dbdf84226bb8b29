use crate::domain::commitment::{CommitmentEntry, CommitmentStatus, EVerifyStatus};
use crate::domain::risk::evaluate_risk;
use serde::Serialize;

/// Compliance posture of one awarded commitment.
///
/// Derived read-only from current store state; only entries with a named
/// subcontractor carry compliance obligations, so unawarded rows never
/// appear here.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct ComplianceRow {
    pub project_code: String,
    pub entry_id: String,
    pub division_code: String,
    pub division_description: String,
    pub subcontractor_name: String,
    pub commitment_status: CommitmentStatus,
    pub risk_compliant: bool,
    pub documents_compliant: bool,
    pub insurance_compliant: bool,
    pub e_verify_compliant: bool,
    pub overall_compliant: bool,
}

impl ComplianceRow {
    fn derive(entry: &CommitmentEntry, subcontractor_name: &str) -> Self {
        let risk_compliant = !evaluate_risk(entry).requires_waiver;
        let documents_compliant = entry.checklist.is_complete();
        let insurance_compliant = entry.exhibit_c_insurance;
        let e_verify_compliant = entry.e_verify_status == EVerifyStatus::Received;

        Self {
            project_code: entry.project_code.clone(),
            entry_id: entry.id.clone(),
            division_code: entry.division_code.clone(),
            division_description: entry.division_description.clone(),
            subcontractor_name: subcontractor_name.to_string(),
            commitment_status: entry.commitment_status,
            risk_compliant,
            documents_compliant,
            insurance_compliant,
            e_verify_compliant,
            overall_compliant: risk_compliant
                && documents_compliant
                && insurance_compliant
                && e_verify_compliant,
        }
    }
}

/// Filter applied before derivation.
///
/// `search` matches case-insensitively against subcontractor name and
/// division description.
#[derive(Debug, Default, Clone)]
pub struct ComplianceFilter {
    pub project_code: Option<String>,
    pub commitment_status: Option<CommitmentStatus>,
    pub search: Option<String>,
}

impl ComplianceFilter {
    fn matches(&self, entry: &CommitmentEntry, subcontractor_name: &str) -> bool {
        if let Some(project) = &self.project_code
            && entry.project_code != *project
        {
            return false;
        }
        if let Some(status) = self.commitment_status
            && entry.commitment_status != status
        {
            return false;
        }
        if let Some(needle) = &self.search {
            let needle = needle.to_lowercase();
            let in_sub = subcontractor_name.to_lowercase().contains(&needle);
            let in_div = entry.division_description.to_lowercase().contains(&needle);
            if !in_sub && !in_div {
                return false;
            }
        }
        true
    }
}

/// Derives the compliance log view for the given entries.
pub fn compliance_rows(entries: &[CommitmentEntry], filter: &ComplianceFilter) -> Vec<ComplianceRow> {
    entries
        .iter()
        .filter_map(|entry| {
            let name = entry.subcontractor_name.as_deref()?;
            if name.is_empty() || !filter.matches(entry, name) {
                return None;
            }
            Some(ComplianceRow::derive(entry, name))
        })
        .collect()
}

/// Aggregated counts over the (filtered) compliance view.
#[derive(Debug, Serialize, PartialEq, Eq, Clone, Default)]
pub struct ComplianceSummary {
    pub total_commitments: usize,
    pub fully_compliant: usize,
    pub e_verify_pending: usize,
    pub e_verify_overdue: usize,
    pub waivers_pending: usize,
    pub documents_missing: usize,
}

pub fn compliance_summary(
    entries: &[CommitmentEntry],
    filter: &ComplianceFilter,
) -> ComplianceSummary {
    let mut summary = ComplianceSummary::default();

    for entry in entries {
        let Some(name) = entry.subcontractor_name.as_deref() else {
            continue;
        };
        if name.is_empty() || !filter.matches(entry, name) {
            continue;
        }

        summary.total_commitments += 1;
        let row = ComplianceRow::derive(entry, name);
        if row.overall_compliant {
            summary.fully_compliant += 1;
        }
        if entry.e_verify_status.is_pending() {
            summary.e_verify_pending += 1;
        }
        if entry.e_verify_status == EVerifyStatus::Overdue {
            summary.e_verify_overdue += 1;
        }
        if entry.commitment_status == CommitmentStatus::WaiverPending {
            summary.waivers_pending += 1;
        }
        if !row.documents_compliant {
            summary.documents_missing += 1;
        }
    }

    summary
}
