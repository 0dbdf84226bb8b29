use crate::domain::commitment::{CommitmentEntry, ComplianceChecklist, EVerifyStatus};
use crate::domain::money::Money;
use crate::error::{BuyoutError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

/// One raw CSV row describing a commitment to seed into the store.
///
/// Derived fields (`total_budget`, `over_under`) are deliberately absent:
/// they are always recomputed by the domain, never read from input.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct CommitmentRecord {
    pub project: String,
    pub entry: String,
    pub division_code: String,
    pub division_description: String,
    pub original_budget: Decimal,
    pub estimated_tax: Decimal,
    #[serde(default)]
    pub subcontractor: Option<String>,
    #[serde(default)]
    pub contract_value: Option<Decimal>,
    #[serde(default)]
    pub enrolled_in_sdi: Option<bool>,
    #[serde(default)]
    pub bond_required: Option<bool>,
    #[serde(default)]
    pub q_score: Option<u8>,
    #[serde(default)]
    pub w9_on_file: Option<bool>,
    #[serde(default)]
    pub license_verified: Option<bool>,
    #[serde(default)]
    pub safety_program_received: Option<bool>,
    #[serde(default)]
    pub exhibit_c_insurance: Option<bool>,
    #[serde(default)]
    pub e_verify_status: Option<EVerifyStatus>,
}

impl CommitmentRecord {
    /// Validates the raw row into a domain entry.
    pub fn into_entry(self) -> Result<CommitmentEntry> {
        if let Some(score) = self.q_score
            && score > 100
        {
            return Err(BuyoutError::ValidationError(format!(
                "q-score must be within 0-100, got {score}"
            )));
        }

        let mut entry = CommitmentEntry::new(
            self.entry,
            self.project,
            self.division_code,
            self.division_description,
            Money::new(self.original_budget)?,
            Money::new(self.estimated_tax)?,
        );
        entry.subcontractor_name = self.subcontractor.filter(|s| !s.is_empty());
        entry.contract_value = self.contract_value.map(Money::new).transpose()?;
        entry.enrolled_in_sdi = self.enrolled_in_sdi.unwrap_or(false);
        entry.bond_required = self.bond_required.unwrap_or(false);
        entry.q_score = self.q_score;
        entry.checklist = ComplianceChecklist {
            w9_on_file: self.w9_on_file.unwrap_or(false),
            license_verified: self.license_verified.unwrap_or(false),
            safety_program_received: self.safety_program_received.unwrap_or(false),
        };
        entry.exhibit_c_insurance = self.exhibit_c_insurance.unwrap_or(false);
        entry.e_verify_status = self.e_verify_status.unwrap_or_default();
        entry.recalculate();
        Ok(entry)
    }
}

/// Reads commitment rows from a CSV source.
///
/// Wraps `csv::Reader` and provides an iterator over `Result<CommitmentRecord>`,
/// trimming whitespace and tolerating short records so large files stream
/// without loading everything into memory.
pub struct CommitmentReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CommitmentReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    pub fn records(self) -> impl Iterator<Item = Result<CommitmentRecord>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(BuyoutError::from))
    }
}
