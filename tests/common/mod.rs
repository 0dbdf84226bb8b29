use std::fs::File;
use std::io::{Error, Write};
use std::path::Path;

pub const COMMITMENT_HEADER: &str = "project,entry,division_code,division_description,original_budget,estimated_tax,subcontractor,contract_value,enrolled_in_sdi,bond_required,q_score,w9_on_file,license_verified,safety_program_received,exhibit_c_insurance,e_verify_status";

pub const ACTION_HEADER: &str = "action,project,entry,actor_name,actor_email,comment,escalate";

pub fn write_commitments(path: &Path, rows: &[&str]) -> Result<(), Error> {
    write_csv(path, COMMITMENT_HEADER, rows)
}

pub fn write_actions(path: &Path, rows: &[&str]) -> Result<(), Error> {
    write_csv(path, ACTION_HEADER, rows)
}

fn write_csv(path: &Path, header: &str, rows: &[&str]) -> Result<(), Error> {
    let mut file = File::create(path)?;
    writeln!(file, "{header}")?;
    for row in rows {
        writeln!(file, "{row}")?;
    }
    file.flush()
}
