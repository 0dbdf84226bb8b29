use crate::application::compliance::{ComplianceRow, ComplianceSummary};
use crate::error::Result;
use std::io::Write;

/// Writes the compliance report as CSV: one table of per-commitment rows
/// followed by a one-row summary table.
pub struct ComplianceWriter<W: Write> {
    inner: W,
}

impl<W: Write> ComplianceWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn write_report(
        mut self,
        rows: &[ComplianceRow],
        summary: &ComplianceSummary,
    ) -> Result<()> {
        {
            let mut wtr = csv::Writer::from_writer(&mut self.inner);
            for row in rows {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
        }

        writeln!(self.inner)?;

        let mut wtr = csv::Writer::from_writer(&mut self.inner);
        wtr.serialize(summary)?;
        wtr.flush()?;
        Ok(())
    }
}
