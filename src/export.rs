use std::io::Write;
use std::path::Path;

use anyhow::Context;
use tracing::info;

use crate::models::{GradeDistributionBucket, Installment};

pub fn write_schedule_csv<W: Write>(output: W, installments: &[Installment]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(output);
    writer.write_record(["number", "amount", "due_date"])?;
    for installment in installments {
        writer.write_record([
            installment.number.to_string(),
            installment.amount.to_string(),
            installment.due_date.format("%Y-%m-%d").to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_distribution_csv<W: Write>(
    output: W,
    buckets: &[GradeDistributionBucket],
) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(output);
    writer.write_record(["grade", "count", "percentage"])?;
    for bucket in buckets {
        writer.write_record([
            bucket.grade.to_string(),
            bucket.count.to_string(),
            format!("{:.1}", bucket.percentage),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Run `write` against a freshly created file at `path`.
pub fn to_file<F>(path: &Path, write: F) -> anyhow::Result<()>
where
    F: FnOnce(std::fs::File) -> anyhow::Result<()>,
{
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    write(file)?;
    info!(path = %path.display(), "export written");
    Ok(())
}
