use std::io::Read;
use std::path::Path;

use anyhow::Context;
use tracing::{debug, info};

use crate::models::{GradedRecord, LetterGrade, MeetingPattern};

#[derive(serde::Deserialize)]
struct RecordRow {
    course: String,
    term: String,
    grade: Option<String>,
    credits: f64,
}

#[derive(serde::Deserialize)]
struct SectionRow {
    label: String,
    days: String,
    start: String,
    end: String,
}

impl RecordRow {
    /// A blank or missing grade means ungraded.
    fn into_record(self, location: &str) -> anyhow::Result<GradedRecord> {
        let grade = match self.grade.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(text) => Some(
                text.parse::<LetterGrade>()
                    .with_context(|| format!("{location} ({})", self.course))?,
            ),
        };

        let record = GradedRecord::new(self.course, self.term, grade, self.credits);
        record.validate().with_context(|| location.to_string())?;
        Ok(record)
    }
}

/// Read `course,term,grade,credits` rows.
pub fn read_records<R: Read>(input: R) -> anyhow::Result<Vec<GradedRecord>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(input);
    let mut records = Vec::new();

    for (index, result) in reader.deserialize::<RecordRow>().enumerate() {
        let line = index + 2;
        let row = result.with_context(|| format!("malformed record on line {line}"))?;
        records.push(row.into_record(&format!("line {line}"))?);
    }

    debug!(count = records.len(), "parsed graded records");
    Ok(records)
}

pub fn load_records(path: &Path) -> anyhow::Result<Vec<GradedRecord>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let records = read_records(file)?;
    info!(path = %path.display(), count = records.len(), "loaded records");
    Ok(records)
}

/// Records as the portal backend returns them: a JSON array of
/// `{course, term, grade, credits}` objects with `grade` null or blank
/// when ungraded.
pub fn read_records_json<R: Read>(input: R) -> anyhow::Result<Vec<GradedRecord>> {
    let rows: Vec<RecordRow> = serde_json::from_reader(input).context("invalid record JSON")?;
    let records = rows
        .into_iter()
        .enumerate()
        .map(|(index, row)| row.into_record(&format!("record {}", index + 1)))
        .collect::<anyhow::Result<Vec<_>>>()?;

    debug!(count = records.len(), "parsed graded records");
    Ok(records)
}

pub fn load_records_json(path: &Path) -> anyhow::Result<Vec<GradedRecord>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let records =
        read_records_json(file).with_context(|| format!("in {}", path.display()))?;
    info!(path = %path.display(), count = records.len(), "loaded records");
    Ok(records)
}

/// Read `label,days,start,end` rows.
pub fn read_sections<R: Read>(input: R) -> anyhow::Result<Vec<MeetingPattern>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(input);
    let mut sections = Vec::new();

    for (index, result) in reader.deserialize::<SectionRow>().enumerate() {
        let line = index + 2;
        let row = result.with_context(|| format!("malformed section on line {line}"))?;
        let section = MeetingPattern::parse(&row.label, &row.days, &row.start, &row.end)
            .with_context(|| format!("line {line} ({})", row.label))?;
        sections.push(section);
    }

    debug!(count = sections.len(), "parsed meeting patterns");
    Ok(sections)
}

pub fn load_sections(path: &Path) -> anyhow::Result<Vec<MeetingPattern>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let sections = read_sections(file)?;
    info!(path = %path.display(), count = sections.len(), "loaded sections");
    Ok(sections)
}
