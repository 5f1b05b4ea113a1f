use std::collections::BTreeMap;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::CalcError;
use crate::models::{GradedRecord, LetterGrade, TermSummary};

/// Decimal places a GPA is reported to.
pub const GPA_DECIMALS: u32 = 2;

pub fn grade_points(grade: LetterGrade) -> Option<f64> {
    let points = match grade {
        LetterGrade::APlus | LetterGrade::A => 4.0,
        LetterGrade::AMinus => 3.7,
        LetterGrade::BPlus => 3.3,
        LetterGrade::B => 3.0,
        LetterGrade::BMinus => 2.7,
        LetterGrade::CPlus => 2.3,
        LetterGrade::C => 2.0,
        LetterGrade::CMinus => 1.7,
        LetterGrade::DPlus => 1.3,
        LetterGrade::D => 1.0,
        LetterGrade::DMinus => 0.7,
        LetterGrade::F => 0.0,
        LetterGrade::P | LetterGrade::W | LetterGrade::I => return None,
    };
    Some(points)
}

/// String entry point for callers holding raw grade text. Blank or absent
/// grades are ungraded; anything outside the grade set is an error.
pub fn grade_points_for(grade: Option<&str>) -> Result<Option<f64>, CalcError> {
    match grade.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => Ok(grade_points(text.parse()?)),
    }
}

fn record_points(record: &GradedRecord) -> Option<f64> {
    record.grade.and_then(grade_points)
}

/// Credits for courses passed with positive grade points. F earns nothing
/// and P/W/I are left out entirely.
pub fn credits_earned(records: &[GradedRecord]) -> f64 {
    records
        .iter()
        .filter(|r| record_points(r).is_some_and(|p| p > 0.0))
        .map(|r| r.credits)
        .sum()
}

/// Credits that count toward GPA, failing grades included.
pub fn credits_attempted(records: &[GradedRecord]) -> f64 {
    records
        .iter()
        .filter(|r| record_points(r).is_some())
        .map(|r| r.credits)
        .sum()
}

/// Credit-weighted grade-point average, rounded to [`GPA_DECIMALS`].
/// `None` when nothing contributes.
pub fn gpa(records: &[GradedRecord]) -> Option<f64> {
    gpa_of(records.iter())
}

fn gpa_of<'a>(records: impl Iterator<Item = &'a GradedRecord>) -> Option<f64> {
    let (quality_points, credits) = records
        .filter_map(|r| record_points(r).map(|p| (p * r.credits, r.credits)))
        .fold((0.0, 0.0), |(qp, cr), (p, c)| (qp + p, cr + c));

    if credits > 0.0 {
        Some(round_to(quality_points / credits, GPA_DECIMALS))
    } else {
        None
    }
}

pub fn gpa_by_term(records: &[GradedRecord]) -> BTreeMap<String, Option<f64>> {
    let mut grouped: BTreeMap<String, Vec<&GradedRecord>> = BTreeMap::new();
    for record in records {
        grouped.entry(record.term.clone()).or_default().push(record);
    }

    grouped
        .into_iter()
        .map(|(term, group)| {
            let value = gpa_of(group.into_iter());
            (term, value)
        })
        .collect()
}

/// Transcript rows, one per term in order of first appearance, each with
/// the cumulative GPA through that term.
pub fn term_summaries(records: &[GradedRecord]) -> Vec<TermSummary> {
    let mut terms: Vec<&str> = Vec::new();
    for record in records {
        if !terms.contains(&record.term.as_str()) {
            terms.push(&record.term);
        }
    }

    let mut summaries = Vec::with_capacity(terms.len());
    for (index, term) in terms.iter().enumerate() {
        let in_term: Vec<GradedRecord> = records
            .iter()
            .filter(|r| r.term == *term)
            .cloned()
            .collect();
        let through_term = &terms[..=index];
        let cumulative = gpa_of(
            records
                .iter()
                .filter(|r| through_term.contains(&r.term.as_str())),
        );

        summaries.push(TermSummary {
            term: term.to_string(),
            gpa: gpa(&in_term),
            cumulative_gpa: cumulative,
            credits_attempted: credits_attempted(&in_term),
            credits_earned: credits_earned(&in_term),
        });
    }
    summaries
}

/// Round half away from zero on the value's shortest decimal form, so
/// 2.675 rounds to 2.68 even though its binary value sits just below.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let exact = value
        .to_string()
        .parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_f64(value));
    exact
        .map(|d| d.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_string().parse::<f64>().ok())
        .unwrap_or(value)
}

pub fn format_gpa(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{v:.decimals$}"),
        None => "N/A".to_string(),
    }
}
