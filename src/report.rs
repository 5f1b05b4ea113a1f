use std::fmt::Write;

use crate::config::Config;
use crate::distribution;
use crate::grades::{self, format_gpa};
use crate::models::GradedRecord;

pub fn build_transcript(student: Option<&str>, records: &[GradedRecord], config: &Config) -> String {
    let decimals = config.gpa_decimals;
    let summaries = grades::term_summaries(records);
    let buckets = distribution::distribution(records);

    let mut output = String::new();
    let student_label = student.unwrap_or("unnamed student");

    let _ = writeln!(output, "# Unofficial Transcript");
    let _ = writeln!(
        output,
        "Generated for {} ({} courses across {} terms)",
        student_label,
        records.len(),
        summaries.len()
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Summary");
    let _ = writeln!(
        output,
        "- Cumulative GPA: {}",
        format_gpa(grades::gpa(records), decimals)
    );
    let _ = writeln!(
        output,
        "- Credits attempted: {}",
        grades::credits_attempted(records)
    );
    let _ = writeln!(output, "- Credits earned: {}", grades::credits_earned(records));

    let _ = writeln!(output);
    let _ = writeln!(output, "## Terms");

    if summaries.is_empty() {
        let _ = writeln!(output, "No courses on record.");
    } else {
        let _ = writeln!(output, "| Term | GPA | Cumulative | Attempted | Earned |");
        let _ = writeln!(output, "| --- | --- | --- | --- | --- |");
        for summary in summaries.iter() {
            let _ = writeln!(
                output,
                "| {} | {} | {} | {} | {} |",
                summary.term,
                format_gpa(summary.gpa, decimals),
                format_gpa(summary.cumulative_gpa, decimals),
                summary.credits_attempted,
                summary.credits_earned
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Grade Mix");

    if buckets.is_empty() {
        let _ = writeln!(output, "No posted grades.");
    } else {
        for bucket in buckets.iter() {
            let _ = writeln!(
                output,
                "- {}: {} ({:.1}%)",
                bucket.grade, bucket.count, bucket.percentage
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Recent Courses");

    if records.is_empty() {
        let _ = writeln!(output, "No courses on record.");
    } else {
        for record in records.iter().rev().take(config.report_recent_courses) {
            let grade = record
                .grade
                .map(|g| g.to_string())
                .unwrap_or_else(|| "in progress".to_string());
            let _ = writeln!(
                output,
                "- {} ({}, {} credits): {}",
                record.course, record.term, record.credits, grade
            );
        }
    }

    output
}
