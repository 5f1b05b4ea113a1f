use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use clap::{ArgGroup, Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sis_calc::config::Config;
use sis_calc::grades::format_gpa;
use sis_calc::models::GradedRecord;
use sis_calc::{conflicts, distribution, export, grades, import, installments, report};

#[derive(Parser)]
#[command(name = "sis-calc")]
#[command(about = "GPA, grade distribution, payment plan and schedule conflict calculations", long_about = None)]
struct Cli {
    /// Config file (defaults to $SIS_CALC_CONFIG, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
#[command(group(
    ArgGroup::new("source")
        .args(["csv", "json"])
        .required(true)
        .multiple(false)
))]
struct RecordSource {
    /// CSV with course,term,grade,credits columns
    #[arg(long)]
    csv: Option<PathBuf>,
    /// JSON array of records
    #[arg(long)]
    json: Option<PathBuf>,
}

impl RecordSource {
    fn load(&self) -> anyhow::Result<Vec<GradedRecord>> {
        match (&self.csv, &self.json) {
            (Some(path), _) => import::load_records(path),
            (_, Some(path)) => import::load_records_json(path),
            (None, None) => anyhow::bail!("either --csv or --json is required"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file
    InitConfig {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Cumulative and per-term GPA with credit totals
    Gpa {
        #[command(flatten)]
        source: RecordSource,
    },
    /// Grade histogram for a roster
    Distribution {
        #[command(flatten)]
        source: RecordSource,
        /// Include grades nobody received
        #[arg(long)]
        dense: bool,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Monthly payment plan for a balance
    Installments {
        #[arg(long)]
        total: Decimal,
        #[arg(long)]
        count: u32,
        /// First due date (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Check a registration cart for overlapping sections
    Conflicts {
        /// CSV with label,days,start,end columns
        #[arg(long)]
        csv: PathBuf,
    },
    /// Generate a markdown transcript
    Transcript {
        #[command(flatten)]
        source: RecordSource,
        #[arg(long)]
        student: Option<String>,
        #[arg(long, default_value = "transcript.md")]
        out: PathBuf,
    },
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    init_tracing(&config.log_filter);

    match cli.command {
        Commands::InitConfig { out } => {
            let path = match out.or(cli.config) {
                Some(path) => path,
                None => Config::default_path().context("could not find config directory")?,
            };
            Config::default().save(&path)?;
            println!("Config written to {}.", path.display());
        }
        Commands::Gpa { source } => {
            let records = source.load()?;
            let decimals = config.gpa_decimals;

            println!(
                "Cumulative GPA: {}",
                format_gpa(grades::gpa(&records), decimals)
            );
            println!(
                "Credits attempted {} / earned {}",
                grades::credits_attempted(&records),
                grades::credits_earned(&records)
            );
            for summary in grades::term_summaries(&records) {
                println!(
                    "- {}: term {} cumulative {}",
                    summary.term,
                    format_gpa(summary.gpa, decimals),
                    format_gpa(summary.cumulative_gpa, decimals)
                );
            }
        }
        Commands::Distribution { source, dense, out } => {
            let records = source.load()?;
            let buckets = if dense {
                distribution::dense_distribution(&records)
            } else {
                distribution::distribution(&records)
            };

            if buckets.is_empty() {
                println!("No posted grades.");
                return Ok(());
            }

            for bucket in buckets.iter() {
                println!(
                    "- {}: {} ({:.1}%)",
                    bucket.grade, bucket.count, bucket.percentage
                );
            }
            println!(
                "Average GPA: {}",
                format_gpa(distribution::average_gpa(&records), config.gpa_decimals)
            );
            write_optional(out.as_deref(), |file| {
                export::write_distribution_csv(file, &buckets)
            })?;
        }
        Commands::Installments {
            total,
            count,
            start,
            out,
        } => {
            let schedule = installments::generate_schedule(total, count, start)?;
            for installment in schedule.iter() {
                println!(
                    "{:>3}  {:>12}  {}",
                    installment.number, installment.amount, installment.due_date
                );
            }
            println!("Total: {}", installments::schedule_total(&schedule));
            write_optional(out.as_deref(), |file| {
                export::write_schedule_csv(file, &schedule)
            })?;
        }
        Commands::Conflicts { csv } => {
            let sections = import::load_sections(&csv)?;
            if !conflicts::has_conflict(&sections) {
                println!("No conflicts across {} sections.", sections.len());
                return Ok(());
            }

            println!("Conflicting sections:");
            for pair in conflicts::find_conflicts(&sections).iter() {
                let days: Vec<String> = pair.shared_days.iter().map(|d| d.to_string()).collect();
                println!("- {} and {} on {}", pair.first, pair.second, days.join(", "));
            }
        }
        Commands::Transcript {
            source,
            student,
            out,
        } => {
            let records = source.load()?;
            let transcript = report::build_transcript(student.as_deref(), &records, &config);
            std::fs::write(&out, transcript)
                .with_context(|| format!("failed to write {}", out.display()))?;
            info!(path = %out.display(), "transcript written");
            println!("Transcript written to {}.", out.display());
        }
    }

    Ok(())
}

fn write_optional<F>(out: Option<&Path>, write: F) -> anyhow::Result<()>
where
    F: FnOnce(std::fs::File) -> anyhow::Result<()>,
{
    if let Some(path) = out {
        export::to_file(path, write)?;
        println!("Exported to {}.", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn transcript_defaults_to_transcript_md() {
        let cli = Cli::try_parse_from(["sis-calc", "transcript", "--csv", "records.csv"]).unwrap();
        match cli.command {
            Commands::Transcript { out, student, .. } => {
                assert_eq!(out, PathBuf::from("transcript.md"));
                assert_eq!(student, None);
            }
            _ => panic!("expected transcript command"),
        }
    }

    #[test]
    fn record_source_requires_exactly_one_input() {
        assert!(Cli::try_parse_from(["sis-calc", "gpa"]).is_err());
        assert!(
            Cli::try_parse_from(["sis-calc", "gpa", "--csv", "a.csv", "--json", "a.json"]).is_err()
        );
        assert!(Cli::try_parse_from(["sis-calc", "gpa", "--json", "a.json"]).is_ok());
    }

    #[test]
    fn installments_parse_decimal_and_date() {
        let cli = Cli::try_parse_from([
            "sis-calc",
            "installments",
            "--total",
            "1000.00",
            "--count",
            "3",
            "--start",
            "2024-01-15",
        ])
        .unwrap();
        match cli.command {
            Commands::Installments {
                total, count, start, ..
            } => {
                assert_eq!(total, Decimal::new(100000, 2));
                assert_eq!(count, 3);
                assert_eq!(start, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
            }
            _ => panic!("expected installments command"),
        }
    }
}
