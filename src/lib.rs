//! Academic and billing calculations for the student portal: GPA and
//! credit aggregation, grade distributions, payment-plan schedules, and
//! registration conflict detection.

pub mod config;
pub mod conflicts;
pub mod distribution;
pub mod error;
pub mod export;
pub mod grades;
pub mod import;
pub mod installments;
pub mod models;
pub mod report;

pub use error::CalcError;
