use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error("Unrecognized letter grade: {0:?}")]
    InvalidGrade(String),

    #[error("Invalid installment schedule: {0}")]
    InvalidSchedule(String),

    #[error("Invalid credits for {course}: {credits}")]
    InvalidCredits { course: String, credits: f64 },

    #[error("Invalid meeting pattern: {0}")]
    InvalidMeeting(String),

    #[error("Unrecognized meeting days: {0:?}")]
    InvalidDays(String),
}
