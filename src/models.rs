use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CalcError;

/// A posted letter grade. Variant order is the canonical histogram order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LetterGrade {
    APlus,
    A,
    AMinus,
    BPlus,
    B,
    BMinus,
    CPlus,
    C,
    CMinus,
    DPlus,
    D,
    DMinus,
    F,
    /// Pass
    P,
    /// Withdrawn
    W,
    /// Incomplete
    I,
}

impl LetterGrade {
    pub const ALL: [LetterGrade; 16] = [
        LetterGrade::APlus,
        LetterGrade::A,
        LetterGrade::AMinus,
        LetterGrade::BPlus,
        LetterGrade::B,
        LetterGrade::BMinus,
        LetterGrade::CPlus,
        LetterGrade::C,
        LetterGrade::CMinus,
        LetterGrade::DPlus,
        LetterGrade::D,
        LetterGrade::DMinus,
        LetterGrade::F,
        LetterGrade::P,
        LetterGrade::W,
        LetterGrade::I,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LetterGrade::APlus => "A+",
            LetterGrade::A => "A",
            LetterGrade::AMinus => "A-",
            LetterGrade::BPlus => "B+",
            LetterGrade::B => "B",
            LetterGrade::BMinus => "B-",
            LetterGrade::CPlus => "C+",
            LetterGrade::C => "C",
            LetterGrade::CMinus => "C-",
            LetterGrade::DPlus => "D+",
            LetterGrade::D => "D",
            LetterGrade::DMinus => "D-",
            LetterGrade::F => "F",
            LetterGrade::P => "P",
            LetterGrade::W => "W",
            LetterGrade::I => "I",
        }
    }
}

impl FromStr for LetterGrade {
    type Err = CalcError;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        LetterGrade::ALL
            .iter()
            .copied()
            .find(|grade| grade.as_str() == normalized)
            .ok_or_else(|| CalcError::InvalidGrade(s.to_string()))
    }
}

impl TryFrom<String> for LetterGrade {
    type Error = CalcError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LetterGrade> for String {
    fn from(grade: LetterGrade) -> Self {
        grade.as_str().to_string()
    }
}

impl fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradedRecord {
    pub course: String,
    pub term: String,
    pub grade: Option<LetterGrade>,
    pub credits: f64,
}

impl GradedRecord {
    pub fn new(
        course: impl Into<String>,
        term: impl Into<String>,
        grade: Option<LetterGrade>,
        credits: f64,
    ) -> Self {
        Self {
            course: course.into(),
            term: term.into(),
            grade,
            credits,
        }
    }

    /// Credits must be finite and positive.
    pub fn validate(&self) -> Result<(), CalcError> {
        if !self.credits.is_finite() || self.credits <= 0.0 {
            return Err(CalcError::InvalidCredits {
                course: self.course.clone(),
                credits: self.credits,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Weekday {
    fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "mon" | "monday" => Some(Weekday::Mon),
            "tue" | "tues" | "tuesday" => Some(Weekday::Tue),
            "wed" | "weds" | "wednesday" => Some(Weekday::Wed),
            "thu" | "thur" | "thurs" | "thursday" => Some(Weekday::Thu),
            "fri" | "friday" => Some(Weekday::Fri),
            "sat" | "saturday" => Some(Weekday::Sat),
            "sun" | "sunday" => Some(Weekday::Sun),
            _ => None,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
            Weekday::Sun => "Sun",
        };
        f.write_str(name)
    }
}

/// Parse a day list such as `"Mon,Wed"`, `"tuesday thursday"`, `"MWF"` or `"TTh"`.
pub fn parse_days(input: &str) -> Result<BTreeSet<Weekday>, CalcError> {
    let mut days = BTreeSet::new();

    for token in input
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        if let Some(day) = Weekday::from_name(token) {
            days.insert(day);
            continue;
        }
        parse_compact_days(token, &mut days)
            .ok_or_else(|| CalcError::InvalidDays(input.to_string()))?;
    }

    if days.is_empty() {
        return Err(CalcError::InvalidDays(input.to_string()));
    }
    Ok(days)
}

// Registrar letter codes: M T W R/Th F Sa Su (Tu accepted for Tuesday).
fn parse_compact_days(token: &str, days: &mut BTreeSet<Weekday>) -> Option<()> {
    let chars: Vec<char> = token.to_ascii_uppercase().chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let next = chars.get(i + 1).copied();
        let (day, width) = match (chars[i], next) {
            ('M', _) => (Weekday::Mon, 1),
            ('T', Some('H')) => (Weekday::Thu, 2),
            ('T', Some('U')) => (Weekday::Tue, 2),
            ('T', _) => (Weekday::Tue, 1),
            ('W', _) => (Weekday::Wed, 1),
            ('R', _) => (Weekday::Thu, 1),
            ('F', _) => (Weekday::Fri, 1),
            ('S', Some('A')) => (Weekday::Sat, 2),
            ('S', Some('U')) => (Weekday::Sun, 2),
            ('U', _) => (Weekday::Sun, 1),
            _ => return None,
        };
        days.insert(day);
        i += width;
    }
    Some(())
}

/// Parse `HH:MM` (24h), `HH:MM:SS`, or `H:MM AM`.
pub fn parse_time(input: &str) -> Result<NaiveTime, CalcError> {
    let trimmed = input.trim();
    ["%H:%M", "%H:%M:%S", "%I:%M %p", "%I:%M%p"]
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| CalcError::InvalidMeeting(format!("unrecognized time {input:?}")))
}

/// A section's weekly meeting slot. Fields are private so every value goes
/// through [`MeetingPattern::new`], which enforces `start < end`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeetingPattern {
    label: String,
    days: BTreeSet<Weekday>,
    start: NaiveTime,
    end: NaiveTime,
}

impl MeetingPattern {
    pub fn new(
        label: impl Into<String>,
        days: BTreeSet<Weekday>,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Result<Self, CalcError> {
        let label = label.into();
        if start >= end {
            return Err(CalcError::InvalidMeeting(format!(
                "{label} starts at {start} but ends at {end}"
            )));
        }
        Ok(Self {
            label,
            days,
            start,
            end,
        })
    }

    pub fn parse(label: &str, days: &str, start: &str, end: &str) -> Result<Self, CalcError> {
        Self::new(label, parse_days(days)?, parse_time(start)?, parse_time(end)?)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn days(&self) -> &BTreeSet<Weekday> {
        &self.days
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictPair {
    pub first: String,
    pub second: String,
    pub shared_days: Vec<Weekday>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Installment {
    pub number: u32,
    pub amount: Decimal,
    pub due_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeDistributionBucket {
    pub grade: LetterGrade,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermSummary {
    pub term: String,
    pub gpa: Option<f64>,
    pub cumulative_gpa: Option<f64>,
    pub credits_attempted: f64,
    pub credits_earned: f64,
}
