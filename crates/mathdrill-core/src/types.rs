//! Core data model types for mathdrill.
//!
//! These are the fundamental types the whole system passes around: operators
//! and their numeric ranges, individual problems, and finished match records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The four arithmetic operations a session can draw from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// All operators, in canonical order.
    pub const ALL: [Operator; 4] = [
        Operator::Add,
        Operator::Subtract,
        Operator::Multiply,
        Operator::Divide,
    ];

    /// The symbol used when rendering a question.
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "×",
            Operator::Divide => "÷",
        }
    }

    /// Recover the operator from rendered question text.
    ///
    /// Match records persisted before the `operator` field existed carry only
    /// the question string. The scan order is fixed (`+`, `-`, `×`, `÷`) and
    /// unknown text falls back to `Add`.
    pub fn from_question(text: &str) -> Self {
        if text.contains('+') {
            Operator::Add
        } else if text.contains('-') {
            Operator::Subtract
        } else if text.contains('×') {
            Operator::Multiply
        } else if text.contains('÷') {
            Operator::Divide
        } else {
            Operator::Add
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Add => write!(f, "add"),
            Operator::Subtract => write!(f, "subtract"),
            Operator::Multiply => write!(f, "multiply"),
            Operator::Divide => write!(f, "divide"),
        }
    }
}

impl FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "add" | "+" => Ok(Operator::Add),
            "subtract" | "sub" | "-" => Ok(Operator::Subtract),
            "multiply" | "mul" | "×" | "x" | "*" => Ok(Operator::Multiply),
            "divide" | "div" | "÷" | "/" => Ok(Operator::Divide),
            other => Err(format!("unknown operator: {other}")),
        }
    }
}

/// Inclusive bounds for the two operands of one operator.
///
/// For divide the first pair bounds the divisor and the second pair bounds
/// the quotient. An inverted pair (`min > max`) is a defined single-point
/// range at `min`, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperandRange {
    pub min1: i64,
    pub max1: i64,
    pub min2: i64,
    pub max2: i64,
}

impl OperandRange {
    pub fn new(min1: i64, max1: i64, min2: i64, max2: i64) -> Self {
        Self {
            min1,
            max1,
            min2,
            max2,
        }
    }

    /// Same bounds for both operands.
    pub fn symmetric(min: i64, max: i64) -> Self {
        Self::new(min, max, min, max)
    }
}

/// One bound pair per operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeTable {
    pub add: OperandRange,
    pub subtract: OperandRange,
    pub multiply: OperandRange,
    pub divide: OperandRange,
}

impl RangeTable {
    pub fn get(&self, op: Operator) -> &OperandRange {
        match op {
            Operator::Add => &self.add,
            Operator::Subtract => &self.subtract,
            Operator::Multiply => &self.multiply,
            Operator::Divide => &self.divide,
        }
    }
}

impl Default for RangeTable {
    fn default() -> Self {
        Self {
            add: OperandRange::symmetric(1, 20),
            subtract: OperandRange::symmetric(1, 20),
            multiply: OperandRange::symmetric(2, 12),
            divide: OperandRange::symmetric(2, 12),
        }
    }
}

/// One arithmetic question instance.
///
/// Created ungraded by the generator, graded exactly once by the session,
/// and immutable once it belongs to a match record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    /// Rendered question text, e.g. `"12 × 3"`.
    pub question: String,
    /// Absent on legacy records; the aggregator falls back to
    /// [`Operator::from_question`].
    #[serde(default)]
    pub operator: Option<Operator>,
    #[serde(default)]
    pub operands: [i64; 2],
    pub correct_answer: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_answer: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_taken_ms: Option<u64>,
}

impl Problem {
    /// Build an ungraded problem from its parts.
    pub fn ungraded(operator: Operator, a: i64, b: i64, answer: i64) -> Self {
        Self {
            question: format!("{a} {} {b}", operator.symbol()),
            operator: Some(operator),
            operands: [a, b],
            correct_answer: answer,
            user_answer: None,
            is_correct: None,
            time_taken_ms: None,
        }
    }

    pub fn is_graded(&self) -> bool {
        self.is_correct.is_some()
    }

    /// Grade this problem against an answer. Returns whether it was correct.
    /// A second grade attempt is a no-op that re-reports the stored verdict.
    pub(crate) fn grade(&mut self, answer: i64, elapsed_ms: u64) -> bool {
        if let Some(correct) = self.is_correct {
            return correct;
        }
        let correct = answer == self.correct_answer;
        self.user_answer = Some(answer);
        self.is_correct = Some(correct);
        self.time_taken_ms = Some(elapsed_ms);
        correct
    }
}

/// How a match was bounded, with the fields specific to each regime.
///
/// The two shapes are deliberately distinct: a fixed-count match knows its
/// planned `total` and how long it took, while a timed match knows its timer
/// length and how many questions were actually attempted before it ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum MatchOutcome {
    FixedCount { total: u32, time_taken_secs: u64 },
    Timed { attempted: u32, timer_duration_secs: u32 },
}

impl MatchOutcome {
    /// The denominator for accuracy: planned total for fixed-count matches,
    /// attempted count for timed ones.
    pub fn questions_counted(&self) -> u32 {
        match *self {
            MatchOutcome::FixedCount { total, .. } => total,
            MatchOutcome::Timed { attempted, .. } => attempted,
        }
    }

    /// Timer length for timed matches; fixed-count matches have none.
    pub fn duration_secs(&self) -> Option<u32> {
        match *self {
            MatchOutcome::Timed {
                timer_duration_secs,
                ..
            } => Some(timer_duration_secs),
            MatchOutcome::FixedCount { .. } => None,
        }
    }
}

/// A finished match as produced by the session, before the store has
/// assigned it an identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchDraft {
    pub score: u32,
    pub outcome: MatchOutcome,
    pub questions: Vec<Problem>,
}

/// A persisted match record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub score: u32,
    #[serde(flatten)]
    pub outcome: MatchOutcome,
    pub questions: Vec<Problem>,
}
