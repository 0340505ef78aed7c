//! Aggregate statistics over the match history.
//!
//! [`compute`] is a pure function of the records it is given: no I/O, no
//! hidden state, and an empty input produces a well-defined all-zero result.
//! It never reorders its input — the trend series follows the caller's order.
//! All percentages and means are rounded to one decimal place.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{MatchRecord, Operator};

/// Summary metrics and trend series derived from a set of matches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub total_matches: usize,
    /// Correct answers over counted questions across all matches, as a
    /// percentage. The per-match denominator is the planned total for
    /// fixed-count matches and the attempted count for timed ones.
    pub overall_accuracy: f64,
    pub average_score: f64,
    /// Highest raw score across all matches (a count, not a percentage).
    pub best_score: u32,
    pub total_questions_answered: u64,
    /// Mean questions-per-minute over matches with a positive timer
    /// duration; matches without one are excluded, not counted as zero.
    pub average_qpm: f64,
    pub accuracy_by_operation: BTreeMap<Operator, f64>,
    /// One entry per match, in input order.
    pub score_trend: Vec<TrendPoint>,
    /// Matches grouped by timer duration, keyed `"{n}s"`; fixed-count
    /// matches fall into the `"unknown"` bucket.
    pub score_by_duration: BTreeMap<String, DurationBucket>,
}

/// One match's contribution to the trend series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub score: u32,
    pub accuracy: f64,
    /// Timer duration, or 0 for fixed-count matches.
    pub duration_secs: u32,
}

/// Score summary for one duration bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationBucket {
    pub best: u32,
    pub avg: f64,
    pub matches: usize,
}

/// Compute aggregate statistics over the given records.
pub fn compute(records: &[MatchRecord]) -> Stats {
    if records.is_empty() {
        return Stats::default();
    }

    let total_matches = records.len();
    let mut total_correct: u64 = 0;
    let mut total_questions: u64 = 0;
    let mut best_score: u32 = 0;
    let mut score_trend = Vec::with_capacity(records.len());
    // (correct, total) per operator.
    let mut operation_buckets: BTreeMap<Operator, (u64, u64)> = BTreeMap::new();
    // (best, score sum, match count) per duration key.
    let mut duration_buckets: BTreeMap<String, (u32, u64, usize)> = BTreeMap::new();
    let mut qpm_values: Vec<f64> = Vec::new();

    for record in records {
        let counted = u64::from(record.outcome.questions_counted());
        let accuracy = if counted > 0 {
            record.score as f64 / counted as f64 * 100.0
        } else {
            0.0
        };
        total_correct += u64::from(record.score);
        total_questions += counted;
        best_score = best_score.max(record.score);

        score_trend.push(TrendPoint {
            score: record.score,
            accuracy: round1(accuracy),
            duration_secs: record.outcome.duration_secs().unwrap_or(0),
        });

        let key = match record.outcome.duration_secs() {
            Some(d) => format!("{d}s"),
            None => "unknown".to_string(),
        };
        let bucket = duration_buckets.entry(key).or_insert((0, 0, 0));
        bucket.0 = bucket.0.max(record.score);
        bucket.1 += u64::from(record.score);
        bucket.2 += 1;

        if let Some(duration) = record.outcome.duration_secs() {
            if duration > 0 {
                qpm_values.push(counted as f64 / f64::from(duration) * 60.0);
            }
        }

        for question in &record.questions {
            let op = question
                .operator
                .unwrap_or_else(|| Operator::from_question(&question.question));
            let entry = operation_buckets.entry(op).or_insert((0, 0));
            entry.1 += 1;
            if question.is_correct == Some(true) {
                entry.0 += 1;
            }
        }
    }

    let overall_accuracy = if total_questions > 0 {
        total_correct as f64 / total_questions as f64 * 100.0
    } else {
        0.0
    };
    let average_score = total_correct as f64 / total_matches as f64;
    let average_qpm = if qpm_values.is_empty() {
        0.0
    } else {
        qpm_values.iter().sum::<f64>() / qpm_values.len() as f64
    };

    let accuracy_by_operation = operation_buckets
        .into_iter()
        .map(|(op, (correct, total))| (op, round1(correct as f64 / total as f64 * 100.0)))
        .collect();

    let score_by_duration = duration_buckets
        .into_iter()
        .map(|(key, (best, sum, matches))| {
            (
                key,
                DurationBucket {
                    best,
                    avg: round1(sum as f64 / matches as f64),
                    matches,
                },
            )
        })
        .collect();

    Stats {
        total_matches,
        overall_accuracy: round1(overall_accuracy),
        average_score: round1(average_score),
        best_score,
        total_questions_answered: total_questions,
        average_qpm: round1(average_qpm),
        accuracy_by_operation,
        score_trend,
        score_by_duration,
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
