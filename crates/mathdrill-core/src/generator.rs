//! Random arithmetic problem generation.
//!
//! Operators are drawn uniformly from the enabled pool and operands from the
//! inclusive bounds configured for that operator. Division problems are built
//! divisor-and-quotient-first so the result is an integer by construction,
//! never by rejection sampling.

use rand::Rng;

use crate::error::SessionError;
use crate::types::{OperandRange, Operator, Problem, RangeTable};

/// Generate one problem, drawing the operator uniformly from `pool`.
///
/// Fails only when the pool is empty; callers that validate the pool up
/// front can use [`generate_for`] directly.
pub fn generate<R: Rng>(
    rng: &mut R,
    pool: &[Operator],
    ranges: &RangeTable,
) -> Result<Problem, SessionError> {
    if pool.is_empty() {
        return Err(SessionError::NoOperatorsEnabled);
    }
    let op = pool[rng.gen_range(0..pool.len())];
    Ok(generate_for(rng, op, ranges.get(op)))
}

/// Generate one problem for a specific operator and its bound pair.
pub fn generate_for<R: Rng>(rng: &mut R, op: Operator, range: &OperandRange) -> Problem {
    match op {
        Operator::Add => {
            let a = draw(rng, range.min1, range.max1);
            let b = draw(rng, range.min2, range.max2);
            Problem::ungraded(op, a, b, a + b)
        }
        Operator::Subtract => {
            let mut a = draw(rng, range.min1, range.max1);
            let mut b = draw(rng, range.min2, range.max2);
            // Keep the result non-negative.
            if a < b {
                std::mem::swap(&mut a, &mut b);
            }
            Problem::ungraded(op, a, b, a - b)
        }
        Operator::Multiply => {
            let a = draw(rng, range.min1, range.max1);
            let b = draw(rng, range.min2, range.max2);
            Problem::ungraded(op, a, b, a * b)
        }
        Operator::Divide => {
            // range1 bounds the divisor, range2 the quotient; the dividend is
            // derived so the division is exact. A configured divisor of 0 is
            // clamped to 1.
            let divisor = match draw(rng, range.min1, range.max1) {
                0 => 1,
                d => d,
            };
            let quotient = draw(rng, range.min2, range.max2);
            Problem::ungraded(op, divisor * quotient, divisor, quotient)
        }
    }
}

/// Draw one value from an inclusive bound pair. An inverted pair is a
/// single-point range at `min`.
fn draw<R: Rng>(rng: &mut R, min: i64, max: i64) -> i64 {
    if min >= max {
        min
    } else {
        rng.gen_range(min..=max)
    }
}
