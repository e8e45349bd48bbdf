use thiserror::Error;

/// Caller-input problems rejected by the matching engine.
///
/// Out-of-range values are rejected, never silently clamped.
#[derive(Error, Debug, PartialEq)]
pub enum MatchError {
    #[error("min_score must be within [0.0, 1.0], got {0}")]
    MinScoreOutOfRange(f64),

    #[error("funding_min {min} exceeds funding_max {max}")]
    FundingRangeInverted { min: i64, max: i64 },

    #[error("top_k {got} exceeds the maximum of {max}")]
    TopKTooLarge { got: usize, max: usize },
}
