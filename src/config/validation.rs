//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (interval and timeout > 0 and representable as a
//!   `Duration`, thresholds >= 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Target URLs are left alone; they fail per target at probe time

use std::time::Duration;

use crate::registry::Snapshot;

/// A single semantic problem with a loaded snapshot.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("interval_seconds must be a positive number, got {0}")]
    Interval(f64),

    #[error("request_timeout_seconds must be a positive number, got {0}")]
    Timeout(f64),

    #[error("threshold_seconds for target '{name}' must be a non-negative number, got {value}")]
    Threshold { name: String, value: f64 },
}

/// Positive and small enough to become a `Duration`.
fn positive_duration(value: f64) -> bool {
    value > 0.0 && Duration::try_from_secs_f64(value).is_ok()
}

/// Check a candidate snapshot before it is allowed to replace the active one.
pub fn validate_snapshot(snapshot: &Snapshot) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !positive_duration(snapshot.interval_secs) {
        errors.push(ValidationError::Interval(snapshot.interval_secs));
    }
    if !positive_duration(snapshot.timeout_secs) {
        errors.push(ValidationError::Timeout(snapshot.timeout_secs));
    }
    for target in &snapshot.targets {
        if !target.threshold_secs.is_finite() || target.threshold_secs < 0.0 {
            errors.push(ValidationError::Threshold {
                name: target.name.clone(),
                value: target.threshold_secs,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
