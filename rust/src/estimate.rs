//! PERT three-point duration estimation.

use crate::error::ScheduleError;

/// Optimistic, most likely and pessimistic duration estimates for one task.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ThreePointEstimate {
    pub optimistic: f64,
    pub most_likely: f64,
    pub pessimistic: f64,
}

/// PERT weighted mean: `(o + 4m + p) / 6`.
///
/// Total over all reals; callers that need non-negative durations validate first.
pub fn expected_duration(optimistic: f64, most_likely: f64, pessimistic: f64) -> f64 {
    (optimistic + 4.0 * most_likely + pessimistic) / 6.0
}

impl ThreePointEstimate {
    pub fn new(optimistic: f64, most_likely: f64, pessimistic: f64) -> Self {
        Self {
            optimistic,
            most_likely,
            pessimistic,
        }
    }

    pub fn expected(&self) -> f64 {
        expected_duration(self.optimistic, self.most_likely, self.pessimistic)
    }

    /// PERT variance: `((p - o) / 6)^2`.
    pub fn variance(&self) -> f64 {
        let spread = (self.pessimistic - self.optimistic) / 6.0;
        spread * spread
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Reject negative or non-finite estimates, naming the first offending field.
    ///
    /// Finite inputs can still overflow once weighted, so the derived expected
    /// duration and variance must be finite too.
    pub fn validate(&self, task: &str) -> Result<(), ScheduleError> {
        let fields = [
            ("optimistic", self.optimistic),
            ("most_likely", self.most_likely),
            ("pessimistic", self.pessimistic),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ScheduleError::InvalidDuration {
                    task: task.to_string(),
                    field,
                    value,
                });
            }
        }

        let derived = [("expected", self.expected()), ("variance", self.variance())];
        for (field, value) in derived {
            if !value.is_finite() {
                return Err(ScheduleError::InvalidDuration {
                    task: task.to_string(),
                    field,
                    value,
                });
            }
        }
        Ok(())
    }
}
