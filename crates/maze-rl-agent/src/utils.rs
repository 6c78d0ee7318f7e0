//! Exploration schedules

/// Trait for schedules (e.g., for epsilon decay)
pub trait Schedule: Send + Sync {
    /// Get value at step t
    fn value(&self, t: usize) -> f64;
}

/// Exponential decay schedule with a floor
///
/// `value(t) = max(min_value, start * decay_rate^t)`, the closed form of
/// multiplying by `decay_rate` once per step and clamping at the floor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialSchedule {
    /// Starting value
    pub start: f64,
    /// Minimum value
    pub min_value: f64,
    /// Decay rate
    pub decay_rate: f64,
}

impl ExponentialSchedule {
    /// Create a new exponential schedule
    #[must_use]
    pub fn new(start: f64, min_value: f64, decay_rate: f64) -> Self {
        Self {
            start,
            min_value,
            decay_rate,
        }
    }
}

impl Schedule for ExponentialSchedule {
    fn value(&self, t: usize) -> f64 {
        let exponent = i32::try_from(t).unwrap_or(i32::MAX);
        let value = self.start * self.decay_rate.powi(exponent);
        value.max(self.min_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn exponential_decay_with_floor() {
        let schedule = ExponentialSchedule::new(1.0, 0.01, 0.999);
        assert_relative_eq!(schedule.value(0), 1.0);
        assert_relative_eq!(schedule.value(1), 0.999);
        assert_relative_eq!(schedule.value(100), 0.999_f64.powi(100));
        assert_relative_eq!(schedule.value(10_000), 0.01);
    }
}
