//! Scalar rewards

use serde::{Deserialize, Serialize};

/// Reward paid for one transition
///
/// Serializes as a bare number.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reward(pub f64);

impl Reward {
    /// The raw value
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<f64> for Reward {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_a_number() {
        assert_eq!(serde_json::to_string(&Reward(-5.0)).unwrap(), "-5.0");
        let reward: Reward = serde_json::from_str("100").unwrap();
        assert_eq!(reward, Reward::from(100.0));
        assert_eq!(reward.value(), 100.0);
    }
}
