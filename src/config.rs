use serde::{Deserialize, Serialize};
use std::env;

use crate::error::{RecommendError, RecommendResult};

pub const DEFAULT_KEYWORD_WEIGHT: f64 = 0.4;
pub const DEFAULT_LEXICAL_WEIGHT: f64 = 0.35;
pub const DEFAULT_ENTITY_WEIGHT: f64 = 0.25;

/// Weights must sum to 1.0 within this tolerance
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Aggregate score at or above which a recommendation is `High` confidence
pub const HIGH_CONFIDENCE_THRESHOLD: f64 = 0.3;
/// Aggregate score at or above which a recommendation is `Medium` confidence
pub const MEDIUM_CONFIDENCE_THRESHOLD: f64 = 0.15;

pub const DEFAULT_TOP_K: usize = 5;

/// Relative influence of the three scoring signals
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub keyword_weight: f64,
    pub lexical_weight: f64,
    pub entity_weight: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Weights {
            keyword_weight: DEFAULT_KEYWORD_WEIGHT,
            lexical_weight: DEFAULT_LEXICAL_WEIGHT,
            entity_weight: DEFAULT_ENTITY_WEIGHT,
        }
    }
}

impl Weights {
    pub fn new(keyword_weight: f64, lexical_weight: f64, entity_weight: f64) -> RecommendResult<Self> {
        let weights = Weights {
            keyword_weight,
            lexical_weight,
            entity_weight,
        };
        weights.validate()?;
        Ok(weights)
    }

    pub fn validate(&self) -> RecommendResult<()> {
        let named = [
            ("keyword_weight", self.keyword_weight),
            ("lexical_weight", self.lexical_weight),
            ("entity_weight", self.entity_weight),
        ];

        for (name, value) in named {
            if !value.is_finite() {
                return Err(RecommendError::InvalidWeights(format!(
                    "{} is not a finite number ({})",
                    name, value
                )));
            }
            if value < 0.0 {
                return Err(RecommendError::InvalidWeights(format!(
                    "{} is negative ({})",
                    name, value
                )));
            }
        }

        let sum = self.keyword_weight + self.lexical_weight + self.entity_weight;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(RecommendError::InvalidWeights(format!(
                "weights sum to {}, expected 1.0",
                sum
            )));
        }

        Ok(())
    }
}

/// Policy values for turning sub-scores into ranked, tiered output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    pub weights: Weights,
    pub high_threshold: f64,
    pub medium_threshold: f64,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        ScoringPolicy {
            weights: Weights::default(),
            high_threshold: HIGH_CONFIDENCE_THRESHOLD,
            medium_threshold: MEDIUM_CONFIDENCE_THRESHOLD,
        }
    }
}

impl ScoringPolicy {
    pub fn with_weights(mut self, weights: Weights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_thresholds(mut self, high: f64, medium: f64) -> Self {
        self.high_threshold = high;
        self.medium_threshold = medium;
        self
    }

    pub fn validate(&self) -> RecommendResult<()> {
        self.weights.validate()?;
        let thresholds_ok = self.medium_threshold.is_finite()
            && self.high_threshold.is_finite()
            && (0.0..=1.0).contains(&self.medium_threshold)
            && (0.0..=1.0).contains(&self.high_threshold)
            && self.medium_threshold <= self.high_threshold;
        if !thresholds_ok {
            return Err(RecommendError::InvalidArgument(format!(
                "confidence thresholds must satisfy 0 <= medium ({}) <= high ({}) <= 1",
                self.medium_threshold, self.high_threshold
            )));
        }
        Ok(())
    }

    /// Defaults overridden by `ICD_KEYWORD_WEIGHT`, `ICD_LEXICAL_WEIGHT`,
    /// `ICD_ENTITY_WEIGHT`, `ICD_HIGH_THRESHOLD` and `ICD_MEDIUM_THRESHOLD`.
    pub fn from_env() -> RecommendResult<Self> {
        let defaults = ScoringPolicy::default();
        let policy = ScoringPolicy {
            weights: Weights {
                keyword_weight: env_f64("ICD_KEYWORD_WEIGHT", defaults.weights.keyword_weight)?,
                lexical_weight: env_f64("ICD_LEXICAL_WEIGHT", defaults.weights.lexical_weight)?,
                entity_weight: env_f64("ICD_ENTITY_WEIGHT", defaults.weights.entity_weight)?,
            },
            high_threshold: env_f64("ICD_HIGH_THRESHOLD", defaults.high_threshold)?,
            medium_threshold: env_f64("ICD_MEDIUM_THRESHOLD", defaults.medium_threshold)?,
        };
        policy.validate()?;
        Ok(policy)
    }
}

fn env_f64(var: &str, default: f64) -> RecommendResult<f64> {
    match env::var(var) {
        Ok(raw) if !raw.trim().is_empty() => raw.trim().parse::<f64>().map_err(|_| {
            RecommendError::InvalidWeights(format!("{} is not numeric: '{}'", var, raw))
        }),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_are_valid() {
        assert!(Weights::default().validate().is_ok());
        assert!(ScoringPolicy::default().validate().is_ok());
    }

    #[test]
    fn test_sum_within_tolerance_accepted() {
        assert!(Weights::new(0.5, 0.3, 0.2 + 5e-7).is_ok());
        assert!(Weights::new(1.0, 0.0, 0.0).is_ok());
    }

    #[test]
    fn test_bad_sum_rejected() {
        let result = Weights::new(0.4, 0.3, 0.2);
        assert!(matches!(result, Err(RecommendError::InvalidWeights(_))));
    }

    #[test]
    fn test_negative_and_nan_rejected() {
        assert!(matches!(
            Weights::new(1.2, -0.2, 0.0),
            Err(RecommendError::InvalidWeights(_))
        ));
        assert!(matches!(
            Weights::new(f64::NAN, 0.5, 0.5),
            Err(RecommendError::InvalidWeights(_))
        ));
    }

    #[test]
    fn test_policy_from_env() {
        // Only this test touches these variables
        env::set_var("ICD_HIGH_THRESHOLD", "0.5");
        let policy = ScoringPolicy::from_env().unwrap();
        assert_eq!(policy.high_threshold, 0.5);
        assert_eq!(policy.weights, Weights::default());

        env::set_var("ICD_ENTITY_WEIGHT", "a quarter");
        assert!(matches!(
            ScoringPolicy::from_env(),
            Err(RecommendError::InvalidWeights(_))
        ));

        env::remove_var("ICD_ENTITY_WEIGHT");
        env::remove_var("ICD_HIGH_THRESHOLD");
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let policy = ScoringPolicy::default().with_thresholds(0.1, 0.2);
        assert!(matches!(
            policy.validate(),
            Err(RecommendError::InvalidArgument(_))
        ));
    }
}
