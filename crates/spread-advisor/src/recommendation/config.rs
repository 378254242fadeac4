use serde::{Deserialize, Serialize};

const WEIGHT_SUM_TOLERANCE: f64 = 1e-3;

/// Relative importance of the three partial scores. Must sum to one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub keyword: f64,
    pub emotional_state: f64,
    pub preference: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            keyword: 0.45,
            emotional_state: 0.25,
            preference: 0.30,
        }
    }
}

/// Tunables for matching, ranking and explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub weights: ScoreWeights,
    /// Candidates below this total are dropped before ranking.
    pub min_confidence: f64,
    /// Number of ranked candidates reported, best match included.
    pub top_n: usize,
    /// Matched-phrase credit needed for a full keyword score.
    pub keyword_saturation: f64,
    /// Totals below this surface the spread's "when to avoid" caution.
    pub weak_match_threshold: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            min_confidence: 0.15,
            top_n: 3,
            keyword_saturation: 2.0,
            weak_match_threshold: 0.5,
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), ScoringConfigError> {
        let ScoreWeights {
            keyword,
            emotional_state,
            preference,
        } = self.weights;

        for (name, value) in [
            ("keyword", keyword),
            ("emotional_state", emotional_state),
            ("preference", preference),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ScoringConfigError::NegativeWeight { name, value });
            }
        }

        let sum = keyword + emotional_state + preference;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ScoringConfigError::WeightSum { sum });
        }

        for (name, value) in [
            ("min_confidence", self.min_confidence),
            ("weak_match_threshold", self.weak_match_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ScoringConfigError::ThresholdOutOfRange { name, value });
            }
        }

        if !self.keyword_saturation.is_finite() || self.keyword_saturation <= 0.0 {
            return Err(ScoringConfigError::Saturation(self.keyword_saturation));
        }

        if self.top_n == 0 {
            return Err(ScoringConfigError::TopN);
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringConfigError {
    #[error("{name} weight must be a non-negative number (found {value})")]
    NegativeWeight { name: &'static str, value: f64 },
    #[error("score weights must sum to 1.0 (found {sum:.3})")]
    WeightSum { sum: f64 },
    #[error("{name} must lie within [0, 1] (found {value})")]
    ThresholdOutOfRange { name: &'static str, value: f64 },
    #[error("keyword saturation must be positive (found {0})")]
    Saturation(f64),
    #[error("top_n must be at least 1")]
    TopN,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(ScoringConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_weights_that_do_not_sum_to_one() {
        let mut config = ScoringConfig::default();
        config.weights.keyword = 0.6;

        match config.validate() {
            Err(ScoringConfigError::WeightSum { sum }) => assert!((sum - 1.15).abs() < 1e-9),
            other => panic!("expected weight sum error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_out_of_range_thresholds() {
        let config = ScoringConfig {
            min_confidence: 1.5,
            ..ScoringConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ScoringConfigError::ThresholdOutOfRange {
                name: "min_confidence",
                ..
            })
        ));

        let config = ScoringConfig {
            top_n: 0,
            ..ScoringConfig::default()
        };
        assert_eq!(config.validate(), Err(ScoringConfigError::TopN));
    }
}
