//! Evaluation result records

use serde::{Deserialize, Serialize};

use super::prior::{BetaPosterior, NormalInverseGammaPosterior};

// ============================================================================
// BinaryEvaluationResult
// ============================================================================

/// Per-variant result of a binary evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryEvaluationResult {
    pub variant: String,
    pub totals: u64,
    pub positives: u64,
    pub positive_rate: f64,
    pub prob_being_best: f64,
    /// NaN when no variant has any positive observation
    pub expected_loss: f64,
    /// Present only for two-variant experiments
    pub expected_total_gain: Option<f64>,
    pub a_post_beta: f64,
    pub b_post_beta: f64,
}

impl BinaryEvaluationResult {
    pub fn posterior(&self) -> BetaPosterior {
        BetaPosterior {
            a: self.a_post_beta,
            b: self.b_post_beta,
        }
    }
}

// ============================================================================
// DeltaLognormalEvaluationResult
// ============================================================================

/// Per-variant result of a delta-lognormal evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeltaLognormalEvaluationResult {
    pub variant: String,
    pub totals: u64,
    pub positives: u64,
    pub sum_values: f64,
    pub sum_logs: f64,
    pub sum_logs_2: f64,
    pub avg_values: f64,
    pub avg_positive_values: f64,
    pub prob_being_best: f64,
    pub expected_loss: f64,
    pub expected_total_gain: Option<f64>,
    pub a_post_beta: f64,
    pub b_post_beta: f64,
    pub m_post: f64,
    pub a_post_ig: f64,
    pub b_post_ig: f64,
    pub w_post: f64,
}

impl DeltaLognormalEvaluationResult {
    pub fn beta_posterior(&self) -> BetaPosterior {
        BetaPosterior {
            a: self.a_post_beta,
            b: self.b_post_beta,
        }
    }

    pub fn lognormal_posterior(&self) -> NormalInverseGammaPosterior {
        NormalInverseGammaPosterior {
            m: self.m_post,
            a: self.a_post_ig,
            b: self.b_post_ig,
            w: self.w_post,
        }
    }
}

// ============================================================================
// DecisionSummary
// ============================================================================

/// Decision metrics for all variants of one evaluation, in insertion order
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionSummary {
    pub prob_being_best: Vec<f64>,
    pub expected_loss: Vec<f64>,
    pub expected_total_gain: Option<Vec<f64>>,
}

impl DecisionSummary {
    /// Non-comparable summary used when no variant has positive observations
    pub fn degenerate(variant_count: usize) -> Self {
        let uniform = super::variant::round_to(1.0 / variant_count as f64, 7);
        Self {
            prob_being_best: vec![uniform; variant_count],
            expected_loss: vec![f64::NAN; variant_count],
            expected_total_gain: (variant_count == 2).then(|| vec![f64::NAN; 2]),
        }
    }

    pub fn total_gain_at(&self, index: usize) -> Option<f64> {
        self.expected_total_gain
            .as_ref()
            .and_then(|gains| gains.get(index).copied())
    }
}
