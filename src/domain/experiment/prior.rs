//! Prior and posterior hyperparameters
//!
//! All posterior updates here are closed form. Sampling from the resulting
//! distributions lives in `infrastructure::experiment::posteriors`.

use serde::{Deserialize, Serialize};

use super::validation::ExperimentValidationError;

// ============================================================================
// Beta
// ============================================================================

/// Beta prior for a conversion probability
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BetaPrior {
    pub a: f64,
    pub b: f64,
}

impl Default for BetaPrior {
    /// Non-informative Beta(1/2, 1/2)
    fn default() -> Self {
        Self { a: 0.5, b: 0.5 }
    }
}

impl BetaPrior {
    pub fn new(a: f64, b: f64) -> Result<Self, ExperimentValidationError> {
        let prior = Self { a, b };
        prior.validate()?;
        Ok(prior)
    }

    /// Both shape parameters must be strictly positive and finite
    pub fn validate(&self) -> Result<(), ExperimentValidationError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(self.a) || !valid(self.b) {
            return Err(ExperimentValidationError::NonPositiveBetaPrior {
                a: self.a,
                b: self.b,
            });
        }
        Ok(())
    }

    /// Conjugate update with `positives` successes out of `totals`
    pub fn update(&self, totals: u64, positives: u64) -> BetaPosterior {
        BetaPosterior {
            a: positives as f64 + self.a,
            b: totals.saturating_sub(positives) as f64 + self.b,
        }
    }
}

/// Beta posterior hyperparameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BetaPosterior {
    pub a: f64,
    pub b: f64,
}

impl BetaPosterior {
    /// Use this posterior as the prior of the next evaluation
    pub fn into_prior(self) -> BetaPrior {
        BetaPrior {
            a: self.a,
            b: self.b,
        }
    }
}

// ============================================================================
// Normal-Inverse-Gamma
// ============================================================================

/// Normal-Inverse-Gamma prior for the logarithm of a lognormal outcome
///
/// `a` and `b` may be zero: at least one observation is always present
/// when this prior is updated, which makes the posterior proper.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalInverseGammaPrior {
    pub m: f64,
    pub a: f64,
    pub b: f64,
    pub w: f64,
}

impl Default for NormalInverseGammaPrior {
    fn default() -> Self {
        Self {
            m: 1.0,
            a: 0.0,
            b: 0.0,
            w: 0.01,
        }
    }
}

impl NormalInverseGammaPrior {
    pub fn new(m: f64, a: f64, b: f64, w: f64) -> Result<Self, ExperimentValidationError> {
        let prior = Self { m, a, b, w };
        prior.validate()?;
        Ok(prior)
    }

    pub fn validate(&self) -> Result<(), ExperimentValidationError> {
        if !self.m.is_finite() {
            return Err(ExperimentValidationError::NonFinitePriorMean(self.m));
        }

        if !(self.w.is_finite() && self.w > 0.0) {
            return Err(ExperimentValidationError::NonPositivePriorWeight(self.w));
        }

        let valid = |v: f64| v.is_finite() && v >= 0.0;
        if !valid(self.a) || !valid(self.b) {
            return Err(ExperimentValidationError::NegativeInverseGammaPrior {
                a: self.a,
                b: self.b,
            });
        }

        Ok(())
    }

    /// Conjugate update from sufficient statistics of normal data
    ///
    /// With no observations the posterior is undefined and every
    /// hyperparameter is NaN.
    pub fn update(&self, total: u64, sum_x: f64, sum_x2: f64) -> NormalInverseGammaPosterior {
        if total == 0 {
            return NormalInverseGammaPosterior::undefined();
        }

        let n = total as f64;
        let x_bar = sum_x / n;

        let a = self.a + n / 2.0;
        let b = self.b
            + 0.5 * (sum_x2 - 2.0 * sum_x * x_bar + n * x_bar.powi(2)).max(0.0)
            + (n * self.w) / (2.0 * (n + self.w)) * (x_bar - self.m).powi(2);
        let w = n + self.w;
        let m = (n * x_bar + self.w * self.m) / (n + self.w);

        NormalInverseGammaPosterior { m, a, b, w }
    }
}

/// Normal-Inverse-Gamma posterior hyperparameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalInverseGammaPosterior {
    pub m: f64,
    pub a: f64,
    pub b: f64,
    pub w: f64,
}

impl NormalInverseGammaPosterior {
    /// Posterior of a variant with no positive observations
    pub fn undefined() -> Self {
        Self {
            m: f64::NAN,
            a: f64::NAN,
            b: f64::NAN,
            w: f64::NAN,
        }
    }

    pub fn is_defined(&self) -> bool {
        [self.m, self.a, self.b, self.w].iter().all(|v| !v.is_nan())
    }

    /// Use this posterior as the next prior, or keep `fallback` when the
    /// posterior is undefined (no data means no update)
    pub fn into_prior_or(self, fallback: NormalInverseGammaPrior) -> NormalInverseGammaPrior {
        if !self.is_defined() {
            return fallback;
        }
        NormalInverseGammaPrior {
            m: self.m,
            a: self.a,
            b: self.b,
            w: self.w,
        }
    }
}

// ============================================================================
// VariantPriors
// ============================================================================

/// Priors for both components of the delta-lognormal model
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariantPriors {
    pub beta: BetaPrior,
    pub lognormal: NormalInverseGammaPrior,
}

impl VariantPriors {
    pub fn validate(&self) -> Result<(), ExperimentValidationError> {
        self.beta.validate()?;
        self.lognormal.validate()
    }
}
