//! Experiment validation utilities

use thiserror::Error;

/// Maximum length for variant names
pub const MAX_VARIANT_NAME_LENGTH: usize = 100;

/// Validation errors for experiment input
///
/// Every variant indicates caller misuse. None of them are retried; they
/// propagate to the caller unchanged.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExperimentValidationError {
    #[error("Variant name cannot be empty")]
    EmptyVariantName,

    #[error("Variant name exceeds maximum length of {0} characters")]
    VariantNameTooLong(usize),

    #[error("Both [a_prior, b_prior] have to be positive numbers, got [{a}, {b}]")]
    NonPositiveBetaPrior { a: f64, b: f64 },

    #[error("Prior effective sample size w_prior has to be positive, got {0}")]
    NonPositivePriorWeight(f64),

    #[error("Inverse gamma priors [a_prior_ig, b_prior_ig] cannot be negative, got [{a}, {b}]")]
    NegativeInverseGammaPrior { a: f64, b: f64 },

    #[error("Prior mean m_prior has to be a finite number, got {0}")]
    NonFinitePriorMean(f64),

    #[error("Input variable 'totals' is expected to be positive integer")]
    ZeroTotals,

    #[error("Not possible to have more positives ({positives}) than totals ({totals})")]
    PositivesExceedTotals { totals: u64, positives: u64 },

    #[error("Aggregated sums have to be finite numbers")]
    NonFiniteAggregate,

    #[error("Data of added variant needs to have some observations")]
    EmptyData,

    #[error("Input data needs to contain only zeros and ones, got {0}")]
    NonBinaryValue(i64),

    #[error("Input data needs to contain non-negative finite numbers, got {0}")]
    InvalidContinuousValue(f64),

    #[error("Number of simulations has to be positive")]
    ZeroSimulations,

    #[error("Experiment has no variants to evaluate")]
    NoVariants,

    #[error("Expected total gain is defined for exactly 2 variants, got {0}")]
    TotalGainRequiresTwoVariants(usize),

    #[error("Simulated draws have inconsistent lengths")]
    RaggedSimulationMatrix,

    #[error("Interval probability has to be in (0, 1], got {0}")]
    InvalidIntervalProbability(f64),
}

/// Validate a variant name
pub fn validate_variant_name(name: &str) -> Result<(), ExperimentValidationError> {
    if name.trim().is_empty() {
        return Err(ExperimentValidationError::EmptyVariantName);
    }

    if name.chars().count() > MAX_VARIANT_NAME_LENGTH {
        return Err(ExperimentValidationError::VariantNameTooLong(
            MAX_VARIANT_NAME_LENGTH,
        ));
    }

    Ok(())
}

/// Validate binary aggregates: `totals > 0` and `positives <= totals`
pub fn validate_counts(totals: u64, positives: u64) -> Result<(), ExperimentValidationError> {
    if totals == 0 {
        return Err(ExperimentValidationError::ZeroTotals);
    }

    if positives > totals {
        return Err(ExperimentValidationError::PositivesExceedTotals { totals, positives });
    }

    Ok(())
}

/// Validate the Monte-Carlo draw count
pub fn validate_sim_count(sim_count: usize) -> Result<(), ExperimentValidationError> {
    if sim_count == 0 {
        return Err(ExperimentValidationError::ZeroSimulations);
    }
    Ok(())
}
