//! Experiment domain module for Bayesian A/B testing
//!
//! This module provides the data model of an evaluation: per-variant
//! sufficient statistics, conjugate prior and posterior hyperparameters,
//! result records, and the group label table.

mod entity;
mod groups;
mod prior;
mod result;
mod validation;
mod variant;

// Re-export all public types
pub use entity::{DistributionFamily, GroupRole, TestState};
pub use experiment_test::{ExperimentTest, DEFAULT_SIM_COUNT};
pub use groups::GroupLabels;
pub use prior::{
    BetaPosterior, BetaPrior, NormalInverseGammaPosterior, NormalInverseGammaPrior, VariantPriors,
};
pub use result::{BinaryEvaluationResult, DecisionSummary, DeltaLognormalEvaluationResult};
pub use validation::{
    validate_counts, validate_sim_count, validate_variant_name, ExperimentValidationError,
};
pub use variant::{round_to, BinaryVariantData, DeltaLognormalVariantData};
