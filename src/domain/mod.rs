//! Domain layer - Core business logic and entities

pub mod error;
pub mod experiment;

pub use error::DomainError;
pub use experiment::{
    BetaPrior, BinaryEvaluationResult, DeltaLognormalEvaluationResult, DistributionFamily,
    ExperimentTest, ExperimentValidationError, GroupLabels, GroupRole, NormalInverseGammaPrior,
    TestState, VariantPriors,
};
