//! Bayesian A/B Evaluator
//!
//! Evaluates experiments with conjugate Bayesian models over aggregated
//! observation statistics:
//! - Binary outcomes with a Beta-Bernoulli model
//! - Zero-inflated revenue with a delta-lognormal model
//! - Sequential evaluation carrying posteriors across time buckets

pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::DomainError;
pub use infrastructure::export::write_json_lines;
pub use infrastructure::services::{
    BinaryDataTest, BucketEvaluation, BucketOutcome, DeltaLognormalDataTest,
    SequentialEvaluationService,
};
