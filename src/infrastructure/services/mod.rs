//! Infrastructure services

mod binary_test;
mod sequential_runner;

pub use binary_test::BinaryDataTest;
pub use delta_lognormal_test::DeltaLognormalDataTest;
pub use sequential_runner::{
    AggregatedRow, BucketEvaluation, BucketOutcome, GroupEvaluation, ObservationRow,
    SequentialEvaluationService,
};
