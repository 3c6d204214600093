//! Experiment infrastructure - posterior sampling and decision metrics

mod decision_metrics;
mod posteriors;
mod seed_sequence;

pub use decision_metrics::{
    expected_loss, expected_total_gain, highest_density_interval, probability_best, summarize,
};
pub use posteriors::{
    beta_posterior, lognormal_posterior, normal_inverse_gamma_posterior, BetaPosteriorDraws,
    LognormalMeanDraws, NormalInverseGammaDraws,
};
pub use seed_sequence::SeedSequence;
