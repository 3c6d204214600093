//! Monte-Carlo sampling from conjugate posteriors
//!
//! Each function takes its own [`SeedSequence`] so that callers evaluating
//! several variants hand every variant an independent stream.

use rand::Rng;
use rand_distr::{Beta, Distribution, Gamma, StandardNormal};

use super::seed_sequence::SeedSequence;
use crate::domain::experiment::{
    BetaPosterior, BetaPrior, NormalInverseGammaPosterior, NormalInverseGammaPrior,
};
use crate::domain::DomainError;

/// Draws from a Beta posterior
#[derive(Debug, Clone)]
pub struct BetaPosteriorDraws {
    pub samples: Vec<f64>,
    pub posterior: BetaPosterior,
}

/// Joint draws of `(mu, sigma^2)` from a Normal-Inverse-Gamma posterior
#[derive(Debug, Clone)]
pub struct NormalInverseGammaDraws {
    pub mu: Vec<f64>,
    pub sigma2: Vec<f64>,
    pub posterior: NormalInverseGammaPosterior,
}

/// Draws of the lognormal mean `exp(mu + sigma^2 / 2)`
#[derive(Debug, Clone)]
pub struct LognormalMeanDraws {
    pub samples: Vec<f64>,
    pub posterior: NormalInverseGammaPosterior,
}

/// Sample a conversion probability from `Beta(positives + a, totals - positives + b)`
pub fn beta_posterior(
    totals: u64,
    positives: u64,
    prior: BetaPrior,
    sim_count: usize,
    seed: &SeedSequence,
) -> Result<BetaPosteriorDraws, DomainError> {
    let posterior = prior.update(totals, positives);

    let beta = Beta::new(posterior.a, posterior.b).map_err(|e| {
        DomainError::sampling(format!(
            "Invalid Beta({}, {}) posterior: {}",
            posterior.a, posterior.b, e
        ))
    })?;

    let mut rng = seed.rng();
    let samples = (0..sim_count).map(|_| beta.sample(&mut rng)).collect();

    Ok(BetaPosteriorDraws { samples, posterior })
}

/// Sample `(mu, sigma^2)` for normal data given its sufficient statistics
///
/// `sigma^2 ~ InverseGamma(a_post, scale = b_post)` is drawn as
/// `1 / Gamma(a_post, scale = 1 / b_post)`, then
/// `mu ~ Normal(m_post, sqrt(sigma^2 / w_post))`.
pub fn normal_inverse_gamma_posterior(
    total: u64,
    sum_x: f64,
    sum_x2: f64,
    prior: NormalInverseGammaPrior,
    sim_count: usize,
    seed: &SeedSequence,
) -> Result<NormalInverseGammaDraws, DomainError> {
    if total == 0 {
        return Err(DomainError::sampling(
            "Normal-Inverse-Gamma posterior needs at least one observation",
        ));
    }

    let posterior = prior.update(total, sum_x, sum_x2);

    if !(posterior.b >= 0.0 && posterior.b.is_finite()) {
        return Err(DomainError::sampling(format!(
            "Inverse gamma scale must be non-negative and finite, got {}",
            posterior.b
        )));
    }

    // Identical observations under a zero prior give b_post == 0: the inverse
    // gamma collapses onto sigma^2 = 0 and mu onto m_post.
    let gamma_scale = 1.0 / posterior.b;
    if !gamma_scale.is_finite() {
        return Ok(NormalInverseGammaDraws {
            mu: vec![posterior.m; sim_count],
            sigma2: vec![0.0; sim_count],
            posterior,
        });
    }

    let gamma = Gamma::new(posterior.a, gamma_scale).map_err(|e| {
        DomainError::sampling(format!(
            "Invalid Gamma({}, {}) posterior: {}",
            posterior.a, gamma_scale, e
        ))
    })?;

    let mut rng = seed.rng();

    let sigma2: Vec<f64> = (0..sim_count)
        .map(|_| 1.0 / gamma.sample(&mut rng))
        .collect();

    let mu = sigma2
        .iter()
        .map(|s2| {
            let z: f64 = rng.sample(StandardNormal);
            posterior.m + (s2 / posterior.w).sqrt() * z
        })
        .collect();

    Ok(NormalInverseGammaDraws {
        mu,
        sigma2,
        posterior,
    })
}

/// Sample the posterior lognormal mean from aggregated log-space statistics
///
/// These are draws of the mean outcome given positivity, not outcome draws.
/// With `total == 0` the result is an all-zero sample vector and an
/// undefined (NaN) posterior; this never fails.
pub fn lognormal_posterior(
    total: u64,
    sum_logs: f64,
    sum_logs_2: f64,
    prior: NormalInverseGammaPrior,
    sim_count: usize,
    seed: &SeedSequence,
) -> Result<LognormalMeanDraws, DomainError> {
    if total == 0 {
        return Ok(LognormalMeanDraws {
            samples: vec![0.0; sim_count],
            posterior: NormalInverseGammaPosterior::undefined(),
        });
    }

    let draws =
        normal_inverse_gamma_posterior(total, sum_logs, sum_logs_2, prior, sim_count, seed)?;

    let samples = draws
        .mu
        .iter()
        .zip(&draws.sigma2)
        .map(|(mu, s2)| (mu + s2 / 2.0).exp())
        .collect();

    Ok(LognormalMeanDraws {
        samples,
        posterior: draws.posterior,
    })
}
