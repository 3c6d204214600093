//! Decision metrics over simulated posterior draws
//!
//! Every function takes a `variants x sim_count` matrix: row `v` holds the
//! simulated outcome values of variant `v`, column `j` is one joint draw.
//! None of them draw randomness.

use crate::domain::experiment::{round_to, DecisionSummary, ExperimentValidationError};

const METRIC_DECIMALS: i32 = 7;

/// Share of draws in which each variant has the highest value
///
/// Exact ties go to the lowest index. With continuous posteriors a tie has
/// probability zero, so no other tie-break is attempted.
pub fn probability_best(matrix: &[Vec<f64>]) -> Result<Vec<f64>, ExperimentValidationError> {
    let sim_count = check_matrix(matrix)?;
    let mut wins = vec![0u64; matrix.len()];

    for j in 0..sim_count {
        let mut best = 0;
        for v in 1..matrix.len() {
            if matrix[v][j] > matrix[best][j] {
                best = v;
            }
        }
        wins[best] += 1;
    }

    Ok(wins
        .into_iter()
        .map(|w| round_to(w as f64 / sim_count as f64, METRIC_DECIMALS))
        .collect())
}

/// Mean shortfall of each variant against the best value of every draw
pub fn expected_loss(matrix: &[Vec<f64>]) -> Result<Vec<f64>, ExperimentValidationError> {
    let sim_count = check_matrix(matrix)?;

    let column_max: Vec<f64> = (0..sim_count)
        .map(|j| {
            matrix
                .iter()
                .map(|row| row[j])
                .fold(f64::NEG_INFINITY, f64::max)
        })
        .collect();

    Ok(matrix
        .iter()
        .map(|row| {
            let total: f64 = row
                .iter()
                .zip(&column_max)
                .map(|(value, max)| max - value)
                .sum();
            round_to(total / sim_count as f64, METRIC_DECIMALS)
        })
        .collect())
}

/// Mean signed difference of each variant against the other one
///
/// Only defined for exactly two variants; any other count is rejected.
pub fn expected_total_gain(matrix: &[Vec<f64>]) -> Result<Vec<f64>, ExperimentValidationError> {
    let sim_count = check_matrix(matrix)?;

    if matrix.len() != 2 {
        return Err(ExperimentValidationError::TotalGainRequiresTwoVariants(
            matrix.len(),
        ));
    }

    Ok((0..2)
        .map(|v| {
            let total: f64 = matrix[v]
                .iter()
                .zip(&matrix[1 - v])
                .map(|(own, other)| own - other)
                .sum();
            round_to(total / sim_count as f64, METRIC_DECIMALS)
        })
        .collect())
}

/// All decision metrics of one evaluation
///
/// Expected total gain is included only for two-variant matrices.
pub fn summarize(matrix: &[Vec<f64>]) -> Result<DecisionSummary, ExperimentValidationError> {
    let expected_total_gain = if matrix.len() == 2 {
        Some(expected_total_gain(matrix)?)
    } else {
        None
    };

    Ok(DecisionSummary {
        prob_being_best: probability_best(matrix)?,
        expected_loss: expected_loss(matrix)?,
        expected_total_gain,
    })
}

/// Narrowest interval holding `prob` of the draws
///
/// Used to report credible intervals of posterior revenue and uplift.
pub fn highest_density_interval(
    samples: &[f64],
    prob: f64,
) -> Result<(f64, f64), ExperimentValidationError> {
    if !(prob > 0.0 && prob <= 1.0) {
        return Err(ExperimentValidationError::InvalidIntervalProbability(prob));
    }

    if samples.is_empty() {
        return Err(ExperimentValidationError::EmptyData);
    }

    if let Some(&bad) = samples.iter().find(|v| !v.is_finite()) {
        return Err(ExperimentValidationError::InvalidContinuousValue(bad));
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len();
    let width = ((prob * n as f64).floor() as usize).min(n - 1);

    let start = (0..n - width)
        .min_by(|&i, &k| {
            let wi = sorted[i + width] - sorted[i];
            let wk = sorted[k + width] - sorted[k];
            wi.total_cmp(&wk)
        })
        .unwrap_or(0);

    Ok((sorted[start], sorted[start + width]))
}

/// Validates shape and returns the number of draws per variant
fn check_matrix(matrix: &[Vec<f64>]) -> Result<usize, ExperimentValidationError> {
    let first = matrix.first().ok_or(ExperimentValidationError::NoVariants)?;
    let sim_count = first.len();

    if sim_count == 0 {
        return Err(ExperimentValidationError::ZeroSimulations);
    }

    if matrix.iter().any(|row| row.len() != sim_count) {
        return Err(ExperimentValidationError::RaggedSimulationMatrix);
    }

    Ok(sim_count)
}
