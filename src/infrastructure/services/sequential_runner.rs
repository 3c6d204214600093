//! Sequential evaluation over time buckets
//!
//! Runs a binary and a delta-lognormal evaluation per bucket and threads
//! each bucket's posterior into the next bucket's prior. A failing bucket
//! is reported as unavailable and does not stop the sequence.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::domain::experiment::{
    round_to, BinaryEvaluationResult, DeltaLognormalEvaluationResult, DeltaLognormalVariantData,
    DistributionFamily, ExperimentTest, ExperimentValidationError, GroupLabels, GroupRole,
    VariantPriors,
};
use crate::domain::DomainError;
use crate::infrastructure::services::{BinaryDataTest, DeltaLognormalDataTest};

// ============================================================================
// Input Types
// ============================================================================

/// One observation (e.g. one user's revenue in one bucket)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationRow {
    pub bucket: NaiveDate,
    pub group: String,
    pub value: f64,
}

/// Pre-aggregated statistics of one group label in one bucket
///
/// Several rows of the same bucket and group are summed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedRow {
    pub bucket: NaiveDate,
    pub group: String,
    #[serde(flatten)]
    pub stats: DeltaLognormalVariantData,
}

// ============================================================================
// Output Types
// ============================================================================

/// One output row per bucket of the requested sequence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketEvaluation {
    pub experiment_id: String,
    pub bucket: NaiveDate,
    pub sequence: usize,
    #[serde(flatten)]
    pub outcome: BucketOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BucketOutcome {
    Evaluated { variants: Vec<GroupEvaluation> },
    /// Bucket precedes the start of the test
    TooEarly,
    Unavailable { reason: String },
}

/// Metrics of one group in one evaluated bucket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupEvaluation {
    pub group: GroupRole,
    /// Prior the bucket was evaluated with
    pub prior: VariantPriors,
    pub conversion: BinaryEvaluationResult,
    pub revenue: DeltaLognormalEvaluationResult,
    pub cumulative_conversion_rate: f64,
    pub cumulative_avg_revenue: f64,
}

impl BucketOutcome {
    pub fn is_evaluated(&self) -> bool {
        matches!(self, Self::Evaluated { .. })
    }

    pub fn group(&self, role: GroupRole) -> Option<&GroupEvaluation> {
        match self {
            Self::Evaluated { variants } => variants.iter().find(|v| v.group == role),
            _ => None,
        }
    }
}

// ============================================================================
// Carried State
// ============================================================================

type GroupData = [Result<DeltaLognormalVariantData, ExperimentValidationError>; 2];

/// Posterior state and running totals carried between buckets
///
/// `history` holds one entry per bucket sequence number: the posteriors the
/// bucket produced, or `None` when it did not update anything.
#[derive(Debug, Clone)]
struct CarriedState {
    initial: [VariantPriors; 2],
    history: Vec<Option<[VariantPriors; 2]>>,
    cumulative: [Option<DeltaLognormalVariantData>; 2],
}

impl CarriedState {
    fn new(initial: [VariantPriors; 2]) -> Self {
        Self {
            initial,
            history: Vec::new(),
            cumulative: [None, None],
        }
    }

    /// Prior for the next bucket: the latest posterior, or the initial prior
    fn current(&self) -> [VariantPriors; 2] {
        self.history
            .iter()
            .rev()
            .find_map(|entry| *entry)
            .unwrap_or(self.initial)
    }
}

/// Result of a successful bucket, committed to the carried state as a whole
#[derive(Debug)]
struct BucketUpdate {
    variants: Vec<GroupEvaluation>,
    posteriors: [VariantPriors; 2],
    cumulative: [Option<DeltaLognormalVariantData>; 2],
}

// ============================================================================
// Sequential Evaluation Service
// ============================================================================

/// Runner threading posterior state through an ordered sequence of buckets
#[derive(Debug, Clone)]
pub struct SequentialEvaluationService {
    experiment_id: String,
    sim_count: usize,
    seed: Option<u64>,
    initial_priors: [VariantPriors; 2],
    groups: GroupLabels,
    initial_test_start: Option<NaiveDate>,
}

impl SequentialEvaluationService {
    /// Build the runner, failing fast on unsupported revenue models or bad priors
    pub fn new(config: &AppConfig) -> Result<Self, DomainError> {
        Self::check_distribution(config.runner.revenue_distribution)?;

        let initial_priors = GroupRole::ALL.map(|role| config.priors.for_role(role));
        for priors in &initial_priors {
            priors.validate()?;
        }

        Ok(Self {
            experiment_id: config.runner.experiment_id.clone(),
            sim_count: config.evaluation.sim_count,
            seed: config.evaluation.seed,
            initial_priors,
            groups: config.groups.clone(),
            initial_test_start: config.runner.initial_test_start,
        })
    }

    fn check_distribution(family: DistributionFamily) -> Result<(), DomainError> {
        family.ensure_supported().inspect_err(|e| {
            warn!(distribution = %family, error = %e, "Unsupported revenue distribution");
        })
    }

    /// Evaluate raw observation rows over `buckets`, in the given order
    ///
    /// Rows whose label matches no group are excluded, as are rows of
    /// buckets outside the sequence.
    pub fn run(
        &self,
        buckets: &[NaiveDate],
        rows: &[ObservationRow],
    ) -> Vec<BucketEvaluation> {
        let mut values: BTreeMap<NaiveDate, [Vec<f64>; 2]> = BTreeMap::new();

        for row in rows {
            let Some(role) = self.groups.classify(&row.group) else {
                continue;
            };
            values.entry(row.bucket).or_default()[slot(role)].push(row.value);
        }

        let data = values
            .into_iter()
            .map(|(bucket, groups)| {
                (bucket, groups.map(|v| DeltaLognormalVariantData::from_values(&v)))
            })
            .collect();

        self.run_prepared(buckets, data)
    }

    /// Evaluate pre-aggregated statistics over `buckets`, in the given order
    pub fn run_aggregated(
        &self,
        buckets: &[NaiveDate],
        rows: &[AggregatedRow],
    ) -> Vec<BucketEvaluation> {
        let mut sums: BTreeMap<NaiveDate, [Option<DeltaLognormalVariantData>; 2]> =
            BTreeMap::new();

        for row in rows {
            let Some(role) = self.groups.classify(&row.group) else {
                continue;
            };
            let entry = &mut sums.entry(row.bucket).or_default()[slot(role)];
            let merged = match *entry {
                Some(existing) => existing.merge(&row.stats),
                None => row.stats,
            };
            *entry = Some(merged);
        }

        let data = sums
            .into_iter()
            .map(|(bucket, groups)| {
                let validated = groups.map(|stats| {
                    stats.ok_or(ExperimentValidationError::EmptyData).and_then(|s| {
                        DeltaLognormalVariantData::new(
                            s.totals,
                            s.positives,
                            s.sum_values,
                            s.sum_logs,
                            s.sum_logs_2,
                        )
                    })
                });
                (bucket, validated)
            })
            .collect();

        self.run_prepared(buckets, data)
    }

    fn run_prepared(
        &self,
        buckets: &[NaiveDate],
        mut data: BTreeMap<NaiveDate, GroupData>,
    ) -> Vec<BucketEvaluation> {
        let mut state = CarriedState::new(self.initial_priors);
        let mut output = Vec::with_capacity(buckets.len());

        for (sequence, &bucket) in buckets.iter().enumerate() {
            let groups = data.remove(&bucket).unwrap_or_else(|| {
                [
                    Err(ExperimentValidationError::EmptyData),
                    Err(ExperimentValidationError::EmptyData),
                ]
            });

            let outcome = self.process_bucket(sequence, bucket, groups, &mut state);

            output.push(BucketEvaluation {
                experiment_id: self.experiment_id.clone(),
                bucket,
                sequence,
                outcome,
            });
        }

        let evaluated = output.iter().filter(|r| r.outcome.is_evaluated()).count();
        info!(
            experiment_id = %self.experiment_id,
            buckets = output.len(),
            evaluated,
            "Sequential evaluation finished"
        );

        output
    }

    fn process_bucket(
        &self,
        sequence: usize,
        bucket: NaiveDate,
        groups: GroupData,
        state: &mut CarriedState,
    ) -> BucketOutcome {
        if self.initial_test_start.is_some_and(|start| bucket < start) {
            info!(experiment_id = %self.experiment_id, %bucket, "Too early to evaluate bucket");
            state.history.push(None);
            return BucketOutcome::TooEarly;
        }

        debug!(experiment_id = %self.experiment_id, %bucket, sequence, "Evaluating bucket");

        let priors = state.current();
        let seed = self.seed.map(|s| s.wrapping_add(sequence as u64));

        match self.evaluate_bucket(groups, priors, seed, &state.cumulative) {
            Ok(update) => {
                state.history.push(Some(update.posteriors));
                state.cumulative = update.cumulative;
                BucketOutcome::Evaluated {
                    variants: update.variants,
                }
            }
            Err(reason) => {
                warn!(
                    experiment_id = %self.experiment_id,
                    %bucket,
                    reason = %reason,
                    "Bucket evaluation unavailable"
                );
                state.history.push(None);
                BucketOutcome::Unavailable { reason }
            }
        }
    }

    /// Evaluate both models for one bucket; nothing is committed on failure
    fn evaluate_bucket(
        &self,
        groups: GroupData,
        priors: [VariantPriors; 2],
        seed: Option<u64>,
        cumulative: &[Option<DeltaLognormalVariantData>; 2],
    ) -> Result<BucketUpdate, String> {
        let mut stats = Vec::with_capacity(2);
        for (role, group) in GroupRole::ALL.into_iter().zip(groups) {
            stats.push(group.map_err(|e| format!("{} group: {}", role, e))?);
        }

        let mut conversion_test = BinaryDataTest::new();
        let mut revenue_test = DeltaLognormalDataTest::new();

        for (i, role) in GroupRole::ALL.into_iter().enumerate() {
            let name = role.as_str();
            conversion_test
                .add_variant_data_agg(name, stats[i].totals, stats[i].positives, priors[i].beta)
                .map_err(|e| e.to_string())?;
            revenue_test
                .add_variant_data_agg(name, stats[i], priors[i])
                .map_err(|e| e.to_string())?;
        }

        let conversions = conversion_test
            .evaluate(self.sim_count, seed)
            .map_err(|e| format!("conversion model: {}", e))?;
        let revenues = revenue_test
            .evaluate(self.sim_count, seed)
            .map_err(|e| format!("revenue model: {}", e))?;

        let mut posteriors = priors;
        let mut next_cumulative = *cumulative;
        let mut variants = Vec::with_capacity(2);

        for (i, ((role, conversion), revenue)) in GroupRole::ALL
            .into_iter()
            .zip(conversions)
            .zip(revenues)
            .enumerate()
        {
            posteriors[i] = VariantPriors {
                beta: conversion.posterior().into_prior(),
                lognormal: revenue.lognormal_posterior().into_prior_or(priors[i].lognormal),
            };

            let running = match cumulative[i] {
                Some(previous) => previous.merge(&stats[i]),
                None => stats[i],
            };
            next_cumulative[i] = Some(running);

            variants.push(GroupEvaluation {
                group: role,
                prior: priors[i],
                conversion,
                revenue,
                cumulative_conversion_rate: running.conversions().positive_rate(),
                cumulative_avg_revenue: round_to(running.sum_values / running.totals as f64, 5),
            });
        }

        Ok(BucketUpdate {
            variants,
            posteriors,
            cumulative: next_cumulative,
        })
    }
}

fn slot(role: GroupRole) -> usize {
    match role {
        GroupRole::Treatment => 0,
        GroupRole::Control => 1,
    }
}
