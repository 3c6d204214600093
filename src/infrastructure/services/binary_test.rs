//! Binary experiment test
//!
//! Evaluates conversion-style outcomes with a Beta-Bernoulli model.

use tracing::{debug, info};

use crate::domain::experiment::{
    validate_sim_count, validate_variant_name, BetaPosterior, BetaPrior, BinaryEvaluationResult,
    BinaryVariantData, DecisionSummary, ExperimentTest, ExperimentValidationError, TestState,
};
use crate::domain::DomainError;
use crate::infrastructure::experiment::{beta_posterior, summarize, SeedSequence};

/// One named variant with its prior and closed-form posterior
#[derive(Debug, Clone)]
struct BinaryVariant {
    name: String,
    data: BinaryVariantData,
    prior: BetaPrior,
    posterior: BetaPosterior,
}

/// Binary outcome experiment over any number of variants
#[derive(Debug, Clone, Default)]
pub struct BinaryDataTest {
    variants: Vec<BinaryVariant>,
    state: TestState,
}

impl BinaryDataTest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add raw observations (each exactly 0 or 1) for a variant
    pub fn add_variant_data(
        &mut self,
        name: &str,
        data: &[i64],
        prior: BetaPrior,
    ) -> Result<(), DomainError> {
        let data = BinaryVariantData::from_observations(data)?;
        self.insert(name, data, prior)
    }

    /// Add pre-aggregated counts for a variant
    pub fn add_variant_data_agg(
        &mut self,
        name: &str,
        totals: u64,
        positives: u64,
        prior: BetaPrior,
    ) -> Result<(), DomainError> {
        let data = BinaryVariantData::new(totals, positives)?;
        self.insert(name, data, prior)
    }

    /// Closed-form posterior of a variant, if present
    pub fn posterior(&self, name: &str) -> Option<BetaPosterior> {
        self.variants
            .iter()
            .find(|v| v.name == name)
            .map(|v| v.posterior)
    }

    pub fn data(&self, name: &str) -> Option<BinaryVariantData> {
        self.variants.iter().find(|v| v.name == name).map(|v| v.data)
    }

    fn insert(
        &mut self,
        name: &str,
        data: BinaryVariantData,
        prior: BetaPrior,
    ) -> Result<(), DomainError> {
        if !self.state.can_transition_to(TestState::HasData) {
            return Err(DomainError::internal(format!(
                "Cannot add variant data in state {}",
                self.state
            )));
        }
        validate_variant_name(name)?;
        prior.validate()?;

        let variant = BinaryVariant {
            name: name.to_string(),
            data,
            prior,
            posterior: prior.update(data.totals, data.positives),
        };

        match self.variants.iter_mut().find(|v| v.name == name) {
            Some(existing) => {
                info!(variant = %name, "Variant already exists, replacing its data");
                *existing = variant;
            }
            None => self.variants.push(variant),
        }

        self.state = TestState::HasData;
        Ok(())
    }

    fn decision_summary(
        &self,
        sim_count: usize,
        seed: Option<u64>,
    ) -> Result<DecisionSummary, DomainError> {
        if self.variants.iter().all(|v| v.data.positives == 0) {
            debug!(
                variants = self.variants.len(),
                "No positive observations in any variant, results are not comparable"
            );
            return Ok(DecisionSummary::degenerate(self.variants.len()));
        }

        let mut root = SeedSequence::new(seed);
        let seeds = root.spawn(self.variants.len());

        let matrix = self
            .variants
            .iter()
            .zip(&seeds)
            .map(|(v, seed)| {
                beta_posterior(v.data.totals, v.data.positives, v.prior, sim_count, seed)
                    .map(|draws| draws.samples)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(summarize(&matrix)?)
    }
}

impl ExperimentTest for BinaryDataTest {
    type Output = BinaryEvaluationResult;

    fn state(&self) -> TestState {
        self.state
    }

    fn variant_names(&self) -> Vec<&str> {
        self.variants.iter().map(|v| v.name.as_str()).collect()
    }

    fn evaluate(
        &mut self,
        sim_count: usize,
        seed: Option<u64>,
    ) -> Result<Vec<BinaryEvaluationResult>, DomainError> {
        validate_sim_count(sim_count)?;

        if !self.state.is_evaluable() || self.variants.is_empty() {
            return Err(ExperimentValidationError::NoVariants.into());
        }

        debug!(variants = self.variants.len(), sim_count, "Evaluating binary test");

        let summary = self.decision_summary(sim_count, seed)?;

        let results = self
            .variants
            .iter()
            .enumerate()
            .map(|(i, v)| BinaryEvaluationResult {
                variant: v.name.clone(),
                totals: v.data.totals,
                positives: v.data.positives,
                positive_rate: v.data.positive_rate(),
                prob_being_best: summary.prob_being_best[i],
                expected_loss: summary.expected_loss[i],
                expected_total_gain: summary.total_gain_at(i),
                a_post_beta: v.posterior.a,
                b_post_beta: v.posterior.b,
            })
            .collect();

        self.state = TestState::Evaluated;
        debug!(variants = self.variants.len(), "Binary test evaluated");
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::experiment::DEFAULT_SIM_COUNT;

    fn two_variant_test() -> BinaryDataTest {
        let mut test = BinaryDataTest::new();
        test.add_variant_data_agg("A", 1000, 100, BetaPrior::default())
            .unwrap();
        test.add_variant_data_agg("B", 1000, 150, BetaPrior::default())
            .unwrap();
        test
    }

    mod add_variant_tests {
        use super::*;

        #[test]
        fn test_raw_observations() {
            let mut test = BinaryDataTest::new();
            assert_eq!(test.state(), TestState::Empty);

            test.add_variant_data("A", &[0, 1, 1, 0, 0], BetaPrior::default())
                .unwrap();

            assert_eq!(test.state(), TestState::HasData);
            assert_eq!(test.data("A"), Some(BinaryVariantData { totals: 5, positives: 2 }));
            assert_eq!(
                test.posterior("A"),
                Some(BetaPosterior { a: 2.5, b: 3.5 })
            );
        }

        #[test]
        fn test_rejects_non_binary_and_empty() {
            let mut test = BinaryDataTest::new();

            let err = test
                .add_variant_data("A", &[0, 2], BetaPrior::default())
                .unwrap_err();
            assert_eq!(
                err.as_validation(),
                Some(&ExperimentValidationError::NonBinaryValue(2))
            );

            let err = test
                .add_variant_data("A", &[], BetaPrior::default())
                .unwrap_err();
            assert_eq!(err.as_validation(), Some(&ExperimentValidationError::EmptyData));
            assert_eq!(test.state(), TestState::Empty);
        }

        #[test]
        fn test_rejects_bad_aggregates_and_priors() {
            let mut test = BinaryDataTest::new();

            assert!(test
                .add_variant_data_agg("A", 10, 11, BetaPrior::default())
                .is_err());
            assert!(test
                .add_variant_data_agg("A", 0, 0, BetaPrior::default())
                .is_err());
            assert!(test
                .add_variant_data_agg("A", 10, 1, BetaPrior { a: 0.0, b: 1.0 })
                .is_err());
            assert!(test
                .add_variant_data_agg("  ", 10, 1, BetaPrior::default())
                .is_err());
        }

        #[test]
        fn test_readding_replaces_in_place() {
            let mut test = two_variant_test();
            test.add_variant_data_agg("A", 50, 5, BetaPrior::default())
                .unwrap();

            assert_eq!(test.variant_names(), vec!["A", "B"]);
            assert_eq!(test.data("A").unwrap().totals, 50);
            assert_eq!(test.variant_count(), 2);
        }
    }

    mod evaluate_tests {
        use super::*;

        #[test]
        fn test_better_variant_wins() {
            let mut test = two_variant_test();
            let results = test.evaluate(DEFAULT_SIM_COUNT, Some(42)).unwrap();

            assert_eq!(results.len(), 2);
            assert_eq!(results[0].variant, "A");
            assert_eq!(results[0].positive_rate, 0.1);
            assert_eq!(results[1].positive_rate, 0.15);
            assert!(results[1].prob_being_best > results[0].prob_being_best);

            let total: f64 = results.iter().map(|r| r.prob_being_best).sum();
            assert!((total - 1.0).abs() <= 1.0 / DEFAULT_SIM_COUNT as f64);

            assert!(results[1].expected_loss < results[0].expected_loss);
            assert_eq!(
                results[0].expected_total_gain.unwrap(),
                -results[1].expected_total_gain.unwrap()
            );
            assert_eq!(test.state(), TestState::Evaluated);
        }

        #[test]
        fn test_posterior_hyperparameters_reported() {
            let mut test = two_variant_test();
            let results = test.evaluate(1_000, Some(1)).unwrap();

            assert_eq!(results[0].a_post_beta, 100.5);
            assert_eq!(results[0].b_post_beta, 900.5);
            assert_eq!(results[1].posterior(), BetaPosterior { a: 150.5, b: 850.5 });
        }

        #[test]
        fn test_same_seed_is_deterministic() {
            let mut test = two_variant_test();
            let first = test.evaluate(5_000, Some(7)).unwrap();
            let second = test.evaluate(5_000, Some(7)).unwrap();
            assert_eq!(first, second);
        }

        #[test]
        fn test_all_zero_positives_is_degenerate() {
            let mut test = BinaryDataTest::new();
            for name in ["A", "B", "C"] {
                test.add_variant_data_agg(name, 100, 0, BetaPrior::default())
                    .unwrap();
            }

            let results = test.evaluate(DEFAULT_SIM_COUNT, None).unwrap();

            assert!(results.iter().all(|r| r.prob_being_best == 0.3333333));
            assert!(results.iter().all(|r| r.expected_loss.is_nan()));
            assert!(results.iter().all(|r| r.expected_total_gain.is_none()));
            assert_eq!(results[0].b_post_beta, 100.5);
        }

        #[test]
        fn test_three_variants_have_no_total_gain() {
            let mut test = two_variant_test();
            test.add_variant_data_agg("C", 1000, 120, BetaPrior::default())
                .unwrap();

            let results = test.evaluate(2_000, Some(3)).unwrap();
            assert!(results.iter().all(|r| r.expected_total_gain.is_none()));
        }

        #[test]
        fn test_lifecycle_follows_state_transitions() {
            let mut test = BinaryDataTest::new();
            assert!(test.evaluate(1_000, Some(1)).is_err());
            assert_eq!(test.state(), TestState::Empty);

            test.add_variant_data_agg("A", 100, 10, BetaPrior::default())
                .unwrap();
            test.add_variant_data_agg("B", 100, 20, BetaPrior::default())
                .unwrap();
            assert_eq!(test.state(), TestState::HasData);

            test.evaluate(1_000, Some(1)).unwrap();
            assert_eq!(test.state(), TestState::Evaluated);
            test.evaluate(1_000, Some(1)).unwrap();
            assert_eq!(test.state(), TestState::Evaluated);

            test.add_variant_data_agg("C", 100, 15, BetaPrior::default())
                .unwrap();
            assert_eq!(test.state(), TestState::HasData);
            assert_eq!(test.evaluate(1_000, Some(1)).unwrap().len(), 3);
        }

        #[test]
        fn test_requires_variants_and_draws() {
            let mut empty = BinaryDataTest::new();
            let err = empty.evaluate(DEFAULT_SIM_COUNT, None).unwrap_err();
            assert_eq!(err.as_validation(), Some(&ExperimentValidationError::NoVariants));

            let mut test = two_variant_test();
            let err = test.evaluate(0, None).unwrap_err();
            assert_eq!(
                err.as_validation(),
                Some(&ExperimentValidationError::ZeroSimulations)
            );
        }
    }
}
