//! Per-variant sufficient statistics

use serde::{Deserialize, Serialize};

use super::validation::{validate_counts, ExperimentValidationError};

// ============================================================================
// BinaryVariantData
// ============================================================================

/// Aggregated binary outcomes for one variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryVariantData {
    pub totals: u64,
    pub positives: u64,
}

impl BinaryVariantData {
    /// Create from aggregates, validating `0 <= positives <= totals` and `totals > 0`
    pub fn new(totals: u64, positives: u64) -> Result<Self, ExperimentValidationError> {
        validate_counts(totals, positives)?;
        Ok(Self { totals, positives })
    }

    /// Aggregate raw observations, each of which must be exactly 0 or 1
    pub fn from_observations(data: &[i64]) -> Result<Self, ExperimentValidationError> {
        if data.is_empty() {
            return Err(ExperimentValidationError::EmptyData);
        }

        if let Some(&bad) = data.iter().find(|&&v| v != 0 && v != 1) {
            return Err(ExperimentValidationError::NonBinaryValue(bad));
        }

        let positives = data.iter().filter(|&&v| v == 1).count() as u64;
        Self::new(data.len() as u64, positives)
    }

    /// Share of positive observations, rounded to 5 decimals
    pub fn positive_rate(&self) -> f64 {
        round_to(self.positives as f64 / self.totals as f64, 5)
    }
}

// ============================================================================
// DeltaLognormalVariantData
// ============================================================================

/// Aggregated zero-inflated continuous outcomes for one variant
///
/// `sum_logs` and `sum_logs_2` cover only the `positives` subset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeltaLognormalVariantData {
    pub totals: u64,
    pub positives: u64,
    pub sum_values: f64,
    pub sum_logs: f64,
    pub sum_logs_2: f64,
}

impl DeltaLognormalVariantData {
    pub fn new(
        totals: u64,
        positives: u64,
        sum_values: f64,
        sum_logs: f64,
        sum_logs_2: f64,
    ) -> Result<Self, ExperimentValidationError> {
        validate_counts(totals, positives)?;

        if ![sum_values, sum_logs, sum_logs_2].iter().all(|v| v.is_finite()) {
            return Err(ExperimentValidationError::NonFiniteAggregate);
        }

        Ok(Self {
            totals,
            positives,
            sum_values,
            sum_logs,
            sum_logs_2,
        })
    }

    /// Aggregate raw non-negative values; zeros count toward totals only
    pub fn from_values(values: &[f64]) -> Result<Self, ExperimentValidationError> {
        if values.is_empty() {
            return Err(ExperimentValidationError::EmptyData);
        }

        let mut positives = 0u64;
        let mut sum_values = 0.0;
        let mut sum_logs = 0.0;
        let mut sum_logs_2 = 0.0;

        for &value in values {
            if !value.is_finite() || value < 0.0 {
                return Err(ExperimentValidationError::InvalidContinuousValue(value));
            }

            sum_values += value;

            if value > 0.0 {
                let log = value.ln();
                positives += 1;
                sum_logs += log;
                sum_logs_2 += log * log;
            }
        }

        Self::new(values.len() as u64, positives, sum_values, sum_logs, sum_logs_2)
    }

    /// Binary view of the same data (conversion component)
    pub fn conversions(&self) -> BinaryVariantData {
        BinaryVariantData {
            totals: self.totals,
            positives: self.positives,
        }
    }

    /// Average value over all observations, rounded to 5 decimals
    pub fn avg_values(&self) -> f64 {
        round_to(self.sum_values / self.totals as f64, 5)
    }

    /// Average value over positive observations, NaN without positives
    pub fn avg_positive_values(&self) -> f64 {
        if self.positives == 0 {
            return f64::NAN;
        }
        round_to(self.sum_values / self.positives as f64, 5)
    }

    /// Sum two aggregates of the same group
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            totals: self.totals + other.totals,
            positives: self.positives + other.positives,
            sum_values: self.sum_values + other.sum_values,
            sum_logs: self.sum_logs + other.sum_logs,
            sum_logs_2: self.sum_logs_2 + other.sum_logs_2,
        }
    }
}

/// Round half to even to `decimals` places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_breaks_ties_to_even() {
        assert_eq!(round_to(0.125, 2), 0.12);
        assert_eq!(round_to(0.375, 2), 0.38);
        assert_eq!(round_to(2.5, 0), 2.0);
        assert_eq!(round_to(-2.5, 0), -2.0);
        assert_eq!(round_to(1.0 / 3.0, 7), 0.3333333);
    }

    mod binary_tests {
        use super::*;

        #[test]
        fn test_from_observations() {
            let data = BinaryVariantData::from_observations(&[0, 1, 1, 0, 1]).unwrap();
            assert_eq!(data.totals, 5);
            assert_eq!(data.positives, 3);
            assert_eq!(data.positive_rate(), 0.6);
        }

        #[test]
        fn test_empty_observations() {
            assert_eq!(
                BinaryVariantData::from_observations(&[]),
                Err(ExperimentValidationError::EmptyData)
            );
        }

        #[test]
        fn test_non_binary_observation() {
            assert_eq!(
                BinaryVariantData::from_observations(&[0, 1, 2]),
                Err(ExperimentValidationError::NonBinaryValue(2))
            );
            assert_eq!(
                BinaryVariantData::from_observations(&[-1, 0]),
                Err(ExperimentValidationError::NonBinaryValue(-1))
            );
        }

        #[test]
        fn test_positive_rate_rounding() {
            let data = BinaryVariantData::new(3, 1).unwrap();
            assert_eq!(data.positive_rate(), 0.33333);
        }
    }

    mod delta_lognormal_tests {
        use super::*;

        #[test]
        fn test_from_values() {
            let values = [0.0, 1.0, 0.0, std::f64::consts::E, 0.0];
            let data = DeltaLognormalVariantData::from_values(&values).unwrap();

            assert_eq!(data.totals, 5);
            assert_eq!(data.positives, 2);
            assert!((data.sum_values - (1.0 + std::f64::consts::E)).abs() < 1e-12);
            assert!((data.sum_logs - 1.0).abs() < 1e-12);
            assert!((data.sum_logs_2 - 1.0).abs() < 1e-12);
        }

        #[test]
        fn test_rejects_negative_and_non_finite() {
            assert_eq!(
                DeltaLognormalVariantData::from_values(&[1.0, -0.5]),
                Err(ExperimentValidationError::InvalidContinuousValue(-0.5))
            );
            assert!(DeltaLognormalVariantData::from_values(&[f64::NAN]).is_err());
            assert_eq!(
                DeltaLognormalVariantData::from_values(&[]),
                Err(ExperimentValidationError::EmptyData)
            );
        }

        #[test]
        fn test_averages() {
            let data = DeltaLognormalVariantData::new(4, 2, 10.0, 0.0, 0.0).unwrap();
            assert_eq!(data.avg_values(), 2.5);
            assert_eq!(data.avg_positive_values(), 5.0);

            let zeros = DeltaLognormalVariantData::from_values(&[0.0, 0.0]).unwrap();
            assert_eq!(zeros.avg_values(), 0.0);
            assert!(zeros.avg_positive_values().is_nan());
        }

        #[test]
        fn test_merge() {
            let a = DeltaLognormalVariantData::from_values(&[0.0, 2.0]).unwrap();
            let b = DeltaLognormalVariantData::from_values(&[3.0]).unwrap();
            let merged = a.merge(&b);
            let direct = DeltaLognormalVariantData::from_values(&[0.0, 2.0, 3.0]).unwrap();

            assert_eq!(merged.totals, direct.totals);
            assert_eq!(merged.positives, direct.positives);
            assert!((merged.sum_logs - direct.sum_logs).abs() < 1e-12);
        }

        #[test]
        fn test_conversions_view() {
            let data = DeltaLognormalVariantData::new(10, 4, 20.0, 1.0, 2.0).unwrap();
            assert_eq!(data.conversions(), BinaryVariantData { totals: 10, positives: 4 });
        }
    }
}
