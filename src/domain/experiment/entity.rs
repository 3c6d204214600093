//! Experiment domain entities

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::DomainError;

// ============================================================================
// TestState
// ============================================================================

/// Lifecycle of an experiment test instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TestState {
    /// No variant data added yet
    #[default]
    Empty,
    /// At least one variant present, not evaluated since the last change
    HasData,
    /// Evaluated with the current variant data
    Evaluated,
}

impl TestState {
    /// Check if the test can be evaluated
    pub fn is_evaluable(&self) -> bool {
        self.can_transition_to(Self::Evaluated)
    }

    /// Check if a transition to the target state is valid
    pub fn can_transition_to(&self, target: TestState) -> bool {
        match (self, target) {
            // add variant data
            (Self::Empty, Self::HasData) => true,
            (Self::HasData, Self::HasData) => true,
            (Self::Evaluated, Self::HasData) => true,
            // evaluate
            (Self::HasData, Self::Evaluated) => true,
            (Self::Evaluated, Self::Evaluated) => true,
            _ => false,
        }
    }
}

impl fmt::Display for TestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty"),
            Self::HasData => write!(f, "has_data"),
            Self::Evaluated => write!(f, "evaluated"),
        }
    }
}

// ============================================================================
// GroupRole
// ============================================================================

/// Side of a two-group experiment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupRole {
    Treatment,
    Control,
}

impl GroupRole {
    /// Both roles in evaluation order
    pub const ALL: [GroupRole; 2] = [GroupRole::Treatment, GroupRole::Control];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Treatment => "treatment",
            Self::Control => "control",
        }
    }
}

impl fmt::Display for GroupRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// DistributionFamily
// ============================================================================

/// Parametric family chosen for the positive part of a continuous outcome
///
/// The tag comes from a goodness-of-fit selector outside this crate. Only
/// the lognormal family has a decision-metric path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DistributionFamily {
    #[default]
    #[serde(rename = "lognorm")]
    Lognormal,
    #[serde(rename = "expon")]
    Exponential,
    #[serde(rename = "norm")]
    Normal,
    #[serde(rename = "gamma")]
    Gamma,
}

impl DistributionFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lognormal => "lognorm",
            Self::Exponential => "expon",
            Self::Normal => "norm",
            Self::Gamma => "gamma",
        }
    }

    /// Fail fast unless the family has an implemented evaluation path
    pub fn ensure_supported(&self) -> Result<(), DomainError> {
        match self {
            Self::Lognormal => Ok(()),
            other => Err(DomainError::not_implemented(format!(
                "Results for distribution '{}' are not implemented",
                other
            ))),
        }
    }
}

impl FromStr for DistributionFamily {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lognorm" => Ok(Self::Lognormal),
            "expon" => Ok(Self::Exponential),
            "norm" => Ok(Self::Normal),
            "gamma" => Ok(Self::Gamma),
            other => Err(DomainError::configuration(format!(
                "Unknown distribution family '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for DistributionFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
