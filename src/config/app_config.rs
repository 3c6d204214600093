use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::experiment::{
    DistributionFamily, GroupLabels, GroupRole, VariantPriors, DEFAULT_SIM_COUNT,
};

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub evaluation: EvaluationConfig,
    pub priors: PriorsConfig,
    pub groups: GroupLabels,
    pub runner: RunnerConfig,
    pub logging: LoggingConfig,
}

/// Monte-Carlo settings shared by every evaluation
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    pub sim_count: usize,
    /// `None` draws fresh OS entropy on every run
    pub seed: Option<u64>,
}

/// Initial priors of the first evaluated bucket
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct PriorsConfig {
    pub treatment: VariantPriors,
    pub control: VariantPriors,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub experiment_id: String,
    /// Buckets dated before this day are reported as too early
    pub initial_test_start: Option<NaiveDate>,
    pub revenue_distribution: DistributionFamily,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            sim_count: DEFAULT_SIM_COUNT,
            seed: Some(42),
        }
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            experiment_id: "default".to_string(),
            initial_test_start: None,
            revenue_distribution: DistributionFamily::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl PriorsConfig {
    pub fn for_role(&self, role: GroupRole) -> VariantPriors {
        match role {
            GroupRole::Treatment => self.treatment,
            GroupRole::Control => self.control,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("AB_EVAL")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
