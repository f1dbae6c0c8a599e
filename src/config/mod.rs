#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

use crate::core::balancer::BalancingPolicy;
use crate::utils::error::{PackerError, Result};
use crate::utils::validation::{
    validate_path, validate_positive_amount, validate_positive_number, validate_range, Validate,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Everything a run needs, resolved from defaults, an optional TOML file and CLI overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub generator: GeneratorConfig,
    pub source: SourceConfig,
    pub allocation: AllocationConfig,
    pub report: ReportConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub merchants: u32,
    pub orders_per_merchant: u32,
    pub min_amount: Decimal,
    pub max_amount: Decimal,
    /// Fixed seed for reproducible runs; entropy-seeded when absent.
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            merchants: 3500,
            orders_per_merchant: 612,
            min_amount: Decimal::new(10_00, 2),
            max_amount: Decimal::new(999_99, 2),
            seed: None,
        }
    }
}

impl GeneratorConfig {
    pub fn total_orders(&self) -> Option<usize> {
        (self.merchants as usize).checked_mul(self.orders_per_merchant as usize)
    }
}

/// Where orders come from. Without an input file the random generator is used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub input: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationConfig {
    pub limit: Decimal,
    pub absolute_cap: Decimal,
    pub reserved_certificates: usize,
    pub balancing: BalancingPolicy,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            limit: Decimal::new(500_000, 0),
            absolute_cap: Decimal::new(500_000, 0),
            reserved_certificates: 30,
            balancing: BalancingPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub format: ReportFormat,
    /// Certificates shown from each end of the run.
    pub sample_size: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: ReportFormat::Text,
            sample_size: 3,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl Validate for GeneratorConfig {
    fn validate(&self) -> Result<()> {
        validate_positive_number("generator.merchants", self.merchants as usize, 1)?;
        validate_positive_number(
            "generator.orders_per_merchant",
            self.orders_per_merchant as usize,
            1,
        )?;
        validate_positive_amount("generator.min_amount", self.min_amount)?;
        if self.max_amount < self.min_amount {
            return Err(PackerError::InvalidConfigValueError {
                field: "generator.max_amount".to_string(),
                value: self.max_amount.to_string(),
                reason: format!("Must not be below min_amount ({})", self.min_amount),
            });
        }
        Ok(())
    }
}

impl Validate for AllocationConfig {
    fn validate(&self) -> Result<()> {
        validate_positive_amount("allocation.limit", self.limit)?;
        validate_positive_amount("allocation.absolute_cap", self.absolute_cap)?;
        validate_positive_number(
            "allocation.reserved_certificates",
            self.reserved_certificates,
            1,
        )?;
        self.balancing.validate()
    }
}

impl Validate for BalancingPolicy {
    fn validate(&self) -> Result<()> {
        validate_range(
            "allocation.balancing.low_water",
            self.low_water,
            Decimal::ZERO,
            Decimal::ONE,
        )?;
        if self.high_water < Decimal::ONE {
            return Err(PackerError::InvalidConfigValueError {
                field: "allocation.balancing.high_water".to_string(),
                value: self.high_water.to_string(),
                reason: "Value must be at least 1".to_string(),
            });
        }
        validate_range(
            "allocation.balancing.overshoot_clamp",
            self.overshoot_clamp,
            Decimal::new(1, 2),
            Decimal::ONE,
        )
    }
}

impl Validate for RunConfig {
    fn validate(&self) -> Result<()> {
        match &self.source.input {
            Some(path) => validate_path("source.input", &path.to_string_lossy())?,
            None => self.generator.validate()?,
        }
        self.allocation.validate()?;
        validate_range("report.sample_size", self.report.sample_size, 0, 1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_production_run() {
        let config = RunConfig::default();
        assert_eq!(config.generator.merchants, 3500);
        assert_eq!(config.generator.orders_per_merchant, 612);
        assert_eq!(config.generator.total_orders(), Some(2_142_000));
        assert_eq!(config.allocation.limit, Decimal::new(500_000, 0));
        assert_eq!(config.allocation.reserved_certificates, 30);
        assert_eq!(config.report.sample_size, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_generator_amount_bounds_are_checked() {
        let config = GeneratorConfig {
            min_amount: Decimal::new(50, 0),
            max_amount: Decimal::new(10, 0),
            ..GeneratorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_generator_skipped_when_input_file_given() {
        let mut config = RunConfig::default();
        config.generator.merchants = 0;
        assert!(config.validate().is_err());

        config.source.input = Some(PathBuf::from("orders.csv"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_balancing_policy_bounds() {
        let mut config = AllocationConfig::default();
        config.balancing.low_water = Decimal::new(12, 1);
        assert!(config.validate().is_err());

        let mut config = AllocationConfig::default();
        config.balancing.high_water = Decimal::new(9, 1);
        assert!(config.validate().is_err());

        let mut config = AllocationConfig::default();
        config.reserved_certificates = 0;
        assert!(config.validate().is_err());
    }
}
