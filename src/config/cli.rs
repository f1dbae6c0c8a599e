use crate::config::{ReportFormat, RunConfig};
use crate::utils::error::Result;
use clap::Parser;
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "cert-packer")]
#[command(about = "Allocate merchant orders into capacity-limited certificates")]
pub struct CliConfig {
    /// Path to a TOML run file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Read orders from a CSV file (id,amount,merchant_id) instead of generating them
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Number of merchants to generate orders for
    #[arg(long)]
    pub merchants: Option<u32>,

    /// Orders generated per merchant
    #[arg(long)]
    pub orders_per_merchant: Option<u32>,

    /// Seed for the order generator
    #[arg(long)]
    pub seed: Option<u64>,

    /// Certificate limit (clamped to the absolute cap)
    #[arg(long)]
    pub limit: Option<Decimal>,

    /// Certificates reserved for the balancing pass
    #[arg(long)]
    pub reserved: Option<usize>,

    /// Certificates shown from each end of the run
    #[arg(long)]
    pub sample_size: Option<usize>,

    /// Report output format
    #[arg(long, value_enum)]
    pub format: Option<ReportFormat>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    /// Log process CPU and memory after each phase
    #[arg(long)]
    pub monitor: bool,

    /// Show the resolved configuration and slot plan without packing
    #[arg(long)]
    pub dry_run: bool,
}

impl CliConfig {
    /// Defaults, then the run file if given, then any flags set on the command line.
    pub fn resolve(&self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path.display());
                RunConfig::from_file(path)?
            }
            None => RunConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut RunConfig) {
        if let Some(input) = &self.input {
            config.source.input = Some(input.clone());
        }
        if let Some(merchants) = self.merchants {
            config.generator.merchants = merchants;
        }
        if let Some(orders) = self.orders_per_merchant {
            config.generator.orders_per_merchant = orders;
        }
        if self.seed.is_some() {
            config.generator.seed = self.seed;
        }
        if let Some(limit) = self.limit {
            config.allocation.limit = limit;
        }
        if let Some(reserved) = self.reserved {
            config.allocation.reserved_certificates = reserved;
        }
        if let Some(sample_size) = self.sample_size {
            config.report.sample_size = sample_size;
        }
        if let Some(format) = self.format {
            config.report.format = format;
        }
        if self.monitor {
            config.monitoring.enabled = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let cli = CliConfig::parse_from([
            "cert-packer",
            "--merchants",
            "12",
            "--limit",
            "1000.50",
            "--format",
            "json",
            "--dry-run",
        ]);

        assert_eq!(cli.merchants, Some(12));
        assert_eq!(cli.limit, Some(Decimal::new(1000_50, 2)));
        assert_eq!(cli.format, Some(ReportFormat::Json));
        assert!(cli.dry_run);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = CliConfig {
            seed: Some(99),
            reserved: Some(5),
            monitor: true,
            ..CliConfig::default()
        };

        let config = cli.resolve().unwrap();
        assert_eq!(config.generator.seed, Some(99));
        assert_eq!(config.generator.merchants, 3500);
        assert_eq!(config.allocation.reserved_certificates, 5);
        assert!(config.monitoring.enabled);
    }
}
