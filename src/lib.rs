pub mod config;
pub mod core;
pub mod domain;
pub mod report;
pub mod sources;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{AllocationConfig, GeneratorConfig, ReportFormat, RunConfig};
pub use crate::core::{allocate, balance, pack, Allocation, AllocationEngine, BalancingPolicy, SlotPlan};
pub use domain::model::{CapacityLimit, Certificate, CertificateKind, Order};
pub use domain::ports::OrderSource;
pub use report::RunReport;
pub use sources::{ConfiguredSource, CsvOrderSource, RandomOrderSource};
pub use utils::error::{IntegrityWarning, PackerError, Result};
