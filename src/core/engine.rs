use crate::config::AllocationConfig;
use crate::core::allocator::allocate;
use crate::core::packer::SlotPlan;
use crate::domain::model::{CapacityLimit, Order};
use crate::domain::ports::OrderSource;
use crate::report::{PhaseTimings, RunReport};
use crate::utils::error::{PackerError, Result};
use crate::utils::monitor::SystemMonitor;
use rust_decimal::Decimal;
use std::time::Instant;

/// What a run would do, computed without packing.
#[derive(Debug, Clone, PartialEq)]
pub struct DryRun {
    pub source: String,
    pub order_count: usize,
    pub total_amount: Decimal,
    pub limit: CapacityLimit,
    pub plan: SlotPlan,
}

/// Drives one batch: load orders, allocate, build the report.
pub struct AllocationEngine<S: OrderSource> {
    source: S,
    config: AllocationConfig,
    sample_size: usize,
    monitor: SystemMonitor,
}

impl<S: OrderSource> AllocationEngine<S> {
    pub fn new(source: S, config: AllocationConfig, sample_size: usize) -> Self {
        Self::new_with_monitoring(source, config, sample_size, false)
    }

    pub fn new_with_monitoring(
        source: S,
        config: AllocationConfig,
        sample_size: usize,
        monitor_enabled: bool,
    ) -> Self {
        Self {
            source,
            config,
            sample_size,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    fn load(&mut self) -> Result<Vec<Order>> {
        tracing::info!("Loading orders from {}", self.source.describe());
        let orders = self.source.load()?;
        if orders.is_empty() {
            return Err(PackerError::EmptyInputError);
        }
        self.monitor.log_stats("Order loading");
        Ok(orders)
    }

    /// Run the whole batch. A failing source aborts before any certificate is built.
    pub fn run(&mut self) -> Result<RunReport> {
        let started = Instant::now();
        let orders = self.load()?;
        let load_elapsed = started.elapsed();
        tracing::info!("Loaded {} orders in {:?}", orders.len(), load_elapsed);

        let started = Instant::now();
        let allocation = allocate(&orders, &self.config)?;
        let allocate_elapsed = started.elapsed();
        tracing::info!(
            "Built {} certificates in {:?} ({} warnings)",
            allocation.certificate_count(),
            allocate_elapsed,
            allocation.warnings.len()
        );
        self.monitor.log_stats("Allocation");

        let report = RunReport::build(
            self.source.describe(),
            &orders,
            &allocation,
            self.sample_size,
            PhaseTimings::new(load_elapsed, allocate_elapsed),
        );
        self.monitor.log_final_stats();
        Ok(report)
    }

    /// Load orders and compute the slot plan only.
    pub fn dry_run(&mut self) -> Result<DryRun> {
        let limit = CapacityLimit::new(self.config.limit, self.config.absolute_cap)?;
        let orders = self.load()?;
        let total_amount: Decimal = orders.iter().map(|o| o.amount).sum();

        Ok(DryRun {
            source: self.source.describe(),
            order_count: orders.len(),
            total_amount,
            limit,
            plan: SlotPlan::compute(total_amount, limit, self.config.reserved_certificates),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct FixedSource {
        orders: Vec<Order>,
        loads: Cell<usize>,
    }

    impl FixedSource {
        fn new(amounts: &[i64]) -> Self {
            Self {
                orders: amounts
                    .iter()
                    .enumerate()
                    .map(|(i, a)| Order::new(i as u64 + 1, Decimal::new(*a, 0), 1))
                    .collect(),
                loads: Cell::new(0),
            }
        }
    }

    impl OrderSource for FixedSource {
        fn load(&self) -> Result<Vec<Order>> {
            self.loads.set(self.loads.get() + 1);
            Ok(self.orders.clone())
        }

        fn describe(&self) -> String {
            "fixed".to_string()
        }
    }

    struct FailingSource;

    impl OrderSource for FailingSource {
        fn load(&self) -> Result<Vec<Order>> {
            Err(PackerError::GenerationError {
                message: "boom".to_string(),
            })
        }

        fn describe(&self) -> String {
            "failing".to_string()
        }
    }

    fn config(limit: i64) -> AllocationConfig {
        AllocationConfig {
            limit: Decimal::new(limit, 0),
            ..AllocationConfig::default()
        }
    }

    #[test]
    fn test_run_produces_report() {
        let source = FixedSource::new(&[400, 300, 200, 100]);
        let mut engine = AllocationEngine::new(source, config(500), 3);

        let report = engine.run().unwrap();
        assert_eq!(report.source, "fixed");
        assert_eq!(report.order_count, 4);
        assert_eq!(report.stats.total_amount, Decimal::new(1_000, 0));
        assert_eq!(engine.source.loads.get(), 1);
    }

    #[test]
    fn test_failing_source_aborts() {
        let mut engine = AllocationEngine::new(FailingSource, config(500), 3);
        let err = engine.run().unwrap_err();
        assert!(matches!(err, PackerError::GenerationError { .. }));
    }

    #[test]
    fn test_empty_source_is_rejected() {
        let mut engine = AllocationEngine::new(FixedSource::new(&[]), config(500), 3);
        assert!(matches!(
            engine.run().unwrap_err(),
            PackerError::EmptyInputError
        ));
    }

    #[test]
    fn test_dry_run_reports_plan() {
        let source = FixedSource::new(&[400, 300, 200, 100]);
        let mut engine = AllocationEngine::new(source, config(500), 3);

        let dry = engine.dry_run().unwrap();
        assert_eq!(dry.order_count, 4);
        assert_eq!(dry.total_amount, Decimal::new(1_000, 0));
        assert_eq!(dry.plan.target, 2);
        assert_eq!(dry.plan.main_slots, 1);
    }
}
