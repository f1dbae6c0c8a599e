pub mod console;
pub mod stats;

pub use stats::{percentile, CertificateStats};

use crate::core::allocator::Allocation;
use crate::core::packer::SlotPlan;
use crate::domain::model::{Certificate, CertificateId, CertificateKind, Order};
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashSet;
use std::time::Duration;

/// One line of the sample listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CertificateSummary {
    pub id: CertificateId,
    pub kind: CertificateKind,
    pub amount: Decimal,
    pub fill_percentage: Decimal,
    pub order_count: usize,
    pub merchant_count: usize,
}

impl CertificateSummary {
    pub fn new(certificate: &Certificate, limit: Decimal) -> Self {
        let merchants: HashSet<_> = certificate.orders().iter().map(|o| o.merchant_id).collect();
        Self {
            id: certificate.id(),
            kind: certificate.kind(),
            amount: certificate.amount(),
            fill_percentage: certificate.fill_percentage(limit).round_dp(2),
            order_count: certificate.len(),
            merchant_count: merchants.len(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PhaseTimings {
    pub load_ms: u128,
    pub allocate_ms: u128,
}

impl PhaseTimings {
    pub fn new(load: Duration, allocate: Duration) -> Self {
        Self {
            load_ms: load.as_millis(),
            allocate_ms: allocate.as_millis(),
        }
    }
}

/// Everything printed at the end of a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub source: String,
    pub generated_at: DateTime<Utc>,
    pub order_count: usize,
    pub merchant_count: usize,
    pub total_order_amount: Decimal,
    pub limit: Decimal,
    /// `total / limit`, unrounded
    pub theoretical_certificates: f64,
    pub plan: SlotPlan,
    pub main_certificates: usize,
    pub balancing_certificates: usize,
    pub stats: CertificateStats,
    pub main_samples: Vec<CertificateSummary>,
    pub balancing_samples: Vec<CertificateSummary>,
    pub warnings: Vec<String>,
    pub timings: PhaseTimings,
}

impl RunReport {
    pub fn build(
        source: String,
        orders: &[Order],
        allocation: &Allocation,
        sample_size: usize,
        timings: PhaseTimings,
    ) -> Self {
        let limit = allocation.limit.value();
        let total_order_amount: Decimal = orders.iter().map(|o| o.amount).sum();
        let merchants: HashSet<_> = orders.iter().map(|o| o.merchant_id).collect();

        let main_samples = allocation
            .main
            .iter()
            .take(sample_size)
            .map(|c| CertificateSummary::new(c, limit))
            .collect();
        let tail_start = allocation.balancing.len().saturating_sub(sample_size);
        let balancing_samples = allocation.balancing[tail_start..]
            .iter()
            .map(|c| CertificateSummary::new(c, limit))
            .collect();

        Self {
            source,
            generated_at: Utc::now(),
            order_count: orders.len(),
            merchant_count: merchants.len(),
            total_order_amount,
            limit,
            theoretical_certificates: (total_order_amount / limit).to_f64().unwrap_or(0.0),
            plan: allocation.plan,
            main_certificates: allocation.main.len(),
            balancing_certificates: allocation.balancing.len(),
            stats: CertificateStats::from_certificates(allocation.certificates(), limit),
            main_samples,
            balancing_samples,
            warnings: allocation.warnings.iter().map(ToString::to_string).collect(),
            timings,
        }
    }

    pub fn certificate_count(&self) -> usize {
        self.main_certificates + self.balancing_certificates
    }
}
