use crate::config::AllocationConfig;
use crate::core::balancer::balance;
use crate::core::packer::{pack, SlotPlan};
use crate::domain::model::{CapacityLimit, Certificate, CertificateId, Order};
use crate::utils::error::{IntegrityWarning, Result};

/// Result of a full run: main certificates, the balancing tail and any integrity findings.
#[derive(Debug, Clone)]
pub struct Allocation {
    pub limit: CapacityLimit,
    pub plan: SlotPlan,
    pub main: Vec<Certificate>,
    pub balancing: Vec<Certificate>,
    pub warnings: Vec<IntegrityWarning>,
}

impl Allocation {
    /// Main certificates followed by the balancing tail, in id order.
    pub fn certificates(&self) -> impl Iterator<Item = &Certificate> {
        self.main.iter().chain(self.balancing.iter())
    }

    pub fn certificate_count(&self) -> usize {
        self.main.len() + self.balancing.len()
    }

    pub fn order_count(&self) -> usize {
        self.certificates().map(Certificate::len).sum()
    }

    pub fn into_certificates(self) -> Vec<Certificate> {
        let mut all = self.main;
        all.extend(self.balancing);
        all
    }
}

/// Pack, then balance the leftovers into the reserved tail, then check every certificate.
pub fn allocate(orders: &[Order], config: &AllocationConfig) -> Result<Allocation> {
    let limit = CapacityLimit::new(config.limit, config.absolute_cap)?;

    let outcome = pack(orders, limit, config.reserved_certificates);
    let start_id = outcome.certificates.len() as CertificateId + 1;
    let balancing = balance(
        &outcome.leftover,
        limit,
        outcome.plan.reserved,
        start_id,
        &config.balancing,
    );

    tracing::info!(
        "Allocated {} orders into {} main and {} balancing certificates",
        orders.len(),
        outcome.certificates.len(),
        balancing.len()
    );

    let mut warnings = outcome.warnings;
    warnings.extend(check_integrity(
        outcome.certificates.iter().chain(balancing.iter()),
        limit,
    ));

    Ok(Allocation {
        limit,
        plan: outcome.plan,
        main: outcome.certificates,
        balancing,
        warnings,
    })
}

/// Flag every certificate whose amount is above the limit.
pub fn check_integrity<'a>(
    certificates: impl IntoIterator<Item = &'a Certificate>,
    limit: CapacityLimit,
) -> Vec<IntegrityWarning> {
    certificates
        .into_iter()
        .filter(|cert| cert.amount() > limit.value())
        .map(|cert| {
            tracing::warn!(
                "⚠️ Certificate {} exceeds the limit: {:.2}",
                cert.id(),
                cert.amount()
            );
            IntegrityWarning::CertificateOverLimit {
                certificate_id: cert.id(),
                amount: cert.amount(),
                limit: limit.value(),
            }
        })
        .collect()
}
