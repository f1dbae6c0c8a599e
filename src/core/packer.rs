use crate::core::residual_index::ResidualIndex;
use crate::domain::model::{
    CapacityLimit, Certificate, CertificateBuilder, CertificateId, CertificateKind, Order,
};
use crate::utils::error::IntegrityWarning;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

/// How many certificates the run aims for and how they split between the two phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotPlan {
    /// `ceil(total / limit)`
    pub target: usize,
    /// Certificates left for the balancing pass.
    pub reserved: usize,
    /// Builders the packer may open.
    pub main_slots: usize,
}

impl SlotPlan {
    /// `reserved_quota` applies once the target exceeds it; smaller runs reserve a third.
    pub fn compute(total: Decimal, limit: CapacityLimit, reserved_quota: usize) -> Self {
        let target = (total / limit.value())
            .ceil()
            .to_usize()
            .unwrap_or(usize::MAX);

        let reserved = if target <= reserved_quota {
            (target / 3).max(1)
        } else {
            reserved_quota
        };

        Self {
            target,
            reserved,
            main_slots: target.saturating_sub(reserved).max(1),
        }
    }
}

/// Output of the first-fit-decreasing phase.
#[derive(Debug, Clone)]
pub struct PackOutcome {
    pub plan: SlotPlan,
    pub certificates: Vec<Certificate>,
    /// Orders that fit no main builder, in the descending order they were visited.
    pub leftover: Vec<Order>,
    pub warnings: Vec<IntegrityWarning>,
}

/// Largest amount first; equal amounts keep ascending id order.
pub fn sort_descending(orders: &[Order]) -> Vec<Order> {
    let mut sorted = orders.to_vec();
    sorted.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.id.cmp(&b.id)));
    sorted
}

/// First-fit-decreasing into at most `plan.main_slots` builders.
///
/// Each order goes to the earliest-opened builder with room for it. When none has room a new
/// builder is opened while slots remain; after that the order is deferred to `leftover`.
/// An order larger than the limit is flagged and can only ever open a builder of its own.
pub fn pack(orders: &[Order], limit: CapacityLimit, reserved_quota: usize) -> PackOutcome {
    let total: Decimal = orders.iter().map(|o| o.amount).sum();
    let plan = SlotPlan::compute(total, limit, reserved_quota);
    tracing::debug!(
        "Slot plan: target {}, reserved {}, main slots {}",
        plan.target,
        plan.reserved,
        plan.main_slots
    );

    let cap = limit.value();
    let slots = plan.main_slots.min(orders.len());
    let mut builders: Vec<CertificateBuilder> = Vec::with_capacity(slots);
    let mut index = ResidualIndex::with_capacity(slots);
    let mut leftover = Vec::new();
    let mut warnings = Vec::new();

    for order in sort_descending(orders) {
        if order.amount > cap {
            tracing::warn!(
                "⚠️ Order {} exceeds the limit on its own: {:.2}",
                order.id,
                order.amount
            );
            warnings.push(IntegrityWarning::OverCapacityOrder {
                order_id: order.id,
                amount: order.amount,
                limit: cap,
            });
        }

        match index.first_fit(order.amount) {
            Some(slot) => {
                let builder = &mut builders[slot];
                builder.push(order);
                index.set(slot, cap - builder.amount());
            }
            None if builders.len() < plan.main_slots => {
                index.push(cap - order.amount);
                builders.push(CertificateBuilder::seeded(order));
            }
            None => leftover.push(order),
        }
    }

    let certificates: Vec<Certificate> = builders
        .into_iter()
        .enumerate()
        .map(|(i, builder)| builder.finish(i as CertificateId + 1, CertificateKind::Main))
        .collect();

    tracing::debug!(
        "Packed {} orders into {} main certificates, {} left over",
        orders.len() - leftover.len(),
        certificates.len(),
        leftover.len()
    );

    PackOutcome {
        plan,
        certificates,
        leftover,
        warnings,
    }
}
