use crate::domain::model::{
    CapacityLimit, Certificate, CertificateBuilder, CertificateId, CertificateKind, Order,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fill band used when spreading leftovers over the reserved certificates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalancingPolicy {
    /// A builder at or above `target * low_water` may be closed early.
    pub low_water: Decimal,
    /// ...when the next order would push it past `target * high_water`.
    pub high_water: Decimal,
    /// Target used instead when the even share would not fit under the limit.
    pub overshoot_clamp: Decimal,
}

impl Default for BalancingPolicy {
    fn default() -> Self {
        Self {
            low_water: Decimal::new(85, 2),
            high_water: Decimal::new(115, 2),
            overshoot_clamp: Decimal::new(9, 1),
        }
    }
}

impl BalancingPolicy {
    /// Even share of `total` over `slots`, clamped below the limit.
    pub fn target(&self, total: Decimal, slots: usize, limit: CapacityLimit) -> Decimal {
        let share = total / Decimal::from(slots.max(1));
        if share > limit.value() {
            limit.value() * self.overshoot_clamp
        } else {
            share
        }
    }
}

struct Emitter {
    next_id: CertificateId,
    certificates: Vec<Certificate>,
}

impl Emitter {
    fn close(&mut self, builder: CertificateBuilder) {
        if builder.is_empty() {
            return;
        }
        self.certificates
            .push(builder.finish(self.next_id, CertificateKind::Balancing));
        self.next_id += 1;
    }
}

/// Spread `leftover` over roughly `reserved_slots` certificates of similar size.
///
/// Orders are taken in the order given. A builder is closed when the next order would
/// cross the limit, or early when it already sits inside the fill band and the next order
/// would overshoot it, as long as at least one reserved slot remains for the rest.
/// Ids start at `start_id`.
pub fn balance(
    leftover: &[Order],
    limit: CapacityLimit,
    reserved_slots: usize,
    start_id: CertificateId,
    policy: &BalancingPolicy,
) -> Vec<Certificate> {
    if leftover.is_empty() {
        return Vec::new();
    }

    let slots = reserved_slots.max(1);
    let cap = limit.value();
    let total: Decimal = leftover.iter().map(|o| o.amount).sum();
    let target = policy.target(total, slots, limit);
    let low = target * policy.low_water;
    let high = target * policy.high_water;

    tracing::debug!(
        "Balancing {} leftover orders ({:.2}) over {} slots, target {:.2}",
        leftover.len(),
        total,
        slots,
        target
    );

    let mut emitter = Emitter {
        next_id: start_id,
        certificates: Vec::with_capacity(slots),
    };
    let mut current = CertificateBuilder::new();

    for &order in leftover {
        if !current.fits(&order, cap) {
            emitter.close(std::mem::replace(
                &mut current,
                CertificateBuilder::seeded(order),
            ));
            continue;
        }

        let close_early = !current.is_empty()
            && current.amount() >= low
            && current.amount() + order.amount > high
            && emitter.certificates.len() + 1 < slots;

        if close_early {
            emitter.close(std::mem::replace(
                &mut current,
                CertificateBuilder::seeded(order),
            ));
        } else {
            current.push(order);
        }
    }
    emitter.close(current);

    emitter.certificates
}
