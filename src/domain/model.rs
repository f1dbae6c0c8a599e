use crate::utils::error::{PackerError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub type OrderId = u64;
pub type MerchantId = u32;
pub type CertificateId = u32;

/// A single merchant order. Amounts carry two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub amount: Decimal,
    pub merchant_id: MerchantId,
}

impl Order {
    pub fn new(id: OrderId, amount: Decimal, merchant_id: MerchantId) -> Self {
        Self {
            id,
            amount,
            merchant_id,
        }
    }
}

/// Per-certificate ceiling, already clamped to the absolute cap and guaranteed positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CapacityLimit(Decimal);

impl CapacityLimit {
    pub fn new(requested: Decimal, absolute_cap: Decimal) -> Result<Self> {
        for (field, value) in [("limit", requested), ("absolute_cap", absolute_cap)] {
            if value <= Decimal::ZERO {
                return Err(PackerError::InvalidConfigValueError {
                    field: field.to_string(),
                    value: value.to_string(),
                    reason: "Amount must be greater than zero".to_string(),
                });
            }
        }
        if requested > absolute_cap {
            tracing::debug!("Limit {} clamped to absolute cap {}", requested, absolute_cap);
        }
        Ok(Self(requested.min(absolute_cap)))
    }

    pub fn value(self) -> Decimal {
        self.0
    }
}

impl std::fmt::Display for CapacityLimit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

/// Which allocation phase emitted a certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificateKind {
    Main,
    Balancing,
}

/// A finalized group of orders. Only built through [`CertificateBuilder::finish`],
/// so `amount` always equals the sum of `orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Certificate {
    id: CertificateId,
    kind: CertificateKind,
    amount: Decimal,
    orders: Vec<Order>,
}

impl Certificate {
    pub fn id(&self) -> CertificateId {
        self.id
    }

    pub fn kind(&self) -> CertificateKind {
        self.kind
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Share of `limit` used by this certificate, in percent.
    pub fn fill_percentage(&self, limit: Decimal) -> Decimal {
        if limit.is_zero() {
            return Decimal::ZERO;
        }
        self.amount / limit * Decimal::ONE_HUNDRED
    }
}

/// Mutable accumulator used while a certificate is being filled.
#[derive(Debug, Clone, Default)]
pub struct CertificateBuilder {
    amount: Decimal,
    orders: Vec<Order>,
}

impl CertificateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(order: Order) -> Self {
        Self {
            amount: order.amount,
            orders: vec![order],
        }
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn fits(&self, order: &Order, limit: Decimal) -> bool {
        self.amount + order.amount <= limit
    }

    pub fn push(&mut self, order: Order) {
        self.amount += order.amount;
        self.orders.push(order);
    }

    pub fn finish(self, id: CertificateId, kind: CertificateKind) -> Certificate {
        Certificate {
            id,
            kind,
            amount: self.amount,
            orders: self.orders,
        }
    }
}
