use rust_decimal::Decimal;

/// Max-tree over the residual capacity of open builders.
///
/// Answers "which is the lowest-numbered builder that still has room for `amount`"
/// in O(log n), giving exactly the same answer as scanning builders in creation order.
/// Slots that have not been opened yet hold `None` and never match.
#[derive(Debug, Clone)]
pub struct ResidualIndex {
    leaves: usize,
    len: usize,
    tree: Vec<Option<Decimal>>,
}

impl ResidualIndex {
    pub fn with_capacity(slots: usize) -> Self {
        let leaves = slots.max(1).next_power_of_two();
        Self {
            leaves,
            len: 0,
            tree: vec![None; 2 * leaves],
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.leaves
    }

    /// Open the next slot with the given residual and return its position.
    pub fn push(&mut self, residual: Decimal) -> usize {
        debug_assert!(self.len < self.leaves, "residual index is full");
        let slot = self.len;
        self.len += 1;
        self.set(slot, residual);
        slot
    }

    pub fn set(&mut self, slot: usize, residual: Decimal) {
        let mut node = slot + self.leaves;
        self.tree[node] = Some(residual);
        while node > 1 {
            node /= 2;
            self.tree[node] = self.tree[2 * node].max(self.tree[2 * node + 1]);
        }
    }

    /// Leftmost open slot whose residual is at least `amount`.
    pub fn first_fit(&self, amount: Decimal) -> Option<usize> {
        let room = |node: usize| self.tree[node].is_some_and(|residual| residual >= amount);

        if !room(1) {
            return None;
        }

        let mut node = 1;
        while node < self.leaves {
            node = if room(2 * node) { 2 * node } else { 2 * node + 1 };
        }
        Some(node - self.leaves)
    }
}
