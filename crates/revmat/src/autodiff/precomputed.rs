//! Backward function with partials computed during the forward pass.

use super::tape::{GradFn, NodeId};
use smallvec::SmallVec;

/// Stores `d output / d input` for each operand at construction time.
///
/// The backward pass only scales the stored partials by the output adjoint,
/// so the forward values never need to be kept around.
#[derive(Debug, Clone, Default)]
pub struct PrecomputedGradients {
    operands: SmallVec<[NodeId; 4]>,
    partials: SmallVec<[f64; 4]>,
}

impl PrecomputedGradients {
    /// Create an empty set of partials.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with room for `capacity` operands.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            operands: SmallVec::with_capacity(capacity),
            partials: SmallVec::with_capacity(capacity),
        }
    }

    /// Record the partial derivative with respect to `operand`.
    pub fn push(&mut self, operand: NodeId, partial: f64) {
        self.operands.push(operand);
        self.partials.push(partial);
    }

    /// Number of recorded operands.
    pub fn len(&self) -> usize {
        self.operands.len()
    }

    /// Check if no operands are recorded.
    pub fn is_empty(&self) -> bool {
        self.operands.is_empty()
    }

    /// Iterate over `(operand, partial)` pairs in recording order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, f64)> + '_ {
        self.operands.iter().copied().zip(self.partials.iter().copied())
    }
}

impl FromIterator<(NodeId, f64)> for PrecomputedGradients {
    fn from_iter<I: IntoIterator<Item = (NodeId, f64)>>(iter: I) -> Self {
        let mut grads = Self::new();
        for (operand, partial) in iter {
            grads.push(operand, partial);
        }
        grads
    }
}

impl GradFn for PrecomputedGradients {
    fn backward(&self, adjoint: f64) -> SmallVec<[(NodeId, f64); 4]> {
        self.iter()
            .map(|(operand, partial)| (operand, adjoint * partial))
            .collect()
    }

    fn inputs(&self) -> SmallVec<[NodeId; 4]> {
        self.operands.clone()
    }
}
