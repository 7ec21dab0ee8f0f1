//! Gradient storage container.

use super::tape::NodeId;
use std::collections::HashMap;

/// Container for accumulated adjoints.
///
/// Stores adjoints keyed by NodeId, with in-place accumulation
/// for nodes with multiple downstream paths.
#[derive(Debug, Clone, Default)]
pub struct Gradients {
    grads: HashMap<NodeId, f64>,
}

impl Gradients {
    /// Create empty gradient container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate adjoint for a node.
    ///
    /// If an adjoint already exists, adds to it (for multiple paths).
    pub fn accumulate(&mut self, id: NodeId, grad: f64) {
        *self.grads.entry(id).or_insert(0.0) += grad;
    }

    /// Get adjoint for a node.
    pub fn get(&self, id: NodeId) -> Option<f64> {
        self.grads.get(&id).copied()
    }

    /// Check if an adjoint exists for node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.grads.contains_key(&id)
    }

    /// Number of stored adjoints.
    pub fn len(&self) -> usize {
        self.grads.len()
    }

    /// Check if no adjoints stored.
    pub fn is_empty(&self) -> bool {
        self.grads.is_empty()
    }

    /// Iterate over all adjoints.
    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &f64)> {
        self.grads.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradients_new() {
        let grads = Gradients::new();
        assert!(grads.is_empty());
        assert_eq!(grads.len(), 0);
    }

    #[test]
    fn test_gradients_accumulate_single() {
        let mut grads = Gradients::new();
        let id = NodeId::new_for_test(0);

        grads.accumulate(id, 1.5);

        assert!(grads.contains(id));
        assert_eq!(grads.get(id), Some(1.5));
    }

    #[test]
    fn test_gradients_accumulate_multiple() {
        let mut grads = Gradients::new();
        let id = NodeId::new_for_test(0);

        grads.accumulate(id, 1.0);
        grads.accumulate(id, 4.0);

        assert_eq!(grads.get(id), Some(5.0));
    }

    #[test]
    fn test_gradients_multiple_nodes() {
        let mut grads = Gradients::new();
        let id1 = NodeId::new_for_test(0);
        let id2 = NodeId::new_for_test(1);

        grads.accumulate(id1, 2.0);
        grads.accumulate(id2, -3.0);

        assert_eq!(grads.len(), 2);
        assert_eq!(grads.get(id1), Some(2.0));
        assert_eq!(grads.get(id2), Some(-3.0));
        assert_eq!(grads.get(NodeId::new_for_test(7)), None);
    }

    #[test]
    fn test_gradients_iter() {
        let mut grads = Gradients::new();
        grads.accumulate(NodeId::new_for_test(2), 1.0);
        grads.accumulate(NodeId::new_for_test(0), 0.5);
        grads.accumulate(NodeId::new_for_test(2), 2.0);

        let mut entries: Vec<(usize, f64)> =
            grads.iter().map(|(id, &g)| (id.index(), g)).collect();
        entries.sort_by_key(|&(index, _)| index);
        assert_eq!(entries, vec![(0, 0.5), (2, 3.0)]);
    }
}
