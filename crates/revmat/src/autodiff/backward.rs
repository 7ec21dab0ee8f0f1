//! Backward pass execution for reverse-mode automatic differentiation.

use super::gradients::Gradients;
use super::tape::{Node, NodeId};
use super::var::Var;
use crate::error::MathError;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use tracing::debug;

/// Execute backward pass from a scalar result.
///
/// Seeds the adjoint of `output` with 1.0 and propagates it to every node
/// reachable from `output`. The tape itself is left untouched, so the pass
/// can be repeated.
///
/// # Errors
///
/// - `StaleVar` if `output` was released by a reset or rewind.
/// - `InvalidOperation` if `output` is a constant.
///
/// # Example
///
/// ```
/// use revmat::autodiff::{Tape, Var, backward};
///
/// let tape = Tape::new();
/// let x = Var::leaf(&tape, 3.0);
/// let y = &x * &x;
///
/// let grads = backward(&y).unwrap();
/// assert_eq!(grads.get(x.node_id().unwrap()), Some(6.0));
/// ```
pub fn backward(output: &Var) -> Result<Gradients, MathError> {
    let node = output.node().ok_or_else(|| {
        MathError::InvalidOperation("backward() called on a constant".to_string())
    })?;
    let tape = &node.tape;
    tape.ensure_live(node.id, node.stamp)?;

    let mut gradients = Gradients::new();
    gradients.accumulate(node.id, 1.0);

    let visited = tape.with_nodes(|nodes| -> Result<usize, MathError> {
        let order = topological_order(nodes, node.id)?;
        for &node_id in &order {
            let adjoint = match gradients.get(node_id) {
                Some(a) => a,
                None => continue,
            };
            if let Some(grad_fn) = nodes[node_id.index()].grad_fn() {
                for (input_id, contribution) in grad_fn.backward(adjoint) {
                    gradients.accumulate(input_id, contribution);
                }
            }
        }
        Ok(order.len())
    })?;

    debug!(
        output = node.id.index(),
        visited,
        adjoints = gradients.len(),
        "backward pass"
    );
    Ok(gradients)
}

/// Topological order of the nodes reachable from `start`.
///
/// Every node comes before the nodes it was computed from, which is the
/// order the backward pass needs.
fn topological_order(nodes: &[Node], start: NodeId) -> Result<Vec<NodeId>, MathError> {
    let mut graph: DiGraph<NodeId, ()> = DiGraph::new();
    let mut index_of: HashMap<NodeId, NodeIndex> = HashMap::new();
    let mut stack = vec![start];
    index_of.insert(start, graph.add_node(start));

    while let Some(node_id) = stack.pop() {
        let node = nodes.get(node_id.index()).ok_or(MathError::NotOnTape {
            node: node_id.index(),
        })?;
        let Some(grad_fn) = node.grad_fn() else {
            continue;
        };
        let from = index_of[&node_id];
        for input in grad_fn.inputs() {
            let to = match index_of.get(&input) {
                Some(&ix) => ix,
                None => {
                    let ix = graph.add_node(input);
                    index_of.insert(input, ix);
                    stack.push(input);
                    ix
                }
            };
            graph.update_edge(from, to, ());
        }
    }

    let sorted = toposort(&graph, None).map_err(|cycle| {
        MathError::InvalidOperation(format!(
            "computation graph has a cycle through node {}",
            graph[cycle.node_id()].index()
        ))
    })?;
    Ok(sorted.into_iter().map(|ix| graph[ix]).collect())
}
