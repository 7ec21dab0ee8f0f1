//! Computation tape for reverse-mode automatic differentiation.

use super::var::Var;
use crate::error::MathError;
use smallvec::SmallVec;
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt::Debug;
use std::rc::Rc;
use tracing::{debug, trace};

/// Unique identifier for a node on a tape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Get the internal index.
    pub fn index(&self) -> usize {
        self.0
    }

    /// Create a NodeId for testing purposes.
    #[cfg(test)]
    pub(crate) fn new_for_test(index: usize) -> Self {
        Self(index)
    }
}

/// Backward function trait.
///
/// Given the adjoint of a node's output, returns the contribution to the
/// adjoint of each input. Every differentiable operation implements this.
pub trait GradFn: Debug {
    /// Compute VJP: given the output adjoint, return `(input, contribution)`
    /// pairs. An input may appear more than once.
    fn backward(&self, adjoint: f64) -> SmallVec<[(NodeId, f64); 4]>;

    /// Get input node IDs (for topological sort).
    fn inputs(&self) -> SmallVec<[NodeId; 4]>;
}

/// A node on the tape.
#[derive(Debug)]
pub struct Node {
    /// Never reused, so a released node cannot be confused with its successor.
    stamp: u64,
    /// Backward function (None for leaf nodes).
    grad_fn: Option<Box<dyn GradFn>>,
}

impl Node {
    /// Get backward function reference.
    pub fn grad_fn(&self) -> Option<&dyn GradFn> {
        self.grad_fn.as_deref()
    }

    /// Check if this node is a leaf.
    pub fn is_leaf(&self) -> bool {
        self.grad_fn.is_none()
    }
}

#[derive(Debug)]
struct TapeInner {
    nodes: Vec<Node>,
    next_stamp: u64,
}

/// Position on a tape, returned by [`Tape::mark`].
///
/// Holds the first stamp handed out after the mark, so it still separates
/// older and newer nodes across a [`Tape::reset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapeMark {
    stamp: u64,
}

/// Append-only record of differentiable operations.
///
/// A `Tape` is a cheap handle: clones share the same nodes. Nodes live until
/// [`Tape::reset`] or [`Tape::rewind`] releases them; dropping a [`Var`] does
/// not free anything. The tape is `!Send`, so each computation stays on the
/// thread that created it.
///
/// # Example
///
/// ```
/// use revmat::autodiff::{Tape, Var};
///
/// let tape = Tape::new();
/// let x = Var::leaf(&tape, 3.0);
/// let y = &x * &x;
/// assert_eq!(y.value(), 9.0);
/// assert_eq!(tape.len(), 2);
///
/// tape.reset();
/// assert!(tape.is_empty());
/// assert!(!y.is_live());
/// ```
#[derive(Clone)]
pub struct Tape {
    inner: Rc<RefCell<TapeInner>>,
}

impl Tape {
    /// Create a new empty tape.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a new empty tape with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Rc::new(RefCell::new(TapeInner {
                nodes: Vec::with_capacity(capacity),
                next_stamp: 0,
            })),
        }
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.inner.borrow().nodes.len()
    }

    /// Check if the tape holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().nodes.is_empty()
    }

    /// Check whether two handles refer to the same tape.
    pub fn ptr_eq(&self, other: &Tape) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Release every node. All variables on this tape become stale.
    pub fn reset(&self) {
        let mut inner = self.inner.borrow_mut();
        debug!(released = inner.nodes.len(), "tape reset");
        inner.nodes.clear();
    }

    /// Record the current position for a later [`Tape::rewind`].
    pub fn mark(&self) -> TapeMark {
        TapeMark {
            stamp: self.inner.borrow().next_stamp,
        }
    }

    /// Release every node created after `mark`.
    ///
    /// Nodes recorded before the mark stay live, unless a reset already
    /// released them.
    pub fn rewind(&self, mark: TapeMark) {
        let mut inner = self.inner.borrow_mut();
        let before = inner.nodes.len();
        // Stamps increase along the tape.
        let keep = inner.nodes.partition_point(|node| node.stamp < mark.stamp);
        inner.nodes.truncate(keep);
        debug!(
            released = before - inner.nodes.len(),
            live = inner.nodes.len(),
            "tape rewind"
        );
    }

    /// Check that `var` and every node reachable from it are allocated on
    /// this tape and still live.
    ///
    /// A constant reaches no nodes and always passes.
    ///
    /// # Errors
    ///
    /// - `NotOnTape` if `var` belongs to another tape, or a recorded input
    ///   does not precede its consumer on this tape.
    /// - `StaleVar` if `var` was released by a reset or rewind.
    ///
    /// # Example
    ///
    /// ```
    /// use revmat::autodiff::{Tape, Var};
    ///
    /// let tape = Tape::new();
    /// let other = Tape::new();
    /// let x = Var::leaf(&tape, 1.0);
    /// let y = &x + 2.0;
    ///
    /// assert!(tape.check_on_tape(&y).is_ok());
    /// assert!(other.check_on_tape(&y).is_err());
    /// ```
    pub fn check_on_tape(&self, var: &Var) -> Result<(), MathError> {
        let Some(start) = var.node() else {
            return Ok(());
        };
        if !self.ptr_eq(&start.tape) {
            return Err(MathError::NotOnTape {
                node: start.id.index(),
            });
        }
        self.ensure_live(start.id, start.stamp)?;

        let inner = self.inner.borrow();
        let mut visited = HashSet::new();
        let mut stack = vec![start.id];

        while let Some(node_id) = stack.pop() {
            if !visited.insert(node_id) {
                continue;
            }
            let node = inner
                .nodes
                .get(node_id.index())
                .ok_or(MathError::NotOnTape {
                    node: node_id.index(),
                })?;
            if let Some(grad_fn) = node.grad_fn() {
                for input in grad_fn.inputs() {
                    // Inputs are always recorded before the nodes that consume them.
                    if input >= node_id {
                        return Err(MathError::NotOnTape {
                            node: input.index(),
                        });
                    }
                    stack.push(input);
                }
            }
        }

        trace!(node = start.id.index(), checked = visited.len(), "arena check passed");
        Ok(())
    }

    pub(crate) fn push_leaf(&self) -> (NodeId, u64) {
        self.push(None)
    }

    pub(crate) fn push_node(&self, grad_fn: Box<dyn GradFn>) -> (NodeId, u64) {
        self.push(Some(grad_fn))
    }

    fn push(&self, grad_fn: Option<Box<dyn GradFn>>) -> (NodeId, u64) {
        let mut inner = self.inner.borrow_mut();
        let id = NodeId(inner.nodes.len());
        let stamp = inner.next_stamp;
        inner.next_stamp += 1;
        trace!(node = id.0, leaf = grad_fn.is_none(), "push node");
        inner.nodes.push(Node { stamp, grad_fn });
        (id, stamp)
    }

    /// Fails with `StaleVar` unless `id` still refers to the node stamped
    /// `stamp`.
    pub(crate) fn ensure_live(&self, id: NodeId, stamp: u64) -> Result<(), MathError> {
        match self.inner.borrow().nodes.get(id.index()) {
            Some(node) if node.stamp == stamp => Ok(()),
            _ => Err(MathError::StaleVar { node: id.index() }),
        }
    }

    /// Run `f` over the live nodes.
    pub(crate) fn with_nodes<R>(&self, f: impl FnOnce(&[Node]) -> R) -> R {
        f(&self.inner.borrow().nodes)
    }
}

impl Default for Tape {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Tape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Tape")
            .field("num_nodes", &inner.nodes.len())
            .field("next_stamp", &inner.next_stamp)
            .finish()
    }
}
