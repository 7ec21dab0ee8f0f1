//! Var - differentiable scalar recorded on a tape.

use super::backward::backward;
use super::precomputed::PrecomputedGradients;
use super::tape::{GradFn, NodeId, Tape};
use crate::error::MathError;
use std::fmt::Debug;
use std::ops::{Add, Mul, Neg, Sub};

/// A scalar that tracks gradients for reverse-mode differentiation.
///
/// Holds its forward value and a reference to the node that produced it.
/// Cloning a `Var` is cheap and refers to the same node. A `Var` built with
/// [`Var::new`] is a constant: it has no node and every gradient through it
/// is zero.
///
/// # Example
///
/// ```
/// use revmat::autodiff::{Tape, Var};
///
/// let tape = Tape::new();
/// let x = Var::leaf(&tape, 2.0);
/// let y = Var::leaf(&tape, 5.0);
/// let z = &x * &y - 1.0;
///
/// assert_eq!(z.value(), 9.0);
/// assert_eq!(z.grad(&[x, y]).unwrap(), vec![5.0, 2.0]);
/// ```
#[derive(Clone)]
pub struct Var {
    value: f64,
    /// Node on a tape (None for constants).
    node: Option<TapeNode>,
}

/// Location of a tracked variable.
#[derive(Clone)]
pub(crate) struct TapeNode {
    pub(crate) id: NodeId,
    pub(crate) stamp: u64,
    pub(crate) tape: Tape,
}

impl TapeNode {
    fn ensure_live(&self) -> Result<(), MathError> {
        self.tape.ensure_live(self.id, self.stamp)
    }
}

impl Var {
    /// Create a constant that is not recorded on any tape.
    pub fn new(value: f64) -> Self {
        Self { value, node: None }
    }

    /// Create an independent leaf on `tape`.
    pub fn leaf(tape: &Tape, value: f64) -> Self {
        let (id, stamp) = tape.push_leaf();
        Self {
            value,
            node: Some(TapeNode {
                id,
                stamp,
                tape: tape.clone(),
            }),
        }
    }

    /// Record a computed node on `tape` (used by operations).
    pub(crate) fn from_grad_fn(tape: &Tape, value: f64, grad_fn: Box<dyn GradFn>) -> Self {
        let (id, stamp) = tape.push_node(grad_fn);
        Self {
            value,
            node: Some(TapeNode {
                id,
                stamp,
                tape: tape.clone(),
            }),
        }
    }

    /// Forward value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Node on the tape, if tracked.
    pub fn node_id(&self) -> Option<NodeId> {
        self.node.as_ref().map(|n| n.id)
    }

    /// Tape this variable is recorded on, if tracked.
    pub fn tape(&self) -> Option<&Tape> {
        self.node.as_ref().map(|n| &n.tape)
    }

    /// Check if this variable is recorded on a tape.
    pub fn requires_grad(&self) -> bool {
        self.node.is_some()
    }

    /// Whether the node is still live (not released by a reset or rewind).
    ///
    /// Constants are always live.
    pub fn is_live(&self) -> bool {
        self.node.as_ref().is_none_or(|n| n.ensure_live().is_ok())
    }

    pub(crate) fn node(&self) -> Option<&TapeNode> {
        self.node.as_ref()
    }

    /// Fails unless this variable is live on `tape`. Constants always pass.
    pub(crate) fn ensure_on(&self, tape: &Tape) -> Result<(), MathError> {
        let Some(node) = &self.node else {
            return Ok(());
        };
        if !node.tape.ptr_eq(tape) {
            return Err(MathError::ForeignTape);
        }
        node.ensure_live()
    }

    /// Partial derivatives of `self` with respect to each of `wrt`.
    ///
    /// Runs a backward pass from `self`. Inputs that `self` does not depend
    /// on get 0.0, and so does every input when `self` is a constant.
    ///
    /// # Errors
    ///
    /// - `StaleVar` if `self` or an element of `wrt` was released.
    /// - `ForeignTape` if an element of `wrt` is on another tape.
    pub fn grad(&self, wrt: &[Var]) -> Result<Vec<f64>, MathError> {
        let Some(node) = &self.node else {
            for var in wrt {
                if let Some(n) = &var.node {
                    n.ensure_live()?;
                }
            }
            return Ok(vec![0.0; wrt.len()]);
        };
        for var in wrt {
            var.ensure_on(&node.tape)?;
        }
        let grads = backward(self)?;
        Ok(wrt
            .iter()
            .map(|var| {
                var.node_id()
                    .and_then(|id| grads.get(id))
                    .unwrap_or(0.0)
            })
            .collect())
    }
}

impl Debug for Var {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Var")
            .field("value", &self.value)
            .field("node", &self.node_id().map(|id| id.index()))
            .finish()
    }
}

/// Record `value` as a function of `operands` with the given partials.
///
/// Constant operands contribute nothing; if every operand is constant the
/// result is a constant too.
///
/// # Panics
///
/// Panics if the tracked operands are not live on the same tape.
fn record(value: f64, operands: &[(&Var, f64)]) -> Var {
    let Some(tape) = operands.iter().find_map(|(var, _)| var.tape()) else {
        return Var::new(value);
    };
    for (var, _) in operands {
        if let Err(err) = var.ensure_on(tape) {
            panic!("invalid operand in Var arithmetic: {err}");
        }
    }
    let grad_fn: PrecomputedGradients = operands
        .iter()
        .filter_map(|(var, partial)| var.node_id().map(|id| (id, *partial)))
        .collect();
    Var::from_grad_fn(tape, value, Box::new(grad_fn))
}

impl Add<&Var> for &Var {
    type Output = Var;

    fn add(self, rhs: &Var) -> Var {
        record(self.value + rhs.value, &[(self, 1.0), (rhs, 1.0)])
    }
}

impl Sub<&Var> for &Var {
    type Output = Var;

    fn sub(self, rhs: &Var) -> Var {
        record(self.value - rhs.value, &[(self, 1.0), (rhs, -1.0)])
    }
}

impl Mul<&Var> for &Var {
    type Output = Var;

    fn mul(self, rhs: &Var) -> Var {
        record(self.value * rhs.value, &[(self, rhs.value), (rhs, self.value)])
    }
}

impl Add<f64> for &Var {
    type Output = Var;

    fn add(self, rhs: f64) -> Var {
        record(self.value + rhs, &[(self, 1.0)])
    }
}

impl Sub<f64> for &Var {
    type Output = Var;

    fn sub(self, rhs: f64) -> Var {
        record(self.value - rhs, &[(self, 1.0)])
    }
}

impl Mul<f64> for &Var {
    type Output = Var;

    fn mul(self, rhs: f64) -> Var {
        record(self.value * rhs, &[(self, rhs)])
    }
}

impl Add<&Var> for f64 {
    type Output = Var;

    fn add(self, rhs: &Var) -> Var {
        rhs + self
    }
}

impl Sub<&Var> for f64 {
    type Output = Var;

    fn sub(self, rhs: &Var) -> Var {
        record(self - rhs.value, &[(rhs, -1.0)])
    }
}

impl Mul<&Var> for f64 {
    type Output = Var;

    fn mul(self, rhs: &Var) -> Var {
        rhs * self
    }
}

impl Neg for &Var {
    type Output = Var;

    fn neg(self) -> Var {
        record(-self.value, &[(self, -1.0)])
    }
}

impl Neg for Var {
    type Output = Var;

    fn neg(self) -> Var {
        -&self
    }
}

// Owned operands forward to the reference impls.
macro_rules! forward_owned_binop {
    ($imp:ident, $method:ident) => {
        impl $imp<Var> for Var {
            type Output = Var;

            fn $method(self, rhs: Var) -> Var {
                $imp::$method(&self, &rhs)
            }
        }

        impl $imp<&Var> for Var {
            type Output = Var;

            fn $method(self, rhs: &Var) -> Var {
                $imp::$method(&self, rhs)
            }
        }

        impl $imp<Var> for &Var {
            type Output = Var;

            fn $method(self, rhs: Var) -> Var {
                $imp::$method(self, &rhs)
            }
        }

        impl $imp<f64> for Var {
            type Output = Var;

            fn $method(self, rhs: f64) -> Var {
                $imp::$method(&self, rhs)
            }
        }

        impl $imp<Var> for f64 {
            type Output = Var;

            fn $method(self, rhs: Var) -> Var {
                $imp::$method(self, &rhs)
            }
        }
    };
}

forward_owned_binop!(Add, add);
forward_owned_binop!(Sub, sub);
forward_owned_binop!(Mul, mul);
