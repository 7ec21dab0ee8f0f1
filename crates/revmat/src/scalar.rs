//! Scalar capability traits for plain and differentiable operands.
//!
//! Operations are written once, generic over [`Operand`]. The result type of
//! a binary operation follows [`Promote`]: any differentiable operand makes
//! the result differentiable.
//!
//! ```text
//! f64 × f64 → f64
//! f64 × Var → Var
//! Var × f64 → Var
//! Var × Var → Var
//! ```

use crate::autodiff::{PrecomputedGradients, Tape, Var};
use crate::error::MathError;
use std::fmt::Debug;

/// Element type accepted by differentiable operations.
pub trait Operand: Clone + Debug + 'static {
    /// Forward value.
    fn value(&self) -> f64;

    /// The tracked variable, if this operand is differentiable.
    fn as_var(&self) -> Option<&Var>;
}

impl Operand for f64 {
    fn value(&self) -> f64 {
        *self
    }

    fn as_var(&self) -> Option<&Var> {
        None
    }
}

impl Operand for Var {
    fn value(&self) -> f64 {
        Var::value(self)
    }

    fn as_var(&self) -> Option<&Var> {
        Some(self)
    }
}

/// Partial derivatives collected while an operation runs its forward pass.
///
/// The first recorded variable fixes the tape; later ones must be live on
/// the same tape. Nothing is written to the tape until the result is built,
/// so a failing operation leaves the tape unchanged.
#[derive(Debug, Default)]
pub struct Partials {
    tape: Option<Tape>,
    grad_fn: PrecomputedGradients,
}

impl Partials {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `d result / d var`. Constants are skipped.
    ///
    /// # Errors
    ///
    /// - `ForeignTape` if `var` is on a different tape than earlier operands.
    /// - `StaleVar` if `var` was released by a reset or rewind.
    pub fn record(&mut self, var: &Var, partial: f64) -> Result<(), MathError> {
        let (Some(id), Some(var_tape)) = (var.node_id(), var.tape()) else {
            return Ok(());
        };
        match &self.tape {
            Some(tape) => var.ensure_on(tape)?,
            None => {
                var.ensure_on(var_tape)?;
                self.tape = Some(var_tape.clone());
            }
        }
        self.grad_fn.push(id, partial);
        Ok(())
    }

    /// Whether any differentiable operand was recorded.
    pub fn is_tracked(&self) -> bool {
        self.tape.is_some()
    }

    /// Number of recorded partials.
    pub fn len(&self) -> usize {
        self.grad_fn.len()
    }

    /// Check if no partials were recorded.
    pub fn is_empty(&self) -> bool {
        self.grad_fn.is_empty()
    }
}

/// Result type that can be built from a value and its partials.
pub trait FromPartials: Operand + Sized {
    /// Build the result.
    ///
    /// A differentiable result pushes one node on the tape of its operands,
    /// or is a constant when no tracked operand was recorded.
    fn from_partials(value: f64, partials: Partials) -> Result<Self, MathError>;
}

impl FromPartials for f64 {
    fn from_partials(value: f64, partials: Partials) -> Result<Self, MathError> {
        debug_assert!(!partials.is_tracked(), "plain result with tracked operands");
        Ok(value)
    }
}

impl FromPartials for Var {
    fn from_partials(value: f64, partials: Partials) -> Result<Self, MathError> {
        let Partials { tape, grad_fn } = partials;
        Ok(match tape {
            Some(tape) => Var::from_grad_fn(&tape, value, Box::new(grad_fn)),
            None => Var::new(value),
        })
    }
}

/// Result type of a binary operation on `Self` and `Rhs`.
pub trait Promote<Rhs: Operand>: Operand {
    /// Plain only when both operands are plain.
    type Output: FromPartials;
}

impl Promote<f64> for f64 {
    type Output = f64;
}

impl Promote<Var> for f64 {
    type Output = Var;
}

impl Promote<f64> for Var {
    type Output = Var;
}

impl Promote<Var> for Var {
    type Output = Var;
}
