//! Conversions between plain and differentiable vectors.

use crate::autodiff::{Tape, Var};
use crate::vector::{Orientation, Vector};

/// Lift a plain vector onto `tape`.
///
/// Every element becomes an independent leaf, in index order.
///
/// # Example
///
/// ```
/// use revmat::VectorD;
/// use revmat::autodiff::Tape;
/// use revmat::operations::to_var;
///
/// let tape = Tape::new();
/// let v = to_var(&tape, &VectorD::from_vec(vec![1.0, 2.0]));
/// assert_eq!(v[1].value(), 2.0);
/// assert_eq!(tape.len(), 2);
/// ```
pub fn to_var<O: Orientation>(tape: &Tape, values: &Vector<f64, O>) -> Vector<Var, O> {
    values.map(|&x| Var::leaf(tape, x))
}

/// Forward values of a differentiable vector.
pub fn value_of<O: Orientation>(vars: &Vector<Var, O>) -> Vector<f64, O> {
    vars.map(Var::value)
}
