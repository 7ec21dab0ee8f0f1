//! Squared Euclidean distance.

use crate::error::MathError;
use crate::scalar::{FromPartials, Operand, Partials, Promote};
use crate::vector::{Orientation, Vector};
use tracing::trace;

/// Compute `Σ_i (a_i - b_i)^2`.
///
/// Operands may be plain (`f64`) or differentiable (`Var`) in any
/// combination, and either may be a column or a row; only the lengths must
/// agree. The result is a `Var` if either operand is differentiable, and a
/// single tape node then records `2 (a_i - b_i)` for each differentiable
/// `a_i` and `-2 (a_i - b_i)` for each differentiable `b_i`.
///
/// Terms are summed in index order. Empty operands give 0; when there is
/// no tracked element to record, a differentiable result is a constant and
/// nothing is pushed.
///
/// # Errors
///
/// - `SizeMismatch` if `a.len() != b.len()`.
/// - `ForeignTape` / `StaleVar` if the differentiable elements are not all
///   live on one tape.
///
/// The tape is unchanged when an error is returned.
///
/// # Example
///
/// ```
/// use revmat::autodiff::Tape;
/// use revmat::operations::{squared_distance, to_var};
/// use revmat::{RowVectorD, VectorD};
///
/// let a = VectorD::from_vec(vec![1.0, 3.0, -5.0]);
/// let b = RowVectorD::from_vec(vec![4.0, -2.0, -1.0]);
/// assert_eq!(squared_distance(&a, &b).unwrap(), 50.0);
///
/// let tape = Tape::new();
/// let av = to_var(&tape, &a);
/// let d = squared_distance(&av, &b).unwrap();
/// assert_eq!(d.value(), 50.0);
/// assert_eq!(d.grad(av.as_slice()).unwrap(), vec![-6.0, 10.0, -8.0]);
/// ```
pub fn squared_distance<A, B, OA, OB>(
    a: &Vector<A, OA>,
    b: &Vector<B, OB>,
) -> Result<<A as Promote<B>>::Output, MathError>
where
    A: Promote<B>,
    B: Operand,
    OA: Orientation,
    OB: Orientation,
{
    if a.len() != b.len() {
        return Err(MathError::SizeMismatch {
            function: "squared_distance",
            left: a.len(),
            right: b.len(),
        });
    }

    let mut sum = 0.0;
    let mut partials = Partials::new();
    for (a_i, b_i) in a.iter().zip(b.iter()) {
        let diff = a_i.value() - b_i.value();
        sum += diff * diff;
        if let Some(var) = a_i.as_var() {
            partials.record(var, 2.0 * diff)?;
        }
        if let Some(var) = b_i.as_var() {
            partials.record(var, -2.0 * diff)?;
        }
    }

    trace!(
        len = a.len(),
        left = OA::NAME,
        right = OB::NAME,
        tracked = partials.len(),
        "squared_distance"
    );
    FromPartials::from_partials(sum, partials)
}
