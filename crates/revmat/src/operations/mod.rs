//! Differentiable vector operations.
//!
//! Every operation is generic over [`Operand`](crate::scalar::Operand) and
//! works on plain and differentiable vectors alike:
//!
//! ```text
//! squared_distance(Vector<A, OA>, Vector<B, OB>)
//!     → validate lengths
//!     → forward value + local partials
//!     → <A as Promote<B>>::Output (one tape node if differentiable)
//! ```

mod convert;
mod squared_distance;

pub use convert::{to_var, value_of};
pub use squared_distance::squared_distance;
