//! revmat - squared distance with reverse-mode gradients.
//!
//! This crate provides differentiable vector operations on top of a small
//! tape-based reverse-mode AD engine.
//!
//! # Architecture
//!
//! ```text
//! operations (squared_distance, to_var, value_of)
//!     → generic over scalar::Operand (f64 | Var)
//!     → result type from scalar::Promote
//!
//! autodiff (Tape, Var, backward)
//!     → one node per differentiable operation
//!     → reverse pass in topological order
//! ```
//!
//! # Example
//!
//! ```
//! use revmat::autodiff::Tape;
//! use revmat::operations::{squared_distance, to_var};
//! use revmat::VectorD;
//!
//! let tape = Tape::new();
//! let a = to_var(&tape, &VectorD::from_vec(vec![-1.0, 0.0, 1.0]));
//! let b = to_var(&tape, &VectorD::from_vec(vec![1.0, 2.0, 3.0]));
//!
//! let d = squared_distance(&a, &b).unwrap();
//! assert_eq!(d.value(), 12.0);
//! assert_eq!(d.grad(a.as_slice()).unwrap(), vec![-4.0, -4.0, -4.0]);
//! assert_eq!(d.grad(b.as_slice()).unwrap(), vec![4.0, 4.0, 4.0]);
//! tape.check_on_tape(&d).unwrap();
//! ```

pub mod autodiff;
pub mod error;
pub mod operations;
mod random;
pub mod scalar;
pub mod vector;

pub use autodiff::{Tape, Var};
pub use error::MathError;
pub use operations::squared_distance;
pub use scalar::{Operand, Promote};
pub use vector::{Col, Orientation, Row, RowVectorD, RowVectorV, Vector, VectorD, VectorV};
