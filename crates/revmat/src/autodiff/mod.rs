//! Reverse-mode automatic differentiation on an explicit tape.
//!
//! # Architecture
//!
//! ```text
//! Var  ──records on──►  Tape (Rc<RefCell<..>>, explicit context)
//!  │                       │
//!  ▼                       ▼
//! value, Option<NodeId> Vec<Node>
//!                          │
//!                          ▼
//!              PrecomputedGradients (GradFn trait)
//! ```
//!
//! # Example
//!
//! ```
//! use revmat::autodiff::{Tape, Var, backward};
//!
//! let tape = Tape::new();
//! let x = Var::leaf(&tape, 2.0);
//! let y = Var::leaf(&tape, 3.0);
//! let z = &x * &y + 1.0;
//!
//! let grads = backward(&z).unwrap();
//! assert_eq!(grads.get(x.node_id().unwrap()), Some(3.0));
//! assert_eq!(grads.get(y.node_id().unwrap()), Some(2.0));
//!
//! // Release everything recorded for this computation.
//! tape.reset();
//! ```
//!
//! # Design Notes
//!
//! - The tape is passed explicitly; there is no global state.
//! - Local partials are computed in the forward pass and scaled by the
//!   output adjoint in the backward pass.
//! - Node stamps are never reused, so released variables are always detected.

mod backward;
mod gradients;
mod precomputed;
mod tape;
mod var;

pub use backward::backward;
pub use gradients::Gradients;
pub use precomputed::PrecomputedGradients;
pub use tape::{GradFn, Node, NodeId, Tape, TapeMark};
pub use var::Var;
