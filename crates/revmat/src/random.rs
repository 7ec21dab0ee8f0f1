//! Random vector construction.
//!
//! This module provides functions for creating vectors with random values.

use rand::Rng;
use rand::distr::StandardUniform;
use rand_distr::StandardNormal;

use crate::vector::{Orientation, Vector};

impl<O: Orientation> Vector<f64, O> {
    /// Create a vector with uniform random values in [0, 1).
    ///
    /// # Example
    ///
    /// ```
    /// use revmat::VectorD;
    ///
    /// let v = VectorD::random(4);
    /// assert_eq!(v.len(), 4);
    /// assert!(v.iter().all(|&x| (0.0..1.0).contains(&x)));
    /// ```
    pub fn random(len: usize) -> Self {
        Self::random_with_rng(len, &mut rand::rng())
    }

    /// Create a vector with uniform random values using a specific RNG.
    ///
    /// This is useful for reproducible results with a seeded RNG.
    ///
    /// # Example
    ///
    /// ```
    /// use revmat::RowVectorD;
    /// use rand::SeedableRng;
    /// use rand::rngs::StdRng;
    ///
    /// let mut rng = StdRng::seed_from_u64(42);
    /// let v1 = RowVectorD::random_with_rng(5, &mut rng);
    ///
    /// let mut rng = StdRng::seed_from_u64(42);
    /// let v2 = RowVectorD::random_with_rng(5, &mut rng);
    ///
    /// assert_eq!(v1, v2);
    /// ```
    pub fn random_with_rng<R: Rng>(len: usize, rng: &mut R) -> Self {
        Self::from_fn(len, |_| rng.sample(StandardUniform))
    }

    /// Create a vector with standard normal random values.
    pub fn randn(len: usize) -> Self {
        Self::randn_with_rng(len, &mut rand::rng())
    }

    /// Create a vector with standard normal random values using a specific RNG.
    pub fn randn_with_rng<R: Rng>(len: usize, rng: &mut R) -> Self {
        Self::from_fn(len, |_| rng.sample(StandardNormal))
    }
}
