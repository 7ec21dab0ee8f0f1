//! Column and row vectors with the orientation as a type tag.
//!
//! ```text
//! Vector<T, O>
//! ├── VectorD    = Vector<f64, Col>
//! ├── VectorV    = Vector<Var, Col>
//! ├── RowVectorD = Vector<f64, Row>
//! └── RowVectorV = Vector<Var, Row>
//! ```
//!
//! The orientation never changes the math. It only records how a vector was
//! declared, so a column and a row of the same length are both valid
//! operands for element-wise operations.

use crate::autodiff::Var;
use crate::error::MathError;
use std::fmt::Debug;
use std::marker::PhantomData;
use std::ops::Index;

/// Orientation tag of a [`Vector`].
pub trait Orientation: Copy + Debug + Default + PartialEq + 'static {
    /// Orientation after [`Vector::transpose`].
    type Transposed: Orientation<Transposed = Self>;

    /// Human-readable name.
    const NAME: &'static str;
}

/// Column orientation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Col;

/// Row orientation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Row;

impl Orientation for Col {
    type Transposed = Row;
    const NAME: &'static str = "column";
}

impl Orientation for Row {
    type Transposed = Col;
    const NAME: &'static str = "row";
}

/// Fixed-length sequence of scalars.
#[derive(Debug, Clone, PartialEq)]
pub struct Vector<T, O: Orientation = Col> {
    data: Vec<T>,
    _orientation: PhantomData<O>,
}

/// Column vector of plain values.
pub type VectorD = Vector<f64, Col>;
/// Column vector of differentiable values.
pub type VectorV = Vector<Var, Col>;
/// Row vector of plain values.
pub type RowVectorD = Vector<f64, Row>;
/// Row vector of differentiable values.
pub type RowVectorV = Vector<Var, Row>;

impl<T, O: Orientation> Vector<T, O> {
    /// Create a vector that takes ownership of `data`.
    ///
    /// # Examples
    ///
    /// ```
    /// use revmat::{RowVectorD, VectorD};
    ///
    /// let v = VectorD::from_vec(vec![1.0, 3.0, -5.0]);
    /// assert_eq!(v.len(), 3);
    ///
    /// let r = RowVectorD::from_vec(vec![4.0, -2.0]);
    /// assert_eq!(r[1], -2.0);
    /// ```
    pub fn from_vec(data: Vec<T>) -> Self {
        Self {
            data,
            _orientation: PhantomData,
        }
    }

    /// Create a vector of length `len` with element `i` set to `f(i)`.
    pub fn from_fn(len: usize, f: impl FnMut(usize) -> T) -> Self {
        Self::from_vec((0..len).map(f).collect())
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the vector has no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Orientation name (`"column"` or `"row"`).
    pub fn orientation(&self) -> &'static str {
        O::NAME
    }

    /// Get element at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.data.get(index)
    }

    /// Set element at `index`.
    ///
    /// # Errors
    ///
    /// Returns `MathError::IndexOutOfBounds` if `index >= len()`.
    pub fn set(&mut self, index: usize, value: T) -> Result<(), MathError> {
        let len = self.data.len();
        let slot = self
            .data
            .get_mut(index)
            .ok_or(MathError::IndexOutOfBounds { index, len })?;
        *slot = value;
        Ok(())
    }

    /// Iterate over elements in index order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Consume and return the elements.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Same elements with the other orientation.
    pub fn transpose(self) -> Vector<T, O::Transposed> {
        Vector::from_vec(self.data)
    }

    /// Apply `f` to every element, keeping the orientation.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Vector<U, O> {
        Vector::from_vec(self.data.iter().map(f).collect())
    }
}

impl<O: Orientation> Vector<f64, O> {
    /// Create a zero-initialized vector.
    pub fn zeros(len: usize) -> Self {
        Self::from_vec(vec![0.0; len])
    }
}

impl<T, O: Orientation> Index<usize> for Vector<T, O> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.data[index]
    }
}

impl<T, O: Orientation> FromIterator<T> for Vector<T, O> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<'a, T, O: Orientation> IntoIterator for &'a Vector<T, O> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}
