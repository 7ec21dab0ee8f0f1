//! Integration tests for the autodiff engine.
//!
//! Tests backward-mode automatic differentiation with numerical gradient checks.

use approx::assert_relative_eq;
use rand::SeedableRng;
use rand::rngs::StdRng;
use revmat::autodiff::{Tape, Var, backward};
use revmat::operations::{squared_distance, to_var, value_of};
use revmat::{RowVectorD, VectorD};

/// Compute numerical gradient using central difference.
///
/// grad_i ≈ (f(x + eps*e_i) - f(x - eps*e_i)) / (2*eps)
fn numerical_gradient<F>(f: F, x: &[f64], eps: f64) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    let mut grad = vec![0.0; x.len()];
    let mut x_plus = x.to_vec();
    let mut x_minus = x.to_vec();

    for i in 0..x.len() {
        x_plus[i] = x[i] + eps;
        x_minus[i] = x[i] - eps;

        let f_plus = f(&x_plus);
        let f_minus = f(&x_minus);
        grad[i] = (f_plus - f_minus) / (2.0 * eps);

        x_plus[i] = x[i];
        x_minus[i] = x[i];
    }
    grad
}

#[test]
fn test_numerical_gradient_squared_distance() {
    let eps = 1e-5;
    let mut rng = StdRng::seed_from_u64(7);

    for len in [1, 3, 8, 17] {
        let a_data = VectorD::randn_with_rng(len, &mut rng);
        let b_data = RowVectorD::randn_with_rng(len, &mut rng);

        let loss_a = |a: &[f64]| -> f64 {
            squared_distance(&VectorD::from_vec(a.to_vec()), &b_data).unwrap()
        };
        let loss_b = |b: &[f64]| -> f64 {
            squared_distance(&a_data, &RowVectorD::from_vec(b.to_vec())).unwrap()
        };

        let numerical_grad_a = numerical_gradient(loss_a, a_data.as_slice(), eps);
        let numerical_grad_b = numerical_gradient(loss_b, b_data.as_slice(), eps);

        let tape = Tape::new();
        let a = to_var(&tape, &a_data);
        let b = to_var(&tape, &b_data);
        let d = squared_distance(&a, &b).unwrap();

        let analytical_grad_a = d.grad(a.as_slice()).unwrap();
        let analytical_grad_b = d.grad(b.as_slice()).unwrap();

        for (analytical, numerical) in analytical_grad_a.iter().zip(&numerical_grad_a) {
            assert_relative_eq!(analytical, numerical, epsilon = 1e-6);
        }
        for (analytical, numerical) in analytical_grad_b.iter().zip(&numerical_grad_b) {
            assert_relative_eq!(analytical, numerical, epsilon = 1e-6);
        }
    }
}

#[test]
fn test_value_matches_plain_formula() {
    let mut rng = StdRng::seed_from_u64(2024);
    let a_data = VectorD::random_with_rng(10, &mut rng);
    let b_data = VectorD::random_with_rng(10, &mut rng);

    let expected: f64 = a_data
        .iter()
        .zip(b_data.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum();

    let tape = Tape::new();
    let a = to_var(&tape, &a_data);
    let b = to_var(&tape, &b_data);

    assert_eq!(squared_distance(&a_data, &b_data).unwrap(), expected);
    assert_eq!(squared_distance(&a, &b_data).unwrap().value(), expected);
    assert_eq!(squared_distance(&a_data, &b).unwrap().value(), expected);
    assert_eq!(squared_distance(&a, &b).unwrap().value(), expected);
    assert_eq!(value_of(&a), a_data);
}

#[test]
fn test_chain_rule_through_squared_distance() {
    let tape = Tape::new();
    let a = to_var(&tape, &VectorD::from_vec(vec![-1.0, 0.0, 1.0]));
    let b = VectorD::from_vec(vec![1.0, 2.0, 3.0]);

    // f = 3 * d + 1
    let d = squared_distance(&a, &b).unwrap();
    let f = 3.0 * &d + 1.0;
    assert_relative_eq!(f.value(), 37.0);
    assert_eq!(f.grad(a.as_slice()).unwrap(), vec![-12.0, -12.0, -12.0]);
}

#[test]
fn test_composed_distances() {
    let eps = 1e-5;
    let x_data = vec![0.5, -1.5, 2.0];
    let p = VectorD::from_vec(vec![1.0, 1.0, 1.0]);
    let q = VectorD::from_vec(vec![-2.0, 0.0, 4.0]);

    // f(x) = |x - p|^2 * |x - q|^2
    let loss = |x: &[f64]| -> f64 {
        let x = VectorD::from_vec(x.to_vec());
        squared_distance(&x, &p).unwrap() * squared_distance(&x, &q).unwrap()
    };
    let numerical = numerical_gradient(loss, &x_data, eps);

    let tape = Tape::new();
    let x = to_var(&tape, &VectorD::from_vec(x_data));
    let f = &squared_distance(&x, &p).unwrap() * &squared_distance(&x, &q).unwrap();
    tape.check_on_tape(&f).unwrap();

    let analytical = f.grad(x.as_slice()).unwrap();
    for (a, n) in analytical.iter().zip(&numerical) {
        assert_relative_eq!(a, n, epsilon = 1e-4);
    }
}

#[test]
fn test_backward_is_repeatable() {
    let tape = Tape::new();
    let a = to_var(&tape, &VectorD::from_vec(vec![2.0, -1.0]));
    let b = to_var(&tape, &VectorD::from_vec(vec![0.0, 1.0]));
    let d = squared_distance(&a, &b).unwrap();
    let len = tape.len();

    let first = backward(&d).unwrap();
    let second = backward(&d).unwrap();

    for var in a.iter().chain(b.iter()) {
        let id = var.node_id().unwrap();
        assert_eq!(first.get(id), second.get(id));
    }
    assert_eq!(first.get(a[0].node_id().unwrap()), Some(4.0));
    assert_eq!(first.get(b[1].node_id().unwrap()), Some(4.0));
    assert_eq!(tape.len(), len);
}

#[test]
fn test_independent_tapes() {
    let tape1 = Tape::new();
    let tape2 = Tape::new();
    let x = Var::leaf(&tape1, 1.0);
    let y = Var::leaf(&tape2, 1.0);

    let fx = &x * 2.0;
    tape2.reset();

    assert!(!y.is_live());
    assert!(fx.is_live());
    assert_eq!(fx.grad(&[x]).unwrap(), vec![2.0]);
    assert_eq!(tape1.len(), 2);
}
