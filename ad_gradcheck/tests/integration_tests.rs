//! Integration tests for gradient checking.
//!
//! Closures with hand-derived gradients stand in for an autodiff engine. Each
//! scenario runs the public checks end to end on nested arguments.

use ad_gradcheck::prelude::*;
use approx::assert_abs_diff_eq;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

// ============================================================================
// Test Utilities
// ============================================================================

fn arr(data: Vec<f64>, dims: Vec<usize>) -> ArgTree {
    ArgTree::Array(Array::from_real(data, Shape::new(dims)).unwrap())
}

fn first_leaf(t: &ArgTree) -> f64 {
    t.leaves()[0].re()
}

/// f(args) = (x^2 for every leaf x), reduced by sum(real(sin(.))).
fn squares(args: &[ArgTree], _: &Kwargs) -> ArgTree {
    ArgTree::Tuple(
        args.iter()
            .map(|a| a.map_scalars(&mut |x| Scalar::new(x.dtype(), x.value() * x.value())))
            .collect(),
    )
}

/// d/dx sin(x^2) = 2x cos(x^2), leaf by leaf.
fn squares_grad(argnum: usize, args: &[ArgTree], _: &Kwargs) -> ArgTree {
    args[argnum].map_scalars(&mut |x| {
        let v = x.re();
        Scalar::new(x.dtype(), (2.0 * v * (v * v).cos()).into())
    })
}

fn nested_args() -> Vec<ArgTree> {
    vec![
        ArgTree::map([
            ("w", arr(vec![0.1, -0.4, 0.7, 1.2], vec![2, 2])),
            ("b", ArgTree::list(vec![ArgTree::real(0.3), ArgTree::real(-1.1)])),
        ]),
        ArgTree::tuple(vec![
            ArgTree::real(0.9),
            ArgTree::list(vec![arr(vec![0.5, 1.5, -0.2], vec![3])]),
        ]),
    ]
}

fn quiet() -> ProbeOptions {
    ProbeOptions::default().with_verbose(false)
}

// ============================================================================
// Test: Full Gradient Check
// ============================================================================

#[test]
fn test_product_of_two_scalars() {
    let f = |args: &[ArgTree], _: &Kwargs| {
        ArgTree::real(first_leaf(&args[0]) * first_leaf(&args[1]))
    };
    let grad = |argnum: usize, args: &[ArgTree], _: &Kwargs| args[1 - argnum].clone();

    check_grads(f, &grad, &[ArgTree::real(2.0), ArgTree::real(3.0)]).unwrap();

    // The numeric side on its own gives (3, 2)
    let numeric = ad_gradcheck::numeric_grad(f, &[ArgTree::real(2.0), ArgTree::real(3.0)], 1e-4);
    let expected = ArgTree::tuple(vec![ArgTree::real(3.0), ArgTree::real(2.0)]);
    check_equivalent(&numeric, &expected, &Tolerance::default()).unwrap();
}

#[test]
fn test_nested_arguments() {
    check_grads(squares, &squares_grad, &nested_args()).unwrap();
}

#[test]
fn test_wrong_element_is_located() {
    let wrong = |argnum: usize, args: &[ArgTree], kwargs: &Kwargs| {
        let g = squares_grad(argnum, args, kwargs);
        if argnum != 0 {
            return g;
        }
        let ArgTree::Map(entries) = &g else { unreachable!() };
        let w = entries["w"].as_array().unwrap();
        let bad = w.with_element(&[1, 0], Scalar::f64(w.get(&[1, 0]).unwrap().re() + 0.5));
        g.with_child(&PathSegment::Key("w".into()), ArgTree::Array(bad))
    };

    let err = check_grads(squares, &wrong, &nested_args()).unwrap_err();
    assert!(!err.is_structural());
    assert_eq!(err.path().unwrap().to_string(), "[0][\"w\"][1, 0]");
    assert!(err.to_string().starts_with("tolerance exceeded at [0][\"w\"][1, 0]: diffs are:"));
}

#[test]
fn test_gradient_with_wrong_shape_is_structural() {
    let grad = |_: usize, _: &[ArgTree], _: &Kwargs| arr(vec![0.0, 0.0, 0.0], vec![3]);
    let err = check_grads(squares, &grad, &[arr(vec![1.0, 2.0], vec![2])]).unwrap_err();
    assert!(matches!(err, GradCheckError::ShapeMismatch { .. }));
    assert!(err.is_structural());
}

#[test]
fn test_gradient_with_wrong_container_is_structural() {
    let args = [ArgTree::tuple(vec![ArgTree::real(1.0)])];
    let grad = |_: usize, _: &[ArgTree], _: &Kwargs| {
        ArgTree::list(vec![ArgTree::real(2.0 * 1.0f64.cos())])
    };
    let err = check_grads(squares, &grad, &args).unwrap_err();
    assert_eq!(
        err,
        GradCheckError::TypeMismatch {
            path: LeafPath::root().child(PathSegment::Index(0)),
            lhs: NodeKind::List,
            rhs: NodeKind::Tuple,
        }
    );
}

#[test]
fn test_no_arguments() {
    let err = check_grads(squares, &squares_grad, &[]).unwrap_err();
    assert_eq!(err, GradCheckError::NoArguments);
    assert_eq!(err.to_string(), "no arguments given");
}

#[test]
fn test_complex_scalar_argument() {
    // f(z) = Re(z^2); gradient 2z under the conjugate convention
    let f = |args: &[ArgTree], _: &Kwargs| {
        let z = args[0].leaves()[0].value();
        ArgTree::real((z * z).re)
    };
    let grad = |_: usize, args: &[ArgTree], _: &Kwargs| {
        ArgTree::Scalar(Scalar::from(args[0].leaves()[0].value() * 2.0))
    };

    check_grads(f, &grad, &[ArgTree::complex(1.0, 2.0)]).unwrap();

    // A real-valued answer for a complex argument is a kind error
    let real_grad = |_: usize, _: &[ArgTree], _: &Kwargs| ArgTree::real(2.0);
    let err = check_grads(f, &real_grad, &[ArgTree::complex(1.0, 2.0)]).unwrap_err();
    assert!(matches!(err, GradCheckError::TypeMismatch { .. }));
}

#[test]
fn test_complex_array_argument() {
    let z = Array::from_complex(
        vec![Complex64::new(1.0, -1.0), Complex64::new(0.5, 2.0)],
        Shape::new(vec![2]),
    )
    .unwrap();
    let f = |args: &[ArgTree], _: &Kwargs| {
        ArgTree::real(args[0].leaves().iter().map(|s| (s.value() * s.value()).re).sum())
    };
    let grad = |_: usize, args: &[ArgTree], _: &Kwargs| {
        let a = args[0].as_array().unwrap();
        ArgTree::Array(a.map(DType::C128, |s| s.value() * 2.0))
    };

    check_grads(f, &grad, &[ArgTree::Array(z)]).unwrap();
}

#[test]
fn test_config_loaded_from_json() {
    // 1% error in the gradient
    let rough = |argnum: usize, args: &[ArgTree], kwargs: &Kwargs| {
        squares_grad(argnum, args, kwargs)
            .map_scalars(&mut |g| Scalar::new(g.dtype(), g.value() * 1.01))
    };
    let args = [ArgTree::real(0.7)];
    assert!(check_grads(squares, &rough, &args).is_err());

    let config: GradCheckConfig =
        serde_json::from_str(r#"{"tolerance": {"rtol": 0.05, "atol": 0.0}}"#).unwrap();
    check_grads_with(squares, &rough, &args, &config).unwrap();
}

// ============================================================================
// Test: Directional Probe
// ============================================================================

fn sum_of_squares(args: &[ArgTree], _: &Kwargs) -> ArgTree {
    ArgTree::real(args[0].leaves().iter().map(|s| s.re() * s.re()).sum())
}

fn twice(_: usize, args: &[ArgTree], _: &Kwargs) -> ArgTree {
    args[0].map_scalars(&mut |s| Scalar::new(s.dtype(), s.value() * 2.0))
}

#[test]
fn test_probe_sum_of_squares_any_direction() {
    let x0 = arr(vec![1.0, 2.0, 3.0], vec![3]);
    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let report = quick_grad_check(
            sum_of_squares,
            &twice,
            &x0,
            &[],
            &Kwargs::new(),
            &quiet(),
            Some(&mut rng),
        )
        .unwrap();

        // analytic projection is 2 * <x0, d>
        let d: Vec<f64> = report.direction.leaves().iter().map(|s| s.re()).collect();
        let expected = 2.0 * (d[0] + 2.0 * d[1] + 3.0 * d[2]);
        assert_abs_diff_eq!(report.analytic.re(), expected, epsilon = 1e-12);
        assert_abs_diff_eq!(report.numeric.re(), expected, epsilon = 1e-6);
    }
}

#[test]
fn test_probe_is_reproducible_with_seed() {
    let x0 = nested_args().remove(0);
    let f = |args: &[ArgTree], kwargs: &Kwargs| squares(&args[..1], kwargs);
    let run = |seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        quick_grad_check(f, &squares_grad, &x0, &[], &Kwargs::new(), &quiet(), Some(&mut rng))
            .unwrap()
    };
    assert_eq!(run(5), run(5));
    assert_ne!(run(5).direction, run(6).direction);
}

#[test]
fn test_probe_with_extra_args_and_kwargs() {
    // f(x, a; scale) = scale * a * x^2
    let f = |args: &[ArgTree], kwargs: &Kwargs| {
        let scale = first_leaf(&kwargs["scale"]);
        let x = first_leaf(&args[0]);
        ArgTree::real(scale * first_leaf(&args[1]) * x * x)
    };
    let grad = |_: usize, args: &[ArgTree], kwargs: &Kwargs| {
        let scale = first_leaf(&kwargs["scale"]);
        ArgTree::real(2.0 * scale * first_leaf(&args[1]) * first_leaf(&args[0]))
    };
    let kwargs: Kwargs = [("scale".to_string(), ArgTree::real(0.5))].into_iter().collect();

    let report = quick_grad_check(
        f,
        &grad,
        &ArgTree::real(1.5),
        &[ArgTree::real(4.0)],
        &kwargs,
        &quiet(),
        None,
    )
    .unwrap();
    // single leaf: direction is +-1 and the projection is +-6
    assert_abs_diff_eq!(report.analytic.re().abs(), 6.0, epsilon = 1e-12);
}

#[test]
fn test_probe_complex_argument() {
    // f(z) = Re(z^2); moving along a real direction only sees Re(2z) = 2x
    let f = |args: &[ArgTree], _: &Kwargs| {
        let z = args[0].leaves()[0].value();
        ArgTree::real((z * z).re)
    };
    let grad = |_: usize, args: &[ArgTree], _: &Kwargs| {
        ArgTree::Scalar(Scalar::from(args[0].leaves()[0].value() * 2.0))
    };
    let mut rng = StdRng::seed_from_u64(1);
    let report = quick_grad_check(
        f,
        &grad,
        &ArgTree::complex(1.0, 2.0),
        &[],
        &Kwargs::new(),
        &quiet(),
        Some(&mut rng),
    )
    .unwrap();
    assert_abs_diff_eq!(report.numeric.re().abs(), 2.0, epsilon = 1e-6);
}

#[test]
fn test_probe_detects_wrong_gradient() {
    let thrice = |_: usize, args: &[ArgTree], _: &Kwargs| {
        ArgTree::real(3.0 * first_leaf(&args[0]))
    };
    let err = quick_grad_check(
        sum_of_squares,
        &thrice,
        &ArgTree::real(1.5),
        &[],
        &Kwargs::new(),
        &quiet(),
        None,
    )
    .unwrap_err();

    match err {
        GradCheckError::ToleranceExceeded { lhs, rhs, .. } => {
            // numeric on the left, analytic on the right
            assert_abs_diff_eq!(first_leaf(&lhs).abs(), 3.0, epsilon = 1e-6);
            assert_abs_diff_eq!(first_leaf(&rhs).abs(), 4.5, epsilon = 1e-12);
        }
        other => panic!("expected tolerance failure, got {}", other),
    }
}

#[test]
fn test_probe_rejects_misshapen_gradient() {
    let grad = |_: usize, _: &[ArgTree], _: &Kwargs| arr(vec![1.0, 1.0], vec![2]);
    let x0 = arr(vec![1.0, 2.0, 3.0], vec![3]);
    let err = quick_grad_check(sum_of_squares, &grad, &x0, &[], &Kwargs::new(), &quiet(), None)
        .unwrap_err();
    assert!(matches!(err, GradCheckError::ShapeMismatch { .. }));
}

#[test]
fn test_probe_empty_array_is_degenerate() {
    let x0 = arr(vec![], vec![0]);
    let err = quick_grad_check(sum_of_squares, &twice, &x0, &[], &Kwargs::new(), &quiet(), None)
        .unwrap_err();
    assert!(matches!(err, GradCheckError::DegenerateDirection { .. }));
}

// ============================================================================
// Property: Correct Gradients Always Pass
// ============================================================================

fn arb_real_tree() -> impl Strategy<Value = ArgTree> {
    let leaf = prop_oneof![
        3 => (-2.0f64..2.0).prop_map(ArgTree::real),
        1 => proptest::collection::vec(-2.0f64..2.0, 1..4).prop_map(|data| {
            let n = data.len();
            arr(data, vec![n])
        }),
    ];
    leaf.prop_recursive(2, 12, 3, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 1..3).prop_map(ArgTree::Tuple),
            proptest::collection::vec(inner.clone(), 1..3).prop_map(ArgTree::List),
            proptest::collection::btree_map("[xyz]", inner, 1..3).prop_map(ArgTree::Map),
        ]
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_correct_gradients_pass(args in proptest::collection::vec(arb_real_tree(), 1..3)) {
        prop_assert!(check_grads(squares, &squares_grad, &args).is_ok());
    }
}
