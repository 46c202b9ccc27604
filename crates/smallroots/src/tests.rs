//! End-to-end scenarios through the public entry point.

use std::collections::BTreeMap;

use smallroots_solve::GroebnerSolver;

use crate::prelude::*;

fn int(n: i64) -> Integer {
    Integer::new(n)
}

fn config() -> SolverConfig {
    SolverConfig {
        reducer: ReducerKind::InProcess,
        ..SolverConfig::default()
    }
}

fn options(modulus: ModulusOptions) -> FindOptions {
    FindOptions {
        modulus,
        solver: config(),
        ..FindOptions::default()
    }
}

fn expressions(texts: &[&str]) -> Vec<RelationInput> {
    texts
        .iter()
        .map(|t| RelationInput::Expression((*t).to_string()))
        .collect()
}

fn interval(v: &str, lower: i64, upper: i64) -> (Variable, BoundSpec) {
    (Variable::new(v), BoundSpec::Interval(int(lower), int(upper)))
}

fn value(s: &Solution, v: &str) -> Option<i64> {
    s.get(&Variable::new(v)).and_then(Integer::to_i64)
}

fn init_logging() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[test]
fn test_exact_univariate_relation() {
    let (_, polys) = parse_polynomials(&["x - 5"]).unwrap();
    let relations = RelationSet::new(vec![Relation::integer(polys[0].clone())]).unwrap();
    let bounds: BoundSet = [(Variable::new("x"), Bound::new(int(0), int(100)))]
        .into_iter()
        .collect();
    let roots = GroebnerSolver::new(Problem::new(relations, bounds)).solve().unwrap();
    assert_eq!(roots.len(), 1);
    assert_eq!(value(&roots[0], "x"), Some(5));

    let roots = find_small_roots(
        expressions(&["x - 5"]),
        BoundsInput::Map(vec![interval("x", 0, 100)]),
        &options(ModulusOptions::default()),
    )
    .unwrap();
    assert_eq!(roots.len(), 1);
    assert_eq!(value(&roots[0], "x"), Some(5));
}

#[test]
fn test_linear_modular_system() {
    init_logging();
    let roots = find_small_roots(
        expressions(&["x + y == 10", "x - y == 2"]),
        BoundsInput::Map(vec![interval("x", -50, 50), interval("y", -50, 50)]),
        &options(ModulusOptions::known(int(97))),
    )
    .unwrap();
    assert_eq!(roots.len(), 1);
    assert_eq!((value(&roots[0], "x"), value(&roots[0], "y")), (Some(6), Some(4)));
}

#[test]
fn test_stereotyped_message() {
    init_logging();
    // N = 1000003 * 1000033 and c = (100*256 + 9)^3 mod N
    let modulus: Integer = "1000036000099".parse().unwrap();
    let roots = find_small_roots(
        expressions(&["(x*256 + 9)^3 == 794340939945"]),
        BoundsInput::Map(vec![interval("x", 0, 256)]),
        &options(ModulusOptions::known(modulus)),
    )
    .unwrap();
    assert!(roots.iter().any(|r| value(r, "x") == Some(100)));
}

#[test]
fn test_partial_factorization() {
    init_logging();
    // N = p * q with p = 16*x + 11 and x inside an 8-bit window
    let n: Integer = "176181946363309".parse().unwrap();
    let lower = n.isqrt().unwrap();
    let roots = find_small_roots(
        expressions(&["16*x + 11"]),
        BoundsInput::Map(vec![interval("x", 1_310_626, 1_310_882)]),
        &options(ModulusOptions::divisor_of(n, lower)),
    )
    .unwrap();
    assert!(roots
        .iter()
        .any(|r| value(r, "x") == Some(1_310_726) && value(r, "p") == Some(20_971_627)));
}

#[test]
fn test_no_root_inside_bounds() {
    let result = find_small_roots(
        expressions(&["x - 5"]),
        BoundsInput::Map(vec![interval("x", 10, 20)]),
        &options(ModulusOptions::default()),
    );
    assert!(matches!(result, Err(Error::NoRootsFound)));

    let partial = FindOptions {
        allow_partial_solutions: true,
        ..options(ModulusOptions::default())
    };
    let result = find_small_roots(
        expressions(&["x - 5"]),
        BoundsInput::Map(vec![interval("x", 10, 20)]),
        &partial,
    );
    assert!(matches!(result, Err(Error::NoRootsFound)));
}

#[test]
fn test_modular_relation_without_bounded_root() {
    init_logging();
    // x^2 + 3x + 7 takes no value in (0, 10) divisible by 1000003
    let result = find_small_roots(
        expressions(&["x^2 + 3*x + 7"]),
        BoundsInput::Map(vec![interval("x", 0, 10)]),
        &options(ModulusOptions::known(int(1_000_003))),
    );
    assert!(matches!(result, Err(Error::NoRootsFound)));
}

#[test]
fn test_partial_solutions_stop_early() {
    // x is determined by the linear relation, y is left open
    let partial = FindOptions {
        allow_partial_solutions: true,
        ..options(ModulusOptions::default())
    };
    let roots = find_small_roots(
        expressions(&["x - 5", "x*y - 35"]),
        BoundsInput::Uniform(int(10)),
        &partial,
    )
    .unwrap();
    assert_eq!(value(&roots[0], "x"), Some(5));

    let roots = find_small_roots(
        expressions(&["x - 5", "x*y - 35"]),
        BoundsInput::Uniform(int(10)),
        &options(ModulusOptions::default()),
    )
    .unwrap();
    assert_eq!(value(&roots[0], "y"), Some(7));
}

#[test]
fn test_expected_solution_is_accepted() {
    let expected: BTreeMap<String, Integer> =
        [("x".to_string(), int(6)), ("y".to_string(), int(4))].into_iter().collect();
    let with_expected = FindOptions {
        expected_solution: vec![expected],
        ..options(ModulusOptions::known(int(97)))
    };
    let roots = find_small_roots(
        expressions(&["x + y - 10", "x - y - 2"]),
        BoundsInput::PerVariable(vec![int(50), int(50)]),
        &with_expected,
    )
    .unwrap();
    assert_eq!(roots.len(), 1);
}

#[test]
fn test_malformed_input_is_fatal() {
    let result = find_small_roots(
        expressions(&["x < 5"]),
        BoundsInput::Uniform(int(10)),
        &options(ModulusOptions::default()),
    );
    assert!(matches!(result, Err(Error::Parse(_))));

    let result = find_small_roots(
        expressions(&["x - 5", "x + 1"]),
        BoundsInput::Uniform(int(10)),
        &options(ModulusOptions {
            modulus: PerRelation::List(vec![Some(ModulusValue::Known(int(7)))]),
            ..ModulusOptions::default()
        }),
    );
    assert!(matches!(result, Err(Error::InvalidInput(_))));
}
