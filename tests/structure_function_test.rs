//! Analytic round-trip tests for the structure-function engine.
//!
//! Each linear test profile has a closed form; the computed tensors must
//! match it to a relative error of 1e-10, with the absolute error as the
//! fallback where the closed form vanishes (notably the zeroed origin).

use sfgrid::analysis::{verify_scalar_2d, verify_scalar_3d, verify_vector_2d, TOLERANCE};
use sfgrid::engine::{compute, SfOutput};
use sfgrid::field::FieldSet;
use sfgrid::partition::ProcessGrid;
use sfgrid::types::{Domain, Grid, GridShape, OrderRange};

fn grid_3d(n: usize) -> Grid {
    Grid::new(GridShape::cube(n), Domain::unit())
}

fn grid_2d(n: usize) -> Grid {
    Grid::new(GridShape::new(n, 1, n), Domain::unit())
}

#[test]
fn test_vector_3d_linear() {
    // u = (x, y, z) on 32^3: S_par(l, q) = r^q, S_perp = 0.
    let grid = grid_3d(32);
    let fields = FieldSet::linear_vector_3d(&grid);
    let pgrid = ProcessGrid::new(4, 2, 16, 16).unwrap();
    let orders = OrderRange::new(1, 4).unwrap();

    let output = compute(&fields, &grid, &pgrid, &orders, false);
    let SfOutput::Vector3D { pll, perp } = output else {
        panic!("expected 3D vector output");
    };
    let perp = perp.expect("transverse tensor requested");

    let mut max_err: f64 = 0.0;
    for (p, q) in orders.exponents().enumerate() {
        let mut order_max: f64 = 0.0;
        for i in 0..16 {
            let lx = i as f64 * grid.dx();
            for j in 0..16 {
                let ly = j as f64 * grid.dy();
                for k in 0..16 {
                    let lz = k as f64 * grid.dz();
                    let r = (lx * lx + ly * ly + lz * lz).sqrt();
                    let err = if r > TOLERANCE {
                        ((pll[[i, j, k, p]] - r.powi(q)) / r.powi(q)).abs()
                    } else {
                        pll[[i, j, k, p]].abs()
                    };
                    order_max = order_max.max(err).max(perp[[i, j, k, p]].abs());
                }
            }
        }
        println!("order {}: max error {:.3e}", q, order_max);
        max_err = max_err.max(order_max);
    }
    assert!(max_err <= TOLERANCE, "max error {:.3e}", max_err);

    // Origin cleanup across the full order span.
    for p in 0..orders.count() {
        assert_eq!(pll[[0, 0, 0, p]], 0.0);
        assert_eq!(perp[[0, 0, 0, p]], 0.0);
    }
}

#[test]
fn test_vector_2d_linear() {
    // u = (x, z) on 32x32: S_par(l, q) = r^q, S_perp = 0.
    let grid = grid_2d(32);
    let fields = FieldSet::linear_vector_2d(&grid);
    let pgrid = ProcessGrid::new(4, 2, 16, 16).unwrap();
    let orders = OrderRange::new(1, 3).unwrap();

    let output = compute(&fields, &grid, &pgrid, &orders, false);
    let SfOutput::Vector2D { pll, perp } = output else {
        panic!("expected 2D vector output");
    };
    let report = verify_vector_2d(&pll, perp.as_ref(), &grid, &orders);
    println!("max error {:.3e}", report.max_error);
    assert!(report.passed(), "max error {:.3e}", report.max_error);
}

#[test]
fn test_scalar_3d_linear() {
    // theta = x + y + z on 32^3: S(l, q) = (lx + ly + lz)^q.
    let grid = grid_3d(32);
    let fields = FieldSet::linear_scalar_3d(&grid);
    let pgrid = ProcessGrid::new(8, 4, 16, 16).unwrap();
    let orders = OrderRange::new(1, 3).unwrap();

    let output = compute(&fields, &grid, &pgrid, &orders, false);
    let SfOutput::Scalar3D { theta } = output else {
        panic!("expected 3D scalar output");
    };
    let report = verify_scalar_3d(&theta, &grid, &orders);
    println!("max error {:.3e}", report.max_error);
    assert!(report.passed(), "max error {:.3e}", report.max_error);
}

#[test]
fn test_scalar_2d_linear() {
    // theta = x + z on 32x32: S(l, q) = (lx + lz)^q.
    let grid = grid_2d(32);
    let fields = FieldSet::linear_scalar_2d(&grid);
    let pgrid = ProcessGrid::new(2, 1, 16, 16).unwrap();
    let orders = OrderRange::new(1, 4).unwrap();

    let output = compute(&fields, &grid, &pgrid, &orders, false);
    let SfOutput::Scalar2D { theta } = output else {
        panic!("expected 2D scalar output");
    };
    let report = verify_scalar_2d(&theta, &grid, &orders);
    println!("max error {:.3e}", report.max_error);
    assert!(report.passed(), "max error {:.3e}", report.max_error);
}

#[test]
fn test_origin_slots_are_zeroed() {
    // The closed form gives 0^q at the origin anyway; the tensors must
    // hold an exact 0 there for every order of a q2 - q1 >= 2 span.
    let grid = grid_2d(16);
    let fields = FieldSet::linear_scalar_2d(&grid);
    let pgrid = ProcessGrid::new(2, 2, 8, 8).unwrap();
    let orders = OrderRange::new(1, 3).unwrap();

    let output = compute(&fields, &grid, &pgrid, &orders, false);
    let SfOutput::Scalar2D { theta } = output else {
        panic!("expected 2D scalar output");
    };
    for p in 0..orders.count() {
        assert_eq!(theta[[0, 0, p]], 0.0);
    }
}

#[test]
fn test_repeated_runs_are_bit_identical() {
    let grid = grid_3d(16);
    let fields = FieldSet::linear_vector_3d(&grid);
    let pgrid = ProcessGrid::new(4, 2, 8, 8).unwrap();
    let orders = OrderRange::new(1, 3).unwrap();

    let first = compute(&fields, &grid, &pgrid, &orders, false);
    let second = compute(&fields, &grid, &pgrid, &orders, false);
    match (first, second) {
        (
            SfOutput::Vector3D { pll: p1, perp: t1 },
            SfOutput::Vector3D { pll: p2, perp: t2 },
        ) => {
            assert_eq!(p1, p2);
            assert_eq!(t1, t2);
        }
        _ => panic!("expected 3D vector outputs"),
    }
}

#[test]
fn test_result_independent_of_rank_count() {
    // Each displacement's mean is computed wholly on one rank with the
    // same arithmetic, so even different (P, px) grids agree exactly.
    let grid = grid_2d(16);
    let fields = FieldSet::linear_scalar_2d(&grid);
    let orders = OrderRange::new(1, 2).unwrap();

    let serial = ProcessGrid::new(1, 1, 8, 8).unwrap();
    let wide = ProcessGrid::new(8, 2, 8, 8).unwrap();
    let a = compute(&fields, &grid, &serial, &orders, false);
    let b = compute(&fields, &grid, &wide, &orders, false);
    match (a, b) {
        (SfOutput::Scalar2D { theta: t1 }, SfOutput::Scalar2D { theta: t2 }) => {
            assert_eq!(t1, t2);
        }
        _ => panic!("expected 2D scalar outputs"),
    }
}

#[test]
fn test_longitudinal_only_run() {
    let grid = grid_2d(16);
    let fields = FieldSet::linear_vector_2d(&grid);
    let pgrid = ProcessGrid::new(2, 2, 8, 8).unwrap();
    let orders = OrderRange::new(2, 2).unwrap();

    let output = compute(&fields, &grid, &pgrid, &orders, true);
    let SfOutput::Vector2D { pll, perp } = output else {
        panic!("expected 2D vector output");
    };
    assert!(perp.is_none());
    let report = verify_vector_2d(&pll, None, &grid, &orders);
    assert!(report.passed(), "max error {:.3e}", report.max_error);
}
