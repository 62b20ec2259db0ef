//! Difference and projection kernel for a single displacement.
//!
//! For a displacement `l` the kernel forms the field-difference buffers
//! over the surviving sub-array of shape `(N - l)` by whole-sub-array
//! subtraction of the shifted slice from the base slice, projects vector
//! differences into the longitudinal component and the transverse
//! residual magnitude, and reduces each buffer to one mean per order:
//!
//! ```text
//! S(l, q) = ( Σ φ(Δ, l)^q ) / Π (N_a - l_a)
//! ```
//!
//! Exponentiation uses `f64::powi`; a zero transverse magnitude therefore
//! contributes 0 for q > 0, 1 for q = 0, and +∞ for q < 0 (no filtering).
//! At the origin displacement `r = 0` the projection step is skipped;
//! every difference is identically zero there and the orchestrator
//! overwrites the origin slots regardless.

use ndarray::{azip, s, Array, Array2, Array3, Dimension};

use crate::types::{Displacement, Grid, OrderRange};

/// Per-order averages produced for one displacement.
#[derive(Clone, Debug)]
pub struct KernelOutput {
    /// Longitudinal means, one per order.
    pub pll: Vec<f64>,
    /// Transverse means, one per order; empty when not requested.
    pub perp: Vec<f64>,
}

/// Mean of `values^q` for every order, with a plain f64 accumulator.
fn order_means<D: Dimension>(
    values: &Array<f64, D>,
    orders: &OrderRange,
    n_pairs: f64,
) -> Vec<f64> {
    orders
        .exponents()
        .map(|q| values.iter().map(|v| v.powi(q)).sum::<f64>() / n_pairs)
        .collect()
}

/// Longitudinal and (optionally) transverse means for a 3D velocity field.
pub fn vector_orders_3d(
    u: &Array3<f64>,
    v: &Array3<f64>,
    w: &Array3<f64>,
    l: Displacement,
    grid: &Grid,
    orders: &OrderRange,
    transverse: bool,
) -> KernelOutput {
    let (nx, ny, nz) = u.dim();
    let (sx, sy, sz) = (nx - l.x, ny - l.y, nz - l.z);
    let [lx, ly, lz] = l.physical(grid);
    let r = l.magnitude(grid);
    let n_pairs = (sx * sy * sz) as f64;

    let dux = &u.slice(s![l.x.., l.y.., l.z..]) - &u.slice(s![..sx, ..sy, ..sz]);
    let duy = &v.slice(s![l.x.., l.y.., l.z..]) - &v.slice(s![..sx, ..sy, ..sz]);
    let duz = &w.slice(s![l.x.., l.y.., l.z..]) - &w.slice(s![..sx, ..sy, ..sz]);

    let mut dpll = Array3::<f64>::zeros(dux.raw_dim());
    if r > 0.0 {
        azip!((d in &mut dpll, &a in &dux, &b in &duy, &c in &duz) {
            *d = (lx * a + ly * b + lz * c) / r;
        });
    }
    let pll = order_means(&dpll, orders, n_pairs);

    let perp = if transverse {
        let mut dperp = Array3::<f64>::zeros(dux.raw_dim());
        if r > 0.0 {
            azip!((t in &mut dperp, &a in &dux, &b in &duy, &c in &duz, &d in &dpll) {
                let ax = a - d * lx / r;
                let ay = b - d * ly / r;
                let az = c - d * lz / r;
                *t = (ax * ax + ay * ay + az * az).sqrt();
            });
        }
        order_means(&dperp, orders, n_pairs)
    } else {
        Vec::new()
    };

    KernelOutput { pll, perp }
}

/// Longitudinal and (optionally) transverse means for a 2D velocity field.
pub fn vector_orders_2d(
    u: &Array2<f64>,
    w: &Array2<f64>,
    l: Displacement,
    grid: &Grid,
    orders: &OrderRange,
    transverse: bool,
) -> KernelOutput {
    let (nx, nz) = u.dim();
    let (sx, sz) = (nx - l.x, nz - l.z);
    let [lx, _, lz] = l.physical(grid);
    let r = l.magnitude(grid);
    let n_pairs = (sx * sz) as f64;

    let dux = &u.slice(s![l.x.., l.z..]) - &u.slice(s![..sx, ..sz]);
    let duz = &w.slice(s![l.x.., l.z..]) - &w.slice(s![..sx, ..sz]);

    let mut dpll = Array2::<f64>::zeros(dux.raw_dim());
    if r > 0.0 {
        azip!((d in &mut dpll, &a in &dux, &c in &duz) {
            *d = (lx * a + lz * c) / r;
        });
    }
    let pll = order_means(&dpll, orders, n_pairs);

    let perp = if transverse {
        let mut dperp = Array2::<f64>::zeros(dux.raw_dim());
        if r > 0.0 {
            azip!((t in &mut dperp, &a in &dux, &c in &duz, &d in &dpll) {
                let ax = a - d * lx / r;
                let az = c - d * lz / r;
                *t = (ax * ax + az * az).sqrt();
            });
        }
        order_means(&dperp, orders, n_pairs)
    } else {
        Vec::new()
    };

    KernelOutput { pll, perp }
}

/// Per-order means of scalar differences for a 3D field.
pub fn scalar_orders_3d(
    theta: &Array3<f64>,
    l: Displacement,
    orders: &OrderRange,
) -> Vec<f64> {
    let (nx, ny, nz) = theta.dim();
    let (sx, sy, sz) = (nx - l.x, ny - l.y, nz - l.z);
    let dt = &theta.slice(s![l.x.., l.y.., l.z..]) - &theta.slice(s![..sx, ..sy, ..sz]);
    order_means(&dt, orders, (sx * sy * sz) as f64)
}

/// Per-order means of scalar differences for a 2D field.
pub fn scalar_orders_2d(
    theta: &Array2<f64>,
    l: Displacement,
    orders: &OrderRange,
) -> Vec<f64> {
    let (nx, nz) = theta.dim();
    let (sx, sz) = (nx - l.x, nz - l.z);
    let dt = &theta.slice(s![l.x.., l.z..]) - &theta.slice(s![..sx, ..sz]);
    order_means(&dt, orders, (sx * sz) as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Domain, GridShape};
    use ndarray::arr2;

    fn planar_grid(n: usize) -> Grid {
        // Extents chosen so dx = dz = 1.
        Grid::new(
            GridShape::new(n, 1, n),
            Domain::new((n - 1) as f64, 1.0, (n - 1) as f64),
        )
    }

    #[test]
    fn test_scalar_2d_hand_computed() {
        let theta = arr2(&[[0.0, 1.0], [2.0, 3.0]]);
        let orders = OrderRange::new(1, 2).unwrap();

        // l = (1, 0): pairs (0,k)-(1,k), diffs [2, 2] -> mean 2, mean 4.
        let means = scalar_orders_2d(&theta, Displacement::planar(1, 0), &orders);
        assert_eq!(means, vec![2.0, 4.0]);

        // l = (1, 1): single pair, diff 3.
        let means = scalar_orders_2d(&theta, Displacement::planar(1, 1), &orders);
        assert_eq!(means, vec![3.0, 9.0]);
    }

    #[test]
    fn test_count_divisor() {
        // A non-uniform buffer exposes a wrong pair-count divisor.
        let theta = arr2(&[
            [0.0, 0.0, 0.0, 0.0],
            [1.0, 1.0, 1.0, 1.0],
            [2.0, 2.0, 2.0, 5.0],
            [3.0, 3.0, 3.0, 3.0],
        ]);
        let orders = OrderRange::new(1, 1).unwrap();
        // l = (2, 0): 2x4 = 8 pairs, diffs are 2 except theta[2,3]-theta[0,3]=5
        // and theta[3,3]-theta[1,3]=2 -> sum = 7*2 + 5 = 19.
        let means = scalar_orders_2d(&theta, Displacement::planar(2, 0), &orders);
        assert!((means[0] - 19.0 / 8.0).abs() < 1e-15);
    }

    #[test]
    fn test_vector_2d_longitudinal_only() {
        let grid = planar_grid(4);
        // u = (x, z): purely longitudinal increments with |du| = r.
        let u = Array2::from_shape_fn((4, 4), |(i, _)| i as f64);
        let w = Array2::from_shape_fn((4, 4), |(_, k)| k as f64);
        let orders = OrderRange::new(1, 3).unwrap();

        let out = vector_orders_2d(&u, &w, Displacement::planar(1, 1), &grid, &orders, true);
        let r = 2f64.sqrt();
        for (idx, q) in orders.exponents().enumerate() {
            assert!((out.pll[idx] - r.powi(q)).abs() < 1e-12);
            assert!(out.perp[idx].abs() < 1e-12);
        }
    }

    #[test]
    fn test_vector_2d_pure_transverse() {
        let grid = planar_grid(4);
        // u = (0, x): increments along x are perpendicular to l = (1, 0).
        let u = Array2::zeros((4, 4));
        let w = Array2::from_shape_fn((4, 4), |(i, _)| i as f64);
        let orders = OrderRange::new(1, 2).unwrap();

        let out = vector_orders_2d(&u, &w, Displacement::planar(1, 0), &grid, &orders, true);
        assert!(out.pll[0].abs() < 1e-15);
        assert!((out.perp[0] - 1.0).abs() < 1e-15);
        assert!((out.perp[1] - 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_origin_displacement_is_finite() {
        let grid = planar_grid(4);
        let u = Array2::from_shape_fn((4, 4), |(i, _)| i as f64);
        let w = Array2::zeros((4, 4));
        let orders = OrderRange::new(1, 2).unwrap();

        let out = vector_orders_2d(&u, &w, Displacement::planar(0, 0), &grid, &orders, true);
        assert!(out.pll.iter().chain(out.perp.iter()).all(|v| v.is_finite()));
    }

    #[test]
    fn test_vector_3d_linear_profile() {
        let grid = Grid::new(GridShape::cube(5), Domain::new(4.0, 4.0, 4.0));
        let u = Array3::from_shape_fn((5, 5, 5), |(i, _, _)| i as f64);
        let v = Array3::from_shape_fn((5, 5, 5), |(_, j, _)| j as f64);
        let w = Array3::from_shape_fn((5, 5, 5), |(_, _, k)| k as f64);
        let orders = OrderRange::new(1, 4).unwrap();

        let l = Displacement::new(1, 2, 0);
        let out = vector_orders_3d(&u, &v, &w, l, &grid, &orders, true);
        let r = l.magnitude(&grid);
        for (idx, q) in orders.exponents().enumerate() {
            assert!(
                (out.pll[idx] - r.powi(q)).abs() < 1e-12 * r.powi(q).max(1.0),
                "order {} mismatch",
                q
            );
            assert!(out.perp[idx].abs() < 1e-12);
        }
    }
}
