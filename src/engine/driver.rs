//! Per-displacement driver and result aggregation.
//!
//! Every logical rank walks its partitioner-assigned displacement list in
//! order (with the full z half-axis as an undistributed inner loop in 3D)
//! and emits one [`Sample`] per (displacement, order). All ranks' sample
//! vectors are then merged into the dense result tensors in rank order.
//! Sample slots never collide across ranks, since each rank owns
//! disjoint (x, y) pairs, so the merge reproduces the lock-step gather
//! schedule of the rank-parallel formulation exactly.

use ndarray::{s, Array2, Array3, Array4};

use crate::partition::{self, ProcessGrid};
use crate::types::{Displacement, Grid, OrderRange};

use super::kernel;

/// One aggregated value: a displacement, an order index, and the means.
///
/// For 2D variants `y` is unused and `z` indexes the second distributed
/// axis. `perp` is 0 when the transverse component was not requested.
#[derive(Clone, Copy, Debug)]
pub struct Sample {
    pub x: usize,
    pub y: usize,
    pub z: usize,
    pub order: usize,
    pub pll: f64,
    pub perp: f64,
}

/// Run every logical rank on the rayon pool and collect the per-rank
/// sample vectors. Identical to the serial schedule: each rank's work is
/// independent and the merge is ordered by rank.
#[cfg(feature = "parallel")]
pub(crate) fn collect_ranks<F>(total: usize, per_rank: F) -> Vec<Vec<Sample>>
where
    F: Fn(usize) -> Vec<Sample> + Send + Sync,
{
    use rayon::prelude::*;
    (0..total).into_par_iter().map(per_rank).collect()
}

/// Serial fallback: walk the logical ranks in order.
#[cfg(not(feature = "parallel"))]
pub(crate) fn collect_ranks<F>(total: usize, per_rank: F) -> Vec<Vec<Sample>>
where
    F: Fn(usize) -> Vec<Sample> + Send + Sync,
{
    (0..total).map(per_rank).collect()
}

/// Samples for one rank of a 3D vector run.
pub(crate) fn vector_rank_3d(
    u: &Array3<f64>,
    v: &Array3<f64>,
    w: &Array3<f64>,
    grid: &Grid,
    pgrid: &ProcessGrid,
    orders: &OrderRange,
    transverse: bool,
    rank: usize,
) -> Vec<Sample> {
    let shape = grid.shape();
    let list = partition::rank_displacements(pgrid, shape.half_nx(), shape.half_ny(), rank);
    let mut samples = Vec::with_capacity(list.len() * shape.half_nz() * orders.count());
    for &(x, y) in &list {
        for z in 0..shape.half_nz() {
            let l = Displacement::new(x, y, z);
            let out = kernel::vector_orders_3d(u, v, w, l, grid, orders, transverse);
            push_vector_samples(&mut samples, x, y, z, &out);
        }
    }
    samples
}

/// Samples for one rank of a 3D scalar run.
pub(crate) fn scalar_rank_3d(
    theta: &Array3<f64>,
    grid: &Grid,
    pgrid: &ProcessGrid,
    orders: &OrderRange,
    rank: usize,
) -> Vec<Sample> {
    let shape = grid.shape();
    let list = partition::rank_displacements(pgrid, shape.half_nx(), shape.half_ny(), rank);
    let mut samples = Vec::with_capacity(list.len() * shape.half_nz() * orders.count());
    for &(x, y) in &list {
        for z in 0..shape.half_nz() {
            let means = kernel::scalar_orders_3d(theta, Displacement::new(x, y, z), orders);
            for (order, &st) in means.iter().enumerate() {
                samples.push(Sample {
                    x,
                    y,
                    z,
                    order,
                    pll: st,
                    perp: 0.0,
                });
            }
        }
    }
    samples
}

/// Samples for one rank of a 2D vector run. The partitioner's second
/// axis is z here.
pub(crate) fn vector_rank_2d(
    u: &Array2<f64>,
    w: &Array2<f64>,
    grid: &Grid,
    pgrid: &ProcessGrid,
    orders: &OrderRange,
    transverse: bool,
    rank: usize,
) -> Vec<Sample> {
    let shape = grid.shape();
    let list = partition::rank_displacements(pgrid, shape.half_nx(), shape.half_nz(), rank);
    let mut samples = Vec::with_capacity(list.len() * orders.count());
    for &(x, z) in &list {
        let l = Displacement::planar(x, z);
        let out = kernel::vector_orders_2d(u, w, l, grid, orders, transverse);
        push_vector_samples(&mut samples, x, 0, z, &out);
    }
    samples
}

/// Samples for one rank of a 2D scalar run.
pub(crate) fn scalar_rank_2d(
    theta: &Array2<f64>,
    grid: &Grid,
    pgrid: &ProcessGrid,
    orders: &OrderRange,
    rank: usize,
) -> Vec<Sample> {
    let shape = grid.shape();
    let list = partition::rank_displacements(pgrid, shape.half_nx(), shape.half_nz(), rank);
    let mut samples = Vec::with_capacity(list.len() * orders.count());
    for &(x, z) in &list {
        let means = kernel::scalar_orders_2d(theta, Displacement::planar(x, z), orders);
        for (order, &st) in means.iter().enumerate() {
            samples.push(Sample {
                x,
                y: 0,
                z,
                order,
                pll: st,
                perp: 0.0,
            });
        }
    }
    samples
}

fn push_vector_samples(
    samples: &mut Vec<Sample>,
    x: usize,
    y: usize,
    z: usize,
    out: &kernel::KernelOutput,
) {
    for (order, &pll) in out.pll.iter().enumerate() {
        let perp = out.perp.get(order).copied().unwrap_or(0.0);
        samples.push(Sample {
            x,
            y,
            z,
            order,
            pll,
            perp,
        });
    }
}

/// Merge all ranks' samples into 3D-mode tensors and zero the origin.
pub(crate) fn merge_3d(
    per_rank: &[Vec<Sample>],
    pll: &mut Array4<f64>,
    mut perp: Option<&mut Array4<f64>>,
) {
    for samples in per_rank {
        for s in samples {
            pll[[s.x, s.y, s.z, s.order]] = s.pll;
            if let Some(perp) = perp.as_deref_mut() {
                perp[[s.x, s.y, s.z, s.order]] = s.perp;
            }
        }
    }
    pll.slice_mut(s![0, 0, 0, ..]).fill(0.0);
    if let Some(perp) = perp {
        perp.slice_mut(s![0, 0, 0, ..]).fill(0.0);
    }
}

/// Merge all ranks' samples into 2D-mode tensors and zero the origin.
pub(crate) fn merge_2d(
    per_rank: &[Vec<Sample>],
    pll: &mut Array3<f64>,
    mut perp: Option<&mut Array3<f64>>,
) {
    for samples in per_rank {
        for s in samples {
            pll[[s.x, s.z, s.order]] = s.pll;
            if let Some(perp) = perp.as_deref_mut() {
                perp[[s.x, s.z, s.order]] = s.perp;
            }
        }
    }
    pll.slice_mut(s![0, 0, ..]).fill(0.0);
    if let Some(perp) = perp {
        perp.slice_mut(s![0, 0, ..]).fill(0.0);
    }
}
