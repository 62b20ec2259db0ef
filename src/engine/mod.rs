//! Structure-function computation engine.
//!
//! [`compute`] dispatches on the input variant (2D/3D × scalar/vector ×
//! longitudinal-only/both), runs the per-displacement driver over every
//! logical rank of the process grid, and aggregates the per-rank samples
//! into dense result tensors.
//!
//! Result tensors are indexed `[lx, (ly,) lz, p]` where `p` is the
//! zero-based order index (`order = q1 + p`), and the origin slots
//! `S(0, p)` are zeroed after aggregation. For identical inputs and an
//! identical `(P, px)` process grid the output is bit-identical across
//! runs; because each displacement's average is computed wholly on one
//! rank with the same arithmetic, it is in fact identical across any
//! valid process grid.

mod driver;
pub mod kernel;

pub use driver::Sample;

use ndarray::{Array3, Array4};

use crate::field::FieldSet;
use crate::partition::ProcessGrid;
use crate::types::{Grid, OrderRange};

/// Dense result tensors of one run.
#[derive(Clone, Debug)]
pub enum SfOutput {
    /// 3D vector results, shape `(Nx/2, Ny/2, Nz/2, M)`.
    Vector3D {
        pll: Array4<f64>,
        perp: Option<Array4<f64>>,
    },
    /// 2D vector results, shape `(Nx/2, Nz/2, M)`.
    Vector2D {
        pll: Array3<f64>,
        perp: Option<Array3<f64>>,
    },
    /// 3D scalar results, shape `(Nx/2, Ny/2, Nz/2, M)`.
    Scalar3D { theta: Array4<f64> },
    /// 2D scalar results, shape `(Nx/2, Nz/2, M)`.
    Scalar2D { theta: Array3<f64> },
}

impl SfOutput {
    /// Progress line describing what is being computed.
    pub fn describe_computation(fields: &FieldSet, longitudinal_only: bool) -> String {
        let what = match (fields.is_scalar(), longitudinal_only) {
            (true, _) => "S",
            (false, true) => "longitudinal S",
            (false, false) => "longitudinal and transverse S",
        };
        let args = if fields.is_two_dimensional() {
            "(lx, lz)"
        } else {
            "(lx, ly, lz)"
        };
        format!("Computing {}{} using {} data..", what, args, fields.describe())
    }
}

/// Compute the structure functions of `fields` over the half-domain.
///
/// `longitudinal_only` is ignored for scalar fields. The result tensors
/// live on the aggregation side only; worker ranks own nothing but their
/// sample lists.
pub fn compute(
    fields: &FieldSet,
    grid: &Grid,
    pgrid: &ProcessGrid,
    orders: &OrderRange,
    longitudinal_only: bool,
) -> SfOutput {
    let shape = grid.shape();
    let m = orders.count();
    match fields {
        FieldSet::Vector3D { u, v, w } => {
            let transverse = !longitudinal_only;
            let per_rank = driver::collect_ranks(pgrid.total(), |rank| {
                driver::vector_rank_3d(u, v, w, grid, pgrid, orders, transverse, rank)
            });
            let dims = (shape.half_nx(), shape.half_ny(), shape.half_nz(), m);
            let mut pll = Array4::zeros(dims);
            let mut perp = transverse.then(|| Array4::zeros(dims));
            driver::merge_3d(&per_rank, &mut pll, perp.as_mut());
            SfOutput::Vector3D { pll, perp }
        }
        FieldSet::Scalar3D { theta } => {
            let per_rank = driver::collect_ranks(pgrid.total(), |rank| {
                driver::scalar_rank_3d(theta, grid, pgrid, orders, rank)
            });
            let dims = (shape.half_nx(), shape.half_ny(), shape.half_nz(), m);
            let mut tensor = Array4::zeros(dims);
            driver::merge_3d(&per_rank, &mut tensor, None);
            SfOutput::Scalar3D { theta: tensor }
        }
        FieldSet::Vector2D { u, w } => {
            let transverse = !longitudinal_only;
            let per_rank = driver::collect_ranks(pgrid.total(), |rank| {
                driver::vector_rank_2d(u, w, grid, pgrid, orders, transverse, rank)
            });
            let dims = (shape.half_nx(), shape.half_nz(), m);
            let mut pll = Array3::zeros(dims);
            let mut perp = transverse.then(|| Array3::zeros(dims));
            driver::merge_2d(&per_rank, &mut pll, perp.as_mut());
            SfOutput::Vector2D { pll, perp }
        }
        FieldSet::Scalar2D { theta } => {
            let per_rank = driver::collect_ranks(pgrid.total(), |rank| {
                driver::scalar_rank_2d(theta, grid, pgrid, orders, rank)
            });
            let dims = (shape.half_nx(), shape.half_nz(), m);
            let mut tensor = Array3::zeros(dims);
            driver::merge_2d(&per_rank, &mut tensor, None);
            SfOutput::Scalar2D { theta: tensor }
        }
    }
}
