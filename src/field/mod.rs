//! Field containers for the four input variants.
//!
//! A [`FieldSet`] owns the dense component arrays of one input field:
//! three `Array3` components for a 3D velocity field, two `Array2`
//! components for a 2D one (the y-axis is absent), or a single array for
//! a scalar. Fields are acquired once (read from disk or generated) and
//! are immutable for the rest of the run.

use ndarray::{Array2, Array3};

use crate::types::Grid;

/// The input field of a run.
#[derive(Clone, Debug)]
pub enum FieldSet {
    /// 3D velocity field (u, v, w) on an Nx × Ny × Nz grid.
    Vector3D {
        u: Array3<f64>,
        v: Array3<f64>,
        w: Array3<f64>,
    },
    /// 2D velocity field (u, w) on an Nx × Nz grid.
    Vector2D { u: Array2<f64>, w: Array2<f64> },
    /// 3D scalar field on an Nx × Ny × Nz grid.
    Scalar3D { theta: Array3<f64> },
    /// 2D scalar field on an Nx × Nz grid.
    Scalar2D { theta: Array2<f64> },
}

impl FieldSet {
    /// Linear 3D velocity field `u = (x, y, z)`.
    ///
    /// For this profile every velocity difference is parallel to the
    /// displacement, so `S_par(l, q) = r^q` and the transverse component
    /// vanishes identically.
    pub fn linear_vector_3d(grid: &Grid) -> Self {
        let s = grid.shape();
        let (dx, dy, dz) = (grid.dx(), grid.dy(), grid.dz());
        let dims = (s.nx(), s.ny(), s.nz());
        Self::Vector3D {
            u: Array3::from_shape_fn(dims, |(i, _, _)| i as f64 * dx),
            v: Array3::from_shape_fn(dims, |(_, j, _)| j as f64 * dy),
            w: Array3::from_shape_fn(dims, |(_, _, k)| k as f64 * dz),
        }
    }

    /// Linear 2D velocity field `u = (x, z)`.
    pub fn linear_vector_2d(grid: &Grid) -> Self {
        let s = grid.shape();
        let (dx, dz) = (grid.dx(), grid.dz());
        let dims = (s.nx(), s.nz());
        Self::Vector2D {
            u: Array2::from_shape_fn(dims, |(i, _)| i as f64 * dx),
            w: Array2::from_shape_fn(dims, |(_, k)| k as f64 * dz),
        }
    }

    /// Linear 3D scalar field `theta = x + y + z`, for which
    /// `S_theta(l, q) = (lx + ly + lz)^q`.
    pub fn linear_scalar_3d(grid: &Grid) -> Self {
        let s = grid.shape();
        let (dx, dy, dz) = (grid.dx(), grid.dy(), grid.dz());
        Self::Scalar3D {
            theta: Array3::from_shape_fn((s.nx(), s.ny(), s.nz()), |(i, j, k)| {
                i as f64 * dx + j as f64 * dy + k as f64 * dz
            }),
        }
    }

    /// Linear 2D scalar field `theta = x + z`.
    pub fn linear_scalar_2d(grid: &Grid) -> Self {
        let s = grid.shape();
        let (dx, dz) = (grid.dx(), grid.dz());
        Self::Scalar2D {
            theta: Array2::from_shape_fn((s.nx(), s.nz()), |(i, k)| {
                i as f64 * dx + k as f64 * dz
            }),
        }
    }

    /// Generate the linear profile matching a (2D, scalar) mode pair.
    pub fn linear_profile(grid: &Grid, two_dimensional: bool, scalar: bool) -> Self {
        match (two_dimensional, scalar) {
            (false, false) => Self::linear_vector_3d(grid),
            (false, true) => Self::linear_scalar_3d(grid),
            (true, false) => Self::linear_vector_2d(grid),
            (true, true) => Self::linear_scalar_2d(grid),
        }
    }

    pub fn is_two_dimensional(&self) -> bool {
        matches!(self, Self::Vector2D { .. } | Self::Scalar2D { .. })
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar2D { .. } | Self::Scalar3D { .. })
    }

    /// Human-readable description used in progress output.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Vector3D { .. } => "3D velocity field",
            Self::Vector2D { .. } => "2D velocity field",
            Self::Scalar3D { .. } => "3D scalar field",
            Self::Scalar2D { .. } => "2D scalar field",
        }
    }
}
