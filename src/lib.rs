//! # sfgrid
//!
//! Velocity and scalar structure functions over 2D/3D gridded turbulence
//! fields.
//!
//! For every displacement `l` in the half-domain, the q-th order
//! structure function is the mean of a field-difference functional over
//! all grid-point pairs separated by `l`:
//!
//! ```text
//! S(l, q) = ( Σ_x φ(u(x + l) - u(x), l)^q ) / Π_a (N_a - l_a)
//! ```
//!
//! where φ is the longitudinal projection or the transverse residual
//! magnitude for velocity fields and the plain difference for scalars.
//! The half-domain is decomposed over a logical 2D process grid with
//! complement-paired index lists so each rank carries about the same
//! work, and per-rank results merge deterministically into dense result
//! tensors.
//!
//! The crate provides the building blocks:
//! - Grid and displacement model ([`types`])
//! - Load partitioner over the process grid ([`partition`])
//! - Field containers and test profiles ([`field`])
//! - Difference/projection kernel and rank driver ([`engine`])
//! - Analytic verification ([`analysis`])
//! - YAML parameters and CLI boolean conventions ([`config`])
//! - HDF5 adapters behind the `hdf5` feature ([`io`])
//! - The complete run pipeline ([`runner`])

pub mod analysis;
pub mod config;
pub mod engine;
pub mod error;
pub mod field;
pub mod io;
pub mod partition;
pub mod runner;
pub mod types;

// Re-export the main types for convenience
pub use config::{parse_switch, ConfigError, Parameters};
pub use engine::{compute, SfOutput};
pub use error::{SfError, SfResult};
pub use field::FieldSet;
pub use partition::{
    axis_index_list, displacement_table, rank_displacements, DecompositionError, ProcessGrid,
};
pub use runner::{run, DatasetNames, RunConfig, RunSummary};
pub use types::{Displacement, Domain, Grid, GridShape, OrderRange};
