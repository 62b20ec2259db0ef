//! Strongly-typed grid and displacement model.
//!
//! Small value types shared by every stage of a run:
//!
//! - [`GridShape`], [`Domain`], [`Grid`]: point counts, physical extents,
//!   and the derived spacings (`d = L/(N-1)`, 0 on degenerate axes)
//! - [`Displacement`]: an integer half-domain displacement and its
//!   physical vector
//! - [`OrderRange`]: the inclusive range of orders `[q1, q2]`

mod displacement;
mod grid;
mod orders;

pub use displacement::Displacement;
pub use grid::{Domain, Grid, GridShape};
pub use orders::OrderRange;
