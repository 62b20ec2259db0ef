//! Displacement-space decomposition across a logical 2D process grid.
//!
//! The half-domain of displacements is split over `P = px * py` logical
//! ranks. Work at displacement `l` is proportional to the surviving
//! sub-array `prod(N - l)`, so a plain block split would be badly
//! unbalanced. Each axis instead interleaves rank-owned indices with
//! stride `p` and pairs every index with its complement `H - 1 - i`:
//! a heavy low-`l` displacement and a light high-`l` displacement land on
//! the same rank, and the summed work per pair is roughly constant.
//!
//! Only the outer two axes are distributed; in 3D every rank sweeps the
//! full `z` half-axis for each of its `(x, y)` pairs.

use std::fmt;

use thiserror::Error;

/// Violations of the process-grid divisibility constraints.
#[derive(Debug, Error)]
pub enum DecompositionError {
    #[error("number of ranks in x direction must be positive")]
    ZeroRanksInX,
    #[error(
        "number of ranks in x direction ({px}) exceeds the total number of ranks ({total})"
    )]
    TooManyRanksInX { px: usize, total: usize },
    #[error("total rank count ({total}) is not divisible by Processors_X ({px})")]
    UnevenGrid { total: usize, px: usize },
    #[error(
        "half-extent {half} along {axis} must be a power-of-2 multiple of the rank count {procs}"
    )]
    BadAxisSplit {
        axis: &'static str,
        half: usize,
        procs: usize,
    },
}

/// The logical process grid `P = px * py`.
///
/// Rank `r` maps to coordinates `(rx, ry) = (r / py, r mod py)`. In 2D
/// mode the "y" axis of the process grid distributes the z displacement
/// axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProcessGrid {
    total: usize,
    px: usize,
    py: usize,
}

impl ProcessGrid {
    /// Build and validate a process grid against the half-domain extents
    /// of the two distributed axes.
    ///
    /// Constraints: `px <= P`, `px | P`, and each half-extent must be
    /// divisible by its rank count with a power-of-two quotient.
    pub fn new(
        total: usize,
        px: usize,
        half_nx: usize,
        half_n2: usize,
    ) -> Result<Self, DecompositionError> {
        if px == 0 {
            return Err(DecompositionError::ZeroRanksInX);
        }
        if px > total {
            return Err(DecompositionError::TooManyRanksInX { px, total });
        }
        if total % px != 0 {
            return Err(DecompositionError::UnevenGrid { total, px });
        }
        let py = total / px;
        check_axis_split("x", half_nx, px)?;
        check_axis_split("y/z", half_n2, py)?;
        Ok(Self { total, px, py })
    }

    #[inline]
    pub fn total(&self) -> usize {
        self.total
    }

    #[inline]
    pub fn px(&self) -> usize {
        self.px
    }

    #[inline]
    pub fn py(&self) -> usize {
        self.py
    }

    /// Coordinates `(rx, ry)` of a rank.
    #[inline]
    pub fn coords(&self, rank: usize) -> (usize, usize) {
        (rank / self.py, rank % self.py)
    }
}

impl fmt::Display for ProcessGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ranks ({}×{})", self.total, self.px, self.py)
    }
}

fn check_axis_split(
    axis: &'static str,
    half: usize,
    procs: usize,
) -> Result<(), DecompositionError> {
    let bad = procs > half || half % procs != 0 || !(half / procs).is_power_of_two();
    if bad {
        return Err(DecompositionError::BadAxisSplit { axis, half, procs });
    }
    Ok(())
}

/// 1D index list along one axis for the rank coordinate `coord`.
///
/// Even slots interleave with stride `procs`; each odd slot holds the
/// complement `half - 1 - previous`, pairing a heavy displacement with a
/// light one. When `procs == half` every rank owns a single index and no
/// complement slot exists.
pub fn axis_index_list(half: usize, procs: usize, coord: usize) -> Vec<usize> {
    let len = half / procs;
    let mut list = vec![0usize; len];
    let mut i = 0;
    while i < len {
        list[i] = coord + i * procs;
        if procs != half && i + 1 < len {
            list[i + 1] = half - 1 - list[i];
        }
        i += 2;
    }
    list
}

/// Ordered `(x, y)` displacement list owned by one rank.
///
/// Row-major product of the per-axis lists: all second-axis indices are
/// emitted for the first x entry, then for the next, and so on. Every
/// rank's list has the same length `(half_nx * half_n2) / P`.
pub fn rank_displacements(
    grid: &ProcessGrid,
    half_nx: usize,
    half_n2: usize,
    rank: usize,
) -> Vec<(usize, usize)> {
    let (rx, ry) = grid.coords(rank);
    let xs = axis_index_list(half_nx, grid.px(), rx);
    let ys = axis_index_list(half_n2, grid.py(), ry);
    let mut list = Vec::with_capacity(xs.len() * ys.len());
    for &x in &xs {
        for &y in &ys {
            list.push((x, y));
        }
    }
    list
}

/// Displacement lists for every rank, indexed by rank id.
///
/// The union over ranks covers the half-domain exactly once; the
/// partition tests assert this for a range of grid shapes.
pub fn displacement_table(
    grid: &ProcessGrid,
    half_nx: usize,
    half_n2: usize,
) -> Vec<Vec<(usize, usize)>> {
    (0..grid.total())
        .map(|rank| rank_displacements(grid, half_nx, half_n2, rank))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_list_pairs_complements() {
        // half = 8, two ranks: each rank owns stride-2 indices plus their
        // complements.
        assert_eq!(axis_index_list(8, 2, 0), vec![0, 7, 4, 3]);
        assert_eq!(axis_index_list(8, 2, 1), vec![1, 6, 5, 2]);
    }

    #[test]
    fn test_axis_list_one_index_per_rank() {
        assert_eq!(axis_index_list(4, 4, 2), vec![2]);
    }

    #[test]
    fn test_axis_list_single_rank() {
        assert_eq!(axis_index_list(4, 1, 0), vec![0, 3, 2, 1]);
    }

    #[test]
    fn test_coords_convention() {
        let pg = ProcessGrid::new(8, 4, 16, 16).unwrap();
        assert_eq!(pg.py(), 2);
        assert_eq!(pg.coords(0), (0, 0));
        assert_eq!(pg.coords(1), (0, 1));
        assert_eq!(pg.coords(5), (2, 1));
    }

    #[test]
    fn test_rank_list_is_row_major_product() {
        let pg = ProcessGrid::new(4, 2, 4, 4).unwrap();
        // rank 0 -> (rx, ry) = (0, 0); xs = [0, 3], ys = [0, 3]
        assert_eq!(
            rank_displacements(&pg, 4, 4, 0),
            vec![(0, 0), (0, 3), (3, 0), (3, 3)]
        );
    }

    #[test]
    fn test_equal_list_lengths() {
        let pg = ProcessGrid::new(8, 4, 16, 8).unwrap();
        let table = displacement_table(&pg, 16, 8);
        assert!(table.iter().all(|l| l.len() == 16 * 8 / 8));
    }

    #[test]
    fn test_rejects_zero_px() {
        assert!(matches!(
            ProcessGrid::new(4, 0, 16, 16),
            Err(DecompositionError::ZeroRanksInX)
        ));
    }

    #[test]
    fn test_rejects_px_above_total() {
        assert!(matches!(
            ProcessGrid::new(2, 4, 16, 16),
            Err(DecompositionError::TooManyRanksInX { .. })
        ));
    }

    #[test]
    fn test_rejects_uneven_grid() {
        assert!(matches!(
            ProcessGrid::new(6, 4, 16, 16),
            Err(DecompositionError::UnevenGrid { .. })
        ));
    }

    #[test]
    fn test_rejects_non_power_of_two_quotient() {
        // 24 / 4 = 6: divisible but not a power of two.
        assert!(matches!(
            ProcessGrid::new(4, 4, 24, 16),
            Err(DecompositionError::BadAxisSplit { .. })
        ));
    }

    #[test]
    fn test_rejects_procs_above_half_extent() {
        assert!(ProcessGrid::new(16, 16, 8, 16).is_err());
    }
}
