//! Exhaustiveness and disjointness of the displacement partition.

use sfgrid::partition::{axis_index_list, displacement_table, ProcessGrid};

/// Aggregating every rank's list must reproduce the half-domain exactly:
/// equal as a set and as a multiset (no duplicates, no holes).
#[test]
fn test_partition_covers_half_domain_exactly() {
    for &(nx, ny, px, total) in &[(8usize, 8usize, 2usize, 4usize), (32, 16, 4, 8), (64, 64, 8, 16)]
    {
        let (hx, hy) = (nx / 2, ny / 2);
        let pgrid = ProcessGrid::new(total, px, hx, hy).unwrap();
        let table = displacement_table(&pgrid, hx, hy);

        let mut all: Vec<(usize, usize)> = table.iter().flatten().copied().collect();
        assert_eq!(
            all.len(),
            hx * hy,
            "Nx={} Ny={} px={} P={}: wrong multiset size",
            nx,
            ny,
            px,
            total
        );
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), hx * hy, "duplicate displacements emitted");

        let expected: Vec<(usize, usize)> = (0..hx)
            .flat_map(|x| (0..hy).map(move |y| (x, y)))
            .collect();
        assert_eq!(all, expected, "partition misses part of the half-domain");
    }
}

/// All ranks issue the same number of iterations; the lock-step schedule
/// depends on it.
#[test]
fn test_all_rank_lists_have_equal_length() {
    let pgrid = ProcessGrid::new(8, 4, 16, 8).unwrap();
    let table = displacement_table(&pgrid, 16, 8);
    let len = 16 * 8 / 8;
    assert!(table.iter().all(|list| list.len() == len));
}

/// The complement pairing keeps per-rank work roughly equal: each pair
/// (i, H-1-i) sums to H-1 along both axes, so the per-rank totals of
/// (H - x) coincide exactly across ranks.
#[test]
fn test_axis_work_is_balanced_across_ranks() {
    let (half, procs) = (32usize, 4usize);
    let work: Vec<usize> = (0..procs)
        .map(|coord| {
            axis_index_list(half, procs, coord)
                .iter()
                .map(|&i| half - i)
                .sum()
        })
        .collect();
    assert!(work.windows(2).all(|w| w[0] == w[1]), "work {:?}", work);
}

/// Degenerate split: as many ranks as indices, one displacement each.
#[test]
fn test_one_index_per_rank_split() {
    let pgrid = ProcessGrid::new(16, 4, 4, 4).unwrap();
    let table = displacement_table(&pgrid, 4, 4);
    assert!(table.iter().all(|list| list.len() == 1));

    let mut all: Vec<(usize, usize)> = table.iter().flatten().copied().collect();
    all.sort_unstable();
    all.dedup();
    assert_eq!(all.len(), 16);
}
