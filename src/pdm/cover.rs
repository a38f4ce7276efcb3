//! pdm::cover — phase-bin edges for one cover and bin assignment.
//!
//! Purpose
//! -------
//! Build the bin edges of a single cover (an offset binning pass) and map
//! folded phases onto bin indices. Multiple covers stagger the edges by
//! `c / (n_covers · n_bins)` so that features straddling a bin boundary in
//! one cover fall inside a bin in another.
//!
//! Key behaviors
//! -------------
//! - [`CoverEdges::new`] builds `n_bins + 1` edges `i / n_bins + offset`.
//! - The wraparound cover (`cover_index == n_covers − 1` with a nonzero
//!   offset) reduces every edge modulo 1, sorts ascending, and overwrites the
//!   maximum edge with exactly `1.0`.
//! - [`CoverEdges::bin_of`] performs right-open binning: the bin index is the
//!   position of the first edge strictly greater than the phase, minus one.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every phase in `[0, 1)` is assigned a bin in `[0, n_bins)`; no phase is
//!   ever dropped.
//! - On a non-wraparound shifted cover the edges span `[offset, 1 + offset)`;
//!   a phase below `edges[0]` is evaluated as `phase + 1`, its cyclic
//!   equivalent, which places it in the last bin.
//! - On the wraparound cover, phases below `edges[0]` are clamped into bin 0
//!   and phases at or above the final edge are clamped into bin
//!   `n_bins − 1`.
//!
//! Conventions
//! -----------
//! - Reduced edges within [`EDGE_WRAP_TOL`] of 0 or 1 snap to 0, and sorted
//!   edges within the same tolerance of their predecessor are merged onto it,
//!   so roundoff near the 0/1 seam never creates sliver bins.
//! - With a single cover the only cover has zero offset, its edges already
//!   span `[0, 1]`, and no wrap repair is applied.
//!
//! Testing notes
//! -------------
//! - Unit tests check edge construction for regular and wraparound covers
//!   and hand-computed assignments. Property tests in
//!   `tests/pdm_properties.rs` check that the wraparound cover's maximum edge
//!   is exactly 1.0 and that random phases always receive a valid bin.
use crate::pdm::{
    errors::{PDMError, PDMResult},
    validation::validate_binning,
};

/// Tolerance used when reducing wrapped edges near the 0/1 seam.
pub const EDGE_WRAP_TOL: f64 = 1e-12;

/// CoverEdges — bin edges for one cover of the phase interval.
///
/// Fields
/// ------
/// - `edges`: `Vec<f64>`
///   `n_bins + 1` non-decreasing edges.
/// - `wraps`: `bool`
///   Whether the wraparound repair was applied.
///
/// Invariants
/// ----------
/// - `edges.len() == n_bins + 1`.
/// - When `wraps`, the final edge is exactly `1.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverEdges {
    edges: Vec<f64>,
    wraps: bool,
}

impl CoverEdges {
    /// Build the edges of cover `cover_index` out of `n_covers`.
    ///
    /// Errors
    /// ------
    /// - `PDMError::InvalidBinning` if `n_bins == 0`, `n_covers == 0`, or
    ///   `cover_index >= n_covers`.
    pub fn new(n_bins: usize, cover_index: usize, n_covers: usize) -> PDMResult<Self> {
        validate_binning(n_bins, n_covers)?;
        if cover_index >= n_covers {
            return Err(PDMError::InvalidBinning {
                n_bins,
                n_covers,
                reason: "cover index must be < n_covers",
            });
        }

        let offset = cover_index as f64 / (n_covers * n_bins) as f64;
        let mut edges: Vec<f64> =
            (0..=n_bins).map(|i| i as f64 / n_bins as f64 + offset).collect();

        let wraps = cover_index == n_covers - 1 && offset > 0.0;
        if wraps {
            wrap_edges(&mut edges);
        }
        Ok(CoverEdges { edges, wraps })
    }

    pub fn n_bins(&self) -> usize {
        self.edges.len() - 1
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn is_wraparound(&self) -> bool {
        self.wraps
    }

    /// Right-open bin index of a phase in `[0, 1)`.
    #[inline]
    pub fn bin_of(&self, phase: f64) -> usize {
        let edges = &self.edges;
        let last_bin = edges.len() - 2;
        let phase = if !self.wraps && phase < edges[0] { phase + 1.0 } else { phase };

        let first_greater = edges.partition_point(|&e| e <= phase);
        if first_greater == 0 { 0 } else { (first_greater - 1).min(last_bin) }
    }

    /// Assign every phase to a bin, replacing the buffer contents.
    pub fn assign_into(&self, phases: &[f64], bins: &mut Vec<usize>) {
        bins.clear();
        bins.extend(phases.iter().map(|&p| self.bin_of(p)));
    }
}

/// Assign phases to bins for cover `cover_index` out of `n_covers`.
///
/// Errors
/// ------
/// - `PDMError::InvalidBinning` as for [`CoverEdges::new`].
///
/// Examples
/// --------
/// ```rust
/// # use rust_phasedm::pdm::cover::assign;
/// let bins = assign(&[0.0, 0.3, 0.99], 4, 0, 2).unwrap();
/// assert_eq!(bins, vec![0, 1, 3]);
/// ```
pub fn assign(
    phases: &[f64], n_bins: usize, cover_index: usize, n_covers: usize,
) -> PDMResult<Vec<usize>> {
    let cover = CoverEdges::new(n_bins, cover_index, n_covers)?;
    let mut bins = Vec::with_capacity(phases.len());
    cover.assign_into(phases, &mut bins);
    Ok(bins)
}

fn wrap_edges(edges: &mut [f64]) {
    for e in edges.iter_mut() {
        let r = e.rem_euclid(1.0);
        *e = if r < EDGE_WRAP_TOL || 1.0 - r < EDGE_WRAP_TOL { 0.0 } else { r };
    }
    edges.sort_by(f64::total_cmp);
    for i in 1..edges.len() {
        if edges[i] - edges[i - 1] < EDGE_WRAP_TOL {
            edges[i] = edges[i - 1];
        }
    }
    if let Some(last) = edges.last_mut() {
        *last = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Edge construction for the unshifted, shifted, and wraparound covers.
    // - Right-open assignment at exact edges.
    // - Cyclic handling of phases below a shifted cover's first edge.
    // - Clamping on the wraparound cover.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify the unshifted first cover uses plain linspace(0, 1) edges.
    fn first_cover_edges_are_unshifted_linspace() {
        // Arrange / Act
        let cover = CoverEdges::new(4, 0, 2).expect("valid binning");

        // Assert
        assert_eq!(cover.edges(), &[0.0, 0.25, 0.5, 0.75, 1.0]);
        assert!(!cover.is_wraparound());
    }

    #[test]
    // Purpose
    // -------
    // Verify the wraparound cover's edges are reduced, sorted, and capped at
    // exactly 1.0.
    //
    // Given
    // -----
    // - n_bins = 4, n_covers = 2 ⇒ offset = 0.125.
    //   Shifted edges: [0.125, 0.375, 0.625, 0.875, 1.125].
    //
    // Expect
    // ------
    // - Reduced + sorted: [0.125, 0.125, 0.375, 0.625, 0.875] → last = 1.0.
    fn wraparound_cover_edges_reduce_sort_and_cap() {
        // Arrange / Act
        let cover = CoverEdges::new(4, 1, 2).expect("valid binning");

        // Assert
        assert!(cover.is_wraparound());
        assert_eq!(cover.edges(), &[0.125, 0.125, 0.375, 0.625, 1.0]);
        assert_eq!(*cover.edges().last().unwrap(), 1.0);
    }

    #[test]
    // Purpose
    // -------
    // Ensure a phase exactly on an interior edge goes to the bin on its
    // right (right-open intervals).
    fn phase_on_edge_maps_to_right_bin() {
        // Arrange
        let cover = CoverEdges::new(4, 0, 1).expect("valid binning");

        // Act / Assert
        assert_eq!(cover.bin_of(0.0), 0);
        assert_eq!(cover.bin_of(0.25), 1);
        assert_eq!(cover.bin_of(0.5), 2);
        assert_eq!(cover.bin_of(0.999_999), 3);
    }

    #[test]
    // Purpose
    // -------
    // Verify that on a shifted, non-wraparound cover a phase below the
    // first edge is treated as its cyclic equivalent and lands in the last
    // bin.
    //
    // Given
    // -----
    // - n_bins = 4, n_covers = 3, cover 1 ⇒ offset = 1/12, edges span
    //   [1/12, 13/12].
    //
    // Expect
    // ------
    // - phase 0.0 → bin 3; phase 0.1 → bin 0.
    fn shifted_cover_wraps_low_phases_into_last_bin() {
        // Arrange
        let cover = CoverEdges::new(4, 1, 3).expect("valid binning");

        // Act / Assert
        assert!(!cover.is_wraparound());
        assert_eq!(cover.bin_of(0.0), 3);
        assert_eq!(cover.bin_of(0.1), 0);
    }

    #[test]
    // Purpose
    // -------
    // Verify that the wraparound cover clamps phases below its first edge
    // into bin 0 and assigns the rest right-open.
    fn wraparound_cover_clamps_low_phases_into_first_bin() {
        // Arrange
        let phases = [0.0_f64, 0.1, 0.125, 0.4, 0.9, 0.999];

        // Act
        let bins = assign(&phases, 4, 1, 2).expect("valid binning");

        // Assert
        assert_eq!(bins, vec![0, 0, 1, 2, 3, 3]);
    }

    #[test]
    // Purpose
    // -------
    // Ensure a cover index outside `[0, n_covers)` is rejected.
    fn cover_index_out_of_range_is_invalid_binning() {
        // Arrange / Act
        let result = CoverEdges::new(10, 2, 2);

        // Assert
        assert!(matches!(result, Err(PDMError::InvalidBinning { .. })), "got {result:?}");
    }
}
