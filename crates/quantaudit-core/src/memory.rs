//! Associative memory matrix — the dashboard's magnetic-memory model.
//!
//! A 50x640 matrix split into five 128-column domain slices, one per
//! task. Training imprints the task's ideal state amplitudes into its
//! slice; everything outside the slice is untouched. The matrix is
//! cosmetic (it drives the dashboard heat map), so values are plain f64
//! with no normalization guarantees.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::basis::{DIM, basis_vector_with};
use crate::task::TaskKind;

/// Rows in the memory matrix.
pub const MEMORY_ROWS: usize = 50;
/// Total columns across all domain slices.
pub const MEMORY_COLS: usize = 640;

/// Starting coercivity per task domain.
pub const INITIAL_COERCIVITIES: [f64; 5] = [0.15, 0.22, 0.18, 0.30, 0.25];

/// Column range owned by one task domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainSlice {
    pub start: usize,
    pub end: usize,
}

/// The five 128-column domain slices, in task-index order.
pub const DOMAIN_SLICES: [DomainSlice; 5] = [
    DomainSlice { start: 0, end: 128 },
    DomainSlice { start: 128, end: 256 },
    DomainSlice { start: 256, end: 384 },
    DomainSlice { start: 384, end: 512 },
    DomainSlice { start: 512, end: 640 },
];

/// Memory matrix plus per-domain coercivities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryState {
    /// Row-major matrix, `MEMORY_ROWS` x `MEMORY_COLS`.
    pub matrix: Vec<Vec<f64>>,
    pub slices: Vec<DomainSlice>,
    pub coercivities: Vec<f64>,
}

impl MemoryState {
    /// Fresh matrix filled with low-amplitude background noise in
    /// [-0.05, 0.05).
    pub fn initial<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let matrix = (0..MEMORY_ROWS)
            .map(|_| {
                (0..MEMORY_COLS)
                    .map(|_| rng.random::<f64>() * 0.1 - 0.05)
                    .collect()
            })
            .collect();
        Self {
            matrix,
            slices: DOMAIN_SLICES.to_vec(),
            coercivities: INITIAL_COERCIVITIES.to_vec(),
        }
    }

    /// Imprint the task's ideal state into every row of its domain
    /// slice. The 64 amplitudes tile the 128 columns twice; each cell
    /// gains `amplitude * 0.15` plus per-cell noise in [0, 0.05).
    pub fn imprint<R: Rng + ?Sized>(&mut self, task: TaskKind, rng: &mut R) {
        let slice = DOMAIN_SLICES[task.index()];
        let ideal = basis_vector_with(task.family(), rng);
        for row in self.matrix.iter_mut() {
            for col in slice.start..slice.end {
                let amp = ideal[(col - slice.start) % DIM];
                row[col] += amp * 0.15 + rng.random::<f64>() * 0.05;
            }
        }
    }
}
