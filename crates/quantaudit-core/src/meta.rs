//! Metadata features — the coarse, file-derived description of an
//! uploaded dataset that the domain gate consumes.
//!
//! Feature extraction from raw bytes lives with the callers (the CLI
//! ships a CSV profiler); the core only ever sees this structured form.
//! When no dataset was supplied, callers pass `None` at the gate and the
//! canonical [`MetaFeatures::ideal_quantum`] sample stands in. The
//! substitution is always explicit at the call site, never hidden in a
//! default.

use serde::{Deserialize, Serialize};

/// Coarse features describing one uploaded dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaFeatures {
    /// Dimensionality of the declared sample layout.
    pub ndim: usize,
    /// Values per sample row, i.e. the claimed Hilbert dimension.
    pub size: usize,
    /// Largest absolute value seen in the data.
    pub max_val: f64,
    /// Whether the content carries complex-number markers.
    pub is_complex: bool,
    /// Declared L2 norm of the sample vectors.
    pub norm: f64,
    /// Entropy heuristic over the value distribution, in bits.
    pub entropy: f64,
    /// Keyword-derived semantic score in [0, 1].
    pub semantic_score: f64,
    /// Variance of the scanned values.
    pub variance: f64,
}

impl MetaFeatures {
    /// The canonical "well-formed quantum sample" used when no dataset
    /// accompanies an audit.
    pub fn ideal_quantum() -> Self {
        Self {
            ndim: 2,
            size: 64,
            max_val: 0.8,
            is_complex: true,
            norm: 1.0,
            entropy: 4.2,
            semantic_score: 1.0,
            variance: 0.2,
        }
    }
}
