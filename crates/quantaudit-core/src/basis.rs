//! Basis vector library — canonical 6-qubit state families over a
//! 64-dimensional real amplitude space, plus closed-form physics
//! baselines (purity, amplitude-distribution entropy, entanglement
//! indicator).
//!
//! Every family except `Random` is deterministic: calling
//! [`basis_vector`] twice yields identical vectors. All generated
//! vectors are unit-norm.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Hilbert space dimension: 2^6 basis states for 6 qubits.
pub const DIM: usize = 64;

/// Canonical state families the classifier tasks discriminate between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateFamily {
    /// (|000000> + |111111>) / sqrt(2).
    Ghz,
    /// Equal superposition of the six single-excitation states.
    W,
    /// Equal superposition of all 15 two-excitation states.
    Dicke2,
    /// Linear cluster state: full support with nearest-neighbour CZ phases.
    Cluster,
    /// Normalized uniform noise, a fresh draw per call.
    Random,
}

impl StateFamily {
    /// All families in task-index order.
    pub fn all() -> [StateFamily; 5] {
        [
            StateFamily::Ghz,
            StateFamily::W,
            StateFamily::Dicke2,
            StateFamily::Cluster,
            StateFamily::Random,
        ]
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            StateFamily::Ghz => "GHZ",
            StateFamily::W => "W",
            StateFamily::Dicke2 => "Dicke2",
            StateFamily::Cluster => "Cluster",
            StateFamily::Random => "Random",
        }
    }
}

impl std::fmt::Display for StateFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Closed-form physics summary of an amplitude vector.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PhysicsBaseline {
    /// Squared norm, clamped to 1. Exactly 1 for a pure normalized state.
    pub purity: f64,
    /// Shannon entropy of the amplitude-squared distribution, in bits.
    pub entropy: f64,
    /// Entropy scaled by the 6-qubit maximum, clamped to [0, 1].
    pub entanglement_indicator: f64,
    /// Whether purity sits within 1e-4 of 1.
    pub is_pure: bool,
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Generate the canonical amplitude vector for a family.
///
/// `Random` draws from the ambient thread RNG; use [`basis_vector_with`]
/// when reproducibility matters.
pub fn basis_vector(family: StateFamily) -> Vec<f64> {
    basis_vector_with(family, &mut rand::rng())
}

/// Generate a family's amplitude vector using the caller's RNG.
pub fn basis_vector_with<R: Rng + ?Sized>(family: StateFamily, rng: &mut R) -> Vec<f64> {
    match family {
        StateFamily::Ghz => ghz(),
        StateFamily::W => w(),
        StateFamily::Dicke2 => dicke2(),
        StateFamily::Cluster => cluster(),
        StateFamily::Random => random_state(rng),
    }
}

fn ghz() -> Vec<f64> {
    let mut v = vec![0.0; DIM];
    let amp = 1.0 / 2.0_f64.sqrt();
    v[0] = amp;
    v[DIM - 1] = amp;
    v
}

fn w() -> Vec<f64> {
    let mut v = vec![0.0; DIM];
    let amp = 1.0 / 6.0_f64.sqrt();
    for bit in 0..6 {
        v[1 << bit] = amp;
    }
    v
}

fn dicke2() -> Vec<f64> {
    let mut v = vec![0.0; DIM];
    let support: Vec<usize> = (0..DIM).filter(|i| i.count_ones() == 2).collect();
    let amp = 1.0 / (support.len() as f64).sqrt();
    for i in support {
        v[i] = amp;
    }
    v
}

fn cluster() -> Vec<f64> {
    let amp = 1.0 / (DIM as f64).sqrt();
    (0..DIM)
        .map(|i| {
            // CZ on each adjacent qubit pair flips the sign once per
            // pair where both bits are set.
            let mut phase = 1.0;
            for bit in 0..5 {
                if (i >> bit) & 1 == 1 && (i >> (bit + 1)) & 1 == 1 {
                    phase = -phase;
                }
            }
            amp * phase
        })
        .collect()
}

fn random_state<R: Rng + ?Sized>(rng: &mut R) -> Vec<f64> {
    let mut v: Vec<f64> = (0..DIM).map(|_| rng.random::<f64>() - 0.5).collect();
    let norm = v.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
    v
}

// ---------------------------------------------------------------------------
// Physics baseline
// ---------------------------------------------------------------------------

/// Compute the physics summary of an amplitude vector.
///
/// Zero amplitudes are skipped in the entropy sum, so the zero vector
/// reports entropy 0 rather than NaN.
pub fn physics_baseline(v: &[f64]) -> PhysicsBaseline {
    let norm_sq: f64 = v.iter().map(|x| x * x).sum();
    let purity = norm_sq.min(1.0);
    let entropy: f64 = -v
        .iter()
        .map(|x| x * x)
        .filter(|p| *p > 0.0)
        .map(|p| p * p.log2())
        .sum::<f64>();
    PhysicsBaseline {
        purity,
        entropy,
        entanglement_indicator: (entropy / 6.0).min(1.0),
        is_pure: (purity - 1.0).abs() < 1e-4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn norm_sq(v: &[f64]) -> f64 {
        v.iter().map(|x| x * x).sum()
    }

    #[test]
    fn test_deterministic_families_repeat_exactly() {
        for family in [
            StateFamily::Ghz,
            StateFamily::W,
            StateFamily::Dicke2,
            StateFamily::Cluster,
        ] {
            let a = basis_vector(family);
            let b = basis_vector(family);
            assert_eq!(a, b, "{family} should be deterministic");
        }
    }

    #[test]
    fn test_all_families_unit_norm() {
        for family in StateFamily::all() {
            let v = basis_vector(family);
            assert_eq!(v.len(), DIM);
            assert!(
                (norm_sq(&v) - 1.0).abs() < 1e-6,
                "{family} norm^2 = {}",
                norm_sq(&v)
            );
        }
    }

    #[test]
    fn test_ghz_support() {
        let v = basis_vector(StateFamily::Ghz);
        let amp = 1.0 / 2.0_f64.sqrt();
        assert!((v[0] - amp).abs() < 1e-12);
        assert!((v[63] - amp).abs() < 1e-12);
        assert!(v[1..63].iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_w_support_is_single_excitation() {
        let v = basis_vector(StateFamily::W);
        for (i, x) in v.iter().enumerate() {
            if i.count_ones() == 1 {
                assert!((x - 1.0 / 6.0_f64.sqrt()).abs() < 1e-12);
            } else {
                assert_eq!(*x, 0.0);
            }
        }
    }

    #[test]
    fn test_dicke2_support_is_two_excitation() {
        let v = basis_vector(StateFamily::Dicke2);
        let support: Vec<usize> = (0..DIM).filter(|i| v[*i] != 0.0).collect();
        assert_eq!(support.len(), 15);
        assert!(support.iter().all(|i| i.count_ones() == 2));
    }

    #[test]
    fn test_cluster_phases() {
        let v = basis_vector(StateFamily::Cluster);
        let amp = 1.0 / 8.0;
        // Index 3 has one adjacent 11 pair: negative phase.
        assert!((v[3] + amp).abs() < 1e-12);
        // Index 7 has two adjacent 11 pairs: phase flips back to positive.
        assert!((v[7] - amp).abs() < 1e-12);
        // Full support, uniform magnitude.
        assert!(v.iter().all(|x| (x.abs() - amp).abs() < 1e-12));
    }

    #[test]
    fn test_random_is_seeded_reproducible() {
        let mut rng_a = StdRng::seed_from_u64(7);
        let mut rng_b = StdRng::seed_from_u64(7);
        let a = basis_vector_with(StateFamily::Random, &mut rng_a);
        let b = basis_vector_with(StateFamily::Random, &mut rng_b);
        assert_eq!(a, b);
        assert!((norm_sq(&a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_random_varies_across_draws() {
        let mut rng = StdRng::seed_from_u64(7);
        let a = basis_vector_with(StateFamily::Random, &mut rng);
        let b = basis_vector_with(StateFamily::Random, &mut rng);
        assert_ne!(a, b);
    }

    #[test]
    fn test_physics_ghz() {
        let p = physics_baseline(&basis_vector(StateFamily::Ghz));
        assert!(p.is_pure);
        assert!((p.entropy - 1.0).abs() < 1e-9);
        assert!((p.entanglement_indicator - 1.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_physics_entropies() {
        let w = physics_baseline(&basis_vector(StateFamily::W));
        assert!((w.entropy - 6.0_f64.log2()).abs() < 1e-9);

        let dicke = physics_baseline(&basis_vector(StateFamily::Dicke2));
        assert!((dicke.entropy - 15.0_f64.log2()).abs() < 1e-9);

        let cluster = physics_baseline(&basis_vector(StateFamily::Cluster));
        assert!((cluster.entropy - 6.0).abs() < 1e-9);
        assert!((cluster.entanglement_indicator - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_physics_zero_vector() {
        let p = physics_baseline(&vec![0.0; DIM]);
        assert_eq!(p.purity, 0.0);
        assert_eq!(p.entropy, 0.0);
        assert!(!p.is_pure);
    }

    #[test]
    fn test_physics_clamps_oversized_norm() {
        let v = vec![1.0; 4];
        let p = physics_baseline(&v);
        assert_eq!(p.purity, 1.0);
    }
}
