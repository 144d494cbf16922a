//! Interpretability collaborators — feature importance, per-domain
//! attribution, ablation, and the negative-control record attached to
//! every audit snapshot.
//!
//! These reproduce the dashboard's inspector panels. Importance and
//! attribution are stochastic around fixed anchors; the ablation table
//! and the negative-control baseline are fully deterministic.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::snapshot::FinalVerdict;
use crate::task::TaskKind;

/// Input features scored by the saliency panel.
pub const FEATURE_COUNT: usize = 40;

/// Importance score for one input feature.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature_idx: usize,
    pub score: f64,
}

/// Saliency scores for the input features, sorted descending.
///
/// The first eight features carry the class signal (anchor 0.8); the
/// rest sit near 0.2, with jitter in [0, 0.1) on top of both.
pub fn feature_importance<R: Rng + ?Sized>(rng: &mut R) -> Vec<FeatureImportance> {
    let mut scores: Vec<FeatureImportance> = (0..FEATURE_COUNT)
        .map(|i| FeatureImportance {
            feature_idx: i,
            score: if i < 8 { 0.8 } else { 0.2 } + rng.random::<f64>() * 0.1,
        })
        .collect();
    scores.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scores
}

/// Per-domain contribution weights; the trained task's domain dominates.
pub fn domain_attribution<R: Rng + ?Sized>(task: TaskKind, rng: &mut R) -> Vec<f64> {
    (0..5)
        .map(|i| if i == task.index() { 0.9 } else { 0.1 } + rng.random::<f64>() * 0.05)
        .collect()
}

/// Accuracy and F1 drop when one domain slice is ablated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AblationResult {
    pub domain_idx: usize,
    pub acc_drop: f64,
    pub f1_drop: f64,
}

/// Deterministic ablation table: only the trained domain matters.
pub fn ablation_study(task: TaskKind) -> Vec<AblationResult> {
    (0..5)
        .map(|d| AblationResult {
            domain_idx: d,
            acc_drop: if d == task.index() { 0.4 } else { 0.02 },
            f1_drop: if d == task.index() { 0.45 } else { 0.03 },
        })
        .collect()
}

/// One epoch of a shuffled-label control run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NegativeControlEpoch {
    pub epoch: usize,
    pub acc: f64,
    pub verdict: FinalVerdict,
}

/// Shuffled-label control summary attached to each snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NegativeControlResult {
    pub accuracy: f64,
    pub f1: f64,
    /// True would mean the pipeline learned from shuffled labels, i.e. a
    /// label leak.
    pub is_leaky: bool,
    pub ablation_noise_impact: f64,
    pub null_mean: f64,
    pub null_std: f64,
    pub timeline: Vec<NegativeControlEpoch>,
}

impl NegativeControlResult {
    /// Chance-level control: the classifier learns nothing from shuffled
    /// labels.
    pub fn baseline() -> Self {
        Self {
            accuracy: 0.5,
            f1: 0.49,
            is_leaky: false,
            ablation_noise_impact: 0.01,
            null_mean: 0.5,
            null_std: 0.03,
            timeline: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_importance_sorted_with_signal_on_top() {
        let mut rng = StdRng::seed_from_u64(4);
        let scores = feature_importance(&mut rng);
        assert_eq!(scores.len(), FEATURE_COUNT);
        for pair in scores.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        // Signal features (anchor 0.8) dominate the top eight slots.
        assert!(scores[..8].iter().all(|f| f.feature_idx < 8));
        assert!(scores[8..].iter().all(|f| f.score < 0.35));
    }

    #[test]
    fn test_attribution_favors_the_trained_domain() {
        let mut rng = StdRng::seed_from_u64(5);
        let task = TaskKind::Dicke2VsNonDicke2;
        let attribution = domain_attribution(task, &mut rng);
        assert_eq!(attribution.len(), 5);
        for (i, weight) in attribution.iter().enumerate() {
            if i == task.index() {
                assert!(*weight >= 0.9);
            } else {
                assert!(*weight < 0.2);
            }
        }
    }

    #[test]
    fn test_ablation_is_deterministic() {
        let task = TaskKind::WVsNonW;
        let a = ablation_study(task);
        let b = ablation_study(task);
        assert_eq!(a.len(), 5);
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.acc_drop, y.acc_drop);
        }
        assert_eq!(a[task.index()].acc_drop, 0.4);
        assert_eq!(a[task.index()].f1_drop, 0.45);
        assert_eq!(a[0].acc_drop, 0.02);
        assert_eq!(a[0].f1_drop, 0.03);
    }

    #[test]
    fn test_negative_control_baseline() {
        let control = NegativeControlResult::baseline();
        assert_eq!(control.accuracy, 0.5);
        assert_eq!(control.f1, 0.49);
        assert!(!control.is_leaky);
        assert_eq!(control.ablation_noise_impact, 0.01);
        assert_eq!(control.null_mean, 0.5);
        assert_eq!(control.null_std, 0.03);
        assert!(control.timeline.is_empty());
    }
}
