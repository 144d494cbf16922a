//! Audit snapshot composer — one immutable record per completed task
//! run, combining the domain gate, the significance gate, and the
//! task's physics baseline under a conjunctive final verdict.
//!
//! The final verdict is VALID only when both gates pass; neither gate
//! can compensate for the other.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::basis::{PhysicsBaseline, basis_vector_with, physics_baseline};
use crate::classify::Domain;
use crate::interpret::NegativeControlResult;
use crate::meta::MetaFeatures;
use crate::session::format_iso8601;
use crate::stats::{SignificanceConfig, StatVerdict, significance_gate_with};
use crate::task::TaskKind;
use crate::training::TrainingLog;
use crate::verify::{DomainVerdict, verify_batch};

/// Reference accuracy of the classical baseline model shown beside
/// audits.
pub const BASELINE_ACC: f64 = 0.82;

/// Conjunctive audit outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinalVerdict {
    #[serde(rename = "VALID")]
    Valid,
    #[serde(rename = "INVALID")]
    Invalid,
}

impl fmt::Display for FinalVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FinalVerdict::Valid => "VALID",
            FinalVerdict::Invalid => "INVALID",
        })
    }
}

/// Composition parameters for snapshot generation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AuditConfig {
    pub significance: SignificanceConfig,
}

/// One immutable audit record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditSnapshot {
    pub task_idx: usize,
    pub label: String,
    pub domain_verdict: DomainVerdict,
    pub domain_reasons: Vec<String>,
    pub stat_verdict: StatVerdict,
    pub final_verdict: FinalVerdict,
    /// Mean accuracy under shuffled labels; duplicates the null mean for
    /// the dashboard's headline row.
    pub shuffle_label_acc: f64,
    pub null_distribution: Vec<f64>,
    pub null_mean: f64,
    pub null_std: f64,
    pub p_value: f64,
    /// Final logged accuracy, or 0 when the run produced no epochs.
    pub final_acc: f64,
    pub baseline_acc: f64,
    pub negative_control: NegativeControlResult,
    /// ISO-8601 UTC composition time.
    pub timestamp: String,
    pub quantum_signature: bool,
    pub hilbert_dim_match: bool,
    pub normalization_check: bool,
    /// Physics baseline of the task's ideal basis state.
    pub physics: PhysicsBaseline,
    pub predicted_domain: Domain,
    pub domain_confidence: f64,
    /// The metadata the gate actually saw (the ideal sample when none
    /// was supplied).
    pub meta_features: MetaFeatures,
}

/// Compose a snapshot with default config and ambient randomness.
pub fn compose_snapshot(
    task: TaskKind,
    logs: &[TrainingLog],
    meta: Option<&MetaFeatures>,
) -> AuditSnapshot {
    compose_snapshot_with(&AuditConfig::default(), task, logs, meta, &mut rand::rng())
}

/// Compose a snapshot: run the domain gate on `meta`, the significance
/// gate on the final logged accuracy, take the physics baseline of the
/// task's ideal state, and combine the gate verdicts conjunctively.
///
/// An empty `logs` slice audits as observed accuracy 0 and fails the
/// significance gate; it never panics.
pub fn compose_snapshot_with<R: Rng + ?Sized>(
    config: &AuditConfig,
    task: TaskKind,
    logs: &[TrainingLog],
    meta: Option<&MetaFeatures>,
    rng: &mut R,
) -> AuditSnapshot {
    let observed_acc = logs.last().map(|l| l.acc).unwrap_or(0.0);
    let domain = verify_batch(task, meta);

    let ideal = basis_vector_with(task.family(), rng);
    let physics = physics_baseline(&ideal);

    let stat = significance_gate_with(&config.significance, observed_acc, rng);

    let final_verdict =
        if domain.verdict == DomainVerdict::Valid && stat.verdict == StatVerdict::Valid {
            FinalVerdict::Valid
        } else {
            FinalVerdict::Invalid
        };
    log::info!(
        "audit: task {} ({}) -> {} / {} / {}",
        task.index(),
        task.short_name(),
        domain.verdict,
        stat.verdict,
        final_verdict
    );

    let meta_features = meta.cloned().unwrap_or_else(MetaFeatures::ideal_quantum);

    AuditSnapshot {
        task_idx: task.index(),
        label: task.label().to_string(),
        domain_verdict: domain.verdict,
        domain_reasons: domain.reasons,
        stat_verdict: stat.verdict,
        final_verdict,
        shuffle_label_acc: stat.null_mean,
        null_distribution: stat.null_distribution,
        null_mean: stat.null_mean,
        null_std: stat.null_std,
        p_value: stat.p_value,
        final_acc: observed_acc,
        baseline_acc: BASELINE_ACC,
        negative_control: NegativeControlResult::baseline(),
        timestamp: now_iso8601(),
        quantum_signature: domain.quantum_signature,
        hilbert_dim_match: domain.hilbert_dim_match,
        normalization_check: domain.normalization_check,
        physics,
        predicted_domain: domain.predicted_domain,
        domain_confidence: domain.domain_confidence,
        meta_features,
    }
}

fn now_iso8601() -> String {
    let since_epoch = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format_iso8601(since_epoch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn log_with_acc(acc: f64) -> TrainingLog {
        TrainingLog {
            epoch: 20,
            loss: 0.1,
            acc,
            precision: acc,
            recall: acc,
            f1: acc,
            coercivities: vec![0.2; 5],
            validity_score: 0.5 + acc * 0.4,
            confusion: crate::training::Confusion { tp: 49, fp: 1 },
        }
    }

    fn adversarial_meta() -> MetaFeatures {
        MetaFeatures {
            ndim: 2,
            size: 10,
            max_val: 5000.0,
            is_complex: false,
            norm: 1.0,
            entropy: 4.0,
            semantic_score: 0.9,
            variance: 900.0,
        }
    }

    fn compose(acc: f64, meta: Option<&MetaFeatures>, seed: u64) -> AuditSnapshot {
        compose_snapshot_with(
            &AuditConfig::default(),
            TaskKind::GhzVsNonGhz,
            &[log_with_acc(acc)],
            meta,
            &mut StdRng::seed_from_u64(seed),
        )
    }

    #[test]
    fn test_final_verdict_is_conjunctive() {
        let adversarial = adversarial_meta();

        // Both gates pass.
        let s = compose(0.99, None, 1);
        assert_eq!(s.domain_verdict, DomainVerdict::Valid);
        assert_eq!(s.stat_verdict, StatVerdict::Valid);
        assert_eq!(s.final_verdict, FinalVerdict::Valid);

        // Stat gate fails on chance-level accuracy.
        let s = compose(0.40, None, 1);
        assert_eq!(s.domain_verdict, DomainVerdict::Valid);
        assert_eq!(s.stat_verdict, StatVerdict::Invalid);
        assert_eq!(s.final_verdict, FinalVerdict::Invalid);

        // Domain gate fails on adversarial metadata.
        let s = compose(0.99, Some(&adversarial), 1);
        assert_eq!(s.domain_verdict, DomainVerdict::Invalid);
        assert_eq!(s.stat_verdict, StatVerdict::Valid);
        assert_eq!(s.final_verdict, FinalVerdict::Invalid);

        // Both fail.
        let s = compose(0.40, Some(&adversarial), 1);
        assert_eq!(s.final_verdict, FinalVerdict::Invalid);
    }

    #[test]
    fn test_empty_logs_audit_as_zero_accuracy() {
        let s = compose_snapshot_with(
            &AuditConfig::default(),
            TaskKind::WVsNonW,
            &[],
            None,
            &mut StdRng::seed_from_u64(2),
        );
        assert_eq!(s.final_acc, 0.0);
        assert_eq!(s.stat_verdict, StatVerdict::Invalid);
        assert_eq!(s.final_verdict, FinalVerdict::Invalid);
    }

    #[test]
    fn test_snapshot_carries_task_and_physics() {
        let s = compose(0.95, None, 3);
        assert_eq!(s.task_idx, 0);
        assert_eq!(s.label, "GHZ vs non-GHZ");
        assert!((s.physics.entropy - 1.0).abs() < 1e-9);
        assert!(s.physics.is_pure);
        assert_eq!(s.baseline_acc, BASELINE_ACC);
        assert_eq!(s.shuffle_label_acc, s.null_mean);
        assert_eq!(s.null_distribution.len(), 100);
        assert!(s.timestamp.starts_with("20"));
        assert!(s.timestamp.ends_with('Z'));
    }

    #[test]
    fn test_meta_defaults_to_ideal_sample() {
        let s = compose(0.95, None, 4);
        assert_eq!(s.meta_features, MetaFeatures::ideal_quantum());

        let adversarial = adversarial_meta();
        let s = compose(0.95, Some(&adversarial), 4);
        assert_eq!(s.meta_features, adversarial);
    }

    #[test]
    fn test_snapshot_wire_format() {
        let s = compose(0.99, None, 5);
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains("\"domain_verdict\":\"VALID_DOMAIN\""));
        assert!(json.contains("\"stat_verdict\":\"VALID_STAT\""));
        assert!(json.contains("\"final_verdict\":\"VALID\""));
        assert!(json.contains("\"predicted_domain\":\"Quantum Metadata\""));
        let back: AuditSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.final_verdict, s.final_verdict);
        assert_eq!(back.p_value, s.p_value);
    }
}
