//! Domain verification gate — wraps the classifier in a confidence
//! threshold plus structural checks and produces a binary verdict with
//! ordered, human-readable rejection reasons.
//!
//! Reason order is fixed: at most one semantic rejection (stuffing,
//! mismatch, or low confidence, in that precedence) followed by the
//! Hilbert-dimension rejection when it applies. The gate never fails;
//! every input gets a verdict.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::classify::{Domain, classify_domain};
use crate::meta::MetaFeatures;
use crate::task::TaskKind;

/// Minimum classifier confidence the gate accepts.
pub const CONFIDENCE_THRESHOLD: f64 = 0.8;

/// Binary domain plausibility verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DomainVerdict {
    #[serde(rename = "VALID_DOMAIN")]
    Valid,
    #[serde(rename = "INVALID_DOMAIN")]
    Invalid,
}

impl fmt::Display for DomainVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DomainVerdict::Valid => "VALID_DOMAIN",
            DomainVerdict::Invalid => "INVALID_DOMAIN",
        })
    }
}

/// Outcome of the domain gate for one dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainAudit {
    pub verdict: DomainVerdict,
    /// Rejection reasons in precedence order; empty when valid.
    pub reasons: Vec<String>,
    pub predicted_domain: Domain,
    pub domain_confidence: f64,
    /// Quantum-typed domain at or above the confidence threshold.
    pub quantum_signature: bool,
    /// Claimed sample width is exactly 64.
    pub hilbert_dim_match: bool,
    /// Declared norm within 5% of 1.
    pub normalization_check: bool,
}

/// Verify that a dataset plausibly belongs to the quantum domain.
///
/// `meta == None` means no dataset accompanies the audit; the canonical
/// [`MetaFeatures::ideal_quantum`] sample stands in and the gate passes.
pub fn verify_batch(task: TaskKind, meta: Option<&MetaFeatures>) -> DomainAudit {
    let ideal = MetaFeatures::ideal_quantum();
    let meta = meta.unwrap_or(&ideal);

    let prediction = classify_domain(meta);
    let is_quantum = prediction.domain.is_quantum();
    log::debug!(
        "domain gate: task {} ({}) classified as {} at {:.3}",
        task.index(),
        task.short_name(),
        prediction.domain,
        prediction.confidence
    );

    let mut reasons = Vec::new();
    if prediction.domain == Domain::AdversarialNoise {
        reasons.push(
            "REJECT: Adversarial Keyword Stuffing Detected. Dataset contains quantum \
             terminology but numerical distribution is non-physical noise."
                .to_string(),
        );
    } else if !is_quantum {
        reasons.push(format!(
            "REJECT: Semantic Mismatch. Data identified as [{}] with {:.1}% confidence.",
            prediction.domain,
            prediction.confidence * 100.0
        ));
    } else if prediction.confidence < CONFIDENCE_THRESHOLD {
        reasons.push(
            "REJECT: Low Domain Confidence. Semantic proof found but Numerical \
             Plausibility check failed (Values likely spoofed)."
                .to_string(),
        );
    }

    // Structural constraint, checked independently of the chain above.
    if prediction.domain == Domain::QuantumState && meta.size != 64 {
        reasons
            .push("REJECT: Hilbert Space dimension must be exactly 64 (2^6 qubits).".to_string());
    }

    let accepted = is_quantum
        && prediction.confidence >= CONFIDENCE_THRESHOLD
        && (prediction.domain != Domain::QuantumState || meta.size == 64);

    DomainAudit {
        verdict: if accepted {
            DomainVerdict::Valid
        } else {
            DomainVerdict::Invalid
        },
        reasons,
        predicted_domain: prediction.domain,
        domain_confidence: prediction.confidence,
        quantum_signature: is_quantum && prediction.confidence >= CONFIDENCE_THRESHOLD,
        hilbert_dim_match: meta.size == 64,
        normalization_check: (meta.norm - 1.0).abs() < 0.05,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TASK: TaskKind = TaskKind::GhzVsNonGhz;

    #[test]
    fn test_no_dataset_passes() {
        let audit = verify_batch(TASK, None);
        assert_eq!(audit.verdict, DomainVerdict::Valid);
        assert!(audit.reasons.is_empty());
        assert!(audit.quantum_signature);
        assert!(audit.hilbert_dim_match);
        assert!(audit.normalization_check);
        assert!(audit.predicted_domain.is_quantum());
        assert!(audit.domain_confidence >= 0.9);
    }

    #[test]
    fn test_explicit_ideal_matches_default() {
        let ideal = MetaFeatures::ideal_quantum();
        let explicit = verify_batch(TASK, Some(&ideal));
        let implicit = verify_batch(TASK, None);
        assert_eq!(explicit.verdict, implicit.verdict);
        assert_eq!(explicit.domain_confidence, implicit.domain_confidence);
    }

    #[test]
    fn test_keyword_stuffing_rejected() {
        let m = MetaFeatures {
            ndim: 2,
            size: 10,
            max_val: 5000.0,
            is_complex: false,
            norm: 1.0,
            entropy: 4.0,
            semantic_score: 0.9,
            variance: 900.0,
        };
        let audit = verify_batch(TASK, Some(&m));
        assert_eq!(audit.verdict, DomainVerdict::Invalid);
        assert_eq!(audit.reasons.len(), 1);
        assert!(audit.reasons[0].contains("Adversarial Keyword Stuffing"));
        assert!(!audit.quantum_signature);
    }

    #[test]
    fn test_semantic_mismatch_names_domain_and_confidence() {
        let m = MetaFeatures {
            ndim: 2,
            size: 12,
            max_val: 100.0,
            is_complex: false,
            norm: 1.0,
            entropy: 4.0,
            semantic_score: 0.1,
            variance: 50.0,
        };
        let audit = verify_batch(TASK, Some(&m));
        assert_eq!(audit.verdict, DomainVerdict::Invalid);
        assert!(audit.reasons[0].contains("[Tabular/Finance]"));
        assert!(audit.reasons[0].contains("85.0% confidence"));
    }

    #[test]
    fn test_low_confidence_rejected() {
        // Metadata candidate at 0.7: quantum-typed but below threshold.
        let m = MetaFeatures {
            ndim: 2,
            size: 32,
            max_val: 5.0,
            is_complex: false,
            norm: 1.0,
            entropy: 4.2,
            semantic_score: 0.5,
            variance: 1.0,
        };
        let audit = verify_batch(TASK, Some(&m));
        assert_eq!(audit.verdict, DomainVerdict::Invalid);
        assert!(audit.reasons[0].contains("Low Domain Confidence"));
        assert!(!audit.quantum_signature);
    }

    #[test]
    fn test_hilbert_reason_is_additive() {
        // Nothing fires, so the state fallback wins at confidence 0 with
        // a non-64 width: both the confidence and Hilbert reasons appear,
        // in that order.
        let m = MetaFeatures {
            ndim: 2,
            size: 32,
            max_val: 0.5,
            is_complex: false,
            norm: 1.0,
            entropy: 4.2,
            semantic_score: 0.0,
            variance: 0.1,
        };
        let audit = verify_batch(TASK, Some(&m));
        assert_eq!(audit.verdict, DomainVerdict::Invalid);
        assert_eq!(audit.reasons.len(), 2);
        assert!(audit.reasons[0].contains("Low Domain Confidence"));
        assert!(audit.reasons[1].contains("Hilbert Space dimension"));
        assert!(!audit.hilbert_dim_match);
    }

    #[test]
    fn test_normalization_tolerance() {
        let mut m = MetaFeatures::ideal_quantum();
        m.norm = 1.04;
        assert!(verify_batch(TASK, Some(&m)).normalization_check);
        m.norm = 1.06;
        assert!(!verify_batch(TASK, Some(&m)).normalization_check);
    }

    #[test]
    fn test_verdict_wire_strings() {
        assert_eq!(
            serde_json::to_string(&DomainVerdict::Valid).unwrap(),
            "\"VALID_DOMAIN\""
        );
        assert_eq!(DomainVerdict::Invalid.to_string(), "INVALID_DOMAIN");
    }
}
