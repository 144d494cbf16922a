//! Heuristic domain classifier — maps dataset metadata to the most
//! plausible origin domain with a confidence score.
//!
//! Four candidates are scored independently and the highest wins.
//! Keyword (semantic) evidence anchors a score; numerical plausibility
//! acts as a cross-check that slashes confidence when the value
//! distribution contradicts the claimed domain. The classifier never
//! refuses: if nothing fires, `QuantumState` wins at confidence 0 and
//! the downstream gate rejects it on confidence grounds.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::meta::MetaFeatures;

/// Candidate origin domains, in fixed tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Domain {
    #[serde(rename = "Quantum State")]
    QuantumState,
    #[serde(rename = "Quantum Metadata")]
    QuantumMetadata,
    #[serde(rename = "Tabular/Finance")]
    TabularFinance,
    #[serde(rename = "Adversarial Noise")]
    AdversarialNoise,
}

impl Domain {
    /// Wire and display name.
    pub fn name(&self) -> &'static str {
        match self {
            Domain::QuantumState => "Quantum State",
            Domain::QuantumMetadata => "Quantum Metadata",
            Domain::TabularFinance => "Tabular/Finance",
            Domain::AdversarialNoise => "Adversarial Noise",
        }
    }

    /// Both quantum-typed domains satisfy the semantic gate.
    pub fn is_quantum(&self) -> bool {
        matches!(self, Domain::QuantumState | Domain::QuantumMetadata)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One scored candidate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DomainPrediction {
    pub domain: Domain,
    pub confidence: f64,
}

/// Thresholds and penalties for the candidate scoring rules.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// |value| above this is physically absurd for amplitude data.
    pub absurd_max_val: f64,
    /// Variance above this is physically absurd.
    pub absurd_variance: f64,
    /// Market-like payloads carry |value| above this...
    pub market_max_val: f64,
    /// ...with a semantic score below this.
    pub market_semantic_ceiling: f64,
    /// Base confidence for a complex-valued 64-dim state payload.
    pub state_base: f64,
    /// Multiplier applied to the state score when values are absurd.
    pub state_absurd_penalty: f64,
    /// Minimum semantic score for the metadata candidate to fire.
    pub metadata_semantic_floor: f64,
    /// Metadata confidence is `base + slope * semantic_score`.
    pub metadata_base: f64,
    pub metadata_slope: f64,
    /// |value| above this contradicts engineering-metric ranges.
    pub metadata_max_val_gate: f64,
    pub metadata_max_val_penalty: f64,
    /// Entropy above this looks like noise, not structured metadata.
    pub metadata_entropy_gate: f64,
    pub metadata_entropy_penalty: f64,
    /// Confidence assigned to market-like payloads.
    pub finance_confidence: f64,
    /// Semantic score above this combined with absurd or noisy values
    /// marks keyword stuffing.
    pub adversarial_semantic_floor: f64,
    /// Entropy above this counts as noise for the adversarial rule.
    pub adversarial_entropy_gate: f64,
    pub adversarial_confidence: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            absurd_max_val: 1000.0,
            absurd_variance: 500.0,
            market_max_val: 10.0,
            market_semantic_ceiling: 0.2,
            state_base: 0.95,
            state_absurd_penalty: 0.1,
            metadata_semantic_floor: 0.3,
            metadata_base: 0.4,
            metadata_slope: 0.6,
            metadata_max_val_gate: 15.0,
            metadata_max_val_penalty: 0.2,
            metadata_entropy_gate: 5.8,
            metadata_entropy_penalty: 0.3,
            finance_confidence: 0.85,
            adversarial_semantic_floor: 0.5,
            adversarial_entropy_gate: 5.9,
            adversarial_confidence: 0.95,
        }
    }
}

/// Classify with the default config.
pub fn classify_domain(meta: &MetaFeatures) -> DomainPrediction {
    classify_domain_with(&ClassifierConfig::default(), meta)
}

/// Score all four candidates and return the winner.
///
/// The candidate list is built in declaration order and sorted with a
/// stable sort, so equal confidences resolve to the earlier-declared
/// domain.
pub fn classify_domain_with(config: &ClassifierConfig, meta: &MetaFeatures) -> DomainPrediction {
    let mut predictions = score_candidates(config, meta);
    predictions.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
    });
    predictions[0]
}

/// Score all four candidates, unsorted, in declaration order.
pub fn score_candidates(config: &ClassifierConfig, meta: &MetaFeatures) -> [DomainPrediction; 4] {
    let mut predictions = [
        DomainPrediction { domain: Domain::QuantumState, confidence: 0.0 },
        DomainPrediction { domain: Domain::QuantumMetadata, confidence: 0.0 },
        DomainPrediction { domain: Domain::TabularFinance, confidence: 0.0 },
        DomainPrediction { domain: Domain::AdversarialNoise, confidence: 0.0 },
    ];

    let physically_absurd =
        meta.max_val > config.absurd_max_val || meta.variance > config.absurd_variance;
    let market_like = meta.max_val > config.market_max_val
        && !meta.is_complex
        && meta.semantic_score < config.market_semantic_ceiling;

    // State payloads must be complex-valued and exactly 64-dimensional.
    if meta.is_complex && meta.size == 64 {
        let mut conf = config.state_base;
        if physically_absurd {
            conf *= config.state_absurd_penalty;
        }
        predictions[0].confidence = conf;
    }

    // Metadata needs keyword evidence; value range and entropy can
    // contradict it.
    if meta.semantic_score > config.metadata_semantic_floor {
        let mut conf = config.metadata_base + meta.semantic_score * config.metadata_slope;
        if meta.max_val > config.metadata_max_val_gate {
            conf *= config.metadata_max_val_penalty;
        }
        if meta.entropy > config.metadata_entropy_gate {
            conf *= config.metadata_entropy_penalty;
        }
        predictions[1].confidence = conf;
    }

    if market_like {
        predictions[2].confidence = config.finance_confidence;
    }

    // Keyword stuffing: quantum vocabulary over a non-physical value
    // distribution.
    if meta.semantic_score > config.adversarial_semantic_floor
        && (physically_absurd || meta.entropy > config.adversarial_entropy_gate)
    {
        predictions[3].confidence = config.adversarial_confidence;
    }

    predictions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(
        size: usize,
        max_val: f64,
        is_complex: bool,
        entropy: f64,
        semantic_score: f64,
        variance: f64,
    ) -> MetaFeatures {
        MetaFeatures {
            ndim: 2,
            size,
            max_val,
            is_complex,
            norm: 1.0,
            entropy,
            semantic_score,
            variance,
        }
    }

    #[test]
    fn test_ideal_sample_is_confident_quantum() {
        // Saturated semantic score puts the metadata candidate at 1.0,
        // edging out the state candidate's 0.95. Either way the winner
        // is a quantum domain at high confidence.
        let pred = classify_domain(&MetaFeatures::ideal_quantum());
        assert_eq!(pred.domain, Domain::QuantumMetadata);
        assert!(pred.domain.is_quantum());
        assert!(pred.confidence >= 0.9);
    }

    #[test]
    fn test_absurd_values_slash_state_below_metadata() {
        // Quantum vocabulary plus |values| in the thousands: the state
        // candidate is penalized below even the max-val-penalized
        // metadata candidate, and the stuffing rule wins outright.
        let m = meta(64, 5000.0, true, 4.2, 1.0, 0.2);
        let cfg = ClassifierConfig::default();

        let state_score = cfg.state_base * cfg.state_absurd_penalty;
        let metadata_score =
            (cfg.metadata_base + cfg.metadata_slope) * cfg.metadata_max_val_penalty;
        assert!(state_score < metadata_score);

        let pred = classify_domain(&m);
        assert_eq!(pred.domain, Domain::AdversarialNoise);
        assert!(pred.confidence >= 0.9);
    }

    #[test]
    fn test_keyword_stuffing_detected() {
        let m = meta(10, 5000.0, false, 4.0, 0.9, 900.0);
        let pred = classify_domain(&m);
        assert_eq!(pred.domain, Domain::AdversarialNoise);
        assert!((pred.confidence - 0.95).abs() < 1e-12);
    }

    #[test]
    fn test_market_payload() {
        let m = meta(12, 100.0, false, 4.0, 0.1, 50.0);
        let pred = classify_domain(&m);
        assert_eq!(pred.domain, Domain::TabularFinance);
        assert!((pred.confidence - 0.85).abs() < 1e-12);
    }

    #[test]
    fn test_metadata_without_penalties() {
        // Semantic evidence only: metadata wins but below the gate
        // threshold used downstream.
        let m = meta(32, 5.0, false, 4.2, 0.5, 1.0);
        let pred = classify_domain(&m);
        assert_eq!(pred.domain, Domain::QuantumMetadata);
        assert!((pred.confidence - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_tie_resolves_to_declaration_order() {
        // State and adversarial both score 0.95 here (complex 64-dim
        // payload, high-entropy values with quantum vocabulary). The
        // stable sort keeps QuantumState first.
        let m = meta(64, 0.8, true, 6.0, 0.6, 0.2);
        let pred = classify_domain(&m);
        assert_eq!(pred.domain, Domain::QuantumState);
        assert!((pred.confidence - 0.95).abs() < 1e-12);
    }

    #[test]
    fn test_nothing_fires_falls_back_to_state_at_zero() {
        let m = meta(10, 1.0, false, 3.0, 0.0, 0.5);
        let pred = classify_domain(&m);
        assert_eq!(pred.domain, Domain::QuantumState);
        assert_eq!(pred.confidence, 0.0);
    }

    #[test]
    fn test_candidates_keep_declaration_order() {
        let scores = score_candidates(&ClassifierConfig::default(), &MetaFeatures::ideal_quantum());
        assert_eq!(scores[0].domain, Domain::QuantumState);
        assert_eq!(scores[1].domain, Domain::QuantumMetadata);
        assert_eq!(scores[2].domain, Domain::TabularFinance);
        assert_eq!(scores[3].domain, Domain::AdversarialNoise);
        assert!((scores[0].confidence - 0.95).abs() < 1e-12);
        assert!((scores[1].confidence - 1.0).abs() < 1e-12);
        assert_eq!(scores[2].confidence, 0.0);
        assert_eq!(scores[3].confidence, 0.0);
    }

    #[test]
    fn test_domain_wire_names() {
        assert_eq!(
            serde_json::to_string(&Domain::TabularFinance).unwrap(),
            "\"Tabular/Finance\""
        );
        assert_eq!(Domain::AdversarialNoise.to_string(), "Adversarial Noise");
        assert!(Domain::QuantumMetadata.is_quantum());
        assert!(!Domain::TabularFinance.is_quantum());
    }
}
