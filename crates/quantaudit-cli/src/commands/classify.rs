//! `quantaudit classify` — run one dataset file through the domain gate.

use std::path::Path;

use quantaudit_core::{
    ClassifierConfig, DomainVerdict, TaskKind, classify_domain, score_candidates, verify_batch,
};
use serde_json::json;

use crate::ingest;

pub fn run(file: &str, json: bool) {
    let profile = match ingest::ingest_file(Path::new(file)) {
        Ok(profile) => profile,
        Err(e) => {
            eprintln!("Failed to read {file}: {e}");
            std::process::exit(1);
        }
    };
    let meta = &profile.meta;

    let candidates = score_candidates(&ClassifierConfig::default(), meta);
    let prediction = classify_domain(meta);
    // The gate verdict only depends on the metadata; GHZ stands in as
    // the reference task.
    let audit = verify_batch(TaskKind::GhzVsNonGhz, Some(meta));

    if json {
        let out = json!({
            "profile": profile,
            "candidates": candidates,
            "prediction": prediction,
            "audit": audit,
        });
        match serde_json::to_string_pretty(&out) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                eprintln!("Failed to serialize: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    println!(
        "🔬 Dataset '{}': {} lines, {} values scanned",
        profile.name, profile.line_count, profile.values_scanned
    );
    println!("   sha256 {}…\n", &profile.fingerprint[..16]);

    println!("  Features");
    println!(
        "    ndim {}   size {}   max|v| {:.3}   variance {:.3}",
        meta.ndim, meta.size, meta.max_val, meta.variance
    );
    println!(
        "    entropy {:.2}   semantic {:.2}   complex {}   norm {:.2}",
        meta.entropy,
        meta.semantic_score,
        if meta.is_complex { "yes" } else { "no" },
        meta.norm
    );

    println!("\n  Candidates");
    for candidate in &candidates {
        let marker = if candidate.domain == prediction.domain {
            '▸'
        } else {
            ' '
        };
        println!(
            "    {marker} {:<20} {:.3}",
            candidate.domain.name(),
            candidate.confidence
        );
    }

    println!(
        "\n  Prediction:   {} @ {:.1}%",
        prediction.domain,
        prediction.confidence * 100.0
    );
    println!("  Domain gate:  {}", audit.verdict);
    for reason in &audit.reasons {
        println!("    ✗ {reason}");
    }
    if audit.verdict == DomainVerdict::Valid {
        println!(
            "  Checks:       signature {}  hilbert dim {}  norm {}",
            check(audit.quantum_signature),
            check(audit.hilbert_dim_match),
            check(audit.normalization_check)
        );
    }
}

fn check(ok: bool) -> char {
    if ok { '✓' } else { '✗' }
}
