//! Compare the domain gate's view of clean, spoofed, and stuffed
//! dataset metadata.
//!
//! Shows why a strong training curve alone never produces a VALID
//! audit: the domain gate judges the data, not the model.
//!
//! Run: `cargo run --example gatekeeping`

use quantaudit_core::{MetaFeatures, TaskKind, verify_batch};

fn main() {
    let task = TaskKind::WVsNonW;

    // Clean: the canonical quantum sample
    report("ideal quantum sample", task, None);

    // Spoofed: market-like values with no quantum vocabulary
    let market = MetaFeatures {
        ndim: 2,
        size: 12,
        max_val: 150.0,
        is_complex: false,
        norm: 1.0,
        entropy: 4.1,
        semantic_score: 0.05,
        variance: 60.0,
    };
    report("market-like payload", task, Some(&market));

    // Stuffed: quantum vocabulary over absurd numbers
    let stuffed = MetaFeatures {
        ndim: 2,
        size: 64,
        max_val: 9000.0,
        is_complex: true,
        norm: 1.0,
        entropy: 6.2,
        semantic_score: 1.0,
        variance: 800.0,
    };
    report("keyword-stuffed noise", task, Some(&stuffed));
}

fn report(name: &str, task: TaskKind, meta: Option<&MetaFeatures>) {
    let audit = verify_batch(task, meta);
    println!("{name}:");
    println!(
        "  {} — classified as {} at {:.1}%",
        audit.verdict,
        audit.predicted_domain,
        audit.domain_confidence * 100.0
    );
    for reason in &audit.reasons {
        println!("  {reason}");
    }
    println!();
}
