//! Fixed-seed benchmark of the full audit pipeline.
//!
//! Runs every task through training and audit twice: once clean and once
//! with keyword-stuffed dataset metadata. The point is the conjunction:
//! the adversarial pass reuses the same seeds and therefore produces the
//! same learning curves, yet every audit flips to INVALID because the
//! domain gate fires before the statistics matter.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin audit_bench
//! ```
//!
//! ## Output
//!
//! - Console tables for the clean and adversarial passes
//! - JSON report saved to `audit_bench_results.json`

use std::time::{Instant, SystemTime, UNIX_EPOCH};

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use quantaudit_core::{
    AuditConfig, MetaFeatures, TaskKind, TrainingConfig, compose_snapshot_with, run_training,
};

/// Every run in the report derives from this seed.
const SEED: u64 = 7;

// =============================================================================
// Result structures
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TaskBenchResult {
    /// Short task name
    task: String,
    /// Human-readable task label
    label: String,
    /// Seed the run was derived from
    seed: u64,
    /// Epochs trained
    epochs: usize,
    /// Final logged accuracy
    final_acc: f64,
    /// Permutation p-value of the final accuracy
    p_value: f64,
    /// Domain gate verdict
    domain_verdict: String,
    /// Significance gate verdict
    stat_verdict: String,
    /// Conjunctive verdict
    final_verdict: String,
    /// First rejection reason, if any
    reason: Option<String>,
    /// Wall time for training plus audit
    elapsed_ms: f64,
    /// Shannon entropy of the task's ideal state (bits)
    entropy: f64,
    /// Purity of the task's ideal state
    purity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BenchReport {
    /// Unix timestamp when the benchmark was run
    generated_unix: u64,
    /// Seed shared by every run
    seed: u64,
    /// Epochs per run
    epochs: usize,
    /// Clean pass, one result per task
    clean: Vec<TaskBenchResult>,
    /// Adversarial pass with stuffed metadata, same tasks
    adversarial: Vec<TaskBenchResult>,
    /// Summary statistics
    summary: BenchSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BenchSummary {
    /// VALID verdicts in the clean pass
    clean_valid: usize,
    /// INVALID verdicts in the adversarial pass
    adversarial_invalid: usize,
    /// Whether a re-run with the same seed reproduced the numbers exactly
    deterministic: bool,
    /// Explanation of results
    explanation: String,
}

// =============================================================================
// Benchmark logic
// =============================================================================

/// Train one task from the seed and audit the curve against `meta`.
fn benchmark_task(task: TaskKind, seed: u64, meta: Option<&MetaFeatures>) -> TaskBenchResult {
    let config = TrainingConfig::default();
    let start = Instant::now();

    let mut rng = StdRng::seed_from_u64(seed);
    let logs = run_training(task, &config, &mut rng);
    let snapshot = compose_snapshot_with(&AuditConfig::default(), task, &logs, meta, &mut rng);

    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    TaskBenchResult {
        task: task.short_name().to_string(),
        label: task.label().to_string(),
        seed,
        epochs: config.epochs,
        final_acc: snapshot.final_acc,
        p_value: snapshot.p_value,
        domain_verdict: snapshot.domain_verdict.to_string(),
        stat_verdict: snapshot.stat_verdict.to_string(),
        final_verdict: snapshot.final_verdict.to_string(),
        reason: snapshot.domain_reasons.first().cloned(),
        elapsed_ms,
        entropy: snapshot.physics.entropy,
        purity: snapshot.physics.purity,
    }
}

/// Metadata that trips the stuffing rule: saturated quantum vocabulary
/// over values no amplitude vector could contain.
fn stuffed_meta() -> MetaFeatures {
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

// =============================================================================
// Output formatting
// =============================================================================

fn print_header(title: &str) {
    println!();
    println!("{}", "=".repeat(110));
    println!("  {title}");
    println!("{}", "=".repeat(110));
}

fn print_result_table(results: &[TaskBenchResult], title: &str) {
    println!("\n{title}");
    println!(
        "{:<22} {:>9} {:>15} {:>13} {:>7} {:>10} {:>7} {:>7} {:>7}",
        "Task", "Verdict", "Domain", "Stat", "acc", "p-value", "H", "purity", "ms"
    );
    println!("{}", "-".repeat(110));

    for r in results {
        println!(
            "{:<22} {:>9} {:>15} {:>13} {:>7.3} {:>10.2} {:>7.2} {:>7.3} {:>7.1}",
            r.label,
            r.final_verdict,
            r.domain_verdict,
            r.stat_verdict,
            r.final_acc,
            r.p_value,
            r.entropy,
            r.purity,
            r.elapsed_ms
        );
    }
}

fn print_key_insight() {
    println!("\n{}", "=".repeat(110));
    println!("  KEY INSIGHT: Accuracy Alone Cannot Certify a Classifier");
    println!("{}", "=".repeat(110));
    println!();
    println!("  Both passes above were trained from the same seed, so their learning curves");
    println!("  and final accuracies are identical. The significance gate passes in both.");
    println!();
    println!("  What flips every adversarial verdict to INVALID is the domain gate: the");
    println!("  stuffed metadata carries saturated quantum vocabulary over |values| in the");
    println!("  thousands, which no normalized amplitude vector could contain. The");
    println!("  classifier calls that Adversarial Noise and the gate rejects it before the");
    println!("  statistics are even consulted.");
    println!();
    println!("  The final verdict is a conjunction. VALID requires BOTH:");
    println!("    1. A plausibly quantum dataset (domain gate)");
    println!("    2. Accuracy statistically above the shuffled-label null (significance gate)");
    println!();
    println!("  Every number in this report reproduces bit for bit from the seed.");
}

// =============================================================================
// Main
// =============================================================================

fn main() {
    println!();
    println!("  🔬 QuantAudit — audit pipeline benchmark");
    println!("  seed {SEED}, {} epochs per task", TrainingConfig::default().epochs);

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs();

    // =========================================================================
    // Clean pass
    // =========================================================================

    print_header("CLEAN AUDITS (ideal metadata)");

    let clean: Vec<TaskBenchResult> = TaskKind::all()
        .iter()
        .map(|&task| benchmark_task(task, SEED, None))
        .collect();

    print_result_table(&clean, "Clean runs:");

    // =========================================================================
    // Adversarial pass
    // =========================================================================

    print_header("ADVERSARIAL AUDITS (keyword-stuffed metadata)");

    let meta = stuffed_meta();
    let adversarial: Vec<TaskBenchResult> = TaskKind::all()
        .iter()
        .map(|&task| benchmark_task(task, SEED, Some(&meta)))
        .collect();

    print_result_table(&adversarial, "Adversarial runs:");

    if let Some(reason) = adversarial.iter().find_map(|r| r.reason.as_ref()) {
        println!("\n  Rejection reason: {reason}");
    }

    // =========================================================================
    // Determinism check
    // =========================================================================

    let rerun = benchmark_task(TaskKind::GhzVsNonGhz, SEED, None);
    let deterministic = rerun.p_value == clean[0].p_value && rerun.final_acc == clean[0].final_acc;

    print_key_insight();

    // =========================================================================
    // Summary
    // =========================================================================

    let clean_valid = clean.iter().filter(|r| r.final_verdict == "VALID").count();
    let adversarial_invalid = adversarial
        .iter()
        .filter(|r| r.final_verdict == "INVALID")
        .count();

    let summary = BenchSummary {
        clean_valid,
        adversarial_invalid,
        deterministic,
        explanation: format!(
            "Clean runs audit VALID on {clean_valid}/5 tasks; the same curves with \
             keyword-stuffed metadata audit INVALID on {adversarial_invalid}/5. \
             Re-running ghz from seed {SEED} reproduced p = {:.2} {}.",
            rerun.p_value,
            if deterministic { "exactly" } else { "INEXACTLY (bug?)" }
        ),
    };

    println!("\n{}", "=".repeat(110));
    println!("  SUMMARY");
    println!("{}", "=".repeat(110));
    println!();
    println!("  Clean verdicts:        {clean_valid}/5 VALID");
    println!("  Adversarial verdicts:  {adversarial_invalid}/5 INVALID");
    println!(
        "  Deterministic replay:  {}",
        if deterministic { "yes" } else { "NO" }
    );
    println!();
    println!("  {}", summary.explanation);

    // =========================================================================
    // Save JSON report
    // =========================================================================

    let report = BenchReport {
        generated_unix: timestamp,
        seed: SEED,
        epochs: TrainingConfig::default().epochs,
        clean,
        adversarial,
        summary,
    };

    let json_path = "audit_bench_results.json";
    match std::fs::write(json_path, serde_json::to_string_pretty(&report).unwrap()) {
        Ok(()) => println!("\n  Results saved to: {json_path}"),
        Err(e) => eprintln!("\n  Failed to save results: {e}"),
    }

    println!();
    println!("{}", "=".repeat(110));
}
