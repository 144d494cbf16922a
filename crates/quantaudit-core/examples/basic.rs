//! Basic audit example.
//!
//! Simulates a training run for the GHZ task, composes an audit
//! snapshot, and prints the layered verdicts.
//!
//! Run: `cargo run --example basic`

use quantaudit_core::{AuditLedger, TaskKind, compose_snapshot, run_training_seeded};

fn main() {
    let task = TaskKind::GhzVsNonGhz;
    println!("Task: {} — {}", task.label(), task.description());

    // Simulate 20 epochs with a fixed seed
    let logs = run_training_seeded(task, 42);
    let last = &logs[logs.len() - 1];
    println!(
        "Trained {} epochs, final acc {:.4}, final loss {:.4}",
        logs.len(),
        last.acc,
        last.loss
    );

    // Audit with no uploaded dataset: the ideal sample stands in
    let snapshot = compose_snapshot(task, &logs, None);
    println!("\nDomain gate:  {}", snapshot.domain_verdict);
    println!("Stat gate:    {} (p = {:.2})", snapshot.stat_verdict, snapshot.p_value);
    println!("Final:        {}", snapshot.final_verdict);
    println!(
        "Physics:      purity {:.3}, entropy {:.3} bits",
        snapshot.physics.purity, snapshot.physics.entropy
    );

    let mut ledger = AuditLedger::new();
    ledger.record(snapshot);
    println!(
        "\nLedger: {} snapshot(s), {} valid",
        ledger.len(),
        ledger.valid_count()
    );
}
