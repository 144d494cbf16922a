//! `quantaudit validate` — run the physics and statistics battery.

use quantaudit_core::format_iso8601;
use quantaudit_tests::{CheckResult, fidelity_score, run_battery};

pub fn run(seed: Option<u64>, output_path: Option<&str>) {
    let seed = super::resolve_seed(seed);
    println!("🔬 Running validation battery (seed {seed})...\n");

    let results = run_battery(seed);
    let score = fidelity_score(&results);
    let passed = results.iter().filter(|r| r.passed).count();

    println!("{}", "=".repeat(72));
    println!(
        "{:<24} {:>2} {:>6} {:>10} {:>12}",
        "Check", "P", "Grade", "p-value", "Statistic"
    );
    println!("{}", "-".repeat(72));
    for r in &results {
        let ok = if r.passed { '✓' } else { '✗' };
        let pval = r
            .p_value
            .map(|p| format!("{p:.6}"))
            .unwrap_or_else(|| "—".to_string());
        println!(
            "{:<24} {:>2} {:>6} {:>10} {:>12.4}",
            r.name, ok, r.grade, pval, r.statistic
        );
    }
    println!("{}", "-".repeat(72));
    println!(
        "Passed {passed}/{}  —  fidelity {score:.1}/100",
        results.len()
    );

    if let Some(path) = output_path {
        let report = generate_report(&results, seed, score);
        if let Err(e) = std::fs::write(path, &report) {
            eprintln!("Failed to write report to {path}: {e}");
        } else {
            println!("\n📄 Report saved to: {path}");
        }
    }
}

fn generate_report(results: &[CheckResult], seed: u64, score: f64) -> String {
    let passed = results.iter().filter(|r| r.passed).count();
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();

    let mut report = String::new();
    report.push_str("# Quantaudit — Validation Battery Report\n\n");
    report.push_str(&format!("Generated: {}\n", format_iso8601(now)));
    report.push_str(&format!("Seed: {seed}\n\n"));
    report.push_str(&format!(
        "- Checks: {}\n- Passed: {passed}\n- Fidelity: {score:.1}/100\n\n",
        results.len()
    ));

    report.push_str("| Check | P | Grade | p-value | Statistic | Details |\n");
    report.push_str("|-------|---|-------|---------|-----------|--------|\n");
    for r in results {
        let ok = if r.passed { "✓" } else { "✗" };
        let pval = r
            .p_value
            .map(|p| format!("{p:.6}"))
            .unwrap_or_else(|| "—".to_string());
        report.push_str(&format!(
            "| {} | {} | {} | {} | {:.4} | {} |\n",
            r.name, ok, r.grade, pval, r.statistic, r.details
        ));
    }
    report.push('\n');

    report
}
