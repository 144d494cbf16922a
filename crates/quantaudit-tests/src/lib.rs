//! Physics and statistics validation battery for the audit pipeline.
//!
//! Structural checks prove each basis family carries exactly the support,
//! phases, and entropy it claims. Statistical checks calibrate the
//! stochastic pieces — the random-state generator and the significance
//! gate's null model — the way a randomness battery would. Each check
//! returns a [`CheckResult`] with a pass/fail determination, a p-value
//! where one applies, and a letter grade (A through F).

use flate2::Compression;
use flate2::write::ZlibEncoder;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rustfft::{FftPlanner, num_complex::Complex};
use statrs::distribution::{ChiSquared, ContinuousCDF, Normal};
use statrs::function::erf::erfc;
use std::io::Write;

use quantaudit_core::{
    AuditConfig, DIM, FinalVerdict, MetaFeatures, SignificanceConfig, StateFamily, TaskKind,
    basis_vector_with, compose_snapshot_with, physics_baseline, run_training_seeded,
    significance_gate_with,
};

// ═══════════════════════════════════════════════════════════════════════════════
// Core types
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of a single validation check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
    pub p_value: Option<f64>,
    pub statistic: f64,
    pub details: String,
    pub grade: char,
}

impl CheckResult {
    /// Assign a letter grade based on p-value.
    ///
    /// - A: p >= 0.1
    /// - B: p >= 0.01
    /// - C: p >= 0.001
    /// - D: p >= 0.0001
    /// - F: otherwise or None
    pub fn grade_from_p(p: Option<f64>) -> char {
        match p {
            Some(p) if p >= 0.1 => 'A',
            Some(p) if p >= 0.01 => 'B',
            Some(p) if p >= 0.001 => 'C',
            Some(p) if p >= 0.0001 => 'D',
            _ => 'F',
        }
    }

    /// Determine pass/fail from p-value against a threshold (default 0.01).
    pub fn pass_from_p(p: Option<f64>, threshold: f64) -> bool {
        match p {
            Some(p) => p >= threshold,
            None => false,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════════════════

/// Failing `CheckResult` for a vector of the wrong dimension.
fn dimension_mismatch(name: &str, got: usize) -> CheckResult {
    CheckResult {
        name: name.to_string(),
        passed: false,
        p_value: None,
        statistic: got as f64,
        details: format!("Wrong dimension: expected {DIM}, got {got}"),
        grade: 'F',
    }
}

/// Amplitudes serialized as little-endian f64 bytes.
fn amplitude_bytes(v: &[f64]) -> Vec<u8> {
    v.iter().flat_map(|x| x.to_le_bytes()).collect()
}

/// Zlib compression ratio of a byte slice (writing to a Vec cannot fail).
fn zlib_ratio(data: &[u8]) -> f64 {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(data).unwrap();
    let compressed = encoder.finish().unwrap();
    compressed.len() as f64 / data.len() as f64
}

/// Sign bits of `draws` seeded random states, 1 for non-negative.
fn sign_bits(seed: u64, draws: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut bits = Vec::with_capacity(draws * DIM);
    for _ in 0..draws {
        let v = basis_vector_with(StateFamily::Random, &mut rng);
        bits.extend(v.iter().map(|x| u8::from(*x >= 0.0)));
    }
    bits
}

/// Phase expected at basis index `i` of the linear cluster state.
fn cluster_phase(i: usize) -> f64 {
    let mut phase = 1.0;
    for bit in 0..5 {
        if (i >> bit) & 1 == 1 && (i >> (bit + 1)) & 1 == 1 {
            phase = -phase;
        }
    }
    phase
}

// ═══════════════════════════════════════════════════════════════════════════════
// 1. STRUCTURAL CHECKS
// ═══════════════════════════════════════════════════════════════════════════════

/// Check 1: Norm — squared amplitudes sum to 1 within 1e-6.
pub fn norm_check(family: StateFamily, v: &[f64]) -> CheckResult {
    let name = format!("{family} Norm");
    if v.len() != DIM {
        return dimension_mismatch(&name, v.len());
    }
    let norm_sq: f64 = v.iter().map(|x| x * x).sum();
    let err = (norm_sq - 1.0).abs();
    let grade = if err < 1e-9 {
        'A'
    } else if err < 1e-6 {
        'B'
    } else {
        'F'
    };
    CheckResult {
        name,
        passed: err < 1e-6,
        p_value: None,
        statistic: norm_sq,
        details: format!("norm^2={norm_sq:.12}, err={err:.2e}"),
        grade,
    }
}

/// Check 2: Support — the family's amplitudes land exactly on its
/// characteristic basis indices.
pub fn support_check(family: StateFamily, v: &[f64]) -> CheckResult {
    let name = format!("{family} Support");
    if v.len() != DIM {
        return dimension_mismatch(&name, v.len());
    }
    let support: Vec<usize> = (0..v.len()).filter(|i| v[*i] != 0.0).collect();
    let ok = match family {
        StateFamily::Ghz => support == [0, DIM - 1],
        StateFamily::W => support.len() == 6 && support.iter().all(|i| i.count_ones() == 1),
        StateFamily::Dicke2 => support.len() == 15 && support.iter().all(|i| i.count_ones() == 2),
        StateFamily::Cluster => support.len() == DIM,
        // Continuous noise essentially never lands on exact zeros.
        StateFamily::Random => support.len() > DIM / 2,
    };
    CheckResult {
        name,
        passed: ok,
        p_value: None,
        statistic: support.len() as f64,
        details: format!("support={}/{DIM} indices", support.len()),
        grade: if ok { 'A' } else { 'F' },
    }
}

/// Check 3: Phases — structured families carry the expected signs; the
/// cluster state's sign at index i is set by its adjacent 11 bit pairs.
pub fn phase_check(family: StateFamily, v: &[f64]) -> CheckResult {
    let name = format!("{family} Phases");
    if v.len() != DIM {
        return dimension_mismatch(&name, v.len());
    }
    let (ok, detail) = match family {
        StateFamily::Cluster => {
            let mismatches = (0..DIM)
                .filter(|&i| (v[i] * cluster_phase(i)) < 0.0)
                .count();
            (mismatches == 0, format!("{mismatches} sign mismatches"))
        }
        StateFamily::Random => (true, "unconstrained".to_string()),
        _ => {
            let negatives = v.iter().filter(|x| **x < 0.0).count();
            (negatives == 0, format!("{negatives} negative amplitudes"))
        }
    };
    CheckResult {
        name,
        passed: ok,
        p_value: None,
        statistic: 0.0,
        details: detail,
        grade: if ok { 'A' } else { 'F' },
    }
}

/// Check 4: Entropy — closed-form value for structured families, a loose
/// band for random states.
pub fn entropy_check(family: StateFamily, v: &[f64]) -> CheckResult {
    let name = format!("{family} Entropy");
    if v.len() != DIM {
        return dimension_mismatch(&name, v.len());
    }
    let entropy = physics_baseline(v).entropy;
    let expected = match family {
        StateFamily::Ghz => Some(1.0),
        StateFamily::W => Some(6.0_f64.log2()),
        StateFamily::Dicke2 => Some(15.0_f64.log2()),
        StateFamily::Cluster => Some(6.0),
        StateFamily::Random => None,
    };
    let (passed, detail) = match expected {
        Some(e) => {
            let err = (entropy - e).abs();
            (err < 1e-9, format!("H={entropy:.6} bits, expected {e:.6}"))
        }
        None => (
            (4.0..6.0).contains(&entropy),
            format!("H={entropy:.6} bits, band [4.0, 6.0)"),
        ),
    };
    CheckResult {
        name,
        passed,
        p_value: None,
        statistic: entropy,
        details: detail,
        grade: if passed { 'A' } else { 'F' },
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// 2. COMPRESSION CHECKS
// ═══════════════════════════════════════════════════════════════════════════════

/// Check 5: Compressibility — structured amplitude buffers (zero runs or
/// two-valued patterns) compress hard; random mantissas do not.
pub fn compressibility_check(family: StateFamily, v: &[f64]) -> CheckResult {
    let name = format!("{family} Compressibility");
    if v.len() != DIM {
        return dimension_mismatch(&name, v.len());
    }
    let ratio = zlib_ratio(&amplitude_bytes(v));
    let (passed, expectation) = match family {
        StateFamily::Random => (ratio > 0.7, "incompressible"),
        _ => (ratio < 0.6, "compressible"),
    };
    CheckResult {
        name,
        passed,
        p_value: None,
        statistic: ratio,
        details: format!("zlib ratio={ratio:.4} ({expectation})"),
        grade: if passed { 'A' } else { 'F' },
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// 3. GENERATOR CALIBRATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Check 6: Sign balance — random-state amplitude signs behave like fair
/// coin flips (monobit z-test over 100 draws).
pub fn sign_balance(seed: u64) -> CheckResult {
    let name = "Random Sign Balance";
    let bits = sign_bits(seed, 100);
    let n = bits.len();
    let s: i64 = bits.iter().map(|&b| if b == 1 { 1i64 } else { -1i64 }).sum();
    let s_obs = (s as f64).abs() / (n as f64).sqrt();
    let p = erfc(s_obs / 2.0_f64.sqrt());
    CheckResult {
        name: name.to_string(),
        passed: CheckResult::pass_from_p(Some(p), 0.01),
        p_value: Some(p),
        statistic: s_obs,
        details: format!("S={s}, n={n}"),
        grade: CheckResult::grade_from_p(Some(p)),
    }
}

/// Check 7: Sign spectrum — DFT of the sign sequence shows no periodic
/// structure (NIST-style peak count against the 95% threshold).
pub fn sign_spectrum(seed: u64) -> CheckResult {
    let name = "Random Sign Spectrum";
    let bits = sign_bits(seed, 100);
    let n = bits.len();

    let mut buffer: Vec<Complex<f64>> = bits
        .iter()
        .map(|&b| Complex {
            re: if b == 1 { 1.0 } else { -1.0 },
            im: 0.0,
        })
        .collect();
    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(n);
    fft.process(&mut buffer);

    let half = n / 2;
    let threshold = (2.995732274 * n as f64).sqrt();
    let n0 = 0.95 * half as f64;
    let n1 = buffer[..half].iter().filter(|c| c.norm() < threshold).count() as f64;
    let d = (n1 - n0) / (n as f64 * 0.95 * 0.05 / 4.0).sqrt();
    let p = erfc(d.abs() / 2.0_f64.sqrt());
    CheckResult {
        name: name.to_string(),
        passed: CheckResult::pass_from_p(Some(p), 0.01),
        p_value: Some(p),
        statistic: d,
        details: format!("peaks_below_threshold={}/{half}", n1 as u64),
        grade: CheckResult::grade_from_p(Some(p)),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// 4. NULL-MODEL CALIBRATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Check 8: Null band — every null sample sits inside [0.45, 0.55) and
/// the draw count matches the config.
pub fn null_band(seed: u64) -> CheckResult {
    let name = "Null Band";
    let config = SignificanceConfig::default();
    let report = significance_gate_with(&config, 0.99, &mut StdRng::seed_from_u64(seed));
    let lo = config.null_low;
    let hi = config.null_low + config.null_span;
    let in_band = report
        .null_distribution
        .iter()
        .filter(|x| (lo..hi).contains(*x))
        .count();
    let passed = in_band == config.null_samples && report.null_distribution.len() == config.null_samples;
    CheckResult {
        name: name.to_string(),
        passed,
        p_value: None,
        statistic: in_band as f64,
        details: format!("{in_band}/{} samples in [{lo}, {hi})", config.null_samples),
        grade: if passed { 'A' } else { 'F' },
    }
}

/// Check 9: Null uniformity — chi-squared over 10 equal bins of the
/// chance band (df = 9).
pub fn null_uniformity(seed: u64) -> CheckResult {
    let name = "Null Uniformity";
    let config = SignificanceConfig::default();
    let report = significance_gate_with(&config, 0.99, &mut StdRng::seed_from_u64(seed));
    let samples = &report.null_distribution;
    if samples.len() < 20 {
        return CheckResult {
            name: name.to_string(),
            passed: false,
            p_value: None,
            statistic: samples.len() as f64,
            details: format!("Insufficient samples: need 20, got {}", samples.len()),
            grade: 'F',
        };
    }

    let bins = 10usize;
    let mut observed = vec![0u64; bins];
    for &x in samples {
        let idx = (((x - config.null_low) / config.null_span) * bins as f64).floor() as usize;
        observed[idx.min(bins - 1)] += 1;
    }
    let expected = samples.len() as f64 / bins as f64;
    let chi2: f64 = observed
        .iter()
        .map(|&c| {
            let diff = c as f64 - expected;
            diff * diff / expected
        })
        .sum();
    let dist = ChiSquared::new((bins - 1) as f64).unwrap();
    let p = dist.sf(chi2);
    CheckResult {
        name: name.to_string(),
        passed: CheckResult::pass_from_p(Some(p), 0.01),
        p_value: Some(p),
        statistic: chi2,
        details: format!("bins={bins}, expected_per_bin={expected:.1}"),
        grade: CheckResult::grade_from_p(Some(p)),
    }
}

/// Check 10: Null mean drift — z-test of the null mean against the 0.5
/// chance level (uniform band std = span / sqrt(12)).
pub fn null_mean_drift(seed: u64) -> CheckResult {
    let name = "Null Mean Drift";
    let config = SignificanceConfig::default();
    let report = significance_gate_with(&config, 0.99, &mut StdRng::seed_from_u64(seed));
    let n = report.null_distribution.len() as f64;
    let center = config.null_low + config.null_span / 2.0;
    let sigma = config.null_span / 12.0_f64.sqrt() / n.sqrt();
    let z = (report.null_mean - center) / sigma;
    let norm = Normal::standard();
    let p = 2.0 * (1.0 - norm.cdf(z.abs()));
    CheckResult {
        name: name.to_string(),
        passed: CheckResult::pass_from_p(Some(p), 0.01),
        p_value: Some(p),
        statistic: z,
        details: format!("mean={:.5}, center={center}, z={z:.3}", report.null_mean),
        grade: CheckResult::grade_from_p(Some(p)),
    }
}

/// Check 11: P-value monotonicity — against one fixed null, the gate's
/// p-value never grows with observed accuracy and hits both extremes
/// outside the chance band.
pub fn pvalue_monotonicity(seed: u64) -> CheckResult {
    let name = "P-Value Monotonicity";
    let config = SignificanceConfig::default();
    let probes = [0.40, 0.45, 0.47, 0.50, 0.52, 0.55, 0.60, 0.99];
    // Re-seeding per probe replays the identical null distribution.
    let ps: Vec<f64> = probes
        .iter()
        .map(|&acc| significance_gate_with(&config, acc, &mut StdRng::seed_from_u64(seed)).p_value)
        .collect();
    let monotone = ps.windows(2).all(|w| w[1] <= w[0]);
    let extremes = ps[0] == 1.0 && ps[ps.len() - 1] == 0.0;
    let passed = monotone && extremes;
    CheckResult {
        name: name.to_string(),
        passed,
        p_value: None,
        statistic: ps[0] - ps[ps.len() - 1],
        details: format!(
            "p(0.40)={:.2} .. p(0.99)={:.2} over {} probes",
            ps[0],
            ps[ps.len() - 1],
            probes.len()
        ),
        grade: if passed { 'A' } else { 'F' },
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// 5. PIPELINE CHECKS
// ═══════════════════════════════════════════════════════════════════════════════

/// Check 12: Learning curve — a simulated run saturates upward, stays
/// under the ceiling, and keeps its validity score consistent.
pub fn learning_curve(seed: u64) -> CheckResult {
    let name = "Learning Curve";
    let logs = run_training_seeded(TaskKind::RandomVsNonRandom, seed);
    let first = logs.first().map(|l| l.acc).unwrap_or(0.0);
    let last = logs.last().map(|l| l.acc).unwrap_or(0.0);
    let saturates = last > first + 0.2;
    let bounded = logs.iter().all(|l| l.acc <= 0.99 && l.loss > 0.0);
    let consistent = logs
        .iter()
        .all(|l| (l.validity_score - (0.5 + l.acc * 0.4)).abs() < 1e-12);
    let passed = logs.len() == 20 && saturates && bounded && consistent;
    CheckResult {
        name: name.to_string(),
        passed,
        p_value: None,
        statistic: last,
        details: format!("acc {first:.4} -> {last:.4} over {} epochs", logs.len()),
        grade: if passed { 'A' } else { 'F' },
    }
}

/// Check 13: Verdict conjunction — the final verdict is VALID exactly
/// when both gates pass, probed at the four corners of the outcome grid.
pub fn verdict_conjunction(seed: u64) -> CheckResult {
    let name = "Verdict Conjunction";
    let task = TaskKind::GhzVsNonGhz;
    let stuffed = MetaFeatures {
        ndim: 2,
        size: 10,
        max_val: 5000.0,
        is_complex: false,
        norm: 1.0,
        entropy: 4.0,
        semantic_score: 0.9,
        variance: 900.0,
    };
    let good_logs = run_training_seeded(task, seed);
    let mut corners_ok = true;
    for (logs, meta, want) in [
        (&good_logs[..], None, FinalVerdict::Valid),
        (&good_logs[..], Some(&stuffed), FinalVerdict::Invalid),
        (&[][..], None, FinalVerdict::Invalid),
        (&[][..], Some(&stuffed), FinalVerdict::Invalid),
    ] {
        let snapshot = compose_snapshot_with(
            &AuditConfig::default(),
            task,
            logs,
            meta,
            &mut StdRng::seed_from_u64(seed),
        );
        if snapshot.final_verdict != want {
            corners_ok = false;
        }
    }
    CheckResult {
        name: name.to_string(),
        passed: corners_ok,
        p_value: None,
        statistic: 0.0,
        details: "4/4 outcome-grid corners".to_string(),
        grade: if corners_ok { 'A' } else { 'F' },
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Battery
// ═══════════════════════════════════════════════════════════════════════════════

/// Structural and compression checks for one family's generated vector.
pub fn run_family_checks(family: StateFamily, seed: u64) -> Vec<CheckResult> {
    let v = basis_vector_with(family, &mut StdRng::seed_from_u64(seed));
    let mut results = vec![
        norm_check(family, &v),
        support_check(family, &v),
        entropy_check(family, &v),
    ];
    if family != StateFamily::Random {
        results.push(phase_check(family, &v));
    }
    results.push(compressibility_check(family, &v));
    results
}

/// Run the complete 32-check battery.
pub fn run_battery(seed: u64) -> Vec<CheckResult> {
    let mut results = Vec::new();
    for family in StateFamily::all() {
        results.extend(run_family_checks(family, seed));
    }
    results.push(sign_balance(seed));
    results.push(sign_spectrum(seed));
    results.push(null_band(seed));
    results.push(null_uniformity(seed));
    results.push(null_mean_drift(seed));
    results.push(pvalue_monotonicity(seed));
    results.push(learning_curve(seed));
    results.push(verdict_conjunction(seed));
    results
}

/// Overall fidelity score (0-100) from check results.
///
/// Each grade maps to a score: A=100, B=75, C=50, D=25, F=0.
/// Returns the average across all checks.
pub fn fidelity_score(results: &[CheckResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let total: f64 = results
        .iter()
        .map(|r| match r.grade {
            'A' => 100.0,
            'B' => 75.0,
            'C' => 50.0,
            'D' => 25.0,
            _ => 0.0,
        })
        .sum();
    total / results.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_from_p() {
        assert_eq!(CheckResult::grade_from_p(Some(0.5)), 'A');
        assert_eq!(CheckResult::grade_from_p(Some(0.05)), 'B');
        assert_eq!(CheckResult::grade_from_p(Some(0.005)), 'C');
        assert_eq!(CheckResult::grade_from_p(Some(0.0005)), 'D');
        assert_eq!(CheckResult::grade_from_p(Some(0.00000001)), 'F');
        assert_eq!(CheckResult::grade_from_p(None), 'F');
    }

    #[test]
    fn test_pass_from_p() {
        assert!(CheckResult::pass_from_p(Some(0.05), 0.01));
        assert!(!CheckResult::pass_from_p(Some(0.005), 0.01));
        assert!(!CheckResult::pass_from_p(None, 0.01));
    }

    #[test]
    fn test_dimension_mismatch_fails() {
        let short = vec![0.5; 8];
        let result = norm_check(StateFamily::Ghz, &short);
        assert!(!result.passed);
        assert!(result.details.contains("expected 64"));
        assert_eq!(result.grade, 'F');
    }

    #[test]
    fn test_structural_checks_pass_for_all_families() {
        for seed in [1u64, 7, 42] {
            for family in StateFamily::all() {
                for result in run_family_checks(family, seed) {
                    assert!(
                        result.passed,
                        "{} failed at seed {seed}: {}",
                        result.name, result.details
                    );
                }
            }
        }
    }

    #[test]
    fn test_tampered_vector_is_caught() {
        let mut v = basis_vector_with(StateFamily::Ghz, &mut StdRng::seed_from_u64(1));
        v[31] = 0.3;
        assert!(!norm_check(StateFamily::Ghz, &v).passed);
        assert!(!support_check(StateFamily::Ghz, &v).passed);
        assert!(!entropy_check(StateFamily::Ghz, &v).passed);
    }

    #[test]
    fn test_compression_contrast() {
        let mut rng = StdRng::seed_from_u64(3);
        let ghz = compressibility_check(
            StateFamily::Ghz,
            &basis_vector_with(StateFamily::Ghz, &mut rng),
        );
        let random = compressibility_check(
            StateFamily::Random,
            &basis_vector_with(StateFamily::Random, &mut rng),
        );
        assert!(
            ghz.statistic < random.statistic,
            "structured states must compress harder: {} vs {}",
            ghz.statistic,
            random.statistic
        );
    }

    #[test]
    fn test_null_band_is_exact() {
        for seed in 0..5 {
            assert!(null_band(seed).passed);
        }
    }

    #[test]
    fn test_pipeline_checks_are_deterministic() {
        assert!(learning_curve(42).passed);
        assert!(verdict_conjunction(42).passed);
        for seed in 0..5 {
            assert!(pvalue_monotonicity(seed).passed);
        }
    }

    #[test]
    fn test_battery_shape_and_pass_rate() {
        let results = run_battery(42);
        assert_eq!(results.len(), 32);
        let passed = results.iter().filter(|r| r.passed).count();
        // The four seeded significance checks can individually land
        // below alpha; everything else is exact.
        assert!(
            passed >= results.len() - 4,
            "Only {passed}/{} checks passed",
            results.len()
        );
    }

    #[test]
    fn test_fidelity_score() {
        let results = vec![
            CheckResult {
                name: "A".into(),
                passed: true,
                p_value: Some(0.5),
                statistic: 0.0,
                details: String::new(),
                grade: 'A',
            },
            CheckResult {
                name: "F".into(),
                passed: false,
                p_value: Some(0.0),
                statistic: 0.0,
                details: String::new(),
                grade: 'F',
            },
        ];
        assert!((fidelity_score(&results) - 50.0).abs() < 0.01);
        assert_eq!(fidelity_score(&[]), 0.0);
    }

    #[test]
    fn test_sign_checks_report_p_values() {
        assert!(sign_balance(42).p_value.is_some());
        assert!(sign_spectrum(42).p_value.is_some());
        assert!(null_uniformity(42).p_value.is_some());
        assert!(null_mean_drift(42).p_value.is_some());
    }
}
