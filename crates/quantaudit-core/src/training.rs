//! Simulated training collaborator — produces the per-epoch log sequence
//! the audit pipeline consumes.
//!
//! The accuracy curve is a saturating exponential with decaying noise;
//! confusion counts are derived from accuracy over a fixed evaluation
//! budget so the precision/recall/F1 arithmetic exercises the same
//! zero-denominator guards real metrics need. Epochs are numbered from 1.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::memory::INITIAL_COERCIVITIES;
use crate::task::TaskKind;

/// Positive-class confusion counts per epoch. The negative cells are
/// implied by the evaluation budget.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Confusion {
    pub tp: u32,
    pub fp: u32,
}

/// One epoch of a simulated run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingLog {
    /// 1-based epoch number.
    pub epoch: usize,
    pub loss: f64,
    pub acc: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Per-domain coercivities carried forward across epochs.
    pub coercivities: Vec<f64>,
    pub validity_score: f64,
    pub confusion: Confusion,
}

/// Parameters of the simulated run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Epochs per run.
    pub epochs: usize,
    /// Evaluation samples per epoch.
    pub samples: u32,
    /// Hard ceiling on reported accuracy.
    pub acc_ceiling: f64,
    /// Initial noise amplitude.
    pub noise_scale: f64,
    /// Per-epoch multiplicative noise decay.
    pub noise_decay: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: 20,
            samples: 100,
            acc_ceiling: 0.99,
            noise_scale: 0.2,
            noise_decay: 0.85,
        }
    }
}

/// Divide, resolving a zero denominator to 0 instead of NaN.
fn safe_div(num: f64, den: f64) -> f64 {
    if den == 0.0 { 0.0 } else { num / den }
}

/// Precision, recall, and F1 from confusion counts.
///
/// Every zero denominator (no predicted positives, no actual positives,
/// or both precision and recall zero) resolves to 0.
pub fn precision_recall_f1(tp: u32, fp: u32, fn_count: u32) -> (f64, f64, f64) {
    let precision = safe_div(tp as f64, (tp + fp) as f64);
    let recall = safe_div(tp as f64, (tp + fn_count) as f64);
    let f1 = safe_div(2.0 * precision * recall, precision + recall);
    (precision, recall, f1)
}

/// Simulate one epoch with default parameters, carrying coercivities
/// forward from `prev`.
pub fn simulate_epoch<R: Rng + ?Sized>(
    epoch: usize,
    prev: Option<&TrainingLog>,
    task: TaskKind,
    rng: &mut R,
) -> TrainingLog {
    simulate_epoch_with(&TrainingConfig::default(), epoch, prev, task, rng)
}

/// Simulate one epoch of the configured run.
pub fn simulate_epoch_with<R: Rng + ?Sized>(
    config: &TrainingConfig,
    epoch: usize,
    prev: Option<&TrainingLog>,
    task: TaskKind,
    rng: &mut R,
) -> TrainingLog {
    let e = epoch as f64;
    let noise = (config.noise_scale * config.noise_decay.powf(e)).max(0.0);
    let base_acc = 0.5 + 0.48 * (1.0 - (-e / 4.0).exp()) * (1.0 - noise);
    let acc = (base_acc + (rng.random::<f64>() - 0.5) * 0.02).min(config.acc_ceiling);
    let loss = 0.8 * 0.9_f64.powf(e) * (1.0 + noise);

    let mut coercivities = match prev {
        Some(p) => p.coercivities.clone(),
        None => INITIAL_COERCIVITIES.to_vec(),
    };
    coercivities[task.index()] += rng.random::<f64>() * 0.02;

    // Saturating arithmetic keeps hostile configs from underflowing the
    // sample budget.
    let samples = config.samples;
    let tp = ((samples as f64 * acc * 0.5).round() as u32).min(samples);
    let tn = tp.min(samples - tp);
    let rest = samples - tp - tn;
    let fp = ((rest as f64 * 0.4).round() as u32).min(rest);
    let fn_count = rest - fp;
    let (precision, recall, f1) = precision_recall_f1(tp, fp, fn_count);

    TrainingLog {
        epoch,
        loss,
        acc,
        precision,
        recall,
        f1,
        coercivities,
        validity_score: 0.5 + acc * 0.4,
        confusion: Confusion { tp, fp },
    }
}

/// Run a full simulated training sequence.
pub fn run_training<R: Rng + ?Sized>(
    task: TaskKind,
    config: &TrainingConfig,
    rng: &mut R,
) -> Vec<TrainingLog> {
    let mut logs: Vec<TrainingLog> = Vec::with_capacity(config.epochs);
    for epoch in 1..=config.epochs {
        let log = simulate_epoch_with(config, epoch, logs.last(), task, rng);
        logs.push(log);
    }
    logs
}

/// Seeded full run with default parameters.
pub fn run_training_seeded(task: TaskKind, seed: u64) -> Vec<TrainingLog> {
    run_training(
        task,
        &TrainingConfig::default(),
        &mut StdRng::seed_from_u64(seed),
    )
}

/// Draw a fresh run seed from the OS.
pub fn random_seed() -> u64 {
    let mut buf = [0u8; 8];
    getrandom::fill(&mut buf).expect("OS CSPRNG failed");
    u64::from_le_bytes(buf)
}
