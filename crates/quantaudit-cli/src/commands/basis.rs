//! `quantaudit basis` — inspect the canonical state families.

use rand::SeedableRng;
use rand::rngs::StdRng;

use quantaudit_core::{DIM, StateFamily, TaskKind, basis_vector_with, physics_baseline};

pub fn run(task_spec: Option<&str>, amplitudes: bool, seed: Option<u64>) {
    let seed = super::resolve_seed(seed);
    let mut rng = StdRng::seed_from_u64(seed);

    match task_spec {
        Some(spec) => {
            let task = super::parse_task_or_exit(spec);
            print_detail(task, amplitudes, &mut rng, seed);
        }
        None => {
            if amplitudes {
                eprintln!("--amplitudes needs a task (0-4 or ghz, w, dicke2, cluster, random).");
                std::process::exit(1);
            }
            print_table(&mut rng, seed);
        }
    }
}

fn print_table(rng: &mut StdRng, seed: u64) {
    println!("🔬 Basis vector library ({DIM}-dimensional, 6 qubits; seed {seed})\n");
    println!("{}", "=".repeat(60));
    println!(
        "{:<10} {:>7} {:>8} {:>9} {:>9}   {}",
        "Family", "Support", "Purity", "Entropy", "Entangle", "Pure"
    );
    println!("{}", "-".repeat(60));

    for family in StateFamily::all() {
        let v = basis_vector_with(family, rng);
        let physics = physics_baseline(&v);
        let support = v.iter().filter(|x| **x != 0.0).count();
        println!(
            "{:<10} {:>7} {:>8.4} {:>9.3} {:>9.3}   {}",
            family.name(),
            support,
            physics.purity,
            physics.entropy,
            physics.entanglement_indicator,
            if physics.is_pure { "yes" } else { "no" }
        );
    }
}

fn print_detail(task: TaskKind, amplitudes: bool, rng: &mut StdRng, seed: u64) {
    let family = task.family();
    let v = basis_vector_with(family, rng);
    let physics = physics_baseline(&v);
    let support = v.iter().filter(|x| **x != 0.0).count();

    println!(
        "🔬 {} basis state (task {}: {})\n",
        family.name(),
        task.index(),
        task.label()
    );
    println!("  Description:  {}", task.description());
    println!("  Support:      {support} of {DIM} amplitudes");
    println!(
        "  Purity:       {:.4} ({})",
        physics.purity,
        if physics.is_pure { "pure" } else { "mixed" }
    );
    println!("  Entropy:      {:.3} bits", physics.entropy);
    println!("  Entanglement: {:.3}", physics.entanglement_indicator);
    if family == StateFamily::Random {
        println!("  Seed:         {seed} (fresh draw per call)");
    }

    if amplitudes {
        println!("\n  Amplitudes (8 per row):");
        for (row, chunk) in v.chunks(8).enumerate() {
            let mut line = format!("  {:>4}: ", row * 8);
            for x in chunk {
                line.push_str(&format!(" {x:+.6}"));
            }
            println!("{line}");
        }
    }
}
