use quantaudit_core::AuditLedger;

pub fn run(host: &str, port: u16) {
    let base = format!("http://{host}:{port}");

    println!("🔬 Quantaudit Server v{}", quantaudit_core::VERSION);
    println!("   {base}");
    println!();
    println!("   Endpoints:");
    println!("     GET  /                API index (try: curl {base})");
    println!("     GET  /health          Service health and audit counters");
    println!("     GET  /api/tasks       The five classification tasks");
    println!("     GET  /api/basis       Basis vector physics (?task=N&amplitudes=true)");
    println!("     GET  /api/training    Simulated training logs (?task=N&epochs=&seed=)");
    println!("     POST /api/audit       Run the audit pipeline, record the snapshot");
    println!("     GET  /api/snapshots   Every recorded snapshot");
    println!("     GET  /api/snapshot    Latest snapshot for one task (?task=N)");
    println!();
    println!("   Examples:");
    println!("     curl {base}/api/basis?task=0");
    println!("     curl {base}/api/training?task=2&epochs=20&seed=42");
    println!("     curl -X POST {base}/api/audit -H 'content-type: application/json' \\");
    println!("          -d '{{\"task\": 0, \"epochs\": 20, \"seed\": 42}}'");
    println!();

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(quantaudit_server::run_server(AuditLedger::new(), host, port));
}
