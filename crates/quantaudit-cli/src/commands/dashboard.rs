pub fn run(refresh: f64, seed: Option<u64>) {
    let seed = super::resolve_seed(seed);
    let mut app = crate::tui::app::App::new(seed, refresh);
    if let Err(e) = app.run() {
        eprintln!("TUI error: {e}");
        std::process::exit(1);
    }
}
