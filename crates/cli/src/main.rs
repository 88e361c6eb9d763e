//! gateway-bench CLI entry point.

use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = gateway_bench_cli::run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
