use std::env;
use std::io;

use tracing_subscriber::EnvFilter;

fn main() -> io::Result<()> {
    // Protocol output owns stdout; diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    match env::args().nth(1).as_deref() {
        Some("cli") => quince_chess::cli::run_stdio_loop(),
        Some("uci") | None => quince_chess::uci::run_stdio_loop(),
        Some(other) => {
            eprintln!("unknown mode '{other}'; expected 'uci' or 'cli'");
            Ok(())
        }
    }
}
