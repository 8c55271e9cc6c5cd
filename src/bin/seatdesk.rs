//! Command-file runner for the reservation engine.
//!
//! ```bash
//! # Process a command file; responses land beside it.
//! seatdesk bookings.txt
//!
//! # With the `tracing` feature compiled in, RUST_LOG controls verbosity.
//! RUST_LOG=seatdesk=debug seatdesk bookings.txt
//! ```

use std::path::Path;
use std::process::ExitCode;

#[cfg(feature = "tracing")]
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
}

fn main() -> ExitCode {
    let Some(input) = std::env::args().nth(1) else {
        eprintln!("Error: Please provide a file name as an argument.");
        return ExitCode::FAILURE;
    };

    #[cfg(feature = "tracing")]
    init_tracing();

    match seatdesk::command::process_file(Path::new(&input)) {
        Ok(output) => {
            println!("Responses written to {}", output.display());
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("Error: {error}");
            ExitCode::FAILURE
        }
    }
}
