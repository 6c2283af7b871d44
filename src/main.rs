//! NetWeaver - Main CLI Application
//!
//! Measures one-way network latency between a guest's virtual interface and
//! the hypervisor's physical interface by correlating two packet captures of
//! the same synthetic traffic stream.

use clap::Parser;
use log::LevelFilter;
use netweaver::{
    app::App,
    cli::Cli,
    error::{AppError, ErrorReporter},
};
use std::process;

#[tokio::main]
async fn main() {
    // Set up better panic handling
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        process::exit(1);
    }));

    // Parse command line arguments
    let cli = Cli::parse();

    init_logging(&cli);

    if let Err(message) = cli.validate() {
        eprintln!("Error: {}", message);
        process::exit(1);
    }

    let use_colors = cli.use_colors();
    let verbose = cli.verbose;

    // Handle the actual application logic
    if let Err(e) = run_application(cli).await {
        let reporter = ErrorReporter::new(use_colors, verbose);
        reporter.report_error(&e);

        // Print suggestions for common errors
        print_error_suggestions(&e);

        process::exit(e.exit_code());
    }
}

/// Main application logic
async fn run_application(cli: Cli) -> netweaver::Result<()> {
    if cli.debug {
        println!("{} v{}", netweaver::PKG_NAME, netweaver::VERSION);
        println!("Debug mode enabled");
        println!();
    }

    let app = App::new(cli)?;
    app.run().await
}

/// Wire the log facade to the terminal at a level matching the flags
fn init_logging(cli: &Cli) {
    let level = if cli.debug {
        LevelFilter::Debug
    } else if cli.verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };

    let _ = simple_logger::SimpleLogger::new().with_level(level).init();
}

/// Print helpful suggestions for common errors
fn print_error_suggestions(error: &AppError) {
    match error {
        AppError::Config { .. } | AppError::Validation { .. } => {
            eprintln!();
            eprintln!("Configuration help:");
            eprintln!("  - Check your .env file and command line flags");
            eprintln!("  - Remote runs need -s, -d, --hv, -n, and -k");
            eprintln!("  - Offline analysis needs --vif-file and --pif-file");
        }
        AppError::Session { .. } => {
            eprintln!();
            eprintln!("Session troubleshooting:");
            eprintln!("  - Verify both hosts accept the ssh key non-interactively");
            eprintln!("  - Check firewall rules between this machine and the hosts");
        }
        AppError::TimestampFormat { .. } => {
            eprintln!();
            eprintln!("Normalization help:");
            eprintln!("  - Check --timestamp-column against the capture output layout");
            eprintln!("  - The capture tool must print HH:MM:SS.ffffff times (tcpdump -tttt)");
        }
        AppError::EmptyIntersection => {
            eprintln!();
            eprintln!("Correlation help:");
            eprintln!("  - Check --seq-column, --seq-split, and --seq-split-index");
            eprintln!("  - Confirm both captures were filtered to the same traffic stream");
        }
        _ => {}
    }
}
