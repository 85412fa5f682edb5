use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use log::{debug, info};
use modpreload_optimize::Config;
use std::io::{BufWriter, Write};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "modpreload")]
#[command(about = "Post-build optimizer that preloads the static module graph", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Minify scripts and inject module preload hints into a build output directory
    Optimize(Config),
}

fn main() -> Result<()> {
    env_logger::init();

    // stdio is blocked by LineWriter, use a BufWriter to reduce syscalls.
    // See https://github.com/rust-lang/rust/issues/60673
    let mut stdout = BufWriter::new(std::io::stdout());

    let cli = Cli::parse();
    debug!("Parsed CLI arguments: {:?}", cli.command);

    let start = Instant::now();

    match cli.command {
        Commands::Optimize(cfg) => {
            let num_threads = rayon::current_num_threads();
            info!(
                "Running optimize with minifyJS: {} (using {} threads)",
                cfg.options.minify_js, num_threads
            );
            debug!("Config: root={:?}, exclude={:?}", cfg.root, cfg.options.exclude);

            let report = modpreload_optimize::run_optimize(cfg)?;
            let elapsed_ms = start.elapsed().as_millis();

            modpreload_optimize::print_report(&mut stdout, &report)?;
            writeln!(
                stdout,
                "\n{} Finished in {}ms on {} files (using {} threads).",
                "●".bright_blue(),
                elapsed_ms.to_string().cyan(),
                report.files_scanned.to_string().cyan(),
                num_threads.to_string().cyan()
            )?;
            stdout.flush()?;

            Ok(())
        }
    }
}
