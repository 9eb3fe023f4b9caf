use clap::Parser;
use orderly::{Command, NativeStorage, Output, Repository, init_logging};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "orderly")]
#[command(about = "Order management back-office with a funnel financial calculator")]
struct Args {
    /// Path to the data directory (default: ~/.orderly/)
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let data_dir = args.data_dir.unwrap_or_else(NativeStorage::default_path);

    let _guard = init_logging(&data_dir, &args.log_level)?;
    tracing::debug!(command = ?args.command, "Running command");

    let repo = Repository::new(NativeStorage::new(data_dir));
    let output = orderly::commands::run(&repo, args.command, &Output::new(args.json))?;
    println!("{output}");

    tracing::info!("Done");
    Ok(())
}
