use anyhow::Result;
use log::error;
use std::path::PathBuf;

use gomu::cli::Args;
use gomu::lifecycle;

fn log_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("gomu"))
        .filter(|dir| std::fs::create_dir_all(dir).is_ok())
        .map(|dir| dir.join("gomu.log"))
        .unwrap_or_else(|| PathBuf::from("gomu.log"))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger to file (truncate on each run)
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(log_path())?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    let args = Args::from_env();

    if let Err(e) = lifecycle::start(args).await {
        error!("{:#}", e);
        eprintln!("gomu: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
