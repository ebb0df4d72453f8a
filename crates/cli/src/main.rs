//! # batchnews
//!
//! Thin entrypoint: all logic lives in the library crates.

use anyhow::Result;
use batchnews_cli::{run, Cli};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Load `.env` so clap's `env` lookups can see it
    dotenvy::dotenv().ok();

    // 2. Setup logging. stdout is reserved for the job's own output.
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("batchnews=info".parse()?)
                .add_directive("batchnews_cli=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // 3. Parse CLI arguments
    let cli = Cli::parse();

    // 4. Run once and map the result to the exit code
    if let Err(e) = run(cli).await {
        eprintln!("[batchnews error] {:?}", e);
        std::process::exit(1);
    }

    Ok(())
}
