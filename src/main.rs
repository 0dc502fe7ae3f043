// src/main.rs

use anyhow::Result;
use clap::Parser;
use repodigest::cli::{Cli, Commands};
use repodigest::config::ConfigBuilder;
use repodigest::progress::terminal_reporter;
use repodigest::run;

#[cfg(feature = "web")]
use repodigest::web;

// Wrapper struct to handle subcommands without breaking the library's Cli struct
#[derive(Parser)]
#[command(author, version, about = "Turns a GitHub repository into a single document ready for an LLM.")]
struct AppArgs {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    cli: Cli,
}

fn main() -> Result<()> {
    // Initialize logging. RUST_LOG overrides the default level.
    let default_directive = if cfg!(debug_assertions) {
        "repodigest=debug"
    } else {
        "repodigest=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    log::debug!("Starting repodigest v{}", env!("CARGO_PKG_VERSION"));

    let args = AppArgs::parse();

    // --- Handle Subcommands (Web Server) ---
    #[cfg(feature = "web")]
    if let Some(Commands::Serve { port, no_open }) = &args.command {
        let builder = ConfigBuilder::from_cli(args.cli);
        let server_config = web::ServerConfig {
            github: builder.build_github()?,
            llm: builder.build_llm()?,
        };
        let rt = tokio::runtime::Runtime::new()?;
        return rt.block_on(web::start_server(*port, !*no_open, server_config));
    }
    #[cfg(not(feature = "web"))]
    if args.command.is_some() {
        eprintln!("Error: this build of repodigest does not include the web UI.");
        std::process::exit(1);
    }

    // --- Configuration & Execution ---
    let result = ConfigBuilder::from_cli(args.cli).build().and_then(|config| {
        let progress = terminal_reporter();
        let outcome = run(&config, progress.as_ref());
        progress.finish();
        outcome
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
