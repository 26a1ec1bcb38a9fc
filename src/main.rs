use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use jsurface::cli::commands::{run_extract, run_scan};
use jsurface::cli::output::{format_scan, format_types};
use jsurface::cli::{Cli, Commands, OutputFormat};
use jsurface::config::{load_project_config, ScanConfig};
use jsurface::discovery::DiscoveryConfig;

fn main() -> Result<ExitCode> {
    // Logging is opt-in: JSURFACE_LOG=debug, JSURFACE_LOG=jsurface::parser=warn, ...
    if let Ok(filter) = EnvFilter::try_from_env("JSURFACE_LOG") {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract { ref file } => {
            let project_path = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            let config = load_project_config(&project_path, cli.config.as_deref())?;
            let types = run_extract(file)?;
            println!("{}", format_types(&types, resolve_format(&cli, &config)));
        }

        Commands::Scan { ref path, strict } => {
            let config = load_project_config(path, cli.config.as_deref())?;
            let discovery = build_discovery_config(&cli, &config);
            let result = run_scan(path, &discovery)?;
            print!("{}", format_scan(&result, resolve_format(&cli, &config)));

            if !result.failures.is_empty() {
                eprintln!("\nFailed files:");
                for failure in &result.failures {
                    eprintln!("  {}", failure);
                }
            }
            if strict && result.has_errors() {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn resolve_format(cli: &Cli, config: &ScanConfig) -> OutputFormat {
    cli.format.or(config.format).unwrap_or_default()
}

/// Command-line lists replace the config file's lists when given.
fn build_discovery_config(cli: &Cli, config: &ScanConfig) -> DiscoveryConfig {
    fn pick(flag: &[String], file: &[String]) -> Vec<String> {
        if flag.is_empty() {
            file.to_vec()
        } else {
            flag.to_vec()
        }
    }

    DiscoveryConfig {
        source_roots: pick(&cli.source_roots, &config.source_roots),
        include: pick(&cli.include, &config.include),
        exclude: pick(&cli.exclude, &config.exclude),
    }
}
