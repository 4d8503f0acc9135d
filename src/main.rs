use anyhow::{bail, Context, Result};
use clap::Parser;
use tailwind_theme::{export, load_config, scan, validate, Cli, Commands};
use tracing::info;

fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Show(args) => {
            let config = load_config(&args.source).context("Failed to load configuration")?;
            print!("{}", ensure_newline(config.render(args.format)?));
            Ok(())
        }
        Commands::Validate(args) => {
            let config = load_config(&args.source).context("Failed to load configuration")?;
            let report = validate(&config);

            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for issue in &report.issues {
                    println!("{}", issue);
                }
            }

            let errors = report.errors().count();
            let warnings = report.warnings().count();
            if errors > 0 || (args.strict && warnings > 0) {
                bail!("validation failed: {} error(s), {} warning(s)", errors, warnings);
            }
            info!("Configuration is valid ({} warning(s))", warnings);
            Ok(())
        }
        Commands::Export(args) => {
            let bytes = export(&args)
                .with_context(|| format!("Failed to export configuration to {}", args.output.display()))?;
            println!("Wrote {} ({} bytes)", args.output.display(), bytes);
            Ok(())
        }
        Commands::Scan(args) => {
            let result = scan(&args, !cli.verbose).context("Failed to scan content patterns")?;

            println!("Scan complete:");
            for (pattern, info) in &result.manifest.patterns {
                println!("  - {} -> {} files", pattern, info.files.len());
            }
            println!("  - {} unique files", result.resolved.files.len());
            if result.resolved.skipped > 0 {
                println!("  - {} files skipped", result.resolved.skipped);
            }
            info!(
                "Scanned in {:.2}s ({:.2} MB)",
                result.duration.as_secs_f64(),
                result.resolved.total_bytes() as f64 / (1024.0 * 1024.0)
            );
            Ok(())
        }
    }
}

fn ensure_newline(mut text: String) -> String {
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

/// Initialize tracing subscriber for logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
