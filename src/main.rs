use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;
use tracing::warn;

use webprobe::cli::{Cli, Commands, scan_config};
use webprobe::{ConsoleReporter, HtmlExporter, JsonExporter, ScanContext, logging};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            url,
            depth,
            timeout,
            concurrency,
            max_time,
            user_agent,
            output,
            verbose,
        } => {
            logging::init(verbose)?;

            let config = scan_config(&url, depth, timeout, concurrency, max_time, &user_agent)?;
            let context = ScanContext::new(&config)?;

            eprintln!(
                "{} TLS certificate validation is disabled for this scan",
                "warning:".yellow().bold()
            );
            println!(
                "Scanning {} (depth {}, concurrency {})",
                config.target.base_url().cyan(),
                config.target.max_depth(),
                config.concurrency
            );

            let control = context.control();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("interrupt received, stopping scan");
                    control.cancel();
                }
            });

            let report = context.run(true).await;

            let reporter = ConsoleReporter::new();
            reporter.print_sitemap(&report);
            reporter.print_details(&report);
            reporter.print_summary(&report);

            if let Some(path) = output {
                if path.ends_with(".html") || path.ends_with(".htm") {
                    HtmlExporter::export(&report, &path)?;
                } else {
                    JsonExporter::export(&report, &path)?;
                }
                println!("Report written to {}", path.green());
            }
        }

        Commands::Report {
            input,
            format,
            output,
        } => {
            logging::init(false)?;
            let report = JsonExporter::load(&input)?;

            let rendered = match format.to_lowercase().as_str() {
                "html" => HtmlExporter::render(&report)?,
                "json" => JsonExporter::render(&report)?,
                other => bail!("Unknown report format '{}'. Supported: html, json", other),
            };

            match output {
                Some(path) => {
                    std::fs::write(&path, rendered)
                        .with_context(|| format!("Failed to write to {}", path))?;
                    println!("Report written to {}", path.green());
                }
                None => println!("{}", rendered),
            }
        }
    }

    Ok(())
}
