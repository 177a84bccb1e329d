//! JV plot renderer
//!
//! Command-line front end: renders a list of plot tokens for a JSON dataset
//! into SVG or JSON files.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use jvplots::plotting::export_all;
use jvplots::{ExportFormat, PlotManager, RenderInput, RenderOptions, StyleConfig};

/// Render photovoltaic JV measurement plots
#[derive(Parser, Debug)]
#[command(name = "jvplots")]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render plots for a dataset
    Render {
        /// JSON file with `dataset` and `support` objects
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Plot tokens, e.g. Bpa Hist Cw (repeatable, comma separated allowed)
        #[arg(short, long = "plots", value_name = "TOKEN", value_delimiter = ',', required = true, num_args = 1..)]
        plots: Vec<String>,

        /// Output directory
        #[arg(short, long, default_value = "plots", value_name = "DIR")]
        out: PathBuf,

        /// Output format: svg or json
        #[arg(long, default_value_t = ExportFormat::Svg)]
        format: ExportFormat,

        /// Style configuration JSON file
        #[arg(long, value_name = "FILE")]
        style: Option<PathBuf>,

        /// Axis label and tick font size
        #[arg(long)]
        axis_size: Option<u32>,

        /// Title font size
        #[arg(long)]
        title_size: Option<u32>,

        /// Legend font size
        #[arg(long)]
        legend_size: Option<u32>,

        /// Draw reverse and forward scans as separate boxes
        #[arg(long)]
        separate_scan_direction: bool,

        /// Maximum number of devices in combined curve plots
        #[arg(long, default_value_t = 50)]
        max_curves: usize,

        /// Maximum number of per-device figures
        #[arg(long, default_value_t = 20)]
        max_devices: usize,
    },
    /// List the available plot tokens
    Tokens,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,jvplots=debug")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    match args.command {
        Command::Render {
            input,
            plots,
            out,
            format,
            style,
            axis_size,
            title_size,
            legend_size,
            separate_scan_direction,
            max_curves,
            max_devices,
        } => {
            let raw = fs::read_to_string(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            let data: RenderInput = serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse {}", input.display()))?;

            let style = match style {
                Some(path) => {
                    let json = fs::read_to_string(&path)
                        .with_context(|| format!("failed to read {}", path.display()))?;
                    StyleConfig::from_json(&json)
                        .with_context(|| format!("invalid style file {}", path.display()))?
                }
                None => StyleConfig::new(),
            };

            let mut manager = PlotManager::new().with_style(style);
            manager
                .set_font_sizes(axis_size, title_size, legend_size)
                .context("invalid font size")?;
            manager.set_render_options(RenderOptions {
                separate_scan_direction,
                max_curves,
                max_devices,
            });

            let result = manager.render(&plots, &data.dataset, &data.support);
            for warning in result.warnings() {
                eprintln!("warning: {warning}");
            }
            let written = export_all(&result, &out, format)
                .with_context(|| format!("failed to export to {}", out.display()))?;
            tracing::info!(count = written.len(), dir = %out.display(), "plots exported");
            for path in written {
                println!("{}", path.display());
            }
        }
        Command::Tokens => {
            let manager = PlotManager::new();
            for token in manager.catalog().tokens() {
                match token.alias_of {
                    Some(target) => println!("{:<8} alias of {target}", token.code),
                    None => println!("{:<8} {}", token.code, token.pattern),
                }
            }
            println!();
            println!("metrics: v Voc, j Jsc, f FF, p PCE, u Vmpp, i Jmpp, m Pmpp, r Rser, h Rshunt");
            println!("groups:  a sample, b cell, c direction, d ilum, e batch, g condition, s status");
        }
    }
    Ok(())
}
