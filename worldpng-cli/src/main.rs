use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use worldpng::Layer;

mod commands;

/// Render world snapshot files to PNG layer images
///
/// Writes <name>-height.png, <name>-temp.png, <name>-rain.png,
/// <name>-rivers.png and <name>-lakes.png next to each <name>.world file.
/// Layers that already exist are not rendered again.
#[derive(Parser)]
#[command(name = "worldpng")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// A .world file, or a directory containing .world files [default: current directory]
    path: Option<PathBuf>,

    /// Maximum world file size in bytes (unbounded if not set)
    #[arg(long, env = "WORLDPNG_SIZE_LIMIT")]
    size_limit: Option<u64>,

    /// Number of world files to process in parallel
    #[arg(short, long, env = "WORLDPNG_JOBS", default_value = "1")]
    jobs: usize,

    /// Only render these layers (comma-separated: height,temp,rain,rivers,lakes)
    #[arg(short, long, value_delimiter = ',')]
    layers: Vec<Layer>,

    /// Print the value distribution of one layer instead of rendering
    #[arg(long, value_name = "LAYER")]
    distribution: Option<Layer>,

    /// Buckets per unit value for --distribution
    #[arg(long, default_value = "10")]
    precision: u32,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "worldpng=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let target = cli.path.unwrap_or_else(|| PathBuf::from("."));

    match cli.distribution {
        Some(layer) => {
            commands::distribution::run(&target, layer, cli.precision, cli.size_limit)
        }
        None => commands::render::run(&target, cli.size_limit, cli.jobs, cli.layers),
    }
}
