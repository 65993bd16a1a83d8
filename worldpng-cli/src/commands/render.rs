use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;
use worldpng::{scan_world_files, FileReport, Layer, ProcessorBuilder, SnapshotProcessor, WorldError};

/// Result of one input file, kept for the final summary.
enum Outcome {
    Processed(FileReport),
    Failed(PathBuf, WorldError),
}

pub fn run(
    target: &Path,
    size_limit: Option<u64>,
    jobs: usize,
    layers: Vec<Layer>,
) -> Result<()> {
    let mut builder = ProcessorBuilder::from_env();
    if size_limit.is_some() {
        builder = builder.size_limit(size_limit);
    }
    if !layers.is_empty() {
        builder = builder.layers(layers);
    }
    let processor = builder.build();

    if !target.exists() {
        bail!(
            "Could not locate specified file or directory: {}",
            target.display()
        );
    }

    if !target.is_dir() {
        let outcome = process_one(&processor, target);
        println!("{}", describe(&outcome));
        return Ok(());
    }

    let files = scan_world_files(target)
        .with_context(|| format!("Failed to read directory {}", target.display()))?;

    if files.is_empty() {
        println!("Did not find any *.world files in: {}", target.display());
        return Ok(());
    }

    let outcomes = process_batch(&processor, &files, jobs)?;
    print_summary(&outcomes);
    Ok(())
}

fn process_one(processor: &SnapshotProcessor, input: &Path) -> Outcome {
    match processor.process_file(input) {
        Ok(report) => Outcome::Processed(report),
        Err(e) => Outcome::Failed(input.to_path_buf(), e),
    }
}

fn process_batch(
    processor: &SnapshotProcessor,
    files: &[PathBuf],
    jobs: usize,
) -> Result<Vec<Outcome>> {
    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
            )?
            .progress_chars("#>-"),
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs.max(1))
        .build()
        .context("Failed to create worker pool")?;
    debug!(files = files.len(), jobs = pool.current_num_threads(), "starting batch");

    // Each file is independent; order of completion does not matter.
    let outcomes: Vec<Outcome> = pool.install(|| {
        files
            .par_iter()
            .map(|file| {
                pb.set_message(display_name(file));
                let outcome = process_one(processor, file);
                pb.println(describe(&outcome));
                pb.inc(1);
                outcome
            })
            .collect()
    });

    pb.finish_with_message("done");
    Ok(outcomes)
}

fn describe(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Failed(path, e) => format!("{}: error: {}", display_name(path), e),
        Outcome::Processed(report) if report.is_up_to_date() => {
            format!("{}: up to date", display_name(&report.input))
        }
        Outcome::Processed(report) => {
            let mut line = format!(
                "{}: rendered [{}] in {}ms",
                display_name(&report.input),
                join_layers(&report.rendered),
                report.elapsed_ms
            );
            if !report.skipped.is_empty() {
                line.push_str(&format!(", kept [{}]", join_layers(&report.skipped)));
            }
            if !report.empty.is_empty() {
                line.push_str(&format!(", no data [{}]", join_layers(&report.empty)));
            }
            for (layer, e) in &report.failed {
                line.push_str(&format!("\n  {} failed: {}", layer, e));
            }
            line
        }
    }
}

fn print_summary(outcomes: &[Outcome]) {
    let mut up_to_date = 0;
    let mut rendered_files = 0;
    let mut rendered_layers = 0;
    let mut failed_files = 0;
    let mut failed_layers = 0;

    for outcome in outcomes {
        match outcome {
            Outcome::Failed(..) => failed_files += 1,
            Outcome::Processed(report) => {
                if report.is_up_to_date() {
                    up_to_date += 1;
                } else {
                    rendered_files += 1;
                }
                rendered_layers += report.rendered.len();
                failed_layers += report.failed.len();
            }
        }
    }

    println!();
    println!("Summary:");
    println!("  World files: {}", outcomes.len());
    println!(
        "  Rendered: {} layers from {} files",
        rendered_layers, rendered_files
    );
    if up_to_date > 0 {
        println!("  Up to date: {}", up_to_date);
    }
    if failed_layers > 0 {
        println!("  Failed layers: {}", failed_layers);
    }
    if failed_files > 0 {
        println!("  Unreadable files: {}", failed_files);
    }
}

fn join_layers(layers: &[Layer]) -> String {
    layers
        .iter()
        .map(|l| l.suffix())
        .collect::<Vec<_>>()
        .join(", ")
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
