//! Basic example demonstrating worldpng library usage.
//!
//! Writes a small synthetic world to the given directory and renders it.
//!
//! Run with: cargo run --example basic -- /tmp/worlds

use std::env;
use std::path::PathBuf;

use worldpng::{Distribution, Layer, Matrix, Snapshot, SnapshotProcessor, WorldError};

const SIZE: usize = 64;

fn grid(name: &'static str, f: impl Fn(usize, usize) -> f64) -> Result<Matrix, WorldError> {
    let rows: Vec<Vec<f64>> = (0..SIZE)
        .map(|y| (0..SIZE).map(|x| f(x, y)).collect())
        .collect();
    Matrix::from_rows(name, rows)
}

fn main() -> Result<(), WorldError> {
    let out_dir = env::args().nth(1).map(PathBuf::from).unwrap_or_else(|| {
        eprintln!("Usage: cargo run --example basic -- /path/to/output");
        std::process::exit(1);
    });
    std::fs::create_dir_all(&out_dir)?;

    let center = SIZE as f64 / 2.0;
    let snapshot = Snapshot {
        name: Some("example".to_string()),
        width: Some(SIZE as i32),
        height: Some(SIZE as i32),
        height_map: grid("heightMapData", |x, y| {
            let d = ((x as f64 - center).powi(2) + (y as f64 - center).powi(2)).sqrt();
            (center - d).max(0.0)
        })?,
        temperature: grid("temperatureData", |_, y| 1.0 - (y as f64 - center).abs() / center)?,
        precipitation: grid("precipitationData", |x, _| x as f64 / SIZE as f64)?,
        rivers: grid("rivermap", |x, y| if x == y { (x + 1) as f64 } else { 0.0 })?,
        lakes: grid("lakemap", |x, y| {
            if (20..26).contains(&x) && (40..46).contains(&y) {
                1.0
            } else {
                0.0
            }
        })?,
    };

    let input = out_dir.join("example.world");
    std::fs::write(&input, snapshot.encode_to_vec())?;

    let report = SnapshotProcessor::new().process_file(&input)?;
    println!("Rendered layers: {:?}", report.rendered);
    println!("Skipped layers:  {:?}", report.skipped);

    println!("\nTemperature distribution:");
    let dist = Distribution::of(snapshot.matrix(Layer::Temperature), 10)?;
    for (value, count) in dist.buckets() {
        println!("  {:>5.1}\t{}", value, count);
    }

    Ok(())
}
