//! # worldpng - World Snapshot Renderer
//!
//! Turns serialized world-simulation snapshots (`.world` files) into one PNG
//! image per grid layer: elevation, temperature, precipitation, rivers and
//! lakes.
//!
//! ## Features
//!
//! - **Unbounded by default**: large worlds decode without a size ceiling; an
//!   explicit limit can be configured
//! - **Memory-mapped input**: world files are decoded straight from a mapping
//! - **Skip-if-exists caching**: a world is only decoded when at least one of
//!   its layer images is missing
//! - **Transparent overlays**: rivers and lakes are written as RGBA, with cells
//!   outside the feature fully transparent
//!
//! ## Quick Start
//!
//! ```ignore
//! use worldpng::SnapshotProcessor;
//!
//! // Writes earth-height.png, earth-temp.png, earth-rain.png,
//! // earth-rivers.png and earth-lakes.png next to the input.
//! let report = SnapshotProcessor::new().process_file("earth.world")?;
//! println!("Rendered {} layers", report.rendered.len());
//! ```
//!
//! ## Colour Mapping
//!
//! Each layer is normalised against its own minimum and maximum:
//!
//! `level = round_half_up((value - min) * 255 / (max - min))`
//!
//! The level is written to all three colour channels. A layer where every
//! cell has the same value renders black. In the river and lake layers a
//! cell of exactly `0` means "no feature" and is fully transparent.
//!
//! ## Input Format
//!
//! A `.world` file is a single protobuf `World` record; see [`schema`] for
//! the fields that are read.

pub mod color;
pub mod decode;
pub mod error;
pub mod layer;
pub mod matrix;
pub mod png;
pub mod processor;
pub mod render;
pub mod schema;
pub mod snapshot;
pub mod stats;

// Re-export main types at crate root for convenience
pub use color::{Pixel, RenderPolicy};
pub use decode::SnapshotDecoder;
pub use error::{Result, WorldError};
pub use layer::Layer;
pub use matrix::{Matrix, ValueRange};
pub use processor::{scan_world_files, FileReport, ProcessorBuilder, SnapshotProcessor};
pub use render::{render, Raster};
pub use snapshot::Snapshot;
pub use stats::Distribution;
