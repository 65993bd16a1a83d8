use anyhow::{bail, Context, Result};
use std::path::Path;
use worldpng::{Distribution, Layer, ProcessorBuilder};

pub fn run(input: &Path, layer: Layer, precision: u32, size_limit: Option<u64>) -> Result<()> {
    if !input.is_file() {
        bail!("--distribution needs a single .world file, got: {}", input.display());
    }

    let mut builder = ProcessorBuilder::from_env();
    if size_limit.is_some() {
        builder = builder.size_limit(size_limit);
    }
    let processor = builder.build();

    let snapshot = processor
        .decoder()
        .decode_file(input)
        .with_context(|| format!("Failed to decode {}", input.display()))?;

    let dist = Distribution::of(snapshot.matrix(layer), precision)
        .with_context(|| format!("Cannot compute distribution of layer '{}'", layer))?;

    for line in format_buckets(&dist) {
        println!("{}", line);
    }
    Ok(())
}

/// One `value<TAB>count` line per bucket.
///
/// Values print in their shortest exact form, so adjacent buckets stay
/// distinct at any precision.
fn format_buckets(dist: &Distribution) -> Vec<String> {
    dist.buckets()
        .map(|(value, count)| format!("{}\t{}", value, count))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use worldpng::Matrix;

    #[test]
    fn test_format_buckets() {
        let m = Matrix::from_rows("t", [[0.0, 0.2, 0.2]]).unwrap();
        let dist = Distribution::of(&m, 10).unwrap();
        assert_eq!(format_buckets(&dist), vec!["0\t1", "0.1\t0", "0.2\t2"]);

        let dist = Distribution::of(&m, 1).unwrap();
        assert_eq!(format_buckets(&dist), vec!["0\t3"]);
    }

    #[test]
    fn test_format_buckets_quarter_precision() {
        let m = Matrix::from_rows("t", [[0.0, 0.25, 0.5, 0.75]]).unwrap();
        let dist = Distribution::of(&m, 4).unwrap();
        assert_eq!(
            format_buckets(&dist),
            vec!["0\t1", "0.25\t1", "0.5\t1", "0.75\t1"]
        );

        let m = Matrix::from_rows("t", [[-1.0, 1.0]]).unwrap();
        let lines = format_buckets(&Distribution::of(&m, 3).unwrap());
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "-1\t1");
        assert_eq!(lines[6], "1\t1");
    }
}
