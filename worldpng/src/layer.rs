//! The five image layers rendered from a snapshot.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::color::RenderPolicy;

/// File extension of world snapshot files (without the dot).
pub const WORLD_EXTENSION: &str = "world";

/// One output image of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Height,
    Temperature,
    Precipitation,
    Rivers,
    Lakes,
}

impl Layer {
    /// All layers, in render order.
    pub const ALL: [Layer; 5] = [
        Layer::Height,
        Layer::Precipitation,
        Layer::Temperature,
        Layer::Rivers,
        Layer::Lakes,
    ];

    /// Suffix used in the output file name (`<base>-<suffix>.png`).
    pub fn suffix(self) -> &'static str {
        match self {
            Layer::Height => "height",
            Layer::Temperature => "temp",
            Layer::Precipitation => "rain",
            Layer::Rivers => "rivers",
            Layer::Lakes => "lakes",
        }
    }

    /// Colour policy for this layer.
    pub fn policy(self) -> RenderPolicy {
        match self {
            Layer::Rivers | Layer::Lakes => RenderPolicy::ZeroIsTransparent,
            _ => RenderPolicy::Grayscale,
        }
    }

    /// Output path for this layer given the input's base name.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use worldpng::Layer;
    ///
    /// let path = Layer::Precipitation.output_path(Path::new("/maps/pangaea"));
    /// assert_eq!(path, Path::new("/maps/pangaea-rain.png"));
    /// ```
    pub fn output_path(self, base: &Path) -> PathBuf {
        let mut name = base.as_os_str().to_owned();
        name.push("-");
        name.push(self.suffix());
        name.push(".png");
        PathBuf::from(name)
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

impl FromStr for Layer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "height" | "elevation" => Ok(Layer::Height),
            "temp" | "temperature" => Ok(Layer::Temperature),
            "rain" | "precipitation" => Ok(Layer::Precipitation),
            "rivers" | "river" => Ok(Layer::Rivers),
            "lakes" | "lake" => Ok(Layer::Lakes),
            other => Err(format!(
                "unknown layer '{}' (expected height, temp, rain, rivers or lakes)",
                other
            )),
        }
    }
}

/// Strip a trailing `.world` extension to get the base path for outputs.
///
/// Paths with any other extension are returned unchanged.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use worldpng::layer::base_path;
///
/// assert_eq!(base_path(Path::new("dir/earth.world")), Path::new("dir/earth"));
/// assert_eq!(base_path(Path::new("dir/earth.bin")), Path::new("dir/earth.bin"));
/// ```
pub fn base_path(input: &Path) -> PathBuf {
    match input.extension() {
        Some(ext) if ext == WORLD_EXTENSION => input.with_extension(""),
        _ => input.to_path_buf(),
    }
}

/// Returns true if `path` has the `.world` extension.
pub fn is_world_file(path: &Path) -> bool {
    path.extension().map(|e| e == WORLD_EXTENSION).unwrap_or(false)
}
