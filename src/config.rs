use image::imageops::FilterType;
use std::env;
use std::path::PathBuf;

use crate::convert::OutputFormat;

/// Tunable settings for a conversion.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Directory that receives generated files.
    pub output_dir: PathBuf,
    /// Resampling filter used for every downscale.
    pub resize_filter: FilterType,
    /// Minimum width and height of a source image used for ICNS output.
    pub icns_min_size: u32,
    /// Minimum width and height of a source image for every other format.
    pub min_size: u32,
    /// Largest dimension written into an ICO file.
    pub ico_max_size: u32,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            output_dir: env::temp_dir(),
            resize_filter: FilterType::Lanczos3,
            icns_min_size: 512,
            min_size: 256,
            ico_max_size: 256,
        }
    }
}

impl ConvertConfig {
    /// Sets the directory that receives generated files.
    pub fn with_output_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Sets the resampling filter.
    pub fn with_resize_filter(mut self, filter: FilterType) -> Self {
        self.resize_filter = filter;
        self
    }

    /// Returns the minimum source dimension required for `format`.
    pub fn min_size_for(&self, format: &OutputFormat) -> u32 {
        match format {
            OutputFormat::Icns => self.icns_min_size,
            _ => self.min_size,
        }
    }
}
