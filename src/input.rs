use image::DynamicImage;
use once_cell::unsync::OnceCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::CanonicalSize;
use crate::config::ConvertConfig;
use crate::error::{ConversionError, IoResultExt, Result};
use crate::pngio;
use crate::probe;

/// Working state of a single conversion: the largest available image and
/// any sizes that already exist as files.
pub(crate) struct InputInfo {
    /// Width of the largest available image.
    pub(crate) max_size: u32,
    /// File holding the largest available image.
    pub(crate) max_path: PathBuf,
    /// Files that already hold an exact size.
    pub(crate) size_to_path: BTreeMap<u32, PathBuf>,
    /// The largest image, decoded at most once.
    max_image: OnceCell<DynamicImage>,
    /// Minimum dimension enforced if `max_image` is decoded lazily.  Zero
    /// disables the check.
    min_size: u32,
}

impl InputInfo {
    /// Builds the input from pre-rendered files, sorted by ascending size.
    /// The largest becomes the master but is not decoded until needed.
    pub(crate) fn from_sized_files(files: BTreeMap<u32, PathBuf>,
                                   min_size: u32)
                                   -> Option<InputInfo> {
        let (&max_size, max_path) = files.iter().next_back()?;
        let max_path = max_path.clone();
        Some(InputInfo {
            max_size,
            max_path,
            size_to_path: files,
            max_image: OnceCell::new(),
            min_size,
        })
    }

    /// Builds the input from an already decoded master image read from
    /// `path`.  The file itself is only reused for its size when the image
    /// is square.
    pub(crate) fn from_image(path: &Path,
                             image: DynamicImage,
                             min_size: u32)
                             -> InputInfo {
        let max_size = image.width();
        let mut size_to_path = BTreeMap::new();
        if image.width() == image.height() {
            size_to_path.insert(max_size, path.to_path_buf());
        }
        InputInfo {
            max_size,
            max_path: path.to_path_buf(),
            size_to_path,
            max_image: OnceCell::with_value(image),
            min_size,
        }
    }

    /// Returns the master image, decoding it on first use.
    pub(crate) fn max_image(&self) -> Result<&DynamicImage> {
        self.max_image
            .get_or_try_init(|| probe::load_image(&self.max_path, self.min_size))
    }

    /// Produces the PNG payload for one ICNS size.
    ///
    /// A file that already holds the exact size is used as is if it is a
    /// PNG, and re-encoded otherwise.  Every other size is resized down
    /// from the master image.
    pub(crate) fn png_payload(&self,
                              size: CanonicalSize,
                              config: &ConvertConfig)
                              -> Result<Vec<u8>> {
        let pixels = size.pixels();
        if let Some(path) = self.size_to_path.get(&pixels) {
            let bytes = fs::read(path).context("cannot read", path)?;
            if probe::is_png(&bytes) {
                log::debug!("reusing {} for {}x{}", path.display(), pixels,
                            pixels);
                return Ok(bytes);
            }
            log::debug!("re-encoding {} as PNG for {}x{}",
                        path.display(),
                        pixels,
                        pixels);
            let image = image::load_from_memory(&bytes)
                .map_err(|e| ConversionError::decode(path, e))?;
            return encode(&image, path);
        }

        log::debug!("resizing {} to {}x{}",
                    self.max_path.display(),
                    pixels,
                    pixels);
        let resized = self.max_image()?
            .resize_exact(pixels, pixels, config.resize_filter);
        encode(&resized, &self.max_path)
    }
}

fn encode(image: &DynamicImage, source: &Path) -> Result<Vec<u8>> {
    pngio::encode_png(image).context("cannot encode PNG from", source)
}
