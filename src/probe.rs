//! Cheap checks on source files: format sniffing from leading bytes,
//! header-only dimension reads, and decoding with the minimum-size check.

use byteorder::{ByteOrder, LittleEndian};
use image::{DynamicImage, GenericImageView, ImageReader};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{ConversionError, IoResultExt, Result};
use crate::family::ICNS_MAGIC_LITERAL;

/// The signature that all PNG files start with.
const PNG_SIGNATURE: &[u8; 8] = b"\x89PNG\r\n\x1a\n";

/// The first four bytes of an ICO file (reserved word, then type 1).
const ICO_SIGNATURE: &[u8; 4] = &[0, 0, 1, 0];

const ICO_HEADER_LENGTH: usize = 6;
const ICO_ENTRY_LENGTH: usize = 16;

/// How many leading bytes are read to sniff a file's format.
pub(crate) const SNIFF_LENGTH: u64 = 512;

/// Reads at most `limit` bytes from the start of a file.
pub(crate) fn read_head(path: &Path, limit: u64) -> Result<Vec<u8>> {
    let file = File::open(path).context("cannot open", path)?;
    let mut head = Vec::with_capacity(limit as usize);
    file.take(limit)
        .read_to_end(&mut head)
        .context("cannot read", path)?;
    Ok(head)
}

/// Returns true if the bytes start like a PNG file.
pub fn is_png(bytes: &[u8]) -> bool {
    bytes.starts_with(PNG_SIGNATURE)
}

/// Returns true if the bytes start like an ICNS file.
pub fn is_icns(bytes: &[u8]) -> bool {
    bytes.starts_with(ICNS_MAGIC_LITERAL)
}

/// Returns true if the bytes start like an ICO file.
pub fn is_ico(bytes: &[u8]) -> bool {
    bytes.len() >= ICO_HEADER_LENGTH && bytes.starts_with(ICO_SIGNATURE)
}

/// Lists the (width, height) of every image an ICO file declares in its
/// directory.  Entries that do not fit in `bytes` are left out.  A stored
/// dimension of zero means 256.
pub fn ico_declared_sizes(bytes: &[u8]) -> Vec<(u32, u32)> {
    if !is_ico(bytes) {
        return Vec::new();
    }
    let count = LittleEndian::read_u16(&bytes[4..6]) as usize;
    bytes[ICO_HEADER_LENGTH..]
        .chunks_exact(ICO_ENTRY_LENGTH)
        .take(count)
        .map(|entry| (ico_dimension(entry[0]), ico_dimension(entry[1])))
        .collect()
}

fn ico_dimension(stored: u8) -> u32 {
    if stored == 0 { 256 } else { u32::from(stored) }
}

/// Reads an image's width and height from its header, without decoding
/// the pixel data.
pub(crate) fn image_dimensions(path: &Path) -> Result<(u32, u32)> {
    ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .context("cannot open image", path)?
        .into_dimensions()
        .map_err(|e| ConversionError::decode(path, e))
}

/// Fully decodes an image.
pub(crate) fn decode_image(path: &Path) -> Result<DynamicImage> {
    ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .context("cannot open image", path)?
        .decode()
        .map_err(|e| ConversionError::decode(path, e))
}

/// Decodes an image, failing if either dimension is below `min_size`.
pub(crate) fn load_image(path: &Path, min_size: u32) -> Result<DynamicImage> {
    let image = decode_image(path)?;
    let (width, height) = image.dimensions();
    if width < min_size || height < min_size {
        return Err(ConversionError::SizeTooSmall {
            path: path.to_path_buf(),
            required: min_size,
            actual: width.min(height),
        });
    }
    log::debug!("decoded {} ({}x{})", path.display(), width, height);
    Ok(image)
}

/// Checks that a file is at least `min_size` pixels in both dimensions
/// without decoding pixels.  An ICO file passes if any image it declares is
/// large enough.
pub(crate) fn validate_image_size(path: &Path, min_size: u32) -> Result<()> {
    let head = read_head(path, SNIFF_LENGTH)?;
    let actual = if is_ico(&head) {
        ico_declared_sizes(&head)
            .into_iter()
            .map(|(width, height)| width.min(height))
            .max()
            .unwrap_or(0)
    } else {
        let (width, height) = image_dimensions(path)?;
        width.min(height)
    };
    if actual >= min_size {
        Ok(())
    } else {
        Err(ConversionError::SizeTooSmall {
            path: path.to_path_buf(),
            required: min_size,
            actual,
        })
    }
}
