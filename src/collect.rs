use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::convert::IconArtifact;
use crate::error::{ConversionError, IoResultExt, Result};
use crate::family::IconFamily;
use crate::output;
use crate::probe;

/// Matches a `WIDTHxHEIGHT` dimension in a file name, such as the `256x256`
/// in `icon_256x256.png`.
static DIMENSIONS_IN_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+)x(\d+)").expect("valid dimension pattern")
});

/// Collects the PNG files in a directory, keeping one file per distinct
/// size, ordered by ascending size.
///
/// A file's size is the width in its image header.  When two files share a
/// size, the first by file name wins.
pub fn collect_sized_files(dir: &Path) -> Result<Vec<IconArtifact>> {
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir).context("cannot read directory", dir)? {
        let path = entry.context("cannot read directory", dir)?.path();
        if is_png_name(&path) &&
           fs::metadata(&path).context("cannot stat", &path)?.is_file() {
            paths.push(path);
        } else {
            log::debug!("skipping {}: not a PNG file", path.display());
        }
    }
    paths.sort();

    let mut by_size: BTreeMap<u32, PathBuf> = BTreeMap::new();
    for path in paths {
        let size = file_size(&path)?;
        if by_size.contains_key(&size) {
            log::debug!("skipping {}: size {} already collected",
                        path.display(),
                        size);
            continue;
        }
        by_size.insert(size, path);
    }

    Ok(by_size.into_iter()
        .map(|(size, path)| IconArtifact::sized(path, size))
        .collect())
}

/// The header width wins over a `NxN` in the name; a mismatch is only
/// reported.
fn file_size(path: &Path) -> Result<u32> {
    let (width, height) = probe::image_dimensions(path)?;
    if let Some(named) = size_from_name(path) {
        if named != width {
            log::warn!("{} is named {}x{} but holds a {}x{} image",
                       path.display(),
                       named,
                       named,
                       width,
                       height);
        }
    }
    Ok(width)
}

fn is_png_name(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .map_or(false, |extension| extension.eq_ignore_ascii_case("png"))
}

fn size_from_name(path: &Path) -> Option<u32> {
    let name = path.file_name()?.to_str()?;
    let captures = DIMENSIONS_IN_NAME.captures(name)?;
    captures[1].parse().ok()
}

/// Writes every PNG-encoded icon of an ICNS file to its own PNG file in
/// `output_dir`, one per distinct size, ordered by ascending size.
///
/// Elements this crate does not produce, and elements whose payload is not
/// a PNG file, are skipped.
pub fn extract_icns_to_png_set(path: &Path,
                               output_dir: &Path)
                               -> Result<Vec<IconArtifact>> {
    let file = File::open(path).context("cannot open", path)?;
    let family = IconFamily::read(BufReader::new(file))
        .map_err(|e| ConversionError::decode(path, e))?;

    let mut by_size = BTreeMap::new();
    for element in &family.elements {
        let size = match element.canonical_size() {
            Some(size) if element.is_png() => size,
            _ => {
                log::warn!("skipping '{}' element of {}: not a PNG icon",
                           element.ostype,
                           path.display());
                continue;
            }
        };
        by_size.entry(size).or_insert(&element.data);
    }
    if by_size.is_empty() {
        return Err(ConversionError::decode(path,
                                           "ICNS file contains no PNG icons"));
    }

    let mut artifacts = Vec::with_capacity(by_size.len());
    for (size, data) in by_size {
        let suffix = format!("_{0}x{0}.png", size.pixels());
        let written = output::write_output(output_dir, &suffix, data)?;
        log::info!("extracted {}x{} icon to {}",
                   size.pixels(),
                   size.pixels(),
                   written.display());
        artifacts.push(IconArtifact::sized(written, size.pixels()));
    }
    Ok(artifacts)
}
