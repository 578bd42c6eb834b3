use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{ConversionError, IoResultExt, Result};

/// An icon source found on disk.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResolvedSource {
    /// Where the source lives.
    pub path: PathBuf,
    /// Whether the source is a directory of pre-rendered sizes.
    pub is_dir: bool,
}

impl ResolvedSource {
    /// Returns true if the path ends with `extension` (including the dot).
    pub fn has_extension(&self, extension: &str) -> bool {
        self.path.to_string_lossy().ends_with(extension)
    }
}

/// Outcome of looking for a single candidate.
#[derive(Debug)]
pub(crate) enum Probe {
    Found(ResolvedSource),
    NotFound,
}

/// Finds the first candidate that exists, trying every root in order for
/// each relative candidate before moving on to the next candidate.
///
/// When a candidate exists nowhere and `fallback_extension` is given, the
/// candidate is tried again with the extension appended (so `"icon"` with
/// `".icns"` also tries `"icon.icns"`).  The candidate `"icons"` with
/// `".png"` is retried as `"icon.png"`.
pub fn resolve_source<S, R>(candidates: &[S],
                            roots: &[R],
                            fallback_extension: Option<&str>)
                            -> Result<ResolvedSource>
    where S: AsRef<str>,
          R: AsRef<Path>
{
    for candidate in candidates {
        let candidate = candidate.as_ref();
        if let Probe::Found(source) = probe_candidate(candidate, roots)? {
            return Ok(source);
        }
        if let Some(extension) = fallback_extension {
            let with_extension = fallback_name(candidate, extension);
            if let Probe::Found(source) = probe_candidate(&with_extension,
                                                          roots)? {
                return Ok(source);
            }
        }
    }
    let names: Vec<&str> = candidates.iter().map(|c| c.as_ref()).collect();
    Err(ConversionError::SourceNotFound { candidates: names.join(", ") })
}

fn fallback_name(candidate: &str, extension: &str) -> String {
    if extension == ".png" && candidate == "icons" {
        "icon.png".to_string()
    } else {
        format!("{}{}", candidate, extension)
    }
}

fn probe_candidate<R: AsRef<Path>>(candidate: &str,
                                   roots: &[R])
                                   -> Result<Probe> {
    let candidate_path = Path::new(candidate);
    if candidate_path.is_absolute() {
        return probe_path(candidate_path);
    }
    for root in roots {
        let resolved = root.as_ref().join(candidate_path);
        if let Probe::Found(source) = probe_path(&resolved)? {
            return Ok(Probe::Found(source));
        }
    }
    Ok(Probe::NotFound)
}

fn probe_path(path: &Path) -> Result<Probe> {
    match fs::metadata(path) {
        Ok(metadata) => {
            Ok(Probe::Found(ResolvedSource {
                path: path.to_path_buf(),
                is_dir: metadata.is_dir(),
            }))
        }
        Err(error) if error.kind() == ErrorKind::NotFound => {
            log::debug!("tried resolved path {}, but it does not exist",
                        path.display());
            Ok(Probe::NotFound)
        }
        Err(error) => Err(error).context("cannot stat", path),
    }
}
