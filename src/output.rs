//! Fresh output files that only appear under their final name once they
//! have been completely written.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{IoResultExt, Result};

const FILE_PREFIX: &str = "icon-";
const PART_SUFFIX: &str = ".part";
const MAX_NAME_ATTEMPTS: usize = 64;

static COUNTER: AtomicUsize = AtomicUsize::new(0);

/// A new, uniquely named file being written in an output directory.
///
/// Data goes to a `.part` sibling; [`OutputFile::commit`] syncs it and
/// renames it into place.  Dropping an uncommitted file removes the partial
/// data.
pub(crate) struct OutputFile {
    path: PathBuf,
    part_path: PathBuf,
    writer: BufWriter<File>,
    committed: bool,
}

impl OutputFile {
    /// Creates a file in `dir` whose final name ends with `suffix`.
    pub(crate) fn create(dir: &Path, suffix: &str) -> Result<OutputFile> {
        fs::create_dir_all(dir).context("cannot create output directory", dir)?;
        let mut attempt = 0;
        loop {
            let path = dir.join(unique_name(suffix));
            let part_path = part_path_for(&path);
            let opened = OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&part_path);
            match opened {
                Ok(file) => {
                    return Ok(OutputFile {
                        path,
                        part_path,
                        writer: BufWriter::new(file),
                        committed: false,
                    });
                }
                Err(error) if error.kind() == ErrorKind::AlreadyExists &&
                              attempt < MAX_NAME_ATTEMPTS => {
                    attempt += 1;
                }
                Err(error) => {
                    return Err(error).context("cannot create output file",
                                              &part_path);
                }
            }
        }
    }

    /// The name the file will have once committed.
    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the writer for the file contents.
    pub(crate) fn writer(&mut self) -> &mut BufWriter<File> {
        &mut self.writer
    }

    /// Flushes and syncs the data, then moves the file to its final name.
    pub(crate) fn commit(mut self) -> Result<PathBuf> {
        self.writer.flush().context("cannot write", &self.part_path)?;
        self.writer.get_ref()
            .sync_all()
            .context("cannot sync", &self.part_path)?;
        fs::rename(&self.part_path, &self.path)
            .context("cannot move output file into place", &self.path)?;
        self.committed = true;
        Ok(self.path.clone())
    }
}

impl Drop for OutputFile {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.part_path);
        }
    }
}

/// Writes `bytes` to a new file in `dir` and returns its final path.
pub(crate) fn write_output(dir: &Path,
                           suffix: &str,
                           bytes: &[u8])
                           -> Result<PathBuf> {
    let mut output = OutputFile::create(dir, suffix)?;
    output.writer()
        .write_all(bytes)
        .context("cannot write", output.path())?;
    output.commit()
}

fn unique_name(suffix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.subsec_nanos())
        .unwrap_or(0);
    let count = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{}{}-{}-{:08x}{}",
            FILE_PREFIX,
            process::id(),
            count,
            nanos,
            suffix)
}

fn part_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(PART_SUFFIX);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir()
            .join(format!("icon-convert-output-{}-{}", name, process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn committed_file_has_final_name() {
        let dir = scratch_dir("commit");
        let path = write_output(&dir, ".icns", b"icns\0\0\0\x08").unwrap();
        assert!(path.to_string_lossy().ends_with(".icns"));
        assert_eq!(fs::read(&path).unwrap(), b"icns\0\0\0\x08");
        assert!(!part_path_for(&path).exists());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn dropped_file_leaves_nothing() {
        let dir = scratch_dir("drop");
        let (path, part) = {
            let mut output = OutputFile::create(&dir, ".ico").unwrap();
            output.writer().write_all(b"partial").unwrap();
            (output.path().to_path_buf(), part_path_for(output.path()))
        };
        assert!(!path.exists());
        assert!(!part.exists());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn names_are_unique() {
        assert_ne!(unique_name(".png"), unique_name(".png"));
    }
}
