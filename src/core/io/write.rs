use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
#[error("cannot write output file {}: {source}", path.display())]
pub struct WriteError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Writes contents to a file, creating parent directories if they don't exist.
///
/// # Arguments
///
/// * `path` - Path to the file to write.
/// * `contents` - Data to write to the file.
///
/// # Returns
///
/// `Ok(())` on success, or a `WriteError` naming the path on failure.
pub fn write_file<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<(), WriteError> {
    let path = path.as_ref();
    write_file_impl(path, contents.as_ref()).map_err(|source| WriteError {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file_impl(path: &Path, contents: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut file = File::create(path)?;
    file.write_all(contents)?;
    Ok(())
}

/// Space-separated values on a single line
pub fn format_sequence(data: &[f64]) -> String {
    let mut out = data
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    out.push('\n');
    out
}

/// Write a sorted sequence as one space-separated line
pub fn write_sorted<P: AsRef<Path>>(path: P, data: &[f64]) -> Result<(), WriteError> {
    write_file(path, format_sequence(data))
}

/// Write a single elapsed-milliseconds value
pub fn write_elapsed<P: AsRef<Path>>(path: P, elapsed_ms: f64) -> Result<(), WriteError> {
    write_file(path, format!("{}\n", elapsed_ms))
}
