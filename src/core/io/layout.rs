use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use stats::SizeLabel;

pub const SORTED_DIR: &str = "sorted";
pub const TIMES_DIR: &str = "execution-times";
pub const EXECUTION_TIME_FILE: &str = "executionTime.txt";
pub const AVERAGE_TIME_FILE: &str = "averageExecutionTime.txt";
pub const AVERAGE_CHART_FILE: &str = "averageExecutionTime.svg";

/// Where batch outputs land under an output root:
///
/// ```text
/// <root>/sorted/<label>/<stem>-sorted.txt
/// <root>/execution-times/<label>/<stem>-exe-time.txt
/// <root>/executionTime.txt
/// <root>/averageExecutionTime.txt
/// <root>/averageExecutionTime.svg
/// ```
///
/// Labels are joined in as directory names; check them with
/// [`is_plain_component`] first.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn sorted_path(&self, label: &SizeLabel, input: &Path) -> PathBuf {
        self.root
            .join(SORTED_DIR)
            .join(label.as_str())
            .join(format!("{}-sorted.txt", file_stem(input)))
    }

    pub fn time_path(&self, label: &SizeLabel, input: &Path) -> PathBuf {
        self.root
            .join(TIMES_DIR)
            .join(label.as_str())
            .join(format!("{}-exe-time.txt", file_stem(input)))
    }

    pub fn execution_time_report_path(&self) -> PathBuf {
        self.root.join(EXECUTION_TIME_FILE)
    }

    pub fn average_time_report_path(&self) -> PathBuf {
        self.root.join(AVERAGE_TIME_FILE)
    }

    pub fn average_chart_path(&self) -> PathBuf {
        self.root.join(AVERAGE_CHART_FILE)
    }
}

/// File name without its last extension; the whole name if there is none
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string())
}

/// True if `name` is a single ordinary path component, so joining it onto a
/// directory can never leave that directory.
pub fn is_plain_component(name: &str) -> bool {
    if name.contains(['/', '\\', '\0']) {
        return false;
    }
    let mut parts = Path::new(name).components();
    matches!(
        (parts.next(), parts.next()),
        (Some(Component::Normal(part)), None) if part == name
    )
}

/// Size label taken from a `<size>-<index>.txt` style file name
pub fn infer_label(path: &Path) -> Option<SizeLabel> {
    let name = path.file_name()?.to_str()?;
    let (prefix, _) = name.split_once('-')?;
    if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(SizeLabel::new(prefix))
}

/// Regular, non-hidden files of a directory in file-name order
pub fn list_input_files<P: AsRef<Path>>(dir: P) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        files.push(entry.path());
    }
    files.sort();
    Ok(files)
}
