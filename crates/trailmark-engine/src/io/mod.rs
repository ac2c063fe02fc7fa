use relative_path::{RelativePath, RelativePathBuf};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid scan root: {0}")]
    InvalidRoot(String),
    #[error("Path escapes scan root: {0}")]
    OutsideRoot(PathBuf),
}

/// Read a source file and return its content
pub fn read_file(relative_path: &RelativePath, root: &Path) -> Result<String, IoError> {
    let absolute_path = relative_path.to_path(root);
    if !absolute_path.exists() {
        return Err(IoError::NotFound(absolute_path));
    }
    fs::read_to_string(&absolute_path).map_err(IoError::Io)
}

/// Write content back to a source file
pub fn write_file(relative_path: &RelativePath, root: &Path, content: &str) -> Result<(), IoError> {
    let absolute_path = relative_path.to_path(root);
    fs::write(&absolute_path, content).map_err(IoError::Io)
}

/// Scan for source files under `root` with one of the given extensions.
/// Results are root-relative and sorted.
pub fn scan_source_files(
    root: &Path,
    extensions: &[String],
) -> Result<Vec<RelativePathBuf>, IoError> {
    validate_root(root)?;

    let mut files = Vec::new();
    scan_directory_recursive(root, extensions, &mut files)?;
    files.sort();

    files
        .into_iter()
        .map(|path| {
            let relative = path
                .strip_prefix(root)
                .map_err(|_| IoError::OutsideRoot(path.clone()))?;
            RelativePathBuf::from_path(relative).map_err(|_| IoError::OutsideRoot(path.clone()))
        })
        .collect()
}

fn scan_directory_recursive(
    dir: &Path,
    extensions: &[String],
    files: &mut Vec<PathBuf>,
) -> Result<(), IoError> {
    let entries = fs::read_dir(dir).map_err(IoError::Io)?;

    for entry in entries {
        let entry = entry.map_err(IoError::Io)?;
        let path = entry.path();

        if path.is_dir() {
            scan_directory_recursive(&path, extensions, files)?;
        } else if let Some(ext) = path.extension()
            && extensions.iter().any(|e| ext == e.as_str())
        {
            files.push(path);
        }
    }

    Ok(())
}

pub fn validate_root(path: &Path) -> Result<(), IoError> {
    if !path.exists() || !path.is_dir() {
        return Err(IoError::InvalidRoot(format!(
            "{} is not a directory",
            path.display()
        )));
    }

    Ok(())
}
