//! File I/O for the pipeline: decoded reads, atomic writes, flat listings.

use std::io;
use std::path::{Component, Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;
use walkdir::WalkDir;

/// Errors during file system operations.
#[derive(Debug, Error)]
pub enum FsError {
    #[error("file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("file is not valid UTF-8: {path}")]
    InvalidEncoding { path: PathBuf },

    #[error("atomic write failed for {path}: {source}")]
    AtomicWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FsError {
    fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => FsError::NotFound { path: path.into() },
            io::ErrorKind::PermissionDenied => FsError::PermissionDenied { path: path.into() },
            _ => FsError::Io {
                path: path.into(),
                source: error,
            },
        }
    }
}

/// Reads a file as UTF-8 text. A decode failure is surfaced with the path so
/// the run can abort naming the offending file.
pub fn read_text(path: &Path) -> Result<String, FsError> {
    let bytes = std::fs::read(path).map_err(|e| FsError::from_io(path, e))?;
    String::from_utf8(bytes).map_err(|_| FsError::InvalidEncoding { path: path.into() })
}

/// Writes text to a file atomically: the content lands in a temp file in the
/// same directory and is renamed over the target, so a crash mid-write never
/// leaves a half-rewritten note.
pub fn write_text(path: &Path, contents: &str) -> Result<(), FsError> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let mut tmp = match dir {
        Some(dir) => NamedTempFile::new_in(dir),
        None => NamedTempFile::new(),
    }
    .map_err(|source| FsError::AtomicWrite {
        path: path.into(),
        source,
    })?;
    io::Write::write_all(&mut tmp, contents.as_bytes()).map_err(|source| {
        FsError::AtomicWrite {
            path: path.into(),
            source,
        }
    })?;
    tmp.persist(path).map_err(|e| FsError::AtomicWrite {
        path: path.into(),
        source: e.error,
    })?;
    Ok(())
}

/// Lists the files directly inside `dir` whose names end with one of the
/// given extensions (case-insensitive). The result is sorted so runs are
/// deterministic regardless of platform directory order.
pub fn files_with_extensions(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>, FsError> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| {
            let source = e
                .into_io_error()
                .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "walkdir error"));
            FsError::from_io(dir, source)
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_lowercase();
        if extensions.iter().any(|ext| name.ends_with(ext.as_str())) {
            paths.push(entry.into_path());
        }
    }
    paths.sort();
    Ok(paths)
}

/// Writes `contents` to `dir/file_name` only when the file does not already
/// exist, so user customizations are never overwritten. Returns the path
/// either way.
pub fn provide_default_file(
    dir: &Path,
    file_name: &str,
    contents: &str,
) -> Result<PathBuf, FsError> {
    let path = dir.join(file_name);
    if path.is_file() {
        tracing::info!("{file_name} already exists and will not be replaced");
    } else {
        tracing::info!("{file_name} was not found; providing a default copy");
        write_text(&path, contents)?;
    }
    Ok(path)
}

/// Lexically normalizes a path: resolves `.` and `..` components without
/// touching the file system.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(Component::ParentDir);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}
