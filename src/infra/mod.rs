//! File I/O and the code-span rewrite guard.

pub mod codefence;
pub mod fs;

pub use codefence::{rewrite_files_guarded, rewrite_guarded};
pub use fs::{
    files_with_extensions, normalize_path, provide_default_file, read_text, write_text, FsError,
};
