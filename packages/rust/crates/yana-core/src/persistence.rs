//! Persistence helpers for atomic writes.

use std::io::Write;
use std::path::Path;

/// Write text content atomically:
/// - ensure parent directory exists
/// - write to a temp file in the same directory
/// - fsync file + rename into place
///
/// A crash before the rename leaves the previous file untouched.
///
/// # Errors
/// Returns the first I/O error encountered; the temp file is removed on
/// failure when possible.
pub fn atomic_write_text(path: &Path, content: &str) -> std::io::Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent)?;

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .unwrap_or("state.json");
    let temp_name = format!(".{}.{}.tmp", file_name, uuid::Uuid::new_v4());
    let temp_path = parent.join(temp_name);

    let result = (|| {
        let mut temp_file = std::fs::File::create(&temp_path)?;
        temp_file.write_all(content.as_bytes())?;
        temp_file.sync_all()?;
        std::fs::rename(&temp_path, path)
    })();

    if result.is_err() {
        let _ = std::fs::remove_file(&temp_path);
    }
    result
}
