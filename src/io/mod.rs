pub mod report;

pub use report::{format_elapsed, render_report, report_file_name, write_report};

use crate::core::Result;
use std::fs;
use std::path::Path;

/// Write `content` to `path`, creating missing parent directories.
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.as_os_str().is_empty() && !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_file_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested/out/refactored.py");
        write_file(&target, "print('hi')\n").unwrap();
        assert_eq!(fs::read_to_string(target).unwrap(), "print('hi')\n");
    }

    #[test]
    fn test_ensure_dir_accepts_empty_path() {
        ensure_dir(Path::new("")).unwrap();
    }
}
