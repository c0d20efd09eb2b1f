use relative_path::RelativePath;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid library directory: {0}")]
    InvalidLibraryDir(String),
}

/// Read a text file from the library and return its lines.
///
/// Lines keep their leading whitespace (the classifier depends on it);
/// line terminators, including a trailing `\r`, are stripped.
pub fn read_lines(relative_path: &RelativePath, library_root: &Path) -> Result<Vec<String>, IoError> {
    let absolute_path = relative_path.to_path(library_root);
    if !absolute_path.exists() {
        return Err(IoError::NotFound(absolute_path));
    }
    let content = fs::read_to_string(&absolute_path)?;
    Ok(content.lines().map(str::to_owned).collect())
}

/// Scan for `.txt` files under the library directory, sorted by path.
pub fn scan_text_files(library_root: &Path) -> Result<Vec<PathBuf>, IoError> {
    if !library_root.exists() {
        return Err(IoError::InvalidLibraryDir(
            "library directory not found".to_string(),
        ));
    }

    let mut files = Vec::new();
    scan_directory_recursive(library_root, &mut files)?;
    files.sort();
    Ok(files)
}

fn scan_directory_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), IoError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            scan_directory_recursive(&path, files)?;
        } else if let Some(ext) = path.extension()
            && ext == "txt"
        {
            files.push(path);
        }
    }
    Ok(())
}

pub fn validate_library_dir(path: &Path) -> Result<(), IoError> {
    if !path.exists() || !path.is_dir() {
        return Err(IoError::InvalidLibraryDir(
            "directory does not exist".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn library_with(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            let path = dir.path().join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, content).unwrap();
        }
        dir
    }

    #[test]
    fn read_lines_preserves_leading_whitespace() {
        let dir = library_with(&[("book.txt", "Title\n  quoted line\nmore text")]);

        let lines = read_lines(RelativePath::new("book.txt"), dir.path()).unwrap();
        assert_eq!(lines, vec!["Title", "  quoted line", "more text"]);
    }

    #[test]
    fn read_lines_strips_carriage_returns() {
        let dir = library_with(&[("dos.txt", "one\r\ntwo\r\n")]);

        let lines = read_lines(RelativePath::new("dos.txt"), dir.path()).unwrap();
        assert_eq!(lines, vec!["one", "two"]);
    }

    #[test]
    fn read_lines_reports_missing_files() {
        let dir = library_with(&[]);

        let result = read_lines(RelativePath::new("absent.txt"), dir.path());
        assert!(matches!(result, Err(IoError::NotFound(_))));
    }

    #[test]
    fn scan_finds_nested_text_files_sorted() {
        let dir = library_with(&[
            ("b.txt", ""),
            ("a.txt", ""),
            ("shelf/c.txt", ""),
            ("notes.md", "ignored"),
        ]);

        let files = scan_text_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|f| f.strip_prefix(dir.path()).unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.txt", "b.txt", "shelf/c.txt"]);
    }

    #[test]
    fn scan_rejects_missing_library() {
        let result = scan_text_files(Path::new("/this/path/does/not/exist"));
        assert!(matches!(result, Err(IoError::InvalidLibraryDir(_))));
    }

    #[test]
    fn validate_accepts_directories_only() {
        let dir = library_with(&[("file.txt", "")]);

        assert!(validate_library_dir(dir.path()).is_ok());
        assert!(validate_library_dir(&dir.path().join("file.txt")).is_err());
        assert!(validate_library_dir(Path::new("/nonexistent/path")).is_err());
    }
}
