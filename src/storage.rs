use std::path::{Path, PathBuf};

use tokio::fs;
use unicode_normalization::UnicodeNormalization;

use crate::error::AppError;

/// Reduces an uploaded file name to ASCII letters, digits, `_`, `.` and `-`.
/// Accented letters are decomposed and keep their base letter. Path
/// separators become word breaks, runs of whitespace become `_`, and leading
/// or trailing `.`/`_` are stripped. May return an empty string.
pub fn secure_filename(name: &str) -> String {
    let spaced: String = name
        .nfkd()
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .filter(char::is_ascii)
        .collect();

    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");

    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    kept.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// Joins a client-supplied name onto the upload directory as-is. Nothing
/// stops `..` segments or absolute paths from escaping the directory.
pub fn upload_path(upload_dir: &Path, filename: &str) -> PathBuf {
    upload_dir.join(filename)
}

pub async fn save_upload(upload_dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf, AppError> {
    fs::create_dir_all(upload_dir).await?;
    let path = upload_path(upload_dir, filename);
    fs::write(&path, bytes).await?;
    tracing::info!("stored upload at {}", path.display());
    Ok(path)
}

pub async fn read_upload(upload_dir: &Path, filename: &str) -> Result<Vec<u8>, AppError> {
    let path = upload_path(upload_dir, filename);
    match fs::read(&path).await {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(AppError::NotFound("File not found".to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secure_filename_strips_directories() {
        assert_eq!(secure_filename("../../etc/passwd"), "etc_passwd");
        assert_eq!(secure_filename("My cool movie.mov"), "My_cool_movie.mov");
        assert_eq!(secure_filename("report (final).pdf"), "report_final.pdf");
        assert_eq!(secure_filename("i contain cool \u{fc}ml\u{e4}uts.txt"), "i_contain_cool_umlauts.txt");
    }

    #[test]
    fn secure_filename_folds_compatibility_forms() {
        assert_eq!(secure_filename("r\u{e9}sum\u{e9}.pdf"), "resume.pdf");
        assert_eq!(secure_filename("\u{fb01}le.txt"), "file.txt");
    }

    #[test]
    fn secure_filename_can_be_empty() {
        assert_eq!(secure_filename("../.."), "");
        assert_eq!(secure_filename("___"), "");
    }

    #[test]
    fn upload_path_does_not_normalise() {
        let path = upload_path(Path::new("uploads"), "../secret.txt");
        assert_eq!(path, PathBuf::from("uploads/../secret.txt"));
    }

    #[tokio::test]
    async fn save_then_read() {
        let dir = tempfile::tempdir().unwrap();
        save_upload(dir.path(), "a.txt", b"hello").await.unwrap();
        assert_eq!(read_upload(dir.path(), "a.txt").await.unwrap(), b"hello");
        assert!(matches!(
            read_upload(dir.path(), "missing.txt").await,
            Err(AppError::NotFound(_))
        ));
    }
}
