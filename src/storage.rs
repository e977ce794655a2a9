use sanitize_filename::sanitize;
use std::path::{Path, PathBuf};

/// Create the upload directory if it is missing. Idempotent.
pub fn ensure_upload_dir(dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)
}

/// Destination filename for an upload: the user-supplied document name (when
/// non-empty) keeps the original file's extension; otherwise the original
/// filename is used as-is. There is no collision handling — a second upload
/// resolving to the same name overwrites the first file on disk.
pub fn destination_filename(original: &str, user_supplied: Option<&str>) -> String {
    let original = sanitize(original);
    match user_supplied.filter(|s| !s.is_empty()) {
        Some(name) => {
            let name = sanitize(name);
            match Path::new(&original).extension().and_then(|e| e.to_str()) {
                Some(ext) => format!("{}.{}", name, ext),
                None => name,
            }
        }
        None => original,
    }
}

/// Resolve a stored `file_path` value against the upload directory. Only the
/// base filename of the stored value is used, so a crafted path cannot
/// escape the directory.
pub fn resolve_stored_path(dir: &Path, stored: &str) -> PathBuf {
    let base = Path::new(stored)
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    dir.join(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_name_takes_original_extension() {
        assert_eq!(
            destination_filename("report-final.pdf", Some("q3-report")),
            "q3-report.pdf"
        );
    }

    #[test]
    fn user_name_without_extension_on_original() {
        assert_eq!(destination_filename("README", Some("notes")), "notes");
    }

    #[test]
    fn empty_user_name_falls_back_to_original() {
        assert_eq!(destination_filename("scan.png", Some("")), "scan.png");
        assert_eq!(destination_filename("scan.png", None), "scan.png");
    }

    #[test]
    fn resolve_uses_basename_only() {
        let dir = Path::new("/srv/uploads");
        assert_eq!(
            resolve_stored_path(dir, "../../etc/passwd"),
            dir.join("passwd")
        );
        assert_eq!(
            resolve_stored_path(dir, "./uploads/manual.pdf"),
            dir.join("manual.pdf")
        );
    }
}
