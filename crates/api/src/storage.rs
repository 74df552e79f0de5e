//! Local storage for uploaded invoice files.
//!
//! Files land in `<media root>/invoices/` and are referenced by their path
//! relative to the media root (e.g. `invoices/scan.pdf`).

use std::io;
use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

/// Subdirectory of the media root holding invoice files.
pub const INVOICE_DIR: &str = "invoices";

/// Longest stem kept from a client-supplied file name.
const MAX_STEM_LEN: usize = 100;

/// Attempts at picking a free name before giving up.
const MAX_NAME_ATTEMPTS: usize = 8;

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `data` under `invoices/` and return the stored relative path.
    ///
    /// Never overwrites: when the sanitized name is taken, a random suffix is
    /// appended to the stem.
    pub async fn save(&self, file_name: &str, data: &[u8]) -> io::Result<String> {
        let dir = self.root.join(INVOICE_DIR);
        tokio::fs::create_dir_all(&dir).await?;

        let sanitized = sanitize_file_name(file_name);
        let (stem, ext) = split_name(&sanitized);
        for attempt in 0..MAX_NAME_ATTEMPTS {
            let candidate = if attempt == 0 {
                format!("{stem}{ext}")
            } else {
                let suffix = uuid::Uuid::new_v4().simple().to_string();
                format!("{stem}_{}{ext}", &suffix[..7])
            };

            let open = tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(dir.join(&candidate))
                .await;
            let mut file = match open {
                Ok(file) => file,
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e),
            };
            file.write_all(data).await?;
            file.flush().await?;

            let relative = format!("{INVOICE_DIR}/{candidate}");
            tracing::debug!(path = %relative, bytes = data.len(), "Stored invoice file");
            return Ok(relative);
        }

        Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("no free file name for {file_name}"),
        ))
    }

    /// Remove a stored file. Missing files are not an error.
    pub async fn remove(&self, relative_path: &str) -> io::Result<()> {
        match tokio::fs::remove_file(self.root.join(relative_path)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// Reduce a client-supplied name to a safe base name.
///
/// Drops any directory part, replaces whitespace with `_`, keeps only
/// alphanumerics, `-`, `_` and `.`, and caps the stem length.
pub fn sanitize_file_name(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw).trim();
    let cleaned: String = base
        .chars()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some('_')
            } else if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
                Some(c)
            } else {
                None
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    let (stem, ext) = split_name(cleaned);
    let stem: String = stem.chars().take(MAX_STEM_LEN).collect();
    let stem = if stem.is_empty() { "file".to_string() } else { stem };
    format!("{stem}{ext}")
}

/// Split into stem and extension (extension keeps its dot).
fn split_name(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_directories_and_odd_characters() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\scans\\march bill.pdf"), "march_bill.pdf");
        assert_eq!(sanitize_file_name("inv#42 (copy).PDF"), "inv42_copy.PDF");
        assert_eq!(sanitize_file_name(".pdf"), "pdf");
        assert_eq!(sanitize_file_name("???"), "file");
    }

    #[test]
    fn sanitize_caps_stem_length() {
        let long = format!("{}.pdf", "a".repeat(300));
        let cleaned = sanitize_file_name(&long);
        assert_eq!(cleaned.len(), MAX_STEM_LEN + ".pdf".len());
        assert!(cleaned.ends_with(".pdf"));
    }

    #[tokio::test]
    async fn save_writes_under_invoices_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::new(tmp.path());

        let path = store.save("bill.pdf", b"%PDF-1.4").await.unwrap();
        assert_eq!(path, "invoices/bill.pdf");
        let written = std::fs::read(tmp.path().join(&path)).unwrap();
        assert_eq!(written, b"%PDF-1.4");
    }

    #[tokio::test]
    async fn save_never_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::new(tmp.path());

        let first = store.save("bill.pdf", b"one").await.unwrap();
        let second = store.save("bill.pdf", b"two").await.unwrap();

        assert_ne!(first, second);
        assert!(second.starts_with("invoices/bill_"));
        assert!(second.ends_with(".pdf"));
        assert_eq!(std::fs::read(tmp.path().join(&first)).unwrap(), b"one");
        assert_eq!(std::fs::read(tmp.path().join(&second)).unwrap(), b"two");
    }

    #[tokio::test]
    async fn remove_tolerates_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::new(tmp.path());

        let path = store.save("bill.pdf", b"x").await.unwrap();
        store.remove(&path).await.unwrap();
        assert!(!tmp.path().join(&path).exists());
        store.remove(&path).await.unwrap();
    }
}
