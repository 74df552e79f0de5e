//! Invoice file upload validation.
//!
//! An upload is accepted when its extension is on the configured allow-list
//! and its size does not exceed the configured maximum. Checks run in a fixed
//! order (missing file, extension, size) and the first failure is returned.

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Extensions accepted when no allow-list is configured.
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &[".pdf", ".jpg", ".jpeg", ".png"];

/// Maximum upload size when none is configured (5 MiB).
pub const DEFAULT_MAX_SIZE_BYTES: u64 = 5 * 1024 * 1024;

/// Bytes per megabyte, as used in user-facing size messages.
const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Reasons an upload is rejected before it is persisted.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FileValidationError {
    #[error("No file was submitted.")]
    MissingFile,

    #[error(
        "File extension \"{extension}\" is not allowed. Allowed extensions are: {}.",
        .allowed.join(", ")
    )]
    DisallowedExtension {
        extension: String,
        allowed: Vec<String>,
    },

    #[error("File size cannot exceed {} MB.", format_megabytes(.max_size_mb))]
    FileTooLarge { max_size_mb: f64 },
}

/// Render a megabyte value the way it is shown to users: whole numbers keep
/// one fractional digit (`5.0`), very small or very large values switch to
/// exponent form with a signed two-digit exponent (`9.5367431640625e-05`).
fn format_megabytes(mb: &f64) -> String {
    let magnitude = mb.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let rendered = format!("{mb:e}");
        return match rendered.split_once('e') {
            Some((mantissa, exponent)) => {
                let exponent: i32 = exponent.parse().unwrap_or_default();
                let sign = if exponent < 0 { '-' } else { '+' };
                format!("{mantissa}e{sign}{:02}", exponent.abs())
            }
            None => rendered,
        };
    }
    if mb.fract() == 0.0 {
        format!("{mb:.1}")
    } else {
        format!("{mb}")
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Upload limits handed to [`FileValidator::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadConfig {
    allowed_extensions: Vec<String>,
    max_size_bytes: u64,
}

impl UploadConfig {
    /// Build a config from raw extension strings.
    ///
    /// Each entry is trimmed and lower-cased, gains a leading `.` if it lacks
    /// one, and duplicates are dropped. Order is kept for display. Blank
    /// entries are skipped.
    pub fn new<I, S>(allowed_extensions: I, max_size_bytes: u64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for raw in allowed_extensions {
            let trimmed = raw.as_ref().trim().to_lowercase();
            if trimmed.is_empty() || trimmed == "." {
                continue;
            }
            let ext = if trimmed.starts_with('.') {
                trimmed
            } else {
                format!(".{trimmed}")
            };
            if !normalized.contains(&ext) {
                normalized.push(ext);
            }
        }
        Self {
            allowed_extensions: normalized,
            max_size_bytes,
        }
    }

    /// Allowed extensions, lower-case with a leading dot.
    pub fn allowed_extensions(&self) -> &[String] {
        &self.allowed_extensions
    }

    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }

    /// Maximum size in megabytes (bytes / 1,048,576, not truncated).
    pub fn max_size_mb(&self) -> f64 {
        self.max_size_bytes as f64 / BYTES_PER_MB
    }

    fn is_allowed(&self, extension: &str) -> bool {
        self.allowed_extensions.iter().any(|e| e == extension)
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_EXTENSIONS.iter().copied(), DEFAULT_MAX_SIZE_BYTES)
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// The parts of an uploaded file the validator looks at.
#[derive(Debug, Clone, Copy)]
pub struct UploadCandidate<'a> {
    /// Client-supplied file name.
    pub name: &'a str,
    pub size_bytes: u64,
}

/// Extract the lower-cased extension of `name`, including the leading dot.
///
/// Only the final path component is considered and leading dots of that
/// component do not start an extension, so `.pdf` and `report` both yield an
/// empty string while `scan.PDF` yields `.pdf`.
pub fn file_extension(name: &str) -> String {
    let base = name
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(name);
    let stem_start = base.len() - base.trim_start_matches('.').len();
    let rest = &base[stem_start..];
    match rest.rfind('.') {
        Some(idx) => rest[idx..].to_lowercase(),
        None => String::new(),
    }
}

/// Validate an upload against `config`.
///
/// `None` means no file was supplied and always fails with
/// [`FileValidationError::MissingFile`].
pub fn validate_upload(
    file: Option<&UploadCandidate<'_>>,
    config: &UploadConfig,
) -> Result<(), FileValidationError> {
    let file = file.ok_or(FileValidationError::MissingFile)?;

    let extension = file_extension(file.name);
    if !config.is_allowed(&extension) {
        return Err(FileValidationError::DisallowedExtension {
            extension,
            allowed: config.allowed_extensions.clone(),
        });
    }

    if file.size_bytes > config.max_size_bytes {
        return Err(FileValidationError::FileTooLarge {
            max_size_mb: config.max_size_mb(),
        });
    }

    Ok(())
}

/// Upload gate constructed once from configuration and shared by handlers.
#[derive(Debug, Clone, Default)]
pub struct FileValidator {
    config: UploadConfig,
}

impl FileValidator {
    pub fn new(config: UploadConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    pub fn validate(&self, file: Option<&UploadCandidate<'_>>) -> Result<(), FileValidationError> {
        validate_upload(file, &self.config)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
