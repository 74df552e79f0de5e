use std::path::PathBuf;

use ims_core::upload::{UploadConfig, DEFAULT_ALLOWED_EXTENSIONS, DEFAULT_MAX_SIZE_BYTES};

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Where uploaded files live and how they are addressed.
    pub media: MediaConfig,
    /// Allowed extensions and size cap for invoice files.
    pub upload: UploadConfig,
}

#[derive(Debug, Clone)]
pub struct MediaConfig {
    /// Filesystem root for stored uploads.
    pub root: PathBuf,
    /// URL prefix stored paths are exposed under, always ending in `/`.
    pub url: String,
    /// Serve `root` under `url` directly. Off in production.
    pub serve: bool,
}

impl MediaConfig {
    /// Public URL of a stored file given its path relative to the media root.
    pub fn url_for(&self, relative_path: &str) -> String {
        format!("{}{}", self.url, relative_path.trim_start_matches('/'))
    }

    /// Mount point for the static file service (`/media` for `/media/`).
    pub fn mount_path(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default                 |
    /// |-------------------------------|-------------------------|
    /// | `HOST`                        | `0.0.0.0`               |
    /// | `PORT`                        | `8000`                  |
    /// | `CORS_ORIGINS`                | `http://localhost:3000` |
    /// | `REQUEST_TIMEOUT_SECS`        | `30`                    |
    /// | `MEDIA_ROOT`                  | `media`                 |
    /// | `MEDIA_URL`                   | `/media/`               |
    /// | `APP_ENV`                     | `development`           |
    /// | `ALLOWED_FILE_TYPES`          | `.pdf,.jpg,.jpeg,.png`  |
    /// | `FILE_UPLOAD_MAX_MEMORY_SIZE` | `5242880`               |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = split_list(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:3000".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let media = MediaConfig {
            root: std::env::var("MEDIA_ROOT")
                .unwrap_or_else(|_| "media".into())
                .into(),
            url: normalize_media_url(
                &std::env::var("MEDIA_URL").unwrap_or_else(|_| "/media/".into()),
            ),
            serve: !app_env.eq_ignore_ascii_case("production"),
        };

        let allowed_extensions = std::env::var("ALLOWED_FILE_TYPES")
            .map(|raw| split_list(&raw))
            .unwrap_or_else(|_| {
                DEFAULT_ALLOWED_EXTENSIONS
                    .iter()
                    .map(|e| e.to_string())
                    .collect()
            });

        let max_size_bytes: u64 = std::env::var("FILE_UPLOAD_MAX_MEMORY_SIZE")
            .map(|raw| {
                raw.trim()
                    .parse()
                    .expect("FILE_UPLOAD_MAX_MEMORY_SIZE must be a byte count")
            })
            .unwrap_or(DEFAULT_MAX_SIZE_BYTES);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            media,
            upload: UploadConfig::new(allowed_extensions, max_size_bytes),
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Force a leading and trailing `/` on the media URL prefix.
fn normalize_media_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/media/".to_string()
    } else {
        format!("/{trimmed}/")
    }
}
