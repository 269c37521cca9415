use anyhow::{Context, Result};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind the HTTP server to, e.g. "0.0.0.0"
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Public base URL used when generating short links, e.g. "https://go.example.com"
    /// Must NOT have a trailing slash.
    pub base_url: String,

    /// JSON file holding the whole short_code -> url mapping.
    pub data_file: PathBuf,

    /// Directory containing `index.html` and `style.css`.
    pub static_dir: PathBuf,

    /// Upper bound on the size of a POST /shorten body.
    pub max_body_bytes: usize,
}

impl AppConfig {
    /// Load configuration from environment variables (populated by dotenvy before this is called).
    pub fn from_env() -> Result<Self> {
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse::<u16>()
            .context("PORT must be a valid port number (1–65535)")?;

        let base_url = std::env::var("BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{port}"))
            .trim_end_matches('/')
            .to_owned();

        let max_body_bytes = std::env::var("MAX_BODY_BYTES")
            .unwrap_or_else(|_| "16384".into())
            .parse::<usize>()
            .context("MAX_BODY_BYTES must be a positive integer")?;

        if max_body_bytes == 0 {
            anyhow::bail!("MAX_BODY_BYTES must not be zero");
        }

        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port,
            base_url,
            data_file: std::env::var("DATA_FILE")
                .unwrap_or_else(|_| "data/links.json".into())
                .into(),
            static_dir: std::env::var("STATIC_DIR")
                .unwrap_or_else(|_| "files".into())
                .into(),
            max_body_bytes,
        })
    }

    /// Public URL a visitor follows for `short_code`.
    pub fn short_url(&self, short_code: &str) -> String {
        format!("{}/{}", self.base_url, short_code)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
impl AppConfig {
    /// Configuration rooted in a scratch directory, as used by handler tests.
    pub fn for_tests(root: &std::path::Path) -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 3000,
            base_url: "http://localhost:3000".into(),
            data_file: root.join("data").join("links.json"),
            static_dir: root.join("files"),
            max_body_bytes: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_url_joins_base_and_code() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::for_tests(dir.path());
        assert_eq!(config.short_url("abc"), "http://localhost:3000/abc");
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
    }
}
