use std::env;

/// Where uploaded video artifacts are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Local,
    S3,
}

impl StorageBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "local" | "fs" => Some(Self::Local),
            "s3" | "minio" => Some(Self::S3),
            _ => None,
        }
    }
}

/// Service configuration
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Database URL (default: local SQLite file)
    pub database_url: String,

    /// HTTP port (default: 3000)
    pub port: u16,

    /// Blob store backend (default: local)
    pub storage_backend: StorageBackend,

    /// Root directory for the local backend
    pub local_storage_root: String,

    /// Base URL under which stored files are reachable
    pub public_storage_url: String,

    /// Maximum thumbnail size in kilobytes (default: 10240)
    pub thumb_max_size_kb: u64,

    /// Maximum video size in kilobytes (default: 102400)
    pub video_max_size_kb: u64,

    pub thumb_mime_types: Vec<String>,
    pub video_mime_types: Vec<String>,

    /// Allowed CORS Origins (comma separated)
    pub allowed_origins: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://catalog.db?mode=rwc".to_string(),
            port: 3000,
            storage_backend: StorageBackend::Local,
            local_storage_root: "./storage".to_string(),
            public_storage_url: "http://localhost:3000/storage".to_string(),
            thumb_max_size_kb: 10 * 1024,   // 10 MB
            video_max_size_kb: 100 * 1024,  // 100 MB
            thumb_mime_types: vec!["image/jpeg".to_string(), "image/png".to_string()],
            video_mime_types: vec!["video/mp4".to_string()],
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string(), // Vite default
                "http://127.0.0.1:3000".to_string(),
            ],
        }
    }
}

fn list_var(name: &str) -> Option<Vec<String>> {
    env::var(name).ok().map(|v| {
        v.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
}

impl CatalogConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            database_url: env::var("DATABASE_URL").unwrap_or(default.database_url),

            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.port),

            storage_backend: env::var("STORAGE_BACKEND")
                .ok()
                .and_then(|v| StorageBackend::parse(&v))
                .unwrap_or(default.storage_backend),

            local_storage_root: env::var("LOCAL_STORAGE_ROOT")
                .unwrap_or(default.local_storage_root),

            public_storage_url: env::var("PUBLIC_STORAGE_URL")
                .unwrap_or(default.public_storage_url),

            thumb_max_size_kb: env::var("THUMB_MAX_SIZE_KB")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.thumb_max_size_kb),

            video_max_size_kb: env::var("VIDEO_MAX_SIZE_KB")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.video_max_size_kb),

            thumb_mime_types: list_var("THUMB_MIME_TYPES").unwrap_or(default.thumb_mime_types),

            video_mime_types: list_var("VIDEO_MIME_TYPES").unwrap_or(default.video_mime_types),

            allowed_origins: list_var("ALLOWED_ORIGINS").unwrap_or(default.allowed_origins),
        }
    }

    /// Create config for development (in-memory database, local storage)
    pub fn development() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            ..Self::default()
        }
    }

    /// Create config for production (S3 storage, explicit database)
    pub fn production() -> Self {
        let from_env = Self::from_env();
        Self {
            database_url: env::var("DATABASE_URL").expect("CRITICAL: DATABASE_URL must be set"),
            storage_backend: env::var("STORAGE_BACKEND")
                .ok()
                .and_then(|v| StorageBackend::parse(&v))
                .unwrap_or(StorageBackend::S3),
            ..from_env
        }
    }

    /// Largest request body the upload routes accept, with headroom for
    /// multipart framing.
    pub fn max_body_size(&self) -> usize {
        let largest_kb = self.thumb_max_size_kb + self.video_max_size_kb;
        (largest_kb as usize) * 1024 + 10 * 1024 * 1024
    }
}
