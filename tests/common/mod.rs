#![allow(dead_code)]

use async_trait::async_trait;
use catalog_api::config::CatalogConfig;
use catalog_api::infrastructure::database;
use catalog_api::services::catalog_service::{CatalogService, GenreDetails};
use catalog_api::services::storage::StorageService;
use catalog_api::validation::{RequestInput, UploadedFile};
use catalog_api::entities::categories;
use sea_orm::{Database, DatabaseConnection};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new("catalog_api=debug"))
        .with(fmt::layer().with_test_writer())
        .try_init();
}

pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    database::run_migrations(&db, "sqlite::memory:").await.unwrap();
    db
}

/// In-memory blob store. Deletes of keys starting with a registered prefix
/// fail, which lets tests break post-commit cleanup on purpose.
#[derive(Default)]
pub struct MockStorageService {
    files: Mutex<HashMap<String, Vec<u8>>>,
    failing_deletes: Mutex<Vec<String>>,
}

impl MockStorageService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_deletes_of(&self, prefix: &str) {
        self.failing_deletes.lock().unwrap().push(prefix.to_string());
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.files.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn contains(&self, key: &str) -> bool {
        self.files.lock().unwrap().contains_key(key)
    }

    pub fn put(&self, key: &str, data: &[u8]) {
        self.files
            .lock()
            .unwrap()
            .insert(key.to_string(), data.to_vec());
    }
}

#[async_trait]
impl StorageService for MockStorageService {
    async fn upload_file(&self, key: &str, data: Vec<u8>) -> anyhow::Result<()> {
        self.files.lock().unwrap().insert(key.to_string(), data);
        Ok(())
    }

    async fn delete_file(&self, key: &str) -> anyhow::Result<()> {
        let failing = self
            .failing_deletes
            .lock()
            .unwrap()
            .iter()
            .any(|prefix| key.starts_with(prefix.as_str()));
        if failing {
            return Err(anyhow::anyhow!("Simulated delete failure for {}", key));
        }
        self.files.lock().unwrap().remove(key);
        Ok(())
    }

    async fn file_exists(&self, key: &str) -> anyhow::Result<bool> {
        Ok(self.files.lock().unwrap().contains_key(key))
    }

    async fn get_file(&self, key: &str) -> anyhow::Result<Vec<u8>> {
        self.files
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Key not found"))
    }

    async fn list_objects(&self, prefix: &str) -> anyhow::Result<Vec<String>> {
        let files = self.files.lock().unwrap();
        let mut keys: Vec<String> = files
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }

    async fn get_download_url(&self, key: &str) -> anyhow::Result<String> {
        Ok(format!("http://storage.test/{}", key))
    }
}

pub struct TestCatalog {
    pub db: DatabaseConnection,
    pub storage: Arc<MockStorageService>,
    pub catalog: CatalogService,
}

pub async fn setup_catalog() -> TestCatalog {
    init_tracing();
    let db = setup_test_db().await;
    let storage = Arc::new(MockStorageService::new());
    let catalog = CatalogService::new(db.clone(), storage.clone(), CatalogConfig::development());
    TestCatalog {
        db,
        storage,
        catalog,
    }
}

pub async fn create_category(catalog: &CatalogService, name: &str) -> categories::Model {
    catalog
        .create_category(RequestInput::new().with("name", name))
        .await
        .unwrap()
}

pub async fn create_genre(
    catalog: &CatalogService,
    name: &str,
    category_ids: &[&String],
) -> GenreDetails {
    let ids: Vec<String> = category_ids.iter().map(|s| s.to_string()).collect();
    catalog
        .create_genre(
            RequestInput::new()
                .with("name", name)
                .with("categories_id", ids),
        )
        .await
        .unwrap()
}

/// A valid video request referencing the given category and genre.
pub fn video_request(category_id: &str, genre_id: &str) -> RequestInput {
    RequestInput::new()
        .with("title", "Arrival")
        .with("description", "A linguist is recruited to talk to visitors.")
        .with("year_launched", 2016i64)
        .with("opened", true)
        .with("rating", "14")
        .with("duration", 116i64)
        .with("categories_id", vec![category_id.to_string()])
        .with("genres_id", vec![genre_id.to_string()])
}

pub const PNG_BYTES: &[u8] = &[
    0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, b'I', b'H', b'D', b'R',
];

pub const MP4_BYTES: &[u8] = &[
    0x00, 0x00, 0x00, 0x18, b'f', b't', b'y', b'p', b'i', b's', b'o', b'm', 0x00, 0x00, 0x02, 0x00,
    b'i', b's', b'o', b'm', b'm', b'p', b'4', b'2',
];

pub fn png_upload() -> UploadedFile {
    UploadedFile::new("cover.png", "image/png", PNG_BYTES.to_vec())
}

pub fn mp4_upload() -> UploadedFile {
    UploadedFile::new("movie.mp4", "video/mp4", MP4_BYTES.to_vec())
}
