use crate::config::CatalogConfig;
use crate::entities::{
    cast_members, categories, category_genre, category_video, genre_video, genres, videos,
};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema};
use std::time::Duration;
use tracing::info;

pub async fn setup_database(config: &CatalogConfig) -> anyhow::Result<DatabaseConnection> {
    info!("📂 Database: {}", config.database_url);

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.max_connections(20)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(30))
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug);

    let db = Database::connect(opt).await?;

    info!("✅ Database connected successfully");

    run_migrations(&db, &config.database_url).await?;

    Ok(db)
}

pub async fn run_migrations(db: &DatabaseConnection, db_url: &str) -> anyhow::Result<()> {
    if db_url.starts_with("postgres://") || db_url.starts_with("postgresql://") {
        info!("🔄 Running SQLx migrations for PostgreSQL...");
        let pool = sqlx::PgPool::connect(db_url).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
    } else {
        info!("🔄 Creating schema from entities for SQLite...");
        let builder = db.get_database_backend();
        let schema = Schema::new(builder);

        // Parents before join tables so the foreign keys resolve.
        let stmts = vec![
            schema
                .create_table_from_entity(categories::Entity)
                .if_not_exists()
                .to_owned(),
            schema
                .create_table_from_entity(genres::Entity)
                .if_not_exists()
                .to_owned(),
            schema
                .create_table_from_entity(cast_members::Entity)
                .if_not_exists()
                .to_owned(),
            schema
                .create_table_from_entity(videos::Entity)
                .if_not_exists()
                .to_owned(),
            schema
                .create_table_from_entity(category_genre::Entity)
                .if_not_exists()
                .to_owned(),
            schema
                .create_table_from_entity(category_video::Entity)
                .if_not_exists()
                .to_owned(),
            schema
                .create_table_from_entity(genre_video::Entity)
                .if_not_exists()
                .to_owned(),
        ];

        for stmt in stmts {
            db.execute(builder.build(&stmt)).await?;
        }
    }

    Ok(())
}
