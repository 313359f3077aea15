use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};

/// Размер пачки id для фильтров `IN (...)`; SQLite ограничивает число параметров запроса
pub const ID_CHUNK_SIZE: usize = 500;

/// Минимальная схема БД: одна таблица на агрегат
const BOOTSTRAP_STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS a001_schema (
        id TEXT PRIMARY KEY NOT NULL,
        instance_url TEXT NOT NULL,
        org_id TEXT NOT NULL DEFAULT '',
        access_token TEXT NOT NULL,
        include_field_usage INTEGER NOT NULL DEFAULT 0,
        status TEXT NOT NULL DEFAULT 'Pending',
        error TEXT,
        created_date TEXT NOT NULL,
        finished_date TEXT
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS a002_object (
        id TEXT PRIMARY KEY NOT NULL,
        schema_id TEXT NOT NULL REFERENCES a001_schema(id),
        api_name TEXT NOT NULL,
        label TEXT NOT NULL,
        position INTEGER NOT NULL DEFAULT 0
    );
    "#,
    "CREATE INDEX IF NOT EXISTS idx_a002_object_schema_id ON a002_object(schema_id);",
    r#"
    CREATE TABLE IF NOT EXISTS a003_field (
        id TEXT PRIMARY KEY NOT NULL,
        object_id TEXT NOT NULL REFERENCES a002_object(id),
        api_name TEXT NOT NULL,
        label TEXT NOT NULL,
        help_text TEXT,
        data_type TEXT NOT NULL,
        position INTEGER NOT NULL DEFAULT 0
    );
    "#,
    "CREATE INDEX IF NOT EXISTS idx_a003_field_object_id ON a003_field(object_id);",
    r#"
    CREATE TABLE IF NOT EXISTS a004_field_usage (
        id TEXT PRIMARY KEY NOT NULL,
        field_id TEXT NOT NULL REFERENCES a003_field(id),
        usage_type TEXT NOT NULL,
        name TEXT NOT NULL
    );
    "#,
    "CREATE INDEX IF NOT EXISTS idx_a004_field_usage_field_id ON a004_field_usage(field_id);",
    r#"
    CREATE TABLE IF NOT EXISTS a005_debug (
        id TEXT PRIMARY KEY NOT NULL,
        schema_id TEXT,
        debug TEXT NOT NULL,
        created_at TEXT NOT NULL
    );
    "#,
];

fn build_sqlite_url(path: &std::path::Path) -> String {
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    format!("sqlite://{}{}?mode=rwc", prefix, normalized)
}

/// Открыть (или создать) файл БД и убедиться, что все таблицы существуют
pub async fn initialize_database(db_path: &std::path::Path) -> anyhow::Result<DatabaseConnection> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if db_path.is_absolute() {
        db_path.to_path_buf()
    } else {
        std::env::current_dir()?.join(db_path)
    };
    let db_url = build_sqlite_url(&absolute_path);
    tracing::info!("Connecting to database: {}", db_url);

    let conn = Database::connect(&db_url).await?;
    bootstrap_schema(&conn).await?;
    Ok(conn)
}

/// Создать таблицы и индексы, если их ещё нет
pub async fn bootstrap_schema(conn: &DatabaseConnection) -> anyhow::Result<()> {
    for sql in BOOTSTRAP_STATEMENTS {
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            sql.to_string(),
        ))
        .await?;
    }
    tracing::debug!("Database schema bootstrap completed");
    Ok(())
}

/// In-memory БД для тестов. Одно соединение, иначе каждое видит свою пустую базу.
#[cfg(test)]
pub async fn memory_connection() -> anyhow::Result<DatabaseConnection> {
    use sea_orm::ConnectOptions;

    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let conn = Database::connect(options).await?;
    bootstrap_schema(&conn).await?;
    Ok(conn)
}
