use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

pub async fn init_db(database_url: &str, max_connections: u32) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options.max_connections(max_connections);

    let db = Database::connect(options).await?;

    // Run migrations manually (simple SQL)
    run_migrations(&db).await?;

    Ok(db)
}

async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS books (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            author TEXT NOT NULL,
            year INTEGER NOT NULL,
            genre TEXT NOT NULL,
            pages INTEGER NOT NULL,
            available INTEGER NOT NULL DEFAULT 1,
            isbn TEXT UNIQUE,
            description TEXT,
            extra TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#
        .to_owned(),
    ))
    .await?;

    // Indexes backing the filterable columns and the default ordering
    for statement in [
        "CREATE INDEX IF NOT EXISTS idx_books_title ON books(title)",
        "CREATE INDEX IF NOT EXISTS idx_books_author ON books(author)",
        "CREATE INDEX IF NOT EXISTS idx_books_genre ON books(genre)",
        "CREATE INDEX IF NOT EXISTS idx_books_year ON books(year)",
        "CREATE INDEX IF NOT EXISTS idx_books_available ON books(available)",
        "CREATE INDEX IF NOT EXISTS idx_books_isbn ON books(isbn)",
        "CREATE INDEX IF NOT EXISTS idx_books_created_at ON books(created_at)",
    ] {
        db.execute(Statement::from_string(
            db.get_database_backend(),
            statement.to_owned(),
        ))
        .await?;
    }

    Ok(())
}
