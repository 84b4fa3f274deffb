use anyhow::Result;
use argon2::password_hash::{PasswordHash, PasswordVerifier};
use argon2::Argon2;
use six_wraps::core::importer::{import_into_sqlite, DEFAULT_DEMO_PASSWORD};
use six_wraps::domain::ports::UserStore;
use six_wraps::utils::error::AppError;
use six_wraps::{CsvUserImport, ImportEngine, InMemoryUserStore, SqliteUserStore};
use std::path::PathBuf;
use tempfile::TempDir;

const HEADER: &str = "fname,lname,locker,email,phone,country,notes";

async fn write_csv(dir: &TempDir, lines: &[&str]) -> Result<PathBuf> {
    let path = dir.path().join("users.csv");
    let mut content = String::from(HEADER);
    for line in lines {
        content.push('\n');
        content.push_str(line);
    }
    content.push('\n');
    tokio::fs::write(&path, content).await?;
    Ok(path)
}

#[tokio::test]
async fn test_import_skips_short_rows_and_duplicates() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_csv(
        &dir,
        &[
            "Ann,Lee,A1,ann@example.com,555-0101,US,",
            "Bob,Ray,B2,bob@example.com,555-0102,CA,vip",
            // six columns only
            "Cy,Moe,C3,cy@example.com,555-0103,US",
            "Ann,Lee,A9,ann@example.com,555-0199,US,second copy",
        ],
    )
    .await?;

    let store = InMemoryUserStore::new();
    let engine = ImportEngine::new(CsvUserImport::new(&path, store.clone()));
    let report = engine.run().await?;

    assert_eq!(report.rows_read, 4);
    assert_eq!(report.imported, 2);
    assert_eq!(report.skipped_short, 1);
    assert_eq!(report.skipped_duplicate, 1);

    let users = store.users().await;
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].email, "ann@example.com");
    assert_eq!(users[0].locker, "A1");
    assert_eq!(users[1].country, "CA");
    assert!(users.iter().all(|u| u.is_legacy && u.user_level == 1));
    assert_ne!(users[0].username, users[1].username);
    // Each user gets its own salt, and every hash opens with the demo password.
    assert_ne!(users[0].password_hash, users[1].password_hash);
    for user in &users {
        let parsed = PasswordHash::new(&user.password_hash).unwrap();
        assert!(Argon2::default()
            .verify_password(DEFAULT_DEMO_PASSWORD.as_bytes(), &parsed)
            .is_ok());
    }

    Ok(())
}

#[tokio::test]
async fn test_rerun_imports_nothing_new() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_csv(
        &dir,
        &[
            "Ann,Lee,A1,ann@example.com,555-0101,US,",
            "Bob,Ray,B2,bob@example.com,555-0102,CA,",
        ],
    )
    .await?;

    let store = InMemoryUserStore::new();
    let first = ImportEngine::new(CsvUserImport::new(&path, store.clone()))
        .run()
        .await?;
    let second = ImportEngine::new(CsvUserImport::new(&path, store.clone()))
        .run()
        .await?;

    assert_eq!(first.imported, 2);
    assert_eq!(second.imported, 0);
    assert_eq!(second.skipped_duplicate, 2);
    assert_eq!(store.len().await, 2);

    Ok(())
}

#[tokio::test]
async fn test_email_match_is_exact() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_csv(
        &dir,
        &[
            "Ann,Lee,A1,ann@example.com,555-0101,US,",
            "Ann,Lee,A1,ANN@example.com,555-0101,US,",
        ],
    )
    .await?;

    let store = InMemoryUserStore::new();
    let report = ImportEngine::new(CsvUserImport::new(&path, store.clone()))
        .run()
        .await?;

    assert_eq!(report.imported, 2);
    Ok(())
}

#[tokio::test]
async fn test_missing_file_reports_file_not_found() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("nope.csv");

    let store = InMemoryUserStore::new();
    let err = ImportEngine::new(CsvUserImport::new(&path, store.clone()))
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::FileNotFound { .. }));
    assert_eq!(err.user_friendly_message(), "File not found.");
    assert!(store.is_empty().await);
    Ok(())
}

#[tokio::test]
async fn test_header_only_file_imports_nothing() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_csv(&dir, &[]).await?;

    let report = ImportEngine::new(CsvUserImport::new(&path, InMemoryUserStore::new()))
        .run()
        .await?;

    assert_eq!(report.rows_read, 0);
    assert_eq!(report.imported, 0);
    Ok(())
}

#[tokio::test]
async fn test_import_into_sqlite() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_csv(
        &dir,
        &[
            "Ann,Lee,A1,ann@example.com,555-0101,US,",
            "Bob,Ray,B2,bob@example.com,555-0102,CA,",
            "Ann,Lee,A1,ann@example.com,555-0101,US,",
        ],
    )
    .await?;

    let store = SqliteUserStore::connect("sqlite::memory:").await?;
    let pipeline = CsvUserImport::new(&path, store.clone()).with_demo_password("letmein");
    let report = ImportEngine::new(pipeline).run().await?;

    assert_eq!(report.imported, 2);
    assert_eq!(report.skipped_duplicate, 1);
    assert_eq!(store.count().await?, 2);
    assert!(store.find_id_by_email("bob@example.com").await?.is_some());
    assert!(store.find_id_by_email("cy@example.com").await?.is_none());

    let (is_old, level): (i64, i64) =
        sqlx::query_as("SELECT is_old, userlevel FROM users WHERE email = 'ann@example.com'")
            .fetch_one(store.pool())
            .await?;
    assert_eq!(is_old, 1);
    assert_eq!(level, 1);

    Ok(())
}

#[tokio::test]
async fn test_latin1_rows_are_imported() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("users.csv");
    let mut content = format!("{}\n", HEADER).into_bytes();
    content.extend_from_slice(b"Jos\xe9,Lee,A1,jose@example.com,555,ES,x\n");
    content.extend_from_slice(b"Ann,Lee,A2,ann@example.com,555,US,x\n");
    tokio::fs::write(&path, content).await?;

    let store = InMemoryUserStore::new();
    let report = ImportEngine::new(CsvUserImport::new(&path, store.clone()))
        .run()
        .await?;

    assert_eq!(report.rows_read, 2);
    assert_eq!(report.imported, 2);
    let users = store.users().await;
    assert_eq!(users[0].first_name, "José");
    assert!(users[0].username.starts_with("José_Lee_old"));
    Ok(())
}

#[tokio::test]
async fn test_missing_csv_leaves_no_database_behind() -> Result<()> {
    let dir = TempDir::new()?;
    let db_path = dir.path().join("users.db");
    let database_url = format!("sqlite://{}", db_path.display());

    let err = import_into_sqlite(&dir.path().join("nope.csv"), &database_url, "demo12345")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::FileNotFound { .. }));
    assert!(!db_path.exists());
    Ok(())
}

#[tokio::test]
async fn test_import_into_sqlite_file() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_csv(&dir, &["Ann,Lee,A1,ann@example.com,555-0101,US,"]).await?;
    let db_path = dir.path().join("users.db");
    let database_url = format!("sqlite://{}", db_path.display());

    let report = import_into_sqlite(&path, &database_url, "demo12345").await?;

    assert_eq!(report.imported, 1);
    assert!(db_path.exists());
    Ok(())
}
