use crate::adapters::SqliteUserStore;
use crate::core::engine::ImportEngine;
use crate::domain::model::{ImportReport, NewUser};
use crate::domain::ports::{ImportPipeline, UserStore};
use crate::utils::error::{AppError, Result};
use argon2::password_hash::{PasswordHasher, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use chrono::Utc;
use csv::{ByteRecord, StringRecord};
use rand_core::OsRng;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

pub const DEFAULT_CSV_PATH: &str = "../../../files/users.csv";
pub const DEFAULT_DEMO_PASSWORD: &str = "demo12345";

/// first name, last name, locker, email, phone, country, plus one trailing column.
pub const MIN_COLUMNS: usize = 7;

const LEGACY_USER_LEVEL: i64 = 1;

/// Imports legacy users from a CSV export into a [`UserStore`].
///
/// Rows shorter than [`MIN_COLUMNS`] are skipped, and so is any row whose
/// email already exists in the store (exact match). Neither case is an error.
pub struct CsvUserImport<U: UserStore> {
    csv_path: PathBuf,
    store: U,
    demo_password: String,
}

impl<U: UserStore> CsvUserImport<U> {
    pub fn new(csv_path: impl Into<PathBuf>, store: U) -> Self {
        Self {
            csv_path: csv_path.into(),
            store,
            demo_password: DEFAULT_DEMO_PASSWORD.to_string(),
        }
    }

    pub fn with_demo_password(mut self, password: impl Into<String>) -> Self {
        self.demo_password = password.into();
        self
    }

    pub fn store(&self) -> &U {
        &self.store
    }
}

#[async_trait]
impl<U: UserStore> ImportPipeline for CsvUserImport<U> {
    type Row = StringRecord;
    type Record = NewUser;

    async fn extract(&self) -> Result<Vec<StringRecord>> {
        check_csv_source(&self.csv_path).await?;

        let path = self.csv_path.display();
        let bytes = tokio::fs::read(&self.csv_path).await?;
        tracing::debug!("Read {} bytes from {}", bytes.len(), path);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes.as_slice());

        let mut rows = Vec::new();
        for (idx, record) in reader.byte_records().enumerate() {
            match record {
                Ok(raw) => rows.push(decode_record(&raw)),
                // Header is line 1.
                Err(e) => tracing::debug!("Skipping unreadable row at line {}: {}", idx + 2, e),
            }
        }
        Ok(rows)
    }

    async fn transform(&self, rows: Vec<StringRecord>) -> Result<(Vec<NewUser>, ImportReport)> {
        let mut report = ImportReport {
            rows_read: rows.len(),
            ..Default::default()
        };
        let mut users = Vec::with_capacity(rows.len());

        for row in &rows {
            if row.len() < MIN_COLUMNS {
                report.skipped_short += 1;
                tracing::debug!("Skipping row with {} columns", row.len());
                continue;
            }
            // Fresh salt for every user.
            let password_hash = hash_password(&self.demo_password)?;
            users.extend(build_user(row, &password_hash));
        }
        Ok((users, report))
    }

    async fn load(&self, users: Vec<NewUser>, mut report: ImportReport) -> Result<ImportReport> {
        for user in &users {
            if self.store.find_id_by_email(&user.email).await?.is_some() {
                report.skipped_duplicate += 1;
                tracing::debug!("Skipping existing user {}", user.email);
                continue;
            }
            self.store.insert(user).await?;
            report.imported += 1;
        }
        Ok(report)
    }
}

/// Fails with [`AppError::FileNotFound`] when there is nothing to import.
pub async fn check_csv_source(path: &Path) -> Result<()> {
    match tokio::fs::try_exists(path).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(AppError::FileNotFound {
            path: path.display().to_string(),
        }),
        Err(e) => Err(AppError::Io(e)),
    }
}

/// Runs the import into the SQLite database at `database_url`.
///
/// The CSV is checked before the database is opened, so a missing file never
/// leaves an empty database behind.
pub async fn import_into_sqlite(
    csv_path: &Path,
    database_url: &str,
    demo_password: &str,
) -> Result<ImportReport> {
    check_csv_source(csv_path).await?;
    let store = SqliteUserStore::connect(database_url).await?;
    let pipeline = CsvUserImport::new(csv_path, store).with_demo_password(demo_password);
    ImportEngine::new(pipeline).run().await
}

/// UTF-8 fields pass through; anything else is read as Latin-1, which is what
/// older spreadsheet exports produce.
fn decode_record(raw: &ByteRecord) -> StringRecord {
    raw.iter()
        .map(|field| match std::str::from_utf8(field) {
            Ok(text) => text.to_string(),
            Err(_) => {
                tracing::debug!("Decoding non-UTF-8 field as Latin-1");
                field.iter().map(|&b| char::from(b)).collect()
            }
        })
        .collect()
}

/// `None` for rows too short to describe a user.
pub fn build_user(row: &StringRecord, password_hash: &str) -> Option<NewUser> {
    if row.len() < MIN_COLUMNS {
        return None;
    }
    let col = |i: usize| row.get(i).unwrap_or_default();
    let first_name = col(0).trim().to_string();

    Some(NewUser {
        username: format!("{}_{}_{}", first_name, col(1), unique_suffix()),
        last_name: col(1).trim().to_string(),
        locker: col(2).trim().to_string(),
        email: col(3).trim().to_string(),
        phone: col(4).trim().to_string(),
        country: col(5).trim().to_string(),
        password_hash: password_hash.to_string(),
        user_level: LEGACY_USER_LEVEL,
        is_legacy: true,
        first_name,
    })
}

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::PasswordHash {
            message: e.to_string(),
        })
}

static LAST_SUFFIX_MICROS: AtomicU64 = AtomicU64::new(0);

/// `old` + 8 hex digits of seconds + 5 hex digits of microseconds.
/// Strictly increasing within the process.
pub fn unique_suffix() -> String {
    let now = Utc::now();
    let micros = now.timestamp().max(0) as u64 * 1_000_000 + u64::from(now.timestamp_subsec_micros() % 1_000_000);

    let mut prev = LAST_SUFFIX_MICROS.load(Ordering::Relaxed);
    let next = loop {
        let candidate = micros.max(prev + 1);
        match LAST_SUFFIX_MICROS.compare_exchange_weak(prev, candidate, Ordering::AcqRel, Ordering::Relaxed) {
            Ok(_) => break candidate,
            Err(actual) => prev = actual,
        }
    };

    format!("old{:08x}{:05x}", next / 1_000_000, next % 1_000_000)
}
