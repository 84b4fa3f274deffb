use crate::domain::model::NewUser;
use crate::domain::ports::UserStore;
use crate::utils::error::Result;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

/// `users` table in a SQLite database, schema managed by the embedded migrations.
#[derive(Debug, Clone)]
pub struct SqliteUserStore {
    pool: SqlitePool,
}

impl SqliteUserStore {
    /// Opens (creating if needed) the database at `url` and runs migrations.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        // An in-memory database only lives as long as its connection.
        let max_connections = if url.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::debug!("User database migrations applied");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn find_id_by_email(&self, email: &str) -> Result<Option<i64>> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE email = ?1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(id,)| id))
    }

    async fn insert(&self, user: &NewUser) -> Result<i64> {
        let result = sqlx::query(
            "INSERT INTO users (username, fname, lname, locker, email, phone, country, password, userlevel, is_old) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )
        .bind(&user.username)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.locker)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(&user.country)
        .bind(&user.password_hash)
        .bind(user.user_level)
        .bind(user.is_legacy)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(email: &str) -> NewUser {
        NewUser {
            username: "Ann_Lee_old0000000000001".to_string(),
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
            locker: "A12".to_string(),
            email: email.to_string(),
            phone: "555-0101".to_string(),
            country: "US".to_string(),
            password_hash: "$argon2id$v=19$stub".to_string(),
            user_level: 1,
            is_legacy: true,
        }
    }

    #[tokio::test]
    async fn test_insert_and_find_by_email() {
        let store = SqliteUserStore::connect("sqlite::memory:").await.unwrap();

        assert_eq!(store.find_id_by_email("ann@example.com").await.unwrap(), None);

        let id = store.insert(&sample("ann@example.com")).await.unwrap();
        assert_eq!(store.find_id_by_email("ann@example.com").await.unwrap(), Some(id));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_email_lookup_is_case_sensitive() {
        let store = SqliteUserStore::connect("sqlite::memory:").await.unwrap();
        store.insert(&sample("Ann@Example.com")).await.unwrap();

        assert!(store.find_id_by_email("ann@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_legacy_flags_are_persisted() {
        let store = SqliteUserStore::connect("sqlite::memory:").await.unwrap();
        store.insert(&sample("ann@example.com")).await.unwrap();

        let (level, is_old): (i64, bool) =
            sqlx::query_as("SELECT userlevel, is_old FROM users WHERE email = ?1")
                .bind("ann@example.com")
                .fetch_one(store.pool())
                .await
                .unwrap();
        assert_eq!(level, 1);
        assert!(is_old);
    }
}
