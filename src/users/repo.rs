use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use tracing::debug;

use crate::users::repo_types::{NewUser, UserRecord};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("user with this facebook_id already exists")]
    Duplicate,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Durable users table keyed by `facebook_id`.
///
/// `create` must reject duplicates itself; callers never rely on a prior
/// `exists` check for uniqueness.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_facebook_id(&self, facebook_id: &str) -> Result<Option<UserRecord>, StoreError>;
    async fn exists(&self, facebook_id: &str) -> Result<bool, StoreError>;
    async fn create(&self, new: NewUser<'_>) -> Result<UserRecord, StoreError>;
    async fn list_all(&self) -> Result<Vec<UserRecord>, StoreError>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_facebook_id(&self, facebook_id: &str) -> Result<Option<UserRecord>, StoreError> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, facebook_id, full_name, email, profile_picture, date_joined
            FROM users
            WHERE facebook_id = $1
            "#,
        )
        .bind(facebook_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn exists(&self, facebook_id: &str) -> Result<bool, StoreError> {
        let (found,): (bool,) =
            sqlx::query_as(r#"SELECT EXISTS(SELECT 1 FROM users WHERE facebook_id = $1)"#)
                .bind(facebook_id)
                .fetch_one(&self.db)
                .await?;
        Ok(found)
    }

    async fn create(&self, new: NewUser<'_>) -> Result<UserRecord, StoreError> {
        let inserted = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (facebook_id, full_name, email)
            VALUES ($1, $2, $3)
            ON CONFLICT (facebook_id) DO NOTHING
            RETURNING id, facebook_id, full_name, email, profile_picture, date_joined
            "#,
        )
        .bind(new.facebook_id)
        .bind(new.full_name)
        .bind(new.email)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                StoreError::Duplicate
            }
            other => StoreError::Database(other),
        })?;

        inserted.ok_or(StoreError::Duplicate)
    }

    async fn list_all(&self) -> Result<Vec<UserRecord>, StoreError> {
        let rows = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, facebook_id, full_name, email, profile_picture, date_joined
            FROM users
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }
}

/// In-process users table. Uniqueness is checked and the row inserted under
/// one write lock.
#[derive(Default)]
pub struct MemoryUserStore {
    rows: RwLock<Vec<UserRecord>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_facebook_id(&self, facebook_id: &str) -> Result<Option<UserRecord>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|u| u.facebook_id == facebook_id).cloned())
    }

    async fn exists(&self, facebook_id: &str) -> Result<bool, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().any(|u| u.facebook_id == facebook_id))
    }

    async fn create(&self, new: NewUser<'_>) -> Result<UserRecord, StoreError> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|u| u.facebook_id == new.facebook_id) {
            return Err(StoreError::Duplicate);
        }
        let record = UserRecord {
            id: rows.len() as i64 + 1,
            facebook_id: new.facebook_id.to_owned(),
            full_name: new.full_name.to_owned(),
            email: new.email.to_owned(),
            profile_picture: None,
            date_joined: OffsetDateTime::now_utc(),
        };
        rows.push(record.clone());
        debug!(id = record.id, "memory store insert");
        Ok(record)
    }

    async fn list_all(&self) -> Result<Vec<UserRecord>, StoreError> {
        Ok(self.rows.read().await.clone())
    }
}
