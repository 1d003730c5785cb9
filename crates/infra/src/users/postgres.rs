//! Postgres-backed user store.

use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use invoicedesk_auth::CredentialStore;
use invoicedesk_core::{NewUser, User, UserId};

use super::r#trait::UserStore;
use crate::error::{StoreError, map_sqlx_error};

#[derive(Debug, Clone)]
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn user_from_row(row: &sqlx::postgres::PgRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: UserId::from_uuid(row.try_get::<Uuid, _>("id")?),
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        password: row.try_get("password")?,
    })
}

#[async_trait::async_trait]
impl UserStore for PostgresUserStore {
    #[instrument(skip_all, fields(user_id = %user.id))]
    async fn insert_if_absent(&self, user: NewUser) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO NOTHING
            RETURNING id, name, email, password
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_user", e))?;

        rows.iter()
            .map(|row| user_from_row(row).map_err(|e| map_sqlx_error("insert_user", e)))
            .collect()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query("SELECT id, name, email, password FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_user_by_email", e))?;

        row.as_ref()
            .map(user_from_row)
            .transpose()
            .map_err(|e| map_sqlx_error("find_user_by_email", e))
    }
}

#[async_trait::async_trait]
impl CredentialStore for PostgresUserStore {
    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        Ok(self.find_by_email(email).await?)
    }
}
