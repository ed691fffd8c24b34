//! PostgreSQL repository implementation.

use crate::error::{MetadataError, MetadataResult};
use crate::models::{DeviceRow, EventRow, UserRow};
use crate::repos::{DeviceRepo, EventRepo, UserRepo};
use async_trait::async_trait;
use beacon_core::event::NewEvent;
use sqlx::{PgPool, Pool, Postgres};

/// PostgreSQL unique-violation error code.
const UNIQUE_VIOLATION: &str = "23505";

/// Repository view over the shared connection pool.
///
/// Cheap to construct per call; the pool itself is reference-counted.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Wrap a pool handle.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Postgres> {
        &self.pool
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION)
    )
}

#[async_trait]
impl UserRepo for PostgresStore {
    async fn get_user(&self, id: i64) -> MetadataResult<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM view_users WHERE user_id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get_user_by_username(&self, username: &str) -> MetadataResult<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM view_users WHERE user_username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create_user(
        &self,
        username: &str,
        discord_channel_id: i64,
        hashed_password: &str,
    ) -> MetadataResult<UserRow> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM create_user($1, $2, $3)")
            .bind(username)
            .bind(discord_channel_id)
            .bind(hashed_password)
            .fetch_one(&self.pool)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    MetadataError::Conflict(format!("username '{username}' already exists"))
                } else {
                    err.into()
                }
            })?;
        Ok(row)
    }

    async fn update_user_password(&self, id: i64, hashed_password: &str) -> MetadataResult<()> {
        sqlx::query("UPDATE Users SET hashed_password = $1 WHERE id = $2")
            .bind(hashed_password)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl DeviceRepo for PostgresStore {
    async fn get_device(&self, id: i64) -> MetadataResult<Option<DeviceRow>> {
        let row = sqlx::query_as::<_, DeviceRow>("SELECT * FROM view_devices WHERE device_id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_devices(&self, user_id: i64) -> MetadataResult<Vec<DeviceRow>> {
        let rows = sqlx::query_as::<_, DeviceRow>("SELECT * FROM view_devices WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn create_device(
        &self,
        name: &str,
        hashed_token: &str,
        user_id: i64,
    ) -> MetadataResult<DeviceRow> {
        let row = sqlx::query_as::<_, DeviceRow>("SELECT * FROM create_device($1, $2, $3)")
            .bind(name)
            .bind(hashed_token)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_device_token(&self, id: i64, hashed_token: &str) -> MetadataResult<()> {
        sqlx::query("UPDATE Devices SET hashed_token = $1 WHERE id = $2")
            .bind(hashed_token)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl EventRepo for PostgresStore {
    async fn list_events(&self, device_id: i64, user_id: i64) -> MetadataResult<Vec<EventRow>> {
        let rows = sqlx::query_as::<_, EventRow>(
            "SELECT * FROM view_events WHERE device_id = $1 AND user_id = $2",
        )
        .bind(device_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn create_event(&self, event: &NewEvent, device_id: i64) -> MetadataResult<EventRow> {
        let row = sqlx::query_as::<_, EventRow>(
            "SELECT * FROM create_event(
                 $1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                 $11, $12, $13, $14, $15
             )",
        )
        .bind(event.category)
        .bind(event.accel_x)
        .bind(event.accel_y)
        .bind(event.accel_z)
        .bind(event.gyro_x)
        .bind(event.gyro_y)
        .bind(event.gyro_z)
        .bind(event.heart_rate_bpm)
        .bind(event.spo2)
        .bind(event.latitude)
        .bind(event.longitude)
        .bind(event.neo6m_altitude_meter)
        .bind(event.pressure_pa)
        .bind(event.bmp280_altitude_meter)
        .bind(device_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}
