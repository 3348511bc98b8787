//! Subscriber repository for database operations.

use anyhow::Result;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::entities::subscriber;

/// Repository for subscriber-related database operations.
pub struct SubscriberRepository;

impl SubscriberRepository {
    /// Get all subscribers, newest sequence number first.
    pub async fn get_all<C>(conn: &C) -> Result<Vec<subscriber::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(subscriber::Entity::find()
            .order_by_desc(subscriber::Column::Seq)
            .all(conn)
            .await?)
    }

    /// Get a single subscriber by email.
    pub async fn get_by_email<C>(conn: &C, email: &str) -> Result<Option<subscriber::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(subscriber::Entity::find()
            .filter(subscriber::Column::Email.eq(email))
            .one(conn)
            .await?)
    }

    /// Next free sequence number (highest + 1, starting at 1).
    pub async fn next_seq<C>(conn: &C) -> Result<i32>
    where
        C: ConnectionTrait,
    {
        let last = subscriber::Entity::find()
            .order_by_desc(subscriber::Column::Seq)
            .one(conn)
            .await?;
        Ok(last.map(|s| s.seq + 1).unwrap_or(1))
    }

    /// Insert a subscriber with the next sequence number.
    pub async fn create<C>(conn: &C, email: &str) -> Result<subscriber::Model>
    where
        C: ConnectionTrait,
    {
        let seq = Self::next_seq(conn).await?;
        let now = Utc::now();
        let model = subscriber::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            seq: ActiveValue::Set(seq),
            email: ActiveValue::Set(email.to_string()),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        };
        Ok(model.insert(conn).await?)
    }

    /// Delete a subscriber; returns whether a row was removed.
    pub async fn delete<C>(conn: &C, id: &Uuid) -> Result<bool>
    where
        C: ConnectionTrait,
    {
        let result = subscriber::Entity::delete_by_id(*id).exec(conn).await?;
        Ok(result.rows_affected > 0)
    }
}
