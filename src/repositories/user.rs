//! User repository for database operations.

use anyhow::Result;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::entities::user;

/// Fields for a user created on first login.
#[derive(Clone, Debug)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub is_allowed: bool,
    pub is_admin: bool,
}

/// Repository for user-related database operations.
pub struct UserRepository;

impl UserRepository {
    /// Get all users ordered by name.
    pub async fn get_all<C>(conn: &C) -> Result<Vec<user::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(user::Entity::find().order_by_asc(user::Column::Name).all(conn).await?)
    }

    /// Get a single user by id.
    pub async fn get_by_id<C>(conn: &C, id: &Uuid) -> Result<Option<user::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(user::Entity::find_by_id(*id).one(conn).await?)
    }

    /// Get a single user by email.
    pub async fn get_by_email<C>(conn: &C, email: &str) -> Result<Option<user::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(user::Entity::find().filter(user::Column::Email.eq(email)).one(conn).await?)
    }

    /// Insert a new user.
    pub async fn create<C>(conn: &C, new_user: NewUser) -> Result<user::Model>
    where
        C: ConnectionTrait,
    {
        let model = user::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            name: ActiveValue::Set(new_user.name),
            email: ActiveValue::Set(new_user.email),
            avatar: ActiveValue::Set(new_user.avatar),
            is_allowed: ActiveValue::Set(new_user.is_allowed),
            is_admin: ActiveValue::Set(new_user.is_admin),
            created_at: ActiveValue::Set(Utc::now()),
        };
        Ok(model.insert(conn).await?)
    }

    /// Set the allow-list flag, returning `None` when the user does not exist.
    pub async fn set_allowed<C>(conn: &C, id: &Uuid, is_allowed: bool) -> Result<Option<user::Model>>
    where
        C: ConnectionTrait,
    {
        let Some(existing) = Self::get_by_id(conn, id).await? else {
            return Ok(None);
        };

        let mut active: user::ActiveModel = existing.into();
        active.is_allowed = ActiveValue::Set(is_allowed);
        Ok(Some(active.update(conn).await?))
    }

    /// Delete a user; returns whether a row was removed.
    pub async fn delete<C>(conn: &C, id: &Uuid) -> Result<bool>
    where
        C: ConnectionTrait,
    {
        let result = user::Entity::delete_by_id(*id).exec(conn).await?;
        Ok(result.rows_affected > 0)
    }
}
