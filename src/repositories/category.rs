//! Category repository for database operations.

use anyhow::Result;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::entities::{category, highlight};

/// Repository for category-related database operations.
pub struct CategoryRepository;

impl CategoryRepository {
    /// Get all categories ordered by name.
    pub async fn get_all<C>(conn: &C) -> Result<Vec<category::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(category::Entity::find()
            .order_by_asc(category::Column::Category)
            .all(conn)
            .await?)
    }

    /// Get a single category by id.
    pub async fn get_by_id<C>(conn: &C, id: &Uuid) -> Result<Option<category::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(category::Entity::find_by_id(*id).one(conn).await?)
    }

    /// Get a single category by its exact name.
    pub async fn get_by_name<C>(conn: &C, name: &str) -> Result<Option<category::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(category::Entity::find()
            .filter(category::Column::Category.eq(name))
            .one(conn)
            .await?)
    }

    /// Create a new category.
    pub async fn create<C>(conn: &C, name: &str) -> Result<category::Model>
    where
        C: ConnectionTrait,
    {
        let now = Utc::now();
        let model = category::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            category: ActiveValue::Set(name.to_string()),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        };
        Ok(model.insert(conn).await?)
    }

    /// Rename a category, returning `None` when it does not exist.
    pub async fn rename<C>(conn: &C, id: &Uuid, name: &str) -> Result<Option<category::Model>>
    where
        C: ConnectionTrait,
    {
        let Some(existing) = Self::get_by_id(conn, id).await? else {
            return Ok(None);
        };

        let mut active: category::ActiveModel = existing.into();
        active.category = ActiveValue::Set(name.to_string());
        active.updated_at = ActiveValue::Set(Utc::now());
        Ok(Some(active.update(conn).await?))
    }

    /// Delete a category and detach it from its highlights; returns whether a
    /// row was removed.
    pub async fn delete<C>(conn: &C, id: &Uuid) -> Result<bool>
    where
        C: ConnectionTrait,
    {
        highlight::Entity::update_many()
            .col_expr(highlight::Column::CategoryId, Expr::value(Option::<Uuid>::None))
            .filter(highlight::Column::CategoryId.eq(*id))
            .exec(conn)
            .await?;

        let result = category::Entity::delete_by_id(*id).exec(conn).await?;
        Ok(result.rows_affected > 0)
    }
}
