//! Highlight repository for database operations.

use anyhow::Result;
use sea_orm::sea_query::LikeExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use uuid::Uuid;

use super::listing::{like_pattern, ListWindow, SortOrder};
use crate::entities::{category, highlight};

/// Highlight joined with its (optional) category.
pub type PopulatedHighlight = (highlight::Model, Option<category::Model>);

/// Filter, sort and window for highlight listings.
#[derive(Clone, Debug, Default)]
pub struct HighlightFilter {
    pub status: Option<highlight::Status>,
    pub title_like: Option<String>,
    /// `None` sorts by creation time, newest first
    pub sort: Option<highlight::Column>,
    pub order: SortOrder,
    pub window: ListWindow,
}

impl HighlightFilter {
    fn condition(&self) -> Condition {
        let mut condition = Condition::all();
        if let Some(status) = self.status {
            condition = condition.add(highlight::Column::Status.eq(status));
        }
        if let Some(title) = self.title_like.as_deref().filter(|t| !t.is_empty()) {
            condition = condition.add(highlight::Column::Title.like(LikeExpr::new(like_pattern(title)).escape('\\')));
        }
        condition
    }

    /// Map an API field name to a sortable column.
    pub fn sort_column(field: &str) -> Option<highlight::Column> {
        match field {
            "id" | "_id" => Some(highlight::Column::Id),
            "seq" => Some(highlight::Column::Seq),
            "title" => Some(highlight::Column::Title),
            "date" => Some(highlight::Column::Date),
            "location" => Some(highlight::Column::Location),
            "status" => Some(highlight::Column::Status),
            "createdAt" => Some(highlight::Column::CreatedAt),
            "updatedAt" => Some(highlight::Column::UpdatedAt),
            _ => None,
        }
    }
}

/// Repository for highlight-related database operations.
pub struct HighlightRepository;

impl HighlightRepository {
    /// Count and fetch one window of highlights with their categories.
    pub async fn list<C>(conn: &C, filter: &HighlightFilter) -> Result<(u64, Vec<PopulatedHighlight>)>
    where
        C: ConnectionTrait,
    {
        let total = highlight::Entity::find()
            .filter(filter.condition())
            .count(conn)
            .await?;

        let mut query = highlight::Entity::find()
            .filter(filter.condition())
            .find_also_related(category::Entity);

        query = match filter.sort {
            Some(column) => query.order_by(column, filter.order.to_order()),
            None => query.order_by_desc(highlight::Column::CreatedAt),
        };

        let rows = query
            .offset(filter.window.offset())
            .limit(filter.window.fetch_limit())
            .all(conn)
            .await?;

        Ok((total, rows))
    }

    /// Latest published highlights by event date.
    pub async fn get_published_recent<C>(conn: &C, limit: u64) -> Result<Vec<PopulatedHighlight>>
    where
        C: ConnectionTrait,
    {
        Ok(highlight::Entity::find()
            .filter(highlight::Column::Status.eq(highlight::Status::Published))
            .find_also_related(category::Entity)
            .order_by_desc(highlight::Column::Date)
            .limit(limit)
            .all(conn)
            .await?)
    }

    /// Get a single highlight by id.
    pub async fn get_by_id<C>(conn: &C, id: &Uuid) -> Result<Option<highlight::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(highlight::Entity::find_by_id(*id).one(conn).await?)
    }

    /// Get a single highlight by id with its category populated.
    pub async fn get_populated<C>(conn: &C, id: &Uuid) -> Result<Option<PopulatedHighlight>>
    where
        C: ConnectionTrait,
    {
        Ok(highlight::Entity::find_by_id(*id)
            .find_also_related(category::Entity)
            .one(conn)
            .await?)
    }

    /// Get every highlight whose id is in `ids`.
    pub async fn get_many<C>(conn: &C, ids: &[Uuid]) -> Result<Vec<highlight::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(highlight::Entity::find()
            .filter(highlight::Column::Id.is_in(ids.iter().copied()))
            .all(conn)
            .await?)
    }

    /// Next free sequence number (highest + 1, starting at 1).
    pub async fn next_seq<C>(conn: &C) -> Result<i32>
    where
        C: ConnectionTrait,
    {
        let last = highlight::Entity::find()
            .order_by_desc(highlight::Column::Seq)
            .one(conn)
            .await?;
        Ok(last.map(|h| h.seq + 1).unwrap_or(1))
    }

    /// Whether another highlight already uses `seq`.
    pub async fn seq_taken<C>(conn: &C, seq: i32, exclude: Option<Uuid>) -> Result<bool>
    where
        C: ConnectionTrait,
    {
        let mut query = highlight::Entity::find().filter(highlight::Column::Seq.eq(seq));
        if let Some(id) = exclude {
            query = query.filter(highlight::Column::Id.ne(id));
        }
        Ok(query.count(conn).await? > 0)
    }

    /// Insert a new highlight.
    pub async fn create<C>(conn: &C, highlight: highlight::ActiveModel) -> Result<highlight::Model>
    where
        C: ConnectionTrait,
    {
        Ok(highlight.insert(conn).await?)
    }

    /// Update a highlight in the database.
    pub async fn update<C>(conn: &C, highlight: highlight::ActiveModel) -> Result<highlight::Model>
    where
        C: ConnectionTrait,
    {
        Ok(highlight.update(conn).await?)
    }

    /// Delete every highlight whose id is in `ids`; returns the number removed.
    pub async fn delete_many<C>(conn: &C, ids: &[Uuid]) -> Result<u64>
    where
        C: ConnectionTrait,
    {
        let result = highlight::Entity::delete_many()
            .filter(highlight::Column::Id.is_in(ids.iter().copied()))
            .exec(conn)
            .await?;
        Ok(result.rows_affected)
    }
}
