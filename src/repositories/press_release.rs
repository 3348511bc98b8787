//! Press release repository for database operations.

use anyhow::Result;
use sea_orm::sea_query::LikeExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use uuid::Uuid;

use super::listing::{like_pattern, ListWindow, SortOrder};
use crate::entities::press_release;

/// Filter, sort and window for press release listings.
#[derive(Clone, Debug, Default)]
pub struct PressReleaseFilter {
    /// Exact publisher match
    pub publisher: Option<String>,
    pub title_like: Option<String>,
    /// `None` sorts by creation time, newest first
    pub sort: Option<press_release::Column>,
    pub order: SortOrder,
    pub window: ListWindow,
}

impl PressReleaseFilter {
    fn condition(&self) -> Condition {
        let mut condition = Condition::all();
        if let Some(publisher) = self.publisher.as_deref().filter(|p| !p.is_empty()) {
            condition = condition.add(press_release::Column::Publisher.eq(publisher));
        }
        if let Some(title) = self.title_like.as_deref().filter(|t| !t.is_empty()) {
            condition =
                condition.add(press_release::Column::Title.like(LikeExpr::new(like_pattern(title)).escape('\\')));
        }
        condition
    }

    /// Map an API field name to a sortable column.
    pub fn sort_column(field: &str) -> Option<press_release::Column> {
        match field {
            "id" | "_id" => Some(press_release::Column::Id),
            "seq" => Some(press_release::Column::Seq),
            "title" => Some(press_release::Column::Title),
            "publisher" => Some(press_release::Column::Publisher),
            "date" => Some(press_release::Column::Date),
            "createdAt" => Some(press_release::Column::CreatedAt),
            "updatedAt" => Some(press_release::Column::UpdatedAt),
            _ => None,
        }
    }
}

/// Repository for press-release-related database operations.
pub struct PressReleaseRepository;

impl PressReleaseRepository {
    /// Count and fetch one window of press releases.
    pub async fn list<C>(conn: &C, filter: &PressReleaseFilter) -> Result<(u64, Vec<press_release::Model>)>
    where
        C: ConnectionTrait,
    {
        let total = press_release::Entity::find()
            .filter(filter.condition())
            .count(conn)
            .await?;

        let mut query = press_release::Entity::find().filter(filter.condition());
        query = match filter.sort {
            Some(column) => query.order_by(column, filter.order.to_order()),
            None => query.order_by_desc(press_release::Column::CreatedAt),
        };

        let rows = query
            .offset(filter.window.offset())
            .limit(filter.window.fetch_limit())
            .all(conn)
            .await?;

        Ok((total, rows))
    }

    /// Get a single press release by id.
    pub async fn get_by_id<C>(conn: &C, id: &Uuid) -> Result<Option<press_release::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(press_release::Entity::find_by_id(*id).one(conn).await?)
    }

    /// Get every press release whose id is in `ids`.
    pub async fn get_many<C>(conn: &C, ids: &[Uuid]) -> Result<Vec<press_release::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(press_release::Entity::find()
            .filter(press_release::Column::Id.is_in(ids.iter().copied()))
            .all(conn)
            .await?)
    }

    /// Next free sequence number (highest + 1, starting at 1).
    pub async fn next_seq<C>(conn: &C) -> Result<i32>
    where
        C: ConnectionTrait,
    {
        let last = press_release::Entity::find()
            .order_by_desc(press_release::Column::Seq)
            .one(conn)
            .await?;
        Ok(last.map(|p| p.seq + 1).unwrap_or(1))
    }

    /// Whether another press release already uses `seq`.
    pub async fn seq_taken<C>(conn: &C, seq: i32, exclude: Option<Uuid>) -> Result<bool>
    where
        C: ConnectionTrait,
    {
        let mut query = press_release::Entity::find().filter(press_release::Column::Seq.eq(seq));
        if let Some(id) = exclude {
            query = query.filter(press_release::Column::Id.ne(id));
        }
        Ok(query.count(conn).await? > 0)
    }

    /// Insert a new press release.
    pub async fn create<C>(conn: &C, press_release: press_release::ActiveModel) -> Result<press_release::Model>
    where
        C: ConnectionTrait,
    {
        Ok(press_release.insert(conn).await?)
    }

    /// Update a press release in the database.
    pub async fn update<C>(conn: &C, press_release: press_release::ActiveModel) -> Result<press_release::Model>
    where
        C: ConnectionTrait,
    {
        Ok(press_release.update(conn).await?)
    }

    /// Delete every press release whose id is in `ids`; returns the number removed.
    pub async fn delete_many<C>(conn: &C, ids: &[Uuid]) -> Result<u64>
    where
        C: ConnectionTrait,
    {
        let result = press_release::Entity::delete_many()
            .filter(press_release::Column::Id.is_in(ids.iter().copied()))
            .exec(conn)
            .await?;
        Ok(result.rows_affected)
    }
}
