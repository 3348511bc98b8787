//! SDG reference list repository.

use anyhow::Result;
use sea_orm::{ActiveValue, ConnectionTrait, EntityTrait, PaginatorTrait, QueryOrder};
use uuid::Uuid;

use crate::constants::SDG_GOALS;
use crate::entities::sdg;

/// Repository for the seeded SDG labels.
pub struct SdgRepository;

impl SdgRepository {
    /// Get all SDG labels in insertion order.
    pub async fn get_all<C>(conn: &C) -> Result<Vec<sdg::Model>>
    where
        C: ConnectionTrait,
    {
        let mut rows = sdg::Entity::find().order_by_asc(sdg::Column::Sdg).all(conn).await?;
        // Lexical order puts SDG-10 before SDG-2
        rows.sort_by_key(|row| SDG_GOALS.iter().position(|goal| *goal == row.sdg).unwrap_or(usize::MAX));
        Ok(rows)
    }

    /// Insert the 17 goals if the table is empty; returns the number inserted.
    pub async fn seed<C>(conn: &C) -> Result<usize>
    where
        C: ConnectionTrait,
    {
        if sdg::Entity::find().count(conn).await? > 0 {
            return Ok(0);
        }

        let rows = SDG_GOALS.iter().map(|goal| sdg::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            sdg: ActiveValue::Set(goal.to_string()),
        });
        sdg::Entity::insert_many(rows).exec(conn).await?;
        Ok(SDG_GOALS.len())
    }

    /// Whether `label` is one of the known goals.
    pub fn is_known(label: &str) -> bool {
        SDG_GOALS.contains(&label)
    }
}
