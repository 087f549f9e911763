//! Movie repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::Deserialize;
use uuid::Uuid;

use cinebook_core::movie::Movie;

use super::{SortOrder, default_page, default_per_page};
use crate::entities::movies;

/// Sortable movie fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MovieSortField {
    /// Sort by title.
    Title,
    /// Sort by age restriction.
    AgeRestriction,
    /// Sort by creation instant.
    CreatedAt,
}

impl From<MovieSortField> for movies::Column {
    fn from(field: MovieSortField) -> Self {
        match field {
            MovieSortField::Title => Self::Title,
            MovieSortField::AgeRestriction => Self::AgeRestriction,
            MovieSortField::CreatedAt => Self::CreatedAt,
        }
    }
}

/// Query options for listing movies.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieQuery {
    /// Page number (1-indexed).
    #[serde(default = "default_page")]
    pub page: u32,
    /// Items per page.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    /// Field to sort by.
    #[serde(default)]
    pub sort: Option<MovieSortField>,
    /// Sort direction.
    #[serde(default)]
    pub order: Option<SortOrder>,
    /// Filter by minimum age restriction.
    #[serde(default)]
    pub age_restriction: Option<i32>,
    /// Filter by title (partial match).
    #[serde(default)]
    pub title: Option<String>,
}

impl Default for MovieQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
            sort: None,
            order: None,
            age_restriction: None,
            title: None,
        }
    }
}

/// Movie repository for CRUD operations.
#[derive(Debug, Clone, Copy)]
pub struct MovieRepository;

impl MovieRepository {
    /// Finds a movie by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        conn: &impl ConnectionTrait,
        id: Uuid,
    ) -> Result<Option<movies::Model>, DbErr> {
        movies::Entity::find_by_id(id).one(conn).await
    }

    /// Finds a movie by exact title.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_title(
        conn: &impl ConnectionTrait,
        title: &str,
    ) -> Result<Option<movies::Model>, DbErr> {
        movies::Entity::find()
            .filter(movies::Column::Title.eq(title))
            .one(conn)
            .await
    }

    /// Lists movies matching the query, returning the page and total count.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_all(
        conn: &impl ConnectionTrait,
        query: &MovieQuery,
    ) -> Result<(Vec<movies::Model>, u64), DbErr> {
        let mut select = movies::Entity::find();

        if let Some(title) = &query.title {
            select = select.filter(movies::Column::Title.contains(title));
        }
        if let Some(age) = query.age_restriction {
            select = select.filter(movies::Column::AgeRestriction.gte(age));
        }
        if let Some(sort) = query.sort {
            let order = query.order.unwrap_or(SortOrder::Asc);
            select = select.order_by(movies::Column::from(sort), order.into());
        }

        let total = select.clone().count(conn).await?;
        let page = u64::from(query.page.max(1));
        let per_page = u64::from(query.per_page);
        let rows = select
            .offset((page - 1) * per_page)
            .limit(per_page)
            .all(conn)
            .await?;

        Ok((rows, total))
    }

    /// Inserts a validated movie.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails (including a unique
    /// constraint violation on the title).
    pub async fn insert(
        conn: &impl ConnectionTrait,
        movie: &Movie,
    ) -> Result<movies::Model, DbErr> {
        movies::ActiveModel {
            id: Set(movie.id),
            title: Set(movie.title.clone()),
            age_restriction: Set(movie.age_restriction),
            created_at: Set(movie.created_at.into()),
            updated_at: Set(movie.updated_at.into()),
        }
        .insert(conn)
        .await
    }

    /// Updates an existing movie from its validated domain form.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn update(
        conn: &impl ConnectionTrait,
        movie: &Movie,
    ) -> Result<movies::Model, DbErr> {
        movies::ActiveModel {
            id: Set(movie.id),
            title: Set(movie.title.clone()),
            age_restriction: Set(movie.age_restriction),
            created_at: Set(movie.created_at.into()),
            updated_at: Set(movie.updated_at.into()),
        }
        .update(conn)
        .await
    }

    /// Deletes a movie by ID; sessions cascade at the database level.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(conn: &impl ConnectionTrait, id: Uuid) -> Result<(), DbErr> {
        movies::Entity::delete_by_id(id).exec(conn).await?;
        Ok(())
    }
}
