use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    domain::bookmark::{Bookmark, NewBookmark},
    repository::errors::RepositoryError,
    usecase::contracts::BookmarkRepository,
};

pub struct PostgresBookmarkRepository {
    pool: PgPool,
}

impl PostgresBookmarkRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookmarkRepository for PostgresBookmarkRepository {
    #[tracing::instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<Bookmark>, RepositoryError> {
        tracing::debug!("listing bookmarks");

        let bookmarks = sqlx::query_as::<_, Bookmark>(
            r#"
            SELECT id, title, url, description, rating
            FROM bookmarks
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        tracing::debug!(count = bookmarks.len(), "found bookmarks");
        Ok(bookmarks)
    }

    #[tracing::instrument(skip(self), fields(bookmark_id = id))]
    async fn find_by_id(&self, id: i64) -> Result<Option<Bookmark>, RepositoryError> {
        tracing::debug!("finding bookmark by id");

        let bookmark = sqlx::query_as::<_, Bookmark>(
            r#"
            SELECT id, title, url, description, rating
            FROM bookmarks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(bookmark)
    }

    #[tracing::instrument(skip(self, bookmark))]
    async fn insert(&self, bookmark: &NewBookmark) -> Result<Bookmark, RepositoryError> {
        tracing::debug!("inserting bookmark");

        let created = sqlx::query_as::<_, Bookmark>(
            r#"
            INSERT INTO bookmarks (title, url, description, rating)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, url, description, rating
            "#,
        )
        .bind(&bookmark.title)
        .bind(&bookmark.url)
        .bind(&bookmark.description)
        .bind(bookmark.rating)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        tracing::debug!(bookmark_id = created.id, "bookmark inserted successfully");
        Ok(created)
    }

    #[tracing::instrument(skip(self, bookmark), fields(bookmark_id = id))]
    async fn update(&self, id: i64, bookmark: &NewBookmark) -> Result<(), RepositoryError> {
        tracing::debug!("updating bookmark");

        let result = sqlx::query(
            r#"
            UPDATE bookmarks
            SET title = $2, url = $3, description = $4, rating = $5
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&bookmark.title)
        .bind(&bookmark.url)
        .bind(&bookmark.description)
        .bind(bookmark.rating)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tracing::debug!(bookmark_id = id, "bookmark updated successfully");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(bookmark_id = id))]
    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        tracing::debug!("deleting bookmark");

        let result = sqlx::query(
            r#"
            DELETE FROM bookmarks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tracing::debug!(bookmark_id = id, "bookmark deleted successfully");
        Ok(())
    }
}

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}
