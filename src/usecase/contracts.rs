use async_trait::async_trait;

use crate::{
    domain::bookmark::{Bookmark, NewBookmark},
    repository::errors::RepositoryError,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookmarkRepository: Send + Sync {
    /// All bookmarks in insertion order.
    async fn list_all(&self) -> Result<Vec<Bookmark>, RepositoryError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Bookmark>, RepositoryError>;
    async fn insert(&self, bookmark: &NewBookmark) -> Result<Bookmark, RepositoryError>;
    /// Replaces every field of the row at `id`.
    async fn update(&self, id: i64, bookmark: &NewBookmark) -> Result<(), RepositoryError>;
    async fn delete(&self, id: i64) -> Result<(), RepositoryError>;
}
