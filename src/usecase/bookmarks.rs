use crate::domain::bookmark::{Bookmark, BookmarkDraft};
use crate::usecase::contracts::BookmarkRepository;
use crate::usecase::error::UsecaseError;
use crate::usecase::validation::{self, ValidationError};

pub struct BookmarksUseCase<R>
where
    R: BookmarkRepository,
{
    bookmark_repository: R,
}

impl<R> BookmarksUseCase<R>
where
    R: BookmarkRepository,
{
    pub fn new(bookmark_repository: R) -> Self {
        Self {
            bookmark_repository,
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_bookmarks(&self) -> Result<Vec<Bookmark>, UsecaseError> {
        tracing::debug!("listing bookmarks");

        let bookmarks = self.bookmark_repository.list_all().await?;

        tracing::debug!(count = bookmarks.len(), "bookmarks listed");
        Ok(bookmarks)
    }

    #[tracing::instrument(skip(self), fields(bookmark_id = id))]
    pub async fn get_bookmark(&self, id: i64) -> Result<Bookmark, UsecaseError> {
        tracing::debug!("getting bookmark");

        self.bookmark_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| UsecaseError::NotFound("Bookmark".to_string()))
    }

    #[tracing::instrument(skip(self, draft))]
    pub async fn create_bookmark(&self, draft: BookmarkDraft) -> Result<Bookmark, UsecaseError> {
        tracing::debug!("creating bookmark");

        let bookmark = validation::validate_create(draft).inspect_err(record_rejection)?;
        let created = self.bookmark_repository.insert(&bookmark).await?;

        tracing::info!(bookmark_id = created.id, "bookmark created");
        Ok(created)
    }

    /// Merges `patch` into the stored bookmark and writes the whole record
    /// back. Nothing is written unless the merged record is valid.
    #[tracing::instrument(skip(self, patch), fields(bookmark_id = id))]
    pub async fn update_bookmark(
        &self,
        id: i64,
        patch: BookmarkDraft,
    ) -> Result<Bookmark, UsecaseError> {
        tracing::debug!("updating bookmark");

        let existing = self.get_bookmark(id).await?;
        let merged = validation::validate_update(&existing, patch).inspect_err(record_rejection)?;
        self.bookmark_repository.update(id, &merged).await?;

        tracing::info!(bookmark_id = id, "bookmark updated");
        Ok(merged.into_bookmark(id))
    }

    #[tracing::instrument(skip(self), fields(bookmark_id = id))]
    pub async fn delete_bookmark(&self, id: i64) -> Result<(), UsecaseError> {
        tracing::debug!("deleting bookmark");

        self.get_bookmark(id).await?;
        self.bookmark_repository.delete(id).await?;

        tracing::info!(bookmark_id = id, "bookmark deleted");
        Ok(())
    }
}

fn record_rejection(error: &ValidationError) {
    tracing::warn!(%error, "bookmark rejected");
    metrics::counter!("bookmark_validation_failures_total", "reason" => error.reason())
        .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bookmark::{NewBookmark, RatingValue};
    use crate::repository::errors::RepositoryError;
    use crate::usecase::contracts::MockBookmarkRepository;

    fn make_bookmarks() -> Vec<Bookmark> {
        vec![
            Bookmark {
                id: 1,
                title: "Google".to_string(),
                url: "http://google.com".to_string(),
                description: "An indie search engine startup".to_string(),
                rating: 4,
            },
            Bookmark {
                id: 2,
                title: "Fluffiest Cats in the World".to_string(),
                url: "http://medium.com/bloggerx/fluffiest-cats-334".to_string(),
                description: "The only list of fluffy cats online".to_string(),
                rating: 5,
            },
            Bookmark {
                id: 3,
                title: "No description".to_string(),
                url: "http://nodescription.com".to_string(),
                description: String::new(),
                rating: 1,
            },
        ]
    }

    fn draft(rating: &str) -> BookmarkDraft {
        BookmarkDraft {
            title: Some("New Bookmark".to_string()),
            url: Some("http://www.google.com".to_string()),
            description: Some("description".to_string()),
            rating: Some(serde_json::from_str::<RatingValue>(rating).unwrap()),
        }
    }

    #[tokio::test]
    async fn test_list_bookmarks() {
        let mut mock_repo = MockBookmarkRepository::new();
        mock_repo
            .expect_list_all()
            .times(1)
            .returning(|| Ok(make_bookmarks()));

        let usecase = BookmarksUseCase::new(mock_repo);
        let bookmarks = usecase.list_bookmarks().await.unwrap();

        assert_eq!(bookmarks, make_bookmarks());
    }

    #[tokio::test]
    async fn test_get_bookmark_not_found() {
        let mut mock_repo = MockBookmarkRepository::new();
        mock_repo
            .expect_find_by_id()
            .with(mockall::predicate::eq(2))
            .times(1)
            .returning(|_| Ok(None));

        let usecase = BookmarksUseCase::new(mock_repo);
        let result = usecase.get_bookmark(2).await;

        assert!(matches!(result, Err(UsecaseError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_bookmark() {
        let mut mock_repo = MockBookmarkRepository::new();
        mock_repo
            .expect_insert()
            .withf(|b: &NewBookmark| b.title == "New Bookmark" && b.rating == 3)
            .times(1)
            .returning(|b| Ok(b.clone().into_bookmark(4)));

        let usecase = BookmarksUseCase::new(mock_repo);
        let created = usecase.create_bookmark(draft("\"3\"")).await.unwrap();

        assert_eq!(created.id, 4);
        assert_eq!(created.rating, 3);
        assert_eq!(created.url, "http://www.google.com");
    }

    #[tokio::test]
    async fn test_create_bookmark_invalid_never_reaches_store() {
        let mut mock_repo = MockBookmarkRepository::new();
        mock_repo.expect_insert().times(0);

        let usecase = BookmarksUseCase::new(mock_repo);
        let result = usecase.create_bookmark(draft("\"7\"")).await;

        match result {
            Err(UsecaseError::Validation(msg)) => {
                assert_eq!(msg, "rating must be a number between 1 and 5")
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_update_bookmark_partial() {
        let mut mock_repo = MockBookmarkRepository::new();
        mock_repo
            .expect_find_by_id()
            .with(mockall::predicate::eq(2))
            .times(1)
            .returning(|id| Ok(make_bookmarks().into_iter().find(|b| b.id == id)));
        mock_repo
            .expect_update()
            .withf(|id, b| {
                *id == 2
                    && b.title == "Updated Partial"
                    && b.url == "http://medium.com/bloggerx/fluffiest-cats-334"
                    && b.rating == 5
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let usecase = BookmarksUseCase::new(mock_repo);
        let patch = BookmarkDraft {
            title: Some("Updated Partial".to_string()),
            ..BookmarkDraft::default()
        };
        let updated = usecase.update_bookmark(2, patch).await.unwrap();

        let expected = Bookmark {
            title: "Updated Partial".to_string(),
            ..make_bookmarks()[1].clone()
        };
        assert_eq!(updated, expected);
    }

    #[tokio::test]
    async fn test_update_bookmark_not_found() {
        let mut mock_repo = MockBookmarkRepository::new();
        mock_repo.expect_find_by_id().times(1).returning(|_| Ok(None));
        mock_repo.expect_update().times(0);

        let usecase = BookmarksUseCase::new(mock_repo);
        let patch = BookmarkDraft {
            title: Some("Anything".to_string()),
            ..BookmarkDraft::default()
        };
        let result = usecase.update_bookmark(9, patch).await;

        assert!(matches!(result, Err(UsecaseError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_bookmark_empty_patch() {
        let mut mock_repo = MockBookmarkRepository::new();
        mock_repo
            .expect_find_by_id()
            .times(1)
            .returning(|id| Ok(make_bookmarks().into_iter().find(|b| b.id == id)));
        mock_repo.expect_update().times(0);

        let usecase = BookmarksUseCase::new(mock_repo);
        let result = usecase.update_bookmark(1, BookmarkDraft::default()).await;

        match result {
            Err(UsecaseError::Validation(msg)) => assert_eq!(
                msg,
                "Request body must contain at least one field to update"
            ),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_update_bookmark_lost_race_with_delete() {
        let mut mock_repo = MockBookmarkRepository::new();
        mock_repo
            .expect_find_by_id()
            .times(1)
            .returning(|id| Ok(make_bookmarks().into_iter().find(|b| b.id == id)));
        mock_repo
            .expect_update()
            .times(1)
            .returning(|_, _| Err(RepositoryError::NotFound));

        let usecase = BookmarksUseCase::new(mock_repo);
        let patch = BookmarkDraft {
            description: Some("gone".to_string()),
            ..BookmarkDraft::default()
        };
        let result = usecase.update_bookmark(3, patch).await;

        assert!(matches!(result, Err(UsecaseError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_bookmark() {
        let mut mock_repo = MockBookmarkRepository::new();
        mock_repo
            .expect_find_by_id()
            .times(1)
            .returning(|id| Ok(make_bookmarks().into_iter().find(|b| b.id == id)));
        mock_repo
            .expect_delete()
            .with(mockall::predicate::eq(2))
            .times(1)
            .returning(|_| Ok(()));

        let usecase = BookmarksUseCase::new(mock_repo);

        assert!(usecase.delete_bookmark(2).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_missing_bookmark_is_always_not_found() {
        let mut mock_repo = MockBookmarkRepository::new();
        mock_repo.expect_find_by_id().times(2).returning(|_| Ok(None));
        mock_repo.expect_delete().times(0);

        let usecase = BookmarksUseCase::new(mock_repo);

        assert!(matches!(
            usecase.delete_bookmark(2).await,
            Err(UsecaseError::NotFound(_))
        ));
        assert!(matches!(
            usecase.delete_bookmark(2).await,
            Err(UsecaseError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_store_failure_is_internal() {
        let mut mock_repo = MockBookmarkRepository::new();
        mock_repo
            .expect_list_all()
            .times(1)
            .returning(|| Err(RepositoryError::DatabaseError("connection reset".to_string())));

        let usecase = BookmarksUseCase::new(mock_repo);

        assert!(matches!(
            usecase.list_bookmarks().await,
            Err(UsecaseError::Internal(_))
        ));
    }
}
