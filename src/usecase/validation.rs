use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::bookmark::{Bookmark, BookmarkDraft, NewBookmark, RatingValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} required")]
    MissingField(&'static str),

    #[error("rating must be a number between 1 and 5")]
    InvalidRating,

    #[error("'url' must be a valid URL")]
    InvalidUrl,

    #[error("Request body must contain at least one field to update")]
    EmptyPatch,
}

impl ValidationError {
    pub fn reason(&self) -> &'static str {
        match self {
            ValidationError::MissingField(_) => "missing_field",
            ValidationError::InvalidRating => "invalid_rating",
            ValidationError::InvalidUrl => "invalid_url",
            ValidationError::EmptyPatch => "empty_patch",
        }
    }
}

// Constrained fields of `NewBookmark` in reporting order.
const VIOLATIONS: [(&str, ValidationError); 3] = [
    ("title", ValidationError::MissingField("title")),
    ("url", ValidationError::InvalidUrl),
    ("rating", ValidationError::InvalidRating),
];

/// Validates a creation candidate. Every field must be present; the first
/// missing one in the order title, url, description, rating is reported.
pub fn validate_create(draft: BookmarkDraft) -> Result<NewBookmark, ValidationError> {
    let BookmarkDraft {
        title,
        url,
        description,
        rating,
    } = draft;

    let title = title.ok_or(ValidationError::MissingField("title"))?;
    let url = url.ok_or(ValidationError::MissingField("url"))?;
    let description = description.ok_or(ValidationError::MissingField("description"))?;
    let rating = rating.ok_or(ValidationError::MissingField("rating"))?;

    check(NewBookmark {
        title,
        url,
        description,
        rating: coerce_rating(&rating)?,
    })
}

/// Merges `patch` over `existing` and validates the result as a whole. The
/// returned bookmark replaces the stored row entirely.
pub fn validate_update(
    existing: &Bookmark,
    patch: BookmarkDraft,
) -> Result<NewBookmark, ValidationError> {
    if patch.is_empty() {
        return Err(ValidationError::EmptyPatch);
    }

    let mut merged = NewBookmark::from(existing);
    if let Some(title) = patch.title {
        merged.title = title;
    }
    if let Some(url) = patch.url {
        merged.url = url;
    }
    if let Some(description) = patch.description {
        merged.description = description;
    }
    if let Some(rating) = &patch.rating {
        merged.rating = coerce_rating(rating)?;
    }

    check(merged)
}

fn coerce_rating(rating: &RatingValue) -> Result<i32, ValidationError> {
    rating.to_integer().ok_or(ValidationError::InvalidRating)
}

fn check(bookmark: NewBookmark) -> Result<NewBookmark, ValidationError> {
    match bookmark.validate() {
        Ok(()) => Ok(bookmark),
        Err(errors) => Err(first_violation(&errors)),
    }
}

fn first_violation(errors: &ValidationErrors) -> ValidationError {
    let fields = errors.field_errors();
    VIOLATIONS
        .iter()
        .find(|(field, _)| fields.contains_key(*field))
        .map(|(_, violation)| *violation)
        .unwrap_or(ValidationError::InvalidRating)
}
