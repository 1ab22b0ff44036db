//! Neutralizes markup in free-text bookmark fields before they leave the
//! service. Only angle brackets are escaped, so ampersands in query strings
//! and quotes in plain text come back exactly as they were stored.

use crate::domain::bookmark::Bookmark;

pub fn sanitize(value: &str) -> String {
    value.replace('<', "&lt;").replace('>', "&gt;")
}

pub fn sanitize_bookmark(bookmark: Bookmark) -> Bookmark {
    Bookmark {
        id: bookmark.id,
        title: sanitize(&bookmark.title),
        url: sanitize(&bookmark.url),
        description: sanitize(&bookmark.description),
        rating: bookmark.rating,
    }
}
