pub mod bookmarks;
pub mod middleware;
