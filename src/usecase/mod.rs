pub mod bookmarks;
pub mod contracts;
pub mod error;
pub mod sanitize;
pub mod validation;
