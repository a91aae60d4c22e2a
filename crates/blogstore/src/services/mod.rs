//! Author and blog operations on top of the repositories.
//!
//! Blog listings read keys from an index, batch-get the full items and sort
//! them newest first.

mod author;
mod blog;

pub use author::AuthorService;
pub use blog::BlogService;
