mod items;
mod sorting;
mod types;

pub use items::{
    author_key, blog_key, AUTHOR_ID, CONTENT, CREATED_DATE, EMAIL, NAME, PUBLISHED, TITLE,
    VIEW_COUNT,
};
pub use sorting::sort_newest_first;
pub use types::{Author, Blog, BlogsByAuthorKeys, BlogsByCreatedDateKeys};
