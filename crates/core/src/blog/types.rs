use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A blog author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Logical id. Stored upper-cased inside the sort key.
    pub id: String,
    pub name: String,
    /// Stored lower-cased.
    pub email: String,
}

impl Author {
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
        }
    }
}

/// A blog post written by an [`Author`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blog {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_date: NaiveDate,
    pub published: bool,
    pub view_count: u64,
    /// Logical id of the author.
    pub author_id: String,
}

impl Blog {
    /// Creates an unpublished blog with no views.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        author_id: impl Into<String>,
        created_date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: String::new(),
            created_date,
            published: false,
            view_count: 0,
            author_id: author_id.into(),
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_published(mut self, published: bool) -> Self {
        self.published = published;
        self
    }
}

/// Keys-only record read from the `BlogsByAuthor` index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogsByAuthorKeys {
    /// Base-table sort key, `BLOG#<ID>`.
    pub sort_key: String,
    /// `AUTHOR#<ID>` of the blog's author.
    pub author_key: String,
    pub created_date: String,
}

/// Keys-only record read from the `BlogsByCreatedDate` index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogsByCreatedDateKeys {
    pub sort_key: String,
    pub created_date: String,
}
