use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use blogstore_core::blog::{
    blog_key, sort_newest_first, Author, Blog, BlogsByAuthorKeys, BlogsByCreatedDateKeys,
    VIEW_COUNT,
};
use blogstore_core::keys;
use blogstore_core::storage::{
    AttributeValue, Condition, Entity, IndexProjection, RepositoryError, Result, SortOrder,
    TableStore, Update,
};

use crate::repository::{BatchRehydrator, IndexReader, TableRepository};
use crate::services::AuthorService;

/// Blog operations, including the index-backed listings.
#[derive(Clone)]
pub struct BlogService {
    blogs: TableRepository<Blog>,
    authors: AuthorService,
    by_author: IndexReader<BlogsByAuthorKeys>,
    by_created_date: IndexReader<BlogsByCreatedDateKeys>,
    rehydrator: BatchRehydrator<Blog>,
}

impl BlogService {
    pub fn new(store: Arc<dyn TableStore>, table_prefix: &str, authors: AuthorService) -> Self {
        let blogs = TableRepository::new(Arc::clone(&store), table_prefix);

        Self {
            rehydrator: BatchRehydrator::new(blogs.clone(), keys::BLOG_TYPE),
            blogs,
            authors,
            by_author: IndexReader::new(Arc::clone(&store), table_prefix),
            by_created_date: IndexReader::new(store, table_prefix),
        }
    }

    /// Upserts the blog. The author must already exist.
    pub async fn save(&self, blog: &Blog, cancel: &CancellationToken) -> Result<()> {
        if self
            .authors
            .get_by_id(&blog.author_id, cancel)
            .await?
            .is_none()
        {
            tracing::warn!(
                blog_id = %blog.id,
                author_id = %blog.author_id,
                "Rejecting blog for unknown author"
            );
            return Err(RepositoryError::InvalidReference {
                entity_type: Author::ENTITY_TYPE,
                id: blog.author_id.clone(),
            });
        }

        tracing::debug!(blog_id = %blog.id, author_id = %blog.author_id, "Saving blog");
        self.blogs.save(blog, cancel).await
    }

    pub async fn delete(&self, blog_id: &str, cancel: &CancellationToken) -> Result<()> {
        tracing::debug!(blog_id = %blog_id, "Deleting blog");
        self.blogs.delete_key(&blog_key(blog_id), cancel).await
    }

    pub async fn get_by_id(
        &self,
        blog_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Blog>> {
        self.blogs.get(&blog_key(blog_id), cancel).await
    }

    /// Every blog, newest first.
    pub async fn list_all(&self, cancel: &CancellationToken) -> Result<Vec<Blog>> {
        let projections = self
            .by_created_date
            .read(keys::BLOG_TYPE, SortOrder::Descending, cancel)
            .await?;

        self.rehydrate_newest_first(&projections, cancel).await
    }

    /// Blogs written by one author, newest first.
    pub async fn list_by_author(
        &self,
        author_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Blog>> {
        let projections = self
            .by_author
            .read(&keys::author_sort_key(author_id), SortOrder::Descending, cancel)
            .await?;

        self.rehydrate_newest_first(&projections, cancel).await
    }

    /// Atomically adds one to the view count and returns the updated blog.
    pub async fn record_view(&self, blog_id: &str, cancel: &CancellationToken) -> Result<Blog> {
        let not_found = || RepositoryError::NotFound {
            entity_type: Blog::ENTITY_TYPE,
            id: blog_id.to_string(),
        };

        let updated = self
            .blogs
            .update(
                &blog_key(blog_id),
                &[Update::Add(VIEW_COUNT.to_string(), AttributeValue::number(1))],
                Some(&Condition::exists(keys::PK)),
                cancel,
            )
            .await
            .map_err(|err| match err {
                RepositoryError::PreconditionFailed(_) => not_found(),
                other => other,
            })?;

        updated.ok_or_else(not_found)
    }

    async fn rehydrate_newest_first<P: IndexProjection>(
        &self,
        projections: &[P],
        cancel: &CancellationToken,
    ) -> Result<Vec<Blog>> {
        let sort_keys: Vec<String> = projections
            .iter()
            .map(|projection| projection.base_sort_key().to_string())
            .collect();

        let mut blogs = self.rehydrator.rehydrate(&sort_keys, cancel).await?;
        sort_newest_first(&mut blogs);
        Ok(blogs)
    }
}
