//! Item mapping for authors, blogs and their index projections.

use super::types::{Author, Blog, BlogsByAuthorKeys, BlogsByCreatedDateKeys};
use crate::keys::{self, AUTHOR_TYPE, BLOG_TYPE};
use crate::storage::{
    get_bool, get_date, get_string, get_string_or_default, get_u64_or_default, AttributeValue,
    Entity, IndexProjection, Item, KeySchema, PrimaryKey, Result,
};

// ============================================================================
// Attribute names
// ============================================================================

pub const NAME: &str = "Name";
pub const EMAIL: &str = "Email";
pub const TITLE: &str = "Title";
pub const CONTENT: &str = "Content";
pub const CREATED_DATE: &str = "CreatedDate";
pub const PUBLISHED: &str = "Published";
pub const VIEW_COUNT: &str = "ViewCount";
pub const AUTHOR_ID: &str = "AuthorId";

/// Primary key of the author with the given logical id.
pub fn author_key(author_id: &str) -> PrimaryKey {
    Author::KEY_SCHEMA.composite(AUTHOR_TYPE, keys::author_sort_key(author_id))
}

/// Primary key of the blog with the given logical id.
pub fn blog_key(blog_id: &str) -> PrimaryKey {
    Blog::KEY_SCHEMA.composite(BLOG_TYPE, keys::blog_sort_key(blog_id))
}

fn insert(item: &mut Item, name: &str, value: impl Into<AttributeValue>) {
    item.insert(name.to_string(), value.into());
}

impl Entity for Author {
    const TABLE_NAME: &'static str = keys::BLOG_TABLE;
    const KEY_SCHEMA: KeySchema = KeySchema::pk_sk();
    const ENTITY_TYPE: &'static str = "Author";

    fn primary_key(&self) -> PrimaryKey {
        author_key(&self.id)
    }

    fn to_item(&self) -> Item {
        let mut item = Item::new();
        insert(&mut item, keys::PK, AUTHOR_TYPE);
        insert(&mut item, keys::SK, keys::author_sort_key(&self.id));
        insert(&mut item, NAME, self.name.as_str());
        insert(&mut item, EMAIL, self.email.to_lowercase());
        item
    }

    fn from_item(item: &Item) -> Result<Self> {
        let sort_key = get_string(item, keys::SK)?;

        Ok(Author {
            id: keys::strip_prefix(&sort_key, AUTHOR_TYPE).to_string(),
            name: get_string(item, NAME)?,
            email: get_string(item, EMAIL)?,
        })
    }
}

impl Entity for Blog {
    const TABLE_NAME: &'static str = keys::BLOG_TABLE;
    const KEY_SCHEMA: KeySchema = KeySchema::pk_sk();
    const ENTITY_TYPE: &'static str = "Blog";

    fn primary_key(&self) -> PrimaryKey {
        blog_key(&self.id)
    }

    /// Writes the base attributes together with all four index attributes.
    fn to_item(&self) -> Item {
        let author_key = keys::author_sort_key(&self.author_id);
        let created_date = keys::format_date(self.created_date);

        let mut item = Item::new();
        insert(&mut item, keys::PK, BLOG_TYPE);
        insert(&mut item, keys::SK, keys::blog_sort_key(&self.id));
        insert(&mut item, TITLE, self.title.as_str());
        insert(&mut item, CONTENT, self.content.as_str());
        insert(&mut item, CREATED_DATE, created_date.as_str());
        insert(&mut item, PUBLISHED, self.published);
        insert(&mut item, VIEW_COUNT, self.view_count);
        insert(&mut item, AUTHOR_ID, author_key.as_str());
        insert(&mut item, keys::GSI1PK, author_key);
        insert(&mut item, keys::GSI1SK, created_date.as_str());
        insert(&mut item, keys::GSI2PK, BLOG_TYPE);
        insert(&mut item, keys::GSI2SK, created_date);
        item
    }

    fn from_item(item: &Item) -> Result<Self> {
        let sort_key = get_string(item, keys::SK)?;
        let author_key = get_string(item, AUTHOR_ID)?;

        Ok(Blog {
            id: keys::strip_prefix(&sort_key, BLOG_TYPE).to_string(),
            title: get_string(item, TITLE)?,
            content: get_string_or_default(item, CONTENT)?,
            created_date: get_date(item, CREATED_DATE)?,
            published: get_bool(item, PUBLISHED)?,
            view_count: get_u64_or_default(item, VIEW_COUNT)?,
            author_id: keys::strip_prefix(&author_key, AUTHOR_TYPE).to_string(),
        })
    }
}

impl IndexProjection for BlogsByAuthorKeys {
    const TABLE_NAME: &'static str = keys::BLOG_TABLE;
    const INDEX_NAME: &'static str = keys::BLOGS_BY_AUTHOR_INDEX;
    const PARTITION_ATTRIBUTE: &'static str = keys::GSI1PK;
    const ATTRIBUTES: &'static [&'static str] = &[keys::PK, keys::SK, keys::GSI1PK, keys::GSI1SK];

    fn from_item(item: &Item) -> Result<Self> {
        Ok(BlogsByAuthorKeys {
            sort_key: get_string(item, keys::SK)?,
            author_key: get_string(item, keys::GSI1PK)?,
            created_date: get_string(item, keys::GSI1SK)?,
        })
    }

    fn base_sort_key(&self) -> &str {
        &self.sort_key
    }
}

impl IndexProjection for BlogsByCreatedDateKeys {
    const TABLE_NAME: &'static str = keys::BLOG_TABLE;
    const INDEX_NAME: &'static str = keys::BLOGS_BY_CREATED_DATE_INDEX;
    const PARTITION_ATTRIBUTE: &'static str = keys::GSI2PK;
    const ATTRIBUTES: &'static [&'static str] = &[keys::PK, keys::SK, keys::GSI2PK, keys::GSI2SK];

    fn from_item(item: &Item) -> Result<Self> {
        Ok(BlogsByCreatedDateKeys {
            sort_key: get_string(item, keys::SK)?,
            created_date: get_string(item, keys::GSI2SK)?,
        })
    }

    fn base_sort_key(&self) -> &str {
        &self.sort_key
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::storage::RepositoryError;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn get<'a>(item: &'a Item, name: &str) -> &'a str {
        item.get(name).and_then(AttributeValue::as_s).unwrap()
    }

    #[test]
    fn test_author_to_item() {
        let item = Author::new("a1", "Jane Doe", "Jane@Example.COM").to_item();

        assert_eq!(get(&item, "PK"), "AUTHOR");
        assert_eq!(get(&item, "SK"), "AUTHOR#A1");
        assert_eq!(get(&item, "Name"), "Jane Doe");
        assert_eq!(get(&item, "Email"), "jane@example.com");
    }

    #[test]
    fn test_author_from_item_strips_prefix() {
        let item = Author::new("A1", "Jane", "jane@example.com").to_item();
        let author = Author::from_item(&item).unwrap();

        assert_eq!(author, Author::new("A1", "Jane", "jane@example.com"));
    }

    #[test]
    fn test_blog_to_item_sets_index_attributes() {
        let blog = Blog::new("B1", "Hello", "A1", date(2024, 1, 15)).with_published(true);
        let item = blog.to_item();

        assert_eq!(get(&item, "PK"), "BLOG");
        assert_eq!(get(&item, "SK"), "BLOG#B1");
        assert_eq!(get(&item, "AuthorId"), "AUTHOR#A1");
        assert_eq!(get(&item, "GSI1PK"), "AUTHOR#A1");
        assert_eq!(get(&item, "GSI1SK"), "2024-01-15");
        assert_eq!(get(&item, "GSI2PK"), "BLOG");
        assert_eq!(get(&item, "GSI2SK"), "2024-01-15");
        assert_eq!(get(&item, "CreatedDate"), "2024-01-15");
        assert_eq!(item.get("Published"), Some(&AttributeValue::Bool(true)));
        assert_eq!(item.get("ViewCount"), Some(&AttributeValue::number(0)));
    }

    #[test]
    fn test_blog_from_item() {
        let blog = Blog::new("B1", "Hello", "A1", date(2024, 1, 15)).with_content("Body");
        let parsed = Blog::from_item(&blog.to_item()).unwrap();

        assert_eq!(parsed, blog);
    }

    #[test]
    fn test_blog_from_item_missing_view_count_defaults_to_zero() {
        let mut item = Blog::new("B1", "Hello", "A1", date(2024, 1, 15)).to_item();
        item.remove("ViewCount");

        assert_eq!(Blog::from_item(&item).unwrap().view_count, 0);
    }

    #[test]
    fn test_blog_from_item_missing_content_is_empty() {
        let mut item = Blog::new("B1", "Hello", "A1", date(2024, 1, 15))
            .with_content("Body")
            .to_item();
        item.remove("Content");

        assert_eq!(Blog::from_item(&item).unwrap().content, "");
    }

    #[test]
    fn test_blog_from_item_non_string_content() {
        let mut item = Blog::new("B1", "Hello", "A1", date(2024, 1, 15)).to_item();
        item.insert("Content".to_string(), AttributeValue::number(42));

        assert!(matches!(
            Blog::from_item(&item),
            Err(RepositoryError::InvalidData(_))
        ));
    }

    #[test]
    fn test_blog_from_item_invalid_date() {
        let mut item = Blog::new("B1", "Hello", "A1", date(2024, 1, 15)).to_item();
        item.insert("CreatedDate".to_string(), "15/01/2024".into());

        assert!(matches!(
            Blog::from_item(&item),
            Err(RepositoryError::InvalidData(_))
        ));
    }

    #[test]
    fn test_lowercase_ids_are_normalized() {
        let blog = Blog::new("post-one", "Hello", "jane", date(2024, 1, 15));
        let parsed = Blog::from_item(&blog.to_item()).unwrap();

        assert_eq!(parsed.id, "POST-ONE");
        assert_eq!(parsed.author_id, "JANE");
        assert_eq!(blog_key("post-one"), blog_key("POST-ONE"));
    }

    #[test]
    fn test_projection_attributes() {
        assert_eq!(
            BlogsByAuthorKeys::ATTRIBUTES,
            &["PK", "SK", "GSI1PK", "GSI1SK"]
        );
        assert_eq!(
            BlogsByCreatedDateKeys::ATTRIBUTES,
            &["PK", "SK", "GSI2PK", "GSI2SK"]
        );
    }

    #[test]
    fn test_projection_from_item() {
        let item = Blog::new("B7", "Hello", "A1", date(2024, 3, 2)).to_item();

        let by_author = BlogsByAuthorKeys::from_item(&item).unwrap();
        assert_eq!(by_author.base_sort_key(), "BLOG#B7");
        assert_eq!(by_author.author_key, "AUTHOR#A1");

        let by_date = BlogsByCreatedDateKeys::from_item(&item).unwrap();
        assert_eq!(by_date.base_sort_key(), "BLOG#B7");
        assert_eq!(by_date.created_date, "2024-03-02");
    }
}
