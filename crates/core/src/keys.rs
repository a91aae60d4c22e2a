//! Key generation functions for the single-table design.
//!
//! Pure functions for building and parsing partition, sort and GSI key values.
//! All functions are sync and have no side effects.

use chrono::NaiveDate;

// ============================================================================
// Type tags and delimiter
// ============================================================================

pub const AUTHOR_TYPE: &str = "AUTHOR";
pub const BLOG_TYPE: &str = "BLOG";
pub const DELIMITER: &str = "#";

// ============================================================================
// Table, attribute and index names
// ============================================================================

/// Declared (unprefixed) name of the table holding authors and blogs.
pub const BLOG_TABLE: &str = "Blogs";

pub const PK: &str = "PK";
pub const SK: &str = "SK";
pub const GSI1PK: &str = "GSI1PK";
pub const GSI1SK: &str = "GSI1SK";
pub const GSI2PK: &str = "GSI2PK";
pub const GSI2SK: &str = "GSI2SK";

/// GSI1: blogs of one author, ordered by created date.
pub const BLOGS_BY_AUTHOR_INDEX: &str = "BlogsByAuthor";
/// GSI2: every blog, ordered by created date.
pub const BLOGS_BY_CREATED_DATE_INDEX: &str = "BlogsByCreatedDate";

/// Storage format for dates. Lexicographic order equals chronological order.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// Sort keys
// ============================================================================

/// Build a sort key from a type tag and a logical id.
///
/// Pattern: `<TYPE_TAG>#<ID>`, upper-cased as a whole. Ids that only differ
/// in case produce the same key.
pub fn build_sort_key(type_tag: &str, id: &str) -> String {
    format!("{type_tag}{DELIMITER}{id}").to_uppercase()
}

/// Remove the `<type_tag>#` prefix from a sort key, once.
///
/// Returns the input unchanged when the prefix is absent.
pub fn strip_prefix<'a>(sort_key: &'a str, type_tag: &str) -> &'a str {
    sort_key
        .strip_prefix(type_tag)
        .and_then(|rest| rest.strip_prefix(DELIMITER))
        .unwrap_or(sort_key)
}

/// Generate the sort key for an Author.
///
/// Pattern: `AUTHOR#<AUTHOR_ID>`
pub fn author_sort_key(author_id: &str) -> String {
    build_sort_key(AUTHOR_TYPE, author_id)
}

/// Generate the sort key for a Blog.
///
/// Pattern: `BLOG#<BLOG_ID>`
pub fn blog_sort_key(blog_id: &str) -> String {
    build_sort_key(BLOG_TYPE, blog_id)
}

// ============================================================================
// Dates
// ============================================================================

/// Format a date for storage and for use as a GSI sort key.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a stored `yyyy-MM-dd` date.
pub fn parse_date(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_sort_key_uppercases() {
        assert_eq!(build_sort_key("author", "abc"), "AUTHOR#ABC");
        assert_eq!(build_sort_key("author", "ABC"), "AUTHOR#ABC");
    }

    #[test]
    fn test_mixed_case_ids_collide() {
        assert_eq!(author_sort_key("JaneDoe"), author_sort_key("janedoe"));
    }

    #[test]
    fn test_author_and_blog_sort_keys() {
        assert_eq!(author_sort_key("a1"), "AUTHOR#A1");
        assert_eq!(blog_sort_key("b1"), "BLOG#B1");
    }

    #[test]
    fn test_round_trip_uppercase_alphanumeric() {
        for tag in [AUTHOR_TYPE, BLOG_TYPE] {
            for id in ["A1", "B2C3", "0", "ZZZ999", "X"] {
                assert_eq!(strip_prefix(&build_sort_key(tag, id), tag), id);
            }
        }
    }

    #[test]
    fn test_round_trip_is_lossy_for_lowercase_ids() {
        let key = build_sort_key(BLOG_TYPE, "post-one");
        assert_eq!(strip_prefix(&key, BLOG_TYPE), "POST-ONE");
    }

    #[test]
    fn test_strip_prefix_removes_once() {
        assert_eq!(strip_prefix("BLOG#BLOG#X", BLOG_TYPE), "BLOG#X");
    }

    #[test]
    fn test_strip_prefix_without_match_is_unchanged() {
        assert_eq!(strip_prefix("AUTHOR#A1", BLOG_TYPE), "AUTHOR#A1");
        assert_eq!(strip_prefix("BLOGA1", BLOG_TYPE), "BLOGA1");
        assert_eq!(strip_prefix("", BLOG_TYPE), "");
    }

    #[test]
    fn test_format_and_parse_date() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(format_date(date), "2024-01-05");
        assert_eq!(parse_date("2024-01-05").unwrap(), date);
        assert!(parse_date("05/01/2024").is_err());
    }

    #[test]
    fn test_date_strings_sort_chronologically() {
        let mut date = NaiveDate::from_ymd_opt(1999, 12, 25).unwrap();
        let end = NaiveDate::from_ymd_opt(2001, 3, 1).unwrap();

        while date < end {
            let next = date.succ_opt().unwrap();
            assert!(format_date(date) < format_date(next));
            date = next;
        }

        let earlier = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let later = NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();
        assert!(format_date(earlier) < format_date(later));
    }
}
