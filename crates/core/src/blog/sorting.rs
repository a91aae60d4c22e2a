use std::cmp::Ordering;

use super::types::Blog;

/// Sorts blogs newest first. Blogs created on the same day are ordered by id.
pub fn sort_newest_first(blogs: &mut [Blog]) {
    blogs.sort_by(compare_newest_first);
}

fn compare_newest_first(a: &Blog, b: &Blog) -> Ordering {
    b.created_date
        .cmp(&a.created_date)
        .then_with(|| a.id.cmp(&b.id))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn blog(id: &str, y: i32, m: u32, d: u32) -> Blog {
        Blog::new(id, "t", "A1", NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn test_sort_newest_first() {
        let mut blogs = vec![
            blog("B1", 2024, 1, 1),
            blog("B3", 2024, 3, 1),
            blog("B2", 2024, 2, 1),
        ];

        sort_newest_first(&mut blogs);

        let ids: Vec<&str> = blogs.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["B3", "B2", "B1"]);
    }

    #[test]
    fn test_same_day_orders_by_id() {
        let mut blogs = vec![blog("B2", 2024, 1, 1), blog("B1", 2024, 1, 1)];

        sort_newest_first(&mut blogs);

        assert_eq!(blogs[0].id, "B1");
        assert_eq!(blogs[1].id, "B2");
    }

    #[test]
    fn test_sort_empty() {
        let mut blogs: Vec<Blog> = vec![];
        sort_newest_first(&mut blogs);
        assert!(blogs.is_empty());
    }
}
