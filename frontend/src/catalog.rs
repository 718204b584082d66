//! Pure helpers behind the product grid and review pages.

use affiliate_shared::{Post, Product};

/// Category filter value meaning "no filter".
pub const ALL_CATEGORIES: &str = "all";

/// Number of related products shown beside a review.
pub const RELATED_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub name: String,
    pub count: usize,
}

/// Products in `category`, or all of them for [`ALL_CATEGORIES`]. Order is
/// preserved.
pub fn filter_by_category<'a>(products: &'a [Product], category: &str) -> Vec<&'a Product> {
    products
        .iter()
        .filter(|product| category == ALL_CATEGORIES || product.category == category)
        .collect()
}

/// Filter buttons: "all" first with the full count, then each category in
/// order of first appearance.
pub fn category_counts(products: &[Product]) -> Vec<CategoryCount> {
    let mut counts = vec![CategoryCount {
        name: ALL_CATEGORIES.to_string(),
        count: products.len(),
    }];

    for product in products {
        match counts[1..]
            .iter_mut()
            .find(|entry| entry.name == product.category)
        {
            Some(entry) => entry.count += 1,
            None => counts.push(CategoryCount {
                name: product.category.clone(),
                count: 1,
            }),
        }
    }

    counts
}

/// Up to [`RELATED_LIMIT`] products other than `current_id`.
pub fn related_products<'a>(products: &'a [Product], current_id: Option<&str>) -> Vec<&'a Product> {
    products
        .iter()
        .filter(|product| Some(product.id.as_str()) != current_id)
        .take(RELATED_LIMIT)
        .collect()
}

/// Client route of a review page.
pub fn review_path(post: &Post) -> String {
    format!("/reviews/{}", post.slug)
}

/// The product a review links to, if it is in the loaded catalog.
pub fn product_for_post<'a>(post: &Post, products: &'a [Product]) -> Option<&'a Product> {
    let id = post.product_id.as_deref()?;
    products.iter().find(|product| product.id == id)
}

/// Brazilian real formatting, e.g. `R$ 2.499,99`.
pub fn format_brl(price: f64) -> String {
    let cents = (price.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if price < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}R$ {},{:02}", sign, grouped, cents % 100)
}

#[cfg(test)]
mod tests {
    use affiliate_shared::PostStatus;
    use chrono::{TimeZone, Utc};

    use super::*;

    fn product(id: &str, category: &str) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Produto {id}"),
            affiliate_url: format!("https://example.com/{id}"),
            image_url: None,
            price: 10.0,
            category: category.to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap(),
        }
    }

    fn post(slug: &str, product_id: Option<&str>) -> Post {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        Post {
            id: "1".to_string(),
            title: "Review".to_string(),
            slug: slug.to_string(),
            content: "# Review".to_string(),
            cover_image: None,
            price: None,
            affiliate_url: None,
            category: "Monitores".to_string(),
            status: PostStatus::Published,
            product_id: product_id.map(str::to_string),
            created_at: now,
            updated_at: now,
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product("1", "Monitores"),
            product("2", "Mobiliário"),
            product("3", "Mobiliário"),
            product("4", "Periféricos"),
        ]
    }

    #[test]
    fn all_disables_the_filter() {
        let products = catalog();
        assert_eq!(filter_by_category(&products, ALL_CATEGORIES).len(), 4);

        let ids: Vec<_> = filter_by_category(&products, "Mobiliário")
            .into_iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, vec!["2", "3"]);
        assert!(filter_by_category(&products, "Iluminação").is_empty());
    }

    #[test]
    fn counts_follow_first_appearance() {
        let counts = category_counts(&catalog());
        let pairs: Vec<_> = counts.iter().map(|c| (c.name.as_str(), c.count)).collect();
        assert_eq!(
            pairs,
            vec![("all", 4), ("Monitores", 1), ("Mobiliário", 2), ("Periféricos", 1)]
        );
        assert_eq!(category_counts(&[]), vec![CategoryCount {
            name: "all".into(),
            count: 0
        }]);
    }

    #[test]
    fn related_skips_current_and_caps() {
        let products = catalog();
        let ids: Vec<_> = related_products(&products, Some("2"))
            .into_iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, vec!["1", "3", "4"]);
        assert_eq!(related_products(&products, None).len(), RELATED_LIMIT);
    }

    #[test]
    fn post_links() {
        let products = catalog();
        let linked = post("review-monitor", Some("1"));
        assert_eq!(review_path(&linked), "/reviews/review-monitor");
        assert_eq!(product_for_post(&linked, &products).map(|p| p.id.as_str()), Some("1"));
        assert!(product_for_post(&post("solo", None), &products).is_none());
        assert!(product_for_post(&post("gone", Some("99")), &products).is_none());
    }

    #[test]
    fn brl_grouping_and_rounding() {
        assert_eq!(format_brl(2499.99), "R$ 2.499,99");
        assert_eq!(format_brl(0.0), "R$ 0,00");
        assert_eq!(format_brl(299.9), "R$ 299,90");
        assert_eq!(format_brl(1234567.5), "R$ 1.234.567,50");
        assert_eq!(format_brl(0.004), "R$ 0,00");
        assert_eq!(format_brl(-5.5), "-R$ 5,50");
    }
}
