use crate::models::Business;
use serde::Deserialize;
use std::cmp::Ordering;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessQuery {
    pub category: Option<String>,
    pub q: Option<String>,
    pub featured: Option<bool>,
}

/// Looks a business up by id first, then by slug.
pub fn find_business<'a>(businesses: &'a [Business], key: &str) -> Option<&'a Business> {
    businesses
        .iter()
        .find(|b| b.id == key)
        .or_else(|| businesses.iter().find(|b| b.slug.eq_ignore_ascii_case(key)))
}

/// Highest rated first, ties by name.
pub fn list_businesses(businesses: &[Business], query: &BusinessQuery) -> Vec<Business> {
    let needle = query
        .q
        .as_deref()
        .map(|q| q.trim().to_lowercase())
        .filter(|q| !q.is_empty());

    let mut out: Vec<Business> = businesses
        .iter()
        .filter(|b| match &query.category {
            Some(category) if !category.eq_ignore_ascii_case("all") => {
                b.category.eq_ignore_ascii_case(category)
            }
            _ => true,
        })
        .filter(|b| query.featured.is_none_or(|featured| b.featured == featured))
        .filter(|b| match &needle {
            Some(needle) => matches_search(b, needle),
            None => true,
        })
        .cloned()
        .collect();

    out.sort_by(|a, b| {
        b.rating
            .partial_cmp(&a.rating)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });
    out
}

fn matches_search(business: &Business, needle: &str) -> bool {
    business.name.to_lowercase().contains(needle)
        || business.description.to_lowercase().contains(needle)
        || business.tags.iter().any(|t| t.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::sample_data;
    use chrono::Utc;

    #[test]
    fn finds_by_id_or_slug() {
        let data = sample_data(Utc::now());
        assert_eq!(
            find_business(&data.businesses, "biz_ember").map(|b| b.slug.as_str()),
            Some("ember-pizza")
        );
        assert_eq!(
            find_business(&data.businesses, "Lantern-Books").map(|b| b.id.as_str()),
            Some("biz_lantern")
        );
        assert!(find_business(&data.businesses, "missing").is_none());
    }

    #[test]
    fn list_sorts_by_rating_then_name() {
        let data = sample_data(Utc::now());
        let all = list_businesses(&data.businesses, &BusinessQuery::default());
        let names: Vec<_> = all.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Ember Wood-Fired Pizza", "Harbor Coffee Roasters", "Lantern Books"]
        );
    }

    #[test]
    fn filters_combine() {
        let data = sample_data(Utc::now());
        let query = BusinessQuery {
            category: Some("cafe".into()),
            q: Some("WIFI".into()),
            featured: Some(true),
        };
        let found = list_businesses(&data.businesses, &query);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "biz_harbor");

        let none = list_businesses(
            &data.businesses,
            &BusinessQuery {
                featured: Some(false),
                category: Some("Cafe".into()),
                q: None,
            },
        );
        assert!(none.is_empty());
    }
}
