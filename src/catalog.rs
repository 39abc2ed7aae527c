//! The menu catalog and the query engine over it.
//!
//! The catalog is a fixed, compiled-in list. Entries are never created or
//! destroyed at runtime, so everything here is a pure read: [`search`]
//! recomputes its result from scratch on every call, filters compose by
//! intersection (category first, then term), and the catalog's original
//! ordering is always preserved. No ranking, no caching.

use crate::config::CasePolicy;

#[derive(Debug, Clone, PartialEq)]
pub struct MenuEntry {
    pub id: &'static str,
    pub name: &'static str,
    pub price: f64,
    pub tags: &'static [&'static str],
    pub description: &'static str,
    pub rating: f64,
    pub reviews: u32,
    pub prep_time: &'static str,
    pub popular: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Offer {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub discount: &'static str,
    pub valid_until: &'static str,
}

pub const MENU: &[MenuEntry] = &[
    MenuEntry {
        id: "m1",
        name: "Margherita Pizza",
        price: 11.5,
        tags: &["veg", "pizza"],
        description: "Fresh mozzarella, tomato sauce, and basil",
        rating: 4.8,
        reviews: 127,
        prep_time: "15-20 min",
        popular: true,
    },
    MenuEntry {
        id: "m2",
        name: "Pepperoni Pizza",
        price: 13.0,
        tags: &["pizza"],
        description: "Spicy pepperoni with melted cheese",
        rating: 4.6,
        reviews: 89,
        prep_time: "15-20 min",
        popular: true,
    },
    MenuEntry {
        id: "m3",
        name: "Paneer Tikka",
        price: 12.0,
        tags: &["veg", "indian"],
        description: "Grilled cottage cheese with aromatic spices",
        rating: 4.7,
        reviews: 156,
        prep_time: "20-25 min",
        popular: false,
    },
    MenuEntry {
        id: "m4",
        name: "Chicken Biryani",
        price: 14.25,
        tags: &["indian"],
        description: "Fragrant rice with tender chicken and spices",
        rating: 4.9,
        reviews: 203,
        prep_time: "25-30 min",
        popular: true,
    },
    MenuEntry {
        id: "m5",
        name: "Caesar Salad",
        price: 9.5,
        tags: &["salad"],
        description: "Crisp romaine, parmesan, and caesar dressing",
        rating: 4.4,
        reviews: 67,
        prep_time: "10-15 min",
        popular: false,
    },
    MenuEntry {
        id: "m6",
        name: "Butter Naan",
        price: 3.5,
        tags: &["indian", "bread"],
        description: "Soft, buttery flatbread",
        rating: 4.5,
        reviews: 89,
        prep_time: "8-12 min",
        popular: false,
    },
    MenuEntry {
        id: "m7",
        name: "Tomato Soup",
        price: 6.75,
        tags: &["soup", "veg"],
        description: "Rich tomato soup with herbs",
        rating: 4.3,
        reviews: 45,
        prep_time: "12-15 min",
        popular: false,
    },
    MenuEntry {
        id: "m8",
        name: "Gulab Jamun",
        price: 5.25,
        tags: &["dessert", "indian"],
        description: "Sweet milk dumplings in rose syrup",
        rating: 4.6,
        reviews: 78,
        prep_time: "5-8 min",
        popular: false,
    },
];

pub const OFFERS: &[Offer] = &[
    Offer {
        id: "offer1",
        title: "Pizza Lovers Special",
        description: "Buy any 2 pizzas, get 1 free!",
        discount: "33% OFF",
        valid_until: "2024-12-31",
    },
    Offer {
        id: "offer2",
        title: "First Order Bonus",
        description: "New customers get 20% off on orders above $25",
        discount: "20% OFF",
        valid_until: "2024-12-31",
    },
];

pub fn find(id: &str) -> Option<&'static MenuEntry> {
    MENU.iter().find(|entry| entry.id == id)
}

/// `"all"` plus every tag in the catalog, in order of first appearance.
pub fn categories() -> Vec<&'static str> {
    let mut categories = vec!["all"];

    for entry in MENU {
        for &tag in entry.tags {
            if !categories.contains(&tag) {
                categories.push(tag);
            }
        }
    }

    categories
}

pub fn popular() -> Vec<&'static MenuEntry> {
    MENU.iter().filter(|entry| entry.popular).collect()
}

/// Filter the catalog by category and free-text name search.
///
/// `"all"` passes every entry through the category filter; otherwise an
/// entry survives only if its tag set contains `category`. An empty term
/// matches everything; a non-empty term must appear in the entry name as a
/// substring, compared per `case`.
pub fn search(category: &str, term: &str, case: CasePolicy) -> Vec<&'static MenuEntry> {
    MENU.iter()
        .filter(|entry| category == "all" || entry.tags.contains(&category))
        .filter(|entry| term.is_empty() || name_matches(entry.name, term, case))
        .collect()
}

fn name_matches(name: &str, term: &str, case: CasePolicy) -> bool {
    match case {
        CasePolicy::Sensitive => name.contains(term),
        CasePolicy::Insensitive => name.to_lowercase().contains(&term.to_lowercase()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_returns_full_catalog_in_order() {
        let results = search("all", "", CasePolicy::Sensitive);

        assert_eq!(results.len(), MENU.len());
        for (result, entry) in results.iter().zip(MENU) {
            assert_eq!(result.id, entry.id);
        }
    }

    #[test]
    fn test_category_filter() {
        let results = search("pizza", "", CasePolicy::Sensitive);
        let ids: Vec<_> = results.iter().map(|entry| entry.id).collect();

        assert_eq!(ids, ["m1", "m2"]);

        assert!(search("sushi", "", CasePolicy::Sensitive).is_empty());
    }

    #[test]
    fn test_case_sensitive_term() {
        let results = search("pizza", "Pepper", CasePolicy::Sensitive);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "m2");

        // No case folding under this policy: "Pepperoni Pizza" contains
        // neither all-lower nor all-upper forms of the term.
        assert!(search("pizza", "pepper", CasePolicy::Sensitive).is_empty());
        assert!(search("pizza", "PEPPER", CasePolicy::Sensitive).is_empty());
    }

    #[test]
    fn test_case_insensitive_term() {
        for term in ["pepper", "PEPPER"] {
            let results = search("pizza", term, CasePolicy::Insensitive);
            assert_eq!(results.len(), 1);
            assert_eq!(results[0].id, "m2");
        }
    }

    #[test]
    fn test_filters_intersect() {
        // "Pizza" appears in two names but only m1 is tagged veg.
        let results = search("veg", "Pizza", CasePolicy::Sensitive);
        let ids: Vec<_> = results.iter().map(|entry| entry.id).collect();

        assert_eq!(ids, ["m1"]);
    }

    #[test]
    fn test_categories() {
        assert_eq!(
            categories(),
            [
                "all", "veg", "pizza", "indian", "salad", "bread", "soup", "dessert"
            ]
        );
    }

    #[test]
    fn test_popular() {
        let ids: Vec<_> = popular().iter().map(|entry| entry.id).collect();

        assert_eq!(ids, ["m1", "m2", "m4"]);
    }
}
