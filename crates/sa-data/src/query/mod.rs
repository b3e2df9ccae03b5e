//! Search, language filter and sort order of the university list

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use sa_core::{Catalog, UniversityRecord};
use serde::{Deserialize, Serialize};

/// Languages offered by the language filter
pub const LANGUAGES: [&str; 6] = ["English", "France", "German", "Italian", "Chinese", "Spanish"];

/// Sort orders offered by the list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    /// Fetch order
    #[default]
    Unsorted,
    /// By name, A to Z
    Alphabetical,
    /// Most students first
    Movers,
    /// Best rated first, unrated last
    Rating,
}

impl SortOrder {
    pub fn label(self) -> &'static str {
        match self {
            SortOrder::Unsorted => "Unsorted",
            SortOrder::Alphabetical => "Alphabetical",
            SortOrder::Movers => "Movers",
            SortOrder::Rating => "Rating",
        }
    }

    fn compare(self, a: &UniversityRecord, b: &UniversityRecord) -> Ordering {
        match self {
            SortOrder::Unsorted => Ordering::Equal,
            SortOrder::Alphabetical => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortOrder::Movers => b.movers.cmp(&a.movers),
            SortOrder::Rating => match (a.rating, b.rating) {
                (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "unsorted" => Ok(SortOrder::Unsorted),
            "alphabetical" => Ok(SortOrder::Alphabetical),
            "movers" => Ok(SortOrder::Movers),
            "rating" => Ok(SortOrder::Rating),
            other => Err(format!("Unknown sort order '{}'", other)),
        }
    }
}

/// What the list currently shows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListQuery {
    /// Case-insensitive search on name, city and country
    pub search: String,

    /// Keep only universities teaching in this language
    pub language: Option<String>,

    pub sort: SortOrder,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    /// Whether `record` passes the search and language filter
    pub fn matches(&self, record: &UniversityRecord) -> bool {
        let needle = self.search.trim().to_lowercase();
        let found = needle.is_empty()
            || [&record.name, &record.city, &record.country]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));

        let teaches = self
            .language
            .as_deref()
            .map_or(true, |language| record.teaches_in(language));

        found && teaches
    }

    /// Catalog positions to display, in display order.
    ///
    /// The sort is stable, so ties keep fetch order.
    pub fn apply(&self, catalog: &Catalog) -> Vec<usize> {
        let mut positions: Vec<usize> = catalog
            .iter()
            .enumerate()
            .filter(|(_, record)| self.matches(record))
            .map(|(position, _)| position)
            .collect();

        if self.sort != SortOrder::Unsorted {
            positions.sort_by(|&a, &b| match (catalog.get(a), catalog.get(b)) {
                (Some(a), Some(b)) => self.sort.compare(a, b),
                _ => Ordering::Equal,
            });
        }

        positions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sa_core::UniversityId;

    fn record(id: u32, name: &str, country: &str, languages: &[&str], rating: Option<f32>, movers: u32) -> UniversityRecord {
        UniversityRecord {
            id: UniversityId(id),
            name: name.to_string(),
            city: String::new(),
            country: country.to_string(),
            lng: 0.0,
            lat: 0.0,
            description_text: String::new(),
            languages: languages.iter().map(|l| l.to_string()).collect(),
            rating,
            movers,
        }
    }

    fn catalog() -> Catalog {
        Catalog::new(vec![
            record(1, "Sapienza", "Italy", &["Italian", "English"], Some(4.3), 58),
            record(2, "tum", "Germany", &["German", "English"], Some(4.6), 73),
            record(3, "Granada", "Spain", &["Spanish"], None, 96),
            record(4, "Bologna", "Italy", &["Italian"], Some(4.6), 20),
        ])
        .unwrap()
    }

    #[test]
    fn test_unsorted_keeps_fetch_order() {
        assert_eq!(ListQuery::new().apply(&catalog()), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_search_and_language_filter() {
        let catalog = catalog();

        let italy = ListQuery::new().with_search("ITALY").apply(&catalog);
        assert_eq!(italy, vec![0, 3]);

        let english = ListQuery::new().with_language("english").apply(&catalog);
        assert_eq!(english, vec![0, 1]);

        let none = ListQuery::new().with_search("italy").with_language("German").apply(&catalog);
        assert!(none.is_empty());
    }

    #[test]
    fn test_sort_orders() {
        let catalog = catalog();

        let alphabetical = ListQuery::new().with_sort(SortOrder::Alphabetical).apply(&catalog);
        assert_eq!(alphabetical, vec![3, 2, 0, 1]);

        let movers = ListQuery::new().with_sort(SortOrder::Movers).apply(&catalog);
        assert_eq!(movers, vec![2, 1, 0, 3]);

        // Ties keep fetch order, unrated last
        let rating = ListQuery::new().with_sort(SortOrder::Rating).apply(&catalog);
        assert_eq!(rating, vec![1, 3, 0, 2]);
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!("Rating".parse::<SortOrder>().unwrap(), SortOrder::Rating);
        assert_eq!(" movers ".parse::<SortOrder>().unwrap(), SortOrder::Movers);
        assert!("price".parse::<SortOrder>().is_err());
    }
}
