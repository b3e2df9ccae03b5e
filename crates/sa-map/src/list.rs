//! University list adapter: rows, row references and focus highlighting

use parking_lot::RwLock;
use sa_core::{Catalog, FocusState, FocusSubscriber, LngLat, UniversityId};
use sa_data::ListQuery;

/// Class prefix of a list row; the 1-based catalog position follows it
pub const ROW_CLASS_PREFIX: &str = "uni-listing";

/// One row of the university list
#[derive(Debug, Clone, PartialEq)]
pub struct ListRow {
    pub id: UniversityId,
    /// 1-based position in the fetched collection
    pub ordinal: usize,
    pub name: String,
    pub city: String,
    pub country: String,
    /// Where the map flies to when the row is hovered
    pub center: LngLat,
    pub class_name: String,
}

impl ListRow {
    /// Typed reference used when the row is clicked
    pub fn row_ref(&self) -> RowRef {
        RowRef::Id(self.id)
    }
}

/// How a clicked row identifies its university
#[derive(Debug, Clone, PartialEq)]
pub enum RowRef {
    /// Stable identifier attached to the row
    Id(UniversityId),
    /// Class string of the row, `uni-listing<ordinal>`
    Class(String),
}

/// Class name of the row at a 0-based catalog position
pub fn row_class(position: usize) -> String {
    format!("{}{}", ROW_CLASS_PREFIX, position + 1)
}

/// 0-based catalog position encoded in a row class string.
///
/// Other classes on the element are skipped. Returns `None` when no token
/// carries the prefix followed by a positive number.
pub fn decode_row_class(class: &str) -> Option<usize> {
    class
        .split_whitespace()
        .find_map(|token| token.strip_prefix(ROW_CLASS_PREFIX)?.parse::<usize>().ok())
        .and_then(|ordinal| ordinal.checked_sub(1))
}

/// Rows shown for `query`, in display order
pub fn list_rows(catalog: &Catalog, query: &ListQuery) -> Vec<ListRow> {
    query
        .apply(catalog)
        .into_iter()
        .filter_map(|position| {
            let record = catalog.get(position)?;
            Some(ListRow {
                id: record.id,
                ordinal: position + 1,
                name: record.name.clone(),
                city: record.city.clone(),
                country: record.country.clone(),
                center: record.coordinates(),
                class_name: row_class(position),
            })
        })
        .collect()
}

/// List panel state; highlights the row of the focused university
pub struct ListPanel {
    rows: RwLock<Vec<ListRow>>,
    highlighted: RwLock<Option<UniversityId>>,
}

impl ListPanel {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            highlighted: RwLock::new(None),
        }
    }

    /// Rebuild rows for a new query
    pub fn refresh(&self, catalog: &Catalog, query: &ListQuery) {
        *self.rows.write() = list_rows(catalog, query);
    }

    pub fn rows(&self) -> Vec<ListRow> {
        self.rows.read().clone()
    }

    /// Row of the focused university, if it is currently listed
    pub fn highlighted_row(&self) -> Option<ListRow> {
        let id = (*self.highlighted.read())?;
        self.rows.read().iter().find(|row| row.id == id).cloned()
    }
}

impl Default for ListPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusSubscriber for ListPanel {
    fn on_focus_change(&self, state: &FocusState) {
        *self.highlighted.write() = state.focused_id();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sa_core::UniversityRecord;
    use sa_data::SortOrder;

    fn record(id: u32, name: &str, lng: f64, lat: f64) -> UniversityRecord {
        UniversityRecord {
            id: UniversityId(id),
            name: name.to_string(),
            city: String::new(),
            country: String::new(),
            lng,
            lat,
            description_text: String::new(),
            languages: Vec::new(),
            rating: None,
            movers: 0,
        }
    }

    #[test]
    fn test_row_class_round_trip() {
        assert_eq!(row_class(0), "uni-listing1");
        assert_eq!(decode_row_class("uni-listing1"), Some(0));
        assert_eq!(decode_row_class("card active uni-listing12"), Some(11));
    }

    #[test]
    fn test_malformed_row_classes() {
        assert_eq!(decode_row_class(""), None);
        assert_eq!(decode_row_class("uni-listing"), None);
        assert_eq!(decode_row_class("uni-listing0"), None);
        assert_eq!(decode_row_class("uni-listingx"), None);
        assert_eq!(decode_row_class("listing3"), None);
        // Decodes fine; whether position 57 exists is the catalog's call
        assert_eq!(decode_row_class("uni-listing58"), Some(57));
    }

    #[test]
    fn test_rows_follow_query_order_and_keep_ids() {
        let catalog = Catalog::new(vec![record(10, "Zurich", 8.5, 47.4), record(20, "Aachen", 6.1, 50.8)]).unwrap();
        let rows = list_rows(&catalog, &ListQuery::new().with_sort(SortOrder::Alphabetical));

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Aachen");
        assert_eq!(rows[0].id, UniversityId(20));
        assert_eq!(rows[0].ordinal, 2);
        assert_eq!(rows[0].class_name, "uni-listing2");
        assert_eq!(rows[0].center, LngLat::new(6.1, 50.8));
        assert_eq!(decode_row_class(&rows[1].class_name), Some(0));
    }
}
