use std::path::PathBuf;
use std::sync::Arc;

use crate::data::criteria::Criteria;
use crate::data::filter::{distinct_identifiers, filter_table, part_details};
use crate::data::model::{Catalogs, CatalogTable, CellValue};
use crate::data::schema::{Brand, BrandProfile};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// One session's UI state, independent of rendering.
///
/// The catalogs are shared and never mutated; everything else is rebuilt
/// from the criteria whenever they change.
pub struct AppState {
    /// Loaded catalogs for every brand.
    pub catalogs: Arc<Catalogs>,

    /// Where the catalogs were read from.
    pub source: PathBuf,

    /// Filter inputs for the selected brand.
    pub criteria: Criteria,

    /// Sorted distinct values per category dropdown of the selected brand.
    /// Rebuilt only when the brand or the catalogs change.
    pub category_options: Vec<Vec<CellValue>>,

    /// Parts passing the current criteria (cached).
    pub filtered: CatalogTable,

    /// Distinct part numbers in `filtered`, for the detail selector.
    pub identifiers: Vec<CellValue>,

    /// Part chosen in the detail selector.
    pub selected_part: Option<CellValue>,

    /// Rows of `filtered` for the selected part.
    pub details: Option<CatalogTable>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Start on the first brand with every filter cleared.
    ///
    /// Returns `None` if the catalogs hold no brand at all.
    pub fn new(catalogs: Arc<Catalogs>, source: PathBuf) -> Option<Self> {
        let brand = *catalogs.brands().first()?;
        let profile = catalogs.version.profile(brand)?;
        let filtered = catalogs.get(brand)?.clone();
        let mut state = Self {
            catalogs,
            source,
            criteria: Criteria::new(profile),
            category_options: Vec::new(),
            filtered,
            identifiers: Vec::new(),
            selected_part: None,
            details: None,
            status_message: None,
        };
        state.rebuild_options();
        state.refilter();
        Some(state)
    }

    pub fn brand(&self) -> Brand {
        self.criteria.brand()
    }

    pub fn profile(&self) -> &'static BrandProfile {
        self.criteria.profile()
    }

    /// Full, unfiltered table of the selected brand.
    pub fn table(&self) -> Option<&CatalogTable> {
        self.catalogs.get(self.brand())
    }

    /// Switch brand. Filter fields belong to a brand, so they start over.
    pub fn select_brand(&mut self, brand: Brand) {
        if brand == self.brand() {
            return;
        }
        let Some(profile) = self.catalogs.version.profile(brand) else {
            return;
        };
        log::debug!("Brand changed to {brand}");
        self.criteria = Criteria::new(profile);
        self.rebuild_options();
        self.refilter();
    }

    /// Reset every filter field of the current brand.
    pub fn clear_filters(&mut self) {
        self.criteria = Criteria::new(self.profile());
        self.refilter();
    }

    /// Recompute the filtered table after a criteria change.
    ///
    /// Keeps the selected part if it survived the filter, otherwise falls
    /// back to the first remaining one.
    pub fn refilter(&mut self) {
        let Some(table) = self.catalogs.get(self.brand()) else {
            return;
        };
        self.filtered = filter_table(table, &self.criteria);
        self.identifiers = distinct_identifiers(&self.filtered);

        let keep = self
            .selected_part
            .take()
            .filter(|p| self.identifiers.contains(p))
            .or_else(|| self.identifiers.first().cloned());
        self.select_part(keep);
    }

    /// Pick the part shown in the detail view.
    pub fn select_part(&mut self, part: Option<CellValue>) {
        self.details = part.as_ref().map(|p| part_details(&self.filtered, p));
        self.selected_part = part;
    }

    /// Swap in freshly loaded catalogs (File → Open…).
    pub fn replace_catalogs(&mut self, catalogs: Catalogs, source: PathBuf) {
        let brand = self.brand();
        self.catalogs = Arc::new(catalogs);
        self.source = source;
        self.status_message = None;

        let brand = if self.catalogs.get(brand).is_some() {
            brand
        } else {
            match self.catalogs.brands().first() {
                Some(b) => *b,
                None => {
                    self.rebuild_options();
                    return;
                }
            }
        };
        if let Some(profile) = self.catalogs.version.profile(brand) {
            self.criteria = Criteria::new(profile);
        }
        self.selected_part = None;
        self.rebuild_options();
        self.refilter();
    }

    fn rebuild_options(&mut self) {
        let profile = self.profile();
        self.category_options = match self.catalogs.get(self.brand()) {
            Some(table) => profile
                .categories
                .iter()
                .map(|field| table.unique_values(field.column).into_iter().collect())
                .collect(),
            None => vec![Vec::new(); profile.categories.len()],
        };
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::data::model::RawSheet;
    use crate::data::normalize::normalize_sheet;
    use crate::data::schema::CatalogVersion;

    fn text(s: &str) -> CellValue {
        CellValue::from(s)
    }

    fn catalogs(version: CatalogVersion) -> Catalogs {
        let mut tables = BTreeMap::new();
        for profile in version.profiles() {
            let raw = RawSheet::new(
                profile.brand.sheet_name(),
                vec![profile.identifier_column.replace('_', " "), "Cut".into()],
                vec![
                    vec![text("A-1"), text("Flush")],
                    vec![text("A-2"), text("Bevel")],
                    vec![text("A-1"), text("Bevel")],
                ],
            );
            tables.insert(profile.brand, normalize_sheet(&raw, profile));
        }
        Catalogs { version, tables }
    }

    fn state() -> AppState {
        AppState::new(Arc::new(catalogs(CatalogVersion::Chart5H)), PathBuf::from("chart.xlsx")).unwrap()
    }

    #[test]
    fn starts_unfiltered_on_first_brand() {
        let s = state();
        assert_eq!(s.brand(), Brand::Excelta);
        assert_eq!(s.filtered.len(), 3);
        assert_eq!(s.identifiers, vec![text("A-1"), text("A-2")]);
        assert_eq!(s.selected_part, Some(text("A-1")));
        assert_eq!(s.details.as_ref().map(CatalogTable::len), Some(2));
    }

    #[test]
    fn category_options_follow_brand_not_filters() {
        let mut s = state();
        // Excelta dropdowns: Size, Cut, Wire. Only Cut exists in the fixture.
        assert_eq!(s.category_options.len(), 3);
        assert_eq!(s.category_options[1], vec![text("Bevel"), text("Flush")]);
        assert!(s.category_options[0].is_empty());

        s.criteria.set_part_number("A-2");
        s.refilter();
        assert_eq!(s.category_options[1].len(), 2, "options list the whole brand table");

        s.select_brand(Brand::Erem);
        assert_eq!(s.category_options.len(), 2);
        assert!(s.category_options.iter().all(Vec::is_empty));

        s.replace_catalogs(catalogs(CatalogVersion::Chart4), PathBuf::from("old.xlsx"));
        assert_eq!(s.brand(), Brand::Excelta);
        assert_eq!(s.category_options[1], vec![text("Bevel"), text("Flush")]);
    }

    #[test]
    fn empty_result_clears_selection() {
        let mut s = state();
        s.criteria.set_part_number("zzz");
        s.refilter();
        assert!(s.filtered.is_empty());
        assert!(s.identifiers.is_empty());
        assert_eq!(s.selected_part, None);
        assert!(s.details.is_none());
    }

    #[test]
    fn selection_survives_refilter_when_still_present() {
        let mut s = state();
        s.select_part(Some(text("A-2")));
        s.criteria.set_category("Cut", Some(text("Bevel")));
        s.refilter();
        assert_eq!(s.selected_part, Some(text("A-2")));
        assert_eq!(s.details.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn switching_brand_resets_criteria() {
        let mut s = state();
        s.criteria.set_part_number("A-2");
        s.refilter();
        s.select_brand(Brand::Erem);
        assert_eq!(s.brand(), Brand::Erem);
        assert!(s.criteria.is_inactive());
        assert_eq!(s.filtered.len(), 3);
        assert_eq!(s.filtered.identifier_column, "Part_Number");
    }

    #[test]
    fn replacing_catalogs_falls_back_to_a_present_brand() {
        let mut s = state();
        s.select_brand(Brand::Erem);
        s.replace_catalogs(catalogs(CatalogVersion::Chart4), PathBuf::from("old.xlsx"));
        assert_eq!(s.brand(), Brand::Excelta);
        assert_eq!(s.source, PathBuf::from("old.xlsx"));
        assert_eq!(s.filtered.len(), 3);
    }
}
