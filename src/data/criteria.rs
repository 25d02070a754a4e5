use super::model::CellValue;
use super::schema::{Brand, BrandProfile, NumberKind, NumericMatch};

/// Label shown for "no selection" in every category dropdown.
pub const NO_SELECTION: &str = "None";

// ---------------------------------------------------------------------------
// User input parsing
// ---------------------------------------------------------------------------

/// Parse a numeric filter field. `None` means the filter is inactive:
/// blank, unparseable and non-finite input all switch it off.
///
/// Integer fields reject fractional input (`"30.5"`), as gauge numbers are whole.
pub fn parse_numeric_input(input: &str, kind: NumberKind) -> Option<f64> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }
    match kind {
        NumberKind::Float => s.parse::<f64>().ok().filter(|v| v.is_finite()),
        NumberKind::Integer => s.parse::<i64>().ok().map(|i| i as f64),
    }
}

// ---------------------------------------------------------------------------
// Criterion – one active predicate
// ---------------------------------------------------------------------------

/// One active row predicate. Built fresh from [`Criteria`] on every pass.
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    Category {
        column: &'static str,
        value: CellValue,
    },
    Identifier {
        column: &'static str,
        value: String,
    },
    Range {
        low: &'static str,
        high: &'static str,
        value: f64,
    },
    Exact {
        column: &'static str,
        value: f64,
    },
}

// ---------------------------------------------------------------------------
// Criteria – the brand-tagged bundle of field values
// ---------------------------------------------------------------------------

/// Current filter inputs for one brand.
///
/// The slots are sized from the brand's profile, so a bundle can only ever
/// hold fields that exist for its brand.
#[derive(Debug, Clone, PartialEq)]
pub struct Criteria {
    profile: &'static BrandProfile,
    /// One per `profile.categories`; `None` is "no selection".
    categories: Vec<Option<CellValue>>,
    part_number: String,
    /// Raw text, one per `profile.numeric`.
    numeric: Vec<String>,
}

impl Criteria {
    /// A bundle with every field inactive.
    pub fn new(profile: &'static BrandProfile) -> Self {
        Self {
            profile,
            categories: vec![None; profile.categories.len()],
            part_number: String::new(),
            numeric: vec![String::new(); profile.numeric.len()],
        }
    }

    pub fn brand(&self) -> Brand {
        self.profile.brand
    }

    pub fn profile(&self) -> &'static BrandProfile {
        self.profile
    }

    pub fn category(&self, idx: usize) -> Option<&CellValue> {
        self.categories.get(idx).and_then(|c| c.as_ref())
    }

    #[cfg(test)]
    /// Select a category value by its column name. Unknown columns are ignored.
    pub fn set_category(&mut self, column: &str, value: Option<CellValue>) {
        if let Some(idx) = self.profile.categories.iter().position(|c| c.column == column) {
            self.categories[idx] = value;
        }
    }

    pub fn set_category_at(&mut self, idx: usize, value: Option<CellValue>) {
        if let Some(slot) = self.categories.get_mut(idx) {
            *slot = value;
        }
    }

    #[cfg(test)]
    pub fn part_number(&self) -> &str {
        &self.part_number
    }

    pub fn part_number_mut(&mut self) -> &mut String {
        &mut self.part_number
    }

    #[cfg(test)]
    pub fn set_part_number(&mut self, value: impl Into<String>) {
        self.part_number = value.into();
    }

    #[cfg(test)]
    pub fn numeric_input(&self, idx: usize) -> &str {
        self.numeric.get(idx).map(String::as_str).unwrap_or("")
    }

    pub fn numeric_input_mut(&mut self, idx: usize) -> Option<&mut String> {
        self.numeric.get_mut(idx)
    }

    #[cfg(test)]
    /// Set a numeric field's text by its label. Unknown labels are ignored.
    pub fn set_numeric(&mut self, label: &str, value: impl Into<String>) {
        if let Some(idx) = self.profile.numeric.iter().position(|f| f.label == label) {
            self.numeric[idx] = value.into();
        }
    }

    /// Active predicates in evaluation order: categories, part number, numeric fields.
    ///
    /// The part number is trimmed before comparison, so stray spaces around a
    /// pasted number still find it and whitespace-only input filters nothing.
    pub fn active(&self) -> Vec<Criterion> {
        let mut out = Vec::new();

        for (field, value) in self.profile.categories.iter().zip(&self.categories) {
            if let Some(value) = value {
                out.push(Criterion::Category {
                    column: field.column,
                    value: value.clone(),
                });
            }
        }

        let part = self.part_number.trim();
        if !part.is_empty() {
            out.push(Criterion::Identifier {
                column: self.profile.identifier_column,
                value: part.to_string(),
            });
        }

        for (field, text) in self.profile.numeric.iter().zip(&self.numeric) {
            let Some(value) = parse_numeric_input(text, field.kind) else {
                continue;
            };
            out.push(match field.matcher {
                NumericMatch::Range { low, high } => Criterion::Range { low, high, value },
                NumericMatch::Exact { column } => Criterion::Exact { column, value },
            });
        }

        out
    }

    /// True when no field would filter anything.
    pub fn is_inactive(&self) -> bool {
        self.active().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::CatalogVersion;

    fn profile(version: CatalogVersion, brand: Brand) -> &'static BrandProfile {
        version.profile(brand).unwrap()
    }

    #[test]
    fn numeric_input_parsing() {
        assert_eq!(parse_numeric_input(" 2.0 ", NumberKind::Float), Some(2.0));
        assert_eq!(parse_numeric_input("", NumberKind::Float), None);
        assert_eq!(parse_numeric_input("   ", NumberKind::Float), None);
        assert_eq!(parse_numeric_input("abc", NumberKind::Float), None);
        assert_eq!(parse_numeric_input("inf", NumberKind::Float), None);
        assert_eq!(parse_numeric_input("30", NumberKind::Integer), Some(30.0));
        assert_eq!(parse_numeric_input("30.5", NumberKind::Integer), None);
    }

    #[test]
    fn fresh_bundle_is_inactive() {
        let c = Criteria::new(profile(CatalogVersion::Chart5H, Brand::Erem));
        assert!(c.is_inactive());
        assert_eq!(c.brand(), Brand::Erem);
    }

    #[test]
    fn active_criteria_follow_fixed_order() {
        let mut c = Criteria::new(profile(CatalogVersion::Chart5H, Brand::Excelta));
        c.set_numeric("AWG Value", "24");
        c.set_numeric("Millimeter Value", "2.0");
        c.set_part_number("  170-E ");
        c.set_category("Cut", Some(CellValue::from("Flush")));

        let active = c.active();
        assert_eq!(active.len(), 4);
        assert_eq!(
            active[0],
            Criterion::Category { column: "Cut", value: CellValue::from("Flush") }
        );
        assert_eq!(
            active[1],
            Criterion::Identifier { column: "Part_#", value: "170-E".into() }
        );
        assert_eq!(
            active[2],
            Criterion::Range { low: "Millimeter_Low", high: "Millimeter_High", value: 2.0 }
        );
        assert_eq!(
            active[3],
            Criterion::Range { low: "AWG_Low", high: "AWG_High", value: 24.0 }
        );
    }

    #[test]
    fn whitespace_only_part_number_is_inactive() {
        let mut c = Criteria::new(profile(CatalogVersion::Chart5H, Brand::Excelta));
        c.set_part_number("   ");
        assert!(c.is_inactive());
        assert_eq!(c.part_number(), "   ");
        c.set_part_number("\t2-112\n");
        assert_eq!(
            c.active(),
            vec![Criterion::Identifier { column: "Part_#", value: "2-112".into() }]
        );
    }

    #[test]
    fn numeric_text_is_kept_verbatim() {
        let mut c = Criteria::new(profile(CatalogVersion::Chart5H, Brand::Excelta));
        c.set_numeric("AWG Value", "30.5");
        assert_eq!(c.numeric_input(2), "30.5");
        assert!(c.is_inactive());
        assert_eq!(c.numeric_input(9), "");
    }

    #[test]
    fn bad_numeric_text_deactivates_only_that_field() {
        let mut c = Criteria::new(profile(CatalogVersion::Chart5H, Brand::Excelta));
        c.set_numeric("Millimeter Value", "two");
        c.set_numeric("Inches Value", "0.1");
        assert_eq!(c.active().len(), 1);
    }

    #[test]
    fn legacy_swanstrom_builds_exact_criteria() {
        let mut c = Criteria::new(profile(CatalogVersion::Chart4, Brand::Swanstrom));
        c.set_numeric("Tip", "0.04");
        assert_eq!(c.active(), vec![Criterion::Exact { column: "Tip_inches", value: 0.04 }]);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let mut c = Criteria::new(profile(CatalogVersion::Chart5H, Brand::Erem));
        c.set_category("Size", Some(CellValue::from("Small")));
        c.set_numeric("Millimeter Value", "2");
        assert!(c.is_inactive());
    }
}
