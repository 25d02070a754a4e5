use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;
use serde_json::{Map as JsonMap, Value as JsonValue};

use super::schema::{Brand, CatalogVersion};

// ---------------------------------------------------------------------------
// CellValue – a single cell of a sheet
// ---------------------------------------------------------------------------

/// A dynamically-typed cell, used both for raw sheet cells and for
/// normalized catalog cells.
///
/// `BTreeSet<CellValue>` backs the category dropdowns, so the type must be `Ord`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    /// Empty cell or a value that failed to parse.
    Missing,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

// Equality is the ordering's: floats compare by `total_cmp`, so every value
// equals itself and `-0.0 != 0.0`, in line with `Hash` on the bit pattern.
impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        use std::cmp::Ordering;
        // Numbers share one rank so mixed int/float columns sort numerically.
        fn rank(v: &CellValue) -> u8 {
            match v {
                Missing => 0,
                Integer(_) | Float(_) => 1,
                Text(_) => 2,
            }
        }
        fn tiebreak(v: &CellValue) -> u8 {
            match v {
                Integer(_) => 0,
                Float(_) => 1,
                _ => 2,
            }
        }
        let (ra, rb) = (rank(self), rank(other));
        if ra != rb {
            return ra.cmp(&rb);
        }
        match (self, other) {
            (Missing, Missing) => Ordering::Equal,
            (Text(a), Text(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (a, b) => {
                let (x, y) = (a.as_f64().unwrap_or(0.0), b.as_f64().unwrap_or(0.0));
                x.total_cmp(&y).then_with(|| tiebreak(a).cmp(&tiebreak(b)))
            }
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Text(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Missing => {}
        }
    }
}

/// Floats render at three decimals and missing cells render blank, which is
/// how every table in the viewer shows them.
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v:.3}"),
            CellValue::Missing => Ok(()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl CellValue {
    /// Numeric view of the cell; text is never coerced.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Text view used for matching typed-in part numbers.
    ///
    /// Whole floats print without a fractional part so a part number stored
    /// as the number `1234` matches the input `"1234"`.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Integer(i) => Some(i.to_string()),
            CellValue::Float(v) => Some(v.to_string()),
            CellValue::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }
}

// ---------------------------------------------------------------------------
// RawSheet – one sheet as handed over by the loader
// ---------------------------------------------------------------------------

/// An un-normalized sheet: header row plus rows of loosely typed cells.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawSheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawSheet {
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows,
        }
    }
}

// ---------------------------------------------------------------------------
// CatalogTable – one brand's normalized part sheet
// ---------------------------------------------------------------------------

/// The typed, normalized part list of one brand.
///
/// Rows keep the source order; every row has exactly `columns.len()` cells.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogTable {
    pub brand: Brand,
    /// Canonical column names in sheet order.
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
    /// Canonical name of the part number column.
    pub identifier_column: String,
}

impl CatalogTable {
    /// Number of parts.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column; canonical names are compared ASCII case-insensitively.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .or_else(|| self.columns.iter().position(|c| c.eq_ignore_ascii_case(name)))
    }

    pub fn identifier_index(&self) -> Option<usize> {
        self.column_index(&self.identifier_column)
    }

    /// Sorted distinct non-missing values of a column (empty if the column is absent).
    pub fn unique_values(&self, column: &str) -> BTreeSet<CellValue> {
        let Some(idx) = self.column_index(column) else {
            return BTreeSet::new();
        };
        self.rows
            .iter()
            .filter_map(|row| row.get(idx))
            .filter(|v| !v.is_missing())
            .cloned()
            .collect()
    }

    /// A table with the same columns holding only the given rows, in the given order.
    pub fn select_rows(&self, indices: &[usize]) -> CatalogTable {
        CatalogTable {
            brand: self.brand,
            columns: self.columns.clone(),
            rows: indices
                .iter()
                .filter_map(|&i| self.rows.get(i).cloned())
                .collect(),
            identifier_column: self.identifier_column.clone(),
        }
    }

    /// One row as a JSON object keyed by canonical column name.
    pub fn record_json(&self, row: usize) -> Option<JsonValue> {
        let cells = self.rows.get(row)?;
        let mut obj = JsonMap::new();
        for (col, cell) in self.columns.iter().zip(cells) {
            let value = serde_json::to_value(cell).unwrap_or(JsonValue::Null);
            obj.insert(col.clone(), value);
        }
        Some(JsonValue::Object(obj))
    }

    /// Turn the table back into a raw sheet (used to check that normalization is a fixed point).
    #[cfg(test)]
    pub fn to_raw(&self) -> RawSheet {
        RawSheet::new(self.brand.sheet_name(), self.columns.clone(), self.rows.clone())
    }
}

// ---------------------------------------------------------------------------
// Catalogs – every brand of one catalog version
// ---------------------------------------------------------------------------

/// All normalized brand tables of a workbook. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct Catalogs {
    pub version: CatalogVersion,
    pub tables: BTreeMap<Brand, CatalogTable>,
}

impl Catalogs {
    pub fn get(&self, brand: Brand) -> Option<&CatalogTable> {
        self.tables.get(&brand)
    }

    /// Brands present, in the version's display order.
    pub fn brands(&self) -> Vec<Brand> {
        self.version
            .profiles()
            .iter()
            .map(|p| p.brand)
            .filter(|b| self.tables.contains_key(b))
            .collect()
    }
}
