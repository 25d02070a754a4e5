use super::criteria::{Criteria, Criterion};
use super::model::{CatalogTable, CellValue};

// ---------------------------------------------------------------------------
// Bound predicates
// ---------------------------------------------------------------------------

/// A criterion with its column names resolved to positions in one table.
/// An absent column resolves to `None` and matches nothing.
enum Bound<'a> {
    Category(Option<usize>, &'a CellValue),
    Identifier(Option<usize>, &'a str),
    Range(Option<usize>, Option<usize>, f64),
    Exact(Option<usize>, f64),
}

impl<'a> Bound<'a> {
    fn bind(criterion: &'a Criterion, table: &CatalogTable) -> Self {
        match criterion {
            Criterion::Category { column, value } => Bound::Category(table.column_index(column), value),
            Criterion::Identifier { column, value } => Bound::Identifier(table.column_index(column), value),
            Criterion::Range { low, high, value } => {
                Bound::Range(table.column_index(low), table.column_index(high), *value)
            }
            Criterion::Exact { column, value } => Bound::Exact(table.column_index(column), *value),
        }
    }

    fn matches(&self, row: &[CellValue]) -> bool {
        let num = |idx: Option<usize>| idx.and_then(|i| row.get(i)).and_then(CellValue::as_f64);
        match *self {
            Bound::Category(idx, want) => idx
                .and_then(|i| row.get(i))
                .is_some_and(|cell| !cell.is_missing() && cell == want),
            Bound::Identifier(idx, want) => idx
                .and_then(|i| row.get(i))
                .and_then(CellValue::as_text)
                .is_some_and(|id| id == want),
            Bound::Range(low, high, value) => match (num(low), num(high)) {
                (Some(lo), Some(hi)) => lo <= value && value <= hi,
                _ => false,
            },
            // Strict equality: no tolerance.
            Bound::Exact(idx, value) => num(idx).is_some_and(|v| v == value),
        }
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Return indices of parts that pass all active criteria, in table order.
///
/// A part is kept iff it satisfies every active criterion. Missing cells
/// never satisfy a criterion. With nothing active every index is returned.
pub fn filtered_indices(table: &CatalogTable, criteria: &Criteria) -> Vec<usize> {
    if table.brand != criteria.brand() {
        log::warn!(
            "criteria for {} applied to the {} table",
            criteria.brand(),
            table.brand
        );
    }

    filtered_indices_with(table, &criteria.active())
}

/// Indices of parts satisfying every criterion in `active`, in any order given.
pub(crate) fn filtered_indices_with(table: &CatalogTable, active: &[Criterion]) -> Vec<usize> {
    let bound: Vec<Bound<'_>> = active.iter().map(|c| Bound::bind(c, table)).collect();

    let indices: Vec<usize> = table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| bound.iter().all(|b| b.matches(row)))
        .map(|(i, _)| i)
        .collect();

    log::debug!(
        "{}: {} active criteria kept {}/{} parts",
        table.brand,
        active.len(),
        indices.len(),
        table.len()
    );
    indices
}

/// The filtered table: same columns, matching rows in source order.
pub fn filter_table(table: &CatalogTable, criteria: &Criteria) -> CatalogTable {
    table.select_rows(&filtered_indices(table, criteria))
}

// ---------------------------------------------------------------------------
// Drill-down
// ---------------------------------------------------------------------------

/// Distinct part numbers in order of first appearance; missing ids are skipped.
pub fn distinct_identifiers(table: &CatalogTable) -> Vec<CellValue> {
    let Some(idx) = table.identifier_index() else {
        return Vec::new();
    };
    let mut seen = std::collections::HashSet::new();
    table
        .rows
        .iter()
        .filter_map(|row| row.get(idx))
        .filter(|id| !id.is_missing() && seen.insert(*id))
        .cloned()
        .collect()
}

/// Every row whose part number equals `identifier`.
///
/// Normally one row; duplicated part numbers in the source all come back.
pub fn part_details(table: &CatalogTable, identifier: &CellValue) -> CatalogTable {
    let Some(idx) = table.identifier_index() else {
        return table.select_rows(&[]);
    };
    let indices: Vec<usize> = table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row.get(idx) == Some(identifier))
        .map(|(i, _)| i)
        .collect();
    table.select_rows(&indices)
}
