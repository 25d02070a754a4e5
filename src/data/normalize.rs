use super::model::{CatalogTable, CellValue, RawSheet};
use super::schema::{BrandProfile, ColumnRule, NumberKind, RuleKind};

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

/// Canonical column name: trim, newlines to spaces, drop carriage returns,
/// spaces to `_`.
///
/// `"Head Width\r\n inches"` becomes `"Head_Width__inches"`.
pub fn canonical_column_name(raw: &str) -> String {
    raw.trim()
        .replace('\n', " ")
        .replace('\r', "")
        .replace(' ', "_")
}

// ---------------------------------------------------------------------------
// Cell rules
// ---------------------------------------------------------------------------

/// Title-case the way spreadsheet users expect: the first letter of every
/// run of letters is upper-cased, the rest lower-cased.
///
/// `"FLUSH cut"` → `"Flush Cut"`, `"o'neil"` → `"O'Neil"`, `"3rd"` → `"3Rd"`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_cased = false;
    for ch in s.chars() {
        if prev_cased {
            out.extend(ch.to_lowercase());
        } else {
            out.extend(ch.to_uppercase());
        }
        prev_cased = ch.is_alphabetic();
    }
    out
}

/// Remove every occurrence of each unit token (case-sensitive).
fn strip_units(s: &str, tokens: &[&str]) -> String {
    tokens
        .iter()
        .fold(s.to_string(), |acc, tok| acc.replace(tok, ""))
}

/// Strip unit tokens and parse. Never fails: anything unparseable is `Missing`.
pub fn parse_unit_value(cell: &CellValue, kind: NumberKind, strip: &[&str]) -> CellValue {
    match (cell, kind) {
        (CellValue::Text(s), _) => {
            let stripped = strip_units(s, strip);
            parse_number(stripped.trim(), kind)
        }
        (CellValue::Integer(i), NumberKind::Integer) => CellValue::Integer(*i),
        (CellValue::Integer(i), NumberKind::Float) => CellValue::Float(*i as f64),
        (CellValue::Float(v), NumberKind::Float) if v.is_finite() => CellValue::Float(*v),
        (CellValue::Float(v), NumberKind::Integer) => whole_number(*v),
        _ => CellValue::Missing,
    }
}

fn parse_number(s: &str, kind: NumberKind) -> CellValue {
    match kind {
        NumberKind::Float => match s.parse::<f64>() {
            Ok(v) if v.is_finite() => CellValue::Float(v),
            _ => CellValue::Missing,
        },
        NumberKind::Integer => match s.parse::<i64>() {
            Ok(i) => CellValue::Integer(i),
            // "30.0" is still a gauge of 30
            Err(_) => s.parse::<f64>().map_or(CellValue::Missing, whole_number),
        },
    }
}

fn whole_number(v: f64) -> CellValue {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
        CellValue::Integer(v as i64)
    } else {
        CellValue::Missing
    }
}

/// Apply one rule to one cell. Non-text cells pass title-casing unchanged.
pub fn apply_rule(cell: &CellValue, rule: &ColumnRule) -> CellValue {
    match rule.kind {
        RuleKind::TitleCase => match cell {
            CellValue::Text(s) => CellValue::Text(title_case(s.trim())),
            other => other.clone(),
        },
        RuleKind::Numeric { kind, strip } => parse_unit_value(cell, kind, strip),
    }
}

// ---------------------------------------------------------------------------
// Sheet normalization
// ---------------------------------------------------------------------------

static MISSING: CellValue = CellValue::Missing;

/// Normalize one raw sheet into a brand's catalog table.
///
/// Columns the profile has no rule for pass through unchanged; rules for
/// columns the sheet lacks are simply not applied. Short rows are padded
/// with `Missing` so every row has one cell per column.
pub fn normalize_sheet(raw: &RawSheet, profile: &BrandProfile) -> CatalogTable {
    let columns: Vec<String> = raw.headers.iter().map(|h| canonical_column_name(h)).collect();
    let rules: Vec<Option<&ColumnRule>> = columns.iter().map(|c| profile.rule_for(c)).collect();
    let mut failures = vec![0usize; columns.len()];

    let rows: Vec<Vec<CellValue>> = raw
        .rows
        .iter()
        .map(|raw_row| {
            (0..columns.len())
                .map(|idx| {
                    let cell = raw_row.get(idx).unwrap_or(&MISSING);
                    match rules[idx] {
                        Some(rule) => {
                            let out = apply_rule(cell, rule);
                            if out.is_missing() && !cell.is_missing() {
                                failures[idx] += 1;
                            }
                            out
                        }
                        None => cell.clone(),
                    }
                })
                .collect::<Vec<CellValue>>()
        })
        .collect();

    for (col, n) in columns.iter().zip(&failures).filter(|(_, n)| **n > 0) {
        log::warn!(
            "{}: {n} cell(s) in '{col}' did not parse and are treated as missing",
            profile.brand
        );
    }

    CatalogTable {
        brand: profile.brand,
        columns,
        rows,
        identifier_column: profile.identifier_column.to_string(),
    }
}
