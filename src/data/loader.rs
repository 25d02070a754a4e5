use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use calamine::{Data, Reader, open_workbook_auto};
use serde_json::Value as JsonValue;

use super::error::CatalogError;
use super::model::{Catalogs, CellValue, RawSheet};
use super::normalize::normalize_sheet;
use super::schema::CatalogVersion;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load and normalize every brand of a catalog version.
///
/// Any missing sheet is fatal: there is no partial catalog.
pub fn load_catalogs(path: &Path, version: CatalogVersion) -> Result<Catalogs, CatalogError> {
    let names: Vec<&str> = version
        .profiles()
        .iter()
        .map(|p| p.brand.sheet_name())
        .collect();
    let sheets = load_raw_sheets(path, &names)?;

    let mut tables = BTreeMap::new();
    for (profile, sheet) in version.profiles().iter().zip(&sheets) {
        let table = normalize_sheet(sheet, profile);
        log::info!(
            "Loaded {} parts for {} with {} columns",
            table.len(),
            profile.brand,
            table.columns.len()
        );
        tables.insert(profile.brand, table);
    }

    Ok(Catalogs { version, tables })
}

/// Read the named sheets from a source, in the order given. Dispatch by extension.
///
/// Supported sources:
/// * `.xlsx` / `.xlsm` / `.xls` / `.ods` – one worksheet per brand
/// * `.json` – `{ "<sheet>": [ { "<column>": value, ... }, ... ], ... }`
/// * a directory – one `<sheet>.csv` per brand
pub fn load_raw_sheets(path: &Path, names: &[&str]) -> Result<Vec<RawSheet>, CatalogError> {
    if path.is_dir() {
        return names.iter().map(|name| load_csv(path, name)).collect();
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "xlsx" | "xlsm" | "xls" | "ods" => load_workbook(path, names),
        "json" => load_json(path, names),
        _ => Err(CatalogError::UnsupportedSource(path.to_path_buf())),
    }
}

fn missing_sheet(sheet: &str, path: &Path) -> CatalogError {
    CatalogError::MissingSheet {
        sheet: sheet.to_string(),
        path: path.to_path_buf(),
    }
}

/// Trailing blank spreadsheet rows carry no part.
fn is_blank(row: &[CellValue]) -> bool {
    row.iter().all(CellValue::is_missing)
}

// ---------------------------------------------------------------------------
// Workbook loader
// ---------------------------------------------------------------------------

/// First row of each sheet is the header.
fn load_workbook(path: &Path, names: &[&str]) -> Result<Vec<RawSheet>, CatalogError> {
    let workbook_err = |source: calamine::Error| CatalogError::Workbook {
        path: path.to_path_buf(),
        source,
    };
    let mut workbook = open_workbook_auto(path).map_err(workbook_err)?;
    let available = workbook.sheet_names().to_vec();

    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        if !available.iter().any(|s| s == name) {
            return Err(missing_sheet(name, path));
        }
        let range = workbook.worksheet_range(name).map_err(workbook_err)?;
        let mut rows = range.rows();

        let headers: Vec<String> = rows
            .next()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .unwrap_or_default();
        let body: Vec<Vec<CellValue>> = rows
            .map(|r| r.iter().map(workbook_cell).collect::<Vec<_>>())
            .filter(|r| !is_blank(r))
            .collect();

        log::debug!("Read sheet '{name}': {} rows", body.len());
        sheets.push(RawSheet::new(*name, headers, body));
    }
    Ok(sheets)
}

fn workbook_cell(cell: &Data) -> CellValue {
    match cell {
        Data::String(s) if s.is_empty() => CellValue::Missing,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => finite(*f),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        Data::Empty | Data::Error(_) => CellValue::Missing,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON layout, one records-oriented array per sheet:
///
/// ```json
/// {
///   "Excelta": [
///     { "Part #": "170-E", "Size": "Small", "Millimeter Low": "1.5mm" },
///     ...
///   ],
///   ...
/// }
/// ```
///
/// Columns are taken in first-seen order across the records.
fn load_json(path: &Path, names: &[&str]) -> Result<Vec<RawSheet>, CatalogError> {
    let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root: JsonValue = serde_json::from_str(&text).map_err(|source| CatalogError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let shape_err = |reason: String| CatalogError::JsonShape {
        path: path.to_path_buf(),
        reason,
    };

    let book = root
        .as_object()
        .ok_or_else(|| shape_err("expected a top-level object keyed by sheet name".into()))?;

    names
        .iter()
        .map(|name| -> Result<RawSheet, CatalogError> {
            let records = book
                .get(*name)
                .ok_or_else(|| missing_sheet(name, path))?
                .as_array()
                .ok_or_else(|| shape_err(format!("sheet '{name}' is not an array")))?;

            let mut headers: Vec<String> = Vec::new();
            for (i, rec) in records.iter().enumerate() {
                let obj = rec
                    .as_object()
                    .ok_or_else(|| shape_err(format!("sheet '{name}' row {i} is not an object")))?;
                for key in obj.keys() {
                    if !headers.contains(key) {
                        headers.push(key.clone());
                    }
                }
            }

            let rows: Vec<Vec<CellValue>> = records
                .iter()
                .filter_map(|rec| rec.as_object())
                .map(|obj| {
                    headers
                        .iter()
                        .map(|h| obj.get(h).map_or(CellValue::Missing, json_cell))
                        .collect::<Vec<_>>()
                })
                .filter(|r| !is_blank(r))
                .collect();

            Ok(RawSheet::new(*name, headers, rows))
        })
        .collect()
}

fn json_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) if s.is_empty() => CellValue::Missing,
        JsonValue::String(s) => CellValue::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                finite(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::Null => CellValue::Missing,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV directory loader
// ---------------------------------------------------------------------------

/// `<dir>/<sheet>.csv` with a header row.
fn load_csv(dir: &Path, name: &str) -> Result<RawSheet, CatalogError> {
    let path: PathBuf = dir.join(format!("{name}.csv"));
    if !path.is_file() {
        return Err(missing_sheet(name, dir));
    }
    let csv_err = |source: csv::Error| CatalogError::Csv {
        path: path.clone(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(&path)
        .map_err(csv_err)?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(csv_err)?;
        let row: Vec<CellValue> = record.iter().map(guess_cell_type).collect();
        if !is_blank(&row) {
            rows.push(row);
        }
    }

    Ok(RawSheet::new(name, headers, rows))
}

fn guess_cell_type(s: &str) -> CellValue {
    if s.is_empty() {
        return CellValue::Missing;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return finite(f);
    }
    CellValue::Text(s.to_string())
}

/// `NaN` and infinities are no measurement; they load as missing cells.
fn finite(f: f64) -> CellValue {
    if f.is_finite() {
        CellValue::Float(f)
    } else {
        CellValue::Missing
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::data::schema::Brand;

    fn write_chart4_csvs(dir: &Path) {
        fs::write(
            dir.join("Excelta.csv"),
            "Part #,Size,Millimeter Low,Millimeter High\n170-E, small ,1.5mm,3.0mm\n,,,\n175-E,Large,0.5mm,1.0mm\n",
        )
        .unwrap();
        fs::write(
            dir.join("ideal-tek.csv"),
            "Part Number,Lowest AWG,Highest AWG\n2-112,20,AWG 30\n",
        )
        .unwrap();
        fs::write(dir.join("Swanstrom.csv"), "Model,Tip inches\nS1,\"0.1\"\"\"\n").unwrap();
    }

    #[test]
    fn loads_csv_directory() {
        let dir = tempfile::tempdir().unwrap();
        write_chart4_csvs(dir.path());

        let catalogs = load_catalogs(dir.path(), CatalogVersion::Chart4).unwrap();
        assert_eq!(catalogs.brands(), vec![Brand::Excelta, Brand::IdealTek, Brand::Swanstrom]);

        let excelta = catalogs.get(Brand::Excelta).unwrap();
        assert_eq!(excelta.len(), 2, "blank row dropped");
        assert_eq!(excelta.rows[0][1], CellValue::from("Small"));
        assert_eq!(excelta.rows[0][2], CellValue::Float(1.5));

        let ideal = catalogs.get(Brand::IdealTek).unwrap();
        assert_eq!(ideal.rows[0][1], CellValue::Integer(20));
        assert_eq!(ideal.rows[0][2], CellValue::Integer(30));

        let swan = catalogs.get(Brand::Swanstrom).unwrap();
        assert_eq!(swan.columns, vec!["Model", "Tip_inches"]);
        assert_eq!(swan.rows[0][1], CellValue::Float(0.1));
    }

    #[test]
    fn missing_sheet_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_chart4_csvs(dir.path());
        // Chart5H also needs EREM.
        let err = load_catalogs(dir.path(), CatalogVersion::Chart5H).unwrap_err();
        assert!(matches!(err, CatalogError::MissingSheet { ref sheet, .. } if sheet == "EREM"));
    }

    #[test]
    fn loads_json_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.json");
        fs::write(
            &path,
            r#"{
                "Excelta": [
                    {"Part #": "170-E", "AWG Low": "30AWG"},
                    {"Part #": 1234, "Notes": null}
                ],
                "ideal-tek": [],
                "Swanstrom": [{"Model": "S1", "Tip inches": 0.1}]
            }"#,
        )
        .unwrap();

        let catalogs = load_catalogs(&path, CatalogVersion::Chart4).unwrap();
        let excelta = catalogs.get(Brand::Excelta).unwrap();
        assert_eq!(excelta.columns, vec!["Part_#", "AWG_Low", "Notes"]);
        assert_eq!(excelta.rows[0], vec!["170-E".into(), CellValue::Integer(30), CellValue::Missing]);
        assert_eq!(excelta.rows[1][0], CellValue::Integer(1234));
        assert!(catalogs.get(Brand::IdealTek).unwrap().is_empty());
        assert_eq!(catalogs.get(Brand::Swanstrom).unwrap().rows[0][1], CellValue::Float(0.1));
    }

    #[test]
    fn malformed_json_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.json");
        fs::write(&path, "[1, 2]").unwrap();
        assert!(matches!(
            load_raw_sheets(&path, &["Excelta"]),
            Err(CatalogError::JsonShape { .. })
        ));
        fs::write(&path, "{ nope").unwrap();
        assert!(matches!(load_raw_sheets(&path, &["Excelta"]), Err(CatalogError::Json { .. })));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load_raw_sheets(Path::new("chart.parquet"), &["Excelta"]).unwrap_err();
        assert!(matches!(err, CatalogError::UnsupportedSource(_)));
    }

    #[test]
    fn unreadable_workbook_is_reported() {
        let err = load_raw_sheets(Path::new("/definitely/not/here.xlsx"), &["Excelta"]).unwrap_err();
        assert!(matches!(err, CatalogError::Workbook { .. }));
    }

    #[test]
    fn guesses_csv_cell_types() {
        assert_eq!(guess_cell_type(""), CellValue::Missing);
        assert_eq!(guess_cell_type("30"), CellValue::Integer(30));
        assert_eq!(guess_cell_type("0.5"), CellValue::Float(0.5));
        assert_eq!(guess_cell_type("1.5mm"), CellValue::from("1.5mm"));
        assert_eq!(guess_cell_type("NaN"), CellValue::Missing);
        assert_eq!(guess_cell_type("-inf"), CellValue::Missing);
        assert_eq!(workbook_cell(&Data::Float(f64::NAN)), CellValue::Missing);
        assert_eq!(workbook_cell(&Data::Float(0.25)), CellValue::Float(0.25));
    }

    #[test]
    fn nan_cells_load_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        write_chart4_csvs(dir.path());
        fs::write(dir.path().join("Excelta.csv"), "Part #,Cut\nNaN,NaN\nNaN,NaN\n170-E,Flush\n").unwrap();

        let catalogs = load_catalogs(dir.path(), CatalogVersion::Chart4).unwrap();
        let excelta = catalogs.get(Brand::Excelta).unwrap();
        assert_eq!(excelta.len(), 1, "all-NaN rows are blank");
        assert_eq!(excelta.unique_values("Cut").len(), 1);
        assert_eq!(crate::data::filter::distinct_identifiers(excelta), vec![CellValue::from("170-E")]);
    }
}
