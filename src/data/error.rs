use std::path::PathBuf;

use thiserror::Error;

/// Failures that stop the catalogs from loading. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("unsupported catalog source: {}", .0.display())]
    UnsupportedSource(PathBuf),

    #[error("sheet '{sheet}' not found in {}", .path.display())]
    MissingSheet { sheet: String, path: PathBuf },

    #[error("failed to read workbook {}", .path.display())]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("failed to read CSV {}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON catalog {}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed JSON catalog {}: {reason}", .path.display())]
    JsonShape { path: PathBuf, reason: String },

    #[error("unknown catalog version '{0}' (expected chart4 or chart5h)")]
    UnknownVersion(String),
}
