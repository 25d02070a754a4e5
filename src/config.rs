use std::path::PathBuf;

use crate::data::error::CatalogError;
use crate::data::schema::CatalogVersion;

pub const WORKBOOK_VAR: &str = "CUTTER_CHART_WORKBOOK";
pub const VERSION_VAR: &str = "CUTTER_CHART_VERSION";
pub const LOGO_VAR: &str = "CUTTER_CHART_LOGO";

const DEFAULT_WORKBOOK: &str = "Cutter_Correlation_Chart5H.xlsx";

// ---------------------------------------------------------------------------
// Runtime configuration
// ---------------------------------------------------------------------------

/// Where the catalogs come from and how the window is dressed.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub workbook: PathBuf,
    pub version: CatalogVersion,
    /// Image shown above the filters, if any.
    pub logo: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, CatalogError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CatalogError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let version = match get(VERSION_VAR) {
            Some(v) => v.parse()?,
            None => CatalogVersion::default(),
        };

        Ok(Self {
            workbook: get(WORKBOOK_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_WORKBOOK)),
            version,
            logo: get(LOGO_VAR).map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.workbook, PathBuf::from(DEFAULT_WORKBOOK));
        assert_eq!(cfg.version, CatalogVersion::Chart5H);
        assert_eq!(cfg.logo, None);
    }

    #[test]
    fn reads_overrides() {
        let cfg = AppConfig::from_lookup(lookup(&[
            (WORKBOOK_VAR, "old/Cutter_Correlation_Chart4.xlsx"),
            (VERSION_VAR, "chart4"),
            (LOGO_VAR, "PTLogo3.png"),
        ]))
        .unwrap();
        assert_eq!(cfg.version, CatalogVersion::Chart4);
        assert_eq!(cfg.workbook, PathBuf::from("old/Cutter_Correlation_Chart4.xlsx"));
        assert_eq!(cfg.logo, Some(PathBuf::from("PTLogo3.png")));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let cfg = AppConfig::from_lookup(lookup(&[(LOGO_VAR, "  ")])).unwrap();
        assert_eq!(cfg.logo, None);
    }

    #[test]
    fn unknown_version_is_an_error() {
        let err = AppConfig::from_lookup(lookup(&[(VERSION_VAR, "chart9")])).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownVersion(_)));
    }
}
