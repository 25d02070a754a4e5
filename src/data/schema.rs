use std::fmt;
use std::str::FromStr;

use super::error::CatalogError;

// ---------------------------------------------------------------------------
// Brand / catalog version
// ---------------------------------------------------------------------------

/// A manufacturer line; each one is a sheet in the source workbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Brand {
    Excelta,
    IdealTek,
    Swanstrom,
    Erem,
}

impl Brand {
    /// Sheet name in the workbook, also used as the display label.
    pub const fn sheet_name(self) -> &'static str {
        match self {
            Brand::Excelta => "Excelta",
            Brand::IdealTek => "ideal-tek",
            Brand::Swanstrom => "Swanstrom",
            Brand::Erem => "EREM",
        }
    }
}

impl fmt::Display for Brand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sheet_name())
    }
}

/// Which revision of the cutter correlation workbook is loaded.
///
/// The revisions differ in brands, column names and unit suffixes, so each
/// one carries its own profile table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatalogVersion {
    /// Legacy workbook: three brands, exact-match Swanstrom dimensions.
    Chart4,
    #[default]
    Chart5H,
}

impl CatalogVersion {
    pub fn profiles(self) -> &'static [BrandProfile] {
        match self {
            CatalogVersion::Chart4 => &CHART4,
            CatalogVersion::Chart5H => &CHART5H,
        }
    }

    pub fn profile(self, brand: Brand) -> Option<&'static BrandProfile> {
        self.profiles().iter().find(|p| p.brand == brand)
    }
}

impl FromStr for CatalogVersion {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chart4" | "4" => Ok(CatalogVersion::Chart4),
            "chart5h" | "5h" => Ok(CatalogVersion::Chart5H),
            other => Err(CatalogError::UnknownVersion(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Rules and filter field definitions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberKind {
    Float,
    Integer,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RuleKind {
    /// Trim, then title-case.
    TitleCase,
    /// Remove every listed unit token, then parse. Failures become missing.
    Numeric {
        kind: NumberKind,
        strip: &'static [&'static str],
    },
}

/// Normalization rule for one canonical column of one brand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnRule {
    pub column: &'static str,
    pub kind: RuleKind,
}

/// A categorical dropdown bound to one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryField {
    pub column: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericMatch {
    /// Inclusive `low <= value <= high`.
    Range {
        low: &'static str,
        high: &'static str,
    },
    /// Strict equality, no tolerance.
    Exact { column: &'static str },
}

/// A free-text numeric input bound to one column or column pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericField {
    pub label: &'static str,
    /// How the typed-in text is parsed; an integer field rejects `"30.5"`.
    pub kind: NumberKind,
    pub matcher: NumericMatch,
}

/// Everything brand-specific: rules, filter fields and the part number column.
#[derive(Debug, PartialEq)]
pub struct BrandProfile {
    pub brand: Brand,
    pub identifier_column: &'static str,
    pub rules: &'static [ColumnRule],
    pub categories: &'static [CategoryField],
    /// In evaluation order.
    pub numeric: &'static [NumericField],
}

impl BrandProfile {
    /// Rule for a canonical column name, matched ASCII case-insensitively.
    pub fn rule_for(&self, column: &str) -> Option<&ColumnRule> {
        self.rules
            .iter()
            .find(|r| r.column == column)
            .or_else(|| self.rules.iter().find(|r| r.column.eq_ignore_ascii_case(column)))
    }
}

// ---------------------------------------------------------------------------
// Profile tables
// ---------------------------------------------------------------------------

const MM: &[&str] = &["mm"];
const INCH: &[&str] = &["\""];
const AWG: &[&str] = &["AWG"];
// Some Swanstrom rows carry the typo "AWH".
const AWG_OR_AWH: &[&str] = &["AWG", "AWH"];

const fn title(column: &'static str) -> ColumnRule {
    ColumnRule {
        column,
        kind: RuleKind::TitleCase,
    }
}

const fn float(column: &'static str, strip: &'static [&'static str]) -> ColumnRule {
    ColumnRule {
        column,
        kind: RuleKind::Numeric {
            kind: NumberKind::Float,
            strip,
        },
    }
}

const fn int(column: &'static str, strip: &'static [&'static str]) -> ColumnRule {
    ColumnRule {
        column,
        kind: RuleKind::Numeric {
            kind: NumberKind::Integer,
            strip,
        },
    }
}

const fn category(column: &'static str, label: &'static str) -> CategoryField {
    CategoryField { column, label }
}

const fn range(
    label: &'static str,
    kind: NumberKind,
    low: &'static str,
    high: &'static str,
) -> NumericField {
    NumericField {
        label,
        kind,
        matcher: NumericMatch::Range { low, high },
    }
}

const fn exact(label: &'static str, column: &'static str) -> NumericField {
    NumericField {
        label,
        kind: NumberKind::Float,
        matcher: NumericMatch::Exact { column },
    }
}

// -- Excelta --

const EXCELTA_RULES: &[ColumnRule] = &[
    title("Size"),
    float("Millimeter_Low", MM),
    float("Millimeter_High", MM),
    float("Inches_Low", INCH),
    float("Inches_High", INCH),
    int("AWG_High", AWG),
    int("AWG_Low", AWG),
];

const EXCELTA_NUMERIC: &[NumericField] = &[
    range("Millimeter Value", NumberKind::Float, "Millimeter_Low", "Millimeter_High"),
    range("Inches Value", NumberKind::Float, "Inches_Low", "Inches_High"),
    range("AWG Value", NumberKind::Integer, "AWG_Low", "AWG_High"),
];

// -- ideal-tek --

const IDEALTEK_RULES: &[ColumnRule] = &[
    float("Head_Width_Millimeter", MM),
    float("Head_Width__inches", INCH),
    float("Lowest_Cutting_Capacity_Millimeter", MM),
    float("Highest_Cutting_Capacity__Millimeter", MM),
    int("Highest_AWG", AWG),
    int("Lowest_AWG", AWG),
    float("OAL_Millimeter", MM),
    float("OAL__inches", INCH),
];

const IDEALTEK_NUMERIC: &[NumericField] = &[
    range(
        "Millimeter Value",
        NumberKind::Float,
        "Lowest_Cutting_Capacity_Millimeter",
        "Highest_Cutting_Capacity__Millimeter",
    ),
    // Head width is a single column; the range collapses to equality.
    range("Inches Value", NumberKind::Float, "Head_Width__inches", "Head_Width__inches"),
    range("AWG Value", NumberKind::Integer, "Lowest_AWG", "Highest_AWG"),
];

// -- Chart4 --

const SWANSTROM_CHART4_RULES: &[ColumnRule] = &[
    float("OAL_inches", INCH),
    float("Blade_Length_inches", INCH),
    float("Body_Width_inches", INCH),
    float("Tip_inches", INCH),
    title("Type"),
    title("Sub-Type"),
];

static CHART4: [BrandProfile; 3] = [
    BrandProfile {
        brand: Brand::Excelta,
        identifier_column: "Part_#",
        rules: EXCELTA_RULES,
        categories: &[
            category("Size", "Size"),
            category("Cut", "Cut"),
            category("Wire", "Wire"),
        ],
        numeric: EXCELTA_NUMERIC,
    },
    BrandProfile {
        brand: Brand::IdealTek,
        identifier_column: "Part_Number",
        rules: IDEALTEK_RULES,
        categories: &[
            category("Type", "Type"),
            category("Head_Shape", "Head Shape"),
            category("Head_Size", "Head Size"),
            category("Cutting_Edge", "Cutting Edge"),
        ],
        numeric: IDEALTEK_NUMERIC,
    },
    BrandProfile {
        brand: Brand::Swanstrom,
        identifier_column: "Model",
        rules: SWANSTROM_CHART4_RULES,
        categories: &[
            category("Type", "Type"),
            category("Handle_Type", "Handle Type"),
            category("Sub-Type", "Sub-Type"),
        ],
        numeric: &[
            exact("OAL", "OAL_inches"),
            exact("Blade Length", "Blade_Length_inches"),
            exact("Body Width", "Body_Width_inches"),
            exact("Tip", "Tip_inches"),
        ],
    },
];

// -- Chart5H --

static CHART5H: [BrandProfile; 4] = [
    BrandProfile {
        brand: Brand::Excelta,
        identifier_column: "Part_#",
        rules: EXCELTA_RULES,
        categories: &[
            category("Size", "Head Shape"),
            category("Cut", "Type of Cut"),
            category("Wire", "Material Strength"),
        ],
        numeric: EXCELTA_NUMERIC,
    },
    BrandProfile {
        brand: Brand::IdealTek,
        identifier_column: "Part_Number",
        rules: IDEALTEK_RULES,
        categories: &[
            category("Type", "Cutter Hardness"),
            category("Head_Shape", "Head Shape"),
            category("Head_Size", "Head Size"),
            category("Cutting_Edge", "Type of Cut"),
        ],
        numeric: IDEALTEK_NUMERIC,
    },
    BrandProfile {
        brand: Brand::Swanstrom,
        identifier_column: "Model_#",
        rules: &[
            float("Lowest_Cutting_Capacity_Inches", INCH),
            float("Highest_Cutting_Capacity_Inches", INCH),
            int("AWG_Low", AWG_OR_AWH),
            int("AWG_High", AWG_OR_AWH),
        ],
        categories: &[
            category("Cut", "Type of Cut"),
            category("Type_of_Cut", "Material Strength"),
        ],
        numeric: &[
            range(
                "Inches Value",
                NumberKind::Float,
                "Lowest_Cutting_Capacity_Inches",
                "Highest_Cutting_Capacity_Inches",
            ),
            range("AWG Value", NumberKind::Integer, "AWG_Low", "AWG_High"),
        ],
    },
    BrandProfile {
        brand: Brand::Erem,
        identifier_column: "Part_Number",
        rules: &[
            float("Cutting_Capacity_Copper_Low", INCH),
            float("Cutting_Capacity_Copper_High", INCH),
            float("Cutting_Capacity_Medium_Wire_Low", INCH),
            float("Cutting_Capacity_Medium_Wire_High", INCH),
            float("Cutting_Capacity_Hard_Wire_Low", INCH),
            float("Cutting_Capacity_Hard_Wire_High", INCH),
        ],
        categories: &[
            category("Series_of_Cutter", "Series of Cutter"),
            category("Cut_Type", "Type of Cut"),
        ],
        numeric: &[
            range(
                "Copper Wire Value",
                NumberKind::Float,
                "Cutting_Capacity_Copper_Low",
                "Cutting_Capacity_Copper_High",
            ),
            range(
                "Medium Wire Value",
                NumberKind::Float,
                "Cutting_Capacity_Medium_Wire_Low",
                "Cutting_Capacity_Medium_Wire_High",
            ),
            range(
                "Hard Wire Value",
                NumberKind::Float,
                "Cutting_Capacity_Hard_Wire_Low",
                "Cutting_Capacity_Hard_Wire_High",
            ),
        ],
    },
];
