use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::num::floor_div;

/// Fewest panels a row may hold
pub const MIN_PANELS_PER_ROW: u32 = 1;
/// Most panels a row may hold
pub const MAX_PANELS_PER_ROW: u32 = 100;

/// Which way the panels in a row are turned
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Long edge across the row, panel width runs along the rails
    #[default]
    Portrait,
    /// Panel rotated 90°, panel height runs along the rails
    Landscape,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Portrait => "Portrait",
            Orientation::Landscape => "Landscape",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Orientation {
    type Err = EstimateError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "portrait" => Ok(Orientation::Portrait),
            "landscape" => Ok(Orientation::Landscape),
            _ => Err(EstimateError::InvalidInput {
                field: "orientation".to_string(),
                value: s.to_string(),
                range: "Portrait | Landscape".to_string(),
            }),
        }
    }
}

/// Mounting pattern used to place brackets along the two rails of a row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RackingPattern {
    /// Both rails carry brackets on the same centers
    #[default]
    Continuous,
    /// One rail is offset by half a mount spacing
    Staggered,
}

impl RackingPattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            RackingPattern::Continuous => "Continuous",
            RackingPattern::Staggered => "Staggered",
        }
    }
}

impl fmt::Display for RackingPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RackingPattern {
    type Err = EstimateError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "continuous" => Ok(RackingPattern::Continuous),
            "staggered" => Ok(RackingPattern::Staggered),
            _ => Err(EstimateError::InvalidInput {
                field: "pattern".to_string(),
                value: s.to_string(),
                range: "Continuous | Staggered".to_string(),
            }),
        }
    }
}

/// Physical panel dimensions, all in inches and pounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelSpec {
    pub width: f64,
    pub height: f64,
    pub weight: f64,
}

/// Mounting parameters shared by every row of an array.
///
/// Lengths are in inches. Missing fields fall back to the defaults of a
/// typical residential rail system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RackingConfig {
    /// Gap between adjacent panels in a row
    pub panel_spacing: f64,
    /// Rail overhang beyond the outermost panel, applied at each end
    pub rail_protrusion: f64,
    /// Distance from the row edge to the first bracket
    pub bracket_inset: f64,
    /// Longest unsupported rail span allowed between brackets
    pub max_rail_span: f64,
    /// Smallest interval anchors can be placed at (usually the rafter spacing)
    pub min_anchor_spacing: f64,
    /// Rail inset from the panel edge for portrait rows (deadload only)
    pub portrait_rail_inset: f64,
    /// Rail inset from the panel edge for landscape rows (deadload only)
    pub landscape_rail_inset: f64,
    pub pattern: RackingPattern,
    /// Attached to trusses rather than rafters (deadload only)
    pub truss_structure: bool,
}

impl Default for RackingConfig {
    fn default() -> Self {
        Self {
            panel_spacing: 0.625,
            rail_protrusion: 4.0,
            bracket_inset: 10.0,
            max_rail_span: 48.0,
            min_anchor_spacing: 24.0,
            portrait_rail_inset: 0.0,
            landscape_rail_inset: 0.0,
            pattern: RackingPattern::Continuous,
            truss_structure: false,
        }
    }
}

impl RackingConfig {
    /// Largest multiple of `min_anchor_spacing` that does not exceed `max_rail_span`.
    pub fn mount_spacing(&self) -> f64 {
        floor_div(self.max_rail_span, self.min_anchor_spacing) * self.min_anchor_spacing
    }
}

/// One row of the array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowSpec {
    pub panel_count: u32,
    #[serde(default)]
    pub orientation: Orientation,
}

impl RowSpec {
    pub fn new(panel_count: u32, orientation: Orientation) -> Self {
        Self {
            panel_count,
            orientation,
        }
    }
}

/// Manufactured rail lengths available for cutting.
///
/// Lengths are kept sorted ascending with duplicates removed, so iteration
/// order (and therefore the optimizer's tie-breaking) does not depend on the
/// order the lengths were supplied in.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<f64>", into = "Vec<f64>")]
pub struct RailStockCatalog {
    lengths: Vec<f64>,
}

impl RailStockCatalog {
    /// Builds a catalog and rejects empty or non-positive entries.
    pub fn new(lengths: impl IntoIterator<Item = f64>) -> Result<Self> {
        let catalog: Self = lengths.into_iter().collect::<Vec<_>>().into();
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn lengths(&self) -> &[f64] {
        &self.lengths
    }

    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    pub fn min_length(&self) -> Option<f64> {
        self.lengths.first().copied()
    }

    pub fn max_length(&self) -> Option<f64> {
        self.lengths.last().copied()
    }
}

impl From<Vec<f64>> for RailStockCatalog {
    fn from(mut lengths: Vec<f64>) -> Self {
        lengths.sort_by(|a, b| a.total_cmp(b));
        lengths.dedup();
        Self { lengths }
    }
}

impl From<RailStockCatalog> for Vec<f64> {
    fn from(catalog: RailStockCatalog) -> Self {
        catalog.lengths
    }
}

/// Number of pieces of one stock length
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StockCount {
    pub length: f64,
    pub count: u32,
}

/// Rail stock chosen for one row.
///
/// `pieces` lists one side in cut order. Counts, splices and waste cover
/// both the near and the far rail, so they are always doubled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RailSelection {
    pub pieces: Vec<f64>,
    /// Every catalog length in ascending order, unused ones included
    pub stock_counts: Vec<StockCount>,
    pub splice_count: u32,
    pub waste: f64,
}

impl RailSelection {
    /// Summed stock length of one side.
    pub fn side_length(&self) -> f64 {
        self.pieces.iter().sum()
    }

    pub fn count_for(&self, length: f64) -> u32 {
        self.stock_counts
            .iter()
            .find(|s| s.length == length)
            .map_or(0, |s| s.count)
    }
}

/// Everything computed for a single row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowResult {
    pub index: usize,
    pub panel_count: u32,
    pub orientation: Orientation,
    pub row_width: f64,
    pub rail_length: f64,
    pub rails: RailSelection,
    /// Bracket count for this row; only the array total is converted to an integer
    pub mounts: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub psf: Option<f64>,
}

/// Array-wide hardware totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentSummary {
    pub total_panels: u32,
    pub total_mounts: u64,
    pub total_mid_clamps: u32,
    pub total_end_clamps: u32,
    pub total_splices: u32,
    pub total_waste: f64,
    /// Rails needed per stock length, ascending
    pub rail_counts: Vec<StockCount>,
    /// Per-row detail in input order
    pub rows: Vec<RowResult>,
}

impl EquipmentSummary {
    pub fn rail_lengths(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().map(|r| r.rail_length)
    }

    pub fn rails_for(&self, length: f64) -> u32 {
        self.rail_counts
            .iter()
            .find(|s| s.length == length)
            .map_or(0, |s| s.count)
    }
}

/// Bounds on the rail optimizer's exhaustive remainder search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchLimits {
    pub max_combinations: u64,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_combinations: 1_000_000,
        }
    }
}

/// Input: what the caller provides.
///
/// `panel` may be left out in favour of `panel_model`, and `catalog` may be
/// left out entirely; both are then filled from the catalog store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateRequest {
    pub rows: Vec<RowSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub panel: Option<PanelSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub panel_model: Option<String>,
    #[serde(default)]
    pub config: RackingConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<RailStockCatalog>,
    #[serde(default)]
    pub include_deadload: bool,
    #[serde(default)]
    pub limits: SearchLimits,
}

/// Error type for estimation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EstimateError {
    #[error("Row {row}: panel count {count} is outside the valid range of [1, 100]")]
    InvalidRowCount { row: usize, count: u32 },

    #[error("Rail stock catalog has no lengths")]
    EmptyCatalog,

    #[error("Invalid geometry: '{field}' must be positive and finite, got {value}")]
    InvalidGeometry { field: String, value: f64 },

    #[error("Row {row}: '{field}' must be positive and finite, got {value}")]
    InvalidRowGeometry {
        row: usize,
        field: String,
        value: f64,
    },

    #[error("Invalid input: '{field}' = {value} is outside the valid range of {range}")]
    InvalidInput {
        field: String,
        value: String,
        range: String,
    },

    #[error("Row {row}: {reason}")]
    PreconditionViolated { row: usize, reason: String },

    #[error("Row {row}: rail search exceeded {limit} combinations")]
    SearchLimitExceeded { row: usize, limit: u64 },

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Preview rendering failed")]
    Render(#[from] fmt::Error),
}

impl EstimateError {
    pub(crate) fn invalid_geometry(field: &str, value: f64) -> Self {
        EstimateError::InvalidGeometry {
            field: field.to_string(),
            value,
        }
    }

    /// Re-targets a row-scoped error at the given row index.
    pub(crate) fn at_row(self, index: usize) -> Self {
        match self {
            EstimateError::PreconditionViolated { reason, .. } => {
                EstimateError::PreconditionViolated { row: index, reason }
            }
            EstimateError::SearchLimitExceeded { limit, .. } => {
                EstimateError::SearchLimitExceeded { row: index, limit }
            }
            EstimateError::InvalidGeometry { field, value }
            | EstimateError::InvalidRowGeometry { field, value, .. } => {
                EstimateError::InvalidRowGeometry {
                    row: index,
                    field,
                    value,
                }
            }
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, EstimateError>;
