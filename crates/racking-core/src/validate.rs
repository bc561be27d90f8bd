//! Range checks for every numeric input the estimator consumes.
//!
//! Values that are zero, negative or not finite where a length is required
//! are reported as [`EstimateError::InvalidGeometry`]; values that are usable
//! numbers but outside the documented range are [`EstimateError::InvalidInput`].

use crate::types::*;

/// Panel width and height (inches)
pub const PANEL_DIMENSION_RANGE: (f64, f64) = (0.0, 200.0);
/// Panel weight (pounds)
pub const PANEL_WEIGHT_RANGE: (f64, f64) = (0.0, 200.0);
pub const PANEL_SPACING_RANGE: (f64, f64) = (0.0, 12.0);
pub const RAIL_PROTRUSION_RANGE: (f64, f64) = (0.0, 24.0);
pub const BRACKET_INSET_RANGE: (f64, f64) = (0.0, 48.0);
pub const MAX_RAIL_SPAN_RANGE: (f64, f64) = (0.0, 240.0);
pub const MIN_ANCHOR_SPACING_RANGE: (f64, f64) = (0.0, 96.0);
pub const RAIL_INSET_RANGE: (f64, f64) = (0.0, 48.0);
pub const STOCK_LENGTH_RANGE: (f64, f64) = (0.0, 1000.0);

/// Rejects non-finite or non-positive values, then checks `(min, max]`.
fn positive_in_range(field: &str, value: f64, (min, max): (f64, f64)) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(EstimateError::invalid_geometry(field, value));
    }
    if value <= min || value > max {
        return Err(out_of_range(field, value, format!("({min}, {max}]")));
    }
    Ok(())
}

/// Rejects non-finite or negative values, then checks `[min, max]`.
fn non_negative_in_range(field: &str, value: f64, (min, max): (f64, f64)) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(EstimateError::invalid_geometry(field, value));
    }
    if value < min || value > max {
        return Err(out_of_range(field, value, format!("[{min}, {max}]")));
    }
    Ok(())
}

fn out_of_range(field: &str, value: f64, range: String) -> EstimateError {
    EstimateError::InvalidInput {
        field: field.to_string(),
        value: value.to_string(),
        range,
    }
}

impl PanelSpec {
    pub fn validate(&self) -> Result<()> {
        positive_in_range("panel_width", self.width, PANEL_DIMENSION_RANGE)?;
        positive_in_range("panel_height", self.height, PANEL_DIMENSION_RANGE)?;
        positive_in_range("panel_weight", self.weight, PANEL_WEIGHT_RANGE)?;
        Ok(())
    }
}

impl RackingConfig {
    pub fn validate(&self) -> Result<()> {
        non_negative_in_range("panel_spacing", self.panel_spacing, PANEL_SPACING_RANGE)?;
        non_negative_in_range(
            "rail_protrusion",
            self.rail_protrusion,
            RAIL_PROTRUSION_RANGE,
        )?;
        non_negative_in_range("bracket_inset", self.bracket_inset, BRACKET_INSET_RANGE)?;
        positive_in_range("max_rail_span", self.max_rail_span, MAX_RAIL_SPAN_RANGE)?;
        positive_in_range(
            "min_anchor_spacing",
            self.min_anchor_spacing,
            MIN_ANCHOR_SPACING_RANGE,
        )?;
        non_negative_in_range(
            "portrait_rail_inset",
            self.portrait_rail_inset,
            RAIL_INSET_RANGE,
        )?;
        non_negative_in_range(
            "landscape_rail_inset",
            self.landscape_rail_inset,
            RAIL_INSET_RANGE,
        )?;

        // A span shorter than one anchor interval quantizes to zero
        let spacing = self.mount_spacing();
        if spacing <= 0.0 {
            return Err(EstimateError::invalid_geometry("mount_spacing", spacing));
        }
        Ok(())
    }
}

impl RowSpec {
    /// Checks the panel count; `index` identifies the row in the error.
    pub fn validate(&self, index: usize) -> Result<()> {
        if !(MIN_PANELS_PER_ROW..=MAX_PANELS_PER_ROW).contains(&self.panel_count) {
            return Err(EstimateError::InvalidRowCount {
                row: index,
                count: self.panel_count,
            });
        }
        Ok(())
    }
}

impl RailStockCatalog {
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(EstimateError::EmptyCatalog);
        }
        for &length in self.lengths() {
            positive_in_range("rails", length, STOCK_LENGTH_RANGE)?;
        }
        Ok(())
    }
}

/// Validates a whole row list, stopping at the first offending row.
pub fn validate_rows(rows: &[RowSpec]) -> Result<()> {
    rows.iter()
        .enumerate()
        .try_for_each(|(index, row)| row.validate(index))
}
