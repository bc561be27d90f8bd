use crate::num::round2;
use crate::types::*;

use super::geometry::row_geometry;

/// Added to both footprint sides when the array is attached to trusses
/// (2 m expressed in inches).
pub const TRUSS_FOOTPRINT_OFFSET: f64 = 78.7402;

/// Square inches per square foot
const SQ_IN_PER_SQ_FT: f64 = 144.0;

/// Panel weight per square foot of mounting footprint, rounded to 0.01 psf.
pub fn row_deadload(row: &RowSpec, panel: &PanelSpec, config: &RackingConfig) -> Result<f64> {
    let geometry = row_geometry(row, panel, config);

    let footprint_width = geometry.row_width - 2.0 * config.bracket_inset;
    let footprint_height = match row.orientation {
        Orientation::Landscape => panel.width - 2.0 * config.landscape_rail_inset,
        Orientation::Portrait => panel.height - 2.0 * config.portrait_rail_inset,
    };

    let footprint_area = if config.truss_structure {
        (footprint_width + TRUSS_FOOTPRINT_OFFSET) * (footprint_height + TRUSS_FOOTPRINT_OFFSET)
    } else {
        footprint_width * footprint_height
    };

    if footprint_width <= 0.0 {
        return Err(EstimateError::invalid_geometry("footprint_width", footprint_width));
    }
    if footprint_height <= 0.0 {
        return Err(EstimateError::invalid_geometry("footprint_height", footprint_height));
    }
    if !footprint_area.is_finite() || footprint_area <= 0.0 {
        return Err(EstimateError::invalid_geometry("footprint_area", footprint_area));
    }

    let total_weight = f64::from(row.panel_count) * panel.weight;
    Ok(round2(total_weight / footprint_area * SQ_IN_PER_SQ_FT))
}
