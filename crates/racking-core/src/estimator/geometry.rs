use crate::types::*;

/// Physical extent of one row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowGeometry {
    /// Panels plus the gaps between them
    pub row_width: f64,
    /// Rail needed on one side, protrusion included at both ends
    pub rail_length: f64,
}

/// Measures a row. Landscape panels are turned 90°, so their height runs
/// along the rails.
pub fn row_geometry(row: &RowSpec, panel: &PanelSpec, config: &RackingConfig) -> RowGeometry {
    let along_row = match row.orientation {
        Orientation::Portrait => panel.width,
        Orientation::Landscape => panel.height,
    };
    let count = f64::from(row.panel_count);
    let row_width = count * along_row + (count - 1.0) * config.panel_spacing;

    RowGeometry {
        row_width,
        rail_length: row_width + 2.0 * config.rail_protrusion,
    }
}
