//! SVG drawing of an array's rows, panels and rails.

use crate::estimator::row_geometry;
use crate::types::*;
use crate::validate::validate_rows;
use std::fmt::Write;

const MARGIN: f64 = 20.0;
/// Inches per SVG unit
const SCALE: f64 = 2.0;
/// Vertical gap between rows, in inches
const ROW_GAP: f64 = 24.0;
/// Rail thickness as drawn, in inches
const RAIL_WIDTH: f64 = 1.5;

/// Renders the rows top to bottom, each panel turned per its row's orientation.
pub fn render_svg(rows: &[RowSpec], panel: &PanelSpec, config: &RackingConfig) -> Result<String> {
    panel.validate()?;
    config.validate()?;
    validate_rows(rows)?;

    let mut svg = String::new();

    let max_rail = rows
        .iter()
        .map(|row| row_geometry(row, panel, config).rail_length)
        .fold(0.0, f64::max);
    let total_depth: f64 = rows
        .iter()
        .map(|row| panel_footprint(row.orientation, panel).1 + ROW_GAP)
        .sum();

    let svg_width = (max_rail / SCALE) + (2.0 * MARGIN);
    let svg_height = (total_depth / SCALE) + (2.0 * MARGIN);

    writeln!(&mut svg, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(
        &mut svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        svg_width, svg_height, svg_width, svg_height
    )?;
    writeln!(
        &mut svg,
        r##"  <rect width="100%" height="100%" fill="#f5f5f5"/>"##
    )?;

    let mut y_offset = MARGIN + ROW_GAP / (2.0 * SCALE);

    for (index, row) in rows.iter().enumerate() {
        let (along, across) = panel_footprint(row.orientation, panel);
        let depth = across / SCALE;
        let x = MARGIN + config.rail_protrusion / SCALE;

        writeln!(
            &mut svg,
            r##"  <text x="{}" y="{}" font-family="Arial" font-size="10" fill="#333">Row {}: {} × {}</text>"##,
            MARGIN,
            y_offset - 3.0,
            index + 1,
            row.panel_count,
            row.orientation
        )?;

        // Rails at a quarter of the panel depth from each edge
        let rail_length = row_geometry(row, panel, config).rail_length / SCALE;
        for fraction in [0.25, 0.75] {
            writeln!(
                &mut svg,
                r##"  <rect x="{}" y="{}" width="{}" height="{}" fill="#9e9e9e"/>"##,
                MARGIN,
                y_offset + depth * fraction - RAIL_WIDTH / (2.0 * SCALE),
                rail_length,
                RAIL_WIDTH / SCALE
            )?;
        }

        for i in 0..row.panel_count {
            let px = x + f64::from(i) * (along + config.panel_spacing) / SCALE;
            writeln!(
                &mut svg,
                r##"  <rect x="{}" y="{}" width="{}" height="{}" fill="#1a237e" stroke="#90caf9" stroke-width="0.5" opacity="0.85"/>"##,
                px,
                y_offset,
                along / SCALE,
                depth
            )?;
        }

        y_offset += depth + ROW_GAP / SCALE;
    }

    writeln!(&mut svg, "</svg>")?;

    Ok(svg)
}

/// Panel extent along and across the row.
fn panel_footprint(orientation: Orientation, panel: &PanelSpec) -> (f64, f64) {
    match orientation {
        Orientation::Portrait => (panel.width, panel.height),
        Orientation::Landscape => (panel.height, panel.width),
    }
}
