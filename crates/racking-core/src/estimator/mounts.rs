use crate::num::floor_div;
use crate::types::*;

/// Brackets needed for one row.
///
/// Every division is floored before the pattern's fixed end brackets are
/// added. The value stays an `f64` so that the array total is floored once,
/// after all rows are summed.
pub fn row_mounts(row_width: f64, config: &RackingConfig) -> Result<f64> {
    let spacing = config.mount_spacing();
    if !spacing.is_finite() || spacing <= 0.0 {
        return Err(EstimateError::invalid_geometry("mount_spacing", spacing));
    }

    let span = row_width - 2.0 * config.bracket_inset;
    // Two end brackets plus one per full spacing interval
    let full_rail = floor_div(span, spacing) + 2.0;

    let mounts = match config.pattern {
        RackingPattern::Continuous => 2.0 * full_rail,
        RackingPattern::Staggered => {
            let offset_rail = floor_div(span - spacing / 2.0, spacing) + 3.0;
            offset_rail + full_rail
        }
    };

    if mounts < 0.0 {
        return Err(EstimateError::PreconditionViolated {
            row: 0,
            reason: format!("mount count came out negative ({mounts})"),
        });
    }
    Ok(mounts)
}
