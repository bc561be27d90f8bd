use crate::types::*;
use crate::validate::validate_rows;
use rayon::prelude::*;
use tracing::debug;

mod combinations;
mod deadload;
mod geometry;
mod mounts;
mod rails;
mod summary;
#[cfg(test)]
mod tests;

pub use combinations::CombinationsWithReplacement;
pub use deadload::{row_deadload, TRUSS_FOOTPRINT_OFFSET};
pub use geometry::{row_geometry, RowGeometry};
pub use mounts::row_mounts;
pub use rails::{select_rails, RailOptimizer};

/// Computes mounting hardware for an array of panel rows.
///
/// Rows are independent of each other and are evaluated in parallel; the
/// per-row results are then folded in input order.
pub struct Estimator {
    rows: Vec<RowSpec>,
    panel: PanelSpec,
    config: RackingConfig,
    catalog: RailStockCatalog,
    limits: SearchLimits,
    include_deadload: bool,
}

impl Estimator {
    /// Validates a fully resolved request and builds an estimator.
    ///
    /// The request must carry both `panel` and `catalog`; resolve a
    /// `panel_model` through [`crate::catalog::Catalog::resolve`] first.
    pub fn new(request: EstimateRequest) -> Result<Self> {
        let catalog = request.catalog.unwrap_or_default();
        catalog.validate()?;

        let panel = request.panel.ok_or_else(|| EstimateError::InvalidInput {
            field: "panel".to_string(),
            value: request
                .panel_model
                .unwrap_or_else(|| "missing".to_string()),
            range: "explicit panel dimensions".to_string(),
        })?;

        let estimator = Self::from_parts(request.rows, panel, request.config, catalog)?
            .with_limits(request.limits)
            .with_deadload(request.include_deadload);
        Ok(estimator)
    }

    /// Validates the parts and builds an estimator with default limits.
    pub fn from_parts(
        rows: Vec<RowSpec>,
        panel: PanelSpec,
        config: RackingConfig,
        catalog: RailStockCatalog,
    ) -> Result<Self> {
        catalog.validate()?;
        panel.validate()?;
        config.validate()?;
        validate_rows(&rows)?;

        Ok(Self {
            rows,
            panel,
            config,
            catalog,
            limits: SearchLimits::default(),
            include_deadload: false,
        })
    }

    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Also compute per-row deadload (psf) during [`Estimator::estimate`].
    pub fn with_deadload(mut self, include: bool) -> Self {
        self.include_deadload = include;
        self
    }

    /// Runs every row and aggregates the array totals.
    pub fn estimate(&self) -> Result<EquipmentSummary> {
        let optimizer = RailOptimizer::new(&self.catalog, self.limits)?;

        let evaluated: Vec<Result<RowResult>> = self
            .rows
            .par_iter()
            .enumerate()
            .map(|(index, row)| self.evaluate_row(index, row, &optimizer))
            .collect();
        // First failing row in input order wins, whatever finished first
        let rows = evaluated.into_iter().collect::<Result<Vec<_>>>()?;

        let summary = self.summarize(rows);
        debug!(
            rows = summary.rows.len(),
            panels = summary.total_panels,
            mounts = summary.total_mounts,
            splices = summary.total_splices,
            waste = summary.total_waste,
            "array estimated"
        );
        Ok(summary)
    }

    /// Per-row deadload in psf, in row order.
    pub fn deadload(&self) -> Result<Vec<f64>> {
        deadload_rows(&self.rows, &self.panel, &self.config)
    }

    fn evaluate_row(
        &self,
        index: usize,
        row: &RowSpec,
        optimizer: &RailOptimizer<'_>,
    ) -> Result<RowResult> {
        let geometry = row_geometry(row, &self.panel, &self.config);
        let rails = optimizer
            .select(geometry.rail_length)
            .map_err(|e| e.at_row(index))?;
        let mounts = row_mounts(geometry.row_width, &self.config).map_err(|e| e.at_row(index))?;
        let psf = if self.include_deadload {
            Some(row_deadload(row, &self.panel, &self.config).map_err(|e| e.at_row(index))?)
        } else {
            None
        };

        debug!(
            row = index,
            row_width = geometry.row_width,
            rail_length = geometry.rail_length,
            pieces = rails.pieces.len(),
            waste = rails.waste,
            mounts,
            "row estimated"
        );

        Ok(RowResult {
            index,
            panel_count: row.panel_count,
            orientation: row.orientation,
            row_width: geometry.row_width,
            rail_length: geometry.rail_length,
            rails,
            mounts,
            psf,
        })
    }
}

/// Estimates hardware for `rows` with default search limits.
pub fn estimate(
    rows: &[RowSpec],
    panel: &PanelSpec,
    config: &RackingConfig,
    catalog: &RailStockCatalog,
) -> Result<EquipmentSummary> {
    Estimator::from_parts(rows.to_vec(), *panel, *config, catalog.clone())?.estimate()
}

/// Per-row deadload in psf. Needs no rail catalog.
pub fn deadload(rows: &[RowSpec], panel: &PanelSpec, config: &RackingConfig) -> Result<Vec<f64>> {
    panel.validate()?;
    config.validate()?;
    validate_rows(rows)?;
    deadload_rows(rows, panel, config)
}

fn deadload_rows(rows: &[RowSpec], panel: &PanelSpec, config: &RackingConfig) -> Result<Vec<f64>> {
    let evaluated: Vec<Result<f64>> = rows
        .par_iter()
        .enumerate()
        .map(|(index, row)| row_deadload(row, panel, config).map_err(|e| e.at_row(index)))
        .collect();
    evaluated.into_iter().collect()
}
