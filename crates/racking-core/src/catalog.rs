//! Persistent store of named panel models and available rail stock lengths.
//!
//! The estimator never reads this itself; front ends load it and thread the
//! resulting [`PanelSpec`] and [`RailStockCatalog`] into a request.

use crate::types::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// File name used when no catalog path is given
pub const DEFAULT_CATALOG_FILE: &str = "racking-catalog.json";

const MM_PER_INCH: f64 = 25.4;

/// A named panel with its dimensions in inches and weight in pounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelModel {
    pub name: String,
    pub width: f64,
    pub height: f64,
    pub weight: f64,
}

impl PanelModel {
    /// Builds a model from millimetre dimensions, rounded to 0.0001 in.
    pub fn from_mm(name: &str, height_mm: f64, width_mm: f64, weight: f64) -> Self {
        let to_inches = |mm: f64| (mm / MM_PER_INCH * 10_000.0).round() / 10_000.0;
        Self {
            name: name.to_string(),
            width: to_inches(width_mm),
            height: to_inches(height_mm),
            weight,
        }
    }

    pub fn spec(&self) -> PanelSpec {
        PanelSpec {
            width: self.width,
            height: self.height,
            weight: self.weight,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub panel_models: Vec<PanelModel>,
    #[serde(default)]
    pub rails: Vec<f64>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            panel_models: vec![PanelModel::from_mm("LONGi 505W", 2094.0, 1134.0, 60.6)],
            rails: vec![140.0, 185.0],
        }
    }
}

impl Catalog {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| EstimateError::Catalog(format!("cannot read {}: {e}", path.display())))?;
        serde_json::from_str(&content)
            .map_err(|e| EstimateError::Catalog(format!("cannot parse {}: {e}", path.display())))
    }

    /// Loads the catalog, writing the built-in default first if the file is absent.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "seeding default catalog");
            Self::default().save(path)?;
        }
        Self::load(path)
    }

    /// Writes pretty JSON with models sorted by name and rails ascending.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut sorted = self.clone();
        sorted.panel_models.sort_by(|a, b| a.name.cmp(&b.name));
        sorted.rails.sort_by(|a, b| a.total_cmp(b));

        let json = serde_json::to_string_pretty(&sorted)
            .map_err(|e| EstimateError::Catalog(e.to_string()))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                EstimateError::Catalog(format!("cannot create {}: {e}", parent.display()))
            })?;
        }
        std::fs::write(path, json)
            .map_err(|e| EstimateError::Catalog(format!("cannot write {}: {e}", path.display())))
    }

    pub fn panel_model(&self, name: &str) -> Option<&PanelModel> {
        self.panel_models.iter().find(|m| m.name == name)
    }

    pub fn panel(&self, name: &str) -> Result<PanelSpec> {
        self.panel_model(name)
            .map(PanelModel::spec)
            .ok_or_else(|| EstimateError::Catalog(format!("unknown panel model '{name}'")))
    }

    pub fn rail_catalog(&self) -> RailStockCatalog {
        RailStockCatalog::from(self.rails.clone())
    }

    pub fn add_panel_model(&mut self, model: PanelModel) -> Result<()> {
        if model.name.trim().is_empty() {
            return Err(EstimateError::Catalog("panel model name is empty".to_string()));
        }
        if self.panel_model(&model.name).is_some() {
            return Err(EstimateError::Catalog(format!(
                "panel model '{}' already exists",
                model.name
            )));
        }
        model.spec().validate()?;
        self.panel_models.push(model);
        Ok(())
    }

    /// Replaces the model called `name`; the replacement may be renamed.
    pub fn update_panel_model(&mut self, name: &str, model: PanelModel) -> Result<()> {
        model.spec().validate()?;
        if model.name != name && self.panel_model(&model.name).is_some() {
            return Err(EstimateError::Catalog(format!(
                "panel model '{}' already exists",
                model.name
            )));
        }
        let slot = self
            .panel_models
            .iter_mut()
            .find(|m| m.name == name)
            .ok_or_else(|| EstimateError::Catalog(format!("unknown panel model '{name}'")))?;
        *slot = model;
        Ok(())
    }

    pub fn remove_panel_model(&mut self, name: &str) -> Result<PanelModel> {
        let index = self
            .panel_models
            .iter()
            .position(|m| m.name == name)
            .ok_or_else(|| EstimateError::Catalog(format!("unknown panel model '{name}'")))?;
        Ok(self.panel_models.remove(index))
    }

    pub fn add_rail(&mut self, length: f64) -> Result<()> {
        RailStockCatalog::new([length])?;
        if self.rails.contains(&length) {
            return Err(EstimateError::Catalog(format!(
                "rail length {length} already exists"
            )));
        }
        self.rails.push(length);
        Ok(())
    }

    pub fn remove_rail(&mut self, length: f64) -> Result<()> {
        let before = self.rails.len();
        self.rails.retain(|&r| r != length);
        if self.rails.len() == before {
            return Err(EstimateError::Catalog(format!("unknown rail length {length}")));
        }
        Ok(())
    }

    /// Fills a request's missing panel (from `panel_model`) and rail catalog.
    pub fn resolve(&self, mut request: EstimateRequest) -> Result<EstimateRequest> {
        if request.panel.is_none() {
            if let Some(name) = &request.panel_model {
                request.panel = Some(self.panel(name)?);
            }
        }
        if request.catalog.is_none() {
            request.catalog = Some(self.rail_catalog());
        }
        Ok(request)
    }
}
